//! Named parameter bundles controlling the renderer.
//!
//! A preset carries every tuning constant the pipeline consumes: blend
//! weights, gammas, morphology sizes, pruning limits, dither mode, and the
//! coverage budget the auto-tune drives toward. Unknown names resolve to
//! `neon-contour`.
//!
//! The serde defaults keep older serialized preset files loadable: fields
//! added later (ghost weight, band frequency, spaceiness, the suppression
//! and isolation knobs) default to zero, and `isolateWhites` to false.

use serde::{Deserialize, Serialize};

/// Binarization strategy applied to the ink map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DitherMode {
    /// Floyd–Steinberg error diffusion.
    Floyd,
    /// Ordered 8×8 Bayer thresholding.
    Bayer,
}

/// Full tuning-constant bundle for one rendering style.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    /// Weight of the Sobel edge response.
    pub edge_weight: f32,
    /// Weight of the anchored fill tone inside the foreground.
    pub fill_weight: f32,
    /// Weight of the oriented stripe texture.
    #[serde(default)]
    pub texture_weight: f32,
    /// Weight of the flowing band term.
    #[serde(default)]
    pub ghost_weight: f32,
    /// Output stroke thickness; values above 1 dilate the raster.
    pub stroke_thickness: u32,
    /// Spatial scale of the stripe texture and flow blurs, >= 1.
    pub grain_scale: f32,
    /// Radius of the post-blend smoothing blur.
    pub smoothing: f32,
    /// Fraction of white pixels the auto-tune aims for.
    pub white_coverage_target: f32,
    /// Acceptable distance from the coverage target.
    pub coverage_tolerance: f32,
    /// Components smaller than this (scaled by spaceiness) are pruned.
    pub component_min_area: u32,
    /// Rank cutoff for component pruning (scaled by spaceiness).
    pub component_max_count: u32,
    /// Center-prior contribution to foreground scoring, in [0, 1].
    pub center_bias: f32,
    /// Gamma applied to the edge response.
    pub edge_gamma: f32,
    /// Gamma applied to the fill tone.
    pub fill_gamma: f32,
    /// Frequency of the flowing bands.
    #[serde(default)]
    pub band_frequency: f32,
    /// How aggressively ink is thinned; also loosens morphology/pruning.
    #[serde(default)]
    pub spaceiness: f32,
    /// Extra exponent suppressing ink outside the foreground mask.
    #[serde(default)]
    pub background_suppression: f32,
    /// Extra exponent suppressing ink in bright regions.
    #[serde(default)]
    pub luma_suppression: f32,
    /// L1 radius of the white-isolation exclusion zone.
    #[serde(default)]
    pub isolation_radius: u32,
    /// Thin clumped whites into their strongest isolated points.
    #[serde(default)]
    pub isolate_whites: bool,
    /// Coverage floor below which the tuner retries without isolation and
    /// eventually runs the rescue pass.
    #[serde(default)]
    pub min_white_coverage_floor: f32,
    /// Blend toward the radial center field, in [0, 1].
    #[serde(default)]
    pub center_focus: f32,
    /// Ink suppression in the top band of the frame, in [0, 1].
    #[serde(default)]
    pub top_suppression: f32,
    /// Binarization strategy.
    pub dither: DitherMode,
}

impl Default for Preset {
    fn default() -> Self {
        neon_contour()
    }
}

impl Preset {
    /// Resolve a preset id; unknown ids fall back to `neon-contour`.
    pub fn named(id: &str) -> Self {
        match id {
            "silhouette-etch" => silhouette_etch(),
            "industrial-noise" => industrial_noise(),
            "crowd-ghost" => crowd_ghost(),
            "topo-stroke" => topo_stroke(),
            _ => neon_contour(),
        }
    }

    /// The five preset ids shipped with the renderer.
    pub fn names() -> &'static [&'static str] {
        &[
            "neon-contour",
            "silhouette-etch",
            "industrial-noise",
            "crowd-ghost",
            "topo-stroke",
        ]
    }
}

/// Edge-dominant look: bright contour lines, little interior fill.
pub fn neon_contour() -> Preset {
    Preset {
        edge_weight: 1.35,
        fill_weight: 0.18,
        texture_weight: 0.0,
        ghost_weight: 0.30,
        stroke_thickness: 1,
        grain_scale: 3.0,
        smoothing: 1.0,
        white_coverage_target: 0.13,
        coverage_tolerance: 0.04,
        component_min_area: 6,
        component_max_count: 900,
        center_bias: 0.30,
        edge_gamma: 0.85,
        fill_gamma: 1.60,
        band_frequency: 1.8,
        spaceiness: 0.35,
        background_suppression: 0.55,
        luma_suppression: 0.35,
        isolation_radius: 0,
        isolate_whites: false,
        min_white_coverage_floor: 0.05,
        center_focus: 0.25,
        top_suppression: 0.30,
        dither: DitherMode::Bayer,
    }
}

/// Fill-dominant look: solid subject mass, thickened strokes.
pub fn silhouette_etch() -> Preset {
    Preset {
        edge_weight: 0.25,
        fill_weight: 1.10,
        texture_weight: 0.30,
        ghost_weight: 0.15,
        stroke_thickness: 2,
        grain_scale: 4.0,
        smoothing: 1.5,
        white_coverage_target: 0.155,
        coverage_tolerance: 0.025,
        component_min_area: 10,
        component_max_count: 600,
        center_bias: 0.45,
        edge_gamma: 1.10,
        fill_gamma: 1.25,
        band_frequency: 1.2,
        spaceiness: 0.25,
        background_suppression: 0.70,
        luma_suppression: 0.55,
        isolation_radius: 0,
        isolate_whites: false,
        min_white_coverage_floor: 0.06,
        center_focus: 0.40,
        top_suppression: 0.45,
        dither: DitherMode::Floyd,
    }
}

/// Gritty look: hard edges, ghost banding, isolated speckle whites.
pub fn industrial_noise() -> Preset {
    Preset {
        edge_weight: 1.10,
        fill_weight: 0.30,
        texture_weight: 0.0,
        ghost_weight: 0.45,
        stroke_thickness: 1,
        grain_scale: 2.0,
        smoothing: 0.0,
        white_coverage_target: 0.14,
        coverage_tolerance: 0.05,
        component_min_area: 3,
        component_max_count: 1400,
        center_bias: 0.0,
        edge_gamma: 0.75,
        fill_gamma: 1.80,
        band_frequency: 2.6,
        spaceiness: 0.55,
        background_suppression: 0.35,
        luma_suppression: 0.25,
        isolation_radius: 1,
        isolate_whites: true,
        min_white_coverage_floor: 0.04,
        center_focus: 0.0,
        top_suppression: 0.15,
        dither: DitherMode::Floyd,
    }
}

/// Layered translucent look driven by the flowing band term.
pub fn crowd_ghost() -> Preset {
    Preset {
        edge_weight: 0.70,
        fill_weight: 0.45,
        texture_weight: 0.35,
        ghost_weight: 0.95,
        stroke_thickness: 1,
        grain_scale: 5.0,
        smoothing: 2.0,
        white_coverage_target: 0.15,
        coverage_tolerance: 0.035,
        component_min_area: 8,
        component_max_count: 700,
        center_bias: 0.35,
        edge_gamma: 1.00,
        fill_gamma: 1.40,
        band_frequency: 3.2,
        spaceiness: 0.45,
        background_suppression: 0.60,
        luma_suppression: 0.45,
        isolation_radius: 0,
        isolate_whites: false,
        min_white_coverage_floor: 0.05,
        center_focus: 0.30,
        top_suppression: 0.55,
        dither: DitherMode::Bayer,
    }
}

/// Contour-map look: oriented stripes following the gradient field.
pub fn topo_stroke() -> Preset {
    Preset {
        edge_weight: 0.90,
        fill_weight: 0.60,
        texture_weight: 0.75,
        ghost_weight: 0.25,
        stroke_thickness: 2,
        grain_scale: 6.0,
        smoothing: 1.0,
        white_coverage_target: 0.15,
        coverage_tolerance: 0.03,
        component_min_area: 14,
        component_max_count: 500,
        center_bias: 0.40,
        edge_gamma: 0.95,
        fill_gamma: 1.30,
        band_frequency: 1.5,
        spaceiness: 0.20,
        background_suppression: 0.65,
        luma_suppression: 0.40,
        isolation_radius: 0,
        isolate_whites: false,
        min_white_coverage_floor: 0.06,
        center_focus: 0.35,
        top_suppression: 0.35,
        dither: DitherMode::Bayer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_id_falls_back_to_default() {
        assert_eq!(Preset::named("no-such-style"), neon_contour());
        assert_eq!(Preset::named(""), neon_contour());
        assert_eq!(Preset::default(), neon_contour());
    }

    #[test]
    fn every_name_resolves_to_a_distinct_preset() {
        let presets: Vec<Preset> = Preset::names().iter().map(|n| Preset::named(n)).collect();
        for (i, a) in presets.iter().enumerate() {
            for b in &presets[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn constants_respect_their_documented_ranges() {
        for name in Preset::names() {
            let p = Preset::named(name);
            assert!(p.edge_weight >= 0.0 && p.fill_weight >= 0.0, "{name}");
            assert!(p.texture_weight >= 0.0 && p.ghost_weight >= 0.0, "{name}");
            assert!(p.stroke_thickness >= 1, "{name}");
            assert!(p.grain_scale >= 1.0, "{name}");
            assert!(p.smoothing >= 0.0, "{name}");
            assert!((0.0..1.0).contains(&p.white_coverage_target), "{name}");
            assert!(p.coverage_tolerance > 0.0, "{name}");
            assert!(p.component_min_area >= 1 && p.component_max_count >= 1, "{name}");
            assert!((0.0..=1.0).contains(&p.center_bias), "{name}");
            assert!(p.edge_gamma > 0.0 && p.fill_gamma > 0.0, "{name}");
            assert!(p.band_frequency > 0.0, "{name}");
            assert!((0.0..=1.0).contains(&p.spaceiness), "{name}");
            assert!((0.0..=1.0).contains(&p.background_suppression), "{name}");
            assert!((0.0..=1.0).contains(&p.luma_suppression), "{name}");
            assert!((0.0..=1.0).contains(&p.min_white_coverage_floor), "{name}");
            assert!((0.0..=1.0).contains(&p.center_focus), "{name}");
            assert!((0.0..=1.0).contains(&p.top_suppression), "{name}");
        }
    }

    #[test]
    fn serde_round_trips() {
        let preset = crowd_ghost();
        let json = serde_json::to_string(&preset).expect("serialize");
        let back: Preset = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(preset, back);
    }

    #[test]
    fn older_files_without_newer_fields_still_load() {
        let json = r#"{
            "edgeWeight": 1.0,
            "fillWeight": 0.5,
            "strokeThickness": 1,
            "grainScale": 3.0,
            "smoothing": 1.0,
            "whiteCoverageTarget": 0.12,
            "coverageTolerance": 0.03,
            "componentMinArea": 4,
            "componentMaxCount": 800,
            "centerBias": 0.2,
            "edgeGamma": 1.0,
            "fillGamma": 1.0,
            "dither": "bayer"
        }"#;
        let preset: Preset = serde_json::from_str(json).expect("legacy preset");
        assert_eq!(preset.texture_weight, 0.0);
        assert_eq!(preset.ghost_weight, 0.0);
        assert_eq!(preset.band_frequency, 0.0);
        assert_eq!(preset.spaceiness, 0.0);
        assert_eq!(preset.isolation_radius, 0);
        assert!(!preset.isolate_whites);
        assert_eq!(preset.dither, DitherMode::Bayer);
    }
}
