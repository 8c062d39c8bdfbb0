//! Two-phase rendering API.
//!
//! [`InkRenderer::analyze`] runs the modulation-independent stages
//! (luminance, illumination normalization, Sobel, foreground, light
//! transfer) and returns an immutable [`Analysis`]. [`InkRenderer::render`]
//! draws one frame from it: ink map, threshold auto-tune, post-processing.
//! Rendering many frames from one analysis only repeats the second phase.
//!
//! Same input, preset, and modulation produce a byte-identical raster: the
//! pipeline has no hidden state, and its one parallel loop is per-pixel
//! pure.

use log::debug;
use std::time::Instant;

use crate::diagnostics::TimingBreakdown;
use crate::edges::{sobel_gradients, Grad};
use crate::foreground::{estimate_foreground, ForegroundMask};
use crate::ink::{build_ink_map, FrameModulation};
use crate::light::{build_light_transfer, LightTransfer};
use crate::metrics::RenderMetrics;
use crate::presets::Preset;
use crate::raster::{ImageF32, RgbImageU8};
use crate::tone::{luminance, normalize_illumination};
use crate::tune::tune_threshold;

/// Immutable per-image state shared by every rendered frame.
pub struct Analysis {
    pub width: usize,
    pub height: usize,
    /// Illumination-normalized luminance.
    pub norm: ImageF32,
    /// Sobel gradients of `norm`.
    pub grad: Grad,
    /// Committed foreground mask plus its fallback flag.
    pub foreground: ForegroundMask,
    /// Locked tone and per-row gain.
    pub light: LightTransfer,
}

/// One rendered frame: a strict 0/255 raster plus its measurements.
pub struct RenderedFrame {
    pub width: usize,
    pub height: usize,
    /// Row-major single-channel bytes; every byte is 0 or 255.
    pub pixels: Vec<u8>,
    pub metrics: RenderMetrics,
}

/// The renderer: a preset bound to the two-phase pipeline.
pub struct InkRenderer {
    preset: Preset,
}

impl InkRenderer {
    /// Create a renderer for the given preset.
    pub fn new(preset: Preset) -> Self {
        Self { preset }
    }

    /// The preset this renderer was built with.
    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    /// Run the modulation-independent analysis stages.
    ///
    /// # Errors
    ///
    /// Rejects zero-sized inputs; every other condition is absorbed by the
    /// pipeline's clamps and fallbacks.
    pub fn analyze(&self, rgb: &RgbImageU8<'_>) -> Result<Analysis, String> {
        let (w, h) = (rgb.w, rgb.h);
        if w == 0 || h == 0 {
            return Err(format!("unsupported image dimensions {w}x{h}"));
        }
        debug!("InkRenderer::analyze start w={} h={}", w, h);

        let gray = luminance(rgb);
        let norm = normalize_illumination(&gray);
        let grad = sobel_gradients(&norm);
        let foreground = estimate_foreground(&norm, &grad.mag, self.preset.center_bias);
        if foreground.fallback {
            debug!(
                "InkRenderer::analyze mask ratio {:.4} outside window, using full-frame fallback",
                foreground.ratio
            );
        }
        let light = build_light_transfer(&norm, &grad.mag, &foreground.mask);
        debug!(
            "InkRenderer::analyze done anchor=({}, {}) mask_ratio={:.4}",
            light.anchor.0, light.anchor.1, foreground.ratio
        );

        Ok(Analysis {
            width: w,
            height: h,
            norm,
            grad,
            foreground,
            light,
        })
    }

    /// Render one frame from an analysis.
    pub fn render(&self, analysis: &Analysis, modulation: FrameModulation) -> RenderedFrame {
        let start = Instant::now();
        let ink = build_ink_map(
            &analysis.norm,
            &analysis.grad,
            &analysis.foreground.mask,
            &analysis.light,
            &self.preset,
            modulation,
        );
        let (binary, metrics) = tune_threshold(
            &ink,
            &analysis.grad.mag,
            &self.preset,
            analysis.foreground.fallback,
        );
        debug!(
            "InkRenderer::render done coverage={:.4} components={} in {:.3} ms",
            metrics.white_ratio,
            metrics.component_count,
            start.elapsed().as_secs_f64() * 1000.0
        );

        RenderedFrame {
            width: analysis.width,
            height: analysis.height,
            pixels: binary.iter().map(|&b| b * 255).collect(),
            metrics,
        }
    }

    /// Analyze and render a still frame (all-zero modulation).
    pub fn process(&self, rgb: &RgbImageU8<'_>) -> Result<RenderedFrame, String> {
        let analysis = self.analyze(rgb)?;
        Ok(self.render(&analysis, FrameModulation::default()))
    }

    /// Like [`process`](Self::process), also reporting per-stage timings.
    pub fn process_with_diagnostics(
        &self,
        rgb: &RgbImageU8<'_>,
    ) -> Result<(RenderedFrame, TimingBreakdown), String> {
        let mut timings = TimingBreakdown::default();

        let phase = Instant::now();
        let analysis = self.analyze(rgb)?;
        timings.record("analysis", phase.elapsed());

        let phase = Instant::now();
        let frame = self.render(&analysis, FrameModulation::default());
        timings.record("render", phase.elapsed());

        Ok((frame, timings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::Preset;

    fn checker_rgb(w: usize, h: usize, cell: usize) -> Vec<u8> {
        let mut data = vec![0u8; w * h * 3];
        for y in 0..h {
            for x in 0..w {
                let v = if (x / cell + y / cell) % 2 == 0 { 32 } else { 220 };
                let i = (y * w + x) * 3;
                data[i] = v;
                data[i + 1] = v;
                data[i + 2] = v;
            }
        }
        data
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let renderer = InkRenderer::new(Preset::default());
        let data: [u8; 0] = [];
        let rgb = RgbImageU8::packed(0, 0, &data);
        assert!(renderer.analyze(&rgb).is_err());
    }

    #[test]
    fn output_is_strictly_binary_and_sized() {
        let data = checker_rgb(64, 48, 8);
        let rgb = RgbImageU8::packed(64, 48, &data);
        let renderer = InkRenderer::new(Preset::named("neon-contour"));
        let frame = renderer.process(&rgb).expect("process");
        assert_eq!(frame.width, 64);
        assert_eq!(frame.height, 48);
        assert_eq!(frame.pixels.len(), 64 * 48);
        assert!(frame.pixels.iter().all(|&p| p == 0 || p == 255));
    }

    #[test]
    fn analysis_is_reusable_across_frames() {
        let data = checker_rgb(48, 48, 6);
        let rgb = RgbImageU8::packed(48, 48, &data);
        let renderer = InkRenderer::new(Preset::named("crowd-ghost"));
        let analysis = renderer.analyze(&rgb).expect("analyze");
        let a = renderer.render(&analysis, FrameModulation::default());
        let b = renderer.render(&analysis, FrameModulation::default());
        assert_eq!(a.pixels, b.pixels);
        assert_eq!(a.metrics, b.metrics);
    }

    #[test]
    fn diagnostics_cover_both_phases() {
        let data = checker_rgb(32, 32, 4);
        let rgb = RgbImageU8::packed(32, 32, &data);
        let renderer = InkRenderer::new(Preset::default());
        let (_, timings) = renderer.process_with_diagnostics(&rgb).expect("process");
        let phases: Vec<&str> = timings.phases.iter().map(|p| p.phase.as_str()).collect();
        assert_eq!(phases, vec!["analysis", "render"]);
        assert!(timings.total_ms() >= 0.0);
    }
}
