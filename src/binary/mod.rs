//! Binarization and raster post-processing.
//!
//! `post_process` applies the preset's morphology sequence, prunes
//! components by area and rank, and optionally isolates whites. The
//! auto-tune loop calls it once per threshold candidate.

pub mod components;
pub mod dither;
pub mod isolate;
pub mod morphology;

pub use components::{component_stats, prune_components, ComponentStats};
pub use dither::dither;
pub use isolate::isolate_whites;
pub use morphology::{dilate, erode};

use crate::presets::Preset;
use crate::raster::ImageF32;

/// Spaceiness below this keeps the open-style morphology pass.
const OPEN_SPACEINESS: f32 = 0.7;

/// Run the preset's morphology, pruning, and (optionally) isolation over a
/// raw dithered raster. `with_isolation` lets the tuner retry without the
/// isolation step when coverage starves.
pub fn post_process(
    raw: &[u8],
    w: usize,
    h: usize,
    preset: &Preset,
    ink: &ImageF32,
    with_isolation: bool,
) -> Vec<u8> {
    let mut bin = raw.to_vec();

    if preset.stroke_thickness > 1 {
        bin = dilate(&bin, w, h, preset.stroke_thickness as usize - 1);
        if preset.spaceiness < OPEN_SPACEINESS {
            bin = erode(&bin, w, h, 1);
        }
    } else if preset.spaceiness < OPEN_SPACEINESS {
        bin = erode(&bin, w, h, 1);
        bin = dilate(&bin, w, h, 1);
    }

    let min_area = (preset.component_min_area as f32 * (1.0 - 0.7 * preset.spaceiness))
        .round()
        .max(1.0) as usize;
    let max_count = (preset.component_max_count as f32 * (1.0 + 0.25 * preset.spaceiness))
        .round()
        .max(1000.0) as usize;
    bin = prune_components(&bin, w, h, min_area, max_count);

    if with_isolation && preset.isolate_whites {
        bin = isolate_whites(&bin, w, h, ink, preset.isolation_radius as usize);
    }
    bin
}
