//! Output metrics and the measurement helpers the tuner scores with.

use serde::{Deserialize, Serialize};

use crate::binary::ComponentStats;
use crate::raster::ImageF32;

/// Sobel magnitude at or above this counts as edge-aligned.
pub const EDGE_ALIGNMENT_MAG: f32 = 0.2;

/// Fraction of the frame height treated as the top band.
pub const TOP_BAND: f32 = 0.28;

/// Measurements reported with every rendered frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderMetrics {
    /// Fraction of output pixels set to 255.
    pub white_ratio: f32,
    /// Number of 4-connected white components.
    pub component_count: usize,
    /// Mean component area in pixels (0 when there are no components).
    pub mean_component_area: f32,
    /// Largest component area in pixels.
    pub max_component_area: usize,
    /// Among white pixels, the fraction whose Sobel magnitude is >= 0.2.
    pub edge_alignment_score: f32,
    /// True when the full-frame foreground fallback was used.
    pub fallback_segmentation: bool,
    /// Iterations completed by the auto-tune loop (always its final count).
    pub tuned_iterations: u32,
}

impl RenderMetrics {
    /// Assemble the record from tuner measurements.
    pub fn from_parts(
        white_ratio: f32,
        stats: ComponentStats,
        edge_alignment_score: f32,
        fallback_segmentation: bool,
        tuned_iterations: u32,
    ) -> Self {
        Self {
            white_ratio,
            component_count: stats.count,
            mean_component_area: stats.mean_area,
            max_component_area: stats.max_area,
            edge_alignment_score,
            fallback_segmentation,
            tuned_iterations,
        }
    }
}

/// Fraction of 1s in a 0/1 raster.
pub fn white_ratio(bin: &[u8]) -> f32 {
    if bin.is_empty() {
        return 0.0;
    }
    bin.iter().filter(|&&v| v == 1).count() as f32 / bin.len() as f32
}

/// Fraction of white pixels sitting on a strong gradient; 0 without whites.
pub fn edge_alignment(bin: &[u8], mag: &ImageF32) -> f32 {
    let mut whites = 0usize;
    let mut aligned = 0usize;
    for (&b, &m) in bin.iter().zip(&mag.data) {
        if b == 1 {
            whites += 1;
            if m >= EDGE_ALIGNMENT_MAG {
                aligned += 1;
            }
        }
    }
    if whites == 0 {
        0.0
    } else {
        aligned as f32 / whites as f32
    }
}

/// White density of the top band (`y < 0.28·h`) and of the remainder.
pub fn band_densities(bin: &[u8], w: usize, h: usize) -> (f32, f32) {
    let split = (TOP_BAND * h as f32) as usize;
    let top_pixels = split * w;
    let low_pixels = (h - split) * w;
    let top_whites = bin[..top_pixels].iter().filter(|&&v| v == 1).count();
    let low_whites = bin[top_pixels..].iter().filter(|&&v| v == 1).count();
    let top = if top_pixels == 0 {
        0.0
    } else {
        top_whites as f32 / top_pixels as f32
    };
    let low = if low_pixels == 0 {
        0.0
    } else {
        low_whites as f32 / low_pixels as f32
    };
    (top, low)
}
