//! Foreground estimation from saliency, edge magnitude, and a center prior.
//!
//! The committed mask is strictly binary. When the raw mask covers almost
//! nothing or almost everything the estimate is useless, so the whole frame
//! is treated as foreground and the fallback flag is raised for the caller
//! to audit.

use crate::filters::{blur::box_blur, percentile};
use crate::raster::ImageF32;

/// Raw mask ratios outside this window trigger the full-frame fallback.
pub const MASK_RATIO_MIN: f32 = 0.03;
pub const MASK_RATIO_MAX: f32 = 0.86;

/// Binary foreground mask plus the raw ratio it was judged by.
#[derive(Clone, Debug)]
pub struct ForegroundMask {
    /// Committed mask; every element is 0.0 or 1.0.
    pub mask: ImageF32,
    /// Fraction of ones in the raw (pre-smoothing) mask.
    pub ratio: f32,
    /// True when the full-frame fallback replaced the estimate.
    pub fallback: bool,
}

/// Estimate the foreground of an illumination-normalized image.
pub fn estimate_foreground(norm: &ImageF32, mag: &ImageF32, center_bias: f32) -> ForegroundMask {
    let (w, h) = (norm.w, norm.h);
    let near = box_blur(norm, 3);
    let far = box_blur(norm, 14);

    let half_diag = 0.5 * ((w * w + h * h) as f32).sqrt();
    let (cx, cy) = (0.5 * w as f32, 0.5 * h as f32);

    let mut score = ImageF32::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let saliency = (1.8 * (near.data[i] - far.data[i]).abs()).clamp(0.0, 1.0);
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let center = 1.0 - (dx * dx + dy * dy).sqrt() / half_diag;
            score.data[i] =
                (0.48 * mag.data[i] + 0.42 * saliency + center_bias * center).clamp(0.0, 1.0);
        }
    }

    let threshold = percentile::histogram_threshold(&score.data, 0.64);
    let mut raw = ImageF32::new(w, h);
    let mut ones = 0usize;
    for (m, &s) in raw.data.iter_mut().zip(&score.data) {
        if s > threshold {
            *m = 1.0;
            ones += 1;
        }
    }
    let ratio = ones as f32 / (w * h).max(1) as f32;

    if !(MASK_RATIO_MIN..=MASK_RATIO_MAX).contains(&ratio) {
        let mut mask = ImageF32::new(w, h);
        mask.data.fill(1.0);
        return ForegroundMask {
            mask,
            ratio,
            fallback: true,
        };
    }

    let mut mask = box_blur(&raw, 2);
    for m in &mut mask.data {
        *m = if *m > 0.42 { 1.0 } else { 0.0 };
    }
    ForegroundMask {
        mask,
        ratio,
        fallback: false,
    }
}
