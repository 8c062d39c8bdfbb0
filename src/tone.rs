//! Luminance extraction and illumination normalization.
//!
//! The normalizer divides the image by a large-radius local mean
//! (homomorphic flattening), compresses with a log, and re-stretches with
//! percentile normalization so downstream stages see subject contrast
//! rather than lighting.

use crate::filters::{blur::box_blur, percentile};
use crate::raster::{ImageF32, RgbImageU8};

/// Rec. 601 luma weights.
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// Convert interleaved RGB8 to luminance in [0, 1].
pub fn luminance(rgb: &RgbImageU8<'_>) -> ImageF32 {
    let mut out = ImageF32::new(rgb.w, rgb.h);
    for y in 0..rgb.h {
        let row = out.row_mut(y);
        for (x, o) in row.iter_mut().enumerate() {
            let (r, g, b) = rgb.get(x, y);
            *o = (LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32) / 255.0;
        }
    }
    out
}

/// Flatten illumination and stretch local contrast to [0, 1].
pub fn normalize_illumination(gray: &ImageF32) -> ImageF32 {
    let (w, h) = (gray.w, gray.h);
    let radius = (0.03 * w.min(h) as f32).floor().max(6.0) as usize;
    let local = box_blur(gray, radius);

    let mut out = ImageF32::new(w, h);
    for (o, (&g, &l)) in out.data.iter_mut().zip(gray.data.iter().zip(&local.data)) {
        let ratio = g / (l + 1e-6);
        *o = (1.0 + 1.5 * ratio).ln();
    }
    percentile::normalize(&mut out.data, 0.01, 0.99);
    percentile::normalize(&mut out.data, 0.02, 0.98);

    // Re-inject the high-pass band the stretch flattened.
    let smooth = box_blur(&out, 2);
    for (o, &m) in out.data.iter_mut().zip(&smooth.data) {
        let n = *o;
        *o = (0.72 * n + 0.28 * (n - m + 0.5)).clamp(0.0, 1.0);
    }
    percentile::normalize(&mut out.data, 0.01, 0.99);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::RgbImageU8;

    #[test]
    fn luminance_uses_rec601_weights() {
        let data = [255u8, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        let rgb = RgbImageU8::packed(4, 1, &data);
        let lum = luminance(&rgb);
        assert!((lum.get(0, 0) - 0.299).abs() < 1e-3);
        assert!((lum.get(1, 0) - 0.587).abs() < 1e-3);
        assert!((lum.get(2, 0) - 0.114).abs() < 1e-3);
        assert!((lum.get(3, 0) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn constant_field_normalizes_to_zero() {
        let mut gray = ImageF32::new(16, 16);
        for v in &mut gray.data {
            *v = 0.5;
        }
        let norm = normalize_illumination(&gray);
        assert!(norm.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn output_stays_in_unit_range() {
        let mut gray = ImageF32::new(24, 24);
        for y in 0..24 {
            for x in 0..24 {
                let vignette = 1.0 - ((x as f32 - 12.0).powi(2) + (y as f32 - 12.0).powi(2)) / 300.0;
                let texture = if (x / 3 + y / 3) % 2 == 0 { 0.2 } else { 0.7 };
                gray.set(x, y, (vignette.max(0.1) * texture).clamp(0.0, 1.0));
            }
        }
        let norm = normalize_illumination(&gray);
        assert!(norm.data.iter().all(|v| (0.0..=1.0).contains(v)));
        let spread = norm.data.iter().cloned().fold(0.0f32, f32::max)
            - norm.data.iter().cloned().fold(1.0f32, f32::min);
        assert!(spread > 0.5, "normalization should keep texture contrast");
    }
}
