//! Threshold dithering of the ink map into a 0/1 raster.

use crate::presets::DitherMode;
use crate::raster::ImageF32;

/// 8×8 Bayer matrix with values 0..63.
pub const BAYER_8X8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Amplitude of the ordered-dither threshold perturbation.
const BAYER_SPREAD: f32 = 0.18;

/// Dispatch on the preset's dither mode.
pub fn dither(map: &ImageF32, mode: DitherMode, threshold: f32) -> Vec<u8> {
    match mode {
        DitherMode::Floyd => floyd_steinberg(map, threshold),
        DitherMode::Bayer => ordered_bayer(map, threshold),
    }
}

/// Floyd–Steinberg error diffusion against a scalar threshold.
///
/// Scans rows top-to-bottom, columns left-to-right, distributing the
/// quantization error 7/16 right, 3/16 bottom-left, 5/16 bottom, and
/// 1/16 bottom-right, inside image bounds.
pub fn floyd_steinberg(map: &ImageF32, threshold: f32) -> Vec<u8> {
    let (w, h) = (map.w, map.h);
    let mut work = map.data.clone();
    let mut out = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let bit = if work[i] >= threshold { 1u8 } else { 0u8 };
            out[i] = bit;
            let err = work[i] - bit as f32;
            if x + 1 < w {
                work[i + 1] += err * (7.0 / 16.0);
            }
            if y + 1 < h {
                if x > 0 {
                    work[i + w - 1] += err * (3.0 / 16.0);
                }
                work[i + w] += err * (5.0 / 16.0);
                if x + 1 < w {
                    work[i + w + 1] += err * (1.0 / 16.0);
                }
            }
        }
    }
    out
}

/// Ordered thresholding against the 8×8 Bayer matrix.
pub fn ordered_bayer(map: &ImageF32, threshold: f32) -> Vec<u8> {
    let (w, h) = (map.w, map.h);
    let mut out = vec![0u8; w * h];
    for y in 0..h {
        let row = &BAYER_8X8[y % 8];
        for x in 0..w {
            let bias = (row[x % 8] as f32 / 64.0 - 0.5) * BAYER_SPREAD;
            out[y * w + x] = (map.data[y * w + x] > threshold + bias) as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_map(w: usize, h: usize, v: f32) -> ImageF32 {
        let mut m = ImageF32::new(w, h);
        m.data.fill(v);
        m
    }

    #[test]
    fn bayer_halves_a_mid_level_field() {
        let map = constant_map(16, 16, 0.5);
        let out = ordered_bayer(&map, 0.5);
        let whites = out.iter().filter(|&&b| b == 1).count();
        // 0.5 > 0.5 + bias exactly when the bias is negative: half the matrix.
        assert_eq!(whites, 128);
    }

    #[test]
    fn floyd_preserves_mean_level() {
        let map = constant_map(20, 20, 0.3);
        let out = floyd_steinberg(&map, 0.5);
        let ratio = out.iter().filter(|&&b| b == 1).count() as f32 / 400.0;
        assert!((ratio - 0.3).abs() < 0.1, "ratio {ratio}");
    }

    #[test]
    fn extremes_are_stable() {
        let zeros = constant_map(8, 8, 0.0);
        assert!(floyd_steinberg(&zeros, 0.4).iter().all(|&b| b == 0));
        assert!(ordered_bayer(&zeros, 0.4).iter().all(|&b| b == 0));
        let ones = constant_map(8, 8, 1.0);
        assert!(floyd_steinberg(&ones, 0.4).iter().all(|&b| b == 1));
        assert!(ordered_bayer(&ones, 0.4).iter().all(|&b| b == 1));
    }

    #[test]
    fn floyd_pushes_error_rightward() {
        let mut map = ImageF32::new(3, 1);
        map.data.copy_from_slice(&[0.49, 0.30, 0.28]);
        let out = floyd_steinberg(&map, 0.5);
        // 0.49 -> black with err 0.49; the right neighbor receives
        // 0.49 * 7/16 ≈ 0.214 and crosses the threshold; its negative error
        // then keeps the last pixel black.
        assert_eq!(out, vec![0, 1, 0]);
    }

    #[test]
    fn dispatch_matches_mode() {
        let map = constant_map(8, 8, 0.5);
        assert_eq!(
            dither(&map, DitherMode::Bayer, 0.5),
            ordered_bayer(&map, 0.5)
        );
        assert_eq!(
            dither(&map, DitherMode::Floyd, 0.5),
            floyd_steinberg(&map, 0.5)
        );
    }
}
