//! 3×3 Sobel gradients with max-normalized magnitude.

use crate::raster::ImageF32;

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Signed gradients plus magnitude normalized by its maximum.
#[derive(Clone, Debug)]
pub struct Grad {
    pub gx: ImageF32,
    pub gy: ImageF32,
    /// Magnitude scaled into [0, 1] by the per-image maximum.
    pub mag: ImageF32,
}

/// Apply the Sobel kernels to interior pixels; borders keep zeros.
pub fn sobel_gradients(l: &ImageF32) -> Grad {
    let (w, h) = (l.w, l.h);
    let mut gx = ImageF32::new(w, h);
    let mut gy = ImageF32::new(w, h);
    let mut mag = ImageF32::new(w, h);

    if w >= 3 && h >= 3 {
        let mut max_mag = 0.0f32;
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let mut sum_x = 0.0;
                let mut sum_y = 0.0;
                for (ky, (row_x, row_y)) in SOBEL_KERNEL_X.iter().zip(&SOBEL_KERNEL_Y).enumerate() {
                    let yy = y + ky - 1;
                    for (kx, (&wx, &wy)) in row_x.iter().zip(row_y).enumerate() {
                        let sample = l.get(x + kx - 1, yy);
                        sum_x += sample * wx;
                        sum_y += sample * wy;
                    }
                }
                gx.set(x, y, sum_x);
                gy.set(x, y, sum_y);
                let m = (sum_x * sum_x + sum_y * sum_y).sqrt();
                mag.set(x, y, m);
                if m > max_mag {
                    max_mag = m;
                }
            }
        }
        let inv = 1.0 / max_mag.max(1e-6);
        for m in &mut mag.data {
            *m *= inv;
        }
    }

    Grad { gx, gy, mag }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_step_yields_positive_gx() {
        let mut img = ImageF32::new(6, 5);
        for y in 0..5 {
            for x in 3..6 {
                img.set(x, y, 1.0);
            }
        }
        let grad = sobel_gradients(&img);
        assert!(grad.gx.get(2, 2) > 0.0);
        assert_eq!(grad.gy.get(2, 2), 0.0);
        // Max-normalization puts the strongest response at exactly 1.
        let max = grad.mag.data.iter().cloned().fold(0.0f32, f32::max);
        assert!((max - 1.0).abs() < 1e-6);
    }

    #[test]
    fn borders_stay_zero() {
        let mut img = ImageF32::new(5, 5);
        for (i, v) in img.data.iter_mut().enumerate() {
            *v = (i % 2) as f32;
        }
        let grad = sobel_gradients(&img);
        for x in 0..5 {
            assert_eq!(grad.mag.get(x, 0), 0.0);
            assert_eq!(grad.mag.get(x, 4), 0.0);
        }
        for y in 0..5 {
            assert_eq!(grad.mag.get(0, y), 0.0);
            assert_eq!(grad.mag.get(4, y), 0.0);
        }
    }

    #[test]
    fn degenerate_images_have_empty_interior() {
        for (w, h) in [(1usize, 1usize), (1, 8), (8, 2)] {
            let mut img = ImageF32::new(w, h);
            for (i, v) in img.data.iter_mut().enumerate() {
                *v = i as f32;
            }
            let grad = sobel_gradients(&img);
            assert!(grad.mag.data.iter().all(|&m| m == 0.0));
        }
    }

    #[test]
    fn flat_field_has_zero_magnitude() {
        let mut img = ImageF32::new(8, 8);
        for v in &mut img.data {
            *v = 0.4;
        }
        let grad = sobel_gradients(&img);
        assert!(grad.mag.data.iter().all(|&m| m == 0.0));
    }
}
