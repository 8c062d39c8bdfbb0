//! Row rebalancer: evens out mean ink across foreground rows.
//!
//! Rows with too few foreground pixels are left alone, and the whole pass
//! is skipped when the image has too few active rows to produce a stable
//! target.

use crate::filters::{blur::box_blur_1d, percentile};
use crate::raster::ImageF32;

/// A pixel counts as foreground for row statistics above this mask value.
const ACTIVE_MASK: f32 = 0.15;

/// Equalize per-row mean ink toward the 60th percentile of active rows.
pub fn rebalance_rows(ink: &mut ImageF32, fg_mask: &ImageF32) {
    let (w, h) = (ink.w, ink.h);
    if w == 0 || h == 0 {
        return;
    }

    let mut row_mean = vec![0.0f32; h];
    let mut row_active = vec![false; h];
    let mut active_means = Vec::new();
    let count_floor = 0.08 * w as f32;
    for y in 0..h {
        let mut sum = 0.0f32;
        let mut count = 0usize;
        for x in 0..w {
            let i = y * w + x;
            if fg_mask.data[i] >= ACTIVE_MASK {
                sum += ink.data[i];
                count += 1;
            }
        }
        if count as f32 > count_floor {
            row_mean[y] = sum / count as f32;
            row_active[y] = true;
            active_means.push(row_mean[y]);
        }
    }

    let min_rows = (0.1 * h as f32).max(8.0);
    if (active_means.len() as f32) < min_rows {
        return;
    }

    active_means.sort_by(|a, b| a.partial_cmp(b).expect("row means are finite"));
    let target = percentile::sorted_percentile(&active_means, 0.6);

    let gains: Vec<f32> = (0..h)
        .map(|y| {
            let raw = if row_active[y] {
                target / row_mean[y].max(1e-6)
            } else {
                1.0
            };
            0.4 + 2.6 * ((raw - 0.4) / 2.6).clamp(0.0, 1.0)
        })
        .collect();
    let smooth = box_blur_1d(&gains, 10);

    for y in 0..h {
        let g = smooth[y];
        for v in ink.row_mut(y) {
            *v = (*v * g).clamp(0.0, 1.0);
        }
    }
}
