//! White-pixel isolation: thin clumps into their strongest points.
//!
//! Whites are visited in descending guide order (ties keep scan order) and
//! accepted only when no already-accepted white sits inside the diamond
//! (L1) neighborhood of the given radius. Running the pass twice changes
//! nothing: every surviving pixel was accepted against the same set.

use crate::raster::ImageF32;

/// Keep only guide-strongest whites separated by more than `radius` (L1).
/// `radius == 0` is identity.
pub fn isolate_whites(bin: &[u8], w: usize, h: usize, guide: &ImageF32, radius: usize) -> Vec<u8> {
    if radius == 0 {
        return bin.to_vec();
    }

    let mut order: Vec<usize> = (0..bin.len()).filter(|&i| bin[i] == 1).collect();
    order.sort_by(|&a, &b| {
        guide.data[b]
            .partial_cmp(&guide.data[a])
            .expect("guide values are finite")
    });

    let mut out = vec![0u8; w * h];
    let r = radius as isize;
    for &i in &order {
        let x = (i % w) as isize;
        let y = (i / w) as isize;
        let mut blocked = false;
        'scan: for dy in -r..=r {
            let yy = y + dy;
            if yy < 0 || yy >= h as isize {
                continue;
            }
            let span = r - dy.abs();
            for dx in -span..=span {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let xx = x + dx;
                if xx < 0 || xx >= w as isize {
                    continue;
                }
                if out[yy as usize * w + xx as usize] == 1 {
                    blocked = true;
                    break 'scan;
                }
            }
        }
        if !blocked {
            out[i] = 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guide_from(values: &[f32], w: usize, h: usize) -> ImageF32 {
        ImageF32::from_vec(w, h, values.to_vec())
    }

    #[test]
    fn zero_radius_is_identity() {
        let bin = vec![1u8, 1, 1, 1];
        let guide = guide_from(&[0.1, 0.9, 0.5, 0.3], 2, 2);
        assert_eq!(isolate_whites(&bin, 2, 2, &guide, 0), bin);
    }

    #[test]
    fn stronger_neighbor_wins() {
        let bin = vec![1u8, 1, 0];
        let guide = guide_from(&[0.2, 0.8, 0.0], 3, 1);
        let out = isolate_whites(&bin, 3, 1, &guide, 1);
        assert_eq!(out, vec![0, 1, 0]);
    }

    #[test]
    fn diamond_excludes_axis_but_not_far_diagonal() {
        // L1 distance of the diagonal neighbor is 2, outside radius 1.
        let bin = vec![1u8, 0, 0, 1];
        let guide = guide_from(&[0.9, 0.0, 0.0, 0.8], 2, 2);
        let out = isolate_whites(&bin, 2, 2, &guide, 1);
        assert_eq!(out, vec![1, 0, 0, 1]);
    }

    #[test]
    fn ties_keep_scan_order() {
        let bin = vec![1u8, 1];
        let guide = guide_from(&[0.5, 0.5], 2, 1);
        let out = isolate_whites(&bin, 2, 1, &guide, 1);
        assert_eq!(out, vec![1, 0]);
    }

    #[test]
    fn is_idempotent() {
        let w = 8;
        let h = 8;
        let mut bin = vec![0u8; w * h];
        let mut guide = ImageF32::new(w, h);
        for i in (0..w * h).step_by(3) {
            bin[i] = 1;
            guide.data[i] = ((i * 31) % 17) as f32 / 17.0;
        }
        let once = isolate_whites(&bin, w, h, &guide, 2);
        let twice = isolate_whites(&once, w, h, &guide, 2);
        assert_eq!(once, twice);
    }
}
