//! Light transfer: tone locking against an anchor and per-row gain.
//!
//! The anchor is the strongest foreground point (by edge + local detail)
//! inside an inner crop, so framing borders cannot win. Locking re-centers
//! local tone differences on the anchor tone, which keeps tonal comparisons
//! stable across the frame. The row gain equalizes foreground energy
//! vertically so one band cannot soak up the whole ink budget.

use crate::filters::{blur::box_blur, blur::box_blur_1d, percentile};
use crate::raster::ImageF32;

/// Tone channel anchored to a reference point plus the row equalizer.
#[derive(Clone, Debug)]
pub struct LightTransfer {
    /// Anchored tone in [0, 1].
    pub locked_tone: ImageF32,
    /// Per-row multiplicative gain, roughly within [0.72, 1.28].
    pub row_gain: Vec<f32>,
    /// Anchor pixel the tone was locked against.
    pub anchor: (usize, usize),
}

/// Build the light transfer from the normalized image, edge magnitude, and
/// the committed foreground mask.
pub fn build_light_transfer(norm: &ImageF32, mag: &ImageF32, fg_mask: &ImageF32) -> LightTransfer {
    let (w, h) = (norm.w, norm.h);
    let radius = (0.06 * w.min(h) as f32).round().max(10.0) as usize;
    let local_light = box_blur(norm, radius);

    let mut detail = ImageF32::new(w, h);
    for (d, (&n, &l)) in detail.data.iter_mut().zip(norm.data.iter().zip(&local_light.data)) {
        *d = (n - l).abs();
    }

    let anchor = find_anchor(mag, &detail, fg_mask);
    let ref_tone = norm.get(anchor.0, anchor.1);
    let ref_detail = detail.get(anchor.0, anchor.1);

    let gain = 1.1 + 1.6 * ref_detail;
    let mut locked_tone = ImageF32::new(w, h);
    for (o, (&n, &l)) in locked_tone
        .data
        .iter_mut()
        .zip(norm.data.iter().zip(&local_light.data))
    {
        *o = (ref_tone + (n - l) * gain).clamp(0.0, 1.0);
    }

    let mut row_energy = vec![0.0f32; h];
    for (y, e) in row_energy.iter_mut().enumerate() {
        let mut sum = 0.0;
        for x in 0..w {
            let i = y * w + x;
            sum += fg_mask.data[i]
                * (0.55 * mag.data[i] + 0.45 * (locked_tone.data[i] - ref_tone).abs());
        }
        *e = sum / w.max(1) as f32;
    }
    let smooth = box_blur_1d(&row_energy, 6);
    let mut sorted = smooth.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("row energy is finite"));
    let median = percentile::sorted_percentile(&sorted, 0.5);

    let row_gain = smooth
        .iter()
        .map(|&e| 0.72 + 0.56 * (median / e.max(1e-6)).clamp(0.0, 1.0))
        .collect();

    LightTransfer {
        locked_tone,
        row_gain,
        anchor,
    }
}

/// Strongest foreground pixel inside the inner crop; the whole frame is
/// searched when the crop collapses on tiny images.
fn find_anchor(mag: &ImageF32, detail: &ImageF32, fg_mask: &ImageF32) -> (usize, usize) {
    let (w, h) = (mag.w, mag.h);
    let (mut x0, mut x1) = ((0.15 * w as f32) as usize, (0.85 * w as f32) as usize);
    let (mut y0, mut y1) = ((0.2 * h as f32) as usize, (0.9 * h as f32) as usize);
    if x0 >= x1 {
        x0 = 0;
        x1 = w;
    }
    if y0 >= y1 {
        y0 = 0;
        y1 = h;
    }

    let mut best = (x0, y0);
    let mut best_score = f32::MIN;
    for y in y0..y1 {
        for x in x0..x1 {
            let i = y * w + x;
            let score = fg_mask.data[i] * (0.52 * mag.data[i] + 0.48 * detail.data[i]);
            if score > best_score {
                best_score = score;
                best = (x, y);
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::sobel_gradients;

    fn full_mask(w: usize, h: usize) -> ImageF32 {
        let mut m = ImageF32::new(w, h);
        m.data.fill(1.0);
        m
    }

    #[test]
    fn row_gain_stays_in_band() {
        let mut norm = ImageF32::new(40, 40);
        for y in 0..40 {
            for x in 0..40 {
                norm.set(x, y, if (x / 4 + y / 4) % 2 == 0 { 0.2 } else { 0.8 });
            }
        }
        let grad = sobel_gradients(&norm);
        let lt = build_light_transfer(&norm, &grad.mag, &full_mask(40, 40));
        assert_eq!(lt.row_gain.len(), 40);
        for &g in &lt.row_gain {
            assert!((0.72..=1.28).contains(&g), "gain out of band: {g}");
        }
    }

    #[test]
    fn energetic_rows_receive_less_gain() {
        let mut norm = ImageF32::new(32, 32);
        // Busy texture in the top half, flat bottom half.
        for y in 0..16 {
            for x in 0..32 {
                norm.set(x, y, if x % 2 == 0 { 0.1 } else { 0.9 });
            }
        }
        let grad = sobel_gradients(&norm);
        let lt = build_light_transfer(&norm, &grad.mag, &full_mask(32, 32));
        let top: f32 = lt.row_gain[..10].iter().sum::<f32>() / 10.0;
        let bottom: f32 = lt.row_gain[22..].iter().sum::<f32>() / 10.0;
        assert!(top < bottom, "top {top} should be attenuated below {bottom}");
    }

    #[test]
    fn anchor_lands_inside_inner_crop() {
        let mut norm = ImageF32::new(60, 60);
        for y in 20..40 {
            for x in 20..40 {
                norm.set(x, y, 1.0);
            }
        }
        let grad = sobel_gradients(&norm);
        let lt = build_light_transfer(&norm, &grad.mag, &full_mask(60, 60));
        let (ax, ay) = lt.anchor;
        assert!((9..51).contains(&ax), "anchor x {ax}");
        assert!((12..54).contains(&ay), "anchor y {ay}");
    }

    #[test]
    fn locked_tone_is_clamped() {
        let mut norm = ImageF32::new(20, 20);
        for (i, v) in norm.data.iter_mut().enumerate() {
            *v = ((i * 13) % 20) as f32 / 19.0;
        }
        let grad = sobel_gradients(&norm);
        let lt = build_light_transfer(&norm, &grad.mag, &full_mask(20, 20));
        assert!(lt.locked_tone.data.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn degenerate_single_pixel_does_not_panic() {
        let norm = ImageF32::new(1, 1);
        let grad = sobel_gradients(&norm);
        let lt = build_light_transfer(&norm, &grad.mag, &full_mask(1, 1));
        assert_eq!(lt.anchor, (0, 0));
        assert_eq!(lt.row_gain.len(), 1);
    }
}
