//! Separable box blur with rolling-window sums.
//!
//! Reads outside the image clamp to the nearest valid column/row, so the
//! window always averages `2r + 1` samples. The horizontal pass writes a
//! temporary, the vertical pass writes the destination; each pass updates a
//! running sum instead of reconvolving, keeping the cost O(w·h) regardless
//! of radius.

use crate::raster::ImageF32;

/// Blur `src` with a square window of radius `r`. `r == 0` is identity.
pub fn box_blur(src: &ImageF32, r: usize) -> ImageF32 {
    if r == 0 || src.w == 0 || src.h == 0 {
        return src.clone();
    }
    let (w, h) = (src.w, src.h);
    let win = (2 * r + 1) as f32;
    let inv = 1.0 / win;

    // Horizontal pass.
    let mut tmp = ImageF32::new(w, h);
    for y in 0..h {
        let row = src.row(y);
        let out = tmp.row_mut(y);
        let mut sum = 0.0f32;
        for i in 0..=2 * r {
            let xi = i.saturating_sub(r).min(w - 1);
            sum += row[xi];
        }
        for x in 0..w {
            out[x] = sum * inv;
            let add = row[(x + r + 1).min(w - 1)];
            let sub = row[x.saturating_sub(r)];
            sum += add - sub;
        }
    }

    // Vertical pass with one running sum per column.
    let mut dst = ImageF32::new(w, h);
    let mut sums = vec![0.0f32; w];
    for i in 0..=2 * r {
        let yi = i.saturating_sub(r).min(h - 1);
        let row = tmp.row(yi);
        for (s, &v) in sums.iter_mut().zip(row) {
            *s += v;
        }
    }
    for y in 0..h {
        {
            let out = dst.row_mut(y);
            for (o, &s) in out.iter_mut().zip(&sums) {
                *o = s * inv;
            }
        }
        let add_row = tmp.row((y + r + 1).min(h - 1));
        let sub_row = tmp.row(y.saturating_sub(r));
        for ((s, &a), &b) in sums.iter_mut().zip(add_row).zip(sub_row) {
            *s += a - b;
        }
    }
    dst
}

/// One-dimensional box blur of radius `r` with clamped ends.
pub fn box_blur_1d(values: &[f32], r: usize) -> Vec<f32> {
    let n = values.len();
    if r == 0 || n == 0 {
        return values.to_vec();
    }
    let inv = 1.0 / (2 * r + 1) as f32;
    let mut out = vec![0.0f32; n];
    let mut sum = 0.0f32;
    for i in 0..=2 * r {
        sum += values[i.saturating_sub(r).min(n - 1)];
    }
    for (x, o) in out.iter_mut().enumerate() {
        *o = sum * inv;
        sum += values[(x + r + 1).min(n - 1)] - values[x.saturating_sub(r)];
    }
    out
}
