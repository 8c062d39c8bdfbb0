//! Ink-probability map: the weighted blend the binarizer draws from.
//!
//! Each pixel combines edge response, anchored fill tone, local detail,
//! an oriented stripe texture, deterministic grain, and a flowing band
//! term, then passes through the suppression gates (background, luminance,
//! center, top fade, row gain, stipple). The per-pixel pass is pure, so it
//! runs row-parallel with a bit-identical result.

pub mod grain;
pub mod rebalance;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::edges::Grad;
use crate::filters::{blur::box_blur, percentile};
use crate::light::LightTransfer;
use crate::presets::Preset;
use crate::raster::ImageF32;

pub use grain::grain;
pub use rebalance::rebalance_rows;

/// Optional per-frame modulation; all zeros for still transforms.
///
/// Only the ink-map builder consults it. The analysis stages are
/// modulation-independent, so many frames can be rendered cheaply from one
/// [`crate::renderer::Analysis`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrameModulation {
    /// Phase offset fed into the stripe and band oscillators.
    pub phase: f32,
    /// Strength of the flow-following gain, in [0, 1].
    pub flow_strength: f32,
    /// Extra grain amplitude, in [0, 1].
    pub jitter: f32,
}

/// Build the ink-probability map for one frame.
pub fn build_ink_map(
    norm: &ImageF32,
    grad: &Grad,
    fg_mask: &ImageF32,
    light: &LightTransfer,
    preset: &Preset,
    modulation: FrameModulation,
) -> ImageF32 {
    let (w, h) = (norm.w, norm.h);
    let mut out = ImageF32::new(w, h);
    if w == 0 || h == 0 {
        return out;
    }

    let mut detail = box_blur(norm, 2);
    for (d, &n) in detail.data.iter_mut().zip(&norm.data) {
        *d = (n - *d).abs();
    }
    let mid_radius = (0.5 * preset.grain_scale).round().max(2.0) as usize;
    let far_radius = (1.5 * preset.grain_scale).round().max(4.0) as usize;
    let edge_near = box_blur(&grad.mag, 1);
    let edge_mid = box_blur(&grad.mag, mid_radius);
    let edge_far = box_blur(&grad.mag, far_radius);

    let grain_inv = 1.0 / preset.grain_scale.max(1.0);
    let bg_exp = 0.8 + preset.background_suppression;
    let luma_exp = 0.8 + preset.luma_suppression;
    let noise_scale = 0.32 + 0.12 * modulation.jitter;
    let stipple_cut = 0.72 * preset.spaceiness;
    let half_w = 0.5 * w as f32;
    let inv_cx = 1.0 / (0.34 * w as f32);
    let y_center = 0.58 * h as f32;
    let inv_cy = 1.0 / (0.34 * h as f32);
    let inv_h = if h > 1 { 1.0 / (h - 1) as f32 } else { 0.0 };

    out.data
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, row)| {
            let base = y * w;
            let y_norm = y as f32 * inv_h;
            let dy = (y as f32 - y_center) * inv_cy;
            let top_fade =
                1.0 - preset.top_suppression * ((0.28 - y_norm) / 0.28).clamp(0.0, 1.0);
            let row_gain = light.row_gain[y];

            for (x, o) in row.iter_mut().enumerate() {
                let i = base + x;
                let mag = grad.mag.data[i];
                let mask = fg_mask.data[i];
                let locked = light.locked_tone.data[i];

                let edge = mag.powf(preset.edge_gamma);
                let fill = locked.powf(preset.fill_gamma) * mask;

                let angle = (grad.gy.data[i] + 1e-6).atan2(grad.gx.data[i] + 1e-6);
                let oriented = (x as f32 * angle.cos() + y as f32 * angle.sin()) * grain_inv;
                let stripe =
                    0.5 * (2.2 * oriented + 2.6 * angle + 0.7 * modulation.phase).sin() + 0.5;
                let noise = grain(x, y);
                let texture = (0.75 * stripe + noise * noise_scale).clamp(0.0, 1.0);

                let flow = (0.35 * edge_near.data[i]
                    + 0.35 * edge_mid.data[i]
                    + 0.30 * edge_far.data[i])
                    .clamp(0.0, 1.0);
                let wave = locked * 1.6 + flow * 2.4 + oriented * 0.08 + modulation.phase;
                let ghost_band =
                    (PI * preset.band_frequency * wave).sin().abs().powf(2.2) * flow.powf(0.9);

                let stipple_keep = if noise > stipple_cut { 1.0 } else { 0.45 };
                let bg_kill = mask.powf(bg_exp);
                let dark_prior = (1.0 - locked).powf(luma_exp);
                let luma_gate = 0.2 + 0.8 * dark_prior;
                let dx = (x as f32 - half_w) * inv_cx;
                let center_field = (-(dx * dx + dy * dy)).exp();
                let center_gate = (1.0 - preset.center_focus)
                    + preset.center_focus * (0.35 + 0.65 * center_field).clamp(0.0, 1.0);
                let flow_boost = 1.0 + modulation.flow_strength * (flow - 0.45) * 0.3;

                let mut v = preset.edge_weight * edge
                    + preset.fill_weight * fill
                    + 0.28 * detail.data[i] * mask
                    + preset.texture_weight * texture * mask
                    + preset.ghost_weight * ghost_band * mask;
                v *= (0.3 + 0.7 * bg_kill)
                    * luma_gate
                    * center_gate
                    * top_fade
                    * row_gain
                    * stipple_keep
                    * flow_boost;
                *o = v.clamp(0.0, 1.0);
            }
        });

    let smooth_radius = preset.smoothing.round().max(0.0) as usize;
    let mut ink = box_blur(&out, smooth_radius);
    rebalance_rows(&mut ink, fg_mask);
    percentile::normalize(&mut ink.data, 0.01, 0.99);
    ink
}
