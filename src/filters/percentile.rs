//! Percentile statistics over f32 buffers.
//!
//! The stretch works on a 256-bin histogram of values rounded to the
//! nearest integer in 0–255: the low (high) reference is the smallest bin
//! whose cumulative count reaches `p · N`. The high reference is kept at
//! least one bin above the low one so the mapping never divides by zero.

/// Number of histogram bins used by the stretch and threshold helpers.
const BINS: usize = 256;

fn histogram(values: &[f32]) -> [u32; BINS] {
    let mut hist = [0u32; BINS];
    for &v in values {
        let bin = (v.clamp(0.0, 1.0) * 255.0).round() as usize;
        hist[bin] += 1;
    }
    hist
}

fn cumulative_bin(hist: &[u32; BINS], target: f32) -> usize {
    let mut cum = 0u32;
    for (i, &count) in hist.iter().enumerate() {
        cum += count;
        if cum as f32 >= target {
            return i;
        }
    }
    BINS - 1
}

/// Stretch `values` in place so that the `p_low` and `p_high` percentiles
/// map to 0 and 1, clamping the rest.
pub fn normalize(values: &mut [f32], p_low: f32, p_high: f32) {
    if values.is_empty() {
        return;
    }
    let n = values.len() as f32;
    let hist = histogram(values);
    let low_bin = cumulative_bin(&hist, p_low * n);
    let high_bin = cumulative_bin(&hist, p_high * n);
    let low = low_bin as f32 / 255.0;
    let high = (high_bin as f32 / 255.0).max(low + 1.0 / 255.0);
    let inv = 1.0 / (high - low);
    for v in values {
        *v = ((*v - low) * inv).clamp(0.0, 1.0);
    }
}

/// The value (bin center over 255) below which a `q` fraction of samples
/// falls, using the same cumulative-histogram rule as [`normalize`].
pub fn histogram_threshold(values: &[f32], q: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let hist = histogram(values);
    let bin = cumulative_bin(&hist, q * values.len() as f32);
    bin as f32 / 255.0
}

/// Percentile of an ascending-sorted slice via nearest-rank interpolation.
pub fn sorted_percentile(sorted: &[f32], q: f32) -> f32 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = (q * (sorted.len() - 1) as f32).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}
