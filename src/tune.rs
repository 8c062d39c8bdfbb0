//! Threshold auto-tune: a damped search over the dither threshold.
//!
//! Eight iterations adjust one scalar threshold against a composite cost of
//! coverage distance, component overflow, emptiness, edge misalignment, and
//! top-heaviness. The step decays by 0.62 each round, so the search stays
//! within 0.42 of the starting threshold. When even the best iteration
//! cannot reach the coverage floor, a rescue pass re-runs the whole search
//! against a contrast-boosted map.

use log::debug;

use crate::binary::{component_stats, dither, post_process, ComponentStats};
use crate::filters::percentile;
use crate::metrics::{band_densities, edge_alignment, white_ratio, RenderMetrics};
use crate::presets::Preset;
use crate::raster::ImageF32;

/// Iterations per tuning pass; the metrics always report this count.
pub const TUNE_ITERATIONS: u32 = 8;

const INITIAL_STEP: f32 = 0.16;
const STEP_DECAY: f32 = 0.62;

struct Candidate {
    cost: f32,
    coverage: f32,
    stats: ComponentStats,
    alignment: f32,
    binary: Vec<u8>,
}

/// Binarize the ink map with the preset's tuned threshold and report the
/// winning raster plus its measurements.
pub fn tune_threshold(
    ink: &ImageF32,
    mag: &ImageF32,
    preset: &Preset,
    fallback_segmentation: bool,
) -> (Vec<u8>, RenderMetrics) {
    let mut best: Option<Candidate> = None;
    run_pass(ink, mag, preset, &mut best);

    let starved = best
        .as_ref()
        .map(|b| b.coverage < 0.9 * preset.min_white_coverage_floor)
        .unwrap_or(true);
    if starved {
        debug!(
            "tune_threshold coverage starved (floor {:.3}), boosting ink map",
            preset.min_white_coverage_floor
        );
        let boosted = boost_map(ink);
        run_pass(&boosted, mag, preset, &mut best);
    }

    let best = best.expect("tuning always produces at least one candidate");
    let metrics = RenderMetrics::from_parts(
        best.coverage,
        best.stats,
        best.alignment,
        fallback_segmentation,
        TUNE_ITERATIONS,
    );
    (best.binary, metrics)
}

/// One eight-iteration search; keeps the globally best candidate.
fn run_pass(ink: &ImageF32, mag: &ImageF32, preset: &Preset, best: &mut Option<Candidate>) {
    let (w, h) = (ink.w, ink.h);
    let target = preset.white_coverage_target;
    let mut threshold = 0.34 + 0.04 * preset.spaceiness;
    let mut step = INITIAL_STEP;

    for iteration in 1..=TUNE_ITERATIONS {
        let raw = dither(ink, preset.dither, threshold);
        let mut post = post_process(&raw, w, h, preset, ink, true);
        let mut coverage = white_ratio(&post);
        if coverage < preset.min_white_coverage_floor && preset.isolate_whites {
            post = post_process(&raw, w, h, preset, ink, false);
            coverage = white_ratio(&post);
        }

        let stats = component_stats(&post, w, h);
        let alignment = edge_alignment(&post, mag);
        let (top_density, low_density) = band_densities(&post, w, h);
        let cost = candidate_cost(coverage, &stats, alignment, top_density, low_density, preset);
        debug!(
            "tune_threshold iter={} t={:.4} coverage={:.4} components={} cost={:.4}",
            iteration, threshold, coverage, stats.count, cost
        );

        if best.as_ref().map(|b| cost < b.cost).unwrap_or(true) {
            *best = Some(Candidate {
                cost,
                coverage,
                stats,
                alignment,
                binary: post,
            });
        }

        if coverage > target {
            threshold += step;
        } else {
            threshold -= step;
        }
        threshold = threshold.clamp(0.0, 1.0);
        step *= STEP_DECAY;
    }
}

fn candidate_cost(
    coverage: f32,
    stats: &ComponentStats,
    alignment: f32,
    top_density: f32,
    low_density: f32,
    preset: &Preset,
) -> f32 {
    let max_count = preset.component_max_count as f32;
    let mut cost = (coverage - preset.white_coverage_target).abs()
        / preset.coverage_tolerance.max(0.01);
    cost += (stats.count as f32 - max_count).max(0.0) / max_count.max(1.0);
    if stats.count == 0 {
        cost += 2.0;
    }
    cost += 1.4 * (0.28 - alignment).max(0.0);
    cost += 18.0 * (top_density - 1.15 * low_density).max(0.0);
    cost
}

/// Rescue-pass contrast boost: widen the stretch, lift the midtones.
fn boost_map(ink: &ImageF32) -> ImageF32 {
    let mut boosted = ink.clone();
    percentile::normalize(&mut boosted.data, 0.005, 0.985);
    for v in &mut boosted.data {
        *v = (v.powf(0.74) * 1.35).clamp(0.0, 1.0);
    }
    boosted
}
