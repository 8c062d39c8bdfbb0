//! Shared low-level filters: separable box blur and percentile statistics.
//!
//! Every smoothing step in the pipeline is a box blur with clamped edges,
//! and every contrast decision goes through the 256-bin percentile
//! machinery, so both live here rather than with any single stage.

pub mod blur;
pub mod percentile;

pub use blur::{box_blur, box_blur_1d};
pub use percentile::{histogram_threshold, normalize, sorted_percentile};
