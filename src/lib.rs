#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod diagnostics;
pub mod metrics;
pub mod presets;
pub mod raster;
pub mod renderer;

// Pipeline internals – still public so tools and tests can reach each
// stage, but considered unstable.
pub mod binary;
pub mod edges;
pub mod filters;
pub mod foreground;
pub mod ink;
pub mod light;
pub mod tone;
pub mod tune;

// --- High-level re-exports -------------------------------------------------

// Main entry points: renderer + results.
pub use crate::ink::FrameModulation;
pub use crate::metrics::RenderMetrics;
pub use crate::presets::{DitherMode, Preset};
pub use crate::renderer::{Analysis, InkRenderer, RenderedFrame};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use duotone::prelude::*;
///
/// # fn main() {
/// let (w, h) = (64usize, 48usize);
/// let rgb = vec![128u8; w * h * 3];
/// let image = RgbImageU8::packed(w, h, &rgb);
///
/// let renderer = InkRenderer::new(Preset::named("silhouette-etch"));
/// let frame = renderer.process(&image).expect("render");
/// println!(
///     "coverage={:.3} components={}",
///     frame.metrics.white_ratio, frame.metrics.component_count
/// );
/// # }
/// ```
pub mod prelude {
    pub use crate::raster::RgbImageU8;
    pub use crate::{FrameModulation, InkRenderer, Preset, RenderedFrame};
}
