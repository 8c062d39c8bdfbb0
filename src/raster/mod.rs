//! Raster buffer types and boundary I/O.
//!
//! All pipeline buffers are row-major with origin top-left and
//! `stride == width`. The numeric core works on [`ImageF32`]; the decoded
//! input arrives as a borrowed [`RgbImageU8`] view; [`io`] holds the
//! PNG/JSON helpers used by the demo binary and tests.

pub mod f32;
pub mod io;
pub mod rgb;

pub use self::f32::ImageF32;
pub use self::rgb::RgbImageU8;
