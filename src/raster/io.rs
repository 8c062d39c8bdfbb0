//! I/O helpers for the pipeline boundary.
//!
//! - `load_rgb_image`: read a PNG/JPEG/etc. into an owned RGB8 buffer with a
//!   bounded longer edge.
//! - `save_binary_png`: write a 0/255 raster to a single-channel PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::RgbImageU8;
use image::imageops::FilterType;
use image::GrayImage;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned interleaved RGB8 buffer with borrowed view conversion.
#[derive(Clone, Debug)]
pub struct RgbBufferU8 {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbBufferU8 {
    /// Construct an owned RGB buffer from raw interleaved bytes.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Borrow as a read-only `RgbImageU8` view
    pub fn as_view(&self) -> RgbImageU8<'_> {
        RgbImageU8 {
            w: self.width,
            h: self.height,
            stride: self.width * 3,
            data: &self.data,
        }
    }
}

/// Load an image from disk, convert to RGB8, and bound the longer edge to
/// `max_edge` pixels (never enlarging).
pub fn load_rgb_image(path: &Path, max_edge: u32) -> Result<RgbBufferU8, String> {
    let img =
        image::open(path).map_err(|e| format!("cannot decode {}: {e}", path.display()))?;
    let img = if img.width().max(img.height()) > max_edge && max_edge > 0 {
        img.resize(max_edge, max_edge, FilterType::CatmullRom)
    } else {
        img
    };
    let rgb = img.to_rgb8();
    let width = rgb.width() as usize;
    let height = rgb.height() as usize;
    Ok(RgbBufferU8::new(width, height, rgb.into_raw()))
}

/// Save a 0/255 single-channel raster to a PNG.
pub fn save_binary_png(pixels: &[u8], w: usize, h: usize, path: &Path) -> Result<(), String> {
    create_parent(path)?;
    let image = GrayImage::from_raw(w as u32, h as u32, pixels.to_vec())
        .ok_or_else(|| format!("raster does not fill a {w}x{h} gray image"))?;
    image
        .save(path)
        .map_err(|e| format!("cannot encode {}: {e}", path.display()))
}

/// Serialize `value` as pretty JSON at `path`, creating missing parent
/// directories on the way.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    let body = serde_json::to_string_pretty(value)
        .map_err(|e| format!("cannot encode report for {}: {e}", path.display()))?;
    create_parent(path)?;
    fs::write(path, body).map_err(|e| format!("cannot write {}: {e}", path.display()))
}

fn create_parent(path: &Path) -> Result<(), String> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
            .map_err(|e| format!("cannot create directory {}: {e}", dir.display())),
        _ => Ok(()),
    }
}
