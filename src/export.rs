//! Frame export.

use std::path::Path;

use image::RgbaImage;

use crate::canvas::Framebuffer;
use crate::error::ExportError;

/// Copy the framebuffer into an owned image.
pub fn to_image(frame: &Framebuffer) -> Result<RgbaImage, ExportError> {
    let (width, height) = (frame.width(), frame.height());
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyFrame { width, height });
    }
    RgbaImage::from_raw(width, height, frame.pixels().to_vec())
        .ok_or(ExportError::EmptyFrame { width, height })
}

/// Save the framebuffer as a PNG. The format follows the file extension.
pub fn save_png(frame: &Framebuffer, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    to_image(frame)?.save(path)?;
    log::info!("saved frame {}x{} to {}", frame.width(), frame.height(), path.display());
    Ok(())
}

/// A timestamped file name for screenshots.
pub fn screenshot_name(frame_number: u64) -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("stormwave-{secs}-{frame_number:06}.png")
}
