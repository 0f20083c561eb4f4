//! Image file decoding and encoding.
//!
//! Everything the scrambler touches is normalised to 8-bit RGB on load; the
//! output encoder is chosen from the destination extension.

use crate::error::ProcessError;
use image::{ImageReader, RgbImage};
use std::path::Path;

/// Decode an image file into an RGB buffer.
///
/// The format is sniffed from the file contents, so a mislabelled
/// extension still decodes.
pub fn open_rgb(path: &Path) -> Result<RgbImage, ProcessError> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| ProcessError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

    let decoded = reader.decode().map_err(|e| ProcessError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(decoded.to_rgb8())
}

/// Encode an RGB buffer to `path` in the format implied by its extension.
pub fn save_rgb(image: &RgbImage, path: &Path) -> Result<(), ProcessError> {
    image.save(path).map_err(|e| ProcessError::Encode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
