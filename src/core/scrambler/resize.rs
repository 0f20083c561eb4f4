//! Tile resizing.
//!
//! Uses fast_image_resize, which picks AVX2/NEON SIMD when available.

use crate::error::ProcessError;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::RgbImage;

/// Reusable RGB resizer for tile placement
pub struct TileResizer {
    resizer: Resizer,
    options: ResizeOptions,
}

impl TileResizer {
    /// Create a resizer using bilinear convolution
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
            options: ResizeOptions::new()
                .resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
        }
    }

    /// Stretch or shrink `tile` to exactly `width x height`.
    pub fn resize(
        &mut self,
        tile: &RgbImage,
        width: u32,
        height: u32,
    ) -> Result<RgbImage, ProcessError> {
        let (src_width, src_height) = tile.dimensions();
        if src_width == 0 || src_height == 0 {
            return Err(ProcessError::Resize(format!(
                "Invalid source dimensions {}x{}",
                src_width, src_height
            )));
        }
        if width == 0 || height == 0 {
            return Err(ProcessError::Resize(format!(
                "Invalid destination dimensions {}x{}",
                width, height
            )));
        }

        let src_image = Image::from_vec_u8(src_width, src_height, tile.as_raw().clone(), PixelType::U8x3)
            .map_err(|e| ProcessError::Resize(format!("Failed to create source image: {}", e)))?;

        let mut dst_image = Image::new(width, height, PixelType::U8x3);

        self.resizer
            .resize(&src_image, &mut dst_image, &self.options)
            .map_err(|e| ProcessError::Resize(e.to_string()))?;

        RgbImage::from_raw(width, height, dst_image.into_vec())
            .ok_or_else(|| ProcessError::Resize("Failed to create result buffer".to_string()))
    }
}

impl Default for TileResizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 77])
        })
    }

    #[test]
    fn resize_produces_requested_dimensions() {
        let mut resizer = TileResizer::new();

        let stretched = resizer.resize(&gradient(10, 6), 23, 17).unwrap();
        assert_eq!(stretched.dimensions(), (23, 17));

        let shrunk = resizer.resize(&gradient(40, 40), 3, 9).unwrap();
        assert_eq!(shrunk.dimensions(), (3, 9));
    }

    #[test]
    fn solid_tile_stays_solid() {
        let mut resizer = TileResizer::new();
        let tile = RgbImage::from_pixel(7, 5, Rgb([200, 40, 10]));

        let resized = resizer.resize(&tile, 13, 2).unwrap();

        for pixel in resized.pixels() {
            assert!(pixel.0[0].abs_diff(200) <= 1);
            assert!(pixel.0[1].abs_diff(40) <= 1);
            assert!(pixel.0[2].abs_diff(10) <= 1);
        }
    }

    #[test]
    fn empty_dimensions_are_rejected() {
        let mut resizer = TileResizer::new();
        assert!(resizer.resize(&RgbImage::new(0, 4), 4, 4).is_err());
        assert!(resizer.resize(&gradient(4, 4), 0, 4).is_err());
    }
}
