//! Solid border detection over the outer pixel ring.

use crate::core::codec::open_rgb;
use crate::error::ProcessError;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default band thickness in pixels
pub const DEFAULT_BORDER_WIDTH: u32 = 6;
/// Default maximum per-channel deviation from the band mean
pub const DEFAULT_TOLERANCE: f64 = 10.0;

/// Parameters for the border check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderConfig {
    /// Depth of each band in pixels
    pub width: u32,
    /// Deviations strictly below this count as solid
    pub tolerance: f64,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BORDER_WIDTH,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Measurements taken over the border bands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorderReport {
    /// Per-channel mean of all band pixels
    pub mean: [f64; 3],
    /// Largest absolute channel deviation from the mean
    pub max_deviation: f64,
    /// Number of band pixels sampled (corners counted twice)
    pub pixels_sampled: usize,
    /// Whether the bands form a solid border
    pub has_border: bool,
}

/// Iterate the top, bottom, left and right bands in that order.
///
/// Bands are clamped to the image, so on small images they overlap and
/// pixels repeat. Corner pixels always appear in two bands.
fn band_pixels(image: &RgbImage, border_width: u32) -> impl Iterator<Item = [u8; 3]> + '_ {
    let (width, height) = image.dimensions();
    let band_h = border_width.min(height);
    let band_w = border_width.min(width);

    let top = (0..band_h).flat_map(move |y| (0..width).map(move |x| (x, y)));
    let bottom = (height - band_h..height).flat_map(move |y| (0..width).map(move |x| (x, y)));
    let left = (0..height).flat_map(move |y| (0..band_w).map(move |x| (x, y)));
    let right = (0..height).flat_map(move |y| (width - band_w..width).map(move |x| (x, y)));

    top.chain(bottom)
        .chain(left)
        .chain(right)
        .map(move |(x, y)| image.get_pixel(x, y).0)
}

/// Measure the border bands of `image`.
///
/// An image with no band pixels (zero area, or a zero band width) is never
/// reported as bordered.
pub fn analyze(image: &RgbImage, config: &BorderConfig) -> BorderReport {
    let mut sums = [0u64; 3];
    let mut count = 0usize;
    for pixel in band_pixels(image, config.width) {
        for (sum, channel) in sums.iter_mut().zip(pixel) {
            *sum += u64::from(channel);
        }
        count += 1;
    }

    if count == 0 {
        return BorderReport {
            mean: [0.0; 3],
            max_deviation: 0.0,
            pixels_sampled: 0,
            has_border: false,
        };
    }

    let mean = sums.map(|sum| sum as f64 / count as f64);

    let max_deviation = band_pixels(image, config.width)
        .flat_map(|pixel| {
            pixel
                .into_iter()
                .zip(mean)
                .map(|(channel, m)| (f64::from(channel) - m).abs())
        })
        .fold(0.0_f64, f64::max);

    BorderReport {
        mean,
        max_deviation,
        pixels_sampled: count,
        has_border: max_deviation < config.tolerance,
    }
}

/// True when every band pixel is within `tolerance` of the band mean on
/// every channel.
pub fn has_border(image: &RgbImage, config: &BorderConfig) -> bool {
    analyze(image, config).has_border
}

/// Runs the border check against image files
#[derive(Debug, Clone, Default)]
pub struct BorderDetector {
    config: BorderConfig,
}

impl BorderDetector {
    /// Create a detector with the given parameters
    pub fn new(config: BorderConfig) -> Self {
        Self { config }
    }

    /// Decode `path` and measure its border bands.
    pub fn check_path(&self, path: &Path) -> Result<BorderReport, ProcessError> {
        let image = open_rgb(path)?;
        Ok(analyze(&image, &self.config))
    }
}
