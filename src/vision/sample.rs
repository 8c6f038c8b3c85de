//! Region sampling
//!
//! Averages the color under a glyph's pixel rectangle.

use image::{imageops, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::vision::geometry::PixelRect;

/// Mean color of a region, channels normalized to 0.0 - 1.0
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorSample {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl ColorSample {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Mean RGB color of the pixels inside `rect`, alpha ignored.
///
/// The rect is expanded to whole pixels and clipped to the image. Returns
/// `None` if it is degenerate or does not overlap the image.
pub fn sample(image: &RgbaImage, rect: &PixelRect) -> Option<ColorSample> {
    let (x, y, width, height) = rect.clip_to(image.width(), image.height())?;

    let mut sums = [0u64; 3];
    for py in y..y + height {
        for px in x..x + width {
            let pixel = image.get_pixel(px, py);
            sums[0] += pixel[0] as u64;
            sums[1] += pixel[1] as u64;
            sums[2] += pixel[2] as u64;
        }
    }

    let count = (width as u64 * height as u64) as f64 * 255.0;
    Some(ColorSample {
        r: (sums[0] as f64 / count) as f32,
        g: (sums[1] as f64 / count) as f32,
        b: (sums[2] as f64 / count) as f32,
    })
}

/// Copy of the pixels inside `rect`, with the same clipping as [`sample`]
pub fn crop(image: &RgbaImage, rect: &PixelRect) -> Option<RgbaImage> {
    let (x, y, width, height) = rect.clip_to(image.width(), image.height())?;
    Some(imageops::crop_imm(image, x, y, width, height).to_image())
}
