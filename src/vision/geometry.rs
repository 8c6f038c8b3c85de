//! Glyph box geometry
//!
//! OCR engines report boxes in a normalized unit square with the origin at the
//! bottom-left corner. Images are addressed in pixels from the top-left corner.
//! This module holds both representations and the mapping between them.

use serde::{Deserialize, Serialize};

/// Bounding box in normalized OCR space (0.0 - 1.0, origin bottom-left)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedBox {
    /// The zero box, used wherever a range has no usable bounds
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Whether the box encloses no area
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Smallest box containing both `self` and `other`
    pub fn union(&self, other: &Self) -> Self {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = (self.x + self.width).max(other.x + other.width);
        let max_y = (self.y + self.height).max(other.y + other.height);

        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    /// Map into top-left-origin pixel space for an image of the given size.
    ///
    /// The vertical axis is flipped. No clamping happens here; rectangles that
    /// fall outside the image are the sampler's problem.
    pub fn to_pixel_rect(&self, image_width: u32, image_height: u32) -> PixelRect {
        let w = image_width as f64;
        let h = image_height as f64;

        PixelRect {
            x: self.x * w,
            y: (1.0 - self.y - self.height) * h,
            width: self.width * w,
            height: self.height * h,
        }
    }
}

/// Rectangle in image pixel space (origin top-left)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Whether the rect is zero-sized, inverted or non-finite
    pub fn is_degenerate(&self) -> bool {
        let finite = self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite();
        !finite || self.width <= 0.0 || self.height <= 0.0
    }

    /// Integral pixel bounds of the rect clipped to a `width` x `height` image.
    ///
    /// Edges are expanded outward to whole pixels before clipping.
    /// Returns `(x, y, width, height)`, or `None` when nothing is left.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        if self.is_degenerate() {
            return None;
        }

        let left = self.x.floor().max(0.0);
        let top = self.y.floor().max(0.0);
        let right = (self.x + self.width).ceil().min(width as f64);
        let bottom = (self.y + self.height).ceil().min(height as f64);

        if right <= left || bottom <= top {
            return None;
        }

        Some((
            left as u32,
            top as u32,
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    }
}

/// Map a normalized box to pixel space
pub fn to_pixel_rect(bbox: &NormalizedBox, image_width: u32, image_height: u32) -> PixelRect {
    bbox.to_pixel_rect(image_width, image_height)
}
