//! Diagnostic Overlay
//!
//! Renders glyph boxes onto a copy of the source image and exports glyph
//! crops, for checking what the sampler actually looked at.

use std::path::{Path, PathBuf};

use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use tracing::debug;

use crate::error::Result;
use crate::vision::PixelRect;

/// Copy of `image` with every non-degenerate rect outlined.
///
/// Rects are clipped to the image; `line_width` grows the outline inward.
pub fn annotate(
    image: &RgbaImage,
    rects: &[PixelRect],
    color: Rgba<u8>,
    line_width: u32,
) -> RgbaImage {
    let mut canvas = image.clone();
    let (width, height) = canvas.dimensions();

    for rect in rects {
        let Some((x, y, w, h)) = rect.clip_to(width, height) else {
            continue;
        };

        for inset in 0..line_width.max(1) {
            if w <= inset * 2 || h <= inset * 2 {
                break;
            }
            let outline = Rect::at((x + inset) as i32, (y + inset) as i32)
                .of_size(w - inset * 2, h - inset * 2);
            draw_hollow_rect_mut(&mut canvas, outline, color);
        }
    }

    canvas
}

/// Enlarge a crop for inspection. A scale of 0 or 1 returns a copy.
pub fn upscale_crop(crop: &RgbaImage, scale: u32) -> RgbaImage {
    if scale <= 1 {
        return crop.clone();
    }
    let (width, height) = crop.dimensions();
    imageops::resize(crop, width * scale, height * scale, imageops::FilterType::Nearest)
}

/// Write crops as `{stem}_{index}.png` in `dir`, skipping missing ones.
/// Returns the written paths.
pub fn write_crops(
    dir: &Path,
    stem: &str,
    crops: &[Option<RgbaImage>],
    scale: u32,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for (index, crop) in crops.iter().enumerate() {
        let Some(crop) = crop else {
            continue;
        };
        let path = dir.join(format!("{stem}_{index:03}.png"));
        upscale_crop(crop, scale).save(&path)?;
        written.push(path);
    }

    debug!("Wrote {} crops to {:?}", written.len(), dir);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn test_annotate_outlines_rect() {
        let image = RgbaImage::from_pixel(10, 10, WHITE);
        let out = annotate(&image, &[PixelRect::new(2.0, 2.0, 5.0, 5.0)], RED, 1);

        assert_eq!(out.get_pixel(2, 2), &RED);
        assert_eq!(out.get_pixel(6, 6), &RED);
        assert_eq!(out.get_pixel(4, 4), &WHITE);
        assert_eq!(out.get_pixel(0, 0), &WHITE);
        // Source untouched
        assert_eq!(image.get_pixel(2, 2), &WHITE);
    }

    #[test]
    fn test_annotate_line_width() {
        let image = RgbaImage::from_pixel(10, 10, WHITE);
        let out = annotate(&image, &[PixelRect::new(0.0, 0.0, 10.0, 10.0)], RED, 2);

        assert_eq!(out.get_pixel(1, 5), &RED);
        assert_eq!(out.get_pixel(2, 5), &WHITE);
    }

    #[test]
    fn test_annotate_skips_degenerate() {
        let image = RgbaImage::from_pixel(4, 4, WHITE);
        let rects = [PixelRect::default(), PixelRect::new(50.0, 50.0, 2.0, 2.0)];
        assert_eq!(annotate(&image, &rects, RED, 2), image);
    }

    #[test]
    fn test_upscale_crop() {
        let crop = RgbaImage::from_pixel(2, 3, RED);
        assert_eq!(upscale_crop(&crop, 4).dimensions(), (8, 12));
        assert_eq!(upscale_crop(&crop, 0).dimensions(), (2, 3));
    }

    #[test]
    fn test_write_crops() {
        let dir = tempdir().unwrap();
        let crops = vec![
            Some(RgbaImage::from_pixel(1, 1, RED)),
            None,
            Some(RgbaImage::from_pixel(2, 1, WHITE)),
        ];

        let written = write_crops(dir.path(), "line0", &crops, 2).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[1].ends_with("line0_002.png"));

        let reloaded = image::open(&written[1]).unwrap().to_rgba8();
        assert_eq!(reloaded.dimensions(), (4, 2));
    }
}
