//! Glyph segmentation
//!
//! Splits a recognized line into per-character ranges and asks the OCR engine
//! for the box of each one.
//!
//! The output is asymmetric and downstream alignment relies on it:
//! - a line of `n >= 2` characters yields `n - 1` ranges `[i, i + 1)` for
//!   `i` in `0..n - 1`, so the final character never gets a box;
//! - a line of fewer than 2 characters yields one sentinel covering the whole
//!   line, which always maps to the zero box since the range query cannot
//!   bound it precisely.
//!
//! Characters are Unicode scalar values (`char`), not grapheme clusters: a
//! letter followed by a combining mark is two characters and gets two ranges.

use std::ops::Range;

use tracing::warn;

use crate::vision::geometry::NormalizedBox;
use crate::vision::ocr::GlyphLocator;

/// One segmented glyph position
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphSpan {
    /// First character of the range, if any
    pub character: Option<char>,
    /// Half-open character range into the line
    pub range: Range<usize>,
    /// Whether this is the short-line sentinel
    pub sentinel: bool,
}

/// Segment `text` into the ranges the box query is asked about. Ranges
/// index `text.chars()`.
pub fn segment(text: &str) -> Vec<GlyphSpan> {
    let chars: Vec<char> = text.chars().collect();

    if chars.len() < 2 {
        return vec![GlyphSpan {
            character: chars.first().copied(),
            range: 0..chars.len(),
            sentinel: true,
        }];
    }

    chars[..chars.len() - 1]
        .iter()
        .enumerate()
        .map(|(i, &c)| GlyphSpan {
            character: Some(c),
            range: i..i + 1,
            sentinel: false,
        })
        .collect()
}

/// Resolve each span to a normalized box. Never fails: spans the locator
/// cannot bound get [`NormalizedBox::ZERO`].
pub fn locate<L: GlyphLocator + ?Sized>(spans: &[GlyphSpan], locator: &L) -> Vec<NormalizedBox> {
    spans
        .iter()
        .map(|span| {
            if span.sentinel {
                return NormalizedBox::ZERO;
            }
            match locator.bounding_box(span.range.clone()) {
                Some(bbox) => bbox,
                None => {
                    warn!("No box for range {:?}, using zero box", span.range);
                    NormalizedBox::ZERO
                }
            }
        })
        .collect()
}

/// Segment a line and locate every glyph
pub fn glyph_boxes<L: GlyphLocator + ?Sized>(text: &str, locator: &L) -> Vec<NormalizedBox> {
    locate(&segment(text), locator)
}
