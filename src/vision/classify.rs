//! Tint classification
//!
//! The script's background tint suppresses green, so a single green-channel
//! threshold separates tinted glyphs (low green, deciphered) from plain ones
//! (high green, left as is).

use serde::{Deserialize, Serialize};

use crate::vision::sample::ColorSample;

/// Green level below which a region counts as unmarked
pub const GREEN_THRESHOLD: f32 = 0.3;

/// Background category of a glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Green at or above [`GREEN_THRESHOLD`]; letter passes through unchanged
    Marked,
    /// Green below [`GREEN_THRESHOLD`] (the script's tint); letter goes
    /// through the cipher
    Unmarked,
}

/// Threshold a mean color. Red and blue are ignored.
pub fn classify(sample: &ColorSample) -> Classification {
    if sample.g < GREEN_THRESHOLD {
        Classification::Unmarked
    } else {
        Classification::Marked
    }
}

/// Classify a possibly missing sample. Regions that could not be sampled
/// count as marked so their letter passes through.
pub fn classify_sample(sample: Option<&ColorSample>) -> Classification {
    sample.map_or(Classification::Marked, classify)
}
