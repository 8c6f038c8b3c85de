//! OCR collaborator interface
//!
//! Text recognition happens outside this crate. What comes back is a
//! recognized line plus a way to ask where any character range of it sits in
//! the image. [`RecordedObservation`] replays that output from JSON.

use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::vision::geometry::NormalizedBox;

/// One line of text as returned by the OCR engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognizedLine {
    /// Recognized text
    pub text: String,
    /// Recognition confidence, passed through untouched
    #[serde(default)]
    pub confidence: f32,
}

impl RecognizedLine {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }

    /// Number of characters (not bytes) in the line
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Range-to-box query offered by the OCR engine.
///
/// `range` is a half-open range of character indices into the recognized
/// line. Returns `None` when the engine cannot bound the range.
pub trait GlyphLocator {
    fn bounding_box(&self, range: Range<usize>) -> Option<NormalizedBox>;
}

impl<F> GlyphLocator for F
where
    F: Fn(Range<usize>) -> Option<NormalizedBox>,
{
    fn bounding_box(&self, range: Range<usize>) -> Option<NormalizedBox> {
        self(range)
    }
}

/// OCR output for one line, recorded to disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedObservation {
    /// Recognized text
    pub text: String,
    /// Recognition confidence
    #[serde(default)]
    pub confidence: f32,
    /// Box around the whole line, if the engine reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_box: Option<NormalizedBox>,
    /// One box per character, in text order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub character_boxes: Vec<NormalizedBox>,
}

impl RecordedObservation {
    /// The recognized line this observation describes
    pub fn line(&self) -> RecognizedLine {
        RecognizedLine::new(self.text.clone(), self.confidence)
    }

    /// Union of the per-character boxes covering `range`
    fn union_of_characters(&self, range: Range<usize>) -> Option<NormalizedBox> {
        if range.end > self.character_boxes.len() {
            return None;
        }

        self.character_boxes[range]
            .iter()
            .copied()
            .reduce(|acc, b| acc.union(&b))
    }

    /// Even horizontal slice of the line box for `range`
    fn slice_of_line(
        &self,
        line_box: &NormalizedBox,
        range: Range<usize>,
    ) -> Option<NormalizedBox> {
        let count = self.text.chars().count();
        if count == 0 || range.end > count {
            return None;
        }

        let step = line_box.width / count as f64;
        Some(NormalizedBox::new(
            line_box.x + step * range.start as f64,
            line_box.y,
            step * range.len() as f64,
            line_box.height,
        ))
    }
}

impl GlyphLocator for RecordedObservation {
    fn bounding_box(&self, range: Range<usize>) -> Option<NormalizedBox> {
        if range.is_empty() {
            return None;
        }

        if !self.character_boxes.is_empty() {
            return self.union_of_characters(range);
        }

        self.line_box
            .as_ref()
            .and_then(|line_box| self.slice_of_line(line_box, range))
    }
}

/// Load recorded observations (a JSON array, one entry per line)
pub fn load_observations(path: &Path) -> Result<Vec<RecordedObservation>> {
    let content = std::fs::read_to_string(path)?;
    let observations: Vec<RecordedObservation> = serde_json::from_str(&content)?;
    debug!("Loaded {} observations from {:?}", observations.len(), path);
    Ok(observations)
}

/// Save observations in the format read by [`load_observations`]
pub fn save_observations(observations: &[RecordedObservation], path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(observations)?;
    std::fs::write(path, content)?;
    Ok(())
}
