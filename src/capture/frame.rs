//! Frame data structures for recognized source images

use std::path::{Path, PathBuf};
use std::time::Instant;

use image::RgbaImage;

use crate::error::{Error, Result};
use crate::vision::{load_observations, RecognizedLine, RecordedObservation};

/// A source image together with the OCR result for one of its lines
#[derive(Debug)]
pub struct SourceFrame<L> {
    /// Position in the stream
    pub sequence: u64,
    /// Source pixels
    pub image: RgbaImage,
    /// Recognized line to decode
    pub line: RecognizedLine,
    /// Range-to-box query for `line`
    pub locator: L,
    /// When the frame was captured
    pub captured_at: Instant,
}

impl<L> SourceFrame<L> {
    /// Create a new frame
    pub fn new(sequence: u64, image: RgbaImage, line: RecognizedLine, locator: L) -> Self {
        Self {
            sequence,
            image,
            line,
            locator,
            captured_at: Instant::now(),
        }
    }

    /// Get frame dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

impl SourceFrame<RecordedObservation> {
    /// Frame for a recorded observation
    pub fn from_observation(
        sequence: u64,
        image: RgbaImage,
        observation: RecordedObservation,
    ) -> Self {
        Self::new(sequence, image, observation.line(), observation)
    }

    /// Load `image_path` and the first line of its sibling `.json` observation file.
    ///
    /// A file with no lines gives an empty frame line, which decodes to nothing.
    pub fn load(sequence: u64, image_path: &Path) -> Result<Self> {
        let observation_path = observation_path_for(image_path);
        if !observation_path.exists() {
            return Err(Error::MissingObservation(image_path.to_path_buf()));
        }

        let image = image::open(image_path)?.to_rgba8();
        let observation = load_observations(&observation_path)?
            .into_iter()
            .next()
            .unwrap_or_default();

        Ok(Self::from_observation(sequence, image, observation))
    }
}

/// Observation file that belongs to an image: same stem, `.json` extension
pub fn observation_path_for(image_path: &Path) -> PathBuf {
    image_path.with_extension("json")
}
