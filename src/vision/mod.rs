//! Vision Layer
//!
//! Turns one recognized line plus its source image into decoded text:
//! segment -> map to pixels -> sample -> classify -> decode.
//! The OCR engine itself is an external collaborator reached through
//! [`GlyphLocator`].

pub mod classify;
pub mod geometry;
pub mod ocr;
pub mod sample;
pub mod segment;

use std::time::Instant;

use image::RgbaImage;
use tracing::{debug, trace};

use crate::cipher::{decode, CipherMap, DecodedLine};

pub use classify::{classify, classify_sample, Classification, GREEN_THRESHOLD};
pub use geometry::{to_pixel_rect, NormalizedBox, PixelRect};
pub use ocr::{
    load_observations, save_observations, GlyphLocator, RecognizedLine, RecordedObservation,
};
pub use sample::ColorSample;
pub use segment::{glyph_boxes, segment, GlyphSpan};

/// Configuration for the decode pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Keep a copy of every sampled glyph region in the diagnostics
    pub capture_crops: bool,
}

/// Per-glyph intermediate results, for overlays and debugging
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    /// Normalized box per glyph, in segment order
    pub boxes: Vec<NormalizedBox>,
    /// Pixel rect per glyph, top-left origin, source image scale
    pub pixel_rects: Vec<PixelRect>,
    /// Mean color per glyph, `None` where the region could not be sampled
    pub samples: Vec<Option<ColorSample>>,
    /// Classification per glyph
    pub classifications: Vec<Classification>,
    /// Cropped glyph regions (only with `capture_crops`)
    pub crops: Vec<Option<RgbaImage>>,
}

/// Output of one pipeline run
#[derive(Debug, Clone, Default)]
pub struct DecodeOutcome {
    /// Decoded text
    pub line: DecodedLine,
    /// Intermediate results
    pub diagnostics: Diagnostics,
    /// Processing time in microseconds
    pub processing_time_us: u64,
}

/// Stateless decode pipeline.
///
/// Holds only read-only configuration and a reference to the cipher table,
/// so one instance can be shared between threads and identical inputs
/// always give identical output.
#[derive(Debug, Clone)]
pub struct DecodePipeline {
    config: PipelineConfig,
    cipher: &'static CipherMap,
}

impl Default for DecodePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodePipeline {
    /// Create a pipeline with the Al Bhed table and default configuration
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Create a pipeline with the Al Bhed table and custom configuration
    pub fn with_config(config: PipelineConfig) -> Self {
        Self::with_cipher(config, CipherMap::al_bhed())
    }

    /// Create a pipeline with a specific cipher table
    pub fn with_cipher(config: PipelineConfig, cipher: &'static CipherMap) -> Self {
        Self { config, cipher }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn cipher(&self) -> &CipherMap {
        self.cipher
    }

    /// Decode one recognized line against the image it was recognized in
    pub fn run<L: GlyphLocator + ?Sized>(
        &self,
        line: &RecognizedLine,
        locator: &L,
        image: &RgbaImage,
    ) -> DecodeOutcome {
        let start = Instant::now();

        if line.is_empty() {
            debug!("Empty recognized line, nothing to decode");
            return DecodeOutcome::default();
        }

        let (width, height) = image.dimensions();
        let boxes = glyph_boxes(&line.text, locator);
        let pixel_rects: Vec<PixelRect> = boxes
            .iter()
            .map(|b| b.to_pixel_rect(width, height))
            .collect();
        let samples: Vec<Option<ColorSample>> = pixel_rects
            .iter()
            .map(|rect| sample::sample(image, rect))
            .collect();
        let classifications: Vec<Classification> = samples
            .iter()
            .map(|s| classify_sample(s.as_ref()))
            .collect();
        let crops = if self.config.capture_crops {
            pixel_rects
                .iter()
                .map(|rect| sample::crop(image, rect))
                .collect()
        } else {
            Vec::new()
        };

        for (i, (rect, class)) in pixel_rects.iter().zip(&classifications).enumerate() {
            trace!("glyph {}: {:?} -> {:?} ({:?})", i, rect, class, samples[i]);
        }

        let decoded = decode(&line.text, &classifications, self.cipher);

        let elapsed = start.elapsed();
        debug!(
            "Decoded {:?} -> {:?} in {:?} ({} glyphs, {} unsampled, confidence {:.2})",
            line.text,
            decoded.to_string(),
            elapsed,
            boxes.len(),
            samples.iter().filter(|s| s.is_none()).count(),
            line.confidence
        );

        DecodeOutcome {
            line: decoded,
            diagnostics: Diagnostics {
                boxes,
                pixel_rects,
                samples,
                classifications,
                crops,
            },
            processing_time_us: elapsed.as_micros() as u64,
        }
    }

    /// Decode a recorded observation against its image
    pub fn run_observation(
        &self,
        observation: &RecordedObservation,
        image: &RgbaImage,
    ) -> DecodeOutcome {
        self.run(&observation.line(), observation, image)
    }
}
