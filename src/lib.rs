//! Al Bhed Lens - decode Al Bhed captions from OCR output
//!
//! OCR recovers Latin letters and where they sit in the image. Whether a letter
//! must be deciphered depends on the tint painted beneath it, so each glyph's
//! region is sampled and classified by its green level. Letters on the
//! low-green script tint are run through the substitution table; the rest pass
//! through unchanged.

pub mod capture;
pub mod cipher;
pub mod config;
pub mod error;
pub mod overlay;
pub mod vision;

pub use cipher::{CipherMap, DecodedLine};
pub use error::{Error, Result};
pub use vision::{
    Classification, ColorSample, DecodeOutcome, DecodePipeline, Diagnostics, GlyphLocator,
    NormalizedBox, PipelineConfig, PixelRect, RecognizedLine, RecordedObservation,
};
