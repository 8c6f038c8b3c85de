//! Cipher Layer
//!
//! The fixed substitution table and the line decoder that applies it to
//! classified glyphs.

pub mod decoder;
pub mod table;

pub use decoder::{decode, DecodedLine};
pub use table::CipherMap;
