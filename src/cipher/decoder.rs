//! Substitution decoding
//!
//! Lines may open with a speaker name ending in a colon, e.g. `Rin: vcb`.
//! Everything through the colon is kept verbatim, the one character after it
//! (normally a space) is set aside, and the rest is decoded letter by letter.
//! A letter is run through the cipher only when its classification says
//! `Unmarked`.
//!
//! Classifications come from per-character glyph boxes, but when a prefix is
//! present the classification cursor starts at the character right after the
//! colon while the letters start one further on. So the first letter of the
//! body is judged by the box of the separator, the second by the box of the
//! first letter, and so on. Callers depend on this offset; do not shift it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cipher::table::CipherMap;
use crate::vision::classify::Classification;

/// Result of decoding one line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedLine {
    /// Speaker-name prefix through the colon, or empty
    pub prefix: String,
    /// Character skipped after the colon, if there was one
    pub separator: Option<char>,
    /// Decoded letter stream
    pub body: String,
}

impl DecodedLine {
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.separator.is_none() && self.body.is_empty()
    }
}

impl fmt::Display for DecodedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix)?;
        if let Some(separator) = self.separator {
            write!(f, "{separator}")?;
        }
        f.write_str(&self.body)
    }
}

/// Decode `text` using one classification per glyph box.
///
/// Never fails. Letters without a classification, marked letters and cipher
/// misses all come through unchanged. Spaces are copied and do not consume a
/// classification.
///
/// Positions count `char`s, matching the glyph segmenter, so a combining mark
/// takes a classification slot of its own.
pub fn decode(text: &str, classifications: &[Classification], cipher: &CipherMap) -> DecodedLine {
    let chars: Vec<char> = text.chars().collect();

    let (prefix, separator, stream, mut cursor) = match chars.iter().position(|&c| c == ':') {
        Some(colon) => {
            let start = (colon + 2).min(chars.len());
            (
                chars[..=colon].iter().collect::<String>(),
                chars.get(colon + 1).copied(),
                &chars[start..],
                colon + 1,
            )
        }
        None => (String::new(), None, &chars[..], 0),
    };

    let mut body = String::with_capacity(stream.len());
    for &c in stream {
        if c == ' ' {
            body.push(c);
            continue;
        }

        let decoded = match classifications.get(cursor) {
            Some(Classification::Unmarked) => cipher.apply(c),
            _ => c,
        };
        body.push(decoded);
        cursor += 1;
    }

    DecodedLine {
        prefix,
        separator,
        body,
    }
}
