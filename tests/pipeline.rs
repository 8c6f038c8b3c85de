//! End-to-end decoding through the public API

use std::ops::Range;

use albhed_lens::cipher::decode;
use albhed_lens::vision::glyph_boxes;
use albhed_lens::{
    CipherMap, Classification, DecodePipeline, DecodedLine, NormalizedBox, RecognizedLine,
    RecordedObservation,
};
use image::{Rgba, RgbaImage};

const TINT: Rgba<u8> = Rgba([190, 40, 210, 255]);
const PLAIN: Rgba<u8> = Rgba([250, 250, 250, 255]);

/// One 8 px column per character
fn caption(tinted: &[bool]) -> RgbaImage {
    RgbaImage::from_fn(tinted.len() as u32 * 8, 8, |x, _| {
        if tinted[(x / 8) as usize] {
            TINT
        } else {
            PLAIN
        }
    })
}

fn observation(text: &str) -> RecordedObservation {
    let count = text.chars().count();
    let step = 1.0 / count as f64;
    RecordedObservation {
        text: text.to_string(),
        confidence: 0.5,
        line_box: None,
        character_boxes: (0..count)
            .map(|i| NormalizedBox::new(i as f64 * step, 0.0, step, 1.0))
            .collect(),
    }
}

#[test]
fn test_unprefixed_pair_uses_first_classification_only() {
    let cipher = CipherMap::from_pairs([('a', 'e'), ('b', 'f')]);
    let line = decode("ab", &[Classification::Unmarked], &cipher);
    assert_eq!(line.prefix, "");
    assert_eq!(line.body, "eb");
}

#[test]
fn test_speaker_prefix_offsets() {
    // Only slot 4 (the separator's box) is unmarked, and it decides the first letter
    let cipher = CipherMap::al_bhed();
    let mut classifications = vec![Classification::Marked; 7];
    classifications[4] = Classification::Unmarked;

    let line = decode("Rin: vcb", &classifications, cipher);
    assert_eq!(line.prefix, "Rin:");
    assert_eq!(line.separator, Some(' '));
    assert_eq!(line.body, "fcb");
}

#[test]
fn test_letters_beyond_classifications_pass_through() {
    let line = decode("rammu yna", &[Classification::Unmarked; 2], CipherMap::al_bhed());
    assert_eq!(line.body, "hemmu yna");
}

#[test]
fn test_empty_line() {
    let outcome = DecodePipeline::new().run(
        &RecognizedLine::default(),
        &|_: Range<usize>| None::<NormalizedBox>,
        &caption(&[true]),
    );
    assert_eq!(outcome.line, DecodedLine::default());
    assert_eq!(outcome.line.to_string(), "");
    assert!(outcome.diagnostics.pixel_rects.is_empty());
    assert!(outcome.diagnostics.classifications.is_empty());
}

#[test]
fn test_region_outside_image_keeps_letter() {
    let outside = |_: Range<usize>| Some(NormalizedBox::new(0.0, 3.0, 0.5, 0.5));
    let line = RecognizedLine::new("yb", 1.0);
    let outcome = DecodePipeline::new().run(&line, &outside, &caption(&[true, true]));

    assert_eq!(outcome.diagnostics.samples, vec![None]);
    assert_eq!(outcome.diagnostics.classifications, vec![Classification::Marked]);
    assert_eq!(outcome.line.body, "yb");
}

#[test]
fn test_box_counts() {
    let none = |_: Range<usize>| None::<NormalizedBox>;
    assert_eq!(glyph_boxes("", &none), vec![NormalizedBox::ZERO]);
    assert_eq!(glyph_boxes("q", &none), vec![NormalizedBox::ZERO]);
    assert_eq!(glyph_boxes("Yu: rammu", &none).len(), 8);
}

#[test]
fn test_recorded_caption() {
    // "Yu: ruf" where the whole body is tinted. The first body letter is judged
    // by the separator column, so the separator is tinted too.
    let text = "Yu: ruf";
    let image = caption(&[false, false, false, true, true, true, true]);
    let outcome = DecodePipeline::new().run_observation(&observation(text), &image);

    assert_eq!(outcome.diagnostics.pixel_rects.len(), 6);
    assert_eq!(outcome.line.prefix, "Yu:");
    // r (slot 3) -> h, u (slot 4) -> o, f (slot 5) -> w
    assert_eq!(outcome.line.to_string(), "Yu: how");
}

#[test]
fn test_spaces_and_marked_words() {
    // Plain "are" stays; tinted words decode. Spaces never take a slot, so
    // slots 0..8 map to the letters of "ruf are" minus the space.
    let text = "ruf are oui";
    let image = RgbaImage::from_pixel(110, 8, PLAIN);
    let mut classifications = vec![Classification::Unmarked; 9];
    for slot in 3..6 {
        classifications[slot] = Classification::Marked;
    }

    let line = decode(text, &classifications, CipherMap::al_bhed());
    assert_eq!(line.body, "how are you");

    // Same text through the pipeline on a plain image: nothing decodes
    let outcome = DecodePipeline::new().run_observation(&observation(text), &image);
    assert_eq!(outcome.line.body, text);
}

#[test]
fn test_pipeline_is_repeatable() {
    let obs = observation("Rin: vcb");
    let image = caption(&[false, false, false, false, true, true, false, true]);
    let pipeline = DecodePipeline::new();

    let first = pipeline.run_observation(&obs, &image);
    let second = pipeline.run_observation(&obs, &image);
    assert_eq!(first.line, second.line);
    assert_eq!(first.diagnostics.pixel_rects, second.diagnostics.pixel_rects);
}
