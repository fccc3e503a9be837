//! Morphological analyzer seam.
//!
//! The pipeline does not segment text itself; it consumes the output of an
//! external morphological analyzer through the `MorphemeAnalyzer` trait.
//! Anything that can produce contiguous, offset-annotated segments plugs in
//! here.

use jiten_core::PartOfSpeech;
use serde::{Deserialize, Serialize};

/// One segment of analyzer output.
///
/// `start`/`end` are byte offsets into the input text; `surface` must equal
/// `text[start..end]`. `base_form` is the analyzer's lemma guess and
/// `reading` its (katakana) reading, both optional hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Morpheme {
    pub surface: String,
    pub start: usize,
    pub end: usize,
    pub pos: PartOfSpeech,
    #[serde(default)]
    pub base_form: Option<String>,
    #[serde(default)]
    pub reading: Option<String>,
}

impl Morpheme {
    pub fn new(surface: &str, start: usize, pos: PartOfSpeech) -> Self {
        Self {
            surface: surface.to_string(),
            start,
            end: start + surface.len(),
            pos,
            base_form: None,
            reading: None,
        }
    }

    pub fn with_base_form(mut self, base_form: &str) -> Self {
        self.base_form = Some(base_form.to_string());
        self
    }

    pub fn with_reading(mut self, reading: &str) -> Self {
        self.reading = Some(reading.to_string());
        self
    }
}

/// Source of morpheme streams.
pub trait MorphemeAnalyzer {
    /// Segment `text` into contiguous morphemes covering all of it.
    fn segment(&self, text: &str) -> Vec<Morpheme>;
}

impl<T: MorphemeAnalyzer + ?Sized> MorphemeAnalyzer for &T {
    fn segment(&self, text: &str) -> Vec<Morpheme> {
        (**self).segment(text)
    }
}

impl<T: MorphemeAnalyzer + ?Sized> MorphemeAnalyzer for Box<T> {
    fn segment(&self, text: &str) -> Vec<Morpheme> {
        (**self).segment(text)
    }
}
