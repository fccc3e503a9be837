//! Parsing facade.
//!
//! `Model` bundles the shared resources (dictionary, rule table, config);
//! `Parser` binds a model to a morphological analyzer and exposes the
//! end-to-end text-to-spans operation with its input and output checks.

use std::sync::Arc;

use jiten_core::{Config, Deconjugator, RuleSet};
use tracing::debug;

use crate::analyzer::{Morpheme, MorphemeAnalyzer};
use crate::dictionary::Dictionary;
use crate::error::ParseError;
use crate::resolver::{Resolver, WordSpan};

/// Shared resources of a parsing pipeline. Cheap to clone.
#[derive(Clone)]
pub struct Model {
    pub dictionary: Arc<dyn Dictionary + Send + Sync>,
    pub rules: Arc<RuleSet>,
    pub config: Config,
}

impl Model {
    pub fn new(
        dictionary: Arc<dyn Dictionary + Send + Sync>,
        rules: Arc<RuleSet>,
        config: Config,
    ) -> Self {
        Self { dictionary, rules, config }
    }

    /// Model with the built-in standard rule table.
    pub fn with_standard_rules(
        dictionary: Arc<dyn Dictionary + Send + Sync>,
        config: Config,
    ) -> Self {
        Self::new(dictionary, RuleSet::standard(), config)
    }
}

/// Text-to-word-spans parser over a pluggable analyzer.
pub struct Parser<A: MorphemeAnalyzer> {
    model: Model,
    analyzer: A,
    resolver: Resolver,
}

impl<A: MorphemeAnalyzer> Parser<A> {
    pub fn new(model: Model, analyzer: A) -> Self {
        let deconjugator =
            Deconjugator::new(Arc::clone(&model.rules), model.config.clone());
        let resolver = Resolver::new(
            Arc::clone(&model.dictionary),
            deconjugator,
            model.config.clone(),
        );
        Self { model, analyzer, resolver }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Segment `text` and resolve the segments into word spans.
    ///
    /// The returned spans tile `text` exactly: contiguous, in order, first
    /// starting at 0 and last ending at `text.len()`. Stretches that match
    /// no dictionary entry come back as unknown spans rather than being
    /// dropped. Empty input yields an empty vector.
    pub fn parse_text(&self, text: &str) -> Result<Vec<WordSpan>, ParseError> {
        let morphemes = self.analyzer.segment(text);
        debug!(len = text.len(), morphemes = morphemes.len(), "parsing text");
        self.resolve_morphemes(text, &morphemes)
    }

    /// Resolve an externally produced morpheme stream against `text`.
    ///
    /// The stream is validated first; spans are validated after. Both
    /// failures are hard errors.
    pub fn resolve_morphemes(
        &self,
        text: &str,
        morphemes: &[Morpheme],
    ) -> Result<Vec<WordSpan>, ParseError> {
        validate_morphemes(text, morphemes)?;
        let spans = self.resolver.resolve(morphemes)?;
        validate_covering(text, &spans)?;
        Ok(spans)
    }

    /// (hits, misses) of the resolution cache.
    pub fn cache_stats(&self) -> (u64, u64) {
        self.resolver.cache_stats()
    }

    pub fn cache_hit_rate(&self) -> f64 {
        let (hits, misses) = self.resolver.cache_stats();
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    pub fn cache_size(&self) -> usize {
        self.resolver.cache_size()
    }

    pub fn clear_cache(&self) {
        self.resolver.clear_cache();
    }
}

/// Check that the morpheme stream tiles `text` exactly.
fn validate_morphemes(text: &str, morphemes: &[Morpheme]) -> Result<(), ParseError> {
    let mut cursor = 0;
    for (index, m) in morphemes.iter().enumerate() {
        if m.start != cursor {
            return Err(ParseError::MorphemeStream {
                index,
                reason: format!("segment starts at byte {} but expected {}", m.start, cursor),
            });
        }
        if m.end < m.start || m.end > text.len() {
            return Err(ParseError::MorphemeStream {
                index,
                reason: format!("segment range {}..{} is out of bounds", m.start, m.end),
            });
        }
        match text.get(m.start..m.end) {
            Some(slice) if slice == m.surface => {}
            _ => {
                return Err(ParseError::MorphemeStream {
                    index,
                    reason: format!("surface {:?} does not match the input slice", m.surface),
                });
            }
        }
        cursor = m.end;
    }
    if cursor != text.len() {
        return Err(ParseError::MorphemeStream {
            index: morphemes.len(),
            reason: format!("segments cover {} of {} bytes", cursor, text.len()),
        });
    }
    Ok(())
}

/// Check that the output spans tile `text` exactly.
fn validate_covering(text: &str, spans: &[WordSpan]) -> Result<(), ParseError> {
    let mut cursor = 0;
    for span in spans {
        if span.start != cursor {
            return Err(ParseError::Coverage {
                position: cursor,
                reason: format!("next span starts at byte {}", span.start),
            });
        }
        match text.get(span.start..span.end) {
            Some(slice) if slice == span.surface => {}
            _ => {
                return Err(ParseError::Coverage {
                    position: span.start,
                    reason: format!("span surface {:?} does not match the input", span.surface),
                });
            }
        }
        cursor = span.end;
    }
    if cursor != text.len() {
        return Err(ParseError::Coverage {
            position: cursor,
            reason: format!("spans cover {} of {} bytes", cursor, text.len()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiten_core::PartOfSpeech;

    fn m(surface: &str, start: usize, pos: PartOfSpeech) -> Morpheme {
        Morpheme::new(surface, start, pos)
    }

    #[test]
    fn contiguous_stream_validates() {
        let text = "見ている";
        let morphemes =
            vec![m("見て", 0, PartOfSpeech::Verb), m("いる", 6, PartOfSpeech::Verb)];
        assert!(validate_morphemes(text, &morphemes).is_ok());
    }

    #[test]
    fn gapped_stream_is_rejected() {
        let text = "見ている";
        let morphemes =
            vec![m("見て", 0, PartOfSpeech::Verb), m("る", 9, PartOfSpeech::Verb)];
        let err = validate_morphemes(text, &morphemes).unwrap_err();
        assert!(matches!(err, ParseError::MorphemeStream { index: 1, .. }));
    }

    #[test]
    fn short_stream_is_rejected() {
        let text = "見ている";
        let morphemes = vec![m("見て", 0, PartOfSpeech::Verb)];
        let err = validate_morphemes(text, &morphemes).unwrap_err();
        assert!(matches!(err, ParseError::MorphemeStream { index: 1, .. }));
    }

    #[test]
    fn mismatched_surface_is_rejected() {
        let text = "見ている";
        let morphemes =
            vec![m("食べ", 0, PartOfSpeech::Verb), m("いる", 6, PartOfSpeech::Verb)];
        let err = validate_morphemes(text, &morphemes).unwrap_err();
        assert!(matches!(err, ParseError::MorphemeStream { index: 0, .. }));
    }

    #[test]
    fn empty_text_and_stream_validate() {
        assert!(validate_morphemes("", &[]).is_ok());
    }
}
