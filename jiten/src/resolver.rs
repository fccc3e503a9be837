//! Morpheme-to-word resolution.
//!
//! Turns a validated morpheme stream into word spans: each morpheme (or
//! merged run of morphemes) is matched against the dictionary, directly
//! first, then through deconjugation, then loosely. Morphemes that match
//! nothing become unknown spans rather than disappearing, so the output
//! always tiles the input.

use std::cell::{Cell, RefCell};
use std::num::NonZeroUsize;
use std::sync::Arc;

use jiten_core::utils;
use jiten_core::{Config, ConjugationClass, Deconjugator, PartOfSpeech};
use lru::LruCache;
use serde::Serialize;
use tracing::{debug, trace};

use crate::analyzer::Morpheme;
use crate::dictionary::{Dictionary, Entry};
use crate::error::ParseError;

/// One resolved (or unresolved) stretch of input text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordSpan {
    pub surface: String,
    /// Byte offsets into the input text.
    pub start: usize,
    pub end: usize,
    /// Matched dictionary entry; `None` marks an unknown span.
    pub entry_id: Option<u32>,
    /// Index into the matched entry's readings.
    pub reading_index: usize,
    /// Grammatical layers stripped to reach the headword, outermost first.
    pub conjugations: Vec<String>,
    pub pos: PartOfSpeech,
}

impl WordSpan {
    pub fn is_unknown(&self) -> bool {
        self.entry_id.is_none()
    }
}

#[derive(Debug, Clone)]
struct Resolution {
    entry_id: u32,
    reading_index: usize,
    conjugations: Vec<String>,
}

type CacheKey = (String, PartOfSpeech, Option<String>, Option<String>);

/// Resolver with a bounded memo of positive resolutions.
pub struct Resolver {
    dictionary: Arc<dyn Dictionary + Send + Sync>,
    deconjugator: Deconjugator,
    config: Config,
    cache: RefCell<LruCache<CacheKey, Resolution>>,
    cache_hits: Cell<u64>,
    cache_misses: Cell<u64>,
}

impl Resolver {
    pub fn new(
        dictionary: Arc<dyn Dictionary + Send + Sync>,
        deconjugator: Deconjugator,
        config: Config,
    ) -> Self {
        let capacity = NonZeroUsize::new(config.max_cache_size.max(1))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            dictionary,
            deconjugator,
            config,
            cache: RefCell::new(LruCache::new(capacity)),
            cache_hits: Cell::new(0),
            cache_misses: Cell::new(0),
        }
    }

    /// Resolve a morpheme stream into word spans tiling the same text.
    pub fn resolve(&self, morphemes: &[Morpheme]) -> Result<Vec<WordSpan>, ParseError> {
        let mut spans = Vec::new();
        let mut i = 0;
        while i < morphemes.len() {
            let head = &morphemes[i];
            let head_res = self.resolve_morpheme(head)?;

            let max_run = self.config.max_merge_morphemes.min(morphemes.len() - i);
            let mut taken = 1;
            let mut chosen = head_res.clone();
            for run in (2..=max_run).rev() {
                let window = &morphemes[i..i + run];
                if let Some(merged) = self.try_merge(head, head_res.as_ref(), window)? {
                    chosen = Some(merged);
                    taken = run;
                    break;
                }
            }

            let surface: String =
                morphemes[i..i + taken].iter().map(|m| m.surface.as_str()).collect();
            let end = morphemes[i + taken - 1].end;
            match chosen {
                Some(res) => {
                    trace!(surface = %surface, entry = res.entry_id, "resolved span");
                    spans.push(WordSpan {
                        surface,
                        start: head.start,
                        end,
                        entry_id: Some(res.entry_id),
                        reading_index: res.reading_index,
                        conjugations: res.conjugations,
                        pos: head.pos,
                    });
                }
                None => {
                    debug!(surface = %surface, "unknown span");
                    spans.push(WordSpan {
                        surface,
                        start: head.start,
                        end,
                        entry_id: None,
                        reading_index: 0,
                        conjugations: Vec::new(),
                        pos: head.pos,
                    });
                }
            }
            i += taken;
        }
        Ok(spans)
    }

    /// Decide whether a merged run of morphemes beats its head alone.
    ///
    /// A merge is accepted when the merged surface resolves and one of:
    /// the head alone resolves to nothing; the merged surface deconjugates
    /// to the same entry as the head (a conjugated word the analyzer split
    /// into stem plus auxiliaries); or the merged surface is a direct
    /// headword of its own (a compound the analyzer split).
    fn try_merge(
        &self,
        head: &Morpheme,
        head_res: Option<&Resolution>,
        window: &[Morpheme],
    ) -> Result<Option<Resolution>, ParseError> {
        let surface: String = window.iter().map(|m| m.surface.as_str()).collect();
        let lookup = utils::normalize(&surface);
        let merged =
            match self.resolve_text(&lookup, head.pos, head.base_form.as_deref(), None)? {
                Some(res) => res,
                None => return Ok(None),
            };

        let accept = match head_res {
            None => true,
            Some(h) if merged.entry_id == h.entry_id && head.pos.is_conjugating() => true,
            Some(_) => merged.conjugations.is_empty(),
        };
        if accept {
            trace!(surface = %surface, run = window.len(), "merged run");
            Ok(Some(merged))
        } else {
            Ok(None)
        }
    }

    fn resolve_morpheme(&self, m: &Morpheme) -> Result<Option<Resolution>, ParseError> {
        // lookups run on the NFC-folded surface; the emitted span keeps the
        // original bytes so the covering stays exact
        let text = utils::normalize(&m.surface);
        self.resolve_with_fallback(&text, m.pos, m.base_form.as_deref(), m.reading.as_deref())
    }

    /// Resolve, retrying with surface rewrites (trimmed gemination or
    /// prolongation marks, stripped honorific prefix) when nothing matches.
    fn resolve_with_fallback(
        &self,
        text: &str,
        pos: PartOfSpeech,
        base_hint: Option<&str>,
        reading: Option<&str>,
    ) -> Result<Option<Resolution>, ParseError> {
        let mut current = text.to_string();
        for attempt in 0..self.config.max_lookup_attempts {
            if let Some(res) = self.resolve_cached(&current, pos, base_hint, reading)? {
                if attempt > 0 {
                    debug!(original = %text, rewritten = %current, "fallback rewrite resolved");
                }
                return Ok(Some(res));
            }
            match rewrite_surface(&current) {
                Some(next) if next != current => current = next,
                _ => break,
            }
        }
        Ok(None)
    }

    fn resolve_cached(
        &self,
        text: &str,
        pos: PartOfSpeech,
        base_hint: Option<&str>,
        reading: Option<&str>,
    ) -> Result<Option<Resolution>, ParseError> {
        // the reading hint steers reading_index, so it is part of the key:
        // homographs share surface/pos/base but not their reading
        let key: CacheKey = (
            text.to_string(),
            pos,
            base_hint.map(str::to_string),
            reading.map(str::to_string),
        );
        if let Some(res) = self.cache.borrow_mut().get(&key) {
            self.cache_hits.set(self.cache_hits.get() + 1);
            return Ok(Some(res.clone()));
        }
        self.cache_misses.set(self.cache_misses.get() + 1);

        let resolved = self.resolve_text(text, pos, base_hint, reading)?;
        if let Some(res) = &resolved {
            self.cache.borrow_mut().put(key, res.clone());
        }
        Ok(resolved)
    }

    /// One resolution pass: guards, strict direct lookup, deconjugation,
    /// loose direct lookup.
    fn resolve_text(
        &self,
        text: &str,
        pos: PartOfSpeech,
        base_hint: Option<&str>,
        reading: Option<&str>,
    ) -> Result<Option<Resolution>, ParseError> {
        if text.is_empty() {
            return Ok(None);
        }
        // numerals and stray letters are not dictionary words
        let digits = utils::to_half_width_digits(text);
        if digits.chars().all(|c| c.is_ascii_digit()) {
            return Ok(None);
        }
        if text.chars().count() == 1 && utils::is_ascii_or_full_width_letter(text) {
            return Ok(None);
        }

        if let Some(res) = self.direct_lookup(text, Some(pos), reading)? {
            return Ok(Some(res));
        }

        // non-conjugating tags still get a shot at the conjugating classes:
        // analyzers routinely tag suru-nouns and na-adjective stems as nouns
        let classes: Vec<ConjugationClass> = match pos.conjugation_class() {
            Some(c) => vec![c],
            None => vec![
                ConjugationClass::Verb,
                ConjugationClass::IAdjective,
                ConjugationClass::NaAdjective,
            ],
        };
        for class in classes {
            if let Some(res) = self.deconj_lookup(text, pos, class, base_hint, reading)? {
                return Ok(Some(res));
            }
        }

        self.direct_lookup(text, None, reading)
    }

    /// Exact-surface lookup, trying the hiragana folding as a second key.
    fn direct_lookup(
        &self,
        text: &str,
        pos_filter: Option<PartOfSpeech>,
        reading: Option<&str>,
    ) -> Result<Option<Resolution>, ParseError> {
        let folded = utils::katakana_to_hiragana(text);
        let mut candidates: Vec<Arc<Entry>> = Vec::new();
        let mut seen = ahash::AHashSet::new();
        for key in [text, folded.as_str()] {
            for entry in self.dictionary.lookup(key) {
                if seen.insert(entry.id) {
                    candidates.push(entry);
                }
            }
            if folded == text {
                break;
            }
        }

        let is_kana_surface = utils::is_kana(text);
        let mut best: Option<(i32, Arc<Entry>)> = None;
        for entry in candidates {
            check_integrity(&entry)?;
            if let Some(p) = pos_filter {
                if !entry.parts_of_speech.contains(&p) {
                    continue;
                }
            }
            let score = entry.priority_score(is_kana_surface);
            // strict comparison keeps the first candidate on ties
            if best.as_ref().map_or(true, |(s, _)| score > *s) {
                best = Some((score, entry));
            }
        }

        Ok(best.map(|(_, entry)| {
            let hint = reading.or(if is_kana_surface { Some(text) } else { None });
            let reading_index = hint
                .and_then(|h| entry.reading_position(h))
                .unwrap_or(0);
            Resolution { entry_id: entry.id, reading_index, conjugations: Vec::new() }
        }))
    }

    /// Deconjugate and look every candidate form up, preferring shallow
    /// chains, then forms matching the analyzer's lemma hint, then higher
    /// priority scores.
    fn deconj_lookup(
        &self,
        text: &str,
        pos: PartOfSpeech,
        class: ConjugationClass,
        base_hint: Option<&str>,
        reading: Option<&str>,
    ) -> Result<Option<Resolution>, ParseError> {
        let folded = utils::katakana_to_hiragana(text);
        let mut forms = self.deconjugator.deconjugate(&folded, Some(class));
        forms.retain(|f| !f.is_identity());
        forms.sort_by_key(|f| std::cmp::Reverse(f.text.chars().count()));

        let class_pos = pos_of_class(class);
        let is_kana_surface = utils::is_kana(text);

        let mut best: Option<((usize, bool, i32, usize), Resolution)> = None;
        for (order, form) in forms.iter().enumerate() {
            for entry in self.dictionary.lookup(&form.text) {
                check_integrity(&entry)?;
                if !entry.parts_of_speech.contains(&pos)
                    && !entry.parts_of_speech.contains(&class_pos)
                {
                    continue;
                }
                let reading_index = if utils::is_kana(&form.text) {
                    // a kana headword must be one of the entry's readings
                    match entry.reading_position(&form.text) {
                        Some(idx) => idx,
                        None => continue,
                    }
                } else {
                    reading.and_then(|h| entry.reading_position(h)).unwrap_or(0)
                };
                let mismatch = base_hint.map_or(false, |h| h != form.text);
                let score = entry.priority_score(is_kana_surface);
                let key = (form.chain_len(), mismatch, -score, order);
                if best.as_ref().map_or(true, |(k, _)| key < *k) {
                    best = Some((
                        key,
                        Resolution {
                            entry_id: entry.id,
                            reading_index,
                            conjugations: form.process.clone(),
                        },
                    ));
                }
            }
        }

        Ok(best.map(|(_, res)| res))
    }

    pub fn cache_stats(&self) -> (u64, u64) {
        (self.cache_hits.get(), self.cache_misses.get())
    }

    pub fn cache_size(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
        self.cache_hits.set(0);
        self.cache_misses.set(0);
    }
}

fn pos_of_class(class: ConjugationClass) -> PartOfSpeech {
    match class {
        ConjugationClass::Verb => PartOfSpeech::Verb,
        ConjugationClass::IAdjective => PartOfSpeech::IAdjective,
        ConjugationClass::NaAdjective => PartOfSpeech::NaAdjective,
        ConjugationClass::Auxiliary => PartOfSpeech::Auxiliary,
    }
}

fn check_integrity(entry: &Entry) -> Result<(), ParseError> {
    if entry.readings.is_empty() {
        return Err(ParseError::DictionaryIntegrity {
            entry_id: entry.id,
            reason: "entry has no readings".into(),
        });
    }
    Ok(())
}

/// Rewrite an unresolved surface for another lookup attempt: drop a
/// trailing っ, ー or doubled character, strip a leading honorific お,
/// or remove prolongation marks altogether.
fn rewrite_surface(text: &str) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() > 2 {
        let last = chars[chars.len() - 1];
        if last == 'っ' || last == 'ー' || chars[chars.len() - 2] == last {
            return Some(chars[..chars.len() - 1].iter().collect());
        }
    }
    if chars.len() > 1 && chars[0] == 'お' {
        return Some(chars[1..].iter().collect());
    }
    if chars.len() > 1 && chars.contains(&'ー') {
        return Some(chars.iter().filter(|&&c| c != 'ー').collect());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_rewrites_in_order() {
        assert_eq!(rewrite_surface("すごいっ").as_deref(), Some("すごい"));
        assert_eq!(rewrite_surface("すごーい").as_deref(), Some("すごい"));
        assert_eq!(rewrite_surface("すごおお").as_deref(), Some("すごお"));
        assert_eq!(rewrite_surface("お茶").as_deref(), Some("茶"));
        assert_eq!(rewrite_surface("見る"), None);
    }
}
