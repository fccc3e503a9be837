//! Dictionary model and in-memory backend.
//!
//! Entries follow the JMdict shape: kanji writings, kana readings, coarse
//! part-of-speech tags, glossed senses, priority markers. The `Dictionary`
//! trait is the lookup seam; `MemoryDictionary` is the reference backend,
//! loadable from JSON.

use std::sync::Arc;

use ahash::AHashMap;
use jiten_core::{utils, PartOfSpeech};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One sense of an entry: glosses plus optional sense-level tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sense {
    pub glosses: Vec<String>,
    #[serde(default)]
    pub parts_of_speech: Vec<PartOfSpeech>,
}

/// A dictionary entry.
///
/// Invariant: `readings` is non-empty. The resolver treats an entry without
/// readings as a hard integrity failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: u32,
    /// Kanji (or mixed-script) spellings. May be empty for kana-only words.
    #[serde(default)]
    pub writings: Vec<String>,
    /// Kana readings, citation order.
    pub readings: Vec<String>,
    pub parts_of_speech: Vec<PartOfSpeech>,
    #[serde(default)]
    pub senses: Vec<Sense>,
    /// JMdict-style priority markers (ichi1, news1, nf17, spec2, ...).
    #[serde(default)]
    pub priorities: Vec<String>,
    /// Miscellaneous markers ("uk" = usually written in kana).
    #[serde(default)]
    pub misc: Vec<String>,
}

impl Entry {
    /// Frequency/commonness score used to rank competing entries.
    ///
    /// Priority markers add up; `spec1`/`spec2` only count when nothing
    /// else fired. The "uk" marker rewards kana surfaces and penalizes
    /// kanji ones, since such words are usually written in kana.
    pub fn priority_score(&self, is_kana_surface: bool) -> i32 {
        let mut score = 0;
        for marker in &self.priorities {
            match marker.as_str() {
                "ichi1" => score += 20,
                "news1" => score += 15,
                "ichi2" | "news2" => score += 10,
                "gai1" | "gai2" => score += 5,
                "jiten" => score += 100,
                other => {
                    if let Some(rank) =
                        other.strip_prefix("nf").and_then(|n| n.parse::<i32>().ok())
                    {
                        score += (5 - round_half_even(rank, 10)).max(0);
                    }
                }
            }
        }
        if score == 0 {
            for marker in &self.priorities {
                match marker.as_str() {
                    "spec1" => score += 15,
                    "spec2" => score += 5,
                    _ => {}
                }
            }
        }
        if self.misc.iter().any(|m| m == "uk") {
            score += if is_kana_surface { 10 } else { -10 };
        }
        score
    }

    /// Index into `readings` matching `reading` (hiragana-folded), if any.
    pub fn reading_position(&self, reading: &str) -> Option<usize> {
        let folded = utils::katakana_to_hiragana(reading);
        self.readings
            .iter()
            .position(|r| utils::katakana_to_hiragana(r) == folded)
    }
}

/// `value / divisor` rounded half to even. nf ranks come in batches of ~500
/// entries, so exact halves do occur.
fn round_half_even(value: i32, divisor: i32) -> i32 {
    let quotient = value / divisor;
    let remainder = value % divisor;
    match (2 * remainder).cmp(&divisor) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => quotient + (quotient % 2),
    }
}

/// Lookup seam between the resolver and whatever holds the dictionary.
pub trait Dictionary {
    /// Entries whose writings or readings contain `key`, exact match,
    /// stable order.
    fn lookup(&self, key: &str) -> Vec<Arc<Entry>>;

    fn lookup_by_id(&self, id: u32) -> Option<Arc<Entry>>;

    fn lookup_with_pos(&self, key: &str, pos: PartOfSpeech) -> Vec<Arc<Entry>> {
        self.lookup(key)
            .into_iter()
            .filter(|e| e.parts_of_speech.contains(&pos))
            .collect()
    }
}

/// In-memory dictionary backed by hash maps, insertion-ordered per key.
#[derive(Debug, Default)]
pub struct MemoryDictionary {
    by_key: AHashMap<String, Vec<u32>>,
    by_id: AHashMap<u32, Arc<Entry>>,
}

impl MemoryDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index an entry under every writing and reading it carries.
    pub fn insert(&mut self, entry: Entry) {
        let entry = Arc::new(entry);
        for key in entry.writings.iter().chain(entry.readings.iter()) {
            let ids = self.by_key.entry(key.clone()).or_default();
            if !ids.contains(&entry.id) {
                ids.push(entry.id);
            }
        }
        self.by_id.insert(entry.id, entry);
    }

    /// Load a dictionary from a JSON array of entries.
    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        let entries: Vec<Entry> = serde_json::from_str(content)?;
        let mut dict = Self::new();
        let count = entries.len();
        for entry in entries {
            dict.insert(entry);
        }
        debug!(entries = count, "loaded in-memory dictionary");
        Ok(dict)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl Dictionary for MemoryDictionary {
    fn lookup(&self, key: &str) -> Vec<Arc<Entry>> {
        match self.by_key.get(key) {
            Some(ids) => ids
                .iter()
                .filter_map(|id| self.by_id.get(id))
                .map(Arc::clone)
                .collect(),
            None => Vec::new(),
        }
    }

    fn lookup_by_id(&self, id: u32) -> Option<Arc<Entry>> {
        self.by_id.get(&id).map(Arc::clone)
    }
}
