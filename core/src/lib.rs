//! jiten-core
//!
//! Deconjugation rule engine and shared configuration for the jiten
//! word-resolution pipeline.
//!
//! This crate provides the language-rule half of the pipeline: the
//! part-of-speech model, the deconjugation rule table (built-in standard
//! table plus JSON loading for custom tables), and the breadth-first
//! deconjugator that recovers dictionary (citation) forms from inflected
//! surface text.
//!
//! Public API:
//! - `PartOfSpeech` / `ConjugationClass` - closed part-of-speech model
//! - `DeconjRule` / `RuleSet` - rule table with per-class ordered lookup
//! - `Deconjugator` / `DeconjugationForm` - reverse rewriting engine
//! - `Config` - bounds and feature knobs shared across the pipeline
use serde::{Deserialize, Serialize};

pub mod pos;
pub use pos::{ConjugationClass, PartOfSpeech};

pub mod rule;
pub use rule::{ContextKind, DeconjRule, RuleKind, RuleSet};

pub mod rules;
pub use rules::standard_rules;

pub mod deconjugator;
pub use deconjugator::{DeconjugationForm, Deconjugator};

/// Configuration shared by the deconjugator and the resolution frontend.
///
/// All fields are bounds: the pipeline has no timeout concept, so these are
/// what guarantee termination on pathological input.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Maximum number of grammatical layers a deconjugation chain may carry.
    /// Forms at this depth are emitted but not expanded further.
    pub max_chain_depth: usize,

    /// A form whose text grew more than this many chars past the original
    /// surface is abandoned (rules may lengthen text, e.g. ず -> ない).
    pub max_text_growth: usize,

    /// A form carrying more tags than original-length + this slack is
    /// abandoned.
    pub max_tag_slack: usize,

    /// Maximum number of morphemes a single merged span may consume.
    pub max_merge_morphemes: usize,

    /// Capacity of the per-parser resolution cache (entries).
    pub max_cache_size: usize,

    /// Maximum surface-rewrite attempts when a morpheme resolves to nothing
    /// (trailing っ/ー trimming, honorific お stripping, ー removal).
    pub max_lookup_attempts: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_chain_depth: 8,
            max_text_growth: 10,
            max_tag_slack: 6,
            max_merge_morphemes: 4,
            max_cache_size: 1000,
            max_lookup_attempts: 3,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Text helpers used on both sides of the pipeline.
pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }

    /// Fold katakana into hiragana; every other character passes through.
    ///
    /// Covers the main katakana block (ァ..ヶ). The prolonged sound mark ー
    /// has no hiragana counterpart and is kept as-is.
    pub fn katakana_to_hiragana(s: &str) -> String {
        s.chars()
            .map(|ch| match ch {
                '\u{30A1}'..='\u{30F6}' => {
                    let code = ch as u32;
                    char::from_u32(code - 0x60).unwrap_or(ch)
                }
                _ => ch,
            })
            .collect()
    }

    /// Convert full-width digits (０-９) to ASCII digits.
    pub fn to_half_width_digits(s: &str) -> String {
        s.chars()
            .map(|ch| match ch {
                '\u{FF10}'..='\u{FF19}' => {
                    let code = ch as u32;
                    char::from_u32(code - 0xFF10 + '0' as u32).unwrap_or(ch)
                }
                _ => ch,
            })
            .collect()
    }

    /// Convert ASCII digits to their full-width counterparts (０-９).
    pub fn to_full_width_digits(s: &str) -> String {
        s.chars()
            .map(|ch| match ch {
                '0'..='9' => {
                    let code = ch as u32;
                    char::from_u32(code - '0' as u32 + 0xFF10).unwrap_or(ch)
                }
                _ => ch,
            })
            .collect()
    }

    pub fn is_hiragana(ch: char) -> bool {
        matches!(ch, '\u{3040}'..='\u{309F}')
    }

    pub fn is_katakana(ch: char) -> bool {
        matches!(ch, '\u{30A0}'..='\u{30FF}')
    }

    /// True when every character of a non-empty string is kana (including
    /// the prolonged sound mark).
    pub fn is_kana(s: &str) -> bool {
        !s.is_empty() && s.chars().all(|c| is_hiragana(c) || is_katakana(c))
    }

    /// True when every character of a non-empty string belongs to the
    /// Japanese scripts (kana, CJK ideographs, iteration mark).
    pub fn is_japanese(s: &str) -> bool {
        !s.is_empty()
            && s.chars().all(|c| {
                is_hiragana(c)
                    || is_katakana(c)
                    || matches!(c, '\u{4E00}'..='\u{9FAF}')
                    || c == '\u{3005}'
            })
    }

    /// Checks whether the first character is an ASCII or full-width letter.
    pub fn is_ascii_or_full_width_letter(s: &str) -> bool {
        match s.chars().next() {
            Some(c) => {
                c.is_ascii_alphabetic() || matches!(c, '\u{FF21}'..='\u{FF3A}' | '\u{FF41}'..='\u{FF5A}')
            }
            None => false,
        }
    }

}
