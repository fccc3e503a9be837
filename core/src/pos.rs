//! Part-of-speech model.
//!
//! A closed enumeration covering the coarse tags the morphological analyzer
//! emits and the tags dictionary entries carry, plus the four-class keying
//! used by the conjugation rule table. Conjugation grammar only differs
//! between verbs, i-adjectives, na-adjectives and auxiliaries; everything
//! else never enters the deconjugator.

use serde::{Deserialize, Serialize};

/// Coarse part-of-speech tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartOfSpeech {
    Unknown,
    Noun,
    Verb,
    IAdjective,
    NaAdjective,
    Adverb,
    Particle,
    Conjunction,
    Auxiliary,
    Interjection,
    Symbol,
    Prefix,
    Suffix,
    Pronoun,
    Numeral,
    Counter,
    Expression,
    Name,
    PrenounAdjectival,
    Filler,
    BlankSpace,
}

/// The four part-of-speech classes the rule table is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConjugationClass {
    Verb,
    IAdjective,
    NaAdjective,
    Auxiliary,
}

impl ConjugationClass {
    pub const ALL: [ConjugationClass; 4] = [
        ConjugationClass::Verb,
        ConjugationClass::IAdjective,
        ConjugationClass::NaAdjective,
        ConjugationClass::Auxiliary,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            ConjugationClass::Verb => 0,
            ConjugationClass::IAdjective => 1,
            ConjugationClass::NaAdjective => 2,
            ConjugationClass::Auxiliary => 3,
        }
    }
}

impl PartOfSpeech {
    /// Map an analyzer tag (the first field of a Sudachi-style part-of-speech
    /// tuple) to a coarse tag. Unrecognized tags map to `Unknown`.
    pub fn from_analyzer_tag(tag: &str) -> Self {
        match tag {
            "名詞" | "普通名詞" => PartOfSpeech::Noun,
            "動詞" => PartOfSpeech::Verb,
            "形容詞" => PartOfSpeech::IAdjective,
            "形状詞" => PartOfSpeech::NaAdjective,
            "副詞" => PartOfSpeech::Adverb,
            "助詞" => PartOfSpeech::Particle,
            "接続詞" => PartOfSpeech::Conjunction,
            "助動詞" => PartOfSpeech::Auxiliary,
            "感動詞" => PartOfSpeech::Interjection,
            "記号" | "補助記号" => PartOfSpeech::Symbol,
            "接頭詞" | "接頭辞" => PartOfSpeech::Prefix,
            "接尾辞" => PartOfSpeech::Suffix,
            "代名詞" => PartOfSpeech::Pronoun,
            "数詞" => PartOfSpeech::Numeral,
            "助数詞" => PartOfSpeech::Counter,
            "連体詞" => PartOfSpeech::PrenounAdjectival,
            "フィラー" => PartOfSpeech::Filler,
            "空白" => PartOfSpeech::BlankSpace,
            _ => PartOfSpeech::Unknown,
        }
    }

    /// Map a dictionary (JMdict-style) tag to a coarse tag.
    ///
    /// Verb tags are open-ended (v1, v5r, vs-i, vk, ...) so anything starting
    /// with `v` other than the adjective tags counts as a verb.
    pub fn from_dictionary_tag(tag: &str) -> Self {
        match tag {
            "n" | "n-adv" | "n-t" | "n-pr" => PartOfSpeech::Noun,
            "adj-i" | "adj-ix" => PartOfSpeech::IAdjective,
            "adj-na" => PartOfSpeech::NaAdjective,
            "adv" | "adv-to" => PartOfSpeech::Adverb,
            "prt" => PartOfSpeech::Particle,
            "conj" => PartOfSpeech::Conjunction,
            "aux" | "aux-v" | "aux-adj" | "cop" => PartOfSpeech::Auxiliary,
            "int" => PartOfSpeech::Interjection,
            "pref" => PartOfSpeech::Prefix,
            "suf" | "n-suf" => PartOfSpeech::Suffix,
            "pn" => PartOfSpeech::Pronoun,
            "num" => PartOfSpeech::Numeral,
            "ctr" => PartOfSpeech::Counter,
            "exp" => PartOfSpeech::Expression,
            "adj-pn" => PartOfSpeech::PrenounAdjectival,
            "surname" | "given" | "person" | "place" | "organization" | "company" | "product"
            | "station" | "work" | "unclass" => PartOfSpeech::Name,
            t if t.starts_with('v') => PartOfSpeech::Verb,
            _ => PartOfSpeech::Unknown,
        }
    }

    pub fn from_dictionary_tags(tags: &[String]) -> Vec<PartOfSpeech> {
        tags.iter().map(|t| PartOfSpeech::from_dictionary_tag(t)).collect()
    }

    /// The rule-table class this tag conjugates under, if any.
    pub fn conjugation_class(self) -> Option<ConjugationClass> {
        match self {
            PartOfSpeech::Verb => Some(ConjugationClass::Verb),
            PartOfSpeech::IAdjective => Some(ConjugationClass::IAdjective),
            PartOfSpeech::NaAdjective => Some(ConjugationClass::NaAdjective),
            PartOfSpeech::Auxiliary => Some(ConjugationClass::Auxiliary),
            _ => None,
        }
    }

    pub fn is_conjugating(self) -> bool {
        self.conjugation_class().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyzer_tags_map() {
        assert_eq!(PartOfSpeech::from_analyzer_tag("動詞"), PartOfSpeech::Verb);
        assert_eq!(PartOfSpeech::from_analyzer_tag("助詞"), PartOfSpeech::Particle);
        assert_eq!(PartOfSpeech::from_analyzer_tag("形状詞"), PartOfSpeech::NaAdjective);
        assert_eq!(PartOfSpeech::from_analyzer_tag("謎"), PartOfSpeech::Unknown);
    }

    #[test]
    fn dictionary_tags_map() {
        assert_eq!(PartOfSpeech::from_dictionary_tag("v5r"), PartOfSpeech::Verb);
        assert_eq!(PartOfSpeech::from_dictionary_tag("v1"), PartOfSpeech::Verb);
        assert_eq!(PartOfSpeech::from_dictionary_tag("adj-i"), PartOfSpeech::IAdjective);
        assert_eq!(PartOfSpeech::from_dictionary_tag("prt"), PartOfSpeech::Particle);
        assert_eq!(PartOfSpeech::from_dictionary_tag("n"), PartOfSpeech::Noun);
    }

    #[test]
    fn only_four_classes_conjugate() {
        assert_eq!(PartOfSpeech::Verb.conjugation_class(), Some(ConjugationClass::Verb));
        assert_eq!(
            PartOfSpeech::IAdjective.conjugation_class(),
            Some(ConjugationClass::IAdjective)
        );
        assert!(PartOfSpeech::Noun.conjugation_class().is_none());
        assert!(!PartOfSpeech::Particle.is_conjugating());
    }
}
