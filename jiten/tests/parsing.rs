//! End-to-end parsing over a scripted analyzer and an in-memory dictionary.

use std::collections::HashMap;
use std::sync::Arc;

use jiten::{
    Config, Entry, MemoryDictionary, Model, Morpheme, MorphemeAnalyzer, ParseError, Parser,
    PartOfSpeech,
};

/// Analyzer replaying canned segmentations, the way a real morphological
/// analyzer would split each sentence.
struct ScriptedAnalyzer(HashMap<String, Vec<Morpheme>>);

impl ScriptedAnalyzer {
    fn new() -> Self {
        Self(HashMap::new())
    }

    fn script(&mut self, text: &str, parts: &[(&str, PartOfSpeech, Option<&str>)]) {
        self.0.insert(text.to_string(), morphemes(parts));
    }
}

impl MorphemeAnalyzer for ScriptedAnalyzer {
    fn segment(&self, text: &str) -> Vec<Morpheme> {
        self.0.get(text).cloned().unwrap_or_default()
    }
}

fn morphemes(parts: &[(&str, PartOfSpeech, Option<&str>)]) -> Vec<Morpheme> {
    let mut out = Vec::new();
    let mut start = 0;
    for (surface, pos, base) in parts {
        let mut m = Morpheme::new(surface, start, *pos);
        if let Some(base) = base {
            m = m.with_base_form(base);
        }
        start = m.end;
        out.push(m);
    }
    out
}

fn entry(id: u32, writings: &[&str], readings: &[&str], pos: &[PartOfSpeech]) -> Entry {
    Entry {
        id,
        writings: writings.iter().map(|s| s.to_string()).collect(),
        readings: readings.iter().map(|s| s.to_string()).collect(),
        parts_of_speech: pos.to_vec(),
        senses: Vec::new(),
        priorities: Vec::new(),
        misc: Vec::new(),
    }
}

fn fixture_dictionary() -> MemoryDictionary {
    use PartOfSpeech::*;
    let mut dict = MemoryDictionary::new();
    dict.insert(entry(1, &["見る"], &["みる"], &[Verb]));
    dict.insert(entry(2, &[], &["が"], &[Particle]));
    dict.insert(entry(3, &[], &["アニメ"], &[Noun]));
    dict.insert(entry(4, &[], &["を"], &[Particle]));
    dict.insert(entry(5, &["美少女"], &["びしょうじょ"], &[Noun]));
    dict.insert(entry(6, &["学生"], &["がくせい"], &[Noun]));
    dict.insert(entry(7, &["読む"], &["よむ"], &[Verb]));
    dict.insert(entry(8, &["高い"], &["たかい"], &[IAdjective]));
    dict.insert(entry(9, &["茶"], &["ちゃ"], &[Noun]));
    dict.insert(entry(10, &[], &["だ"], &[Auxiliary]));
    dict.insert(entry(11, &["紙"], &["かみ"], &[Noun]));
    let mut god = entry(12, &["神"], &["かみ"], &[PartOfSpeech::Noun]);
    god.priorities = vec!["ichi1".into()];
    dict.insert(god);
    dict.insert(entry(13, &["方"], &["かた", "ほう"], &[Noun]));
    dict
}

fn parser_with(analyzer: ScriptedAnalyzer) -> Parser<ScriptedAnalyzer> {
    let model = Model::with_standard_rules(Arc::new(fixture_dictionary()), Config::default());
    Parser::new(model, analyzer)
}

#[test]
fn split_conjugated_verb_merges_into_one_span() {
    let mut analyzer = ScriptedAnalyzer::new();
    analyzer.script(
        "見ている",
        &[
            ("見て", PartOfSpeech::Verb, Some("見る")),
            ("いる", PartOfSpeech::Verb, Some("いる")),
        ],
    );
    let parser = parser_with(analyzer);

    let spans = parser.parse_text("見ている").unwrap();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].surface, "見ている");
    assert_eq!(spans[0].entry_id, Some(1));
    assert_eq!(spans[0].conjugations, vec!["progressive", "te-form"]);
}

#[test]
fn particle_resolves_directly_without_conjugations() {
    let mut analyzer = ScriptedAnalyzer::new();
    analyzer.script("が", &[("が", PartOfSpeech::Particle, None)]);
    let parser = parser_with(analyzer);

    let spans = parser.parse_text("が").unwrap();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].entry_id, Some(2));
    assert!(spans[0].conjugations.is_empty());
}

#[test]
fn unmatched_text_becomes_an_unknown_span() {
    let mut analyzer = ScriptedAnalyzer::new();
    analyzer.script("ぴよぴよ", &[("ぴよぴよ", PartOfSpeech::Noun, None)]);
    let parser = parser_with(analyzer);

    let spans = parser.parse_text("ぴよぴよ").unwrap();
    assert_eq!(spans.len(), 1);
    assert!(spans[0].is_unknown());
    assert_eq!(spans[0].surface, "ぴよぴよ");
}

#[test]
fn full_sentence_tiles_the_input() {
    let text = "美少女がアニメを見ている。";
    let mut analyzer = ScriptedAnalyzer::new();
    analyzer.script(
        text,
        &[
            ("美少女", PartOfSpeech::Noun, None),
            ("が", PartOfSpeech::Particle, None),
            ("アニメ", PartOfSpeech::Noun, None),
            ("を", PartOfSpeech::Particle, None),
            ("見て", PartOfSpeech::Verb, Some("見る")),
            ("いる", PartOfSpeech::Verb, Some("いる")),
            ("。", PartOfSpeech::Symbol, None),
        ],
    );
    let parser = parser_with(analyzer);

    let spans = parser.parse_text(text).unwrap();
    let surfaces: Vec<&str> = spans.iter().map(|s| s.surface.as_str()).collect();
    assert_eq!(surfaces, vec!["美少女", "が", "アニメ", "を", "見ている", "。"]);

    // covering: contiguous, in order, concatenating back to the input
    let mut cursor = 0;
    for span in &spans {
        assert_eq!(span.start, cursor);
        assert_eq!(&text[span.start..span.end], span.surface);
        cursor = span.end;
    }
    assert_eq!(cursor, text.len());

    assert_eq!(spans[0].entry_id, Some(5));
    assert_eq!(spans[4].entry_id, Some(1));
    assert!(spans[5].is_unknown());
}

#[test]
fn noun_plus_copula_stays_split() {
    let text = "学生です";
    let mut analyzer = ScriptedAnalyzer::new();
    analyzer.script(
        text,
        &[
            ("学生", PartOfSpeech::Noun, None),
            ("です", PartOfSpeech::Auxiliary, Some("だ")),
        ],
    );
    let parser = parser_with(analyzer);

    let spans = parser.parse_text(text).unwrap();
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].entry_id, Some(6));
    // the copula resolves to its own headword through the rewrite layer
    assert_eq!(spans[1].entry_id, Some(10));
    assert_eq!(spans[1].conjugations, vec!["polite"]);
}

#[test]
fn honorific_prefix_falls_back_to_the_bare_noun() {
    let mut analyzer = ScriptedAnalyzer::new();
    analyzer.script("お茶", &[("お茶", PartOfSpeech::Noun, None)]);
    let parser = parser_with(analyzer);

    let spans = parser.parse_text("お茶").unwrap();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].entry_id, Some(9));
    assert_eq!(spans[0].surface, "お茶");
}

#[test]
fn priority_breaks_homophone_ties() {
    let mut analyzer = ScriptedAnalyzer::new();
    analyzer.script("かみ", &[("かみ", PartOfSpeech::Noun, None)]);
    let parser = parser_with(analyzer);

    let spans = parser.parse_text("かみ").unwrap();
    assert_eq!(spans[0].entry_id, Some(12));
}

#[test]
fn katakana_surface_resolves_directly() {
    let mut analyzer = ScriptedAnalyzer::new();
    analyzer.script("アニメ", &[("アニメ", PartOfSpeech::Noun, None)]);
    let parser = parser_with(analyzer);

    let spans = parser.parse_text("アニメ").unwrap();
    assert_eq!(spans[0].entry_id, Some(3));
    assert_eq!(spans[0].reading_index, 0);
}

#[test]
fn digits_are_unknown_spans_not_lookups() {
    let mut analyzer = ScriptedAnalyzer::new();
    analyzer.script("１２３", &[("１２３", PartOfSpeech::Numeral, None)]);
    let parser = parser_with(analyzer);

    let spans = parser.parse_text("１２３").unwrap();
    assert!(spans[0].is_unknown());
}

#[test]
fn empty_input_yields_no_spans() {
    let parser = parser_with(ScriptedAnalyzer::new());
    assert!(parser.parse_text("").unwrap().is_empty());
}

#[test]
fn parsing_is_deterministic() {
    let text = "美少女がアニメを見ている。";
    let script = [
        ("美少女", PartOfSpeech::Noun, None),
        ("が", PartOfSpeech::Particle, None),
        ("アニメ", PartOfSpeech::Noun, None),
        ("を", PartOfSpeech::Particle, None),
        ("見て", PartOfSpeech::Verb, Some("見る")),
        ("いる", PartOfSpeech::Verb, Some("いる")),
        ("。", PartOfSpeech::Symbol, None),
    ];
    let mut analyzer = ScriptedAnalyzer::new();
    analyzer.script(text, &script);
    let parser = parser_with(analyzer);

    let first = parser.parse_text(text).unwrap();
    let second = parser.parse_text(text).unwrap();
    assert_eq!(first, second);
}

#[test]
fn repeated_parses_hit_the_cache() {
    let mut analyzer = ScriptedAnalyzer::new();
    analyzer.script(
        "見ている",
        &[
            ("見て", PartOfSpeech::Verb, Some("見る")),
            ("いる", PartOfSpeech::Verb, Some("いる")),
        ],
    );
    let parser = parser_with(analyzer);

    parser.parse_text("見ている").unwrap();
    let (hits_before, _) = parser.cache_stats();
    parser.parse_text("見ている").unwrap();
    let (hits_after, _) = parser.cache_stats();
    assert!(hits_after > hits_before);
    assert!(parser.cache_hit_rate() > 0.0);

    parser.clear_cache();
    assert_eq!(parser.cache_stats(), (0, 0));
    assert_eq!(parser.cache_size(), 0);
}

#[test]
fn homograph_reading_hints_are_cached_separately() {
    // 方 maps to one entry with two readings; the analyzer's reading hint
    // decides the index, so the second hint must not see the first's memo
    let parser = parser_with(ScriptedAnalyzer::new());
    let kata = vec![Morpheme::new("方", 0, PartOfSpeech::Noun).with_reading("カタ")];
    let hou = vec![Morpheme::new("方", 0, PartOfSpeech::Noun).with_reading("ホウ")];

    let first = parser.resolve_morphemes("方", &kata).unwrap();
    assert_eq!(first[0].entry_id, Some(13));
    assert_eq!(first[0].reading_index, 0);

    let second = parser.resolve_morphemes("方", &hou).unwrap();
    assert_eq!(second[0].entry_id, Some(13));
    assert_eq!(second[0].reading_index, 1);
}

#[test]
fn decomposed_surfaces_are_normalized_for_lookup() {
    // が written as か + combining dakuten still resolves; the span keeps
    // the original bytes
    let text = "か\u{3099}";
    let mut analyzer = ScriptedAnalyzer::new();
    analyzer.script(text, &[(text, PartOfSpeech::Particle, None)]);
    let parser = parser_with(analyzer);

    let spans = parser.parse_text(text).unwrap();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].entry_id, Some(2));
    assert_eq!(spans[0].surface, text);
}

#[test]
fn gapped_analyzer_output_is_a_hard_error() {
    struct GappedAnalyzer;
    impl MorphemeAnalyzer for GappedAnalyzer {
        fn segment(&self, _text: &str) -> Vec<Morpheme> {
            vec![
                Morpheme::new("見て", 0, PartOfSpeech::Verb),
                // skips the bytes in between
                Morpheme::new("る", 9, PartOfSpeech::Verb),
            ]
        }
    }
    let model = Model::with_standard_rules(Arc::new(fixture_dictionary()), Config::default());
    let parser = Parser::new(model, GappedAnalyzer);

    let err = parser.parse_text("見ている").unwrap_err();
    assert!(matches!(err, ParseError::MorphemeStream { index: 1, .. }));
}

#[test]
fn entry_without_readings_is_an_integrity_error() {
    use PartOfSpeech::*;
    let mut dict = MemoryDictionary::new();
    dict.insert(entry(99, &["壊"], &[], &[Noun]));
    let model = Model::with_standard_rules(Arc::new(dict), Config::default());

    let mut analyzer = ScriptedAnalyzer::new();
    analyzer.script("壊", &[("壊", Noun, None)]);
    let parser = Parser::new(model, analyzer);

    let err = parser.parse_text("壊").unwrap_err();
    assert!(matches!(err, ParseError::DictionaryIntegrity { entry_id: 99, .. }));
}

#[test]
fn merge_is_bounded_by_the_configured_run_length() {
    // with merging capped at 1 the conjugated verb stays split and the
    // auxiliary tail becomes its own (unknown) span
    let mut analyzer = ScriptedAnalyzer::new();
    analyzer.script(
        "見ている",
        &[
            ("見て", PartOfSpeech::Verb, Some("見る")),
            ("いる", PartOfSpeech::Verb, Some("いる")),
        ],
    );
    let config = Config { max_merge_morphemes: 1, ..Config::default() };
    let model = Model::with_standard_rules(Arc::new(fixture_dictionary()), config);
    let parser = Parser::new(model, analyzer);

    let spans = parser.parse_text("見ている").unwrap();
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].surface, "見て");
    assert_eq!(spans[0].entry_id, Some(1));
    assert_eq!(spans[0].conjugations, vec!["te-form"]);
}
