//! Built-in standard deconjugation table.
//!
//! Rules are ordered roughly outermost-layer-first (polite and compound
//! endings before single-character ones); the compiled `RuleSet` re-sorts
//! by ending length anyway, so this order only breaks ties.
//!
//! Tag conventions: `dec_tag` names the class of the form a rule produces
//! ("v1", "v5k", "adj-i", "aux-masu", "stem-te", "past", ...), `con_tag`
//! names the tag the current form must carry for the rule to chain onto it.
//! A rule with no `con_tag` can start a chain on bare surface text.

use crate::pos::ConjugationClass::{self, Auxiliary, IAdjective, NaAdjective, Verb};
use crate::rule::{ContextKind, DeconjRule, RuleKind};

fn std_rule(
    detail: &str,
    con_end: &[&str],
    dec_end: &[&str],
    con_tag: Option<&[&str]>,
    dec_tag: Option<&[&str]>,
    classes: &[ConjugationClass],
) -> DeconjRule {
    DeconjRule::new(RuleKind::Std, detail, con_end, dec_end, con_tag, dec_tag, classes)
}

fn only_final(
    detail: &str,
    con_end: &[&str],
    dec_end: &[&str],
    dec_tag: Option<&[&str]>,
    classes: &[ConjugationClass],
) -> DeconjRule {
    DeconjRule::new(RuleKind::OnlyFinal, detail, con_end, dec_end, None, dec_tag, classes)
}

fn rewrite(detail: &str, con_end: &str, dec_end: &str, dec_tag: &str) -> DeconjRule {
    DeconjRule::new(
        RuleKind::Rewrite,
        detail,
        &[con_end],
        &[dec_end],
        None,
        Some(&[dec_tag]),
        &[Auxiliary],
    )
}

fn substitution(detail: &str, con_end: &str, dec_end: &str) -> DeconjRule {
    DeconjRule::new(RuleKind::Substitution, detail, &[con_end], &[dec_end], None, None, &[])
}

/// Dictionary-class tags for the eleven godan/ichidan verb columns plus
/// suru and kuru, in the column order every verb rule below uses.
const VERB_TAGS: &[&str] = &[
    "v1", "v5u", "v5k", "v5g", "v5s", "v5t", "v5n", "v5b", "v5m", "v5r", "vs", "vk",
];

/// The standard rule table.
///
/// Coverage: polite forms and their compounds, te-form and the te-auxiliary
/// family, past, negative (plain and archaic), potential, passive,
/// causative, desiderative, volitional, imperative, conditional and
/// provisional forms for verbs; the common i-adjective inflections; the
/// copula layers behind na-adjectives; and a couple of orthography
/// substitutions.
pub fn standard_rules() -> Vec<DeconjRule> {
    let v = &[Verb];
    let masu = Some(&["aux-masu"] as &[&str]);
    let vtags = Some(VERB_TAGS);

    vec![
        // --- layers on top of the polite auxiliary ます ---
        std_rule("polite negative past", &["ませんでした"], &["ます"], masu, masu, v),
        std_rule("polite volitional", &["ましょう"], &["ます"], masu, masu, v),
        std_rule("polite negative", &["ません"], &["ます"], masu, masu, v),
        std_rule("polite past", &["ました"], &["ます"], masu, masu, v),
        std_rule("polite te-form", &["まして"], &["ます"], masu, masu, v),
        // --- the polite auxiliary itself, one column per verb class ---
        std_rule(
            "polite",
            &[
                "ます", "います", "きます", "ぎます", "します", "ちます", "にます",
                "びます", "みます", "ります", "します", "きます",
            ],
            &["る", "う", "く", "ぐ", "す", "つ", "ぬ", "ぶ", "む", "る", "する", "くる"],
            masu,
            vtags,
            v,
        ),
        // --- te-form, per verb class ---
        std_rule(
            "te-form",
            &[
                "て", "って", "いて", "いで", "して", "って", "んで", "んで", "んで",
                "って", "して", "きて",
            ],
            &["る", "う", "く", "ぐ", "す", "つ", "ぬ", "ぶ", "む", "る", "する", "くる"],
            Some(&["stem-te"]),
            vtags,
            v,
        ),
        // 行く and friends take った rather than いた
        std_rule("te-form", &["って"], &["く"], Some(&["stem-te"]), Some(&["v5k"]), v),
        // --- past, per verb class ---
        std_rule(
            "past",
            &[
                "た", "った", "いた", "いだ", "した", "った", "んだ", "んだ", "んだ",
                "った", "した", "きた",
            ],
            &["る", "う", "く", "ぐ", "す", "つ", "ぬ", "ぶ", "む", "る", "する", "くる"],
            Some(&["past"]),
            vtags,
            v,
        ),
        std_rule("past", &["った"], &["く"], Some(&["past"]), Some(&["v5k"]), v),
        // たら/たり stack on the past layer
        std_rule(
            "conditional",
            &["ら"],
            &[""],
            Some(&["past"]),
            Some(&["past"]),
            &[Verb, IAdjective, NaAdjective],
        ),
        std_rule("alternative", &["り"], &[""], Some(&["past"]), Some(&["past"]), v),
        // --- plain negative, conjugates like an i-adjective ---
        std_rule(
            "negative",
            &[
                "ない", "わない", "かない", "がない", "さない", "たない", "なない",
                "ばない", "まない", "らない", "しない", "こない",
            ],
            &["る", "う", "く", "ぐ", "す", "つ", "ぬ", "ぶ", "む", "る", "する", "くる"],
            Some(&["adj-i"]),
            vtags,
            v,
        ),
        std_rule("archaic negative", &["ず"], &["ない"], None, Some(&["adj-i"]), v),
        // --- potential and passive produce ichidan verbs ---
        std_rule(
            "potential",
            &[
                "られる", "える", "ける", "げる", "せる", "てる", "ねる", "べる",
                "める", "れる", "できる", "こられる",
            ],
            &["る", "う", "く", "ぐ", "す", "つ", "ぬ", "ぶ", "む", "る", "する", "くる"],
            Some(&["v1"]),
            vtags,
            v,
        ),
        std_rule(
            "passive",
            &[
                "られる", "われる", "かれる", "がれる", "される", "たれる", "なれる",
                "ばれる", "まれる", "られる", "される", "こられる",
            ],
            &["る", "う", "く", "ぐ", "す", "つ", "ぬ", "ぶ", "む", "る", "する", "くる"],
            Some(&["v1"]),
            vtags,
            v,
        ),
        // --- causative; the godan-す column needs a context guard so it
        // does not re-fire on its own させる output ---
        std_rule(
            "causative",
            &[
                "させる", "わせる", "かせる", "がせる", "たせる", "なせる", "ばせる",
                "ませる", "らせる", "させる", "こさせる",
            ],
            &["る", "う", "く", "ぐ", "つ", "ぬ", "ぶ", "む", "る", "する", "くる"],
            Some(&["v1"]),
            Some(&["v1", "v5u", "v5k", "v5g", "v5t", "v5n", "v5b", "v5m", "v5r", "vs", "vk"]),
            v,
        ),
        std_rule("causative", &["させる"], &["す"], Some(&["v1"]), Some(&["v5s"]), v)
            .with_context(ContextKind::SaSpecial),
        // --- desiderative, conjugates like an i-adjective ---
        std_rule(
            "desiderative",
            &[
                "たい", "いたい", "きたい", "ぎたい", "したい", "ちたい", "にたい",
                "びたい", "みたい", "りたい", "したい", "きたい",
            ],
            &["る", "う", "く", "ぐ", "す", "つ", "ぬ", "ぶ", "む", "る", "する", "くる"],
            Some(&["adj-i"]),
            vtags,
            v,
        ),
        // --- outermost-only verb forms ---
        only_final(
            "volitional",
            &[
                "よう", "おう", "こう", "ごう", "そう", "とう", "のう", "ぼう", "もう",
                "ろう", "しよう", "こよう",
            ],
            &["る", "う", "く", "ぐ", "す", "つ", "ぬ", "ぶ", "む", "る", "する", "くる"],
            vtags,
            v,
        ),
        only_final(
            "imperative",
            &[
                "ろ", "え", "け", "げ", "せ", "て", "ね", "べ", "め", "れ", "しろ", "こい",
            ],
            &["る", "う", "く", "ぐ", "す", "つ", "ぬ", "ぶ", "む", "る", "する", "くる"],
            vtags,
            v,
        ),
        only_final("imperative", &["よ"], &["る"], Some(&["v1"]), v),
        only_final("imperative", &["せよ"], &["する"], Some(&["vs"]), v),
        only_final(
            "provisional conditional",
            &[
                "れば", "えば", "けば", "げば", "せば", "てば", "ねば", "べば", "めば",
                "れば", "すれば", "くれば",
            ],
            &["る", "う", "く", "ぐ", "す", "つ", "ぬ", "ぶ", "む", "る", "する", "くる"],
            vtags,
            v,
        ),
        only_final(
            "polite imperative",
            &[
                "なさい", "いなさい", "きなさい", "ぎなさい", "しなさい", "ちなさい",
                "になさい", "びなさい", "みなさい", "りなさい",
            ],
            &["る", "う", "く", "ぐ", "す", "つ", "ぬ", "ぶ", "む", "る"],
            Some(&["v1", "v5u", "v5k", "v5g", "v5s", "v5t", "v5n", "v5b", "v5m", "v5r"]),
            v,
        ),
        // --- auxiliaries stacking on the te-form ---
        std_rule(
            "progressive",
            &["ている", "てる", "でいる", "でる"],
            &["て", "て", "で", "で"],
            Some(&["v1"]),
            Some(&["stem-te"]),
            v,
        ),
        std_rule(
            "resultative",
            &["てある", "である"],
            &["て", "で"],
            Some(&["v5r"]),
            Some(&["stem-te"]),
            v,
        ),
        std_rule(
            "preparatory",
            &["ておく", "でおく", "とく", "どく"],
            &["て", "で", "て", "で"],
            Some(&["v5k"]),
            Some(&["stem-te"]),
            v,
        ),
        std_rule(
            "attemptive",
            &["てみる", "でみる"],
            &["て", "で"],
            Some(&["v1"]),
            Some(&["stem-te"]),
            v,
        ),
        std_rule(
            "completed",
            &["てしまう", "でしまう", "ちゃう", "じゃう"],
            &["て", "で", "て", "で"],
            Some(&["v5u"]),
            Some(&["stem-te"]),
            v,
        ),
        std_rule(
            "directional (going)",
            &["ていく", "でいく"],
            &["て", "で"],
            Some(&["v5k"]),
            Some(&["stem-te"]),
            v,
        ),
        std_rule(
            "directional (coming)",
            &["てくる", "でくる"],
            &["て", "で"],
            Some(&["vk"]),
            Some(&["stem-te"]),
            v,
        ),
        std_rule(
            "benefactive (giving)",
            &["てあげる", "であげる", "てくれる", "でくれる"],
            &["て", "で", "て", "で"],
            Some(&["v1"]),
            Some(&["stem-te"]),
            v,
        ),
        std_rule(
            "benefactive (receiving)",
            &["てもらう", "でもらう"],
            &["て", "で"],
            Some(&["v5u"]),
            Some(&["stem-te"]),
            v,
        ),
        only_final(
            "request",
            &["てください", "でください"],
            &["て", "で"],
            Some(&["stem-te"]),
            v,
        ),
        // --- i-adjective inflections; also in the verb bucket since the
        // negative and desiderative verb layers conjugate as adj-i ---
        std_rule("past", &["かった"], &["い"], Some(&["past"]), Some(&["adj-i"]), &[Verb, IAdjective]),
        std_rule(
            "negative",
            &["くない"],
            &["い"],
            Some(&["adj-i"]),
            Some(&["adj-i"]),
            &[Verb, IAdjective],
        ),
        std_rule("te-form", &["くて"], &["い"], None, Some(&["adj-i"]), &[Verb, IAdjective]),
        std_rule("adverbial", &["く"], &["い"], None, Some(&["adj-i"]), &[Verb, IAdjective]),
        only_final("provisional conditional", &["ければ"], &["い"], Some(&["adj-i"]), &[IAdjective]),
        only_final("nominalization", &["さ"], &["い"], Some(&["adj-i"]), &[IAdjective]),
        only_final("volitional", &["かろう"], &["い"], Some(&["adj-i"]), &[IAdjective]),
        // --- copula layers behind na-adjectives and nouns ---
        std_rule(
            "past (copula)",
            &["だった"],
            &[""],
            Some(&["past"]),
            Some(&["adj-na"]),
            &[NaAdjective],
        ),
        std_rule(
            "negative (copula)",
            &["ではない", "じゃない"],
            &["", ""],
            Some(&["adj-i"]),
            Some(&["adj-na"]),
            &[NaAdjective],
        ),
        only_final("polite (copula)", &["です"], &[""], Some(&["adj-na"]), &[NaAdjective]),
        only_final("polite past (copula)", &["でした"], &[""], Some(&["adj-na"]), &[NaAdjective]),
        only_final("attributive", &["な"], &[""], Some(&["adj-na"]), &[NaAdjective]),
        // --- the copula as a word of its own ---
        rewrite("polite", "です", "だ", "cop"),
        rewrite("polite past", "でした", "だ", "cop"),
        rewrite("past", "だった", "だ", "cop"),
        // --- orthography ---
        substitution("orthography", "ゎ", "わ"),
        substitution("orthography", "ヮ", "わ"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleSet;

    #[test]
    fn table_compiles() {
        let set = RuleSet::compile(&standard_rules());
        assert!(set.len() > 40);
        let labels = set.labels();
        for expected in ["polite", "te-form", "past", "negative", "potential", "causative"] {
            assert!(labels.contains(&expected), "missing label {expected}");
        }
    }

    #[test]
    fn verb_columns_are_aligned() {
        for rule in standard_rules() {
            if rule.con_end.len() > 1 {
                assert_eq!(
                    rule.con_end.len(),
                    rule.dec_end.len(),
                    "misaligned endings in {:?}",
                    rule.detail
                );
            }
        }
    }
}
