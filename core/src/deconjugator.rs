//! Breadth-first deconjugation.
//!
//! Starting from surface text, repeatedly applies the reverse rewrite rules
//! until no new forms appear. Every intermediate form is part of the result:
//! a caller looking up 見ていた wants 見ている and 見る both, since either
//! may be the dictionary headword.

use std::sync::Arc;

use ahash::AHashSet;
use tracing::trace;

use crate::pos::ConjugationClass;
use crate::rule::{CompiledRule, ContextKind, RuleKind, RuleSet, Variant};
use crate::Config;

/// One candidate deconjugation.
///
/// `text` is the (partially) deconjugated writing, `process` the grammatical
/// labels applied so far, outermost first, and `tags` the class-tag stack
/// that gates further rule chaining.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeconjugationForm {
    pub text: String,
    pub original_text: String,
    pub tags: Vec<String>,
    pub process: Vec<String>,
}

impl DeconjugationForm {
    fn initial(text: &str) -> Self {
        Self {
            text: text.to_string(),
            original_text: text.to_string(),
            tags: Vec::new(),
            process: Vec::new(),
        }
    }

    /// Number of grammatical layers stripped to reach this form.
    pub fn chain_len(&self) -> usize {
        self.process.len()
    }

    /// True for the untouched surface text itself.
    pub fn is_identity(&self) -> bool {
        self.process.is_empty()
    }
}

/// The deconjugation engine. Cheap to clone; the rule table is shared.
#[derive(Debug, Clone)]
pub struct Deconjugator {
    rules: Arc<RuleSet>,
    config: Config,
}

impl Deconjugator {
    pub fn new(rules: Arc<RuleSet>, config: Config) -> Self {
        Self { rules, config }
    }

    /// Deconjugate with the standard table and default bounds.
    pub fn standard() -> Self {
        Self::new(RuleSet::standard(), Config::default())
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Produce every reachable deconjugation of `text`, the identity form
    /// included. `class` narrows the first round to rules that can produce
    /// a citation form of that class; chained rounds always use the full
    /// table since intermediate layers may belong to any class.
    ///
    /// Termination is guaranteed by the config bounds: forms that grow too
    /// long, stack too many tags or exceed the chain depth are emitted but
    /// never expanded.
    pub fn deconjugate(&self, text: &str, class: Option<ConjugationClass>) -> Vec<DeconjugationForm> {
        if text.is_empty() {
            return Vec::new();
        }

        let original_chars = text.chars().count();
        let mut processed: Vec<DeconjugationForm> = Vec::new();
        let mut seen: AHashSet<DeconjugationForm> = AHashSet::new();

        let initial = DeconjugationForm::initial(text);
        seen.insert(initial.clone());
        let mut frontier = vec![initial];
        let mut first_round = true;

        while !frontier.is_empty() {
            let mut next = Vec::new();
            for form in &frontier {
                if self.should_skip(form, original_chars) {
                    continue;
                }
                let rule_indices = if first_round {
                    self.rules.rules_for(class)
                } else {
                    self.rules.all_rules()
                };
                for &idx in rule_indices {
                    let rule = self.rules.rule(idx);
                    for candidate in self.apply(rule, form) {
                        if seen.insert(candidate.clone()) {
                            trace!(
                                text = %candidate.text,
                                rule = %rule.detail,
                                chain = candidate.chain_len(),
                                "deconjugation step"
                            );
                            next.push(candidate);
                        }
                    }
                }
            }
            processed.extend(frontier);
            frontier = next;
            first_round = false;
        }

        processed
    }

    /// Bounds check; skipped forms stay in the output, they just stop
    /// producing children.
    fn should_skip(&self, form: &DeconjugationForm, original_chars: usize) -> bool {
        form.text.is_empty()
            || form.text.chars().count() > original_chars + self.config.max_text_growth
            || form.tags.len() > original_chars + self.config.max_tag_slack
            || form.process.len() >= self.config.max_chain_depth
    }

    fn apply(&self, rule: &CompiledRule, form: &DeconjugationForm) -> Vec<DeconjugationForm> {
        match rule.kind {
            RuleKind::Std => self.apply_suffix(rule, form, SuffixMode::Std),
            RuleKind::Rewrite => self.apply_suffix(rule, form, SuffixMode::WholeText),
            RuleKind::OnlyFinal => {
                if form.tags.is_empty() {
                    self.apply_suffix(rule, form, SuffixMode::Std)
                } else {
                    Vec::new()
                }
            }
            RuleKind::NeverFinal => {
                if form.tags.is_empty() {
                    Vec::new()
                } else {
                    self.apply_suffix(rule, form, SuffixMode::Std)
                }
            }
            RuleKind::Context => match rule.context {
                Some(context) => {
                    if self.context_allows(context, rule, form) {
                        self.apply_suffix(rule, form, SuffixMode::Std)
                    } else {
                        Vec::new()
                    }
                }
                None => Vec::new(),
            },
            RuleKind::Substitution => self.apply_substitution(rule, form),
        }
    }

    fn context_allows(&self, context: ContextKind, rule: &CompiledRule, form: &DeconjugationForm) -> bool {
        match context {
            // reject when the text right before the ending is さ: that
            // shape is the ichidan/suru causative, not the godan-す one
            ContextKind::SaSpecial => {
                for variant in &rule.variants {
                    if let Some(stem) = form.text.strip_suffix(variant.con_end.as_str()) {
                        if stem.chars().last() == Some('さ') {
                            return false;
                        }
                    }
                }
                true
            }
            ContextKind::V1InfTrap => {
                !(form.tags.len() == 1 && form.tags[0] == "stem-ren")
            }
        }
    }

    /// Suffix (or whole-text) replacement shared by the gated kinds.
    fn apply_suffix(
        &self,
        rule: &CompiledRule,
        form: &DeconjugationForm,
        mode: SuffixMode,
    ) -> Vec<DeconjugationForm> {
        if rule.detail.is_empty() && form.tags.is_empty() {
            return Vec::new();
        }
        let mut out = Vec::new();
        for variant in &rule.variants {
            if let Some(candidate) = self.apply_variant(rule, variant, form, mode) {
                out.push(candidate);
            }
        }
        out
    }

    fn apply_variant(
        &self,
        rule: &CompiledRule,
        variant: &Variant,
        form: &DeconjugationForm,
        mode: SuffixMode,
    ) -> Option<DeconjugationForm> {
        let stem = match mode {
            SuffixMode::Std => form.text.strip_suffix(variant.con_end.as_str())?,
            SuffixMode::WholeText => {
                if form.text == variant.con_end {
                    ""
                } else {
                    return None;
                }
            }
        };
        // chaining gate: the current tag must be what this variant conjugates
        if !form.tags.is_empty() && form.tags.last().map(String::as_str) != variant.con_tag.as_deref()
        {
            return None;
        }

        let new_text = format!("{stem}{}", variant.dec_end);
        if new_text == form.original_text {
            return None;
        }

        let mut tags = form.tags.clone();
        if tags.is_empty() {
            if let Some(con_tag) = &variant.con_tag {
                tags.push(con_tag.clone());
            }
        }
        if let Some(dec_tag) = &variant.dec_tag {
            tags.push(dec_tag.clone());
        }

        let mut process = form.process.clone();
        process.push(rule.detail.clone());

        Some(DeconjugationForm {
            text: new_text,
            original_text: form.original_text.clone(),
            tags,
            process,
        })
    }

    /// Orthography rewrite: applies anywhere in the text, but only before
    /// any grammatical rule has fired.
    fn apply_substitution(&self, rule: &CompiledRule, form: &DeconjugationForm) -> Vec<DeconjugationForm> {
        if !form.process.is_empty() {
            return Vec::new();
        }
        let mut out = Vec::new();
        for variant in &rule.variants {
            if variant.con_end.is_empty() || !form.text.contains(variant.con_end.as_str()) {
                continue;
            }
            let new_text = form.text.replace(variant.con_end.as_str(), &variant.dec_end);
            if new_text == form.original_text {
                continue;
            }
            let mut process = form.process.clone();
            process.push(rule.detail.clone());
            out.push(DeconjugationForm {
                text: new_text,
                original_text: form.original_text.clone(),
                tags: form.tags.clone(),
                process,
            });
        }
        out
    }
}

#[derive(Debug, Clone, Copy)]
enum SuffixMode {
    Std,
    WholeText,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pos::ConjugationClass;
    use crate::rule::{DeconjRule, RuleKind, RuleSet};

    fn engine() -> Deconjugator {
        Deconjugator::standard()
    }

    fn texts_with_chain(forms: &[DeconjugationForm], text: &str) -> Vec<Vec<String>> {
        forms
            .iter()
            .filter(|f| f.text == text)
            .map(|f| f.process.clone())
            .collect()
    }

    #[test]
    fn identity_form_is_always_present() {
        let forms = engine().deconjugate("見る", Some(ConjugationClass::Verb));
        assert!(forms.iter().any(|f| f.is_identity() && f.text == "見る"));
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(engine().deconjugate("", None).is_empty());
    }

    #[test]
    fn progressive_unwinds_to_ichidan_citation() {
        let forms = engine().deconjugate("見ている", Some(ConjugationClass::Verb));
        let chains = texts_with_chain(&forms, "見る");
        assert!(
            chains.contains(&vec!["progressive".to_string(), "te-form".to_string()]),
            "missing progressive chain, got {chains:?}"
        );
    }

    #[test]
    fn past_progressive_unwinds() {
        let forms = engine().deconjugate("見ていた", Some(ConjugationClass::Verb));
        assert!(forms.iter().any(|f| f.text == "見る"));
        assert!(forms.iter().any(|f| f.text == "見ている"));
    }

    #[test]
    fn polite_negative_past_unwinds_to_godan() {
        let forms = engine().deconjugate("読みませんでした", Some(ConjugationClass::Verb));
        let chains = texts_with_chain(&forms, "読む");
        assert!(
            chains.contains(&vec!["polite negative past".to_string(), "polite".to_string()]),
            "got {chains:?}"
        );
    }

    #[test]
    fn negative_past_unwinds() {
        let forms = engine().deconjugate("見なかった", Some(ConjugationClass::Verb));
        let chains = texts_with_chain(&forms, "見る");
        assert!(
            chains.contains(&vec!["past".to_string(), "negative".to_string()]),
            "got {chains:?}"
        );
    }

    #[test]
    fn godan_te_forms_unwind() {
        let forms = engine().deconjugate("書いて", Some(ConjugationClass::Verb));
        assert!(forms.iter().any(|f| f.text == "書く"));
        let forms = engine().deconjugate("読んで", Some(ConjugationClass::Verb));
        assert!(forms.iter().any(|f| f.text == "読む"));
        let forms = engine().deconjugate("行って", Some(ConjugationClass::Verb));
        assert!(forms.iter().any(|f| f.text == "行く"));
    }

    #[test]
    fn suru_verb_past_unwinds() {
        let forms = engine().deconjugate("勉強した", Some(ConjugationClass::Verb));
        assert!(forms.iter().any(|f| f.text == "勉強する"));
    }

    #[test]
    fn i_adjective_negative_unwinds() {
        let forms = engine().deconjugate("高くない", Some(ConjugationClass::IAdjective));
        let chains = texts_with_chain(&forms, "高い");
        assert!(chains.contains(&vec!["negative".to_string()]), "got {chains:?}");
    }

    #[test]
    fn long_causative_chain_stays_within_depth() {
        let forms = engine().deconjugate("行かせられませんでした", Some(ConjugationClass::Verb));
        assert!(forms.iter().any(|f| f.text == "行く"), "行く not reached");
        for form in &forms {
            assert!(form.chain_len() <= Config::default().max_chain_depth);
        }
    }

    #[test]
    fn class_hint_prunes_first_round() {
        // the copula layers live in the na-adjective bucket only, so a
        // verb-hinted lookup never strips です
        let forms = engine().deconjugate("学生です", Some(ConjugationClass::Verb));
        assert!(!forms.iter().any(|f| f.text == "学生"));
        let forms = engine().deconjugate("学生です", Some(ConjugationClass::NaAdjective));
        assert!(forms.iter().any(|f| f.text == "学生" && f.process == ["polite (copula)"]));
    }

    #[test]
    fn deconjugation_is_deterministic() {
        let a = engine().deconjugate("食べさせられていました", Some(ConjugationClass::Verb));
        let b = engine().deconjugate("食べさせられていました", Some(ConjugationClass::Verb));
        assert_eq!(a, b);
    }

    #[test]
    fn never_final_rule_needs_prior_layer() {
        let rules = vec![
            DeconjRule::new(
                RuleKind::NeverFinal,
                "stem",
                &["み"],
                &["む"],
                Some(&["stem-ren"]),
                Some(&["v5m"]),
                &[ConjugationClass::Verb],
            ),
            DeconjRule::new(
                RuleKind::Std,
                "desiderative",
                &["たい"],
                &[""],
                None,
                Some(&["stem-ren"]),
                &[ConjugationClass::Verb],
            ),
        ];
        let engine = Deconjugator::new(
            std::sync::Arc::new(RuleSet::compile(&rules)),
            Config::default(),
        );
        // bare み never rewrites to む
        let forms = engine.deconjugate("読み", Some(ConjugationClass::Verb));
        assert!(!forms.iter().any(|f| f.text == "読む"));
        // but after the desiderative layer has fired it does
        let forms = engine.deconjugate("読みたい", Some(ConjugationClass::Verb));
        assert!(forms.iter().any(|f| f.text == "読む"));
    }

    #[test]
    fn orthographic_substitution_applies_anywhere() {
        let forms = engine().deconjugate("くゎし", None);
        assert!(forms.iter().any(|f| f.text == "くわし"));
    }
}
