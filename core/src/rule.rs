//! Deconjugation rule table.
//!
//! A rule describes one inflection layer in reverse: the conjugated ending
//! observed on the surface (`con_end`), the ending it deconjugates to
//! (`dec_end`), and the tag chain that gates how layers may stack. Rules
//! carry parallel ending arrays (one position per verb class, say) that are
//! expanded into per-ending variants when the table is compiled.
//!
//! `RuleSet` is the compiled, immutable table: rules ordered longest-ending
//! first, with per-class indices so the initial deconjugation step only
//! tries rules for the morpheme's part-of-speech class.

use std::sync::Arc;

use ahash::AHashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::pos::ConjugationClass;

/// How a rule is allowed to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleKind {
    /// Suffix replacement gated by the tag chain.
    #[serde(rename = "stdrule")]
    Std,
    /// Applies only when the whole text equals the conjugated ending.
    #[serde(rename = "rewriterule")]
    Rewrite,
    /// Applies only as the outermost layer (no rule applied before it).
    #[serde(rename = "onlyfinalrule")]
    OnlyFinal,
    /// Never applies as the outermost layer.
    #[serde(rename = "neverfinalrule")]
    NeverFinal,
    /// Standard rule with an extra context predicate.
    #[serde(rename = "contextrule")]
    Context,
    /// Anywhere-in-string orthography rewrite, outermost only.
    #[serde(rename = "substitution")]
    Substitution,
}

/// Context predicates for `RuleKind::Context`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextKind {
    /// Reject when the character just before the ending is さ (keeps the
    /// godan-す causative from re-firing inside させられる chains).
    #[serde(rename = "saspecial")]
    SaSpecial,
    /// Reject when the form is exactly a bare renyoukei stem.
    #[serde(rename = "v1inftrap")]
    V1InfTrap,
}

/// One deconjugation rule as authored (or loaded from JSON).
///
/// `con_end`/`dec_end` are parallel arrays; `con_tag`/`dec_tag`, when present,
/// are indexed the same way and fall back to their first element when shorter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeconjRule {
    #[serde(rename = "type")]
    pub kind: RuleKind,
    /// Grammatical label recorded on the candidate chain ("negative",
    /// "potential", "te-form", ...).
    pub detail: String,
    pub con_end: Vec<String>,
    pub dec_end: Vec<String>,
    #[serde(default)]
    pub con_tag: Option<Vec<String>>,
    #[serde(default)]
    pub dec_tag: Option<Vec<String>>,
    #[serde(default, rename = "contextrule")]
    pub context: Option<ContextKind>,
    /// Which citation-form classes this rule can lead to. Empty means the
    /// rule is class-agnostic (orthography substitutions).
    #[serde(default)]
    pub classes: Vec<ConjugationClass>,
}

impl DeconjRule {
    pub fn new(
        kind: RuleKind,
        detail: &str,
        con_end: &[&str],
        dec_end: &[&str],
        con_tag: Option<&[&str]>,
        dec_tag: Option<&[&str]>,
        classes: &[ConjugationClass],
    ) -> Self {
        let own = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            kind,
            detail: detail.to_string(),
            con_end: own(con_end),
            dec_end: own(dec_end),
            con_tag: con_tag.map(own),
            dec_tag: dec_tag.map(own),
            context: None,
            classes: classes.to_vec(),
        }
    }

    pub fn with_context(mut self, context: ContextKind) -> Self {
        self.kind = RuleKind::Context;
        self.context = Some(context);
        self
    }
}

/// One expanded ending variant of a rule.
#[derive(Debug, Clone)]
pub(crate) struct Variant {
    pub con_end: String,
    pub dec_end: String,
    pub con_tag: Option<String>,
    pub dec_tag: Option<String>,
}

/// A rule after ending-array expansion.
#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    pub kind: RuleKind,
    pub detail: String,
    pub context: Option<ContextKind>,
    pub variants: Vec<Variant>,
    /// Longest conjugated ending across variants, in chars. Drives table
    /// ordering: more specific endings are tried first.
    pub max_con_len: usize,
}

/// The compiled, immutable rule table.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
    all_order: Vec<usize>,
    by_class: [Vec<usize>; 4],
}

impl RuleSet {
    /// Expand ending arrays into variants and build the per-class ordering.
    pub fn compile(rules: &[DeconjRule]) -> Self {
        let mut compiled = Vec::with_capacity(rules.len());
        let mut by_class: [Vec<usize>; 4] = Default::default();
        let mut all_order = Vec::with_capacity(rules.len());

        for (idx, rule) in rules.iter().enumerate() {
            let count = rule.con_end.len().max(rule.dec_end.len()).max(1);
            let pick = |v: &[String], i: usize| -> Option<String> {
                v.get(i).or_else(|| v.first()).cloned()
            };
            let mut variants = Vec::with_capacity(count);
            for i in 0..count {
                let con_end = pick(&rule.con_end, i).unwrap_or_default();
                let dec_end = pick(&rule.dec_end, i).unwrap_or_default();
                let con_tag = rule.con_tag.as_deref().and_then(|v| pick(v, i));
                let dec_tag = rule.dec_tag.as_deref().and_then(|v| pick(v, i));
                variants.push(Variant { con_end, dec_end, con_tag, dec_tag });
            }
            let max_con_len =
                variants.iter().map(|v| v.con_end.chars().count()).max().unwrap_or(0);

            compiled.push(CompiledRule {
                kind: rule.kind,
                detail: rule.detail.clone(),
                context: rule.context,
                variants,
                max_con_len,
            });
            all_order.push(idx);

            if rule.classes.is_empty() {
                for bucket in by_class.iter_mut() {
                    bucket.push(idx);
                }
            } else {
                for class in &rule.classes {
                    by_class[class.index()].push(idx);
                }
            }
        }

        let order_key = |&idx: &usize| (usize::MAX - compiled[idx].max_con_len, idx);
        all_order.sort_by_key(order_key);
        for bucket in by_class.iter_mut() {
            bucket.sort_by_key(order_key);
        }

        Self { rules: compiled, all_order, by_class }
    }

    /// Load and compile a rule table from its JSON representation.
    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        let rules: Vec<DeconjRule> = serde_json::from_str(content)?;
        Ok(Self::compile(&rules))
    }

    /// The compiled standard table, shared process-wide.
    pub fn standard() -> Arc<RuleSet> {
        static STANDARD: Lazy<Arc<RuleSet>> =
            Lazy::new(|| Arc::new(RuleSet::compile(&crate::rules::standard_rules())));
        Arc::clone(&STANDARD)
    }

    /// Rule indices applicable to forms of `class`, longest ending first.
    /// With no class hint every rule is in play.
    pub(crate) fn rules_for(&self, class: Option<ConjugationClass>) -> &[usize] {
        match class {
            Some(c) => &self.by_class[c.index()],
            None => &self.all_order,
        }
    }

    pub(crate) fn all_rules(&self) -> &[usize] {
        &self.all_order
    }

    pub(crate) fn rule(&self, idx: usize) -> &CompiledRule {
        &self.rules[idx]
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Grammatical labels present in the table, deduplicated, table order.
    pub fn labels(&self) -> Vec<&str> {
        let mut seen = AHashMap::new();
        let mut out = Vec::new();
        for rule in &self.rules {
            if seen.insert(rule.detail.as_str(), ()).is_none() {
                out.push(rule.detail.as_str());
            }
        }
        out
    }
}
