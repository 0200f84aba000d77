//! Placeholder rules and ordered rule sets.

use crate::common::{Error, Result};
use aho_corasick::{AhoCorasick, MatchKind};
use log::debug;
use regex::{Regex, RegexBuilder};
use std::ops::Range;

/// Spacing policy applied around a replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Spacing {
    /// Insert the value exactly where the pattern was
    #[default]
    Keep,
    /// Separate the value from an abutting letter or digit with one space
    Pad,
}

/// One pattern and the value that replaces it.
///
/// [`PlaceholderRule::new`] derives the matching flags from the pattern:
/// bracket- and double-brace-delimited tokens (`[NAME]`, `{{Name1}}`) match
/// case-sensitively, bare tokens (`nombre_01`) case-insensitively, and short
/// letter-digit tokens (`day1`, `d1`) get [`Spacing::Pad`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderRule {
    pub pattern: String,
    pub value: String,
    pub case_sensitive: bool,
    /// Never matched; set for literal table captions
    pub excluded: bool,
    pub spacing: Spacing,
}

impl PlaceholderRule {
    /// Create a rule with flags derived from the pattern.
    pub fn new(pattern: impl Into<String>, value: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let case_sensitive = is_delimited(&pattern);
        let spacing = if is_positional(&pattern) {
            Spacing::Pad
        } else {
            Spacing::Keep
        };
        Self {
            pattern,
            value: value.into(),
            case_sensitive,
            excluded: false,
            spacing,
        }
    }

    /// Override case sensitivity.
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Override the spacing policy.
    pub fn with_spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    /// Mark the rule as never matching.
    pub fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }
}

/// Check for a `{{...}}` or `[...]` token.
pub fn is_delimited(pattern: &str) -> bool {
    (pattern.len() > 4 && pattern.starts_with("{{") && pattern.ends_with("}}"))
        || (pattern.len() > 2 && pattern.starts_with('[') && pattern.ends_with(']'))
}

/// Check for a short positional numeric token such as `day1` or `d1`.
pub fn is_positional(pattern: &str) -> bool {
    (2..=5).contains(&pattern.len())
        && pattern.bytes().all(|b| b.is_ascii_alphanumeric())
        && pattern.bytes().any(|b| b.is_ascii_alphabetic())
        && pattern.bytes().last().is_some_and(|b| b.is_ascii_digit())
}

/// Literal search for one pattern.
#[derive(Debug, Clone)]
enum Matcher {
    Exact(AhoCorasick),
    /// Unicode case folding (`AÑO_01` matches `año_01`)
    Folded(Regex),
}

impl Matcher {
    fn build(rule: &PlaceholderRule) -> Result<Self> {
        let invalid = |e: &dyn std::fmt::Display| Error::Config(format!("pattern {:?}: {e}", rule.pattern));
        if rule.case_sensitive {
            AhoCorasick::builder()
                .match_kind(MatchKind::LeftmostFirst)
                .build([rule.pattern.as_str()])
                .map(Matcher::Exact)
                .map_err(|e| invalid(&e))
        } else {
            RegexBuilder::new(&regex::escape(&rule.pattern))
                .case_insensitive(true)
                .build()
                .map(Matcher::Folded)
                .map_err(|e| invalid(&e))
        }
    }
}

/// A rule with its compiled matcher.
#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    rule: PlaceholderRule,
    matcher: Matcher,
}

impl CompiledRule {
    pub(crate) fn rule(&self) -> &PlaceholderRule {
        &self.rule
    }

    /// Non-overlapping matches, left to right.
    pub(crate) fn find(&self, text: &str) -> Vec<Range<usize>> {
        match &self.matcher {
            Matcher::Exact(ac) => ac.find_iter(text).map(|m| m.range()).collect(),
            Matcher::Folded(re) => re.find_iter(text).map(|m| m.range()).collect(),
        }
    }
}

/// Rules ordered longest-pattern-first, plus the protected captions.
///
/// Among patterns of equal length the insertion order is kept, so the
/// application order is fully deterministic.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
    captions: Vec<String>,
    caption_matcher: Option<AhoCorasick>,
}

impl RuleSet {
    /// Build a rule set without protected captions.
    pub fn new(rules: impl IntoIterator<Item = PlaceholderRule>) -> Result<Self> {
        Self::with_captions(rules, Vec::<String>::new())
    }

    /// Build a rule set protecting literal table captions.
    ///
    /// A rule whose pattern equals a caption (ignoring case) is excluded, and
    /// a match lying inside a caption occurrence is skipped.
    pub fn with_captions(
        rules: impl IntoIterator<Item = PlaceholderRule>,
        captions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self> {
        let captions: Vec<String> = captions
            .into_iter()
            .map(Into::into)
            .filter(|c: &String| !c.is_empty())
            .collect();

        let mut seen = std::collections::HashSet::new();
        let mut compiled = Vec::new();
        for mut rule in rules {
            if rule.pattern.is_empty() || !seen.insert(rule.pattern.clone()) {
                continue;
            }
            if captions.iter().any(|c| c.to_lowercase() == rule.pattern.to_lowercase()) {
                debug!("pattern {:?} is a table caption, excluded", rule.pattern);
                rule.excluded = true;
            }
            let matcher = Matcher::build(&rule)?;
            compiled.push(CompiledRule { rule, matcher });
        }
        compiled.sort_by_key(|c| std::cmp::Reverse(c.rule.pattern.chars().count()));

        let caption_matcher = if captions.is_empty() {
            None
        } else {
            Some(
                AhoCorasick::builder()
                    .ascii_case_insensitive(true)
                    .build(&captions)
                    .map_err(|e| Error::Config(format!("captions: {e}")))?,
            )
        };

        Ok(Self {
            rules: compiled,
            captions,
            caption_matcher,
        })
    }

    /// All rules in application order.
    pub fn rules(&self) -> impl Iterator<Item = &PlaceholderRule> {
        self.rules.iter().map(|c| &c.rule)
    }

    /// Protected captions.
    pub fn captions(&self) -> &[String] {
        &self.captions
    }

    /// Number of rules, excluded ones included.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check whether the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules that take part in matching, in application order.
    pub(crate) fn active(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules.iter().filter(|c| !c.rule.excluded)
    }

    /// Byte ranges of every caption occurrence in `text`.
    pub(crate) fn protected_spans(&self, text: &str) -> Vec<Range<usize>> {
        match &self.caption_matcher {
            Some(matcher) => matcher.find_overlapping_iter(text).map(|m| m.range()).collect(),
            None => Vec::new(),
        }
    }
}
