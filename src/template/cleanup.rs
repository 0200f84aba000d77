//! Duplicate-artifact cleanup after substitution.
//!
//! Overlapping rules can leave doubled text behind: a phrase written twice
//! ("DEL 2026 DEL 2026"), a doubled currency sign ("$$150.000") or runs of
//! spaces around an emptied placeholder. The pipeline applies an ordered list
//! of collapse rules to a paragraph's full text, repeating the whole list for
//! a fixed number of passes because one collapse can expose another.

use crate::common::{Error, Result};
use crate::ooxml::docx::Paragraph;
use log::debug;
use regex::Regex;
use serde::Deserialize;

/// Default number of passes over the rule list.
pub const DEFAULT_PASSES: usize = 2;

/// One cleanup rule, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupRule {
    /// Consecutive repetitions of `unit` become a single `unit` ("$$" -> "$")
    CollapseRepeats { unit: String },
    /// A phrase of `min_words..=max_words` space-separated words immediately
    /// followed by itself keeps only the first copy
    RepeatedPhrase { min_words: usize, max_words: usize },
    /// Plain text replacement
    Literal { pattern: String, replacement: String },
    /// Regular expression replacement (`$1` refers to capture groups)
    Regex { pattern: String, replacement: String },
}

impl CleanupRule {
    /// The default rule list: spaces, currency signs, then repeated phrases.
    pub fn standard() -> Vec<CleanupRule> {
        vec![
            CleanupRule::CollapseRepeats { unit: " ".to_string() },
            CleanupRule::CollapseRepeats { unit: "$".to_string() },
            CleanupRule::RepeatedPhrase {
                min_words: 2,
                max_words: 4,
            },
        ]
    }
}

#[derive(Debug, Clone)]
enum CompiledRule {
    CollapseRepeats { unit: String, doubled: String },
    RepeatedPhrase { min_words: usize, max_words: usize },
    Literal { pattern: String, replacement: String },
    Regex { regex: Regex, replacement: String },
}

impl CompiledRule {
    fn apply(&self, text: &str) -> String {
        match self {
            Self::CollapseRepeats { unit, doubled } => {
                let mut out = text.to_string();
                while out.contains(doubled.as_str()) {
                    out = out.replace(doubled.as_str(), unit);
                }
                out
            },
            Self::RepeatedPhrase {
                min_words,
                max_words,
            } => collapse_repeated_phrases(text, *min_words, *max_words),
            Self::Literal {
                pattern,
                replacement,
            } => text.replace(pattern.as_str(), replacement),
            Self::Regex { regex, replacement } => {
                regex.replace_all(text, replacement.as_str()).into_owned()
            },
        }
    }
}

/// Text cleanup pipeline.
#[derive(Debug, Clone)]
pub struct CleanupPipeline {
    rules: Vec<CompiledRule>,
    passes: usize,
}

impl CleanupPipeline {
    /// Create a pipeline from configured rules.
    pub fn new(rules: &[CleanupRule], passes: usize) -> Result<Self> {
        let rules = rules
            .iter()
            .filter_map(|rule| compile(rule).transpose())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules, passes })
    }

    /// The default pipeline.
    pub fn standard() -> Self {
        let rules = CleanupRule::standard()
            .iter()
            .filter_map(|rule| compile(rule).ok().flatten())
            .collect();
        Self {
            rules,
            passes: DEFAULT_PASSES,
        }
    }

    /// A pipeline that changes nothing.
    pub fn disabled() -> Self {
        Self {
            rules: Vec::new(),
            passes: 0,
        }
    }

    /// Process text through the cleanup pipeline.
    ///
    /// Stops early once a pass leaves the text unchanged.
    pub fn process(&self, text: &str) -> String {
        let mut current = text.to_string();
        for _ in 0..self.passes {
            let next = self
                .rules
                .iter()
                .fold(current.clone(), |acc, rule| rule.apply(&acc));
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    /// Clean one paragraph.
    ///
    /// A paragraph whose text changes is collapsed to a single run formatted
    /// like its first run. Returns whether the text changed.
    pub fn apply(&self, paragraph: &mut Paragraph) -> bool {
        let text = paragraph.text();
        let cleaned = self.process(&text);
        if cleaned == text {
            return false;
        }
        debug!("cleanup: {:?} -> {:?}", text, cleaned);
        paragraph.set_text(cleaned);
        true
    }
}

impl Default for CleanupPipeline {
    fn default() -> Self {
        Self::standard()
    }
}

/// Compile a rule; `None` for rules that can never change text.
fn compile(rule: &CleanupRule) -> Result<Option<CompiledRule>> {
    Ok(Some(match rule {
        CleanupRule::CollapseRepeats { unit } => {
            if unit.is_empty() {
                return Ok(None);
            }
            CompiledRule::CollapseRepeats {
                unit: unit.clone(),
                doubled: unit.repeat(2),
            }
        },
        CleanupRule::RepeatedPhrase {
            min_words,
            max_words,
        } => {
            if *min_words == 0 || min_words > max_words {
                return Err(Error::Config(format!(
                    "repeated_phrase: invalid word range {min_words}..={max_words}"
                )));
            }
            CompiledRule::RepeatedPhrase {
                min_words: *min_words,
                max_words: *max_words,
            }
        },
        CleanupRule::Literal {
            pattern,
            replacement,
        } => {
            if pattern.is_empty() {
                return Ok(None);
            }
            CompiledRule::Literal {
                pattern: pattern.clone(),
                replacement: replacement.clone(),
            }
        },
        CleanupRule::Regex {
            pattern,
            replacement,
        } => CompiledRule::Regex {
            regex: Regex::new(pattern)
                .map_err(|e| Error::Config(format!("cleanup regex {pattern:?}: {e}")))?,
            replacement: replacement.clone(),
        },
    }))
}

/// Drop the second copy of any phrase that is immediately repeated.
///
/// Longer phrases are tried first. Words are separated by single spaces;
/// other whitespace is part of a word.
fn collapse_repeated_phrases(text: &str, min_words: usize, max_words: usize) -> String {
    let words: Vec<&str> = text.split(' ').collect();
    let mut kept: Vec<&str> = Vec::with_capacity(words.len());
    let mut i = 0;

    'outer: while i < words.len() {
        for n in (min_words..=max_words).rev() {
            if i + 2 * n > words.len() {
                continue;
            }
            let phrase = &words[i..i + n];
            if phrase.iter().all(|w| !w.is_empty()) && phrase == &words[i + n..i + 2 * n] {
                kept.extend_from_slice(phrase);
                i += 2 * n;
                continue 'outer;
            }
        }
        kept.push(words[i]);
        i += 1;
    }

    kept.join(" ")
}
