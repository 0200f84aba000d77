//! Run-aware scanning: where a match lies relative to the runs of a paragraph.

use crate::ooxml::docx::Paragraph;
use crate::template::rule::{CompiledRule, RuleSet, Spacing};
use std::ops::Range;

/// Offset index over the text runs of a paragraph.
///
/// Built from prefix sums of run lengths; `ends[i]` is the byte offset in
/// the full text just past run `i`.
#[derive(Debug, Clone)]
pub(crate) struct RunIndex {
    ends: Vec<usize>,
}

/// How a match relates to the runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Containment {
    /// The match lies inside one run; `local` is relative to that run
    Single { run: usize, local: Range<usize> },
    /// The match crosses a run boundary; `start_run` holds its first byte
    Spanning { start_run: usize },
}

impl RunIndex {
    pub(crate) fn new(paragraph: &Paragraph) -> Self {
        let mut total = 0;
        let ends = paragraph
            .runs()
            .map(|run| {
                total += run.len();
                total
            })
            .collect();
        Self { ends }
    }

    /// Run holding the byte at `offset`, and the offset inside that run.
    pub(crate) fn locate(&self, offset: usize) -> Option<(usize, usize)> {
        let run = self.ends.partition_point(|&end| end <= offset);
        if run == self.ends.len() {
            return None;
        }
        let start = if run == 0 { 0 } else { self.ends[run - 1] };
        Some((run, offset - start))
    }

    /// Classify a non-empty match against the run boundaries.
    pub(crate) fn containment(&self, span: &Range<usize>) -> Option<Containment> {
        let (start_run, local_start) = self.locate(span.start)?;
        let (end_run, _) = self.locate(span.end - 1)?;
        Some(if start_run == end_run {
            Containment::Single {
                run: start_run,
                local: local_start..local_start + span.len(),
            }
        } else {
            Containment::Spanning { start_run }
        })
    }
}

/// Matches of `rule` in `text` that do not fall inside a protected caption.
pub(crate) fn scan(text: &str, rule: &CompiledRule, rules: &RuleSet) -> Vec<Range<usize>> {
    let matches = rule.find(text);
    if matches.is_empty() {
        return matches;
    }
    let protected = rules.protected_spans(text);
    matches
        .into_iter()
        .filter(|m| !protected.iter().any(|p| p.start <= m.start && m.end <= p.end))
        .collect()
}

/// The text that replaces `span`, with spacing applied.
///
/// With [`Spacing::Pad`] a single space is added on each side where the
/// match abuts a letter or digit. Existing spaces are never doubled and an
/// empty value is inserted as is. `next_start` is where the following match
/// of the same rule begins; a match directly after this one pads its own
/// leading side, so no trailing space is added here.
pub(crate) fn replacement(
    text: &str,
    span: &Range<usize>,
    next_start: Option<usize>,
    value: &str,
    spacing: Spacing,
) -> String {
    if spacing == Spacing::Keep || value.is_empty() {
        return value.to_string();
    }
    let before = text[..span.start].chars().next_back();
    let after = text[span.end..].chars().next();

    let mut out = String::with_capacity(value.len() + 2);
    if before.is_some_and(char::is_alphanumeric) {
        out.push(' ');
    }
    out.push_str(value);
    if after.is_some_and(char::is_alphanumeric) && next_start != Some(span.end) {
        out.push(' ');
    }
    out
}
