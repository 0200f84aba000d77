//! Format-preserving replacement of placeholders in a paragraph.

use crate::ooxml::docx::Paragraph;
use crate::template::rule::RuleSet;
use crate::template::scanner::{Containment, RunIndex, replacement, scan};
use log::debug;

/// Replace every active rule's matches in `paragraph`.
///
/// Rules run longest-pattern-first. For each rule the full text and the run
/// index are derived afresh, then matches are rewritten right to left so that
/// earlier offsets stay valid:
///
/// - a match inside one run is spliced into that run, keeping its format;
/// - a match crossing runs collapses the paragraph to one run holding the
///   whole rewritten text, formatted like the run where the match starts.
///
/// Returns the number of substitutions made; zero means no pattern occurred.
pub fn apply(paragraph: &mut Paragraph, rules: &RuleSet) -> usize {
    let mut total = 0;

    for compiled in rules.active() {
        let text = paragraph.text();
        let matches = scan(&text, compiled, rules);
        if matches.is_empty() {
            continue;
        }
        let rule = compiled.rule();
        debug!("{:?}: {} match(es) in {:?}", rule.pattern, matches.len(), text);

        let mut index = RunIndex::new(paragraph);
        for (i, span) in matches.iter().enumerate().rev() {
            let next_start = matches.get(i + 1).map(|m| m.start);
            let value = replacement(&text, span, next_start, &rule.value, rule.spacing);
            match index.containment(span) {
                Some(Containment::Single { run, local }) => {
                    if let Some(run) = paragraph.run_mut(run) {
                        run.splice(local, &value);
                    }
                },
                Some(Containment::Spanning { start_run }) => {
                    let format = paragraph
                        .runs()
                        .nth(start_run)
                        .map(|r| r.format().clone())
                        .unwrap_or_default();
                    let mut full = paragraph.text();
                    full.replace_range(span.clone(), &value);
                    paragraph.collapse(full, format);
                    index = RunIndex::new(paragraph);
                },
                None => continue,
            }
            total += 1;
        }
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::{Format, Run};
    use crate::template::rule::{PlaceholderRule, Spacing};
    use proptest::prelude::*;

    fn paragraph(runs: &[(&str, Format)]) -> Paragraph {
        let mut p = Paragraph::new();
        for (text, format) in runs {
            p.push_run(Run::new(*text, format.clone()));
        }
        p
    }

    fn plain(runs: &[&str]) -> Paragraph {
        let runs: Vec<(&str, Format)> = runs.iter().map(|t| (*t, Format::new())).collect();
        paragraph(&runs)
    }

    fn bold() -> Format {
        let mut f = Format::new();
        f.set_bold(true);
        f
    }

    fn italic() -> Format {
        let mut f = Format::new();
        f.set_italic(true);
        f
    }

    #[test]
    fn test_delimited_tokens() {
        let mut p = plain(&["Pay to {{Name1}} the sum of {{value1}}"]);
        let rules = RuleSet::new([
            PlaceholderRule::new("{{Name1}}", "JUAN PEREZ"),
            PlaceholderRule::new("{{value1}}", "2.440.000"),
        ])
        .unwrap();
        assert_eq!(apply(&mut p, &rules), 2);
        assert_eq!(p.text(), "Pay to JUAN PEREZ the sum of 2.440.000");
    }

    #[test]
    fn test_delimited_tokens_are_case_sensitive() {
        let mut p = plain(&["{{NAME1}} / {{Name1}}"]);
        let rules = RuleSet::new([PlaceholderRule::new("{{Name1}}", "JUAN")]).unwrap();
        apply(&mut p, &rules);
        assert_eq!(p.text(), "{{NAME1}} / JUAN");
    }

    #[test]
    fn test_split_placeholder_collapses_to_start_format() {
        let mut p = paragraph(&[
            ("Start day: day", bold()),
            ("1", italic()),
            (" of month", Format::new()),
        ]);
        let rules = RuleSet::new([PlaceholderRule::new("day1", "15")]).unwrap();
        assert_eq!(apply(&mut p, &rules), 1);

        assert_eq!(p.text(), "Start day: 15 of month");
        assert_eq!(p.run_count(), 1);
        assert_eq!(p.runs().next().unwrap().format().bold(), Some(true));
    }

    #[test]
    fn test_single_run_match_keeps_other_runs() {
        let mut p = paragraph(&[("Name: ", bold()), ("nombre_01", italic()), (".", Format::new())]);
        let rules = RuleSet::new([PlaceholderRule::new("nombre_01", "Ana")]).unwrap();
        apply(&mut p, &rules);

        let runs: Vec<(&str, Option<bool>, Option<bool>)> = p
            .runs()
            .map(|r| (r.text(), r.format().bold(), r.format().italic()))
            .collect();
        assert_eq!(
            runs,
            vec![("Name: ", Some(true), None), ("Ana", None, Some(true)), (".", None, None)]
        );
    }

    #[test]
    fn test_longest_pattern_wins() {
        let mut p = plain(&["tec_01 and tec_1"]);
        let rules = RuleSet::new([
            PlaceholderRule::new("tec_1", "short"),
            PlaceholderRule::new("tec_01", "long"),
        ])
        .unwrap();
        apply(&mut p, &rules);
        assert_eq!(p.text(), "long and short");
    }

    #[test]
    fn test_spacing_injected_once() {
        let mut p = plain(&["Bogotá,day1de enero"]);
        let rules = RuleSet::new([PlaceholderRule::new("day1", "15")]).unwrap();
        apply(&mut p, &rules);
        assert_eq!(p.text(), "Bogotá,15 de enero");

        let mut p = plain(&["on day1 of"]);
        apply(&mut p, &rules);
        assert_eq!(p.text(), "on 15 of");
    }

    #[test]
    fn test_spacing_can_be_disabled() {
        let mut p = plain(&["Ref:d1x"]);
        let rules = RuleSet::new([PlaceholderRule::new("d1", "7").with_spacing(Spacing::Keep)]).unwrap();
        apply(&mut p, &rules);
        assert_eq!(p.text(), "Ref:7x");
    }

    #[test]
    fn test_adjacent_positional_tokens_get_one_space() {
        let mut p = plain(&["day1day1"]);
        let rules = RuleSet::new([PlaceholderRule::new("day1", "15")]).unwrap();
        assert_eq!(apply(&mut p, &rules), 2);
        assert_eq!(p.text(), "15 15");
    }

    #[test]
    fn test_accented_token_matches_any_case() {
        let mut p = plain(&["Vigencia AÑO_01"]);
        let rules = RuleSet::new([PlaceholderRule::new("año_01", "2026")]).unwrap();
        assert_eq!(apply(&mut p, &rules), 1);
        assert_eq!(p.text(), "Vigencia 2026");
    }

    #[test]
    fn test_absent_placeholder_is_noop() {
        let mut p = paragraph(&[("keep ", bold()), ("me", italic())]);
        let before = p.clone();
        let rules = RuleSet::new([PlaceholderRule::new("{{missing}}", "x")]).unwrap();
        assert_eq!(apply(&mut p, &rules), 0);
        assert_eq!(p, before);
    }

    #[test]
    fn test_excluded_rule_not_applied() {
        let mut p = plain(&["TOTAL"]);
        let rules = RuleSet::new([PlaceholderRule::new("total", "x").excluded()]).unwrap();
        assert_eq!(apply(&mut p, &rules), 0);
        assert_eq!(p.text(), "TOTAL");
    }

    #[test]
    fn test_multiple_matches_across_and_within_runs() {
        let mut p = paragraph(&[("cel_01 and ce", bold()), ("l_01 end cel_01", italic())]);
        let rules = RuleSet::new([PlaceholderRule::new("cel_01", "300")]).unwrap();
        assert_eq!(apply(&mut p, &rules), 3);
        assert_eq!(p.text(), "300 and 300 end 300");
        assert_eq!(p.run_count(), 1);
    }

    fn apply_to_text(text: &str, rules: &[(String, String)]) -> String {
        // Same rules, applied to the whole text at once
        let mut sorted: Vec<&(String, String)> = rules.iter().collect();
        sorted.sort_by_key(|(p, _)| std::cmp::Reverse(p.len()));
        let mut out = text.to_string();
        for (pattern, value) in sorted {
            out = out.replace(pattern.as_str(), value);
        }
        out
    }

    proptest! {
        #[test]
        fn prop_runs_match_whole_text_view(
            pieces in prop::collection::vec("[a-c{} ]{0,6}", 1..6),
            values in prop::collection::vec("[xyz ]{0,4}", 2),
        ) {
            let rules_src = vec![
                ("{{ab}}".to_string(), values[0].clone()),
                ("{{c}}".to_string(), values[1].clone()),
            ];
            let whole: String = pieces.concat();
            let mut p = plain(&pieces.iter().map(String::as_str).collect::<Vec<_>>());
            let rules = RuleSet::new(
                rules_src.iter().map(|(k, v)| PlaceholderRule::new(k.clone(), v.clone())),
            ).unwrap();

            apply(&mut p, &rules);
            prop_assert_eq!(p.text(), apply_to_text(&whole, &rules_src));
        }

        #[test]
        fn prop_reapplying_is_noop(
            pieces in prop::collection::vec("[a-c{} ]{0,6}", 1..6),
            value in "[xyz]{1,4}",
        ) {
            let mut p = plain(&pieces.iter().map(String::as_str).collect::<Vec<_>>());
            let rules = RuleSet::new([PlaceholderRule::new("{{ab}}", value)]).unwrap();
            apply(&mut p, &rules);
            let once = p.clone();
            prop_assert_eq!(apply(&mut p, &rules), 0);
            prop_assert_eq!(p, once);
        }
    }
}
