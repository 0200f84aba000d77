//! Flattening a normalized record into rules, row directives and cleanup.

use crate::common::Result;
use crate::template::cleanup::{CleanupPipeline, DEFAULT_PASSES};
use crate::template::config::{Condition, ConditionTest, RowRuleAction, TemplateConfig, ValueSource};
use crate::template::normalize::{DataValue, Record};
use crate::template::rows::{RowAction, RowDirective};
use crate::template::rule::{PlaceholderRule, RuleSet, Spacing};
use log::debug;

/// Build the rule set for one request.
pub fn build_rules(config: &TemplateConfig, record: &Record) -> Result<RuleSet> {
    let mut rules = Vec::new();
    let from_record = |name: &str| record.text(name);

    for spec in &config.placeholders {
        let value = resolve(&spec.source(), &from_record);
        if value.is_empty() && spec.skip_empty {
            debug!("{:?}: empty value, placeholder kept", spec.pattern);
            continue;
        }
        let mut rule = PlaceholderRule::new(spec.pattern.clone(), value);
        if let Some(case_sensitive) = spec.case_sensitive {
            rule = rule.with_case_sensitive(case_sensitive);
        }
        if let Some(spacing) = spec.spacing {
            rule = rule.with_spacing(if spacing { Spacing::Pad } else { Spacing::Keep });
        }
        rules.push(rule);
    }

    for list in &config.lists {
        let source = list.source();
        let items = record.get(&list.list).map(DataValue::as_list).unwrap_or(&[]);
        for (n, item) in items.iter().skip(list.skip).enumerate() {
            let index = list.start + n;
            let from_item = |name: &str| match item.get(name) {
                Some(v) => v.text(),
                None => record.text(name),
            };
            let value = resolve(&source, &from_item);
            if value.is_empty() && list.skip_empty {
                continue;
            }
            for pattern in &list.patterns {
                rules.push(PlaceholderRule::new(index_pattern(pattern, index), value.clone()));
            }
        }
    }

    RuleSet::with_captions(rules, config.captions.iter().cloned())
}

/// Evaluate the row rules against the record.
pub fn build_row_directives(config: &TemplateConfig, record: &Record) -> Vec<RowDirective> {
    config
        .rows
        .iter()
        .filter(|rule| rule.when.as_ref().is_none_or(|c| holds(c, record)))
        .map(|rule| RowDirective {
            include: rule.include.clone(),
            exclude: rule.exclude.clone(),
            scope: rule.scope.clone(),
            action: match &rule.action {
                RowRuleAction::Remove => RowAction::Remove,
                RowRuleAction::InsertBefore { anchor, cells } => RowAction::InsertBefore {
                    anchor: anchor.clone(),
                    cells: cells
                        .iter()
                        .map(|c| render(c, &|name| record.text(name), false))
                        .collect(),
                },
            },
        })
        .collect()
}

/// Build the cleanup pipeline: configured rules, or the defaults.
pub fn build_cleanup(config: &TemplateConfig) -> Result<CleanupPipeline> {
    let passes = config.cleanup_passes.unwrap_or(DEFAULT_PASSES);
    match &config.cleanup {
        Some(rules) => CleanupPipeline::new(rules, passes),
        None if passes == DEFAULT_PASSES => Ok(CleanupPipeline::standard()),
        None => CleanupPipeline::new(&crate::template::cleanup::CleanupRule::standard(), passes),
    }
}

/// Check a row condition.
pub fn holds(condition: &Condition, record: &Record) -> bool {
    let value = record.get(&condition.field);
    match condition.is {
        ConditionTest::Always => true,
        ConditionTest::Zero => value.is_none_or(|v| v.is_zero() || v.is_empty()),
        ConditionTest::Nonzero => value.and_then(DataValue::as_number).is_some_and(|n| n != 0.0),
        ConditionTest::Truthy => value.is_some_and(DataValue::is_truthy),
        ConditionTest::Falsy => !value.is_some_and(DataValue::is_truthy),
    }
}

/// Resolve a value source; the result is trimmed.
pub fn resolve(source: &ValueSource, lookup: &dyn Fn(&str) -> String) -> String {
    let value = if let Some(value) = &source.value {
        value.clone()
    } else if let Some(template) = &source.template {
        render(template, lookup, true)
    } else if !source.join.is_empty() {
        let separator = source.separator.as_deref().unwrap_or(" ");
        source
            .join
            .iter()
            .map(|name| lookup(name))
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join(separator)
    } else if let Some(field) = &source.field {
        lookup(field)
    } else {
        String::new()
    };
    value.trim().to_string()
}

/// Substitute `{field}` references.
///
/// With `strict`, any empty reference makes the whole result empty
/// ("Desde {start} hasta {end}" needs both dates). An unclosed brace is
/// kept as text.
pub fn render(template: &str, lookup: &dyn Fn(&str) -> String, strict: bool) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else { break };
        out.push_str(&rest[..open]);
        let name = rest[open + 1..open + close].trim();
        let value = lookup(name);
        if strict && value.is_empty() {
            return String::new();
        }
        out.push_str(&value);
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}

/// Expand `{i}` and `{i:02}` in a list pattern.
pub fn index_pattern(pattern: &str, index: usize) -> String {
    pattern
        .replace("{i:02}", &format!("{index:02}"))
        .replace("{i}", &index.to_string())
}
