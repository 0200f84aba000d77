//! Template configuration: how a request payload becomes rules and row edits.
//!
//! A configuration is a YAML document (JSON works too, being a YAML subset):
//!
//! ```yaml
//! aliases:
//!   fullName: [nombre, name, "[NOMBRE]"]
//! placeholders:
//!   - pattern: nombre_01
//!     field: fullName
//!   - pattern: corr_01
//!     field: email
//!     skip_empty: true
//! lists:
//!   - list: formaciones
//!     patterns: ["tec_{i:02}", "tec_0{i}", "tec_{i}"]
//!     join: [tipo, nombre]
//!     separator: ": "
//! captions: [TOTAL]
//! rows:
//!   - include: turnos adicionales
//!     when: { field: turnos, is: zero }
//!     action: remove
//! ```

use crate::common::{Error, Result};
use crate::template::cleanup::CleanupRule;
use crate::template::engine::output_file_name;
use crate::template::normalize::{AliasTable, DataValue, Record};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Complete configuration of one template.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateConfig {
    /// Canonical field name -> alternative key spellings
    pub aliases: BTreeMap<String, Vec<String>>,
    pub placeholders: Vec<PlaceholderSpec>,
    pub lists: Vec<ListSpec>,
    /// Literal table captions that are never substituted
    pub captions: Vec<String>,
    pub rows: Vec<RowRule>,
    /// Replaces the default cleanup rules when present
    pub cleanup: Option<Vec<CleanupRule>>,
    pub cleanup_passes: Option<usize>,
    pub output: OutputSpec,
}

impl TemplateConfig {
    /// Parse a configuration from YAML or JSON text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_saphyr::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and parse a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_yaml(&text)
    }

    /// Rename the payload's keys to canonical field names.
    pub fn normalize(&self, payload: BTreeMap<String, DataValue>) -> Record {
        AliasTable::new(&self.aliases).normalize(payload)
    }

    /// Name of the generated file for `record`.
    pub fn output_name(&self, record: &Record, timestamp: NaiveDateTime) -> String {
        let name = self
            .output
            .name_field
            .as_deref()
            .map(|field| record.text(field))
            .unwrap_or_default();
        output_file_name(&self.output.prefix, &name, timestamp)
    }
}

/// Parse a request payload (a YAML or JSON mapping).
pub fn parse_payload(text: &str) -> Result<BTreeMap<String, DataValue>> {
    serde_saphyr::from_str(text).map_err(|e| Error::Config(format!("payload: {e}")))
}

/// Where a value comes from. The first source set wins, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueSource {
    /// Literal text
    pub value: Option<String>,
    /// Text with `{field}` references; empty unless every reference has a value
    pub template: Option<String>,
    /// Fields joined with `separator`, empty ones skipped
    pub join: Vec<String>,
    pub separator: Option<String>,
    /// A single field
    pub field: Option<String>,
}

/// One placeholder pattern and the value that replaces it.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PlaceholderSpec {
    pub pattern: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub join: Vec<String>,
    #[serde(default)]
    pub separator: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    /// Defaults to true for `{{...}}`/`[...]` tokens, false otherwise
    #[serde(default)]
    pub case_sensitive: Option<bool>,
    /// Defaults to true for short letter-digit tokens such as `day1`
    #[serde(default)]
    pub spacing: Option<bool>,
    /// Leave the placeholder in place when the value is empty
    #[serde(default)]
    pub skip_empty: bool,
}

impl PlaceholderSpec {
    pub fn source(&self) -> ValueSource {
        ValueSource {
            value: self.value.clone(),
            template: self.template.clone(),
            join: self.join.clone(),
            separator: self.separator.clone(),
            field: self.field.clone(),
        }
    }
}

/// Indexed placeholders generated from the items of a list field.
///
/// Each pattern holds `{i}` or `{i:02}` for the item number; item values
/// resolve `field`/`join`/`template` against the item first, then the record.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ListSpec {
    pub list: String,
    pub patterns: Vec<String>,
    /// Number of the first generated item
    #[serde(default = "default_start")]
    pub start: usize,
    /// Leading items to leave out
    #[serde(default)]
    pub skip: usize,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub join: Vec<String>,
    #[serde(default)]
    pub separator: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub skip_empty: bool,
}

fn default_start() -> usize {
    1
}

impl ListSpec {
    pub fn source(&self) -> ValueSource {
        ValueSource {
            value: self.value.clone(),
            template: self.template.clone(),
            join: self.join.clone(),
            separator: self.separator.clone(),
            field: self.field.clone(),
        }
    }
}

/// A conditional row edit.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RowRule {
    pub include: String,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub scope: Option<String>,
    /// Applies always when absent
    #[serde(default)]
    pub when: Option<Condition>,
    pub action: RowRuleAction,
}

/// What a row rule does.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RowRuleAction {
    Remove,
    /// Cell values may reference fields as `{field}`
    InsertBefore { anchor: String, cells: Vec<String> },
}

/// A test on one field of the record.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Condition {
    pub field: String,
    pub is: ConditionTest,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConditionTest {
    Always,
    /// Numeric zero, or no value at all
    Zero,
    Nonzero,
    Truthy,
    Falsy,
}

/// Output file naming.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSpec {
    pub prefix: String,
    /// Field holding the name put in the file name
    pub name_field: Option<String>,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            prefix: "HV".to_string(),
            name_field: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
aliases:
  fullName: [nombre, name, "[NOMBRE]"]
placeholders:
  - pattern: nombre_01
    field: fullName
  - pattern: "{{value1}}"
    field: amount
    case_sensitive: false
  - pattern: corr_01
    field: email
    skip_empty: true
lists:
  - list: formaciones
    patterns: ["tec_{i:02}", "tec_0{i}", "tec_{i}"]
    join: [tipo, nombre]
    separator: ": "
captions: [TOTAL]
rows:
  - include: extra shifts
    exclude: [salary]
    when: { field: extraShifts, is: zero }
    action: remove
  - include: transport
    action:
      insert_before:
        anchor: total
        cells: [TRANSPORT ALLOWANCE, FULL MONTH, "{transport}", ""]
cleanup:
  - collapse_repeats: { unit: "$" }
  - literal: { pattern: " ,", replacement: "," }
cleanup_passes: 3
output:
  prefix: CC
  name_field: fullName
"#;

    #[test]
    fn test_parse_full_config() {
        let config = TemplateConfig::from_yaml(CONFIG).unwrap();
        assert_eq!(config.aliases["fullName"].len(), 3);
        assert_eq!(config.placeholders.len(), 3);
        assert_eq!(config.placeholders[1].case_sensitive, Some(false));
        assert!(config.placeholders[2].skip_empty);
        assert_eq!(config.lists[0].start, 1);
        assert_eq!(config.lists[0].source().join, vec!["tipo", "nombre"]);
        assert_eq!(config.captions, vec!["TOTAL"]);

        assert_eq!(config.rows[0].action, RowRuleAction::Remove);
        assert_eq!(
            config.rows[0].when,
            Some(Condition {
                field: "extraShifts".to_string(),
                is: ConditionTest::Zero
            })
        );
        assert!(matches!(
            &config.rows[1].action,
            RowRuleAction::InsertBefore { anchor, cells } if anchor == "total" && cells.len() == 4
        ));

        assert_eq!(config.cleanup.as_ref().map(Vec::len), Some(2));
        assert_eq!(config.cleanup_passes, Some(3));
        assert_eq!(config.output.prefix, "CC");
    }

    #[test]
    fn test_empty_config() {
        let config = TemplateConfig::from_yaml("{}").unwrap();
        assert!(config.placeholders.is_empty());
        assert!(config.cleanup.is_none());
        assert_eq!(config.output.prefix, "HV");
    }

    #[test]
    fn test_json_config() {
        let config =
            TemplateConfig::from_yaml(r#"{"placeholders": [{"pattern": "cedula", "field": "idNumber"}]}"#).unwrap();
        assert_eq!(config.placeholders[0].field.as_deref(), Some("idNumber"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = TemplateConfig::from_yaml("placeholder: []").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_parse_payload() {
        let payload = parse_payload(r#"{"fullName": "Ana", "turnos": "2"}"#).unwrap();
        assert_eq!(payload["fullName"].text(), "Ana");
        assert!(!payload["turnos"].is_zero());
    }
}
