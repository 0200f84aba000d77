//! Request payload values and data-driven alias resolution.
//!
//! Callers send the same logical field under many spellings (`fullName`,
//! `full_name`, `[NOMBRE]`). Rather than probing each spelling where a value
//! is used, the payload goes through one [`AliasTable`] that maps every alias
//! to a canonical field name, producing a [`Record`].

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A dynamically typed payload value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DataValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<DataValue>),
    Map(BTreeMap<String, DataValue>),
}

impl DataValue {
    /// Text used when the value is substituted into a document.
    ///
    /// Strings are trimmed, whole floats lose their fraction and list items
    /// are joined with ", ". Maps have no text form.
    pub fn text(&self) -> String {
        match self {
            Self::Null | Self::Map(_) => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.trim().to_string(),
            Self::List(items) => items
                .iter()
                .map(DataValue::text)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Check whether the value renders as empty text.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.iter().all(DataValue::is_empty),
            Self::Map(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Numeric reading of the value.
    ///
    /// Text is parsed as a plain number first; failing that, digits are read
    /// with thousands separators and currency signs ignored ("$2.000.000").
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => {
                let s = s.trim();
                if let Ok(n) = s.parse::<f64>() {
                    return Some(n);
                }
                let digits: String = s
                    .chars()
                    .filter(|c| !matches!(c, '.' | ',' | ' ' | '$' | '\''))
                    .collect();
                if digits.is_empty() {
                    None
                } else {
                    digits.parse::<f64>().ok()
                }
            },
            _ => None,
        }
    }

    /// Check for a numeric zero.
    pub fn is_zero(&self) -> bool {
        self.as_number() == Some(0.0)
    }

    /// Truthiness used by row conditions.
    ///
    /// False for null, `false`, zero, empty collections and the words
    /// "false", "no" and "0".
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Text(s) => {
                let s = s.trim().to_lowercase();
                !matches!(s.as_str(), "" | "0" | "false" | "no" | "n")
            },
            Self::List(items) => !items.is_empty(),
            Self::Map(map) => !map.is_empty(),
        }
    }

    /// Get a map entry.
    pub fn get(&self, key: &str) -> Option<&DataValue> {
        match self {
            Self::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// List items; a non-list value has none.
    pub fn as_list(&self) -> &[DataValue] {
        match self {
            Self::List(items) => items,
            _ => &[],
        }
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<'de> Deserialize<'de> for DataValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DataValueVisitor)
    }
}

struct DataValueVisitor;

impl<'de> Visitor<'de> for DataValueVisitor {
    type Value = DataValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar, list or map")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<DataValue, E> {
        Ok(DataValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<DataValue, E> {
        Ok(DataValue::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<DataValue, E> {
        Ok(match i64::try_from(v) {
            Ok(i) => DataValue::Integer(i),
            Err(_) => DataValue::Float(v as f64),
        })
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<DataValue, E> {
        Ok(DataValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<DataValue, E> {
        Ok(DataValue::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<DataValue, E> {
        Ok(DataValue::Text(v))
    }

    fn visit_none<E: de::Error>(self) -> Result<DataValue, E> {
        Ok(DataValue::Null)
    }

    fn visit_unit<E: de::Error>(self) -> Result<DataValue, E> {
        Ok(DataValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<DataValue, D::Error> {
        DataValue::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<DataValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(DataValue::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<DataValue, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some((key, value)) = map.next_entry::<String, DataValue>()? {
            entries.insert(key, value);
        }
        Ok(DataValue::Map(entries))
    }
}

/// Payload fields keyed by canonical name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: BTreeMap<String, DataValue>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<DataValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Look up a field by dotted path: `experiencias.0.cargo`.
    pub fn get(&self, path: &str) -> Option<&DataValue> {
        let mut parts = path.split('.');
        let mut current = self.fields.get(parts.next()?)?;
        for part in parts {
            current = match current {
                DataValue::Map(map) => map.get(part)?,
                DataValue::List(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Text of a field; empty when absent.
    pub fn text(&self, path: &str) -> String {
        self.get(path).map(DataValue::text).unwrap_or_default()
    }

    /// Iterate over the top-level fields.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, DataValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, DataValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Maps alternative key spellings to canonical field names.
///
/// Keys are compared folded: surrounding whitespace and `{{ }}`, `{ }`,
/// `[ ]`, `< >` delimiters stripped, case ignored, and `_`, `-` and spaces
/// dropped. So `[NOMBRE]`, `Nombre` and `nom_bre` are the same key.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    canonical: HashMap<String, String>,
}

impl AliasTable {
    /// Build the table from canonical names and their aliases.
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a String, &'a Vec<String>)>) -> Self {
        let mut canonical = HashMap::new();
        for (name, aliases) in entries {
            canonical.insert(fold_key(name), name.clone());
            for alias in aliases {
                canonical.entry(fold_key(alias)).or_insert_with(|| name.clone());
            }
        }
        Self { canonical }
    }

    /// Canonical name for `key`, if it is a known alias.
    pub fn resolve(&self, key: &str) -> Option<&str> {
        self.canonical.get(&fold_key(key)).map(String::as_str)
    }

    /// Rename every key of the payload, nested maps included, to its canonical name.
    ///
    /// Unknown keys are kept as they are. When several aliases of one field
    /// are present, the first non-empty value in key order wins.
    pub fn normalize(&self, payload: BTreeMap<String, DataValue>) -> Record {
        self.normalize_map(payload).into_iter().collect()
    }

    fn normalize_map(&self, map: BTreeMap<String, DataValue>) -> BTreeMap<String, DataValue> {
        let mut out: BTreeMap<String, DataValue> = BTreeMap::new();
        for (key, value) in map {
            let name = self.resolve(&key).map(str::to_string).unwrap_or(key);
            let value = self.normalize_value(value);
            match out.get(&name) {
                Some(existing) if !existing.is_empty() => {},
                _ => {
                    out.insert(name, value);
                },
            }
        }
        out
    }

    fn normalize_value(&self, value: DataValue) -> DataValue {
        match value {
            DataValue::Map(map) => DataValue::Map(self.normalize_map(map)),
            DataValue::List(items) => {
                DataValue::List(items.into_iter().map(|v| self.normalize_value(v)).collect())
            },
            other => other,
        }
    }
}

/// Fold a key for alias comparison.
pub fn fold_key(key: &str) -> String {
    let mut key = key.trim();
    loop {
        let stripped = [("{{", "}}"), ("{", "}"), ("[", "]"), ("<", ">")]
            .iter()
            .find_map(|&(open, close)| key.strip_prefix(open)?.strip_suffix(close));
        match stripped {
            Some(inner) => key = inner.trim(),
            None => break,
        }
    }
    key.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
