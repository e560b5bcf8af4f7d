//! Equality and classification utilities.
//!
//! Pure functions used by the store to decide whether the live session is
//! still backed by a preset. Comparisons ignore ordering: two value maps are
//! equal when they hold the same keys with the same values, two column lists
//! are equal when they hold the same ids.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::preset::{FieldValues, SearchConfigInfo};

/// Structural equality of two field-value mappings.
pub fn values_equal(a: &FieldValues, b: &FieldValues) -> bool {
    a.len() == b.len() && a.iter().all(|(key, value)| b.get(key) == Some(value))
}

/// Set equality of two column id sequences.
pub fn columns_equal<A, B>(a: &[A], b: &[B]) -> bool
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    a.len() == b.len()
        && a
            .iter()
            .all(|id| b.iter().any(|other| other.as_ref() == id.as_ref()))
}

pub fn has_values(preset: &SearchConfigInfo) -> bool {
    preset.has_values()
}

pub fn has_columns(preset: &SearchConfigInfo) -> bool {
    preset.has_columns()
}

pub fn has_only_values(preset: &SearchConfigInfo) -> bool {
    preset.has_values() && !preset.has_columns()
}

pub fn has_only_columns(preset: &SearchConfigInfo) -> bool {
    preset.has_columns() && !preset.has_values()
}

/// A live field value as produced by a search form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Null,
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    Date(DateTime<Utc>),
}

impl FieldValue {
    fn is_falsy(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::Integer(n) => *n == 0,
            FieldValue::Number(n) => *n == 0.0 || n.is_nan(),
            FieldValue::Bool(b) => !b,
            FieldValue::Date(_) => false,
        }
    }

    fn render(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Text(text) => text.clone(),
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Number(n) => render_number(*n),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Date(date) => date.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Date(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

// Integral floats render without a fractional part ("3", not "3.0").
fn render_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Convert live form values into the canonical persisted form.
///
/// Falsy entries are dropped; everything else is stringified, dates as
/// ISO-8601 UTC with millisecond precision.
pub fn parse_field_values(raw: &BTreeMap<String, FieldValue>) -> FieldValues {
    raw.iter()
        .filter(|(_, value)| !value.is_falsy())
        .map(|(key, value)| (key.clone(), value.render()))
        .collect()
}
