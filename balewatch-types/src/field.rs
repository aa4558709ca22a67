//! Raw row representation shared by all ingestion paths.
//!
//! A row is a header-named mapping of loosely typed scalar values, the
//! direct output of a dynamic-typing CSV/JSON parser. The accessors on
//! [`RawCycleRow`] encode the coercions the telemetry schema relies on:
//! digital-input trigger columns arrive as either a real boolean or the
//! literal string `"True"`, and feedback-OK columns are compared against the
//! literal string `"False"`.

use std::collections::BTreeMap;

/// A loosely typed scalar cell from an upstream parser.
///
/// Parsers with dynamic typing produce numbers and booleans where a cell
/// cleanly converts, and fall back to text otherwise. `Null` represents an
/// empty cell.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FieldValue {
    /// A boolean cell (`true`/`false` in the source).
    Bool(bool),
    /// A numeric cell.
    Number(f64),
    /// Any other non-empty cell.
    Text(String),
    /// An empty cell.
    Null,
}

impl FieldValue {
    /// Returns the numeric value, if this cell is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the text value, if this cell is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One raw telemetry row: header name to cell value.
///
/// This is the shape the engine consumes; the text-to-row tokenization
/// itself belongs to the ingestion layer.
pub type RawCycleRow = BTreeMap<String, FieldValue>;

/// Coercion accessors used by record normalization.
///
/// Implemented as an extension trait so `RawCycleRow` can stay a plain map.
pub trait RowFields {
    /// Numeric field, or `None` when absent or non-numeric.
    fn num(&self, key: &str) -> Option<f64>;

    /// Numeric field, treating absent/non-numeric as 0.
    fn num_or_zero(&self, key: &str) -> f64;

    /// Text field, or `None` when absent or non-text.
    fn text(&self, key: &str) -> Option<&str>;

    /// True iff the field is boolean `true` or the literal string `"True"`.
    ///
    /// Digital-input trigger columns are exported in both shapes depending
    /// on the upstream firmware revision.
    fn flag(&self, key: &str) -> bool;

    /// True iff the field is the literal string `"False"`.
    ///
    /// Feedback-OK columns are compared as strings upstream; a boolean
    /// `false` does not match.
    fn is_literal_false(&self, key: &str) -> bool;
}

impl RowFields for RawCycleRow {
    fn num(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(FieldValue::as_number)
    }

    fn num_or_zero(&self, key: &str) -> f64 {
        self.num(key).unwrap_or(0.0)
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_text)
    }

    fn flag(&self, key: &str) -> bool {
        match self.get(key) {
            Some(FieldValue::Bool(b)) => *b,
            Some(FieldValue::Text(s)) => s == "True",
            _ => false,
        }
    }

    fn is_literal_false(&self, key: &str) -> bool {
        matches!(self.get(key), Some(FieldValue::Text(s)) if s == "False")
    }
}
