// ============================================================
// CELL VALUES
// ============================================================

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A single cell of the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    /// Categorical or free text value, never blank
    Text(String),

    /// Numeric value as stored in the spreadsheet
    Number(f64),

    /// Empty cell, blank string or spreadsheet error
    Missing,
}

impl CellValue {
    /// Build a text cell, collapsing blank strings to `Missing`
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            CellValue::Missing
        } else if trimmed.len() == value.len() {
            CellValue::Text(value)
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Label used for equality matching, dropdown options and chart categories
    pub fn label(&self) -> Option<Cow<'_, str>> {
        match self {
            CellValue::Text(value) => Some(Cow::Borrowed(value.as_str())),
            CellValue::Number(value) => Some(Cow::Owned(format_number(*value))),
            CellValue::Missing => None,
        }
    }

    /// Exact match against a selected filter value. Missing never matches.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            CellValue::Text(text) => text == value,
            CellValue::Number(_) => self.label().is_some_and(|label| label == value),
            CellValue::Missing => false,
        }
    }
}

// Integral floats render without a fractional part so "12" and 12.0 agree
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_is_missing() {
        assert_eq!(CellValue::text("   "), CellValue::Missing);
        assert_eq!(CellValue::text(""), CellValue::Missing);
        assert_eq!(CellValue::text(" S "), CellValue::Text("S".to_string()));
    }

    #[test]
    fn test_number_labels() {
        assert_eq!(CellValue::Number(12.0).label().as_deref(), Some("12"));
        assert_eq!(CellValue::Number(0.5).label().as_deref(), Some("0.5"));
        assert!(CellValue::Number(12.0).matches("12"));
    }

    #[test]
    fn test_missing_never_matches() {
        assert!(!CellValue::Missing.matches(""));
        assert!(CellValue::Missing.label().is_none());
    }
}
