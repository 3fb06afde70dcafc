// ============================================================
// RESULT CATEGORY
// ============================================================
// Antibiotic susceptibility outcome recorded per (row, antibiotic)

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Closed set of result codes, declared in display order `NL < S < I < R`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResultCategory {
    /// "NL": no growth / not tested
    #[serde(rename = "NL")]
    NotTested,

    /// "S": susceptible
    #[serde(rename = "S")]
    Susceptible,

    /// "I": intermediate
    #[serde(rename = "I")]
    Intermediate,

    /// "R": resistant
    #[serde(rename = "R")]
    Resistant,
}

impl ResultCategory {
    pub const DISPLAY_ORDER: [ResultCategory; 4] = [
        ResultCategory::NotTested,
        ResultCategory::Susceptible,
        ResultCategory::Intermediate,
        ResultCategory::Resistant,
    ];

    /// Code as written in the sheet
    pub fn code(&self) -> &'static str {
        match self {
            ResultCategory::NotTested => "NL",
            ResultCategory::Susceptible => "S",
            ResultCategory::Intermediate => "I",
            ResultCategory::Resistant => "R",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "NL" => Some(ResultCategory::NotTested),
            "S" => Some(ResultCategory::Susceptible),
            "I" => Some(ResultCategory::Intermediate),
            "R" => Some(ResultCategory::Resistant),
            _ => None,
        }
    }

    /// Position in `DISPLAY_ORDER`
    pub fn rank(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for ResultCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Observed result value. Codes outside the closed set are kept, never dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultValue {
    Known(ResultCategory),
    Unexpected(String),
}

impl ResultValue {
    pub fn from_label(label: &str) -> Self {
        match ResultCategory::from_code(label) {
            Some(category) => ResultValue::Known(category),
            None => ResultValue::Unexpected(label.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ResultValue::Known(category) => category.code(),
            ResultValue::Unexpected(value) => value,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, ResultValue::Known(_))
    }
}

// Known categories first in display order, unexpected values after them lexically
impl Ord for ResultValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ResultValue::Known(a), ResultValue::Known(b)) => a.cmp(b),
            (ResultValue::Known(_), ResultValue::Unexpected(_)) => Ordering::Less,
            (ResultValue::Unexpected(_), ResultValue::Known(_)) => Ordering::Greater,
            (ResultValue::Unexpected(a), ResultValue::Unexpected(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for ResultValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_order() {
        let codes: Vec<_> = ResultCategory::DISPLAY_ORDER.iter().map(|c| c.code()).collect();
        assert_eq!(codes, vec!["NL", "S", "I", "R"]);
        assert!(ResultCategory::NotTested < ResultCategory::Resistant);
    }

    #[test]
    fn test_unexpected_values_sort_after_known() {
        let mut values = vec![
            ResultValue::from_label("X"),
            ResultValue::from_label("R"),
            ResultValue::from_label("NL"),
            ResultValue::from_label("A"),
        ];
        values.sort();
        let labels: Vec<_> = values.iter().map(|v| v.label()).collect();
        assert_eq!(labels, vec!["NL", "R", "A", "X"]);
    }

    #[test]
    fn test_codes_are_case_sensitive() {
        assert_eq!(ResultValue::from_label("s"), ResultValue::Unexpected("s".to_string()));
    }
}
