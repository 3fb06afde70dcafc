use serde::{Deserialize, Serialize};

use crate::domain::result_category::ResultValue;

/// Number of rows with `result` for `antibiotic`; unique per (antibiotic, result)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregatedCount {
    pub antibiotic: String,
    pub result: ResultValue,
    pub count: u64,
}

impl AggregatedCount {
    pub fn new(antibiotic: impl Into<String>, result: ResultValue, count: u64) -> Self {
        Self {
            antibiotic: antibiotic.into(),
            result,
            count,
        }
    }
}
