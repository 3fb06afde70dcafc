//! Aggregation Engine
//!
//! Reshapes filtered rows from wide form (one column per antibiotic) into
//! long form and counts occurrences per (antibiotic, result value).
//!
//! Missing cells are dropped during the reshape, so the counts of one
//! antibiotic sum to its number of non-missing values in the subset.
//! Values outside `NL/S/I/R` are counted under their own label.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::domain::aggregated_count::AggregatedCount;
use crate::domain::dataset::{ColumnRef, Row};
use crate::domain::result_category::ResultValue;

/// Long-form counts, ordered by antibiotic column then result display order.
/// Absent combinations are not zero-filled.
pub fn aggregate(rows: &[&Row], antibiotics: &[ColumnRef]) -> Vec<AggregatedCount> {
    let mut counts: HashMap<(usize, ResultValue), u64> = HashMap::new();
    let mut unexpected: BTreeSet<String> = BTreeSet::new();
    let mut unexpected_cells = 0u64;

    for row in rows {
        for (position, column) in antibiotics.iter().enumerate() {
            let Some(label) = row.cell(column.index).label() else {
                continue;
            };
            let value = ResultValue::from_label(&label);
            if !value.is_known() {
                unexpected_cells += 1;
                unexpected.insert(value.label().to_string());
            }
            *counts.entry((position, value)).or_insert(0) += 1;
        }
    }

    if unexpected_cells > 0 {
        warn!(
            cells = unexpected_cells,
            values = ?unexpected,
            "Unexpected antibiotic result values counted as their own category"
        );
    }

    let mut entries: Vec<((usize, ResultValue), u64)> = counts.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    let aggregated: Vec<AggregatedCount> = entries
        .into_iter()
        .map(|((position, result), count)| {
            AggregatedCount::new(antibiotics[position].name.clone(), result, count)
        })
        .collect();

    debug!(
        rows = rows.len(),
        antibiotics = antibiotics.len(),
        groups = aggregated.len(),
        "Aggregated antibiotic results"
    );

    aggregated
}
