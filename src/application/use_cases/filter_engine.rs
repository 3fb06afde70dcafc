//! Filter Engine
//!
//! Conjunctive equality filtering of the dataset against the dropdown
//! controls. Controls at `ALL` add no constraint. Output keeps dataset order.

use tracing::debug;

use crate::domain::dataset::{Dataset, Row};
use crate::domain::filter_state::FilterState;

/// Rows matching every concrete control value in `state`.
///
/// An empty result is a valid outcome, including when a selected value no
/// longer exists in the dataset.
pub fn filter_rows<'a>(dataset: &'a Dataset, state: &FilterState) -> Vec<&'a Row> {
    let bindings = dataset.bindings();
    let predicates: Vec<(usize, &str)> = state
        .active_filters()
        .map(|(control, value)| (control.column(bindings).index, value))
        .collect();

    let rows: Vec<&Row> = dataset
        .rows()
        .iter()
        .filter(|row| {
            predicates
                .iter()
                .all(|(index, value)| row.cell(*index).matches(value))
        })
        .collect();

    debug!(
        active_filters = predicates.len(),
        matched = rows.len(),
        total = dataset.len(),
        "Filtered dataset"
    );

    rows
}
