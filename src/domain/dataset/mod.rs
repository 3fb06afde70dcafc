// ============================================================
// DATASET DOMAIN LAYER
// ============================================================
// In-memory tabular store for microbiology results
// No I/O: rows arrive already parsed from the infrastructure loaders

mod cell;
mod schema;
mod table;

#[cfg(test)]
pub(crate) mod fixtures;

pub use cell::CellValue;
pub use schema::{ColumnBindings, ColumnRef, DatasetSchema};
pub use table::{Dataset, Row};
