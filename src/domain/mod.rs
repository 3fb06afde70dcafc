pub mod aggregated_count;
pub mod chart_spec;
pub mod error;
pub mod filter_state;
pub mod result_category;
pub mod view;

// Tabular data store
pub mod dataset;
