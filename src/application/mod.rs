pub mod use_cases;

pub use use_cases::aggregation_engine::aggregate;
pub use use_cases::chart_builder::{build_antibiotic_chart, build_occurrence_chart};
pub use use_cases::filter_engine::filter_rows;
pub use use_cases::view_coordinator::{RenderedView, ViewCoordinator};
