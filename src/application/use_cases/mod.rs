pub mod aggregation_engine;
pub mod chart_builder;
pub mod filter_engine;
pub mod view_coordinator;
