pub mod aggregation_engine;
pub mod filter_engine;
pub mod normalizer;
pub mod record_store;
pub mod sort_engine;
pub mod view_binder;
