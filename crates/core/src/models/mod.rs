pub mod detail;
pub mod filter;
pub mod kpi;
pub mod preview;
pub mod record;
pub mod settings;
pub mod sort;
pub mod view;
