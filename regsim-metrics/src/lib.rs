//! Reporting for registration queue sweeps
//!
//! Turns [`regsim_core::ScenarioResult`]s into summary rows, a printable
//! table, and CSV/JSON files.

pub mod error;
pub mod export;
pub mod summary;
pub mod table;

pub use error::MetricsError;
pub use export::{export_csv, export_json, ResultsExporter};
pub use summary::{summarize, ScenarioSummary, WaitPercentiles};
pub use table::format_summary_table;
