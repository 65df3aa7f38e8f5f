//! Export of sweep results to files
//!
//! CSV output follows the layout spreadsheet users expect: one detail file per
//! scenario plus one summary file. JSON output carries the same data in one
//! structured document.

pub mod csv;
pub mod json;

use std::path::{Path, PathBuf};

use regsim_core::ScenarioResult;

use crate::error::MetricsError;

/// Trait for exporting sweep results to different formats
pub trait ResultsExporter {
    /// Export the results and return the paths of the files written.
    fn export(&self, results: &[ScenarioResult]) -> Result<Vec<PathBuf>, MetricsError>;
}

/// Export results as CSV files into `dir`
///
/// # Example
/// ```no_run
/// use regsim_core::{run_sweep, Entity, MakespanPolicy};
/// use regsim_metrics::export::export_csv;
///
/// let entities = vec![Entity::new("s22010000", 0.0, 420.0).unwrap()];
/// let results = run_sweep(&entities, &[1, 2], MakespanPolicy::default()).unwrap();
/// export_csv(&results, "Outputs").unwrap();
/// ```
pub fn export_csv(results: &[ScenarioResult], dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, MetricsError> {
    csv::CsvExporter::new(dir.as_ref()).export(results)
}

/// Export results as one JSON document at `path`
pub fn export_json(
    results: &[ScenarioResult],
    path: impl AsRef<Path>,
    pretty: bool,
    include_records: bool,
) -> Result<Vec<PathBuf>, MetricsError> {
    json::JsonExporter::new(path.as_ref(), pretty)
        .include_records(include_records)
        .export(results)
}
