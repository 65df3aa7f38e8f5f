//! JSON export for sweep results

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use regsim_core::{ScenarioResult, TimingRecord};
use serde::Serialize;
use tracing::info;

use crate::error::MetricsError;
use crate::export::ResultsExporter;
use crate::summary::{summarize, ScenarioSummary};

/// JSON exporter for a whole sweep
#[derive(Debug)]
pub struct JsonExporter {
    path: PathBuf,
    pretty: bool,
    include_records: bool,
}

impl JsonExporter {
    /// Create a new JSON exporter
    ///
    /// # Arguments
    /// * `path` - Output file path
    /// * `pretty` - Whether to pretty-print the JSON
    pub fn new(path: &Path, pretty: bool) -> Self {
        Self {
            path: path.to_path_buf(),
            pretty,
            include_records: false,
        }
    }

    /// Also write every timing record of every scenario.
    #[must_use]
    pub fn include_records(mut self, include: bool) -> Self {
        self.include_records = include;
        self
    }
}

#[derive(Debug, Serialize)]
struct ExportData<'a> {
    summaries: Vec<ScenarioSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    scenarios: Vec<ScenarioDetails<'a>>,
}

#[derive(Debug, Serialize)]
struct ScenarioDetails<'a> {
    counters: usize,
    makespan_policy: regsim_core::MakespanPolicy,
    makespan_secs: f64,
    pool_stats: regsim_core::PoolStats,
    records: &'a [TimingRecord],
}

impl ResultsExporter for JsonExporter {
    fn export(&self, results: &[ScenarioResult]) -> Result<Vec<PathBuf>, MetricsError> {
        let scenarios = if self.include_records {
            results
                .iter()
                .map(|r| ScenarioDetails {
                    counters: r.capacity,
                    makespan_policy: r.makespan_policy,
                    makespan_secs: r.makespan.as_secs_f64(),
                    pool_stats: r.pool_stats,
                    records: &r.records,
                })
                .collect()
        } else {
            Vec::new()
        };
        let export_data = ExportData {
            summaries: summarize(results)?,
            scenarios,
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&export_data)
        } else {
            serde_json::to_string(&export_data)
        }?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&self.path)
            .map_err(|e| MetricsError::ExportError(format!("Failed to create {}: {e}", self.path.display())))?;
        file.write_all(json.as_bytes())?;

        info!(path = %self.path.display(), "JSON export complete");
        Ok(vec![self.path.clone()])
    }
}
