//! CSV export for sweep results
//!
//! Creates one file per scenario plus a summary:
//! - `details_{k}_counters.csv` - one row per served entity, in service order
//! - `summary_results.csv` - one row per scenario, in sweep order

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use regsim_core::ScenarioResult;
use tracing::info;

use crate::error::MetricsError;
use crate::export::ResultsExporter;
use crate::summary::{summarize, ScenarioSummary};

pub const SUMMARY_FILE: &str = "summary_results.csv";

/// File name of the detail file for a scenario with `counters` counters.
pub fn details_file_name(counters: usize) -> String {
    format!("details_{counters}_counters.csv")
}

/// CSV exporter writing into an output directory
///
/// The directory is created if missing. A sweep that runs the same capacity
/// twice overwrites that capacity's detail file with the later run.
#[derive(Debug)]
pub struct CsvExporter {
    dir: PathBuf,
}

impl CsvExporter {
    pub fn new(dir: &Path) -> Self {
        Self { dir: dir.to_path_buf() }
    }

    fn create(&self, name: &str) -> Result<(PathBuf, BufWriter<File>), MetricsError> {
        let path = self.dir.join(name);
        let file = File::create(&path)
            .map_err(|e| MetricsError::ExportError(format!("Failed to create {}: {e}", path.display())))?;
        Ok((path, BufWriter::new(file)))
    }

    fn export_details(&self, result: &ScenarioResult) -> Result<PathBuf, MetricsError> {
        let (path, mut file) = self.create(&details_file_name(result.capacity))?;

        writeln!(file, "student_id,arrival_offset_sec,service_start,wait_sec,service_time_sec")?;
        for record in &result.records {
            writeln!(
                file,
                "{},{},{},{},{}",
                escape_csv(&record.entity_id),
                record.arrival.as_secs_f64(),
                record.service_start.as_secs_f64(),
                record.wait_secs(),
                record.service_secs()
            )?;
        }
        file.flush()?;

        Ok(path)
    }

    fn export_summary(&self, summaries: &[ScenarioSummary]) -> Result<PathBuf, MetricsError> {
        let (path, mut file) = self.create(SUMMARY_FILE)?;

        writeln!(
            file,
            "counters,throughput_per_hr,avg_wait_min,max_wait_min,utilization_pct,num_served,p50_wait_min,p95_wait_min"
        )?;
        for s in summaries {
            writeln!(
                file,
                "{},{},{},{},{},{},{},{}",
                s.counters,
                s.throughput_per_hr,
                s.avg_wait_min,
                s.max_wait_min,
                s.utilization_pct,
                s.num_served,
                s.wait_percentiles.p50_min,
                s.wait_percentiles.p95_min
            )?;
        }
        file.flush()?;

        Ok(path)
    }
}

impl ResultsExporter for CsvExporter {
    fn export(&self, results: &[ScenarioResult]) -> Result<Vec<PathBuf>, MetricsError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| MetricsError::ExportError(format!("Failed to create {}: {e}", self.dir.display())))?;

        let mut written = Vec::with_capacity(results.len() + 1);
        for result in results {
            written.push(self.export_details(result)?);
        }
        written.push(self.export_summary(&summarize(results)?)?);

        info!(dir = %self.dir.display(), files = written.len(), "CSV export complete");
        Ok(written)
    }
}

/// Escape CSV field (add quotes if needed)
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
