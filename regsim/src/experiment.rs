//! Counter sweep experiment: simulate, export, chart

use std::path::PathBuf;

use regsim_core::{run_sweep, simulation_span, Entity, ScenarioResult, SimError};
use regsim_metrics::{export_csv, export_json, summarize, MetricsError, ScenarioSummary};
use regsim_viz::charts::generate_all_charts;
use regsim_viz::VizError;
use thiserror::Error;
use tracing::info;

use crate::config::SweepConfig;

pub const JSON_RESULTS_FILE: &str = "results.json";

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error(transparent)]
    Viz(#[from] VizError),
}

/// Everything one sweep produced.
#[derive(Debug, Clone)]
pub struct ExperimentReport {
    pub results: Vec<ScenarioResult>,
    pub summaries: Vec<ScenarioSummary>,
    /// Files written, in write order.
    pub written: Vec<PathBuf>,
}

/// Run one scenario per configured counter count, then write the CSV files,
/// the optional JSON document and the charts into the output directory.
pub fn run_experiments(entities: &[Entity], config: &SweepConfig) -> Result<ExperimentReport, ExperimentError> {
    let _span = simulation_span("counter_sweep").entered();

    let results = run_sweep(entities, &config.counters, config.makespan)?;
    let summaries = summarize(&results)?;

    let mut written = export_csv(&results, &config.output_dir)?;
    if config.export_json {
        written.extend(export_json(
            &results,
            config.output_dir.join(JSON_RESULTS_FILE),
            true,
            true,
        )?);
    }
    if config.charts {
        written.extend(generate_all_charts(&summaries, &config.output_dir)?);
    }

    info!(scenarios = results.len(), files = written.len(), "Sweep complete");
    Ok(ExperimentReport {
        results,
        summaries,
        written,
    })
}
