use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use regsim::{load_entities, run_experiments, ConfigError, DatasetError, ExperimentError, SweepConfig};
use regsim_core::{init_simulation_logging_with_level, MakespanPolicy};
use regsim_metrics::format_summary_table;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Experiment(#[from] ExperimentError),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Makespan {
    /// Latest service start (can report utilization above 100%)
    LatestStart,
    /// Latest service completion
    LastCompletion,
}

impl From<Makespan> for MakespanPolicy {
    fn from(value: Makespan) -> Self {
        match value {
            Makespan::LatestStart => MakespanPolicy::LatestServiceStart,
            Makespan::LastCompletion => MakespanPolicy::LastCompletion,
        }
    }
}

/// Simulate a university registration desk with 1..k counters
#[derive(Parser, Debug)]
#[command(name = "regsim", version, about, long_about = None)]
struct Cli {
    /// CSV file with an `arrival_time` column (DD-MM-YYYY H.MM)
    #[arg(long, default_value = "queue_data.csv")]
    data: PathBuf,

    /// JSON sweep configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for CSV files and charts
    #[arg(long)]
    output: Option<PathBuf>,

    /// Comma-separated counter counts, e.g. 1,2,4
    #[arg(long, value_delimiter = ',')]
    counters: Option<Vec<usize>>,

    /// Seed for service time sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Use at most this many students from the dataset
    #[arg(long)]
    max_entities: Option<usize>,

    /// How the measured period is closed for throughput and utilization
    #[arg(long, value_enum)]
    makespan: Option<Makespan>,

    /// Skip chart rendering
    #[arg(long)]
    no_charts: bool,

    /// Also write results.json with every timing record
    #[arg(long)]
    json: bool,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn sweep_config(&self) -> Result<SweepConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => SweepConfig::from_file(path)?,
            None => SweepConfig::default(),
        };

        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(counters) = &self.counters {
            config.counters = counters.clone();
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(max_entities) = self.max_entities {
            config.max_entities = max_entities;
        }
        if let Some(makespan) = self.makespan {
            config.makespan = makespan.into();
        }
        if self.no_charts {
            config.charts = false;
        }
        if self.json {
            config.export_json = true;
        }

        config.validate()?;
        Ok(config)
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let config = cli.sweep_config()?;
    let entities = load_entities(&cli.data, &config.dataset_options())?;
    let report = run_experiments(&entities, &config)?;

    println!("\nSimulation completed. Summary of results:\n");
    println!("{}", format_summary_table(&report.summaries));
    println!("\nAll outputs saved in: {}\n", config.output_dir.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_simulation_logging_with_level(&cli.log_level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "regsim failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "regsim",
            "--counters",
            "1,3",
            "--seed",
            "7",
            "--makespan",
            "last-completion",
            "--no-charts",
        ]);
        let config = cli.sweep_config().unwrap();
        assert_eq!(config.counters, vec![1, 3]);
        assert_eq!(config.seed, 7);
        assert_eq!(config.makespan, MakespanPolicy::LastCompletion);
        assert!(!config.charts);
        assert_eq!(config.max_entities, 198);
    }

    #[test]
    fn test_zero_counters_rejected() {
        let cli = Cli::parse_from(["regsim", "--counters", "0"]);
        assert!(matches!(cli.sweep_config(), Err(ConfigError::Invalid(_))));
    }
}
