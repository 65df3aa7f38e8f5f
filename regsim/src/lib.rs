//! University registration desk queue simulation
//!
//! Students arrive at recorded times and wait first-come-first-served for
//! one of `k` identical counters. The `regsim` binary loads the arrivals,
//! runs one scenario per counter count and writes summary tables, per-student
//! detail files and charts.
//!
//! This crate ties the workspace together:
//! - [`regsim_core`] - event engine, counter pool, scenario runner
//! - [`regsim_metrics`] - summaries, CSV/JSON export, text table
//! - [`regsim_viz`] - PNG charts
//!
//! # Example
//!
//! ```no_run
//! use regsim::prelude::*;
//!
//! let config = SweepConfig::default();
//! let entities = load_entities("queue_data.csv", &config.dataset_options()).unwrap();
//! let report = run_experiments(&entities, &config).unwrap();
//! println!("{}", format_summary_table(&report.summaries));
//! ```

pub mod config;
pub mod dataset;
pub mod experiment;

pub use config::{ConfigError, SweepConfig};
pub use dataset::{load_entities, parse_entities, DatasetError, DatasetOptions};
pub use experiment::{run_experiments, ExperimentError, ExperimentReport};

pub mod prelude {
    pub use crate::config::SweepConfig;
    pub use crate::dataset::{load_entities, DatasetOptions};
    pub use crate::experiment::{run_experiments, ExperimentReport};
    pub use regsim_core::{Entity, MakespanPolicy, ScenarioResult, ScenarioRunner, SimTime};
    pub use regsim_metrics::{format_summary_table, ScenarioSummary};
}
