//! Chart generation for sweep summaries
//!
//! Bar charts put one bar per scenario; line charts plot a metric against the
//! counter count.

pub mod bars;
pub mod lines;
mod util;

use std::path::{Path, PathBuf};

use regsim_metrics::ScenarioSummary;
use tracing::info;

use crate::error::VizError;

pub const THROUGHPUT_CHART: &str = "throughput_by_counters.png";
pub const AVG_WAIT_CHART: &str = "avg_wait_by_counters.png";
pub const MAX_WAIT_CHART: &str = "max_wait_by_counters.png";
pub const UTILIZATION_CHART: &str = "utilization_by_counters.png";

/// Common chart configuration
#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Chart width in pixels
    pub width: u32,
    /// Chart height in pixels
    pub height: u32,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Lower bound for the top of the y axis; the axis still grows to fit the data.
    pub y_floor: Option<f64>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            y_floor: None,
        }
    }
}

impl ChartConfig {
    /// Create a new chart configuration with title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the chart dimensions
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = label.into();
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = label.into();
        self
    }

    pub fn y_floor(mut self, floor: f64) -> Self {
        self.y_floor = Some(floor);
        self
    }
}

/// Generate the four standard sweep charts into `output_dir`
///
/// Returns the paths written, in the order throughput, average wait, maximum
/// wait, utilization.
///
/// # Errors
///
/// [`VizError::InvalidData`] when `summaries` is empty; rendering and I/O
/// failures otherwise.
pub fn generate_all_charts(
    summaries: &[ScenarioSummary],
    output_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, VizError> {
    if summaries.is_empty() {
        return Err(VizError::InvalidData("No scenarios to chart".to_string()));
    }
    let output_dir = output_dir.as_ref();
    std::fs::create_dir_all(output_dir)?;

    let categories: Vec<(String, f64)> = summaries
        .iter()
        .map(|s| (s.counters.to_string(), s.throughput_per_hr))
        .collect();
    let throughput_path = output_dir.join(THROUGHPUT_CHART);
    bars::create_bar_chart(
        &categories,
        &ChartConfig::new("Throughput by Number of Counters")
            .x_label("Number of Counters")
            .y_label("Throughput (students/hr)"),
        &throughput_path,
    )?;

    let avg_wait: Vec<(f64, f64)> = summaries.iter().map(|s| (s.counters as f64, s.avg_wait_min)).collect();
    let avg_wait_path = output_dir.join(AVG_WAIT_CHART);
    lines::create_line_chart(
        &avg_wait,
        &ChartConfig::new("Average Waiting Time")
            .x_label("Number of Counters")
            .y_label("Average Wait (minutes)"),
        &avg_wait_path,
    )?;

    let max_wait: Vec<(f64, f64)> = summaries.iter().map(|s| (s.counters as f64, s.max_wait_min)).collect();
    let max_wait_path = output_dir.join(MAX_WAIT_CHART);
    lines::create_line_chart(
        &max_wait,
        &ChartConfig::new("Maximum Waiting Time")
            .x_label("Number of Counters")
            .y_label("Max Wait (minutes)"),
        &max_wait_path,
    )?;

    let utilization: Vec<(String, f64)> = summaries
        .iter()
        .map(|s| (s.counters.to_string(), s.utilization_pct))
        .collect();
    let utilization_path = output_dir.join(UTILIZATION_CHART);
    bars::create_bar_chart(
        &utilization,
        &ChartConfig::new("Counter Utilization")
            .x_label("Number of Counters")
            .y_label("Utilization (%)")
            .y_floor(100.0),
        &utilization_path,
    )?;

    info!(dir = %output_dir.display(), "Charts written");
    Ok(vec![throughput_path, avg_wait_path, max_wait_path, utilization_path])
}
