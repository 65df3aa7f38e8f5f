//! Per-scenario summary rows
//!
//! A [`ScenarioSummary`] is the reporting view of a [`ScenarioResult`]: waits
//! in minutes, utilization in percent, plus wait percentiles taken from an
//! HDR histogram of the individual waits.

use hdrhistogram::Histogram as HdrHistogram;
use regsim_core::{ScenarioResult, TimingRecord};
use serde::{Deserialize, Serialize};

use crate::error::MetricsError;

/// Wait percentiles over one scenario, in minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WaitPercentiles {
    pub p50_min: f64,
    pub p95_min: f64,
    pub p99_min: f64,
}

impl WaitPercentiles {
    /// Waits are recorded at millisecond resolution with three significant figures.
    pub fn from_records(records: &[TimingRecord]) -> Result<Self, MetricsError> {
        if records.is_empty() {
            return Ok(Self::default());
        }

        let mut hist = HdrHistogram::<u64>::new(3)
            .map_err(|e| MetricsError::InvalidMetric(format!("wait histogram: {e}")))?;
        for record in records {
            let millis = record.wait.as_duration().as_millis() as u64;
            hist.record(millis)
                .map_err(|e| MetricsError::InvalidMetric(format!("wait of {}: {e}", record.entity_id)))?;
        }

        let minutes = |q: f64| hist.value_at_quantile(q) as f64 / 60_000.0;
        Ok(Self {
            p50_min: minutes(0.5),
            p95_min: minutes(0.95),
            p99_min: minutes(0.99),
        })
    }
}

/// One row of the summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub counters: usize,
    pub throughput_per_hr: f64,
    pub avg_wait_min: f64,
    pub max_wait_min: f64,
    pub utilization_pct: f64,
    pub num_served: usize,
    pub wait_percentiles: WaitPercentiles,
}

impl ScenarioSummary {
    pub fn from_result(result: &ScenarioResult) -> Result<Self, MetricsError> {
        Ok(Self {
            counters: result.capacity,
            throughput_per_hr: result.throughput_per_hour,
            avg_wait_min: result.avg_wait_secs / 60.0,
            max_wait_min: result.max_wait.as_secs_f64() / 60.0,
            utilization_pct: result.utilization_pct(),
            num_served: result.served,
            wait_percentiles: WaitPercentiles::from_records(&result.records)?,
        })
    }
}

/// Summarize every scenario of a sweep, keeping sweep order.
pub fn summarize(results: &[ScenarioResult]) -> Result<Vec<ScenarioSummary>, MetricsError> {
    results.iter().map(ScenarioSummary::from_result).collect()
}
