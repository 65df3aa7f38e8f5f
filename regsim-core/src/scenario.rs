//! Scenario runner: one complete run for a fixed number of counters
//!
//! A scenario validates its input, builds a fresh [`Simulation`], runs it
//! until no resumptions remain and reduces the timing records to the
//! aggregate statistics of a [`ScenarioResult`]. Every run owns its own
//! clock, pool and record collection, so scenarios of a sweep are fully
//! independent.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SimError;
use crate::logging::scenario_span;
use crate::process::{Entity, TimingRecord};
use crate::resource::{CounterPool, PoolStats};
use crate::time::SimTime;
use crate::types::ProcessId;
use crate::{Executor, Simulation};

const SECS_PER_HOUR: f64 = 3600.0;

/// Which instant closes the measured period used for throughput and utilization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MakespanPolicy {
    /// Latest service start over all records. This under-counts the elapsed
    /// time by the final service duration, so utilization can exceed 1.0.
    #[default]
    LatestServiceStart,
    /// Latest service completion over all records.
    LastCompletion,
}

impl MakespanPolicy {
    fn measure(&self, records: &[TimingRecord]) -> SimTime {
        let ends = records.iter().map(|r| match self {
            MakespanPolicy::LatestServiceStart => r.service_start,
            MakespanPolicy::LastCompletion => r.service_end(),
        });
        ends.max().unwrap_or_default()
    }
}

/// Outcome of one scenario run. Read-only once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub capacity: usize,
    pub served: usize,
    pub makespan_policy: MakespanPolicy,
    pub makespan: SimTime,
    /// Served entities per simulated hour of makespan.
    pub throughput_per_hour: f64,
    pub avg_wait_secs: f64,
    pub max_wait: SimTime,
    pub total_service: SimTime,
    /// Busy counter-time over available counter-time, as a fraction.
    pub utilization: f64,
    pub pool_stats: PoolStats,
    /// Records in the order service began.
    pub records: Vec<TimingRecord>,
}

impl ScenarioResult {
    fn from_records(
        capacity: usize,
        makespan_policy: MakespanPolicy,
        records: Vec<TimingRecord>,
        pool_stats: PoolStats,
    ) -> Self {
        let served = records.len();
        let makespan = makespan_policy.measure(&records);
        let total_service = records.iter().fold(SimTime::zero(), |acc, r| acc + r.service);
        let max_wait = records.iter().map(|r| r.wait).max().unwrap_or_default();
        let avg_wait_secs = if served == 0 {
            0.0
        } else {
            records.iter().map(TimingRecord::wait_secs).sum::<f64>() / served as f64
        };

        let (throughput_per_hour, utilization) = if makespan.is_zero() {
            if served > 0 {
                warn!(capacity, served, ?makespan_policy, "Zero makespan, reporting throughput and utilization as 0");
            }
            (0.0, 0.0)
        } else {
            let span = makespan.as_secs_f64();
            (
                served as f64 / (span / SECS_PER_HOUR),
                total_service.as_secs_f64() / (capacity as f64 * span),
            )
        };

        Self {
            capacity,
            served,
            makespan_policy,
            makespan,
            throughput_per_hour,
            avg_wait_secs,
            max_wait,
            total_service,
            utilization,
            pool_stats,
            records,
        }
    }

    /// Utilization as a percentage.
    pub fn utilization_pct(&self) -> f64 {
        self.utilization * 100.0
    }

    pub fn record(&self, entity_id: &str) -> Option<&TimingRecord> {
        self.records.iter().find(|r| r.entity_id == entity_id)
    }
}

/// Runs one scenario for a fixed number of counters.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioRunner {
    capacity: usize,
    makespan: MakespanPolicy,
}

impl ScenarioRunner {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            makespan: MakespanPolicy::default(),
        }
    }

    #[must_use]
    pub fn makespan(mut self, policy: MakespanPolicy) -> Self {
        self.makespan = policy;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Run every entity through a fresh simulation and aggregate the records.
    ///
    /// # Errors
    ///
    /// Input errors ([`SimError::InvalidCapacity`], duplicate ids as
    /// [`SimError::InvalidEntity`]) are reported before anything is scheduled.
    /// Engine errors abort the run.
    pub fn run(&self, entities: &[Entity]) -> Result<ScenarioResult, SimError> {
        let _span = scenario_span(self.capacity).entered();

        let pool = CounterPool::new(self.capacity)?;
        validate_unique_ids(entities)?;

        info!(capacity = self.capacity, entities = entities.len(), "Running scenario");

        let mut sim = Simulation::new(pool);
        for entity in entities {
            sim.add_entity(entity.clone())?;
        }
        sim.execute(Executor::unbound())?;

        if let Some(stuck) = sim.processes().iter().find(|p| !p.is_done()) {
            return Err(SimError::Internal {
                process: stuck.pid(),
                message: format!("entity '{}' never finished (state {:?})", stuck.entity().id(), stuck.state()),
            });
        }
        if sim.records().len() != entities.len() {
            return Err(SimError::Internal {
                process: ProcessId(sim.records().len()),
                message: format!("{} records for {} entities", sim.records().len(), entities.len()),
            });
        }

        let (records, pool) = sim.into_parts();
        let result = ScenarioResult::from_records(self.capacity, self.makespan, records, pool.stats());
        info!(
            capacity = result.capacity,
            served = result.served,
            makespan = %result.makespan,
            throughput_per_hour = result.throughput_per_hour,
            avg_wait_secs = result.avg_wait_secs,
            max_wait = %result.max_wait,
            utilization = result.utilization,
            "Scenario completed"
        );
        Ok(result)
    }
}

fn validate_unique_ids(entities: &[Entity]) -> Result<(), SimError> {
    let mut seen = HashSet::with_capacity(entities.len());
    for entity in entities {
        if !seen.insert(entity.id()) {
            return Err(SimError::InvalidEntity {
                id: entity.id().to_string(),
                reason: "duplicate identifier".to_string(),
            });
        }
    }
    Ok(())
}

/// Run one independent scenario per capacity, in the given order.
///
/// # Errors
///
/// The first scenario error; later capacities are not run.
pub fn run_sweep(
    entities: &[Entity],
    capacities: &[usize],
    policy: MakespanPolicy,
) -> Result<Vec<ScenarioResult>, SimError> {
    capacities
        .iter()
        .map(|&k| ScenarioRunner::new(k).makespan(policy).run(entities))
        .collect()
}
