//! Core discrete event simulation engine for multi-counter queues.
//!
//! This crate models entities (students) arriving at a desk served by a fixed
//! number of interchangeable counters, and records when each one got served.
//!
//! # Architecture Overview
//!
//! - [`Scheduler`]: the clock and the time-ordered set of pending resumptions.
//!   Entries due at the same instant resume in registration order.
//! - [`CounterPool`]: `k` counters with a strict FIFO wait list.
//! - [`EntityProcess`]: one state machine per entity
//!   (arrive, queue, get served, leave).
//! - [`Simulation`]: owns one scheduler, one pool, the processes and the
//!   produced [`TimingRecord`]s, and dispatches each popped entry to its process.
//! - [`ScenarioRunner`]: validates an entity set, runs a fresh [`Simulation`]
//!   to exhaustion and derives the aggregate statistics.
//!
//! # Basic Usage
//!
//! ```rust
//! use regsim_core::{Entity, ScenarioRunner};
//!
//! let entities = vec![
//!     Entity::new("s1", 0.0, 500.0).unwrap(),
//!     Entity::new("s2", 0.0, 500.0).unwrap(),
//!     Entity::new("s3", 100.0, 500.0).unwrap(),
//! ];
//! let result = ScenarioRunner::new(1).run(&entities).unwrap();
//! assert_eq!(result.served, 3);
//! assert_eq!(result.max_wait.as_secs_f64(), 900.0);
//! ```
//!
//! # Time Model
//!
//! All timing uses [`SimTime`], which represents simulation time (not wall-clock time).
//! Nothing in the engine draws random numbers, so identical inputs always
//! produce identical records.

pub mod dists;
pub mod error;
pub mod execute;
pub mod logging;
pub mod process;
pub mod resource;
pub mod scenario;
pub mod scheduler;
pub mod time;
pub mod types;

use std::collections::HashSet;

use tracing::{debug, instrument, trace};

pub use error::SimError;
pub use execute::{Execute, Executor};
pub use logging::{init_simulation_logging, init_simulation_logging_with_level, scenario_span, simulation_span};
pub use process::{Entity, EntityProcess, ProcessState, TimingRecord};
pub use resource::{Acquire, CounterPool, PoolStats};
pub use scenario::{run_sweep, MakespanPolicy, ScenarioResult, ScenarioRunner};
pub use scheduler::{ClockRef, EventEntry, Scheduler};
pub use time::SimTime;
pub use types::{EventId, ProcessId};

/// Simulation struct that puts the clock, the counters and the processes together.
///
/// A simulation owns all of its mutable state, so independent simulations
/// never observe each other.
#[derive(Debug)]
pub struct Simulation {
    scheduler: Scheduler,
    pool: CounterPool,
    processes: Vec<EntityProcess>,
    ids: HashSet<String>,
    records: Vec<TimingRecord>,
    steps: u64,
}

impl Simulation {
    pub fn new(pool: CounterPool) -> Self {
        Self {
            scheduler: Scheduler::default(),
            pool,
            processes: Vec::new(),
            ids: HashSet::new(),
            records: Vec::new(),
            steps: 0,
        }
    }

    /// Register an entity and schedule its arrival.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidEntity`] if another entity already uses the same id.
    /// [`ScenarioRunner`] rejects duplicates before building a simulation, so
    /// this only fires for callers driving a `Simulation` directly.
    pub fn add_entity(&mut self, entity: Entity) -> Result<ProcessId, SimError> {
        if !self.ids.insert(entity.id().to_string()) {
            return Err(SimError::InvalidEntity {
                id: entity.id().to_string(),
                reason: "duplicate identifier".to_string(),
            });
        }
        let pid = ProcessId(self.processes.len());
        let process = EntityProcess::new(pid, entity);
        process.start(&mut self.scheduler)?;
        debug!(process = %pid, entity = process.entity().id(), arrival = %process.entity().arrival(), "Added entity");
        self.processes.push(process);
        Ok(pid)
    }

    /// Performs one step of the simulation. Returns `true` if there was in fact an event
    /// available to process, and `false` otherwise, which signifies that the simulation
    /// ended.
    ///
    /// # Errors
    ///
    /// Any error raised by the resumed process. These indicate engine defects.
    pub fn step(&mut self) -> Result<bool, SimError> {
        let Some(entry) = self.scheduler.pop() else {
            return Ok(false);
        };
        trace!(event_id = %entry.id(), time = %entry.time(), process = %entry.process(), "Processing simulation step");

        let process = self
            .processes
            .get_mut(entry.process().0)
            .ok_or_else(|| SimError::Internal {
                process: entry.process(),
                message: "scheduled resumption for an unknown process".to_string(),
            })?;
        process.resume(&mut self.scheduler, &mut self.pool, &mut self.records)?;
        self.steps += 1;
        Ok(true)
    }

    /// Runs the simulation with the given executor.
    #[instrument(skip(self, executor), fields(capacity = self.pool.capacity(), entities = self.processes.len()))]
    pub fn execute<E: Execute>(&mut self, executor: E) -> Result<(), SimError> {
        debug!("Starting simulation execution");
        executor.execute(self)?;
        debug!(final_time = %self.time(), steps = self.steps, "Simulation execution completed");
        Ok(())
    }

    /// Returns the current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.scheduler.time()
    }

    /// Returns a ClockRef for reading the simulation time.
    pub fn clock(&self) -> ClockRef {
        self.scheduler.clock()
    }

    /// Returns the time of the next scheduled resumption, or None if nothing is pending.
    pub fn peek_next_event_time(&self) -> Option<SimTime> {
        self.scheduler.peek().map(EventEntry::time)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.scheduler.is_empty()
    }

    pub fn pool(&self) -> &CounterPool {
        &self.pool
    }

    pub fn processes(&self) -> &[EntityProcess] {
        &self.processes
    }

    /// Timing records in the order service began.
    pub fn records(&self) -> &[TimingRecord] {
        &self.records
    }

    /// Number of resumptions processed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Entities that have not yet finished service.
    pub fn unfinished(&self) -> usize {
        self.processes.iter().filter(|p| !p.is_done()).count()
    }

    /// Consume the simulation, returning the records and the pool it ran with.
    pub fn into_parts(self) -> (Vec<TimingRecord>, CounterPool) {
        (self.records, self.pool)
    }
}
