//! Entity process: the lifecycle of one student at the registration desk
//!
//! Each entity is an explicit state machine driven by the scheduler. Every
//! resumption performs exactly one transition:
//!
//! ```text
//! AwaitingArrival --(counter free)--> InService --(service elapsed)--> Done
//!        |                              ^
//!        +--(all busy)--> AwaitingResource --(handed a counter)--+
//! ```
//!
//! The only suspension points are the three non-terminal states.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::SimError;
use crate::resource::{Acquire, CounterPool};
use crate::scheduler::Scheduler;
use crate::time::SimTime;
use crate::types::ProcessId;

/// A student (or any request) with an arrival offset and a service requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    id: String,
    arrival: SimTime,
    service: SimTime,
}

impl Entity {
    /// Build an entity from real-valued seconds.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidEntity`] for an empty id, a negative or non-finite
    /// arrival offset, or a service duration that is not strictly positive.
    pub fn new(id: impl Into<String>, arrival_secs: f64, service_secs: f64) -> Result<Self, SimError> {
        let id = id.into();
        let invalid = |reason: String| SimError::InvalidEntity { id: id.clone(), reason };

        if id.is_empty() {
            return Err(invalid("identifier cannot be empty".to_string()));
        }
        let arrival = SimTime::try_from_secs_f64(arrival_secs)
            .map_err(|_| invalid(format!("arrival offset {arrival_secs} must be a non-negative number")))?;
        let service = SimTime::try_from_secs_f64(service_secs)
            .ok()
            .filter(|s| !s.is_zero())
            .ok_or_else(|| invalid(format!("service duration {service_secs} must be positive")))?;

        Ok(Self { id, arrival, service })
    }

    /// Build an entity from already-converted times.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidEntity`] for an empty id or a zero service duration.
    pub fn from_times(id: impl Into<String>, arrival: SimTime, service: SimTime) -> Result<Self, SimError> {
        let id = id.into();
        if id.is_empty() || service.is_zero() {
            return Err(SimError::InvalidEntity {
                reason: "identifier must be non-empty and service duration positive".to_string(),
                id,
            });
        }
        Ok(Self { id, arrival, service })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn arrival(&self) -> SimTime {
        self.arrival
    }

    pub fn service(&self) -> SimTime {
        self.service
    }
}

/// Timing outcome of one entity, captured the moment its service begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingRecord {
    pub entity_id: String,
    pub arrival: SimTime,
    pub service_start: SimTime,
    pub wait: SimTime,
    pub service: SimTime,
}

impl TimingRecord {
    pub fn wait_secs(&self) -> f64 {
        self.wait.as_secs_f64()
    }

    pub fn service_secs(&self) -> f64 {
        self.service.as_secs_f64()
    }

    pub fn service_end(&self) -> SimTime {
        self.service_start + self.service
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    AwaitingArrival,
    AwaitingResource { requested_at: SimTime },
    InService,
    Done,
}

#[derive(Debug)]
pub struct EntityProcess {
    pid: ProcessId,
    entity: Entity,
    state: ProcessState,
}

impl EntityProcess {
    pub fn new(pid: ProcessId, entity: Entity) -> Self {
        Self {
            pid,
            entity,
            state: ProcessState::AwaitingArrival,
        }
    }

    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ProcessState::Done
    }

    /// Register the first suspension: wait until the arrival offset.
    ///
    /// If the clock has already passed the arrival, the process resumes at
    /// the current time instead.
    pub fn start(&self, scheduler: &mut Scheduler) -> Result<(), SimError> {
        let at = self.entity.arrival.max(scheduler.time());
        scheduler.schedule_at(at, self.pid)?;
        Ok(())
    }

    /// Run from the current suspension point to the next one.
    pub fn resume(
        &mut self,
        scheduler: &mut Scheduler,
        pool: &mut CounterPool,
        records: &mut Vec<TimingRecord>,
    ) -> Result<(), SimError> {
        let now = scheduler.time();
        trace!(process = %self.pid, entity = %self.entity.id, state = ?self.state, %now, "Resuming process");

        match self.state {
            ProcessState::AwaitingArrival => match pool.acquire(self.pid) {
                Acquire::Granted => self.begin_service(now, now, scheduler, records),
                Acquire::Queued { .. } => {
                    self.state = ProcessState::AwaitingResource { requested_at: now };
                }
            },
            ProcessState::AwaitingResource { requested_at } => {
                self.begin_service(requested_at, now, scheduler, records);
            }
            ProcessState::InService => {
                if let Some(next) = pool.release()? {
                    scheduler.schedule_now(next);
                }
                self.state = ProcessState::Done;
            }
            ProcessState::Done => {
                return Err(SimError::Internal {
                    process: self.pid,
                    message: format!("entity '{}' resumed after completion", self.entity.id),
                });
            }
        }
        Ok(())
    }

    fn begin_service(
        &mut self,
        requested_at: SimTime,
        now: SimTime,
        scheduler: &mut Scheduler,
        records: &mut Vec<TimingRecord>,
    ) {
        records.push(TimingRecord {
            entity_id: self.entity.id.clone(),
            arrival: self.entity.arrival,
            service_start: now,
            wait: now - requested_at,
            service: self.entity.service,
        });
        scheduler.schedule(self.entity.service, self.pid);
        self.state = ProcessState::InService;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_validation() {
        assert!(Entity::new("a", 0.0, 300.0).is_ok());
        assert!(matches!(Entity::new("a", -1.0, 300.0), Err(SimError::InvalidEntity { .. })));
        assert!(matches!(Entity::new("a", 0.0, 0.0), Err(SimError::InvalidEntity { .. })));
        assert!(Entity::new("a", 0.0, -5.0).is_err());
        assert!(Entity::new("a", f64::NAN, 5.0).is_err());
        assert!(Entity::new("", 0.0, 5.0).is_err());
        assert!(Entity::from_times("a", SimTime::zero(), SimTime::zero()).is_err());
    }

    #[test]
    fn test_lifecycle_with_free_counter() {
        let mut scheduler = Scheduler::default();
        let mut pool = CounterPool::new(1).unwrap();
        let mut records = Vec::new();
        let mut process = EntityProcess::new(ProcessId(0), Entity::new("a", 10.0, 5.0).unwrap());

        process.start(&mut scheduler).unwrap();
        assert_eq!(scheduler.pop().unwrap().time(), SimTime::from_secs(10));
        process.resume(&mut scheduler, &mut pool, &mut records).unwrap();
        assert_eq!(process.state(), ProcessState::InService);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].wait, SimTime::zero());
        assert_eq!(records[0].service_start, SimTime::from_secs(10));

        assert_eq!(scheduler.pop().unwrap().time(), SimTime::from_secs(15));
        process.resume(&mut scheduler, &mut pool, &mut records).unwrap();
        assert!(process.is_done());
        assert_eq!(pool.in_use(), 0);
        assert!(scheduler.is_empty());

        assert!(matches!(
            process.resume(&mut scheduler, &mut pool, &mut records),
            Err(SimError::Internal { .. })
        ));
    }

    #[test]
    fn test_queued_process_waits_for_handoff() {
        let mut scheduler = Scheduler::default();
        let mut pool = CounterPool::new(1).unwrap();
        let mut records = Vec::new();
        pool.acquire(ProcessId(9));

        let mut process = EntityProcess::new(ProcessId(0), Entity::new("b", 0.0, 5.0).unwrap());
        process.start(&mut scheduler).unwrap();
        scheduler.pop();
        process.resume(&mut scheduler, &mut pool, &mut records).unwrap();
        assert_eq!(
            process.state(),
            ProcessState::AwaitingResource { requested_at: SimTime::zero() }
        );
        assert!(records.is_empty());
        assert!(scheduler.is_empty());

        scheduler.schedule(SimTime::from_secs(3), ProcessId(9));
        scheduler.pop();
        assert_eq!(pool.release().unwrap(), Some(ProcessId(0)));
        process.resume(&mut scheduler, &mut pool, &mut records).unwrap();
        assert_eq!(records[0].wait, SimTime::from_secs(3));
        assert_eq!(records[0].service_start, SimTime::from_secs(3));
    }
}
