use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;

use tracing::trace;

use crate::error::SimError;
use crate::time::SimTime;
use crate::types::{EventId, ProcessId};

/// Entry stored in the scheduler: which process resumes, and when.
///
/// Entries are ordered by `(time, id)`. Because ids increase with every
/// registration, two entries due at the same instant resume in the order they
/// were scheduled.
#[derive(Debug, Clone, Copy)]
pub struct EventEntry {
    id: EventId,
    time: SimTime,
    process: ProcessId,
}

impl EventEntry {
    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn process(&self) -> ProcessId {
        self.process
    }
}

impl PartialEq for EventEntry {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.id == other.id
    }
}

impl Eq for EventEntry {}

impl PartialOrd for EventEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse the ordering for min-heap behavior in BinaryHeap
        (other.time, other.id).cmp(&(self.time, self.id))
    }
}

type Clock = Rc<Cell<SimTime>>;

/// This struct exposes only immutable access to the simulation clock.
/// The clock itself is owned by the scheduler, while others can obtain `ClockRef`
/// to read the current simulation time.
///
/// # Example
///
/// ```
/// # use regsim_core::Scheduler;
/// let scheduler = Scheduler::default();
/// let clock_ref = scheduler.clock();
/// assert_eq!(clock_ref.time(), scheduler.time());
/// ```
#[derive(Debug, Clone)]
pub struct ClockRef {
    clock: Clock,
}

impl From<Clock> for ClockRef {
    fn from(clock: Clock) -> Self {
        Self { clock }
    }
}

impl ClockRef {
    /// Return the current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.clock.get()
    }
}

/// Scheduler keeps the current time and the set of pending resumptions.
///
/// Time only moves in [`Scheduler::pop`], which jumps the clock to the popped
/// entry. Nothing else can set it.
#[derive(Debug)]
pub struct Scheduler {
    next_event_id: u64,
    events: BinaryHeap<EventEntry>,
    clock: Clock,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            next_event_id: 0,
            events: BinaryHeap::default(),
            clock: Rc::new(Cell::new(SimTime::zero())),
        }
    }
}

impl Scheduler {
    /// Schedules `process` to resume at `self.time() + delay`.
    pub fn schedule(&mut self, delay: SimTime, process: ProcessId) -> EventId {
        let time = self.time() + delay;
        self.push(time, process)
    }

    /// Schedules `process` to resume immediately, behind everything already due now.
    pub fn schedule_now(&mut self, process: ProcessId) -> EventId {
        self.schedule(SimTime::zero(), process)
    }

    /// Schedules `process` after a real-valued delay in seconds.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidDelay`] if `delay_secs` is negative or not finite.
    pub fn schedule_secs(&mut self, delay_secs: f64, process: ProcessId) -> Result<EventId, SimError> {
        let delay = SimTime::try_from_secs_f64(delay_secs).map_err(|_| SimError::InvalidDelay {
            now: self.time(),
            reason: format!("delay of {delay_secs} seconds for {process}"),
        })?;
        Ok(self.schedule(delay, process))
    }

    /// Schedules `process` to resume at the absolute time `time`.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidDelay`] if `time` lies before the current time.
    pub fn schedule_at(&mut self, time: SimTime, process: ProcessId) -> Result<EventId, SimError> {
        if time < self.time() {
            return Err(SimError::InvalidDelay {
                now: self.time(),
                reason: format!("{process} asked to resume in the past at {time}"),
            });
        }
        Ok(self.push(time, process))
    }

    fn push(&mut self, time: SimTime, process: ProcessId) -> EventId {
        let id = EventId(self.next_event_id);
        self.next_event_id += 1;
        trace!(event_id = %id, time = %time, process = %process, "Event scheduled");
        self.events.push(EventEntry { id, time, process });
        id
    }

    /// Returns the current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.clock.get()
    }

    /// Returns a structure with immutable access to the simulation time.
    #[must_use]
    pub fn clock(&self) -> ClockRef {
        ClockRef {
            clock: Rc::clone(&self.clock),
        }
    }

    /// Returns a reference to the next scheduled entry or `None` if none are left.
    pub fn peek(&self) -> Option<&EventEntry> {
        self.events.peek()
    }

    /// Removes and returns the next scheduled entry, advancing the clock to its time.
    pub fn pop(&mut self) -> Option<EventEntry> {
        self.events.pop().inspect(|event| {
            debug_assert!(event.time >= self.clock.get(), "clock must not run backwards");
            self.clock.replace(event.time);
        })
    }

    /// Number of pending resumptions.
    pub fn pending(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clock_ref() {
        let time = SimTime::from_secs(1);
        let clock = Clock::new(Cell::new(time));
        let clock_ref = ClockRef::from(clock);
        assert_eq!(clock_ref.time(), time);
    }

    #[test]
    fn test_event_entry_cmp() {
        let early = EventEntry { id: EventId(5), time: SimTime::from_secs(1), process: ProcessId(0) };
        let late = EventEntry { id: EventId(0), time: SimTime::from_secs(2), process: ProcessId(1) };
        // min-heap: the earlier entry compares greater
        assert_eq!(early.cmp(&late), Ordering::Greater);

        let first = EventEntry { id: EventId(1), time: SimTime::from_secs(1), process: ProcessId(0) };
        let second = EventEntry { id: EventId(2), time: SimTime::from_secs(1), process: ProcessId(1) };
        assert_eq!(first.cmp(&second), Ordering::Greater);
        assert_ne!(first, second);
    }

    #[test]
    fn test_scheduler() {
        let mut scheduler = Scheduler::default();
        assert_eq!(scheduler.time(), SimTime::zero());
        assert!(scheduler.is_empty());

        scheduler.schedule(SimTime::from_secs(1), ProcessId(0));
        scheduler.schedule_now(ProcessId(1));
        scheduler.schedule(SimTime::from_secs(2), ProcessId(2));
        assert_eq!(scheduler.pending(), 3);

        let entry = scheduler.pop().unwrap();
        assert_eq!(entry.process(), ProcessId(1));
        assert_eq!(scheduler.time(), SimTime::zero());

        let entry = scheduler.pop().unwrap();
        assert_eq!(entry.process(), ProcessId(0));
        assert_eq!(scheduler.time(), SimTime::from_secs(1));
        assert_eq!(scheduler.clock().time(), SimTime::from_secs(1));

        // relative to the advanced clock
        scheduler.schedule(SimTime::from_secs(1), ProcessId(3));

        let entry = scheduler.pop().unwrap();
        assert_eq!(entry.process(), ProcessId(2));
        let entry = scheduler.pop().unwrap();
        assert_eq!(entry.process(), ProcessId(3));
        assert_eq!(scheduler.time(), SimTime::from_secs(2));

        assert!(scheduler.pop().is_none());
    }

    #[test]
    fn test_same_time_entries_resume_in_registration_order() {
        let mut scheduler = Scheduler::default();
        for i in 0..100 {
            scheduler.schedule(SimTime::from_secs(7), ProcessId(i));
        }
        let order: Vec<usize> = std::iter::from_fn(|| scheduler.pop()).map(|e| e.process().0).collect();
        assert_eq!(order, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_invalid_delays() {
        let mut scheduler = Scheduler::default();
        assert!(matches!(
            scheduler.schedule_secs(-0.5, ProcessId(0)),
            Err(SimError::InvalidDelay { .. })
        ));
        assert!(scheduler.schedule_secs(f64::NAN, ProcessId(0)).is_err());
        assert!(scheduler.schedule_secs(2.0, ProcessId(0)).is_ok());

        scheduler.pop();
        assert_eq!(scheduler.time(), SimTime::from_secs(2));
        assert!(matches!(
            scheduler.schedule_at(SimTime::from_secs(1), ProcessId(1)),
            Err(SimError::InvalidDelay { .. })
        ));
        assert!(scheduler.schedule_at(SimTime::from_secs(2), ProcessId(1)).is_ok());
        assert!(!scheduler.is_empty());
    }
}
