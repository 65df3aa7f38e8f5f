//! Counter pool: `k` interchangeable servers with FIFO admission
//!
//! The pool hands out at most `capacity` units at a time. Requests that find
//! every unit busy join a FIFO wait list. A release never returns the unit to
//! the free count while someone is waiting; it is transferred straight to the
//! head of the list, so a request arriving later at the same instant cannot
//! barge ahead of a queued one.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SimError;
use crate::types::ProcessId;

/// Outcome of [`CounterPool::acquire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquire {
    /// A unit was free and now belongs to the caller.
    Granted,
    /// Every unit is busy; the caller waits at `position` (0 = head).
    Queued { position: usize },
}

/// Counters collected over the lifetime of a pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Total units handed out.
    pub grants: u64,
    /// Units handed out to a waiter on release (the rest were granted on request).
    pub queued_grants: u64,
    /// Highest number of units held at once.
    pub peak_in_use: usize,
    /// Longest the wait list ever got.
    pub peak_queue_len: usize,
}

#[derive(Debug)]
pub struct CounterPool {
    capacity: usize,
    in_use: usize,
    // FIFO queue of outstanding acquisitions.
    waiters: VecDeque<ProcessId>,
    stats: PoolStats,
}

impl CounterPool {
    /// Create a pool with `capacity` counters.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, SimError> {
        if capacity == 0 {
            return Err(SimError::InvalidCapacity(capacity));
        }
        Ok(Self {
            capacity,
            in_use: 0,
            waiters: VecDeque::new(),
            stats: PoolStats::default(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_use(&self) -> usize {
        self.in_use
    }

    pub fn available(&self) -> usize {
        self.capacity - self.in_use
    }

    pub fn queue_len(&self) -> usize {
        self.waiters.len()
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Request one unit for `process`.
    pub fn acquire(&mut self, process: ProcessId) -> Acquire {
        // Fairness: do not allow barging ahead of queued waiters.
        if self.in_use < self.capacity && self.waiters.is_empty() {
            self.grant();
            debug!(%process, in_use = self.in_use, capacity = self.capacity, "Counter granted");
            return Acquire::Granted;
        }

        debug_assert!(
            !self.waiters.contains(&process),
            "{process} is already waiting for a counter"
        );
        self.waiters.push_back(process);
        self.stats.peak_queue_len = self.stats.peak_queue_len.max(self.waiters.len());
        let position = self.waiters.len() - 1;
        debug!(%process, position, in_use = self.in_use, "Counter busy, request queued");
        Acquire::Queued { position }
    }

    /// Give back one unit.
    ///
    /// If anyone is waiting, the unit moves directly to the longest waiter,
    /// which is returned so the caller can resume it; the held count is
    /// unchanged in that case.
    ///
    /// # Errors
    ///
    /// [`SimError::ResourceMisuse`] when no unit is currently held.
    pub fn release(&mut self) -> Result<Option<ProcessId>, SimError> {
        if self.in_use == 0 {
            return Err(SimError::ResourceMisuse(format!(
                "release without a matching acquire (capacity {}, waiters {})",
                self.capacity,
                self.waiters.len()
            )));
        }

        self.in_use -= 1;
        match self.waiters.pop_front() {
            Some(next) => {
                self.grant();
                self.stats.queued_grants += 1;
                debug!(process = %next, waiting = self.waiters.len(), "Counter handed to next in line");
                Ok(Some(next))
            }
            None => {
                debug!(in_use = self.in_use, "Counter released");
                Ok(None)
            }
        }
    }

    fn grant(&mut self) {
        self.in_use += 1;
        debug_assert!(self.in_use <= self.capacity, "held count exceeds capacity");
        self.stats.grants += 1;
        self.stats.peak_in_use = self.stats.peak_in_use.max(self.in_use);
    }
}
