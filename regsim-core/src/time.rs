//! Simulation time management

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::time::Duration;

use crate::error::SimError;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Simulation time with nanosecond precision
///
/// SimTime is a point on the simulated clock, stored as nanoseconds since the
/// start of a scenario. Integer storage keeps ordering total and exact, which
/// the event queue relies on for reproducible tie-breaks. Real-valued seconds
/// (as they come out of datasets and distributions) are converted once, at the
/// boundary, with [`SimTime::try_from_secs_f64`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct SimTime(u64);

impl SimTime {
    /// Time zero: the start of a scenario.
    pub const fn zero() -> Self {
        SimTime(0)
    }

    pub const fn from_nanos(nanos: u64) -> Self {
        SimTime(nanos)
    }

    pub const fn from_millis(millis: u64) -> Self {
        SimTime(millis * 1_000_000)
    }

    pub const fn from_secs(secs: u64) -> Self {
        SimTime(secs * 1_000_000_000)
    }

    /// Create a SimTime from a Duration (saturates at `u64::MAX` nanoseconds)
    pub fn from_duration(duration: Duration) -> Self {
        SimTime(u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX))
    }

    /// Convert a real number of seconds into simulation time.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidTime`] for negative, NaN, infinite or
    /// unrepresentably large values.
    pub fn try_from_secs_f64(secs: f64) -> Result<Self, SimError> {
        const MAX_SECS: f64 = (u64::MAX as f64) / NANOS_PER_SEC;
        if !secs.is_finite() || secs < 0.0 || secs > MAX_SECS {
            return Err(SimError::InvalidTime(secs));
        }
        Ok(SimTime((secs * NANOS_PER_SEC).round() as u64))
    }

    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_nanos(self.0)
    }

    /// Seconds as a float, for statistics and reporting.
    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / NANOS_PER_SEC
    }

    /// Elapsed time since `earlier`, zero if `earlier` is in the future.
    pub fn saturating_sub(&self, earlier: SimTime) -> SimTime {
        SimTime(self.0.saturating_sub(earlier.0))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Add<SimTime> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: SimTime) -> Self::Output {
        SimTime(self.0.saturating_add(rhs.0))
    }
}

impl Add<Duration> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: Duration) -> Self::Output {
        self + SimTime::from_duration(rhs)
    }
}

impl Sub<SimTime> for SimTime {
    type Output = SimTime;

    fn sub(self, rhs: SimTime) -> Self::Output {
        self.saturating_sub(rhs)
    }
}

impl From<Duration> for SimTime {
    fn from(duration: Duration) -> Self {
        SimTime::from_duration(duration)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0 / 1_000_000_000;
        let millis = (self.0 / 1_000_000) % 1000;
        if millis == 0 {
            write!(f, "{secs}s")
        } else {
            write!(f, "{secs}.{millis:03}s")
        }
    }
}
