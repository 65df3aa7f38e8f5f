//! Error types for the simulation engine

use thiserror::Error;

use crate::time::SimTime;
use crate::types::ProcessId;

/// Top-level error type for simulation operations
///
/// `InvalidEntity`, `InvalidCapacity`, `InvalidTime` and `InvalidDistribution`
/// are input validation failures and are reported before any event is
/// scheduled. `InvalidDelay`, `ResourceMisuse` and `Internal` mean the engine
/// itself is broken; a run that hits one of them is aborted.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid entity '{id}': {reason}")]
    InvalidEntity { id: String, reason: String },

    #[error("Invalid capacity: {0} (at least one counter is required)")]
    InvalidCapacity(usize),

    #[error("Invalid time value: {0} seconds")]
    InvalidTime(f64),

    #[error("Invalid distribution parameters: {0}")]
    InvalidDistribution(String),

    #[error("Invalid scheduling delay at {now}: {reason}")]
    InvalidDelay { now: SimTime, reason: String },

    #[error("Resource misuse: {0}")]
    ResourceMisuse(String),

    #[error("Internal error in process {process}: {message}")]
    Internal { process: ProcessId, message: String },
}

impl SimError {
    /// Whether this error was caused by caller input rather than an engine defect.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SimError::InvalidEntity { .. }
                | SimError::InvalidCapacity(_)
                | SimError::InvalidTime(_)
                | SimError::InvalidDistribution(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SimError::InvalidEntity {
            id: "s22010000".to_string(),
            reason: "service duration must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid entity 's22010000': service duration must be positive"
        );
        assert!(err.is_input_error());

        let err = SimError::InvalidDelay {
            now: SimTime::from_secs(10),
            reason: "negative delay -1".to_string(),
        };
        assert!(err.to_string().contains("10s"));
        assert!(!err.is_input_error());
    }
}
