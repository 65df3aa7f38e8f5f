//! Charts for counter sweeps
//!
//! Renders the four standard sweep charts (throughput, average wait, maximum
//! wait and utilization against the number of counters) as PNG files using
//! the plotters bitmap backend.
//!
//! # Example
//!
//! ```no_run
//! use regsim_core::{run_sweep, Entity, MakespanPolicy};
//! use regsim_metrics::summarize;
//! use regsim_viz::charts::generate_all_charts;
//!
//! let entities = vec![Entity::new("s22010000", 0.0, 420.0).unwrap()];
//! let results = run_sweep(&entities, &[1, 2, 4], MakespanPolicy::default()).unwrap();
//! generate_all_charts(&summarize(&results).unwrap(), "Outputs").unwrap();
//! ```

pub mod charts;
pub mod error;

pub use error::VizError;
