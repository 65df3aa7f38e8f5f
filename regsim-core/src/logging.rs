//! Structured logging for simulation runs
//!
//! The engine logs through `tracing`; binaries and tests choose a subscriber.
//!
//! ## Levels
//! - **TRACE**: every scheduled and popped resumption, every state transition
//! - **DEBUG**: counter grants, queueing and hand-offs
//! - **INFO**: scenario start and completion with the aggregate statistics
//! - **WARN**: statistics that had to be degraded (zero makespan)
//!
//! ## Environment control
//! ```bash
//! RUST_LOG=debug regsim --data queue_data.csv
//! RUST_LOG=regsim_core::resource=debug,regsim=info regsim --data queue_data.csv
//! ```

use tracing::{info, Span};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging at `info` unless `RUST_LOG` says otherwise.
pub fn init_simulation_logging() {
    init_simulation_logging_with_level("info")
}

/// Initialize logging with a specific level
///
/// `RUST_LOG` takes precedence when set. Calling this more than once (as
/// tests do) keeps the first subscriber.
///
/// # Arguments
/// * `level` - Log level: "trace", "debug", "info", "warn", or "error"
pub fn init_simulation_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{level},regsim_core::scheduler=warn").into());

    let installed = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true))
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        info!("Simulation logging initialized at level: {}", level);
    }
}

/// Create a span for tracking a whole sweep or experiment
pub fn simulation_span(name: &str) -> Span {
    tracing::info_span!("simulation", name = name)
}

/// Create a span for tracking one scenario run
pub fn scenario_span(capacity: usize) -> Span {
    tracing::info_span!("scenario", capacity = capacity)
}
