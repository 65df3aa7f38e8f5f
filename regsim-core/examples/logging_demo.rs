//! Watch the engine at debug level while one small scenario runs
//!
//! ```bash
//! cargo run -p regsim-core --example logging_demo
//! RUST_LOG=trace cargo run -p regsim-core --example logging_demo
//! ```

use regsim_core::dists::{ServiceTimeDistribution, UniformServiceTime};
use regsim_core::{
    init_simulation_logging_with_level, run_sweep, CounterPool, Entity, Execute, Executor, MakespanPolicy,
    SimError, Simulation,
};
use tracing::info;

fn main() -> Result<(), SimError> {
    init_simulation_logging_with_level("debug");

    let mut service = UniformServiceTime::new(300, 600, 42)?;
    let entities = (0..8)
        .map(|i| Entity::new(format!("s220{}", 10000 + i), (i * 120) as f64, service.sample().as_secs_f64()))
        .collect::<Result<Vec<_>, _>>()?;

    // Step by step with one counter, reporting the queue after every resumption.
    let mut sim = Simulation::new(CounterPool::new(1)?);
    for entity in &entities {
        sim.add_entity(entity.clone())?;
    }
    Executor::unbound()
        .side_effect(|sim: &Simulation| {
            info!(
                time = %sim.time(),
                in_use = sim.pool().in_use(),
                queued = sim.pool().queue_len(),
                "step"
            );
        })
        .execute(&mut sim)?;

    for result in run_sweep(&entities, &[1, 2, 4], MakespanPolicy::default())? {
        info!(
            counters = result.capacity,
            throughput_per_hour = result.throughput_per_hour,
            avg_wait_secs = result.avg_wait_secs,
            utilization_pct = result.utilization_pct(),
            "scenario"
        );
    }
    Ok(())
}
