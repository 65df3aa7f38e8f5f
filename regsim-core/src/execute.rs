use crate::error::SimError;
use crate::{SimTime, Simulation};

/// Simulation execution trait.
pub trait Execute {
    /// Executes the simulation until some stopping condition is reached.
    /// The condition is implementation-specific.
    ///
    /// # Errors
    ///
    /// Propagates the first engine error raised by a step; the simulation is
    /// left as it was at that point.
    fn execute(self, sim: &mut Simulation) -> Result<(), SimError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndCondition {
    Time(SimTime),
    NoEvents,
    Steps(usize),
}

/// Executor is used for simple execution of an entire simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executor {
    end_condition: EndCondition,
}

impl Executor {
    /// Simulation will end only once there are no pending resumptions.
    #[must_use]
    pub fn unbound() -> Self {
        Self {
            end_condition: EndCondition::NoEvents,
        }
    }

    /// Simulation will process every resumption due at or before `time`.
    #[must_use]
    pub fn timed(time: SimTime) -> Self {
        Self {
            end_condition: EndCondition::Time(time),
        }
    }

    /// Simulation will execute exactly this many steps, unless it runs out of events.
    #[must_use]
    pub fn steps(steps: usize) -> Self {
        Self {
            end_condition: EndCondition::Steps(steps),
        }
    }

    /// Registers a side effect that is called _after_ each simulation step.
    #[must_use]
    pub fn side_effect<F>(self, func: F) -> ExecutorWithSideEffect<F>
    where
        F: FnMut(&Simulation),
    {
        ExecutorWithSideEffect {
            end_condition: self.end_condition,
            side_effect: func,
        }
    }
}

impl Execute for Executor {
    fn execute(self, sim: &mut Simulation) -> Result<(), SimError> {
        run_with(sim, self.end_condition, |_| {})
    }
}

pub struct ExecutorWithSideEffect<F>
where
    F: FnMut(&Simulation),
{
    end_condition: EndCondition,
    side_effect: F,
}

impl<F> Execute for ExecutorWithSideEffect<F>
where
    F: FnMut(&Simulation),
{
    fn execute(self, sim: &mut Simulation) -> Result<(), SimError> {
        run_with(sim, self.end_condition, self.side_effect)
    }
}

fn run_with<F>(sim: &mut Simulation, end_condition: EndCondition, mut side_effect: F) -> Result<(), SimError>
where
    F: FnMut(&Simulation),
{
    let mut step = |sim: &mut Simulation| -> Result<bool, SimError> {
        let stepped = sim.step()?;
        if stepped {
            side_effect(sim);
        }
        Ok(stepped)
    };
    match end_condition {
        EndCondition::NoEvents => while step(sim)? {},
        EndCondition::Time(time) => {
            while sim.peek_next_event_time().is_some_and(|t| t <= time) {
                step(sim)?;
            }
        }
        EndCondition::Steps(steps) => {
            for _ in 0..steps {
                if !step(sim)? {
                    break;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{CounterPool, Entity};

    fn sim_with_one_counter() -> Simulation {
        let mut sim = Simulation::new(CounterPool::new(1).unwrap());
        // arrivals at 0, 2, 4; every service takes 2 seconds
        for (i, arrival) in [0.0, 2.0, 4.0].into_iter().enumerate() {
            sim.add_entity(Entity::new(format!("e{i}"), arrival, 2.0).unwrap()).unwrap();
        }
        sim
    }

    #[test]
    fn test_create_executor() {
        assert_eq!(
            Executor::unbound(),
            Executor {
                end_condition: EndCondition::NoEvents
            }
        );
        assert_eq!(
            Executor::timed(SimTime::zero()),
            Executor {
                end_condition: EndCondition::Time(SimTime::zero())
            }
        );
        assert_eq!(
            Executor::steps(7),
            Executor {
                end_condition: EndCondition::Steps(7)
            }
        );
    }

    #[test]
    fn test_unbound_runs_to_exhaustion() {
        let mut sim = sim_with_one_counter();
        Executor::unbound().execute(&mut sim).unwrap();
        assert!(!sim.has_pending_events());
        assert_eq!(sim.records().len(), 3);
        assert_eq!(sim.time(), SimTime::from_secs(6));
    }

    #[test]
    fn test_steps() {
        let mut sim = sim_with_one_counter();
        // the first two arrivals; the second one finds the counter busy
        Executor::steps(2).execute(&mut sim).unwrap();
        assert_eq!(sim.records().len(), 1);
        assert_eq!(sim.time(), SimTime::from_secs(2));
    }

    #[test]
    fn test_timed() {
        let mut sim = sim_with_one_counter();
        Executor::timed(SimTime::from_secs(3)).execute(&mut sim).unwrap();
        assert_eq!(sim.records().len(), 2);
        assert_eq!(sim.time(), SimTime::from_secs(2));
    }

    #[test]
    fn test_side_effect_sees_every_step() {
        let mut sim = sim_with_one_counter();
        let mut peak = 0;
        let mut steps = 0;
        Executor::unbound()
            .side_effect(|sim: &Simulation| {
                steps += 1;
                peak = peak.max(sim.pool().in_use());
            })
            .execute(&mut sim)
            .unwrap();
        // three arrivals, two hand-off resumes, three departures
        assert_eq!(steps, 8);
        assert_eq!(peak, 1);
    }
}
