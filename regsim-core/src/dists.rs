//! Service time distributions
//!
//! The engine itself never draws random numbers. These samplers belong to the
//! entity source: they produce the service requirement of each entity before
//! a run starts. Every sampler is seeded, so a dataset plus a seed always
//! yields the same entity set.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Exp;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Trait for sampling service times from a distribution
pub trait ServiceTimeDistribution: Send {
    /// Sample the time a counter needs to serve one entity.
    fn sample(&mut self) -> Duration;
}

/// Every entity needs the same service time.
#[derive(Debug, Clone)]
pub struct ConstantServiceTime {
    service_time: Duration,
}

impl ConstantServiceTime {
    pub fn new(service_time: Duration) -> Self {
        Self { service_time }
    }
}

impl ServiceTimeDistribution for ConstantServiceTime {
    fn sample(&mut self) -> Duration {
        self.service_time
    }
}

/// Whole seconds drawn uniformly from `[min_secs, max_secs]`, both inclusive.
#[derive(Debug, Clone)]
pub struct UniformServiceTime {
    min_secs: u64,
    max_secs: u64,
    rng: ChaCha8Rng,
}

impl UniformServiceTime {
    /// # Errors
    ///
    /// [`SimError::InvalidDistribution`] unless `0 < min_secs <= max_secs`.
    pub fn new(min_secs: u64, max_secs: u64, seed: u64) -> Result<Self, SimError> {
        if min_secs == 0 || min_secs > max_secs {
            return Err(SimError::InvalidDistribution(format!(
                "uniform service time needs 0 < min <= max, got [{min_secs}, {max_secs}]"
            )));
        }
        Ok(Self {
            min_secs,
            max_secs,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }
}

impl ServiceTimeDistribution for UniformServiceTime {
    fn sample(&mut self) -> Duration {
        Duration::from_secs(self.rng.gen_range(self.min_secs..=self.max_secs))
    }
}

/// Exponentially distributed service times with the given mean.
#[derive(Debug, Clone)]
pub struct ExponentialServiceTime {
    mean: Duration,
    exp_dist: Exp<f64>,
    rng: ChaCha8Rng,
}

impl ExponentialServiceTime {
    /// # Errors
    ///
    /// [`SimError::InvalidDistribution`] if `mean` is zero.
    pub fn new(mean: Duration, seed: u64) -> Result<Self, SimError> {
        let rate = 1.0 / mean.as_secs_f64();
        let exp_dist = Exp::new(rate)
            .ok()
            .filter(|_| !mean.is_zero())
            .ok_or_else(|| SimError::InvalidDistribution(format!("exponential mean must be positive, got {mean:?}")))?;
        Ok(Self {
            mean,
            exp_dist,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    pub fn mean(&self) -> Duration {
        self.mean
    }
}

impl ServiceTimeDistribution for ExponentialServiceTime {
    fn sample(&mut self) -> Duration {
        // A zero draw is possible in principle; entities need a positive service time.
        let secs: f64 = self.rng.sample(self.exp_dist);
        Duration::from_secs_f64(secs).max(Duration::from_nanos(1))
    }
}

/// Serializable description of a service time distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServiceTimeModel {
    Constant { secs: u64 },
    Uniform { min_secs: u64, max_secs: u64 },
    Exponential { mean_secs: f64 },
}

impl Default for ServiceTimeModel {
    /// Five to ten minutes per student.
    fn default() -> Self {
        ServiceTimeModel::Uniform {
            min_secs: 300,
            max_secs: 600,
        }
    }
}

impl ServiceTimeModel {
    /// Build a seeded sampler for this model.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidDistribution`] for out-of-range parameters.
    pub fn build(&self, seed: u64) -> Result<Box<dyn ServiceTimeDistribution>, SimError> {
        let dist: Box<dyn ServiceTimeDistribution> = match *self {
            ServiceTimeModel::Constant { secs } => {
                if secs == 0 {
                    return Err(SimError::InvalidDistribution("constant service time must be positive".to_string()));
                }
                Box::new(ConstantServiceTime::new(Duration::from_secs(secs)))
            }
            ServiceTimeModel::Uniform { min_secs, max_secs } => {
                Box::new(UniformServiceTime::new(min_secs, max_secs, seed)?)
            }
            ServiceTimeModel::Exponential { mean_secs } => {
                if !mean_secs.is_finite() || mean_secs <= 0.0 {
                    return Err(SimError::InvalidDistribution(format!(
                        "exponential mean must be positive, got {mean_secs}"
                    )));
                }
                Box::new(ExponentialServiceTime::new(Duration::from_secs_f64(mean_secs), seed)?)
            }
        };
        Ok(dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_stays_in_range() {
        let mut dist = UniformServiceTime::new(300, 600, 42).unwrap();
        for _ in 0..1000 {
            let secs = dist.sample().as_secs();
            assert!((300..=600).contains(&secs));
        }
    }

    #[test]
    fn test_uniform_is_reproducible() {
        let mut a = UniformServiceTime::new(300, 600, 7).unwrap();
        let mut b = UniformServiceTime::new(300, 600, 7).unwrap();
        let xs: Vec<_> = (0..50).map(|_| a.sample()).collect();
        let ys: Vec<_> = (0..50).map(|_| b.sample()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_uniform_rejects_bad_bounds() {
        assert!(UniformServiceTime::new(0, 10, 1).is_err());
        assert!(UniformServiceTime::new(10, 5, 1).is_err());
        assert!(UniformServiceTime::new(5, 5, 1).is_ok());
    }

    #[test]
    fn test_exponential_mean() {
        let mut dist = ExponentialServiceTime::new(Duration::from_secs(100), 3).unwrap();
        let n = 20_000;
        let total: f64 = (0..n).map(|_| dist.sample().as_secs_f64()).sum();
        let mean = total / n as f64;
        assert!((mean - 100.0).abs() < 5.0, "sample mean {mean}");
        assert!(ExponentialServiceTime::new(Duration::ZERO, 3).is_err());
    }

    #[test]
    fn test_model_build() {
        let mut constant = ServiceTimeModel::Constant { secs: 30 }.build(0).unwrap();
        assert_eq!(constant.sample(), Duration::from_secs(30));
        assert!(ServiceTimeModel::Constant { secs: 0 }.build(0).is_err());
        assert!(ServiceTimeModel::Exponential { mean_secs: -1.0 }.build(0).is_err());
        assert!(ServiceTimeModel::default().build(42).is_ok());
    }

    #[test]
    fn test_model_serde_shape() {
        let json = r#"{"kind":"uniform","min_secs":60,"max_secs":120}"#;
        let model: ServiceTimeModel = serde_json::from_str(json).unwrap();
        assert_eq!(model, ServiceTimeModel::Uniform { min_secs: 60, max_secs: 120 });

        let json = serde_json::to_string(&ServiceTimeModel::Exponential { mean_secs: 450.0 }).unwrap();
        assert_eq!(json, r#"{"kind":"exponential","mean_secs":450.0}"#);
    }
}
