//! Worker timing and randomness configuration

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use crate::error::{WorkerError, WorkerResult};

/// Configuration shared by every worker the manager launches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Shortest wait between two emitted events
    pub min_interval: Duration,
    /// Longest wait between two emitted events (inclusive)
    pub max_interval: Duration,
    /// Seed for reproducible event streams; entropy when unset
    pub seed: Option<u64>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(1000),
            max_interval: Duration::from_millis(4000),
            seed: None,
        }
    }
}

impl WorkerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the emission interval range (fluent API)
    pub fn with_interval(mut self, min: Duration, max: Duration) -> Self {
        self.min_interval = min;
        self.max_interval = max;
        self
    }

    /// Configure a deterministic seed (fluent API)
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> WorkerResult<()> {
        if self.min_interval > self.max_interval {
            return Err(WorkerError::InvalidConfig {
                field: "min_interval".to_string(),
                value: format!("{:?} > max_interval {:?}", self.min_interval, self.max_interval),
            });
        }
        if self.max_interval.is_zero() {
            return Err(WorkerError::InvalidConfig {
                field: "max_interval".to_string(),
                value: "0ms".to_string(),
            });
        }
        Ok(())
    }

    /// Random source for one worker, seeded when a seed is configured
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Uniformly random wait in `[min_interval, max_interval]`, millisecond resolution
    pub fn sample_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let min_ms = self.min_interval.as_millis() as u64;
        let max_ms = self.max_interval.as_millis() as u64;
        if min_ms >= max_ms {
            return self.min_interval;
        }
        Duration::from_millis(rng.gen_range(min_ms..=max_ms))
    }
}
