use crate::core::forcefield::params::PotentialKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Finite-difference offset applied to each coordinate when estimating the gradient.
pub const DEFAULT_STEP_SIZE: f64 = 1e-5;
/// Scale applied to the clamped derivative when moving a coordinate.
pub const DEFAULT_LEARNING_RATE: f64 = 1e-4;
/// Largest derivative magnitude allowed to move a coordinate.
pub const DEFAULT_GRADIENT_LIMIT: f64 = 1e3;
/// Displacement below which a run is considered converged.
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 5e-13;
/// Number of descent steps between two convergence checks.
pub const DEFAULT_CHECK_INTERVAL: usize = 100;
/// Safety bound on the number of descent steps.
pub const DEFAULT_MAX_ITERATIONS: usize = 1_000_000;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Which displacement value is compared against the convergence threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConvergenceCriterion {
    /// Summed displacement over all particles.
    #[default]
    Total,
    /// Summed displacement divided by the particle count.
    PerParticle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescentParameters {
    pub step_size: f64,
    pub learning_rate: f64,
    pub gradient_limit: f64,
}

impl Default for DescentParameters {
    fn default() -> Self {
        Self {
            step_size: DEFAULT_STEP_SIZE,
            learning_rate: DEFAULT_LEARNING_RATE,
            gradient_limit: DEFAULT_GRADIENT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceConfig {
    pub threshold: f64,
    pub check_interval: usize,
    pub criterion: ConvergenceCriterion,
    /// `None` lets the loop run until it converges or is cancelled.
    pub max_iterations: Option<usize>,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            check_interval: DEFAULT_CHECK_INTERVAL,
            criterion: ConvergenceCriterion::Total,
            max_iterations: Some(DEFAULT_MAX_ITERATIONS),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MinimizationConfig {
    pub particle_count: usize,
    pub potential: PotentialKind,
    pub descent: DescentParameters,
    pub convergence: ConvergenceConfig,
    /// Seed for the random initial configuration; `None` draws from the thread RNG.
    pub seed: Option<u64>,
    /// Keep every convergence check in the result. Off by default; checks are always
    /// reported as progress events.
    pub record_checkpoints: bool,
}

#[derive(Default)]
pub struct MinimizationConfigBuilder {
    particle_count: Option<usize>,
    potential: Option<PotentialKind>,
    step_size: Option<f64>,
    learning_rate: Option<f64>,
    gradient_limit: Option<f64>,
    threshold: Option<f64>,
    check_interval: Option<usize>,
    criterion: Option<ConvergenceCriterion>,
    max_iterations: Option<Option<usize>>,
    seed: Option<u64>,
    record_checkpoints: bool,
}

impl MinimizationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn particle_count(mut self, count: usize) -> Self {
        self.particle_count = Some(count);
        self
    }
    pub fn potential(mut self, potential: PotentialKind) -> Self {
        self.potential = Some(potential);
        self
    }
    pub fn step_size(mut self, step: f64) -> Self {
        self.step_size = Some(step);
        self
    }
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = Some(rate);
        self
    }
    pub fn gradient_limit(mut self, limit: f64) -> Self {
        self.gradient_limit = Some(limit);
        self
    }
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }
    pub fn check_interval(mut self, interval: usize) -> Self {
        self.check_interval = Some(interval);
        self
    }
    pub fn criterion(mut self, criterion: ConvergenceCriterion) -> Self {
        self.criterion = Some(criterion);
        self
    }
    pub fn max_iterations(mut self, max: Option<usize>) -> Self {
        self.max_iterations = Some(max);
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
    pub fn record_checkpoints(mut self, record: bool) -> Self {
        self.record_checkpoints = record;
        self
    }

    pub fn build(self) -> Result<MinimizationConfig, ConfigError> {
        let particle_count = self
            .particle_count
            .ok_or(ConfigError::MissingParameter("particle_count"))?;
        if particle_count == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "particle_count",
                reason: "at least one particle is required".to_string(),
            });
        }
        let potential = self
            .potential
            .ok_or(ConfigError::MissingParameter("potential"))?;

        let descent = DescentParameters {
            step_size: positive("step_size", self.step_size.unwrap_or(DEFAULT_STEP_SIZE))?,
            learning_rate: positive(
                "learning_rate",
                self.learning_rate.unwrap_or(DEFAULT_LEARNING_RATE),
            )?,
            gradient_limit: positive(
                "gradient_limit",
                self.gradient_limit.unwrap_or(DEFAULT_GRADIENT_LIMIT),
            )?,
        };

        let check_interval = self.check_interval.unwrap_or(DEFAULT_CHECK_INTERVAL);
        if check_interval == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "check_interval",
                reason: "must be at least 1".to_string(),
            });
        }
        let max_iterations = self
            .max_iterations
            .unwrap_or(Some(DEFAULT_MAX_ITERATIONS));
        if max_iterations == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "max_iterations",
                reason: "must be at least 1 when bounded".to_string(),
            });
        }
        let convergence = ConvergenceConfig {
            threshold: positive(
                "threshold",
                self.threshold.unwrap_or(DEFAULT_CONVERGENCE_THRESHOLD),
            )?,
            check_interval,
            criterion: self.criterion.unwrap_or_default(),
            max_iterations,
        };

        Ok(MinimizationConfig {
            particle_count,
            potential,
            descent,
            convergence,
            seed: self.seed,
            record_checkpoints: self.record_checkpoints,
        })
    }
}

fn positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("expected a finite positive number, got {}", value),
        })
    }
}
