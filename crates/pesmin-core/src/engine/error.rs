use super::config::ConfigError;
use crate::core::forcefield::params::PotentialError;
use crate::core::models::configuration::Axis;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Invalid potential: {source}")]
    Potential {
        #[from]
        source: PotentialError,
    },

    #[error(
        "Numeric degeneracy at iteration {iteration}: derivative for particle {particle} along {axis} is undefined"
    )]
    NumericDegeneracy {
        iteration: usize,
        particle: usize,
        axis: Axis,
    },

    #[error("Numeric degeneracy at iteration {iteration}: total energy is {energy}")]
    NonFiniteEnergy { iteration: usize, energy: f64 },

    #[error("Algorithm failed to converge after {iterations} iterations")]
    Convergence { iterations: usize },

    #[error("Minimization cancelled after {iterations} iterations")]
    Cancelled { iterations: usize },
}

impl EngineError {
    /// Attaches the outer iteration to errors raised inside a descent step.
    pub(crate) fn at_iteration(self, iteration: usize) -> Self {
        match self {
            EngineError::NumericDegeneracy { particle, axis, .. } => {
                EngineError::NumericDegeneracy {
                    iteration,
                    particle,
                    axis,
                }
            }
            other => other,
        }
    }
}
