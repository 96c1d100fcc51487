use crate::core::models::configuration::Configuration;
use crate::core::utils::geometry::{displacement, length};
use crate::engine::config::{ConvergenceConfig, ConvergenceCriterion};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceCheck {
    /// Summed displacement of all particles between the two configurations.
    pub displacement: f64,
    /// `displacement` divided by the particle count, for reporting.
    pub mean_displacement: f64,
    pub converged: bool,
}

/// Sum over particles of `length(old[p] − new[p])`.
pub fn total_displacement(old: &Configuration, new: &Configuration) -> f64 {
    debug_assert_eq!(old.len(), new.len());
    old.iter()
        .zip(new.iter())
        .map(|(a, b)| length(&displacement(a, b)))
        .sum()
}

/// Whether the convergence check runs on `iteration` (every `interval` steps, starting
/// with the first).
#[inline]
pub fn is_check_iteration(iteration: usize, interval: usize) -> bool {
    interval > 0 && iteration % interval == 0
}

/// Compares the displacement of one descent step against the configured threshold.
///
/// With [`ConvergenceCriterion::Total`] the un-normalized sum is compared, so the test
/// loosens as the particle count grows; [`ConvergenceCriterion::PerParticle`] compares the
/// per-particle mean instead.
pub fn check_convergence(
    old: &Configuration,
    new: &Configuration,
    config: &ConvergenceConfig,
) -> ConvergenceCheck {
    let displacement = total_displacement(old, new);
    let mean_displacement = if old.is_empty() {
        0.0
    } else {
        displacement / old.len() as f64
    };

    let measured = match config.criterion {
        ConvergenceCriterion::Total => displacement,
        ConvergenceCriterion::PerParticle => mean_displacement,
    };

    ConvergenceCheck {
        displacement,
        mean_displacement,
        converged: measured < config.threshold,
    }
}
