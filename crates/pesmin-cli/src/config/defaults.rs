use pesmin::core::forcefield::params::PotentialKind;
use pesmin::engine::config::{
    ConvergenceCriterion, DEFAULT_CHECK_INTERVAL, DEFAULT_CONVERGENCE_THRESHOLD,
    DEFAULT_GRADIENT_LIMIT, DEFAULT_LEARNING_RATE, DEFAULT_MAX_ITERATIONS, DEFAULT_STEP_SIZE,
};
use std::path::PathBuf;

pub struct DefaultsConfig {
    pub step_size: f64,
    pub learning_rate: f64,
    pub gradient_limit: f64,
    pub threshold: f64,
    pub check_interval: usize,
    pub criterion: ConvergenceCriterion,
    pub max_iterations: usize,
    pub output_extension: &'static str,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            step_size: DEFAULT_STEP_SIZE,
            learning_rate: DEFAULT_LEARNING_RATE,
            gradient_limit: DEFAULT_GRADIENT_LIMIT,
            threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            check_interval: DEFAULT_CHECK_INTERVAL,
            criterion: ConvergenceCriterion::Total,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            output_extension: "xyz",
        }
    }
}

impl DefaultsConfig {
    /// `{n}{label}.xyz`, e.g. `13LJ.xyz`.
    pub fn output_path(&self, particle_count: usize, potential: &PotentialKind) -> PathBuf {
        PathBuf::from(format!(
            "{}{}.{}",
            particle_count,
            potential.label(),
            self.output_extension
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_uses_count_and_label() {
        let defaults = DefaultsConfig::default();
        assert_eq!(
            defaults.output_path(13, &PotentialKind::LennardJones),
            PathBuf::from("13LJ.xyz")
        );
        assert_eq!(
            defaults.output_path(7, &PotentialKind::Morse { re_over_sigma: 1.5 }),
            PathBuf::from("7Morse.xyz")
        );
    }
}
