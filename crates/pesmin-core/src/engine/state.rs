use crate::core::forcefield::params::PotentialKind;
use crate::core::models::configuration::Configuration;
use std::fmt;

/// Lifecycle of a minimization run.
///
/// `Running` is the only non-terminal status. Only `Converged` counts as success; hitting
/// the iteration cap or being cancelled are separate terminal outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Converged,
    IterationLimitReached,
    Cancelled,
}

impl RunStatus {
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != RunStatus::Running
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RunStatus::Running => "running",
            RunStatus::Converged => "converged",
            RunStatus::IterationLimitReached => "iteration limit reached",
            RunStatus::Cancelled => "cancelled",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone)]
pub struct RunState {
    pub configuration: Configuration,
    pub iteration: usize,
    pub status: RunStatus,
    pub potential: PotentialKind,
    /// Summed displacement measured at the most recent convergence check.
    pub last_displacement: Option<f64>,
}

impl RunState {
    pub fn new(configuration: Configuration, potential: PotentialKind) -> Self {
        Self {
            configuration,
            iteration: 0,
            status: RunStatus::Running,
            potential,
            last_displacement: None,
        }
    }

    /// Replaces the held configuration with the result of one descent step.
    pub fn advance(&mut self, next: Configuration) {
        debug_assert_eq!(next.len(), self.configuration.len());
        self.configuration = next;
        self.iteration += 1;
    }

    pub fn finish(&mut self, status: RunStatus) {
        debug_assert!(status.is_terminal());
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn state() -> RunState {
        RunState::new(
            Configuration::new(vec![Point3::origin(), Point3::new(1.5, 0.0, 0.0)]),
            PotentialKind::LennardJones,
        )
    }

    #[test]
    fn new_state_is_running_at_iteration_zero() {
        let state = state();
        assert_eq!(state.iteration, 0);
        assert_eq!(state.status, RunStatus::Running);
        assert!(!state.status.is_terminal());
        assert_eq!(state.last_displacement, None);
    }

    #[test]
    fn advance_replaces_configuration_and_counts_iterations() {
        let mut state = state();
        let next = Configuration::new(vec![Point3::new(0.1, 0.0, 0.0), Point3::origin()]);
        state.advance(next.clone());
        state.advance(next.clone());
        assert_eq!(state.iteration, 2);
        assert_eq!(state.configuration, next);
    }

    #[test]
    fn finish_moves_to_terminal_status() {
        let mut state = state();
        state.finish(RunStatus::IterationLimitReached);
        assert!(state.status.is_terminal());
        assert_eq!(state.status.to_string(), "iteration limit reached");
    }
}
