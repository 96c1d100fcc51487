use crate::core::forcefield::scoring::evaluate;
use crate::core::io::trace::TraceRecord;
use crate::core::models::configuration::Configuration;
use crate::engine::cancel::CancellationToken;
use crate::engine::config::MinimizationConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::{RunState, RunStatus};
use crate::engine::tasks::convergence::{check_convergence, is_check_iteration};
use crate::engine::tasks::gradient::nudge_with;
use crate::engine::utils::sampling::initial_configuration;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct MinimizationResult {
    pub status: RunStatus,
    pub configuration: Configuration,
    /// Number of descent steps applied.
    pub iterations: usize,
    pub initial_energy: f64,
    pub energy: f64,
    /// Summed displacement at the last convergence check.
    pub last_displacement: Option<f64>,
    /// One entry per convergence check, in order. Empty unless the run was configured to
    /// record checkpoints.
    pub checkpoints: Vec<TraceRecord>,
}

impl MinimizationResult {
    #[inline]
    pub fn is_converged(&self) -> bool {
        self.status == RunStatus::Converged
    }

    /// Per-particle displacement at the last check, as shown in progress reports.
    pub fn mean_displacement(&self) -> Option<f64> {
        let n = self.configuration.len();
        self.last_displacement
            .map(|d| if n == 0 { 0.0 } else { d / n as f64 })
    }

    /// Keeps converged results and turns every other terminal status into an error.
    pub fn into_converged(self) -> Result<Self, EngineError> {
        match self.status {
            RunStatus::Converged => Ok(self),
            RunStatus::Cancelled => Err(EngineError::Cancelled {
                iterations: self.iterations,
            }),
            RunStatus::IterationLimitReached | RunStatus::Running => {
                Err(EngineError::Convergence {
                    iterations: self.iterations,
                })
            }
        }
    }
}

/// Minimizes from a random start on the unit sphere, seeded by `config.seed`.
pub fn run_from_random_start(
    config: &MinimizationConfig,
    reporter: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<MinimizationResult, EngineError> {
    let initial = initial_configuration(config.particle_count, config.seed);
    run(initial, config, reporter, cancel)
}

/// Runs the descent loop from `initial` until a terminal status is reached.
///
/// Each iteration first honours cancellation and the iteration cap, then computes the next
/// configuration. On check iterations the displacement between the current and next
/// configuration is measured before the next configuration replaces the current one, so a
/// converged run returns the configuration produced by its converging step.
///
/// # Errors
///
/// Fails before any computation if `initial` does not match the configured particle count or
/// contains non-finite coordinates or has an undefined energy (e.g. coincident
/// Lennard-Jones particles), and during the run if a descent step or a convergence check
/// hits a numeric degeneracy. Reaching the iteration cap or cancellation is reported through
/// [`MinimizationResult::status`], not as an error.
#[instrument(skip_all, name = "minimization_workflow", fields(particles = config.particle_count, potential = %config.potential))]
pub fn run(
    initial: Configuration,
    config: &MinimizationConfig,
    reporter: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<MinimizationResult, EngineError> {
    validate_initial(&initial, config)?;

    let initial_energy = evaluate(&initial, &config.potential);
    if !initial_energy.is_finite() {
        return Err(EngineError::NonFiniteEnergy {
            iteration: 0,
            energy: initial_energy,
        });
    }

    reporter.report(Progress::PhaseStart {
        name: "Minimization",
    });
    info!(initial_energy, "Starting gradient descent.");

    if let Some(max) = config.convergence.max_iterations {
        reporter.report(Progress::TaskStart { total: max as u64 });
    }

    let mut state = RunState::new(initial, config.potential);
    let mut checkpoints = Vec::new();

    while !state.status.is_terminal() {
        if let Some(status) = stop_condition(&state, config, cancel) {
            state.finish(status);
            break;
        }

        let next = descend(&state, config)?;

        if is_check_iteration(state.iteration, config.convergence.check_interval) {
            let check = check_convergence(&state.configuration, &next, &config.convergence);
            let record = TraceRecord {
                iteration: state.iteration,
                energy: evaluate(&next, &config.potential),
                displacement: check.displacement,
                mean_displacement: check.mean_displacement,
            };
            debug!(
                iteration = record.iteration,
                energy = record.energy,
                displacement = record.mean_displacement,
                "Progress: {} iterations. Difference: {:e}",
                record.iteration,
                record.mean_displacement
            );
            reporter.report(Progress::Checkpoint(record));
            if state.iteration > 0 {
                reporter.report(Progress::TaskIncrement {
                    amount: config.convergence.check_interval as u64,
                });
            }
            if config.record_checkpoints {
                checkpoints.push(record);
            }
            state.last_displacement = Some(check.displacement);

            if !record.energy.is_finite() {
                return Err(EngineError::NonFiniteEnergy {
                    iteration: record.iteration,
                    energy: record.energy,
                });
            }
            if check.converged {
                state.advance(next);
                state.finish(RunStatus::Converged);
                break;
            }
        }

        state.advance(next);
    }

    reporter.report(Progress::TaskFinish);
    let result = finalize(state, initial_energy, checkpoints);
    report_outcome(&result, reporter);
    reporter.report(Progress::PhaseFinish);
    Ok(result)
}

fn validate_initial(initial: &Configuration, config: &MinimizationConfig) -> Result<(), EngineError> {
    if initial.is_empty() {
        return Err(EngineError::InvalidInput(
            "the initial configuration has no particles".to_string(),
        ));
    }
    if initial.len() != config.particle_count {
        return Err(EngineError::InvalidInput(format!(
            "initial configuration has {} particles but {} were requested",
            initial.len(),
            config.particle_count
        )));
    }
    if !initial.is_finite() {
        return Err(EngineError::InvalidInput(
            "the initial configuration contains non-finite coordinates".to_string(),
        ));
    }
    Ok(())
}

fn stop_condition(
    state: &RunState,
    config: &MinimizationConfig,
    cancel: &CancellationToken,
) -> Option<RunStatus> {
    if cancel.is_cancelled() {
        return Some(RunStatus::Cancelled);
    }
    match config.convergence.max_iterations {
        Some(max) if state.iteration >= max => Some(RunStatus::IterationLimitReached),
        _ => None,
    }
}

fn descend(state: &RunState, config: &MinimizationConfig) -> Result<Configuration, EngineError> {
    nudge_with(&state.configuration, &state.potential, &config.descent)
        .map_err(|e| e.at_iteration(state.iteration))
}

fn finalize(
    state: RunState,
    initial_energy: f64,
    checkpoints: Vec<TraceRecord>,
) -> MinimizationResult {
    let energy = evaluate(&state.configuration, &state.potential);
    MinimizationResult {
        status: state.status,
        configuration: state.configuration,
        iterations: state.iteration,
        initial_energy,
        energy,
        last_displacement: state.last_displacement,
        checkpoints,
    }
}

fn report_outcome(result: &MinimizationResult, reporter: &ProgressReporter) {
    match result.status {
        RunStatus::Converged => {
            info!(
                iterations = result.iterations,
                energy = result.energy,
                "Convergence reached."
            );
            reporter.report(Progress::Message(format!(
                "Converged after {} iterations (energy {:.8}).",
                result.iterations, result.energy
            )));
        }
        RunStatus::IterationLimitReached => {
            warn!(
                iterations = result.iterations,
                displacement = ?result.last_displacement,
                "Iteration limit reached before convergence."
            );
            reporter.report(Progress::Message(format!(
                "Stopped after {} iterations without converging.",
                result.iterations
            )));
        }
        RunStatus::Cancelled => {
            warn!(iterations = result.iterations, "Minimization cancelled.");
            reporter.report(Progress::Message(format!(
                "Cancelled after {} iterations.",
                result.iterations
            )));
        }
        RunStatus::Running => {}
    }
}
