use crate::core::forcefield::params::PotentialKind;
use crate::core::forcefield::scoring::evaluate;
use crate::core::models::configuration::{Axis, Configuration};
use crate::engine::config::DescentParameters;
use crate::engine::error::EngineError;
use nalgebra::{Point3, Vector3};
use tracing::{instrument, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Central-difference estimate of `∂U/∂(particle, axis)`.
///
/// Both perturbed configurations are fresh copies of `configuration`, so no perturbation
/// can leak into another coordinate's estimate.
pub fn central_difference(
    configuration: &Configuration,
    potential: &PotentialKind,
    particle: usize,
    axis: Axis,
    step_size: f64,
) -> f64 {
    let plus = configuration.with_offset(particle, axis, step_size);
    let minus = configuration.with_offset(particle, axis, -step_size);
    (evaluate(&plus, potential) - evaluate(&minus, potential)) / (2.0 * step_size)
}

/// Unclamped finite-difference gradient, one vector per particle.
pub fn estimate_gradient(
    configuration: &Configuration,
    potential: &PotentialKind,
    step_size: f64,
) -> Vec<Vector3<f64>> {
    (0..configuration.len())
        .map(|particle| {
            Vector3::from_fn(|row, _| {
                central_difference(
                    configuration,
                    potential,
                    particle,
                    Axis::ALL[row],
                    step_size,
                )
            })
        })
        .collect()
}

/// One descent step with the default learning rate and derivative limit.
pub fn nudge(
    configuration: &Configuration,
    step_size: f64,
    potential: &PotentialKind,
) -> Result<Configuration, EngineError> {
    let params = DescentParameters {
        step_size,
        ..DescentParameters::default()
    };
    nudge_with(configuration, potential, &params)
}

/// One descent step: every coordinate moves against its clamped finite-difference derivative.
///
/// Each new coordinate is `old − learning_rate · clamp(∂U, ±gradient_limit)`, computed
/// from the unmodified input configuration. The `3n` estimates are independent; with the
/// `parallel` feature they are spread over the rayon pool and gathered back in particle
/// order, so the result is identical to the sequential path.
///
/// # Errors
///
/// Returns [`EngineError::NumericDegeneracy`] when a derivative estimate is NaN, which
/// happens when the potential is undefined near the configuration (e.g. coincident
/// Lennard-Jones particles).
#[instrument(level = "trace", skip_all, fields(particles = configuration.len()))]
pub fn nudge_with(
    configuration: &Configuration,
    potential: &PotentialKind,
    params: &DescentParameters,
) -> Result<Configuration, EngineError> {
    let coordinate_count = configuration.len() * 3;

    #[cfg(not(feature = "parallel"))]
    let iterator = 0..coordinate_count;

    #[cfg(feature = "parallel")]
    let iterator = (0..coordinate_count).into_par_iter();

    // Gathered in index order before failing, so the reported coordinate is the lowest
    // degenerate one regardless of scheduling.
    let steps: Vec<Result<f64, EngineError>> = iterator
        .map(|k| step_coordinate(configuration, potential, params, k / 3, Axis::ALL[k % 3]))
        .collect();
    let coordinates = steps.into_iter().collect::<Result<Vec<f64>, EngineError>>()?;

    Ok(coordinates
        .chunks_exact(3)
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect())
}

fn step_coordinate(
    configuration: &Configuration,
    potential: &PotentialKind,
    params: &DescentParameters,
    particle: usize,
    axis: Axis,
) -> Result<f64, EngineError> {
    let derivative = central_difference(configuration, potential, particle, axis, params.step_size);
    if derivative.is_nan() {
        return Err(EngineError::NumericDegeneracy {
            iteration: 0,
            particle,
            axis,
        });
    }

    let clamped = derivative.clamp(-params.gradient_limit, params.gradient_limit);
    if clamped != derivative {
        trace!(particle, %axis, derivative, "Clamped finite-difference derivative.");
    }
    Ok(configuration[particle][axis.index()] - params.learning_rate * clamped)
}
