use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::{CriterionArg, MinimizeArgs};
use crate::error::{CliError, Result};
use crate::utils::parser::{self, ParseError};
use pesmin::core::forcefield::params::PotentialKind;
use pesmin::engine::config::{ConvergenceCriterion, MinimizationConfigBuilder};

impl From<CriterionArg> for ConvergenceCriterion {
    fn from(arg: CriterionArg) -> Self {
        match arg {
            CriterionArg::Total => ConvergenceCriterion::Total,
            CriterionArg::PerParticle => ConvergenceCriterion::PerParticle,
        }
    }
}

impl From<ParseError> for CliError {
    fn from(e: ParseError) -> Self {
        CliError::Config(e.to_string())
    }
}

/// Merges command-line flags, `--set` overrides, the TOML file and built-in defaults, in
/// that order of precedence.
pub fn build_config(args: &MinimizeArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let system_file = file_config.system.take().unwrap_or_default();
    let particle_count = args.particles.or(system_file.particles).ok_or_else(|| {
        CliError::Config(
            "A particle count is required either in the config file (`system.particles`) or via --particles."
                .to_string(),
        )
    })?;

    let potential_file = file_config.potential.take().unwrap_or_default();
    let potential_name = args
        .potential
        .as_deref()
        .or(potential_file.name.as_deref())
        .ok_or_else(|| {
            CliError::Config(
                "A potential is required either in the config file (`potential.name`) or via --potential."
                    .to_string(),
            )
        })?;
    let re_over_sigma = args.re_over_sigma.or(potential_file.re_over_sigma);
    let potential = PotentialKind::from_name(potential_name, re_over_sigma)?;

    let descent_file = file_config.descent.take().unwrap_or_default();
    let step_size = args
        .step_size
        .or(descent_file.step_size)
        .unwrap_or(defaults.step_size);
    let learning_rate = args
        .learning_rate
        .or(descent_file.learning_rate)
        .unwrap_or(defaults.learning_rate);
    let gradient_limit = args
        .gradient_limit
        .or(descent_file.gradient_limit)
        .unwrap_or(defaults.gradient_limit);

    let convergence_file = file_config.convergence.take().unwrap_or_default();
    let threshold = args
        .threshold
        .or(convergence_file.threshold)
        .unwrap_or(defaults.threshold);
    let check_interval = args
        .check_interval
        .or(convergence_file.check_interval)
        .unwrap_or(defaults.check_interval);
    let criterion = args
        .criterion
        .map(Into::into)
        .or(convergence_file.criterion)
        .unwrap_or(defaults.criterion);
    let max_iterations = if args.unbounded {
        None
    } else if let Some(max) = args.max_iterations {
        Some(max)
    } else if convergence_file.unbounded.unwrap_or(false) {
        None
    } else {
        Some(
            convergence_file
                .max_iterations
                .unwrap_or(defaults.max_iterations),
        )
    };

    let seed = args.seed.or(file_config.seed);

    let output_file = file_config.output.take().unwrap_or_default();
    let trace_path = args.trace.clone().or(output_file.trace);

    let core_config = MinimizationConfigBuilder::new()
        .particle_count(particle_count)
        .potential(potential)
        .step_size(step_size)
        .learning_rate(learning_rate)
        .gradient_limit(gradient_limit)
        .threshold(threshold)
        .check_interval(check_interval)
        .criterion(criterion)
        .max_iterations(max_iterations)
        .seed(seed)
        .record_checkpoints(trace_path.is_some())
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let output_path = if args.no_output {
        None
    } else {
        Some(
            args.output
                .clone()
                .or(output_file.path)
                .unwrap_or_else(|| defaults.output_path(particle_count, &potential)),
        )
    };

    Ok(AppConfig {
        output_path,
        trace_path,
        core_config,
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value_str) = parser::parse_key_value(kv_pair)?;

        match key {
            "seed" => {
                config.seed = Some(parser::parse_value(key, value_str, "integer")?);
            }
            "system.particles" => {
                config.system.get_or_insert_with(Default::default).particles =
                    Some(parser::parse_value(key, value_str, "integer")?);
            }
            "potential.name" => {
                config.potential.get_or_insert_with(Default::default).name =
                    Some(value_str.to_string());
            }
            "potential.re-over-sigma" => {
                config
                    .potential
                    .get_or_insert_with(Default::default)
                    .re_over_sigma = Some(parser::parse_value(key, value_str, "float")?);
            }
            "descent.step-size" => {
                config.descent.get_or_insert_with(Default::default).step_size =
                    Some(parser::parse_value(key, value_str, "float")?);
            }
            "descent.learning-rate" => {
                config
                    .descent
                    .get_or_insert_with(Default::default)
                    .learning_rate = Some(parser::parse_value(key, value_str, "float")?);
            }
            "descent.gradient-limit" => {
                config
                    .descent
                    .get_or_insert_with(Default::default)
                    .gradient_limit = Some(parser::parse_value(key, value_str, "float")?);
            }
            "convergence.threshold" => {
                config
                    .convergence
                    .get_or_insert_with(Default::default)
                    .threshold = Some(parser::parse_value(key, value_str, "float")?);
            }
            "convergence.check-interval" => {
                config
                    .convergence
                    .get_or_insert_with(Default::default)
                    .check_interval = Some(parser::parse_value(key, value_str, "integer")?);
            }
            "convergence.criterion" => {
                config
                    .convergence
                    .get_or_insert_with(Default::default)
                    .criterion = Some(parser::parse_criterion(value_str)?);
            }
            "convergence.max-iterations" => {
                config
                    .convergence
                    .get_or_insert_with(Default::default)
                    .max_iterations = Some(parser::parse_value(key, value_str, "integer")?);
            }
            "convergence.unbounded" => {
                config
                    .convergence
                    .get_or_insert_with(Default::default)
                    .unbounded = Some(parser::parse_value(key, value_str, "boolean")?);
            }
            "output.path" => {
                config.output.get_or_insert_with(Default::default).path = Some(value_str.into());
            }
            "output.trace" => {
                config.output.get_or_insert_with(Default::default).trace = Some(value_str.into());
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
