use pesmin::engine::config::ConvergenceCriterion;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidKeyValueFormat(String),

    #[error("Key cannot be empty in '{0}'.")]
    EmptyKey(String),

    #[error("Invalid {expected} value for '{key}': '{value}'")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("Unknown convergence criterion '{0}'. Expected 'total' or 'per-particle'.")]
    UnknownCriterion(String),
}

/// Splits `KEY=VALUE` at the first `=`. Both sides are trimmed.
pub fn parse_key_value(input: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| ParseError::InvalidKeyValueFormat(input.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::EmptyKey(input.to_string()));
    }
    Ok((key, value.trim()))
}

pub fn parse_value<T: FromStr>(
    key: &str,
    value: &str,
    expected: &'static str,
) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    })
}

pub fn parse_criterion(value: &str) -> Result<ConvergenceCriterion, ParseError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "total" => Ok(ConvergenceCriterion::Total),
        "per-particle" | "per_particle" | "perparticle" => Ok(ConvergenceCriterion::PerParticle),
        _ => Err(ParseError::UnknownCriterion(value.to_string())),
    }
}
