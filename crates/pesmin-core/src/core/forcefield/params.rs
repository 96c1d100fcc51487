use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum PotentialError {
    #[error("Unknown potential '{0}'. Expected 'LJ' or 'Morse'.")]
    UnknownPotential(String),
    #[error("The Morse potential requires a value for r_e/σ")]
    MissingMorseParameter,
    #[error("Invalid r_e/σ value for the Morse potential: {0}")]
    InvalidMorseParameter(f64),
}

/// The pair potential used for a whole minimization run.
///
/// The choice is closed: a run either uses reduced Lennard-Jones or the Morse form with a
/// fixed reference ratio `r_e/σ`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PotentialKind {
    #[serde(alias = "lj")]
    LennardJones,
    Morse {
        #[serde(rename = "re-over-sigma")]
        re_over_sigma: f64,
    },
}

impl PotentialKind {
    /// Resolves a potential from its user-facing name.
    ///
    /// Names are matched case-insensitively: `LJ` / `lennard-jones` and `Morse`. A Morse
    /// potential needs `re_over_sigma`; the parameter is ignored for Lennard-Jones.
    pub fn from_name(name: &str, re_over_sigma: Option<f64>) -> Result<Self, PotentialError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "lj" | "lennard-jones" | "lennardjones" => Ok(Self::LennardJones),
            "morse" => {
                let re_over_sigma = re_over_sigma.ok_or(PotentialError::MissingMorseParameter)?;
                Self::morse(re_over_sigma)
            }
            _ => Err(PotentialError::UnknownPotential(name.to_string())),
        }
    }

    pub fn morse(re_over_sigma: f64) -> Result<Self, PotentialError> {
        if !re_over_sigma.is_finite() {
            return Err(PotentialError::InvalidMorseParameter(re_over_sigma));
        }
        Ok(Self::Morse { re_over_sigma })
    }

    /// Short label used in output file names and file comments (`LJ` or `Morse`).
    pub fn label(&self) -> &'static str {
        match self {
            Self::LennardJones => "LJ",
            Self::Morse { .. } => "Morse",
        }
    }
}

impl fmt::Display for PotentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LennardJones => write!(f, "Lennard-Jones"),
            Self::Morse { re_over_sigma } => write!(f, "Morse (r_e/σ = {})", re_over_sigma),
        }
    }
}
