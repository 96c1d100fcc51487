//! # Force Field Module
//!
//! Pair potentials and the total-energy evaluator for particle clusters.
//!
//! ## Overview
//!
//! Two pair potentials are supported, both in reduced units:
//!
//! - **Lennard-Jones 12-6**: `4·(d⁻¹² − d⁻⁶)`
//! - **Morse**: `(1 − e^(d − r_e/σ))²` with a per-run reference ratio `r_e/σ`
//!
//! ## Key Components
//!
//! - [`params`] - The closed [`params::PotentialKind`] choice and name parsing
//! - [`potentials`] - Scalar pair-energy functions
//! - [`scoring`] - Pairwise summation over a [`Configuration`](crate::core::models::configuration::Configuration)
//!
//! ```ignore
//! use pesmin::core::forcefield::{params::PotentialKind, scoring::evaluate};
//!
//! let energy = evaluate(&configuration, &PotentialKind::LennardJones);
//! ```

pub mod params;
pub mod potentials;
pub mod scoring;
