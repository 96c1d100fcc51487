//! # PESMIN Core Library
//!
//! Finds equilibrium geometries of small clusters of point particles by walking down a
//! pairwise potential energy surface with finite-difference gradient descent.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless value types (`Configuration`), the pair
//!   potentials and the total-energy evaluator, and coordinate file I/O.
//!
//! - **[`engine`]: The Logic Core.** The descent step (`nudge`), the convergence check, the
//!   run state machine, configuration, progress reporting and cancellation.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into a complete
//!   minimization run.

pub mod core;
pub mod engine;
pub mod workflows;
