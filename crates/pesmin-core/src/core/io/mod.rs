//! Provides input/output for particle coordinates and run diagnostics.
//!
//! The restricted XYZ format is the persistence format for converged geometries; the trace
//! writer records convergence checks as CSV rows.

pub mod trace;
pub mod traits;
pub mod xyz;
