//! # Workflows Module
//!
//! Top-level entry points that run a complete minimization.
//!
//! - **Minimization Workflow** ([`minimize`]) - Drives repeated descent steps with periodic
//!   convergence checks until the run converges, reaches its iteration cap, or is cancelled.

pub mod minimize;
