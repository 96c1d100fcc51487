//! # Core Module
//!
//! Stateless building blocks for cluster minimization.
//!
//! - **Geometry** ([`utils`]) - Vector differences and lengths on `nalgebra` types
//! - **Particle Representation** ([`models`]) - The ordered particle `Configuration`
//! - **Energy Calculations** ([`forcefield`]) - Lennard-Jones and Morse pair terms and the
//!   pairwise total-energy evaluator
//! - **File I/O** ([`io`]) - Restricted XYZ coordinate files and CSV progress traces

pub mod forcefield;
pub mod io;
pub mod models;
pub mod utils;
