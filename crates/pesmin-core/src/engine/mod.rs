//! # Engine Module
//!
//! The stateful machinery of a minimization run.
//!
//! ## Overview
//!
//! A run repeatedly applies a descent step to the particle configuration and, every few
//! steps, measures how far the particles moved. The engine provides the pieces that the
//! workflow driver composes:
//!
//! - **Configuration** ([`config`]) - Step size, learning rate, derivative limit, convergence
//!   threshold, check interval and iteration cap
//! - **State Tracking** ([`state`]) - `RunState` and the `RunStatus` state machine
//! - **Descent Step** ([`tasks::gradient`]) - Finite-difference gradient estimation and the
//!   clamped position update
//! - **Convergence** ([`tasks::convergence`]) - Aggregate displacement and the threshold test
//! - **Initial Geometry** ([`utils::sampling`]) - Random placement on the unit sphere
//! - **Progress Monitoring** ([`progress`]) and **Cancellation** ([`cancel`])
//! - **Error Handling** ([`error`])

pub mod cancel;
pub mod config;
pub mod error;
pub mod progress;
pub mod state;
pub mod tasks;
pub mod utils;
