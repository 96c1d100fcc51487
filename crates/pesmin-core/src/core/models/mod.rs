//! # Core Models Module
//!
//! Value types describing the particle cluster being minimized.
//!
//! - [`configuration`] - The ordered particle positions and the `Axis` selector used to
//!   address a single coordinate
//!
//! ```ignore
//! use nalgebra::Point3;
//! use pesmin::core::models::configuration::{Axis, Configuration};
//!
//! let config = Configuration::new(vec![Point3::origin(), Point3::new(1.2, 0.0, 0.0)]);
//! let nudged = config.with_offset(1, Axis::X, 1e-5);
//! ```

pub mod configuration;
