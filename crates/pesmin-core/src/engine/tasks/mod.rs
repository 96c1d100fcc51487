pub mod convergence;
pub mod gradient;
