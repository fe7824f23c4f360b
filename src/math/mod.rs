//! Mathematical utilities: the χ² objective and a simplex minimizer.

pub mod chi_square;
pub mod simplex;

pub use chi_square::*;
pub use simplex::*;
