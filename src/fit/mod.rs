//! Robust curve fitting.
//!
//! Responsibilities:
//!
//! - fit the Breit–Wigner curve and bound its parameters (`fitter`)
//! - drop points far from the fitted curve (`outliers`)
//! - alternate the two until the dataset stops shrinking (`fit_loop`)
//! - sample χ² around the optimum for plotting (`contour`)

pub mod contour;
pub mod fit_loop;
pub mod fitter;
pub mod outliers;

pub use contour::*;
pub use fit_loop::*;
pub use fitter::*;
pub use outliers::*;
