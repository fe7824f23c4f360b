//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - measurements (`Observation`, `Dataset`)
//! - fit parameters and outputs (`ParameterPair`, `FitResult`, `UncertaintyBounds`, `ModelFit`)
//! - run configuration (`FitConfig`, `PhysicsConstants`)

pub mod types;

pub use types::*;
