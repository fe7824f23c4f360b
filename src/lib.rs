//! `resonance-fit` library crate.
//!
//! The binary (`rfit`) is a thin wrapper around this library so that the
//! fitting core is testable without spawning processes.
//!
//! Flow: `io` reads rows, `data` cleans and merges them, `fit` runs the
//! outlier-rejecting fit loop over `models` and `math`, `report` and `plot`
//! turn the result into text.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
