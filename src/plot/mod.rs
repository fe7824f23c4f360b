//! Terminal plots.

pub mod ascii;

pub use ascii::{render_chi_square_map, render_fit_plot};
