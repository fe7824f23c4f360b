//! Command-line parsing for the resonance fitter.
//!
//! Argument parsing and interactive prompts live here; the fitting code never
//! sees clap types.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub mod prompt;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "rfit", version, about = "Robust Breit-Wigner resonance fit with outlier rejection")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit measurement files, print the result, plot, and optionally map χ².
    Fit(FitArgs),
    /// Write a synthetic measurement file.
    Simulate(SimulateArgs),
}

/// Whether to evaluate and draw the χ² map after fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContourChoice {
    /// Ask on stdin (only when stdin is a terminal; otherwise skip).
    Ask,
    Yes,
    No,
}

/// Options for `rfit fit`.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Measurement CSV files (energy, cross-section, uncertainty; one header line).
    #[arg(
        short = 'f',
        long = "file",
        value_name = "CSV",
        num_args = 1..,
        default_values = ["z_boson_data_1.csv", "z_boson_data_2.csv"]
    )]
    pub files: Vec<PathBuf>,

    /// Drop rows whose cross-section exceeds this multiple of the file median.
    #[arg(long, default_value_t = 10.0)]
    pub median_level: f64,

    /// Starting mass (GeV/c^2).
    #[arg(long, default_value_t = 90.0)]
    pub mass: f64,

    /// Starting width (GeV).
    #[arg(long, default_value_t = 3.0)]
    pub width: f64,

    /// Simplex size tolerance of the best-fit minimization.
    #[arg(long, default_value_t = 1e-3)]
    pub xtol: f64,

    /// Simplex size tolerance of the uncertainty search.
    #[arg(long, default_value_t = 1e-4)]
    pub bound_xtol: f64,

    /// Outlier threshold in units of each point's uncertainty.
    #[arg(long, default_value_t = crate::fit::OUTLIER_SIGMA)]
    pub outlier_sigma: f64,

    /// Cap on fit/reject passes.
    #[arg(long, default_value_t = 100)]
    pub max_refits: usize,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub cols: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 24)]
    pub rows: usize,

    /// Evaluate and draw the χ² map around the minimum.
    #[arg(long, value_enum, default_value_t = ContourChoice::Ask)]
    pub contour: ContourChoice,

    /// Samples per axis of the χ² map.
    #[arg(long, default_value_t = crate::fit::DEFAULT_RESOLUTION)]
    pub resolution: usize,
}

/// Options for `rfit simulate`.
#[derive(Debug, Parser, Clone)]
pub struct SimulateArgs {
    /// Output CSV path.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub out: PathBuf,

    /// Number of points.
    #[arg(short = 'n', long, default_value_t = 60)]
    pub count: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// True mass (GeV/c^2).
    #[arg(long, default_value_t = 91.1876)]
    pub mass: f64,

    /// True width (GeV).
    #[arg(long, default_value_t = 2.4952)]
    pub width: f64,

    /// Uncertainty as a fraction of the true cross-section.
    #[arg(long, default_value_t = 0.03)]
    pub noise: f64,

    /// Probability that a point is displaced.
    #[arg(long, default_value_t = 0.05)]
    pub outlier_prob: f64,

    /// Displacement of outliers, in sigmas.
    #[arg(long, default_value_t = 8.0)]
    pub outlier_k: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_defaults_to_the_two_data_files() {
        let cli = Cli::try_parse_from(["rfit", "fit"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(
            args.files,
            vec![PathBuf::from("z_boson_data_1.csv"), PathBuf::from("z_boson_data_2.csv")]
        );
        assert_eq!(args.contour, ContourChoice::Ask);
        assert_eq!(args.max_refits, 100);
        assert_eq!(args.outlier_sigma, crate::fit::OUTLIER_SIGMA);
        assert_eq!(args.resolution, crate::fit::DEFAULT_RESOLUTION);
    }

    #[test]
    fn fit_accepts_files_and_flags() {
        let cli = Cli::try_parse_from([
            "rfit", "fit", "-f", "a.csv", "b.csv", "--contour", "no", "--mass", "91", "--no-plot",
        ])
        .unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.files.len(), 2);
        assert_eq!(args.contour, ContourChoice::No);
        assert_eq!(args.mass, 91.0);
        assert!(args.no_plot);
    }

    #[test]
    fn simulate_requires_output() {
        assert!(Cli::try_parse_from(["rfit", "simulate"]).is_err());
        let cli = Cli::try_parse_from(["rfit", "simulate", "--out", "x.csv", "-n", "10"]).unwrap();
        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.count, 10);
        assert_eq!(args.seed, 42);
    }
}
