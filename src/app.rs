//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the real main:
//!
//! - parses CLI arguments
//! - runs the fit pipeline or the generator
//! - prints reports and plots
//! - asks about (and draws) the χ² map

use clap::Parser;

use crate::cli::{Command, ContourChoice, FitArgs, SimulateArgs};
use crate::data::{SampleConfig, generate_sample};
use crate::domain::{FitConfig, ParameterPair};
use crate::error::AppError;
use crate::fit::{ChiSquareGrid, DEFAULT_HALF_SPAN, chi_square_grid};

pub mod pipeline;

/// Entry point for the `rfit` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Simulate(args) => handle_simulate(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&args.files, &config)?;

    println!("{}", crate::report::format_run_summary(&run, &config));

    let residuals = crate::report::compute_residuals(&run.outcome.dataset, run.predicted())?;
    println!("{}", crate::report::format_residual_table(&residuals));
    println!("{}", crate::report::format_rejected(run.rejected()));

    if !args.no_plot {
        let plot = crate::plot::render_fit_plot(
            run.outcome.dataset.as_slice(),
            run.rejected(),
            run.outcome.fit.result.parameters,
            &config.physics,
            args.cols,
            args.rows,
        );
        println!("{plot}");
    }

    if wants_contour(args.contour)? {
        let grid = contour_for(&run, &config, args.resolution)?;
        println!(
            "{}",
            crate::plot::render_chi_square_map(&grid, run.outcome.fit.result.chi_square_min, args.cols, args.rows)
        );
    }

    Ok(())
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let config = sample_config_from_args(&args);
    let dataset = generate_sample(&config)?;
    crate::io::write_observations_csv(&args.out, &dataset)?;
    println!("Wrote {} observation(s) to {}", dataset.len(), args.out.display());
    Ok(())
}

fn wants_contour(choice: ContourChoice) -> Result<bool, AppError> {
    match choice {
        ContourChoice::Yes => Ok(true),
        ContourChoice::No => Ok(false),
        ContourChoice::Ask if crate::cli::prompt::stdin_is_interactive() => {
            crate::cli::prompt::confirm("Would you like to generate a chi-square contour map")
        }
        ContourChoice::Ask => {
            log::info!("stdin is not a terminal; skipping the chi-square map prompt");
            Ok(false)
        }
    }
}

/// χ² grid around the final fit, on the dataset it was made on.
pub fn contour_for(run: &pipeline::RunOutput, config: &FitConfig, resolution: usize) -> Result<ChiSquareGrid, AppError> {
    chi_square_grid(
        &run.outcome.dataset,
        run.outcome.fit.result.parameters,
        ParameterPair::new(DEFAULT_HALF_SPAN, DEFAULT_HALF_SPAN),
        resolution,
        &config.physics,
    )
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        median_level: args.median_level,
        initial: ParameterPair::new(args.mass, args.width),
        primary_tolerance: args.xtol,
        bound_tolerance: args.bound_xtol,
        outlier_sigma: args.outlier_sigma,
        max_refits: args.max_refits,
        ..FitConfig::default()
    }
}

pub fn sample_config_from_args(args: &SimulateArgs) -> SampleConfig {
    SampleConfig {
        count: args.count,
        seed: args.seed,
        truth: ParameterPair::new(args.mass, args.width),
        relative_noise: args.noise,
        outlier_prob: args.outlier_prob,
        outlier_k: args.outlier_k,
        ..SampleConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::error::ErrorKind;

    fn fit_args(argv: &[&str]) -> FitArgs {
        let mut full = vec!["rfit", "fit"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Fit(args) => args,
            Command::Simulate(_) => panic!("expected fit"),
        }
    }

    #[test]
    fn default_flags_give_default_config() {
        assert_eq!(fit_config_from_args(&fit_args(&[])), FitConfig::default());
    }

    #[test]
    fn flags_reach_the_config() {
        let config = fit_config_from_args(&fit_args(&["--median-level", "5", "--max-refits", "3", "--width", "2.5"]));
        assert_eq!(config.median_level, 5.0);
        assert_eq!(config.max_refits, 3);
        assert_eq!(config.initial, ParameterPair::new(90.0, 2.5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn bad_flags_fail_validation_with_exit_code_2() {
        let config = fit_config_from_args(&fit_args(&["--xtol", "0"]));
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn simulate_then_fit_end_to_end() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("rfit_app_{}.csv", std::process::id()));
        let args = match Cli::try_parse_from(["rfit", "simulate", "--out", path.to_str().unwrap(), "--seed", "3"])
            .unwrap()
            .command
        {
            Command::Simulate(args) => args,
            Command::Fit(_) => panic!("expected simulate"),
        };
        handle_simulate(args).unwrap();

        let config = FitConfig::default();
        let run = pipeline::run_fit(&[path.clone()], &config).unwrap();
        let _ = std::fs::remove_file(&path);

        let p = run.outcome.fit.result.parameters;
        assert!((p.mass - 91.1876).abs() < 0.1, "mass {}", p.mass);
        assert!((p.width - 2.4952).abs() < 0.2, "width {}", p.width);

        let grid = contour_for(&run, &config, 9).unwrap();
        assert_eq!(grid.values.len(), 9);
        // Odd resolution samples the fitted point itself at the center.
        assert!((grid.values[4][4] - run.outcome.fit.result.chi_square_min).abs() < 1e-6);
    }
}
