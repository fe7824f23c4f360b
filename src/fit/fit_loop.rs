//! Fit → filter → refit until no observation is rejected.
//!
//! Each pass fits the current dataset (warm-started from the previous pass's
//! parameters), predicts at every observed energy, and drops points more than
//! `outlier_sigma` away. The dataset only ever shrinks, so the loop ends after
//! at most `len(dataset)` passes; `max_refits` caps it regardless.

use crate::domain::{Dataset, FitConfig, FitResult, ModelFit, Observation};
use crate::error::{AppError, ErrorKind};
use crate::fit::fitter::fit_with;
use crate::fit::outliers::filter_outliers;
use crate::math::{Minimizer, NelderMead};
use crate::models::predict_all;

/// Summary of one fit/filter pass.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    pub iteration: usize,
    pub points_in: usize,
    pub rejected: usize,
    pub fit: FitResult,
}

/// Final state of the loop.
#[derive(Debug, Clone, PartialEq)]
pub struct FitLoopOutcome {
    pub fit: ModelFit,
    /// Dataset the final fit was made on.
    pub dataset: Dataset,
    /// Model prediction at each observation of `dataset`.
    pub predicted: Vec<f64>,
    /// Everything removed along the way, in rejection order.
    pub rejected: Vec<Observation>,
    pub iterations: usize,
    pub history: Vec<IterationRecord>,
    /// `true` if `max_refits` stopped the loop before it settled.
    pub hit_refit_cap: bool,
}

pub fn run_fit_loop(dataset: &Dataset, config: &FitConfig) -> Result<FitLoopOutcome, AppError> {
    let minimizer = NelderMead::new(config.function_tolerance, config.max_iterations);
    run_fit_loop_with(&minimizer, dataset, config)
}

pub fn run_fit_loop_with<M: Minimizer + ?Sized>(
    minimizer: &M,
    dataset: &Dataset,
    config: &FitConfig,
) -> Result<FitLoopOutcome, AppError> {
    config.validate()?;

    let mut current = dataset.clone();
    let mut start = config.initial;
    let mut rejected = Vec::new();
    let mut history = Vec::new();
    let mut iteration = 0usize;

    loop {
        iteration += 1;

        let fit = fit_with(minimizer, &current, start, config)?;
        let predicted = predict_all(&current.xs(), fit.result.parameters, &config.physics);
        let outcome = filter_outliers(&current, &predicted, config.outlier_sigma)?;

        log::debug!(
            "pass {iteration}: n={} chi2_min={:.4} rejected={}",
            current.len(),
            fit.result.chi_square_min,
            outcome.rejected.len()
        );
        history.push(IterationRecord {
            iteration,
            points_in: current.len(),
            rejected: outcome.rejected.len(),
            fit: fit.result,
        });

        let settled = !outcome.rejected_any;
        let capped = !settled && iteration >= config.max_refits;
        if settled || capped {
            if capped {
                log::warn!(
                    "stopped after {iteration} passes with {} points still flagged",
                    outcome.rejected.len()
                );
            }
            log::info!(
                "fit settled after {iteration} pass(es): {} of {} points kept",
                current.len(),
                dataset.len()
            );
            return Ok(FitLoopOutcome {
                fit,
                dataset: current,
                predicted,
                rejected,
                iterations: iteration,
                history,
                hit_refit_cap: capped,
            });
        }

        if outcome.reduced.is_empty() {
            return Err(AppError::new(
                ErrorKind::NoData,
                format!("Outlier filter rejected all {} remaining observations.", current.len()),
            ));
        }

        rejected.extend(outcome.rejected);
        start = fit.result.parameters;
        current = outcome.reduced;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ParameterPair, PhysicsConstants};
    use crate::models::predict;

    /// 21 points along a Z-like curve with ±2% deterministic scatter (σ = 4%).
    fn clean_scan() -> Vec<Observation> {
        let c = PhysicsConstants::default();
        let truth = ParameterPair::new(91.19, 2.5);
        (0..21)
            .map(|i| {
                let x = 86.0 + 0.5 * i as f64;
                let t = predict(x, truth, &c);
                Observation::new(x, t * (1.0 + 0.02 * (i as f64 * 1.7).sin()), 0.04 * t)
            })
            .collect()
    }

    fn scan_with_outlier() -> Dataset {
        let mut points = clean_scan();
        points.push(Observation::new(90.1, 5.0, 0.5));
        crate::data::combine_datasets(&[Dataset::new(points)])
    }

    #[test]
    fn rejects_outlier_then_settles() {
        let data = scan_with_outlier();
        let out = run_fit_loop(&data, &FitConfig::default()).unwrap();

        assert_eq!(out.iterations, 2);
        assert_eq!(out.history.len(), 2);
        assert_eq!(out.history[0].rejected, 1);
        assert_eq!(out.history[1].rejected, 0);
        assert_eq!(out.dataset.len(), data.len() - 1);
        assert_eq!(out.rejected, vec![Observation::new(90.1, 5.0, 0.5)]);
        assert!(!out.hit_refit_cap);

        let p = out.fit.result.parameters;
        assert!((p.mass - 91.19).abs() < 0.02, "mass {}", p.mass);
        assert!((p.width - 2.5).abs() < 0.05, "width {}", p.width);
        assert!(out.fit.bounds.mass_uncertainty >= 0.0);
        assert!(out.fit.bounds.width_uncertainty >= 0.0);
        assert_eq!(out.predicted.len(), out.dataset.len());
    }

    #[test]
    fn clean_data_settles_in_one_pass() {
        let data = Dataset::new(clean_scan());
        let out = run_fit_loop(&data, &FitConfig::default()).unwrap();
        assert_eq!(out.iterations, 1);
        assert_eq!(out.dataset, data);
        assert!(out.rejected.is_empty());
    }

    #[test]
    fn three_point_scan_is_absorbed_by_a_narrow_curve() {
        let data = Dataset::new(vec![
            Observation::new(88.0, 1.0, 0.5),
            Observation::new(90.0, 50.0, 0.5),
            Observation::new(91.0, 5.0, 0.5),
        ]);
        let out = run_fit_loop(&data, &FitConfig::default()).unwrap();

        // A free width narrows onto the 90 GeV spike, so nothing is 3σ off.
        assert_eq!(out.iterations, 1);
        assert_eq!(out.dataset, data);
        assert!(out.rejected.is_empty());
        assert!(!out.hit_refit_cap);

        let p = out.fit.result.parameters;
        assert!((p.mass - 90.21).abs() < 0.1, "mass {}", p.mass);
        assert!(p.width < 0.5, "width {}", p.width);
        assert!(out.fit.result.chi_square_min < 1.0);
    }

    #[test]
    fn pass_count_is_bounded_by_dataset_size() {
        let data = scan_with_outlier();
        let out = run_fit_loop(&data, &FitConfig::default()).unwrap();
        assert!(out.iterations <= data.len());
        // Each non-final pass removed at least one point.
        for w in out.history.windows(2) {
            assert!(w[1].points_in < w[0].points_in);
        }
    }

    #[test]
    fn refit_cap_stops_the_loop() {
        let config = FitConfig {
            max_refits: 1,
            ..FitConfig::default()
        };
        let data = scan_with_outlier();
        let out = run_fit_loop(&data, &config).unwrap();
        assert!(out.hit_refit_cap);
        assert_eq!(out.iterations, 1);
        assert_eq!(out.dataset.len(), data.len());
    }

    #[test]
    fn empty_dataset_is_an_error() {
        let err = run_fit_loop(&Dataset::empty(), &FitConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoData);
    }

    #[test]
    fn invalid_config_is_rejected_before_fitting() {
        let config = FitConfig {
            outlier_sigma: 0.0,
            ..FitConfig::default()
        };
        assert!(run_fit_loop(&Dataset::new(clean_scan()), &config).is_err());
    }
}
