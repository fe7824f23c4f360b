//! Synthetic resonance scans.
//!
//! Draws energies uniformly over a window, evaluates the Breit–Wigner curve at
//! the true parameters, and adds Gaussian noise proportional to the signal.
//! A small fraction of points receive a large jump so the outlier loop has
//! something to do.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Dataset, Observation, ParameterPair, PhysicsConstants};
use crate::error::AppError;
use crate::models::predict;

/// Smallest uncertainty handed out, so far-tail points never get σ = 0.
const SIGMA_FLOOR: f64 = 1e-4;

#[derive(Debug, Clone, PartialEq)]
pub struct SampleConfig {
    pub count: usize,
    pub seed: u64,
    pub truth: ParameterPair,
    pub energy_min: f64,
    pub energy_max: f64,
    /// Uncertainty as a fraction of the true cross-section.
    pub relative_noise: f64,
    /// Probability that a point is displaced by `outlier_k` sigmas.
    pub outlier_prob: f64,
    pub outlier_k: f64,
    pub physics: PhysicsConstants,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            count: 60,
            seed: 42,
            truth: ParameterPair::new(91.1876, 2.4952),
            energy_min: 86.0,
            energy_max: 96.0,
            relative_noise: 0.03,
            outlier_prob: 0.05,
            outlier_k: 8.0,
            physics: PhysicsConstants::default(),
        }
    }
}

impl SampleConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.count == 0 {
            return Err(AppError::invalid_input("Sample count must be > 0."));
        }
        if !(self.energy_min.is_finite() && self.energy_max.is_finite() && self.energy_max > self.energy_min) {
            return Err(AppError::invalid_input("Invalid energy window for sample generation."));
        }
        if !(self.truth.mass.is_finite() && self.truth.mass > 0.0 && self.truth.width.is_finite()) {
            return Err(AppError::invalid_input("True parameters must be finite with mass > 0."));
        }
        if !(self.relative_noise.is_finite() && self.relative_noise > 0.0) {
            return Err(AppError::invalid_input("Relative noise must be finite and > 0."));
        }
        if !(0.0..1.0).contains(&self.outlier_prob) {
            return Err(AppError::invalid_input("Outlier probability must be in [0, 1)."));
        }
        if !(self.outlier_k.is_finite() && self.outlier_k > 0.0) {
            return Err(AppError::invalid_input("Outlier jump must be finite and > 0."));
        }
        Ok(())
    }
}

/// Generate a synthetic scan, sorted by energy.
pub fn generate_sample(config: &SampleConfig) -> Result<Dataset, AppError> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::invalid_input(format!("Noise distribution error: {e}")))?;

    let mut points = Vec::with_capacity(config.count);
    let mut outliers = 0usize;
    for _ in 0..config.count {
        let x = rng.gen_range(config.energy_min..=config.energy_max);
        let truth = predict(x, config.truth, &config.physics);
        let sigma = (config.relative_noise * truth).max(SIGMA_FLOOR);

        let mut y = truth + sigma * normal.sample(&mut rng);
        if rng.gen_bool(config.outlier_prob) {
            let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            y += sign * config.outlier_k * sigma;
            outliers += 1;
        }
        points.push(Observation::new(x, y, sigma));
    }
    points.sort_by(|a, b| a.x.total_cmp(&b.x));

    log::info!(
        "generated {} points ({} displaced) around mass={}, width={}",
        points.len(),
        outliers,
        config.truth.mass,
        config.truth.width
    );
    Ok(Dataset::new(points))
}
