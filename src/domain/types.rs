//! Shared domain types.
//!
//! These types are intentionally small, `Copy` where possible, and free of
//! I/O so they can be:
//!
//! - passed by value through the fit loop without aliasing concerns
//! - rebuilt (never mutated) on every outlier-filter pass
//! - handed to presentation code as plain numbers

use std::ops::Index;

/// One measurement: energy `x` (GeV), cross-section `y` (nb), and its
/// reported uncertainty `sigma` (nb).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub x: f64,
    pub y: f64,
    pub sigma: f64,
}

impl Observation {
    pub fn new(x: f64, y: f64, sigma: f64) -> Self {
        Self { x, y, sigma }
    }
}

/// An ordered sequence of observations.
///
/// A `Dataset` is a value: filtering and combining always build a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl Dataset {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn as_slice(&self) -> &[Observation] {
        &self.observations
    }

    pub fn xs(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.y).collect()
    }

    pub fn sigmas(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.sigma).collect()
    }

    /// `(min, max)` of the independent variable, if any observation exists.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        for o in &self.observations {
            min_x = min_x.min(o.x);
            max_x = max_x.max(o.x);
        }
        if min_x.is_finite() && max_x.is_finite() {
            Some((min_x, max_x))
        } else {
            None
        }
    }
}

impl Index<usize> for Dataset {
    type Output = Observation;

    fn index(&self, index: usize) -> &Observation {
        &self.observations[index]
    }
}

impl FromIterator<Observation> for Dataset {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

/// The two free parameters of the Breit–Wigner model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterPair {
    /// Resonance mass (GeV/c²).
    pub mass: f64,
    /// Total decay width Γ (GeV).
    pub width: f64,
}

impl ParameterPair {
    pub fn new(mass: f64, width: f64) -> Self {
        Self { mass, width }
    }

    /// Component-wise product, used to place the bound-search seeds.
    pub fn scaled(self, factors: ParameterPair) -> Self {
        Self {
            mass: self.mass * factors.mass,
            width: self.width * factors.width,
        }
    }

    pub fn is_finite(self) -> bool {
        self.mass.is_finite() && self.width.is_finite()
    }
}

/// Output of one primary minimization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitResult {
    pub chi_square_min: f64,
    pub parameters: ParameterPair,
}

/// Symmetrized 1-σ half-widths of the `χ²min + 1` contour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UncertaintyBounds {
    pub mass_uncertainty: f64,
    pub width_uncertainty: f64,
}

/// Whether each of the three minimizations in a fit met its tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Convergence {
    pub primary: bool,
    pub upper_bound: bool,
    pub lower_bound: bool,
}

impl Convergence {
    pub fn all(self) -> bool {
        self.primary && self.upper_bound && self.lower_bound
    }
}

/// Best fit plus its uncertainty estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelFit {
    pub result: FitResult,
    pub bounds: UncertaintyBounds,
    pub convergence: Convergence,
}

/// Lifetime derived from the fitted width, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    pub value: f64,
    pub uncertainty: f64,
}

/// Physical constants used by the model and the lifetime calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConstants {
    /// Partial width of the e⁺e⁻ channel Γee (GeV), held fixed in the fit.
    pub partial_width_ee: f64,
    /// Natural units → millibarn (mb·GeV²). Scaled by 10⁶ to report nb.
    pub conversion_coefficient: f64,
    /// Reduced Planck constant (GeV·s).
    pub hbar: f64,
}

impl Default for PhysicsConstants {
    fn default() -> Self {
        Self {
            partial_width_ee: 0.083_91,
            conversion_coefficient: 0.3894,
            hbar: 6.582_119_569e-25,
        }
    }
}

/// All tunables of a fit run.
///
/// Built once from CLI flags (or `Default`) and passed into the core, so that
/// runs with different thresholds can be tested in isolation.
#[derive(Debug, Clone, PartialEq)]
pub struct FitConfig {
    /// Rows whose response exceeds `median_level × median` are discarded.
    pub median_level: f64,
    /// Starting point of the first fit.
    pub initial: ParameterPair,
    /// Simplex size tolerance of the primary minimization.
    pub primary_tolerance: f64,
    /// Simplex size tolerance of the two bound searches.
    pub bound_tolerance: f64,
    /// Function-value spread tolerance shared by all minimizations.
    pub function_tolerance: f64,
    /// Iteration (and evaluation) budget per minimization.
    pub max_iterations: usize,
    /// Seed of the upper bound search, relative to the best fit.
    pub upper_seed_scale: ParameterPair,
    /// Seed of the lower bound search, relative to the best fit.
    pub lower_seed_scale: ParameterPair,
    /// Residual threshold of the outlier filter, in units of sigma.
    pub outlier_sigma: f64,
    /// Cap on fit/filter passes.
    pub max_refits: usize,
    pub physics: PhysicsConstants,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            median_level: 10.0,
            initial: ParameterPair::new(90.0, 3.0),
            primary_tolerance: 1e-3,
            bound_tolerance: 1e-4,
            function_tolerance: 1e-4,
            max_iterations: 400,
            upper_seed_scale: ParameterPair::new(1.3, 1.2),
            lower_seed_scale: ParameterPair::new(0.7, 0.8),
            outlier_sigma: crate::fit::OUTLIER_SIGMA,
            max_refits: 100,
            physics: PhysicsConstants::default(),
        }
    }
}

impl FitConfig {
    pub fn validate(&self) -> Result<(), crate::error::AppError> {
        use crate::error::AppError;

        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.median_level) {
            return Err(AppError::invalid_input(format!(
                "Median level must be finite and > 0 (got {}).",
                self.median_level
            )));
        }
        if !positive(self.initial.mass) || !self.initial.width.is_finite() || self.initial.width == 0.0 {
            return Err(AppError::invalid_input(format!(
                "Initial guesses must be finite with mass > 0 and width != 0 (got mass={}, width={}).",
                self.initial.mass, self.initial.width
            )));
        }
        if !positive(self.primary_tolerance) || !positive(self.bound_tolerance) || !positive(self.function_tolerance) {
            return Err(AppError::invalid_input("Minimizer tolerances must be finite and > 0."));
        }
        if self.max_iterations == 0 {
            return Err(AppError::invalid_input("Minimizer iteration budget must be > 0."));
        }
        if !self.upper_seed_scale.is_finite() || !self.lower_seed_scale.is_finite() {
            return Err(AppError::invalid_input("Bound-search seed scales must be finite."));
        }
        if !positive(self.outlier_sigma) {
            return Err(AppError::invalid_input("Outlier threshold must be finite and > 0."));
        }
        if self.max_refits == 0 {
            return Err(AppError::invalid_input("Refit cap must be > 0."));
        }
        Ok(())
    }
}
