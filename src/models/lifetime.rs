//! Lifetime from decay width: `τ = ħ / Γ`.
//!
//! First-order propagation of the reciprocal gives a relative uncertainty equal
//! to that of the width.

use crate::domain::Lifetime;
use crate::error::AppError;

/// `ħ / width`, in seconds when `hbar` is in GeV·s and `width` in GeV.
pub fn lifetime(width: f64, hbar: f64) -> Result<f64, AppError> {
    if !width.is_finite() || width <= 0.0 {
        return Err(AppError::invalid_input(format!(
            "Cannot derive a lifetime from width {width} (must be finite and > 0)."
        )));
    }
    Ok(hbar / width)
}

/// Lifetime together with its propagated uncertainty.
pub fn lifetime_with_uncertainty(width: f64, width_uncertainty: f64, hbar: f64) -> Result<Lifetime, AppError> {
    let value = lifetime(width, hbar)?;
    let uncertainty = (value * (width_uncertainty / width)).abs();
    Ok(Lifetime { value, uncertainty })
}
