//! Validation helpers shared by options, systems, and the integration engine.
//!
//! Purpose
//! -------
//! Centralize the fail-fast checks of a fractional Lyapunov run so that each
//! condition is reported with the same [`FOError`] variant wherever it is
//! detected.
//!
//! Key behaviors
//! -------------
//! - Setup checks: step sizes, horizon, block ratio, initial state, and
//!   dimension agreement between collaborators.
//! - Runtime checks: finiteness of freshly written state rows and tangent
//!   matrices, tagged with the step index.
//!
//! Conventions
//! -----------
//! - Every helper returns [`FOResult`]; none of them panic.
//! - Runtime checks report the *first* offending entry in row-major order.
use crate::fractional::errors::{FOError, FOResult};
use ndarray::{ArrayView1, ArrayView2};

/// Relative tolerance used when deciding whether a float ratio is integral.
pub const INTEGRAL_RATIO_TOL: f64 = 1e-9;

/// Largest step grid a run may allocate. Full-memory cost is quadratic in
/// the step count, so grids beyond this are not integrable in practice.
pub const MAX_STEPS: usize = 100_000_000;

/// Validate the fine integration step `h`.
///
/// Errors
/// ------
/// - `FOError::InvalidStepSize` if `h` is NaN/±inf or ≤ 0.
pub fn validate_step_size(h: f64) -> FOResult<f64> {
    if !h.is_finite() || h <= 0.0 {
        return Err(FOError::InvalidStepSize { value: h });
    }
    Ok(h)
}

/// Validate the coarse renormalization interval `h_norm`.
pub fn validate_renorm_interval(h_norm: f64) -> FOResult<f64> {
    if !h_norm.is_finite() || h_norm <= 0.0 {
        return Err(FOError::InvalidRenormInterval { value: h_norm });
    }
    Ok(h_norm)
}

/// Validate the total simulated time `t_end`.
pub fn validate_horizon(t_end: f64) -> FOResult<f64> {
    if !t_end.is_finite() || t_end <= 0.0 {
        return Err(FOError::InvalidHorizon { value: t_end });
    }
    Ok(t_end)
}

/// Derive the renormalization block size `N = h_norm / h`.
///
/// Returns
/// -------
/// `FOResult<usize>`
///   - `Ok(N)` when the ratio is within [`INTEGRAL_RATIO_TOL`] (relative) of
///     an integer `N ≥ 1`.
///   - `Err(FOError::NonIntegerBlockRatio)` otherwise.
///
/// Notes
/// -----
/// - The tolerance only absorbs binary representation error such as
///   `0.01 / 0.001 = 10.000000000000002`; genuinely fractional ratios fail.
pub fn validate_block_ratio(h: f64, h_norm: f64) -> FOResult<usize> {
    let ratio = h_norm / h;
    let nearest = ratio.round();
    if nearest < 1.0 || (ratio - nearest).abs() > INTEGRAL_RATIO_TOL * nearest {
        return Err(FOError::NonIntegerBlockRatio { h, h_norm, ratio });
    }
    Ok(nearest as usize)
}

/// Number of whole steps of size `h` that fit into `t_end`.
///
/// Ratios within [`INTEGRAL_RATIO_TOL`] of an integer snap to it; otherwise
/// the count is floored.
///
/// Errors
/// ------
/// - `FOError::TooManySteps` if the count exceeds [`MAX_STEPS`]. The check
///   runs on the float ratio, before any integer conversion.
pub fn whole_steps(h: f64, t_end: f64) -> FOResult<usize> {
    let raw = t_end / h;
    let nearest = raw.round();
    let steps = if (raw - nearest).abs() <= INTEGRAL_RATIO_TOL * nearest.max(1.0) {
        nearest
    } else {
        raw.floor()
    };
    if !steps.is_finite() || steps > MAX_STEPS as f64 {
        return Err(FOError::TooManySteps { h, t_end, max: MAX_STEPS });
    }
    Ok(steps as usize)
}

/// Check that a collaborator reports the expected dimension.
///
/// Errors
/// ------
/// - `FOError::DimensionMismatch` tagged with `what`.
pub fn validate_dimension(what: &'static str, expected: usize, actual: usize) -> FOResult<()> {
    if expected != actual {
        return Err(FOError::DimensionMismatch { what, expected, actual });
    }
    Ok(())
}

/// Check that every initial-state entry is finite.
pub fn validate_initial_state(x0: ArrayView1<'_, f64>) -> FOResult<()> {
    match x0.iter().position(|v| !v.is_finite()) {
        Some(dim) => Err(FOError::NonFiniteInitialState { dim, value: x0[dim] }),
        None => Ok(()),
    }
}

/// Check a physical model parameter for finiteness and, optionally,
/// strict positivity.
pub fn validate_model_param(name: &'static str, value: f64, positive: bool) -> FOResult<f64> {
    if !value.is_finite() {
        return Err(FOError::InvalidModelParam { name, value, reason: "Must be finite." });
    }
    if positive && value <= 0.0 {
        return Err(FOError::InvalidModelParam { name, value, reason: "Must be strictly positive." });
    }
    Ok(value)
}

/// Check the freshly written state row of step `step`.
pub fn check_finite_state(step: usize, row: ArrayView1<'_, f64>) -> FOResult<()> {
    match row.iter().position(|v| !v.is_finite()) {
        Some(dim) => Err(FOError::NonFiniteState { step, dim, value: row[dim] }),
        None => Ok(()),
    }
}

/// Check the freshly written tangent matrix of step `step`.
pub fn check_finite_tangent(step: usize, tangent: ArrayView2<'_, f64>) -> FOResult<()> {
    match tangent.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, col), &value)) => Err(FOError::NonFiniteTangent { step, row, col, value }),
        None => Ok(()),
    }
}
