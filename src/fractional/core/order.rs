//! Fractional orders — validated per-dimension derivative orders `q`.
//!
//! Purpose
//! -------
//! Provide a small, validated container for the Grünwald–Letnikov derivative
//! order attached to each state dimension (and to the matching row of the
//! tangent matrix).
//!
//! Key behaviors
//! -------------
//! - Construct [`FractionalOrder`] values that are finite and lie in `[0, 1]`.
//! - Precompute `h^q` once per run via [`FractionalOrder::step_scale`].
//! - Build whole order vectors with dimension-tagged errors through
//!   [`FractionalOrder::from_slice`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `0.0 <= q <= 1.0` and `q` is finite.
//! - `q = 1` recovers the integer-order (forward Euler) update.
//! - `q = 0` is the degenerate driving-row case: its kernel is identically
//!   zero and the update is a plain map `X[t] = rate`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover acceptance of the closed range, rejection of negative,
//!   super-unit and non-finite orders, and dimension tagging in
//!   `from_slice`.
use crate::fractional::errors::{FOError, FOResult};

/// FractionalOrder — validated Grünwald–Letnikov order `q ∈ [0, 1]`.
///
/// Invariants
/// ----------
/// - The wrapped value is finite and within `[0, 1]`.
///
/// Performance
/// -----------
/// - `Copy`; construction is O(1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractionalOrder(f64);

impl FractionalOrder {
    /// Validate and wrap a single order for dimension `dim`.
    ///
    /// Errors
    /// ------
    /// - `FOError::InvalidOrder`
    ///   Returned when `q` is NaN/±inf, negative, or greater than one.
    pub fn new(dim: usize, q: f64) -> FOResult<Self> {
        if !q.is_finite() {
            return Err(FOError::InvalidOrder {
                dim,
                value: q,
                reason: "Fractional orders must be finite.",
            });
        }
        if q < 0.0 {
            return Err(FOError::InvalidOrder {
                dim,
                value: q,
                reason: "Fractional orders must be non-negative.",
            });
        }
        if q > 1.0 {
            return Err(FOError::InvalidOrder {
                dim,
                value: q,
                reason: "Fractional orders must not exceed 1.",
            });
        }
        Ok(FractionalOrder(q))
    }

    /// Validate a full order vector, tagging errors with the dimension index.
    pub fn from_slice(orders: &[f64]) -> FOResult<Vec<Self>> {
        orders.iter().enumerate().map(|(dim, &q)| Self::new(dim, q)).collect()
    }

    /// The raw order `q`.
    pub fn value(self) -> f64 {
        self.0
    }

    /// `h^q`, the step factor multiplying the rate term.
    pub fn step_scale(self, h: f64) -> f64 {
        h.powf(self.0)
    }

    /// Whether this is the integer order `q = 1`.
    pub fn is_integer(self) -> bool {
        self.0 == 1.0
    }
}
