//! Linear test system `x' = A·x` with a known spectrum.
//!
//! Purpose
//! -------
//! Provide a system whose Lyapunov exponents are known in closed form, for
//! regression and convergence checks of the engine.
//!
//! Key behaviors
//! -------------
//! - [`LinearSystem::analytic_spectrum`] returns the real parts of the
//!   eigenvalues of `A` (via `nalgebra`), sorted in descending order. These
//!   are the exponents of the continuous flow.
//! - [`LinearSystem::euler_spectrum`] returns `ln|1 + h·λ| / h`, the exact
//!   exponents of the forward-Euler map that the engine integrates when every
//!   order is 1.
//!
//! Invariants & assumptions
//! ------------------------
//! - `A` is square, non-empty, and finite.
//! - All dimensions read `X[t − 1]`; the Jacobian is `A` everywhere.
use crate::fractional::{
    core::system::{FractionalSystem, StepContext},
    errors::{FOError, FOResult},
};
use nalgebra::{Complex, DMatrix};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewMut2};

/// LinearSystem — constant-coefficient linear vector field.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    a: Array2<f64>,
}

impl LinearSystem {
    /// Errors
    /// ------
    /// - `FOError::DimensionMismatch` if `a` is empty or not square.
    /// - `FOError::InvalidModelParam` if `a` has a non-finite entry.
    pub fn new(a: Array2<f64>) -> FOResult<Self> {
        let (rows, cols) = a.dim();
        if rows == 0 {
            return Err(FOError::DimensionMismatch { what: "state dimension", expected: 1, actual: 0 });
        }
        if rows != cols {
            return Err(FOError::DimensionMismatch {
                what: "system matrix columns",
                expected: rows,
                actual: cols,
            });
        }
        if let Some(&value) = a.iter().find(|v| !v.is_finite()) {
            return Err(FOError::InvalidModelParam { name: "A", value, reason: "Must be finite." });
        }
        Ok(LinearSystem { a })
    }

    /// Diagonal system with the given decay/growth rates.
    pub fn diagonal(rates: &[f64]) -> FOResult<Self> {
        Self::new(Array2::from_diag(&Array1::from(rates.to_vec())))
    }

    pub fn matrix(&self) -> ArrayView2<'_, f64> {
        self.a.view()
    }

    /// Real parts of the eigenvalues of `A`, descending.
    pub fn analytic_spectrum(&self) -> Array1<f64> {
        sorted_desc(self.eigenvalues().iter().map(|l| l.re))
    }

    /// Exponents of the forward-Euler map `x ↦ (I + h·A)·x`, descending.
    pub fn euler_spectrum(&self, h: f64) -> Array1<f64> {
        sorted_desc(
            self.eigenvalues().iter().map(|l| Complex::new(1.0 + h * l.re, h * l.im).norm().ln() / h),
        )
    }

    fn eigenvalues(&self) -> Vec<Complex<f64>> {
        let d = self.a.nrows();
        DMatrix::from_fn(d, d, |r, c| self.a[[r, c]]).complex_eigenvalues().iter().copied().collect()
    }
}

fn sorted_desc(values: impl Iterator<Item = f64>) -> Array1<f64> {
    let mut v: Vec<f64> = values.collect();
    v.sort_by(|a, b| b.total_cmp(a));
    Array1::from(v)
}

impl FractionalSystem for LinearSystem {
    fn dim(&self) -> usize {
        self.a.nrows()
    }

    fn rate(&self, i: usize, ctx: &StepContext<'_>) -> f64 {
        self.a.row(i).dot(&ctx.prev)
    }

    fn jacobian(&self, _state: ArrayView1<'_, f64>, _time: f64, mut out: ArrayViewMut2<'_, f64>) {
        out.assign(&self.a);
    }

    fn tangent_rates(
        &self, _state: ArrayView1<'_, f64>, tangent: ArrayView2<'_, f64>, _time: f64,
        mut out: ArrayViewMut2<'_, f64>,
    ) {
        out.assign(&self.a.dot(&tangent));
    }
}
