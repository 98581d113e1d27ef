//! Renormalizer — orthonormalization of the tangent basis (GSR).
//!
//! Purpose
//! -------
//! Orthonormalize the columns of a tangent matrix `J` and report the
//! stretching factor of each direction, so the engine can accumulate
//! `log(E)` and restart the next block from an orthonormal basis.
//!
//! Key behaviors
//! -------------
//! - [`gram_schmidt`] runs modified Gram–Schmidt on the columns of `J`.
//! - [`householder`] computes the same factorization through `nalgebra`'s
//!   Householder QR, then fixes signs.
//! - [`renormalize`] dispatches on [`RenormMethod`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Result satisfies `J = Q · R` with `Q` orthonormal, `R` upper triangular
//!   and `diag(R) = E > 0`.
//! - Sign/ordering convention: columns are processed left to right with no
//!   pivoting, and every stretch factor is positive. Column `k` of `Q` spans
//!   the same subspace as the first `k + 1` columns of `J` minus the first
//!   `k`. An already orthonormal `J` is returned unchanged with `E = 1`.
//! - A column whose residual norm falls to [`DEGENERACY_TOL`] times its
//!   original norm (or below `f64::MIN_POSITIVE`, or non-finite) is a fatal
//!   [`FOError::DegenerateColumn`]; the factor is never floored.
//!
//! Testing notes
//! -------------
//! - Unit tests cover idempotence on orthonormal inputs, agreement of the two
//!   methods, the `J = Q·diag(E)·…` reconstruction, and degeneracy errors.
use crate::fractional::{
    core::options::RenormMethod,
    errors::{FOError, FOResult},
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Relative residual norm below which a column is considered collapsed.
pub const DEGENERACY_TOL: f64 = 1e-12;

/// Orthonormal basis and per-direction stretch factors.
#[derive(Debug, Clone, PartialEq)]
pub struct Renormalized {
    /// Orthonormalized columns `Q`.
    pub basis: Array2<f64>,
    /// Stretch factors `E = diag(R)`, strictly positive.
    pub stretch: Array1<f64>,
}

/// Orthonormalize `j` with the selected method.
///
/// `step` only tags errors with the checkpoint index.
pub fn renormalize(
    j: ArrayView2<'_, f64>, method: RenormMethod, step: usize,
) -> FOResult<Renormalized> {
    match method {
        RenormMethod::GramSchmidt => gram_schmidt(j, step),
        RenormMethod::Householder => householder(j, step),
    }
}

/// Modified Gram–Schmidt on the columns of `j`.
///
/// Errors
/// ------
/// - `FOError::DegenerateColumn` for the first collapsed column.
pub fn gram_schmidt(j: ArrayView2<'_, f64>, step: usize) -> FOResult<Renormalized> {
    let d = j.ncols();
    let mut basis = j.to_owned();
    let mut stretch = Array1::<f64>::zeros(d);
    for col in 0..d {
        let (done, mut rest) = basis.view_mut().split_at(Axis(1), col);
        let mut v = rest.column_mut(0);
        for prev in 0..col {
            let q = done.column(prev);
            let proj = q.dot(&v);
            v.scaled_add(-proj, &q);
        }
        let norm = l2_norm(v.view());
        check_column(step, col, norm, l2_norm(j.column(col)))?;
        v.mapv_inplace(|x| x / norm);
        stretch[col] = norm;
    }
    Ok(Renormalized { basis, stretch })
}

/// Householder QR of `j` with a positive-diagonal sign fix.
///
/// Errors
/// ------
/// - `FOError::DegenerateColumn` for the first collapsed column.
pub fn householder(j: ArrayView2<'_, f64>, step: usize) -> FOResult<Renormalized> {
    let (rows, cols) = j.dim();
    let qr = DMatrix::from_fn(rows, cols, |r, c| j[[r, c]]).qr();
    let mut q = qr.q();
    let r = qr.r();
    let mut stretch = Array1::<f64>::zeros(cols);
    for col in 0..cols {
        let diag = r[(col, col)];
        if diag < 0.0 {
            q.column_mut(col).neg_mut();
        }
        let norm = diag.abs();
        check_column(step, col, norm, l2_norm(j.column(col)))?;
        stretch[col] = norm;
    }
    let basis = Array2::from_shape_fn((rows, cols), |(r, c)| q[(r, c)]);
    Ok(Renormalized { basis, stretch })
}

// ---- Helper Methods ----

fn l2_norm(v: ArrayView1<'_, f64>) -> f64 {
    v.dot(&v).sqrt()
}

fn check_column(step: usize, column: usize, norm: f64, reference: f64) -> FOResult<()> {
    if !norm.is_finite() || norm <= f64::MIN_POSITIVE || norm <= DEGENERACY_TOL * reference {
        return Err(FOError::DegenerateColumn { step, column, norm });
    }
    Ok(())
}
