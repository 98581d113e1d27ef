//! Exponent Recorder — time-stamped Lyapunov exponent estimates.
//!
//! Purpose
//! -------
//! Hold the running exponent estimates `LE(T) = SUM / T` appended by the
//! renormalizer at each checkpoint and expose them read-only for reporting
//! and plotting.
//!
//! Key behaviors
//! -------------
//! - Store one D-vector per checkpoint with its simulated time, contiguous in
//!   a row-major buffer.
//! - Expose the final (converged) estimate, per-direction series, and a dense
//!   `(checkpoints × D)` matrix view.
//! - Derive summary quantities of the final spectrum: the exponent sum and
//!   the Kaplan–Yorke dimension.
//!
//! Invariants & assumptions
//! ------------------------
//! - `values.len() == times.len() * dim`.
//! - Times are strictly increasing; entries are appended by the engine only.
//!
//! Conventions
//! -----------
//! - Entry `k` was recorded at checkpoint `k + 1`, i.e. at step
//!   `(k + 1)·N`.
//! - Exponents are reported in the order of the tangent columns; they are not
//!   sorted.
use crate::fractional::errors::{FOError, FOResult};
use ndarray::{Array1, ArrayView1, ArrayView2};

/// ExponentSeries — running Lyapunov exponent estimates.
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentSeries {
    dim: usize,
    times: Vec<f64>,
    values: Vec<f64>,
}

impl ExponentSeries {
    /// Create an empty series for a `dim`-dimensional spectrum, reserving
    /// room for `capacity` checkpoints.
    pub fn with_capacity(dim: usize, capacity: usize) -> Self {
        ExponentSeries {
            dim,
            times: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity * dim),
        }
    }

    pub(crate) fn record(&mut self, time: f64, exponents: ArrayView1<'_, f64>) {
        debug_assert_eq!(exponents.len(), self.dim);
        self.times.push(time);
        self.values.extend(exponents.iter().copied());
    }

    /// Number of spectrum entries per checkpoint.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of recorded checkpoints.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Simulated times of the checkpoints.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Estimate recorded at checkpoint entry `k`.
    pub fn get(&self, k: usize) -> Option<ArrayView1<'_, f64>> {
        let start = k.checked_mul(self.dim)?;
        self.values.get(start..start + self.dim).map(ArrayView1::from)
    }

    /// Final (most recent) estimate.
    ///
    /// Errors
    /// ------
    /// - `FOError::EmptySeries` if no checkpoint has been recorded.
    pub fn last(&self) -> FOResult<ArrayView1<'_, f64>> {
        self.len().checked_sub(1).and_then(|k| self.get(k)).ok_or(FOError::EmptySeries)
    }

    /// Owned copy of the final estimate.
    pub fn final_estimate(&self) -> FOResult<Array1<f64>> {
        self.last().map(|v| v.to_owned())
    }

    /// Iterate `(time, exponents)` pairs in checkpoint order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, ArrayView1<'_, f64>)> + '_ {
        self.times
            .iter()
            .copied()
            .zip(self.values.chunks_exact(self.dim.max(1)).map(ArrayView1::from))
    }

    /// Dense `(checkpoints × D)` view of all estimates.
    pub fn as_matrix(&self) -> ArrayView2<'_, f64> {
        ArrayView2::from_shape((self.len(), self.dim), &self.values)
            .expect("series buffer always holds len × dim values")
    }

    /// Time series of exponent `i` across checkpoints.
    ///
    /// # Panics
    /// - If `i >= dim()`.
    pub fn direction(&self, i: usize) -> Array1<f64> {
        assert!(i < self.dim, "direction {i} out of range for a {}-dim spectrum", self.dim);
        self.as_matrix().column(i).to_owned()
    }

    /// Sum of the final exponents (phase-space contraction rate).
    pub fn exponent_sum(&self) -> FOResult<f64> {
        self.last().map(|v| v.sum())
    }

    /// Kaplan–Yorke dimension of the final spectrum.
    ///
    /// With exponents sorted in descending order and `k` the largest index
    /// whose partial sum `S_k = λ_1 + … + λ_k` is non-negative,
    /// `D_KY = k + S_k / |λ_{k+1}|`. Returns `0` when `λ_1 < 0` and `D` when
    /// the full sum is non-negative.
    pub fn kaplan_yorke_dimension(&self) -> FOResult<f64> {
        let mut sorted = self.last()?.to_vec();
        sorted.sort_by(|a, b| b.total_cmp(a));
        let mut partial = 0.0;
        for (k, &lambda) in sorted.iter().enumerate() {
            if partial + lambda < 0.0 {
                return Ok(k as f64 + partial / lambda.abs());
            }
            partial += lambda;
        }
        Ok(sorted.len() as f64)
    }
}
