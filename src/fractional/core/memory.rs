//! Memory evaluator — the Grünwald–Letnikov history convolution.
//!
//! Implements the "memory term" that makes fractional dynamics non-local: the
//! value at step `t` depends on every earlier value of the same trajectory,
//! weighted by the order's kernel.
//!
//! ## Definition
//! For a history `H` and kernel `c` (with `kernel[j − 1] = c_j`):
//!
//! `memory(H, c, t) = Σ_{j=1..t} c_j · H[t − j]`
//!
//! i.e. the coefficient at offset `j` multiplies the value `j` steps in the
//! past. Only `H[0..t)` and `c_1..c_t` are read, so entries at or beyond step
//! `t` never influence the result.
//!
//! ## Cost
//! O(t) at step `t`, O(n²) over a run. [`MemoryWindow::Truncated`] bounds the
//! sum to the most recent `L` values (short-memory principle); it is an
//! explicit approximation and never the default.
//!
//! ## Zero-copy design
//! Works on `ndarray` views; strided views (e.g. a single tangent entry taken
//! across the time axis of a 3-D arena) are accepted as-is.
use crate::fractional::errors::{FOError, FOResult};
use ndarray::{ArrayView1, s};

/// How much of the history enters the memory sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemoryWindow {
    /// Exact Grünwald–Letnikov sum over the full history.
    #[default]
    Full,
    /// Only the most recent `steps` values (short-memory approximation).
    Truncated { steps: usize },
}

impl MemoryWindow {
    /// Reject a truncated window that keeps no history.
    pub fn validate(self) -> FOResult<Self> {
        match self {
            MemoryWindow::Truncated { steps: 0 } => {
                Err(FOError::InvalidMemoryWindow { steps: 0 })
            }
            other => Ok(other),
        }
    }

    /// Number of past values summed at step `t`.
    pub fn span(self, t: usize) -> usize {
        match self {
            MemoryWindow::Full => t,
            MemoryWindow::Truncated { steps } => t.min(steps),
        }
    }
}

/// Evaluate the memory term for step `t`.
///
/// # Inputs
/// - `history`: values `H[0..]` of one trajectory (state dimension or tangent
///   entry); only `H[t − span .. t)` is read.
/// - `kernel`: coefficients with `kernel[j − 1] = c_j`.
/// - `t`: the step being computed; `t = 0` yields `0.0`.
/// - `window`: full or truncated history.
///
/// # Panics
/// - If `t > history.len()` or the window span exceeds `kernel.len()`. The
///   engine sizes both from the same step grid, so this indicates a logic bug.
pub fn memory_term(
    history: ArrayView1<'_, f64>, kernel: ArrayView1<'_, f64>, t: usize, window: MemoryWindow,
) -> f64 {
    let span = window.span(t);
    kernel.slice(s![..span]).dot(&history.slice(s![t - span..t; -1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fractional::core::kernel::gl_coefficients;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, Array3, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Reverse-chronological pairing of kernel and history.
    // - Independence from values at or after the current step.
    // - Truncated windows and their validation.
    // - Strided histories taken from a 3-D arena.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check the pairing c_1·H[t−1] + c_2·H[t−2] + … by hand.
    //
    // Given
    // -----
    // - H = [1, 2, 3, 4], c = [10, 100, 1000, 10000], t = 3.
    //
    // Expect
    // ------
    // - 10·3 + 100·2 + 1000·1 = 1230.
    fn pairs_kernel_offsets_with_past_values() {
        let history = array![1.0, 2.0, 3.0, 4.0];
        let kernel = array![10.0, 100.0, 1000.0, 10000.0];

        let m = memory_term(history.view(), kernel.view(), 3, MemoryWindow::Full);

        assert_eq!(m, 1230.0);
    }

    #[test]
    fn first_step_has_no_memory() {
        let history = array![5.0];
        let kernel = array![-0.5];
        assert_eq!(memory_term(history.view(), kernel.view(), 0, MemoryWindow::Full), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Mutating H[t..] must not change the memory at step t (no lookahead).
    fn ignores_values_at_and_after_current_step() {
        let kernel = gl_coefficients(0.7, 10);
        let mut history = Array1::from_iter((0..10).map(|i| (i as f64).sin()));
        let t = 6;

        let before = memory_term(history.view(), kernel.view(), t, MemoryWindow::Full);
        for i in t..10 {
            history[i] = 1e9 * (i as f64 + 1.0);
        }
        let after = memory_term(history.view(), kernel.view(), t, MemoryWindow::Full);

        assert_eq!(before.to_bits(), after.to_bits());
    }

    #[test]
    // Purpose
    // -------
    // Integer order reproduces the forward-Euler memory −H[t−1].
    fn integer_order_memory_is_previous_value() {
        let kernel = gl_coefficients(1.0, 5);
        let history = array![0.3, -1.2, 2.5, 7.0, 0.0];
        let m = memory_term(history.view(), kernel.view(), 4, MemoryWindow::Full);
        assert_abs_diff_eq!(m, -7.0, epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // A truncated window keeps only the most recent `steps` terms.
    fn truncated_window_drops_old_history() {
        let history = array![1.0, 2.0, 3.0, 4.0];
        let kernel = array![10.0, 100.0, 1000.0, 10000.0];

        let m = memory_term(
            history.view(),
            kernel.view(),
            4,
            MemoryWindow::Truncated { steps: 2 },
        );

        assert_eq!(m, 10.0 * 4.0 + 100.0 * 3.0);
        assert_eq!(MemoryWindow::Truncated { steps: 2 }.span(1), 1);
    }

    #[test]
    fn empty_truncated_window_is_rejected() {
        assert_eq!(
            MemoryWindow::Truncated { steps: 0 }.validate(),
            Err(FOError::InvalidMemoryWindow { steps: 0 })
        );
        assert!(MemoryWindow::Full.validate().is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Strided views over the time axis of a (time × D × D) arena give the
    // same result as a contiguous copy.
    fn strided_history_matches_contiguous_copy() {
        let kernel = gl_coefficients(0.6, 8);
        let arena = Array3::from_shape_fn((8, 2, 2), |(t, i, j)| (t + 3 * i + 5 * j) as f64);
        let strided = arena.slice(s![.., 1, 0]);
        let contiguous = strided.to_owned();

        let a = memory_term(strided, kernel.view(), 7, MemoryWindow::Full);
        let b = memory_term(contiguous.view(), kernel.view(), 7, MemoryWindow::Full);

        assert_abs_diff_eq!(a, b, epsilon = 1e-12);
    }
}
