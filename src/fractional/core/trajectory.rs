//! Trajectory arena — append-only storage for the state and tangent paths.
//!
//! Purpose
//! -------
//! Hold the full history that the Grünwald–Letnikov memory sums need: one
//! D-vector of state and one D×D tangent matrix per step, preallocated for the
//! whole run and addressed by step index.
//!
//! Key behaviors
//! -------------
//! - [`Trajectory::new`] writes step 0: the initial state and `F[0] = I`.
//! - [`Trajectory::push`] appends a completed step; earlier steps are never
//!   rewritten, with one exception: the renormalizer replaces the tangent
//!   matrix of the *latest* step by its orthonormalized basis through
//!   [`Trajectory::replace_latest_tangent`].
//! - History accessors return strided views across the time axis so the
//!   memory evaluator can read one state dimension or one tangent entry
//!   without copying.
//!
//! Invariants & assumptions
//! ------------------------
//! - `1 <= len <= capacity = n_steps + 1`.
//! - Rows `0..len` are finalized; rows `len..capacity` are zero-filled and
//!   never read by the memory sums (which stop at the current step).
//!
//! Conventions
//! -----------
//! - `state` has shape `(capacity, D)`; `tangent` has shape
//!   `(capacity, D, D)` with `tangent[[t, i, j]] = F_ij[t]`. Column `j` of
//!   `F[t]` is the image of the `j`-th initial perturbation direction.
use ndarray::{Array2, Array3, ArrayView1, ArrayView2, ArrayView3, Axis, s};

/// Trajectory — preallocated state and tangent histories.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    state: Array2<f64>,
    tangent: Array3<f64>,
    len: usize,
}

impl Trajectory {
    /// Allocate storage for `n_steps` steps after the initial condition and
    /// write step 0.
    ///
    /// The tangent matrix of step 0 is the identity regardless of the system.
    ///
    /// # Panics
    /// - If `n_steps + 1` overflows `usize`. Grids built by
    ///   [`LyapunovOptions`](crate::fractional::core::options::LyapunovOptions)
    ///   are bounded well below that.
    pub fn new(x0: ArrayView1<'_, f64>, n_steps: usize) -> Self {
        let dim = x0.len();
        let capacity = n_steps.checked_add(1).expect("step count overflows the trajectory arena");
        let mut state = Array2::<f64>::zeros((capacity, dim));
        let mut tangent = Array3::<f64>::zeros((capacity, dim, dim));
        state.row_mut(0).assign(&x0);
        tangent.index_axis_mut(Axis(0), 0).diag_mut().fill(1.0);
        Trajectory { state, tangent, len: 1 }
    }

    /// State dimension `D`.
    pub fn dim(&self) -> usize {
        self.state.ncols()
    }

    /// Number of finalized steps, including step 0.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: step 0 is written on construction.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total number of steps the arena can hold.
    pub fn capacity(&self) -> usize {
        self.state.nrows()
    }

    /// Index of the most recent finalized step.
    pub fn last_step(&self) -> usize {
        self.len - 1
    }

    /// State vector `X[t]`.
    ///
    /// # Panics
    /// - If `t >= len()`.
    pub fn state(&self, t: usize) -> ArrayView1<'_, f64> {
        assert!(t < self.len, "step {t} has not been integrated yet");
        self.state.row(t)
    }

    /// Tangent matrix `F[t]`.
    ///
    /// # Panics
    /// - If `t >= len()`.
    pub fn tangent(&self, t: usize) -> ArrayView2<'_, f64> {
        assert!(t < self.len, "step {t} has not been integrated yet");
        self.tangent.index_axis(Axis(0), t)
    }

    /// All finalized states, shape `(len, D)`.
    pub fn states(&self) -> ArrayView2<'_, f64> {
        self.state.slice(s![..self.len, ..])
    }

    /// All finalized tangent matrices, shape `(len, D, D)`.
    pub fn tangents(&self) -> ArrayView3<'_, f64> {
        self.tangent.slice(s![..self.len, .., ..])
    }

    /// History of state dimension `i` across the whole arena.
    pub fn state_history(&self, i: usize) -> ArrayView1<'_, f64> {
        self.state.column(i)
    }

    /// History of tangent entry `(i, j)` across the whole arena.
    pub fn tangent_history(&self, i: usize, j: usize) -> ArrayView1<'_, f64> {
        self.tangent.slice(s![.., i, j])
    }

    /// Append a completed step and return its index.
    ///
    /// # Panics
    /// - If the arena is full or the shapes do not match `D`.
    pub fn push(&mut self, x: ArrayView1<'_, f64>, f: ArrayView2<'_, f64>) -> usize {
        assert!(self.len < self.capacity(), "trajectory arena is full");
        let t = self.len;
        self.state.row_mut(t).assign(&x);
        self.tangent.index_axis_mut(Axis(0), t).assign(&f);
        self.len += 1;
        t
    }

    /// Replace the tangent matrix of the latest step (renormalization).
    pub fn replace_latest_tangent(&mut self, q: ArrayView2<'_, f64>) {
        let t = self.last_step();
        self.tangent.index_axis_mut(Axis(0), t).assign(&q);
    }

    /// Drop unused capacity, keeping the finalized steps only.
    pub fn shrink_to_len(&mut self) {
        if self.len < self.capacity() {
            self.state = self.state.slice(s![..self.len, ..]).to_owned();
            self.tangent = self.tangent.slice(s![..self.len, .., ..]).to_owned();
        }
    }
}
