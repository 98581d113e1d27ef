//! Governing equations — the pluggable vector field and its linearization.
//!
//! Purpose
//! -------
//! Define the capability the integration engine needs from a dynamical
//! system: one raw rate per state dimension and the rate of change of the
//! tangent matrix. Concrete systems (the reference Duffing oscillator, linear
//! test systems, closure-based systems) implement [`FractionalSystem`].
//!
//! Key behaviors
//! -------------
//! - [`FractionalSystem::rate`] is called once per dimension, in index order,
//!   with a [`StepContext`] exposing both the previous state and the partially
//!   updated current state. This lets a system reproduce a sequential
//!   intra-step dependency (dimension `i` reading `X[t]` of a dimension
//!   `< i`) while every other dimension reads `X[t − 1]`.
//! - [`FractionalSystem::tangent_rates`] returns `J(X[t − 1]) · F[t − 1]`; the
//!   default implementation builds it from [`FractionalSystem::jacobian`].
//! - [`FractionalSystem::constant_tangent_rate`] marks driving rows whose
//!   tangent rate is a fixed constant with no feedback.
//!
//! Invariants & assumptions
//! ------------------------
//! - `rate`, `jacobian`, and `tangent_rates` are pure: the same inputs yield
//!   the same outputs, and the Jacobian is the linearization of the field at
//!   the same evaluation point.
//! - Output buffers handed to `jacobian` / `tangent_rates` are `D×D`.
use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut2};

/// Inputs available to a rate evaluation at step `step`.
///
/// Fields
/// ------
/// - `step`: index `t` of the step being computed (`t ≥ 1`).
/// - `time`: simulated time of the previous step, `(t − 1)·h`; the forcing
///   phase for non-autonomous systems.
/// - `prev`: `X[t − 1]`.
/// - `current`: `X[t]` for dimensions already updated in this step (indices
///   `< i`), `X[t − 1]` for the rest.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub step: usize,
    pub time: f64,
    pub prev: ArrayView1<'a, f64>,
    pub current: ArrayView1<'a, f64>,
}

/// A fractional-order dynamical system with its variational equations.
pub trait FractionalSystem {
    /// State dimension `D`.
    fn dim(&self) -> usize;

    /// Raw rate of dimension `i` for the step described by `ctx`.
    fn rate(&self, i: usize, ctx: &StepContext<'_>) -> f64;

    /// Jacobian of the vector field at `state`, written into `out` (`D×D`).
    fn jacobian(&self, state: ArrayView1<'_, f64>, time: f64, out: ArrayViewMut2<'_, f64>);

    /// Rate of change of the tangent matrix, `J(state) · tangent`.
    fn tangent_rates(
        &self, state: ArrayView1<'_, f64>, tangent: ArrayView2<'_, f64>, time: f64,
        mut out: ArrayViewMut2<'_, f64>,
    ) {
        let d = self.dim();
        let mut jac = Array2::<f64>::zeros((d, d));
        self.jacobian(state, time, jac.view_mut());
        out.assign(&jac.dot(&tangent));
    }

    /// Fixed tangent rate for a driving row, if row `i` is one.
    ///
    /// When `Some(c)`, every entry of tangent row `i` uses rate `c`; with
    /// `c = 0` the row evolves by memory decay alone.
    fn constant_tangent_rate(&self, _i: usize) -> Option<f64> {
        None
    }
}

impl<S: FractionalSystem + ?Sized> FractionalSystem for &S {
    fn dim(&self) -> usize {
        (**self).dim()
    }

    fn rate(&self, i: usize, ctx: &StepContext<'_>) -> f64 {
        (**self).rate(i, ctx)
    }

    fn jacobian(&self, state: ArrayView1<'_, f64>, time: f64, out: ArrayViewMut2<'_, f64>) {
        (**self).jacobian(state, time, out)
    }

    fn tangent_rates(
        &self, state: ArrayView1<'_, f64>, tangent: ArrayView2<'_, f64>, time: f64,
        out: ArrayViewMut2<'_, f64>,
    ) {
        (**self).tangent_rates(state, tangent, time, out)
    }

    fn constant_tangent_rate(&self, i: usize) -> Option<f64> {
        (**self).constant_tangent_rate(i)
    }
}
