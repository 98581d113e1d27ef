//! Closure-backed systems with an optional finite-difference Jacobian.
//!
//! Purpose
//! -------
//! Let callers plug a governing equation in as a plain closure
//! `f(state, time) -> rates` without writing a [`FractionalSystem`] impl. The
//! Jacobian is either supplied analytically or approximated by central
//! differences through the `finitediff` crate.
//!
//! Key behaviors
//! -------------
//! - [`ClosureSystem::new`] probes the field once at the initial state and
//!   rejects outputs whose length differs from the state dimension.
//! - [`ClosureSystem::with_jacobian`] installs an analytic Jacobian after the
//!   same kind of shape probe.
//! - [`fd_jacobian`] approximates `∂f_r/∂x_c` one output row at a time.
//! - A closure whose output shape drifts after construction yields NaN rates or
//!   a NaN Jacobian, which the engine reports as `NonFiniteState` /
//!   `NonFiniteTangent` at the offending step. Nothing panics.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every dimension reads `X[t − 1]`; closure systems carry no intra-step
//!   dependency.
//! - The field is evaluated once per step and cached by step index and input
//!   state, so the D per-dimension `rate` calls of a step share one closure
//!   call.
//!
//! Notes
//! -----
//! - Central differences cost `2·D²` field evaluations per step. Prefer an
//!   analytic Jacobian on long runs.
use crate::fractional::{
    core::{
        system::{FractionalSystem, StepContext},
        validation::validate_dimension,
    },
    errors::FOResult,
};
use finitediff::FiniteDiff;
use ndarray::{Array1, Array2, ArrayView1, ArrayViewMut2};
use std::cell::RefCell;

/// Boxed vector field `f(state, time) -> rates`.
pub type FieldFn = Box<dyn Fn(ArrayView1<'_, f64>, f64) -> Array1<f64>>;

/// Boxed Jacobian `J(state, time) -> D×D`.
pub type JacobianFn = Box<dyn Fn(ArrayView1<'_, f64>, f64) -> Array2<f64>>;

/// ClosureSystem — a [`FractionalSystem`] built from closures.
///
/// Fields
/// ------
/// - `dim`: state dimension, fixed by the probe state.
/// - `field`: vector field closure.
/// - `jacobian`: analytic Jacobian, or `None` for central differences.
/// - `probe`: state used for shape validation.
/// - `cache`: last field evaluation, keyed by step and input state.
pub struct ClosureSystem {
    dim: usize,
    field: FieldFn,
    jacobian: Option<JacobianFn>,
    probe: Array1<f64>,
    cache: RefCell<Option<CachedField>>,
}

impl std::fmt::Debug for ClosureSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosureSystem")
            .field("dim", &self.dim)
            .field("analytic_jacobian", &self.jacobian.is_some())
            .finish()
    }
}

impl ClosureSystem {
    /// Wrap `field`, probing it at `probe` (normally the initial state).
    ///
    /// Errors
    /// ------
    /// - `FOError::DimensionMismatch` if `field(probe, 0)` does not return
    ///   `probe.len()` rates.
    pub fn new<F>(probe: ArrayView1<'_, f64>, field: F) -> FOResult<Self>
    where
        F: Fn(ArrayView1<'_, f64>, f64) -> Array1<f64> + 'static,
    {
        let dim = probe.len();
        validate_dimension("vector field output", dim, field(probe, 0.0).len())?;
        Ok(ClosureSystem {
            dim,
            field: Box::new(field),
            jacobian: None,
            probe: probe.to_owned(),
            cache: RefCell::new(None),
        })
    }

    /// Install an analytic Jacobian.
    ///
    /// Errors
    /// ------
    /// - `FOError::DimensionMismatch` if the Jacobian at the probe state is
    ///   not `D×D`.
    pub fn with_jacobian<J>(mut self, jacobian: J) -> FOResult<Self>
    where
        J: Fn(ArrayView1<'_, f64>, f64) -> Array2<f64> + 'static,
    {
        let (rows, cols) = jacobian(self.probe.view(), 0.0).dim();
        validate_dimension("Jacobian rows", self.dim, rows)?;
        validate_dimension("Jacobian columns", self.dim, cols)?;
        self.jacobian = Some(Box::new(jacobian));
        Ok(self)
    }

    /// Whether the Jacobian is approximated numerically.
    pub fn uses_finite_differences(&self) -> bool {
        self.jacobian.is_none()
    }

    fn cached_rate(&self, i: usize, ctx: &StepContext<'_>) -> f64 {
        let mut cache = self.cache.borrow_mut();
        let fresh = matches!(
            cache.as_ref(),
            Some(hit) if hit.step == ctx.step && hit.state == ctx.prev
        );
        if !fresh {
            *cache = Some(CachedField {
                step: ctx.step,
                state: ctx.prev.to_owned(),
                rates: (self.field)(ctx.prev, ctx.time),
            });
        }
        match cache.as_ref() {
            Some(hit) if hit.rates.len() == self.dim => hit.rates[i],
            _ => f64::NAN,
        }
    }
}

#[derive(Debug)]
struct CachedField {
    step: usize,
    state: Array1<f64>,
    rates: Array1<f64>,
}

impl FractionalSystem for ClosureSystem {
    fn dim(&self) -> usize {
        self.dim
    }

    fn rate(&self, i: usize, ctx: &StepContext<'_>) -> f64 {
        self.cached_rate(i, ctx)
    }

    fn jacobian(&self, state: ArrayView1<'_, f64>, time: f64, mut out: ArrayViewMut2<'_, f64>) {
        let jac = match &self.jacobian {
            Some(jac) => jac(state, time),
            None => fd_jacobian(&self.field, state, time),
        };
        if jac.dim() == (self.dim, self.dim) {
            out.assign(&jac);
        } else {
            out.fill(f64::NAN);
        }
    }
}

/// Central-difference Jacobian of `field` at `state`.
///
/// Row `r` holds the gradient of output `r`, i.e. `out[[r, c]] = ∂f_r/∂x_c`.
/// Outputs missing from a short field evaluation read as NaN.
pub fn fd_jacobian<F>(field: &F, state: ArrayView1<'_, f64>, time: f64) -> Array2<f64>
where
    F: Fn(ArrayView1<'_, f64>, f64) -> Array1<f64> + ?Sized,
{
    let d = state.len();
    let x: Vec<f64> = state.to_vec();
    let mut out = Array2::<f64>::zeros((d, d));
    for r in 0..d {
        let component = |p: &Vec<f64>| {
            field(ArrayView1::from(p.as_slice()), time).get(r).copied().unwrap_or(f64::NAN)
        };
        let grad = x.central_diff(&component);
        out.row_mut(r).assign(&ArrayView1::from(grad.as_slice()));
    }
    out
}
