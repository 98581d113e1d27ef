//! fractional_lyapunov — Lyapunov spectra of fractional-order dynamical
//! systems, with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the reference fractional Duffing run to Python. When the
//! `python-bindings` feature is enabled, this module defines the
//! Python-facing class and the `#[pymodule]` initializer.
//!
//! Key behaviors
//! -------------
//! - Re-export the numerical stack (`fractional`) as the public crate
//!   surface.
//! - Define the `FractionalDuffing` `#[pyclass]`, which builds a validated
//!   engine from keyword arguments, runs it, and exposes the exponent series
//!   and the trajectory as Python lists.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work happens in `fractional`; this file performs only FFI
//!   glue, input conversion, and error mapping.
//! - Errors from the Rust core are `FOError` values converted to `ValueError`
//!   at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code depends on [`fractional`] (or
//!   `fractional::prelude`) and ignores the items behind `python-bindings`.
//! - Python code imports `fractional_lyapunov.FractionalDuffing`.
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests in the inner modules and by
//!   `tests/integration_lyapunov_pipeline.rs`.

pub mod fractional;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    fractional::{
        errors::FOError,
        models::{
            DuffingOscillator, FractionalLyapunov, LyapunovOutcome, NoProgress, SlogProgress,
        },
    },
    utils::{build_options, extract_vector, rows_to_vecs},
};

/// FractionalDuffing — Python-facing Lyapunov run of the fractional Duffing
/// oscillator.
///
/// Purpose
/// -------
/// Configure, run, and inspect a Lyapunov spectrum estimate of the forced,
/// damped Duffing oscillator with state `(x, y, θ)` from Python.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `FractionalDuffing(orders, x0, h=1e-3, h_norm=1e-2, t_end=100.0, ...)`:
/// - `orders`: three fractional orders in `[0, 1]`.
/// - `x0`: initial state `(x, y, θ)`.
/// - `h`, `h_norm`, `t_end`: step grid; `h_norm / h` must be an integer.
/// - `delta`, `alpha`, `beta`, `gamma`, `omega`: Duffing parameters.
/// - `memory_steps`: optional truncated memory window.
/// - `householder`: use Householder QR instead of modified Gram–Schmidt.
///
/// Fields
/// ------
/// - `engine`: validated run configuration.
/// - `outcome`: result of the last `run()`, if any.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "fractional_lyapunov", unsendable)]
pub struct FractionalDuffing {
    engine: FractionalLyapunov<DuffingOscillator>,
    outcome: Option<LyapunovOutcome>,
}

#[cfg(feature = "python-bindings")]
impl FractionalDuffing {
    fn outcome(&self) -> PyResult<&LyapunovOutcome> {
        self.outcome.as_ref().ok_or_else(|| FOError::EmptySeries.into())
    }
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl FractionalDuffing {
    #[new]
    #[pyo3(
        signature = (
            orders,
            x0,
            h = 1e-3,
            h_norm = 1e-2,
            t_end = 100.0,
            delta = 0.25,
            alpha = -1.0,
            beta = 1.0,
            gamma = 0.3,
            omega = 1.0,
            memory_steps = None,
            householder = false,
        ),
        text_signature = "(orders, x0, /, h=1e-3, h_norm=1e-2, t_end=100.0, delta=0.25, \
                          alpha=-1.0, beta=1.0, gamma=0.3, omega=1.0, memory_steps=None, \
                          householder=False)"
    )]
    pub fn new<'py>(
        orders: &Bound<'py, PyAny>, x0: &Bound<'py, PyAny>, h: f64, h_norm: f64, t_end: f64,
        delta: f64, alpha: f64, beta: f64, gamma: f64, omega: f64, memory_steps: Option<usize>,
        householder: bool,
    ) -> PyResult<Self> {
        let orders = extract_vector(orders, "orders")?;
        let x0 = extract_vector(x0, "x0")?;
        let system = DuffingOscillator::new(delta, alpha, beta, gamma, omega)?;
        let options = build_options(h, h_norm, t_end, memory_steps, householder)?;
        let engine = FractionalLyapunov::new(system, &orders.to_vec(), x0.view(), options)?;
        Ok(FractionalDuffing { engine, outcome: None })
    }

    /// Integrate and renormalize; `verbose` logs checkpoints to the terminal
    /// every `log_every` checkpoints.
    #[pyo3(signature = (verbose = false, log_every = 10))]
    pub fn run(&mut self, verbose: bool, log_every: usize) -> PyResult<()> {
        let outcome = if verbose {
            self.engine.run_with(&mut SlogProgress::term_noblock().every(log_every))?
        } else {
            self.engine.run_with(&mut NoProgress)?
        };
        self.outcome = Some(outcome);
        Ok(())
    }

    /// Checkpoint times `t·h`.
    #[getter]
    pub fn times(&self) -> PyResult<Vec<f64>> {
        Ok(self.outcome()?.exponents.times().to_vec())
    }

    /// Exponent estimates, one row per checkpoint.
    #[getter]
    pub fn exponents(&self) -> PyResult<Vec<Vec<f64>>> {
        Ok(rows_to_vecs(self.outcome()?.exponents.as_matrix()))
    }

    #[getter]
    pub fn final_exponents(&self) -> PyResult<Vec<f64>> {
        Ok(self.outcome()?.final_exponents()?.to_vec())
    }

    #[getter]
    pub fn kaplan_yorke_dimension(&self) -> PyResult<f64> {
        Ok(self.outcome()?.exponents.kaplan_yorke_dimension()?)
    }

    /// State trajectory, one row `(x, y, θ)` per step.
    #[getter]
    pub fn trajectory(&self) -> PyResult<Vec<Vec<f64>>> {
        Ok(rows_to_vecs(self.outcome()?.trajectory.states()))
    }
}

/// fractional_lyapunov — PyO3 module initializer.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn fractional_lyapunov<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<FractionalDuffing>()?;
    Ok(())
}
