//! Errors for fractional-order Lyapunov runs (configuration checks,
//! numerical-instability conditions, and result access).
//!
//! This module defines a single error type, [`FOError`], used across the
//! Rust core and the optional Python-facing API. It implements
//! `Display`/`Error` and converts to `PyErr` when the `python-bindings`
//! feature is enabled.
//!
//! ## Conventions
//! - **Step indices are 0-based**: step `0` is the initial condition and step
//!   `t` sits at time `t·h`.
//! - Configuration errors are raised before any integration starts; no
//!   partial run is produced.
//! - Numerical-instability errors abort the current run and always carry the
//!   offending step index together with the dimension, tangent entry, or
//!   column involved. Values are reported, never clamped.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Crate-wide result alias for fractional-order operations.
pub type FOResult<T> = Result<T, FOError>;

/// Unified error type for fractional-order Lyapunov estimation.
///
/// Covers configuration validation, numerical instability detected during
/// integration or renormalization, and read access to empty result series.
#[derive(Debug, Clone, PartialEq)]
pub enum FOError {
    // ---- Configuration ----
    /// Integration step `h` must be finite and > 0.
    InvalidStepSize { value: f64 },

    /// Renormalization interval `h_norm` must be finite and > 0.
    InvalidRenormInterval { value: f64 },

    /// `h_norm / h` must be a positive integer.
    NonIntegerBlockRatio { h: f64, h_norm: f64, ratio: f64 },

    /// Total simulated time must be finite and > 0.
    InvalidHorizon { value: f64 },

    /// `t_end / h` exceeds the largest step grid a run may allocate.
    TooManySteps { h: f64, t_end: f64, max: usize },

    /// The horizon does not cover a single renormalization checkpoint.
    NoCheckpoints { n_steps: usize, block: usize },

    /// Fractional order outside the admissible range or non-finite.
    InvalidOrder { dim: usize, value: f64, reason: &'static str },

    /// Two collaborators disagree on the state dimension.
    DimensionMismatch { what: &'static str, expected: usize, actual: usize },

    /// Initial state contains NaN/±inf.
    NonFiniteInitialState { dim: usize, value: f64 },

    /// Truncated memory window must keep at least one past value.
    InvalidMemoryWindow { steps: usize },

    /// A physical parameter of a model is invalid.
    InvalidModelParam { name: &'static str, value: f64, reason: &'static str },

    // ---- Numerical instability ----
    /// A state entry became NaN/±inf.
    NonFiniteState { step: usize, dim: usize, value: f64 },

    /// A tangent-matrix entry became NaN/±inf.
    NonFiniteTangent { step: usize, row: usize, col: usize, value: f64 },

    /// A tangent column collapsed during renormalization.
    DegenerateColumn { step: usize, column: usize, norm: f64 },

    // ---- Results ----
    /// No checkpoint has been recorded yet.
    EmptySeries,
}

impl std::error::Error for FOError {}

impl std::fmt::Display for FOError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            FOError::InvalidStepSize { value } => {
                write!(f, "Step size h must be finite and > 0; got: {value}")
            }
            FOError::InvalidRenormInterval { value } => {
                write!(f, "Renormalization interval h_norm must be finite and > 0; got: {value}")
            }
            FOError::NonIntegerBlockRatio { h, h_norm, ratio } => {
                write!(
                    f,
                    "h_norm / h must be a positive integer; got h_norm = {h_norm}, h = {h}, ratio = {ratio}"
                )
            }
            FOError::InvalidHorizon { value } => {
                write!(f, "Total simulated time t_end must be finite and > 0; got: {value}")
            }
            FOError::TooManySteps { h, t_end, max } => {
                write!(f, "t_end / h exceeds the limit of {max} steps; got t_end = {t_end}, h = {h}")
            }
            FOError::NoCheckpoints { n_steps, block } => {
                write!(
                    f,
                    "Horizon of {n_steps} steps does not reach the first renormalization checkpoint at step {block}."
                )
            }
            FOError::InvalidOrder { dim, value, reason } => {
                write!(f, "Fractional order of dimension {dim} is invalid: {value}. {reason}")
            }
            FOError::DimensionMismatch { what, expected, actual } => {
                write!(f, "Dimension mismatch in {what}: expected {expected}, got {actual}")
            }
            FOError::NonFiniteInitialState { dim, value } => {
                write!(f, "Initial state at dimension {dim} is non-finite: {value}")
            }
            FOError::InvalidMemoryWindow { steps } => {
                write!(f, "Truncated memory window must span at least one step; got: {steps}")
            }
            FOError::InvalidModelParam { name, value, reason } => {
                write!(f, "Model parameter {name} is invalid: {value}. {reason}")
            }
            // ---- Numerical instability ----
            FOError::NonFiniteState { step, dim, value } => {
                write!(f, "State at step {step}, dimension {dim} is non-finite: {value}")
            }
            FOError::NonFiniteTangent { step, row, col, value } => {
                write!(f, "Tangent entry ({row}, {col}) at step {step} is non-finite: {value}")
            }
            FOError::DegenerateColumn { step, column, norm } => {
                write!(
                    f,
                    "Tangent column {column} degenerated during renormalization at step {step}: norm = {norm}"
                )
            }
            // ---- Results ----
            FOError::EmptySeries => {
                write!(f, "No renormalization checkpoint has been recorded yet.")
            }
        }
    }
}

impl FOError {
    /// Whether the error stems from a numerical-instability condition
    /// detected mid-run rather than from invalid configuration.
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            FOError::NonFiniteState { .. }
                | FOError::NonFiniteTangent { .. }
                | FOError::DegenerateColumn { .. }
        )
    }
}

/// Convert an [`FOError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<FOError> for PyErr {
    fn from(err: FOError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
