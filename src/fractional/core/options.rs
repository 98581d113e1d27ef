//! Run options — step grid, renormalization schedule, and numerical choices.
//!
//! Purpose
//! -------
//! Collect every configuration knob of a fractional Lyapunov run in one
//! validated value so that the integration engine can assume a consistent
//! step grid.
//!
//! Key behaviors
//! -------------
//! - [`LyapunovOptions::new`] validates `h`, `h_norm`, `t_end`, and derives
//!   a [`StepGrid`] (`n_steps`, renormalization block `N = h_norm / h`).
//! - Builder-style modifiers select the memory window
//!   ([`MemoryWindow`]) and the orthonormalization method
//!   ([`RenormMethod`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - `h`, `h_norm`, `t_end` are finite and strictly positive.
//! - `N` is an integer ≥ 1 and `n_steps ≥ N`, so at least one checkpoint is
//!   recorded.
//!
//! Conventions
//! -----------
//! - Step `t` sits at time `t·h`; step `0` is the initial condition.
//! - Checkpoints are the steps `t > 0` with `t % N == 0`.
use crate::fractional::{
    core::{
        memory::MemoryWindow,
        validation::{
            validate_block_ratio, validate_horizon, validate_renorm_interval, validate_step_size,
            whole_steps,
        },
    },
    errors::{FOError, FOResult},
};

/// Orthonormalization used at each renormalization checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenormMethod {
    /// Modified Gram–Schmidt on the tangent columns.
    #[default]
    GramSchmidt,
    /// Householder QR (`nalgebra`) with a positive-diagonal sign fix.
    Householder,
}

/// StepGrid — discrete time axis of a run.
///
/// Fields
/// ------
/// - `n_steps`: `usize`
///   Number of integration steps after the initial condition.
/// - `block`: `usize`
///   Renormalization block size `N = h_norm / h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepGrid {
    pub n_steps: usize,
    pub block: usize,
}

impl StepGrid {
    /// Number of renormalization checkpoints on the grid.
    pub fn n_checkpoints(&self) -> usize {
        self.n_steps / self.block
    }

    /// Whether step `t` triggers a renormalization.
    pub fn is_checkpoint(&self, t: usize) -> bool {
        t > 0 && t % self.block == 0
    }
}

/// LyapunovOptions — validated configuration for one run.
///
/// Purpose
/// -------
/// Bundle the integration step, the renormalization interval, the horizon,
/// and the numerical choices that the engine needs.
///
/// Fields
/// ------
/// - `h`: `f64`
///   Fine integration step.
/// - `h_norm`: `f64`
///   Coarse renormalization interval, an integer multiple of `h`.
/// - `t_end`: `f64`
///   Requested simulated time; the grid covers `floor(t_end / h)` steps.
/// - `grid`: [`StepGrid`]
///   Derived step count and block size.
/// - `memory`: [`MemoryWindow`]
///   Full (default) or truncated history.
/// - `renorm`: [`RenormMethod`]
///   Modified Gram–Schmidt (default) or Householder.
///
/// Invariants
/// ----------
/// - See the module docs; enforced by [`LyapunovOptions::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LyapunovOptions {
    pub h: f64,
    pub h_norm: f64,
    pub t_end: f64,
    pub grid: StepGrid,
    pub memory: MemoryWindow,
    pub renorm: RenormMethod,
}

impl LyapunovOptions {
    /// Validate the time axis and derive the step grid.
    ///
    /// Errors
    /// ------
    /// - `FOError::InvalidStepSize` / `InvalidRenormInterval` /
    ///   `InvalidHorizon` for non-finite or non-positive inputs.
    /// - `FOError::NonIntegerBlockRatio` if `h_norm / h` is not an integer.
    /// - `FOError::TooManySteps` if `t_end / h` exceeds the step-grid limit.
    /// - `FOError::NoCheckpoints` if `t_end` ends before the first
    ///   checkpoint.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use fractional_lyapunov::fractional::core::options::LyapunovOptions;
    /// let opts = LyapunovOptions::new(1e-3, 1e-2, 1.0).unwrap();
    /// assert_eq!(opts.grid.block, 10);
    /// assert_eq!(opts.grid.n_checkpoints(), 100);
    /// ```
    pub fn new(h: f64, h_norm: f64, t_end: f64) -> FOResult<Self> {
        let h = validate_step_size(h)?;
        let h_norm = validate_renorm_interval(h_norm)?;
        let t_end = validate_horizon(t_end)?;
        let block = validate_block_ratio(h, h_norm)?;
        let n_steps = whole_steps(h, t_end)?;
        if n_steps < block {
            return Err(FOError::NoCheckpoints { n_steps, block });
        }
        Ok(LyapunovOptions {
            h,
            h_norm,
            t_end,
            grid: StepGrid { n_steps, block },
            memory: MemoryWindow::Full,
            renorm: RenormMethod::GramSchmidt,
        })
    }

    /// Select the memory window.
    ///
    /// Errors
    /// ------
    /// - `FOError::InvalidMemoryWindow` for a zero-length truncated window.
    pub fn with_memory(mut self, memory: MemoryWindow) -> FOResult<Self> {
        self.memory = memory.validate()?;
        Ok(self)
    }

    /// Select the orthonormalization method.
    pub fn with_renorm(mut self, renorm: RenormMethod) -> Self {
        self.renorm = renorm;
        self
    }

    /// Simulated time of step `t`.
    pub fn time_at(&self, t: usize) -> f64 {
        t as f64 * self.h
    }
}
