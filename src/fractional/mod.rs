//! fractional — Lyapunov spectra of fractional-order systems.
//!
//! Purpose
//! -------
//! Estimate the full Lyapunov exponent spectrum of a dynamical system whose
//! dimensions follow Grünwald–Letnikov fractional derivatives. The state and
//! its tangent (variational) matrix are integrated under the same long-memory
//! scheme, and the tangent basis is re-orthonormalized at a fixed interval
//! while the logarithms of the stretch factors are accumulated.
//!
//! Key behaviors
//! -------------
//! - [`core`] holds the numerical primitives: validated orders, G-L kernels,
//!   memory sums, the step grid, the trajectory arena, renormalization, and
//!   the [`FractionalSystem`] interface.
//! - [`models`] holds the engine ([`FractionalLyapunov`]), the exponent
//!   series, progress observers, and the Duffing and linear reference
//!   systems.
//! - [`errors`] defines [`FOError`] / [`FOResult`] for the whole stack.
//!
//! Invariants & assumptions
//! ------------------------
//! - Orders lie in `[0, 1]`; `q = 0` marks a driving dimension with no
//!   memory.
//! - `h_norm / h` is a positive integer `N`; checkpoints are the steps that
//!   are multiples of `N`.
//! - The cost of a run is `O(n²·D²)` with full memory; the work is
//!   single-threaded and deterministic.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based: step `0` is the initial condition, step `t` sits at
//!   time `t·h`, and the exponent estimate recorded at step `t` is
//!   `SUM / (t·h)`.
//! - The core performs no I/O. The engine logs through `slog`, silently by
//!   default.
//!
//! Downstream usage
//! ----------------
//! 1. Implement [`FractionalSystem`] (or wrap closures in
//!    [`ClosureSystem`]).
//! 2. Build [`LyapunovOptions`] from `(h, h_norm, t_end)`.
//! 3. Construct [`FractionalLyapunov`] with orders and an initial state,
//!    then `run()` or `run_with(&mut observer)`.
//! 4. Read [`LyapunovOutcome::exponents`] for the time series and
//!    [`LyapunovOutcome::final_exponents`] for the converged estimate.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; end-to-end spectra are checked in
//!   `tests/integration_lyapunov_pipeline.rs`.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    ClosureSystem, FractionalOrder, FractionalSystem, KernelBank, LyapunovOptions, MemoryWindow,
    RenormMethod, StepContext, StepGrid, Trajectory,
};

pub use self::errors::{FOError, FOResult};

pub use self::models::{
    CheckpointReport, DuffingOscillator, ExponentSeries, FractionalLyapunov, LinearSystem,
    LyapunovOutcome, NoProgress, ProgressObserver, SlogProgress,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use fractional_lyapunov::fractional::prelude::*;
//
// to import the everyday surface in a single line.

pub mod prelude {
    pub use super::{
        ClosureSystem, DuffingOscillator, ExponentSeries, FOError, FOResult, FractionalLyapunov,
        FractionalSystem, LinearSystem, LyapunovOptions, LyapunovOutcome, MemoryWindow,
        NoProgress, ProgressObserver, RenormMethod, SlogProgress, StepContext,
    };
}
