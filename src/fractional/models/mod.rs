//! models — the Lyapunov engine, its result types, and reference systems.
//!
//! Purpose
//! -------
//! Sit on top of `fractional::core` and wire kernels, memory sums, the
//! trajectory arena and the renormalizer into a complete run.
//!
//! Key behaviors
//! -------------
//! - [`FractionalLyapunov`] drives the time loop and the GSR checkpoints and
//!   returns a [`LyapunovOutcome`].
//! - [`ExponentSeries`] records the running exponent estimates.
//! - [`ProgressObserver`] receives a [`CheckpointReport`] per checkpoint;
//!   [`SlogProgress`] logs them, [`NoProgress`] ignores them.
//! - [`DuffingOscillator`] and [`LinearSystem`] implement
//!   [`FractionalSystem`](crate::fractional::core::FractionalSystem).
//!
//! Conventions
//! -----------
//! - Errors are reported as [`FOResult`](crate::fractional::errors::FOResult);
//!   panics indicate logic bugs, not bad input.

pub mod duffing;
pub mod engine;
pub mod linear;
pub mod progress;
pub mod recorder;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::duffing::DuffingOscillator;
pub use self::engine::{FractionalLyapunov, LyapunovOutcome};
pub use self::linear::LinearSystem;
pub use self::progress::{CheckpointReport, NoProgress, ProgressObserver, SlogProgress};
pub use self::recorder::ExponentSeries;

pub mod prelude {
    pub use super::duffing::DuffingOscillator;
    pub use super::engine::{FractionalLyapunov, LyapunovOutcome};
    pub use super::linear::LinearSystem;
    pub use super::progress::{NoProgress, ProgressObserver, SlogProgress};
}
