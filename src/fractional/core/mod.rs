//! core — numerical primitives of the Grünwald–Letnikov Lyapunov stack.
//!
//! Purpose
//! -------
//! Collect the building blocks the integration engine composes: validated
//! fractional orders, memory kernels, the memory evaluator, run options, the
//! trajectory arena, the renormalizer, and the system interface.
//!
//! Key behaviors
//! -------------
//! - Generate and share G-L kernels per distinct order ([`gl_coefficients`],
//!   [`KernelBank`]).
//! - Evaluate memory sums over strided histories ([`memory_term`],
//!   [`MemoryWindow`]).
//! - Validate the step grid and numerical choices ([`LyapunovOptions`],
//!   [`StepGrid`], [`RenormMethod`]).
//! - Store state and tangent paths append-only ([`Trajectory`]).
//! - Orthonormalize tangent bases ([`renormalize`], [`Renormalized`]).
//! - Abstract the governing equations ([`FractionalSystem`],
//!   [`StepContext`], [`ClosureSystem`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Every kernel has exactly `n_steps` coefficients, so memory sums never
//!   read past its end.
//! - Histories are read only below the step being computed.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; step `0` is the initial condition and step `t` sits
//!   at time `t·h`.
//! - This module performs no I/O and no logging.

pub mod finite_diff;
pub mod kernel;
pub mod memory;
pub mod options;
pub mod order;
pub mod renorm;
pub mod system;
pub mod trajectory;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::finite_diff::{ClosureSystem, fd_jacobian};
pub use self::kernel::{KernelBank, gl_coefficients};
pub use self::memory::{MemoryWindow, memory_term};
pub use self::options::{LyapunovOptions, RenormMethod, StepGrid};
pub use self::order::FractionalOrder;
pub use self::renorm::{Renormalized, renormalize};
pub use self::system::{FractionalSystem, StepContext};
pub use self::trajectory::Trajectory;

pub mod prelude {
    pub use super::finite_diff::ClosureSystem;
    pub use super::memory::MemoryWindow;
    pub use super::options::{LyapunovOptions, RenormMethod};
    pub use super::order::FractionalOrder;
    pub use super::system::{FractionalSystem, StepContext};
    pub use super::trajectory::Trajectory;
}
