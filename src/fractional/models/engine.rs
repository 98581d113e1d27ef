//! Trajectory Integrator — Grünwald–Letnikov time loop with periodic GSR.
//!
//! Purpose
//! -------
//! Advance the state vector and the D×D tangent matrix of a fractional-order
//! system step by step, renormalize the tangent basis every `N` steps, and
//! turn the accumulated log stretch factors into running Lyapunov exponent
//! estimates.
//!
//! Key behaviors
//! -------------
//! - [`FractionalLyapunov::new`] validates the orders, the initial state and
//!   the system dimension before anything is allocated.
//! - Each step computes `X_i[t] = rate_i · h^{q_i} − memory(X_i, c_{q_i}, t)`
//!   for every dimension in index order, then
//!   `F_ij[t] = R_ij · h^{q_i} − memory(F_ij, c_{q_i}, t)` with
//!   `R = J(X[t − 1]) · F[t − 1]` (or the constant rate of a driving row).
//! - At checkpoints (`t % N == 0`) the tangent matrix is orthonormalized in
//!   place, `SUM += ln(E)`, and `SUM / (t·h)` is appended to the exponent
//!   series before the progress observer is notified.
//! - Non-finite values and degenerate columns abort the run with the step
//!   index attached; they are logged at error level first.
//!
//! Invariants & assumptions
//! ------------------------
//! - Kernels, scales and orders are per dimension; tangent row `i` uses the
//!   order of dimension `i`.
//! - Memory sums read the trajectory strictly below the step being computed,
//!   including renormalized tangent matrices at earlier checkpoints.
//! - The run is single-threaded and deterministic.
//!
//! Downstream usage
//! ----------------
//! - Build a system ([`DuffingOscillator`](super::duffing::DuffingOscillator),
//!   [`LinearSystem`](super::linear::LinearSystem), or a
//!   [`ClosureSystem`](crate::fractional::core::ClosureSystem)), a
//!   [`LyapunovOptions`], then call [`FractionalLyapunov::run`] or
//!   [`FractionalLyapunov::run_with`] with a progress observer.
//!
//! Testing notes
//! -------------
//! - Unit tests below hand-check the update rule for `q = 1`, `q = 0.5` and
//!   `q = 0`, the intra-step ordering, driving rows, early stopping and error
//!   reporting. End-to-end spectra are checked in the integration tests.
use crate::fractional::{
    core::{
        kernel::KernelBank,
        memory::memory_term,
        options::LyapunovOptions,
        order::FractionalOrder,
        renorm::renormalize,
        system::{FractionalSystem, StepContext},
        trajectory::Trajectory,
        validation::{
            check_finite_state, check_finite_tangent, validate_dimension, validate_initial_state,
        },
    },
    errors::{FOError, FOResult},
    models::{
        progress::{CheckpointReport, NoProgress, ProgressObserver},
        recorder::ExponentSeries,
    },
};
use ndarray::{Array1, Array2, ArrayView1};
use slog::{Logger, debug, error, info, o};
use std::sync::Arc;

/// Result of a Lyapunov run.
///
/// Fields
/// ------
/// - `trajectory`: state and tangent paths; tangent matrices at checkpoints
///   hold the renormalized basis.
/// - `exponents`: running estimates, one entry per checkpoint.
/// - `log_sums`: cumulative `SUM = Σ ln(E)` at the last checkpoint.
/// - `completed`: `false` if the observer stopped the run early.
#[derive(Debug, Clone, PartialEq)]
pub struct LyapunovOutcome {
    pub trajectory: Trajectory,
    pub exponents: ExponentSeries,
    pub log_sums: Array1<f64>,
    pub completed: bool,
}

impl LyapunovOutcome {
    /// Final exponent estimate (last checkpoint).
    pub fn final_exponents(&self) -> FOResult<Array1<f64>> {
        self.exponents.final_estimate()
    }
}

/// FractionalLyapunov — integration engine for one system and configuration.
///
/// Purpose
/// -------
/// Own a validated run configuration (system, per-dimension orders, initial
/// state, options) and execute it. Runs do not mutate the engine, so the same
/// configuration can be executed repeatedly with identical results.
#[derive(Debug, Clone)]
pub struct FractionalLyapunov<S> {
    system: S,
    orders: Vec<FractionalOrder>,
    x0: Array1<f64>,
    options: LyapunovOptions,
    logger: Logger,
}

impl<S: FractionalSystem> FractionalLyapunov<S> {
    /// Validate a run configuration.
    ///
    /// Parameters
    /// ----------
    /// - `system`: governing equations and their linearization.
    /// - `orders`: one fractional order per state dimension, each in `[0, 1]`.
    /// - `x0`: initial state.
    /// - `options`: validated step grid and numerical choices.
    ///
    /// Errors
    /// ------
    /// - `FOError::DimensionMismatch` if the system has no dimensions or if
    ///   `orders` / `x0` disagree with `system.dim()`.
    /// - `FOError::InvalidOrder` for orders outside `[0, 1]`, or for order 0
    ///   on a driving row whose constant tangent rate is 0 (its tangent row
    ///   would vanish and collapse the basis at the first checkpoint).
    /// - `FOError::NonFiniteInitialState` for NaN/±inf in `x0`.
    pub fn new(
        system: S, orders: &[f64], x0: ArrayView1<'_, f64>, options: LyapunovOptions,
    ) -> FOResult<Self> {
        let dim = system.dim();
        if dim == 0 {
            return Err(FOError::DimensionMismatch {
                what: "state dimension",
                expected: 1,
                actual: 0,
            });
        }
        validate_dimension("fractional orders", dim, orders.len())?;
        validate_dimension("initial state", dim, x0.len())?;
        validate_initial_state(x0)?;
        let orders = FractionalOrder::from_slice(orders)?;
        check_driving_rows(&system, &orders)?;
        Ok(FractionalLyapunov {
            system,
            orders,
            x0: x0.to_owned(),
            options,
            logger: Logger::root(slog::Discard, o!()),
        })
    }

    /// Attach a logger for run diagnostics.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn system(&self) -> &S {
        &self.system
    }

    pub fn orders(&self) -> &[FractionalOrder] {
        &self.orders
    }

    pub fn initial_state(&self) -> ArrayView1<'_, f64> {
        self.x0.view()
    }

    pub fn options(&self) -> &LyapunovOptions {
        &self.options
    }

    /// Run to completion without progress reporting.
    pub fn run(&self) -> FOResult<LyapunovOutcome> {
        self.run_with(&mut NoProgress)
    }

    /// Run, notifying `observer` at every checkpoint.
    ///
    /// Returns
    /// -------
    /// The trajectory, the exponent series and the final log sums. If the
    /// observer breaks, the outcome covers the checkpoints reached so far and
    /// `completed` is `false`.
    ///
    /// Errors
    /// ------
    /// - `FOError::NonFiniteState` / `NonFiniteTangent` when a step produces
    ///   NaN/±inf.
    /// - `FOError::DegenerateColumn` when renormalization meets a collapsed
    ///   tangent column.
    pub fn run_with<P>(&self, observer: &mut P) -> FOResult<LyapunovOutcome>
    where
        P: ProgressObserver + ?Sized,
    {
        let dim = self.system.dim();
        let grid = self.options.grid;
        let mut bank = KernelBank::new(grid.n_steps);
        let kernels = bank.kernels_for(&self.orders);
        let scales: Vec<f64> = self.orders.iter().map(|q| q.step_scale(self.options.h)).collect();
        debug!(self.logger, "starting run";
            "dim" => dim,
            "n_steps" => grid.n_steps,
            "block" => grid.block,
            "checkpoints" => grid.n_checkpoints(),
            "distinct_orders" => bank.distinct()
        );

        let fail = |err: FOError| {
            error!(self.logger, "run aborted"; "error" => %err);
            err
        };

        let mut traj = Trajectory::new(self.x0.view(), grid.n_steps);
        let mut series = ExponentSeries::with_capacity(dim, grid.n_checkpoints());
        let mut sums = Array1::<f64>::zeros(dim);
        let mut bufs = StepBuffers::new(dim);
        let mut completed = true;

        for t in 1..=grid.n_steps {
            self.advance(t, &traj, &kernels, &scales, &mut bufs);
            check_finite_state(t, bufs.state.view()).map_err(fail)?;
            check_finite_tangent(t, bufs.tangent.view()).map_err(fail)?;
            traj.push(bufs.state.view(), bufs.tangent.view());

            if !grid.is_checkpoint(t) {
                continue;
            }
            let renorm = renormalize(traj.tangent(t), self.options.renorm, t).map_err(fail)?;
            traj.replace_latest_tangent(renorm.basis.view());
            sums += &renorm.stretch.mapv(f64::ln);
            let time = self.options.time_at(t);
            let estimate = &sums / time;
            series.record(time, estimate.view());

            let report = CheckpointReport {
                checkpoint: t / grid.block,
                total_checkpoints: grid.n_checkpoints(),
                step: t,
                time,
                percent: 100.0 * t as f64 / grid.n_steps as f64,
                exponents: estimate.view(),
            };
            if observer.on_checkpoint(&report).is_break() {
                info!(self.logger, "run stopped by observer"; "step" => t);
                completed = false;
                traj.shrink_to_len();
                break;
            }
        }

        debug!(self.logger, "run finished"; "checkpoints" => series.len(), "completed" => completed);
        Ok(LyapunovOutcome { trajectory: traj, exponents: series, log_sums: sums, completed })
    }

    // ---- Helper Methods ----

    /// Compute step `t` into `bufs` from the finalized steps `0..t`.
    fn advance(
        &self, t: usize, traj: &Trajectory, kernels: &[Arc<Array1<f64>>], scales: &[f64],
        bufs: &mut StepBuffers,
    ) {
        let dim = self.system.dim();
        let window = self.options.memory;
        let time = self.options.time_at(t - 1);

        bufs.state.assign(&traj.state(t - 1));
        for i in 0..dim {
            // `current` borrows the buffer being written; the context is rebuilt per dimension.
            let ctx =
                StepContext { step: t, time, prev: traj.state(t - 1), current: bufs.state.view() };
            let rate = self.system.rate(i, &ctx);
            let memory = memory_term(traj.state_history(i), kernels[i].view(), t, window);
            bufs.state[i] = rate * scales[i] - memory;
        }

        let prev = traj.state(t - 1);
        self.system.tangent_rates(prev, traj.tangent(t - 1), time, bufs.rates.view_mut());
        for i in 0..dim {
            if let Some(rate) = self.system.constant_tangent_rate(i) {
                bufs.rates.row_mut(i).fill(rate);
            }
            for j in 0..dim {
                let memory = memory_term(traj.tangent_history(i, j), kernels[i].view(), t, window);
                bufs.tangent[[i, j]] = bufs.rates[[i, j]] * scales[i] - memory;
            }
        }
    }
}

/// Reject order 0 on driving rows with a zero tangent rate.
///
/// Such a row has neither a rate nor a memory term, so `F` loses rank at
/// step 1 and every run would abort in renormalization.
fn check_driving_rows<S: FractionalSystem>(
    system: &S, orders: &[FractionalOrder],
) -> FOResult<()> {
    for (dim, order) in orders.iter().enumerate() {
        if order.value() == 0.0 && system.constant_tangent_rate(dim) == Some(0.0) {
            return Err(FOError::InvalidOrder {
                dim,
                value: 0.0,
                reason: "A driving row with a zero tangent rate needs an order > 0.",
            });
        }
    }
    Ok(())
}

/// Scratch space for one step.
#[derive(Debug)]
struct StepBuffers {
    state: Array1<f64>,
    rates: Array2<f64>,
    tangent: Array2<f64>,
}

impl StepBuffers {
    fn new(dim: usize) -> Self {
        StepBuffers {
            state: Array1::zeros(dim),
            rates: Array2::zeros((dim, dim)),
            tangent: Array2::zeros((dim, dim)),
        }
    }
}
