//! Integration tests for fractional-order Lyapunov spectra.
//!
//! Purpose
//! -------
//! - Validate the end-to-end pipeline: options → system → engine run →
//!   exponent series, against spectra that are known in closed form.
//! - Exercise the reference Duffing system and closure-based systems through
//!   the public API only.
//!
//! Coverage
//! --------
//! - `fractional::models::engine`: full runs for linear systems of order 1
//!   (regression against analytic and forward-Euler spectra), fractional
//!   runs, early stopping through a logger-backed observer.
//! - `fractional::core::renorm`: agreement of Gram–Schmidt and Householder
//!   renormalization over a whole run.
//! - `fractional::core::finite_diff`: closure systems with numerical
//!   Jacobians reproduce the analytic-Jacobian run.
//! - `fractional::models::duffing`: smoke runs, the phase-space
//!   contraction rate of the integer-order limit, and setup rejection of an
//!   order-0 phase row.
//!
//! Exclusions
//! ----------
//! - Kernel, memory, and renormalization edge cases, which are unit-tested
//!   next to their modules.
//! - Python bindings.
use approx::assert_abs_diff_eq;
use fractional_lyapunov::fractional::{
    CheckpointReport, ClosureSystem, DuffingOscillator, FOError, FractionalLyapunov, LinearSystem,
    LyapunovOptions, ProgressObserver, RenormMethod, SlogProgress,
};
use ndarray::{Array1, Array2, ArrayView1, array};
use slog::{Logger, o};
use std::ops::ControlFlow;

/// Purpose
/// -------
/// Symmetric 2×2 system with eigenvalues −1 and −3 (eigenvectors
/// `(1, 1)/√2` and `(1, −1)/√2`), so that the initial basis is not aligned
/// with the eigenbasis and GSR has real work to do.
fn coupled_system() -> LinearSystem {
    LinearSystem::new(array![[-2.0, 1.0], [1.0, -2.0]]).unwrap()
}

fn assert_all_finite(values: ArrayView1<'_, f64>) {
    assert!(values.iter().all(|v| v.is_finite()), "non-finite entry in {values}");
}

#[test]
// Purpose
// -------
// Regression scenario: h = 1e-3, h_norm = 1e-2 (N = 10), 100 checkpoints,
// dissipative linear system with analytically known exponents.
//
// Given
// -----
// - A = diag(−0.5, −1, −2, −3), all orders 1, x0 = (1, 1, 1, 1).
//
// Expect
// ------
// - 100 checkpoints at times 0.01, 0.02, …, 1.0.
// - Final LE within 1e-2 of (−0.5, −1, −2, −3).
// - Final LE equal to the forward-Euler spectrum ln(1 + hλ)/h to 1e-9.
fn linear_dissipative_spectrum_matches_analytic_values() {
    let system = LinearSystem::diagonal(&[-0.5, -1.0, -2.0, -3.0]).unwrap();
    let analytic = system.analytic_spectrum();
    let euler = system.euler_spectrum(1e-3);
    let opts = LyapunovOptions::new(1e-3, 1e-2, 1.0).unwrap();
    let engine =
        FractionalLyapunov::new(system, &[1.0; 4], Array1::ones(4).view(), opts).unwrap();

    let out = engine.run().unwrap();

    assert!(out.completed);
    assert_eq!(out.exponents.len(), 100);
    assert_abs_diff_eq!(out.exponents.times()[0], 0.01, epsilon = 1e-12);
    assert_abs_diff_eq!(*out.exponents.times().last().unwrap(), 1.0, epsilon = 1e-12);
    let last = out.final_exponents().unwrap();
    for i in 0..4 {
        assert_abs_diff_eq!(last[i], analytic[i], epsilon = 1e-2);
        assert_abs_diff_eq!(last[i], euler[i], epsilon = 1e-9);
    }
    assert_eq!(out.trajectory.len(), 1001);
    assert_eq!(out.trajectory.tangent(0), Array2::<f64>::eye(4));
}

#[test]
// Purpose
// -------
// Convergence of the leading exponent for a non-diagonal dissipative system.
//
// Given
// -----
// - A = [[−2, 1], [1, −2]], orders 1, h = 1e-2, h_norm = 0.1, t_end = 40.
//
// Expect
// ------
// - Every leading estimate is negative.
// - The final leading estimate is within 0.05 of −1 and closer to it than
//   the first checkpoint's estimate.
// - The exponent sum equals ln|det(I + hA)| / h at the final checkpoint.
fn coupled_system_leading_exponent_converges() {
    let h = 1e-2;
    let opts = LyapunovOptions::new(h, 0.1, 40.0).unwrap();
    let engine =
        FractionalLyapunov::new(coupled_system(), &[1.0, 1.0], array![1.0, 0.5].view(), opts)
            .unwrap();

    let out = engine.run().unwrap();

    let leading = out.exponents.direction(0);
    assert_eq!(leading.len(), 400);
    assert!(leading.iter().all(|&le| le < 0.0));
    let first_err = (leading[0] + 1.0).abs();
    let last_err = (leading[leading.len() - 1] + 1.0).abs();
    assert!(last_err < 0.05, "leading exponent {} too far from −1", leading[leading.len() - 1]);
    assert!(last_err < first_err);

    let det_rate = ((1.0 - 2.0 * h).powi(2) - h * h).ln() / h;
    assert_abs_diff_eq!(out.exponents.exponent_sum().unwrap(), det_rate, epsilon = 1e-8);
    let second = out.final_exponents().unwrap()[1];
    assert!(second < leading[leading.len() - 1]);
}

#[test]
// Purpose
// -------
// Rotation-dilation dynamics stretch every direction by the same factor, so
// both exponents match the forward-Euler value at every checkpoint, for
// either renormalization method.
fn rotation_block_gives_degenerate_spectrum() {
    let system = LinearSystem::new(array![[-1.0, 2.0], [-2.0, -1.0]]).unwrap();
    let euler = system.euler_spectrum(1e-2);
    for method in [RenormMethod::GramSchmidt, RenormMethod::Householder] {
        let opts = LyapunovOptions::new(1e-2, 0.1, 1.0).unwrap().with_renorm(method);
        let engine =
            FractionalLyapunov::new(system.clone(), &[1.0, 1.0], array![0.3, -0.2].view(), opts)
                .unwrap();

        let out = engine.run().unwrap();

        assert_eq!(out.exponents.len(), 10);
        for (_, le) in out.exponents.iter() {
            assert_abs_diff_eq!(le[0], euler[0], epsilon = 1e-9);
            assert_abs_diff_eq!(le[1], euler[1], epsilon = 1e-9);
        }
        assert_abs_diff_eq!(out.final_exponents().unwrap()[0], -1.0, epsilon = 2e-2);
    }
}

#[test]
// Purpose
// -------
// Both renormalization methods follow the same sign convention, so full
// fractional runs agree.
fn gram_schmidt_and_householder_runs_agree() {
    let opts = LyapunovOptions::new(1e-2, 0.05, 2.0).unwrap();
    let run = |method| {
        FractionalLyapunov::new(
            coupled_system(),
            &[0.9, 0.8],
            array![1.0, -0.5].view(),
            opts.with_renorm(method),
        )
        .unwrap()
        .run()
        .unwrap()
    };

    let mgs = run(RenormMethod::GramSchmidt);
    let hh = run(RenormMethod::Householder);

    assert_eq!(mgs.exponents.len(), 40);
    for ((_, a), (_, b)) in mgs.exponents.iter().zip(hh.exponents.iter()) {
        assert_all_finite(a);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-8);
        }
    }
}

#[test]
// Purpose
// -------
// A closure system with a central-difference Jacobian reproduces the run of
// the equivalent analytic linear system.
fn closure_system_with_numerical_jacobian_matches_linear_system() {
    let a = array![[-2.0, 1.0], [1.0, -2.0]];
    let x0 = array![1.0, 0.5];
    let field_matrix = a.clone();
    let closure =
        ClosureSystem::new(x0.view(), move |x: ArrayView1<'_, f64>, _t: f64| field_matrix.dot(&x))
            .unwrap();
    assert!(closure.uses_finite_differences());
    let opts = LyapunovOptions::new(1e-2, 0.1, 2.0).unwrap();

    let numeric =
        FractionalLyapunov::new(closure, &[0.95, 0.95], x0.view(), opts).unwrap().run().unwrap();
    let linear = LinearSystem::new(a).unwrap();
    let analytic =
        FractionalLyapunov::new(linear, &[0.95, 0.95], x0.view(), opts).unwrap().run().unwrap();

    let (n, m) = (numeric.final_exponents().unwrap(), analytic.final_exponents().unwrap());
    for (x, y) in n.iter().zip(m.iter()) {
        assert_abs_diff_eq!(x, y, epsilon = 1e-6);
    }
    for (x, y) in numeric.trajectory.states().iter().zip(analytic.trajectory.states().iter()) {
        assert_abs_diff_eq!(x, y, epsilon = 1e-12);
    }
}

#[test]
// Purpose
// -------
// Integer-order limit of the Duffing oscillator: the exponent sum is the
// mean of ln det(I + hJ), close to the damping rate −δ.
//
// Given
// -----
// - Double-well parameters (δ = 0.25), orders (1, 1, 1), h = 5e-3,
//   h_norm = 5e-2, t_end = 5.
//
// Expect
// ------
// - 100 finite checkpoints; exponent sum within 0.05 of −0.25.
fn duffing_integer_order_contracts_at_damping_rate() {
    let opts = LyapunovOptions::new(5e-3, 5e-2, 5.0).unwrap();
    let engine = FractionalLyapunov::new(
        DuffingOscillator::double_well(),
        &[1.0, 1.0, 1.0],
        array![0.5, 0.0, 0.0].view(),
        opts,
    )
    .unwrap();

    let out = engine.run().unwrap();

    assert_eq!(out.exponents.len(), 100);
    assert!(out.exponents.as_matrix().iter().all(|v| v.is_finite()));
    assert_abs_diff_eq!(out.exponents.exponent_sum().unwrap(), -0.25, epsilon = 0.05);
    assert_eq!(out.trajectory.tangent(0), Array2::<f64>::eye(3));
}

#[test]
// Purpose
// -------
// Fractional Duffing smoke run with a logger-backed observer that is
// stopped halfway through.
//
// Given
// -----
// - Orders (0.98, 0.98, 1.0), h = 1e-2, h_norm = 0.1, t_end = 4.
// - Observer stops after checkpoint 20 of 40.
//
// Expect
// ------
// - 20 recorded checkpoints, trajectory trimmed to 201 steps, all finite.
// - The phase row advances like the clock: θ[t] = t·h.
fn fractional_duffing_smoke_run_with_early_stop() {
    let opts = LyapunovOptions::new(1e-2, 0.1, 4.0).unwrap();
    let logger = Logger::root(slog::Discard, o!());
    let engine = FractionalLyapunov::new(
        DuffingOscillator::double_well(),
        &[0.98, 0.98, 1.0],
        array![0.5, 0.0, 0.0].view(),
        opts,
    )
    .unwrap()
    .with_logger(logger.clone());
    let mut progress = SlogProgress::new(logger);
    let mut seen = 0usize;
    let mut observer = |r: &CheckpointReport<'_>| {
        seen += 1;
        let _ = progress.on_checkpoint(r);
        if r.checkpoint == 20 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
    };

    let out = engine.run_with(&mut observer).unwrap();

    assert_eq!(seen, 20);
    assert!(!out.completed);
    assert_eq!(out.exponents.len(), 20);
    assert_eq!(out.trajectory.len(), 201);
    let states = out.trajectory.states();
    assert!(states.iter().all(|v| v.is_finite()));
    assert_abs_diff_eq!(states[[200, 2]], 2.0, epsilon = 1e-9);
}

#[test]
// Purpose
// -------
// An order-0 phase row cannot advance and has no tangent dynamics, so the
// Duffing configuration is refused up front instead of failing at the first
// checkpoint.
//
// Given
// -----
// - Orders (0.98, 0.98, 0.0), h = 1e-2, h_norm = 0.1.
//
// Expect
// ------
// - `InvalidOrder` for dimension 2, a configuration (not numerical) error.
fn duffing_rejects_order_zero_phase_row() {
    let opts = LyapunovOptions::new(1e-2, 0.1, 4.0).unwrap();

    let err = FractionalLyapunov::new(
        DuffingOscillator::double_well(),
        &[0.98, 0.98, 0.0],
        array![0.5, 0.0, 0.0].view(),
        opts,
    )
    .unwrap_err();

    assert!(matches!(err, FOError::InvalidOrder { dim: 2, .. }));
    assert!(!err.is_numerical());
}
