//! Progress reporting at renormalization checkpoints.
//!
//! The engine calls a [`ProgressObserver`] once per checkpoint, after `SUM`
//! and the exponent series have been updated, so every report describes a
//! consistent state. Returning [`ControlFlow::Break`] stops the run there.
//!
//! [`SlogProgress`] writes structured `slog` records; its terminal
//! constructor routes them through an asynchronous drain so the integration
//! loop never blocks on I/O.
use ndarray::ArrayView1;
use slog::{Drain, Logger, info, o};
use std::ops::ControlFlow;

/// Snapshot handed to observers at each checkpoint.
#[derive(Debug, Clone, Copy)]
pub struct CheckpointReport<'a> {
    /// 1-based checkpoint counter.
    pub checkpoint: usize,
    /// Number of checkpoints the full run would record.
    pub total_checkpoints: usize,
    /// Step index of the checkpoint.
    pub step: usize,
    /// Simulated time `step·h`.
    pub time: f64,
    /// Share of the step grid completed, in percent.
    pub percent: f64,
    /// Current exponent estimate `SUM / time`.
    pub exponents: ArrayView1<'a, f64>,
}

/// Receives checkpoint reports and may stop the run.
pub trait ProgressObserver {
    fn on_checkpoint(&mut self, report: &CheckpointReport<'_>) -> ControlFlow<()>;
}

impl<F> ProgressObserver for F
where
    F: FnMut(&CheckpointReport<'_>) -> ControlFlow<()>,
{
    fn on_checkpoint(&mut self, report: &CheckpointReport<'_>) -> ControlFlow<()> {
        self(report)
    }
}

/// Silent observer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_checkpoint(&mut self, _report: &CheckpointReport<'_>) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Observer that logs every `every`-th checkpoint at info level.
#[derive(Debug, Clone)]
pub struct SlogProgress {
    logger: Logger,
    every: usize,
}

impl SlogProgress {
    /// Log through an existing logger.
    pub fn new(logger: Logger) -> Self {
        SlogProgress { logger, every: 1 }
    }

    /// Log to the terminal through a non-blocking asynchronous drain.
    pub fn term_noblock() -> Self {
        let decorator = slog_term::TermDecorator::new().build();
        let drain = slog_term::FullFormat::new(decorator).build().fuse();
        let drain = slog_async::Async::new(drain).build().fuse();
        Self::new(Logger::root(drain, o!("component" => "lyapunov")))
    }

    /// Only log every `n`-th checkpoint (and always the last one).
    pub fn every(mut self, n: usize) -> Self {
        self.every = n.max(1);
        self
    }

    fn should_log(&self, report: &CheckpointReport<'_>) -> bool {
        report.checkpoint % self.every == 0 || report.checkpoint == report.total_checkpoints
    }
}

impl ProgressObserver for SlogProgress {
    fn on_checkpoint(&mut self, report: &CheckpointReport<'_>) -> ControlFlow<()> {
        if self.should_log(report) {
            info!(self.logger, "checkpoint";
                "checkpoint" => report.checkpoint,
                "step" => report.step,
                "time" => report.time,
                "percent" => format!("{:.1}", report.percent),
                "exponents" => format!("{:.6}", report.exponents)
            );
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Closure observers and early stopping.
    // - Throttling in `SlogProgress`.
    // -------------------------------------------------------------------------

    fn report(checkpoint: usize, exps: ArrayView1<'_, f64>) -> CheckpointReport<'_> {
        CheckpointReport {
            checkpoint,
            total_checkpoints: 10,
            step: checkpoint * 5,
            time: checkpoint as f64 * 0.5,
            percent: checkpoint as f64 * 10.0,
            exponents: exps,
        }
    }

    #[test]
    fn closures_are_observers() {
        let exps = array![0.1, -0.2];
        let mut seen = Vec::new();
        let mut observer = |r: &CheckpointReport<'_>| {
            seen.push(r.step);
            if r.checkpoint >= 2 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
        };

        assert!(observer.on_checkpoint(&report(1, exps.view())).is_continue());
        assert!(observer.on_checkpoint(&report(2, exps.view())).is_break());
        assert_eq!(seen, vec![5, 10]);
    }

    #[test]
    fn slog_progress_throttles_but_keeps_last_checkpoint() {
        let exps = array![0.0];
        let progress = SlogProgress::new(Logger::root(slog::Discard, o!())).every(4);

        assert!(!progress.should_log(&report(3, exps.view())));
        assert!(progress.should_log(&report(4, exps.view())));
        assert!(progress.should_log(&report(10, exps.view())));
    }

    #[test]
    fn observers_never_stop_on_their_own() {
        let exps = array![0.0];
        let mut slog_obs = SlogProgress::new(Logger::root(slog::Discard, o!()));

        assert!(NoProgress.on_checkpoint(&report(1, exps.view())).is_continue());
        assert!(slog_obs.on_checkpoint(&report(1, exps.view())).is_continue());
    }
}
