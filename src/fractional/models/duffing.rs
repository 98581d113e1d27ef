//! Forced, damped fractional Duffing oscillator (reference system).
//!
//! State layout `(x, y, θ)`:
//! - `x` position, `x' = y`;
//! - `y` velocity, `y' = −δ·y − α·x − β·x³ + γ·cos(ω·θ)`;
//! - `θ` driving phase, `θ' = 1`.
//!
//! The velocity update reads the position already advanced in the current
//! step (`x[t]`) while everything else reads `X[t − 1]`. The phase row is a
//! driving row: its tangent rate is the constant `0`, so its tangent entries
//! evolve by memory decay alone. The Jacobian is evaluated at `X[t − 1]`.
//!
//! With order 1 the phase advances as the clock, `θ[t] = t·h`. Order 0 on the
//! phase row leaves its tangent row identically zero and is refused when the
//! engine is built.
use crate::fractional::{
    core::{
        system::{FractionalSystem, StepContext},
        validation::validate_model_param,
    },
    errors::FOResult,
};
use ndarray::{ArrayView1, ArrayViewMut2};

/// Duffing parameters `(δ, α, β, γ, ω)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuffingOscillator {
    pub delta: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub omega: f64,
}

impl DuffingOscillator {
    pub const DIM: usize = 3;

    /// Validate and build.
    ///
    /// Errors
    /// ------
    /// - `FOError::InvalidModelParam` for non-finite parameters or a
    ///   non-positive forcing frequency `ω`.
    pub fn new(delta: f64, alpha: f64, beta: f64, gamma: f64, omega: f64) -> FOResult<Self> {
        Ok(DuffingOscillator {
            delta: validate_model_param("delta", delta, false)?,
            alpha: validate_model_param("alpha", alpha, false)?,
            beta: validate_model_param("beta", beta, false)?,
            gamma: validate_model_param("gamma", gamma, false)?,
            omega: validate_model_param("omega", omega, true)?,
        })
    }

    /// Double-well configuration `δ = 0.25, α = −1, β = 1, γ = 0.3, ω = 1`.
    pub fn double_well() -> Self {
        DuffingOscillator { delta: 0.25, alpha: -1.0, beta: 1.0, gamma: 0.3, omega: 1.0 }
    }

    fn acceleration(&self, x: f64, y: f64, theta: f64) -> f64 {
        -self.delta * y - self.alpha * x - self.beta * x.powi(3)
            + self.gamma * (self.omega * theta).cos()
    }
}

impl FractionalSystem for DuffingOscillator {
    fn dim(&self) -> usize {
        Self::DIM
    }

    fn rate(&self, i: usize, ctx: &StepContext<'_>) -> f64 {
        match i {
            0 => ctx.prev[1],
            1 => self.acceleration(ctx.current[0], ctx.prev[1], ctx.prev[2]),
            _ => 1.0,
        }
    }

    fn jacobian(&self, state: ArrayView1<'_, f64>, _time: f64, mut out: ArrayViewMut2<'_, f64>) {
        let (x, theta) = (state[0], state[2]);
        out.fill(0.0);
        out[[0, 1]] = 1.0;
        out[[1, 0]] = -self.alpha - 3.0 * self.beta * x * x;
        out[[1, 1]] = -self.delta;
        out[[1, 2]] = -self.gamma * self.omega * (self.omega * theta).sin();
    }

    fn constant_tangent_rate(&self, i: usize) -> Option<f64> {
        (i == 2).then_some(0.0)
    }
}
