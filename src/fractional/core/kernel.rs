//! Grünwald–Letnikov memory kernels: generation and per-order caching.
//!
//! Purpose
//! -------
//! Produce the binomial coefficients `c_q[1..n]` that weight the history of
//! a fractional-order trajectory, and share one read-only copy of each kernel
//! between every state dimension and tangent row that uses the same order.
//!
//! Key behaviors
//! -------------
//! - [`gl_coefficients`] applies the recurrence literally:
//!   `c_1 = (1 − (1+q)/1) · 1` and `c_j = (1 − (1+q)/j) · c_{j−1}`.
//! - [`KernelBank`] generates each distinct order once and hands out
//!   `Arc` clones afterwards.
//!
//! Invariants & assumptions
//! ------------------------
//! - Kernels are a pure function of `(q, n)`; repeated calls return
//!   bit-identical sequences.
//! - `c_1 = −q`. For `q = 1` every coefficient after the first is zero, and
//!   for `q = 0` the whole kernel is zero.
//! - Kernels are never mutated after generation.
//!
//! Conventions
//! -----------
//! - Storage is 0-based: `kernel[j − 1] = c_j`. The base case `j = 1` is
//!   seeded from the multiplicative identity, so no `c_0` is ever read.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the exact first coefficient, the integer and zero
//!   order degeneracies, determinism, agreement with the closed form
//!   `Γ(j − q) / (Γ(−q) Γ(j + 1))`, and cache sharing in [`KernelBank`].
use crate::fractional::core::order::FractionalOrder;
use ndarray::Array1;
use std::{collections::HashMap, sync::Arc};

/// Generate the first `n` Grünwald–Letnikov coefficients for order `q`.
///
/// Parameters
/// ----------
/// - `q`: `f64`
///   Fractional order. Validation is the caller's job (see
///   [`FractionalOrder`]); the recurrence itself is defined for any real `q`.
/// - `n`: `usize`
///   Number of coefficients, normally the number of integration steps.
///
/// Returns
/// -------
/// `Array1<f64>`
///   `kernel[j − 1] = c_j` for `j = 1..=n`. Empty when `n == 0`.
///
/// Panics
/// ------
/// - Never panics.
///
/// Examples
/// --------
/// ```rust
/// # use fractional_lyapunov::fractional::core::kernel::gl_coefficients;
/// let c = gl_coefficients(0.5, 3);
/// assert_eq!(c[0], -0.5);
/// assert_eq!(c[1], -0.125);
/// ```
pub fn gl_coefficients(q: f64, n: usize) -> Array1<f64> {
    let mut kernel = Array1::<f64>::zeros(n);
    let mut prev = 1.0;
    for j in 1..=n {
        prev *= 1.0 - (1.0 + q) / j as f64;
        kernel[j - 1] = prev;
    }
    kernel
}

/// KernelBank — one shared kernel per distinct fractional order.
///
/// Purpose
/// -------
/// Own the kernel arrays for a run. Heterogeneous-order systems typically
/// repeat orders across dimensions (and every tangent row reuses the order
/// of its state dimension), so each order is generated once and shared.
///
/// Fields
/// ------
/// - `len`: `usize`
///   Coefficient count of every kernel in the bank.
/// - `kernels`: `HashMap<u64, Arc<Array1<f64>>>`
///   Generated kernels keyed by the order's bit pattern.
///
/// Invariants
/// ----------
/// - Every stored kernel has length `len` and is never mutated.
#[derive(Debug, Clone)]
pub struct KernelBank {
    len: usize,
    kernels: HashMap<u64, Arc<Array1<f64>>>,
}

impl KernelBank {
    /// Create an empty bank whose kernels will hold `len` coefficients.
    pub fn new(len: usize) -> Self {
        KernelBank { len, kernels: HashMap::new() }
    }

    /// Return the kernel for `order`, generating it on first request.
    pub fn kernel(&mut self, order: FractionalOrder) -> Arc<Array1<f64>> {
        let len = self.len;
        self.kernels
            .entry(order.value().to_bits())
            .or_insert_with(|| Arc::new(gl_coefficients(order.value(), len)))
            .clone()
    }

    /// Resolve one kernel per entry of `orders`, sharing equal orders.
    pub fn kernels_for(&mut self, orders: &[FractionalOrder]) -> Vec<Arc<Array1<f64>>> {
        orders.iter().map(|&order| self.kernel(order)).collect()
    }

    /// Number of distinct orders generated so far.
    pub fn distinct(&self) -> usize {
        self.kernels.len()
    }

    /// Coefficient count of each kernel.
    pub fn kernel_len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use statrs::function::gamma::gamma;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The literal recurrence, including the `c_1 = −q` base case.
    // - Integer-order (q = 1) and zero-order (q = 0) degeneracies.
    // - Determinism and agreement with the Gamma-function closed form.
    // - Order sharing inside `KernelBank`.
    //
    // They intentionally DO NOT cover:
    // - How kernels enter the memory sum (see `memory`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify `c_1 = −q` for dyadic orders, where the subtraction is exact,
    // and to within one ulp-scale tolerance otherwise.
    fn first_coefficient_is_minus_q() {
        for q in [0.25, 0.5, 0.75, 1.0] {
            assert_eq!(gl_coefficients(q, 1)[0], -q);
        }
        for q in [0.3, 0.87, 0.99] {
            assert_relative_eq!(gl_coefficients(q, 1)[0], -q, max_relative = 1e-15);
        }
    }

    #[test]
    // Purpose
    // -------
    // Check the second and third coefficients by hand for q = 0.5.
    //
    // Expect
    // ------
    // - c_2 = (1 − 1.5/2)·(−0.5) = −0.125
    // - c_3 = (1 − 1.5/3)·(−0.125) = −0.0625
    fn recurrence_matches_hand_computation() {
        let c = gl_coefficients(0.5, 3);
        assert_eq!(c.to_vec(), vec![-0.5, -0.125, -0.0625]);
    }

    #[test]
    // Purpose
    // -------
    // Integer order collapses to a single −1 followed by zeros, and zero
    // order yields an all-zero kernel.
    fn integer_and_zero_orders_degenerate() {
        let one = gl_coefficients(1.0, 6);
        assert_eq!(one[0], -1.0);
        assert!(one.iter().skip(1).all(|&c| c == 0.0));

        let zero = gl_coefficients(0.0, 6);
        assert!(zero.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn empty_kernel_for_zero_length() {
        assert_eq!(gl_coefficients(0.7, 0).len(), 0);
    }

    #[test]
    // Purpose
    // -------
    // Kernels are deterministic: identical inputs give bit-identical output.
    fn generation_is_deterministic() {
        let a = gl_coefficients(0.93, 500);
        let b = gl_coefficients(0.93, 500);
        assert!(a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits()));
    }

    #[test]
    // Purpose
    // -------
    // Cross-check the recurrence against `c_j = Γ(j − q) / (Γ(−q) Γ(j + 1))`.
    fn recurrence_agrees_with_gamma_closed_form() {
        let q = 0.3;
        let c = gl_coefficients(q, 20);
        for j in 1..=20 {
            let jf = j as f64;
            let closed = gamma(jf - q) / (gamma(-q) * gamma(jf + 1.0));
            assert_relative_eq!(c[j - 1], closed, max_relative = 1e-10);
        }
    }

    #[test]
    // Purpose
    // -------
    // Coefficients for 0 < q < 1 stay negative and decay in magnitude.
    fn fractional_kernel_is_negative_and_decaying() {
        let c = gl_coefficients(0.8, 200);
        assert!(c.iter().all(|&x| x < 0.0));
        assert!(c.windows(2).into_iter().all(|w| w[1].abs() < w[0].abs()));
    }

    #[test]
    // Purpose
    // -------
    // `KernelBank` generates each distinct order once and shares it.
    //
    // Given
    // -----
    // - Orders `[0.9, 0.9, 1.0, 0.9]` with kernel length 50.
    //
    // Expect
    // ------
    // - Two distinct kernels; equal orders point at the same allocation.
    fn bank_shares_equal_orders() {
        let orders = FractionalOrder::from_slice(&[0.9, 0.9, 1.0, 0.9]).unwrap();
        let mut bank = KernelBank::new(50);

        let kernels = bank.kernels_for(&orders);

        assert_eq!(bank.distinct(), 2);
        assert_eq!(bank.kernel_len(), 50);
        assert!(Arc::ptr_eq(&kernels[0], &kernels[1]));
        assert!(Arc::ptr_eq(&kernels[0], &kernels[3]));
        assert!(!Arc::ptr_eq(&kernels[0], &kernels[2]));
        assert_eq!(kernels[2].len(), 50);
    }
}
