//! # Fixed-order Gear (BDF) solver
//!
//! ## Mathematical Foundation
//!
//! Solves the initial value problem
//!
//! ```text
//! dy/dt = f(t, y), y(t₀) = y₀
//! ```
//!
//! with the k-step Backward Differentiation Formula at a fixed order k = 1..6.
//! The method expresses the new sample implicitly through the k previous ones:
//!
//! ```text
//! y_{n+k} = Σ(m=0 to k-1) c_m y_{n+m} + β h f(t_{n+k}, y_{n+k})
//! ```
//!
//! so every step is one root-finding problem for the residual
//!
//! ```text
//! R(u) = u - Σ c_m y_{n+m} - β h f(t_{n+k}, u) = 0
//! ```
//!
//! solved by Newton-Raphson (see `NR_for_Gear`) with the residual jacobian
//! `I - β h ∂f/∂y` when an analytic jacobian of the right-hand side is
//! supplied, and a finite-difference jacobian otherwise.
//!
//! ## Algorithm Flow
//!
//! 1. **Validation**: order and grid length are checked before anything runs.
//! 2. **Bootstrap**: the first k samples come from an explicit RK4 pass.
//! 3. **Stepping**: one nonlinear solve per step, initial guess = the latest
//!    known sample. A non-converged solve is recorded and logged but the
//!    best-effort root is kept and the integration continues.
//! 4. **Assembly**: samples are packed into an (n x d) matrix, one row per
//!    grid point.
//!
//! Step size and order are fixed for the whole run; there is no error
//! estimation and no jacobian reuse between steps. The grid is assumed
//! strictly increasing - the solver does not verify this, violating it gives
//! undefined step sizes.
//!
//! ## References
//!
//! - Gear, C.W. "Numerical Initial Value Problems in Ordinary Differential Equations"
//! - Hairer, E., Wanner, G. "Solving Ordinary Differential Equations II: Stiff Problems"

extern crate nalgebra as na;

use crate::numerical::Gear::Gear_coeffs::{GearCoeffs, gear_coeffs};
use crate::numerical::Gear::common::{GearError, check_arguments};
use crate::numerical::NR_for_Gear::NRGear;
use crate::numerical::RK_bootstrap::rk4_bootstrap;
use log::{info, warn};
use na::{DMatrix, DVector};
use rayon::prelude::*;

/// record of one step whose nonlinear solve did not converge
#[derive(Debug, Clone)]
pub struct StepFailure {
    /// index of the affected sample in the trajectory
    pub step: usize,
    /// time of the affected sample
    pub t: f64,
    pub message: String,
}

/// completed trajectory together with the per-step convergence report
#[derive(Debug, Clone)]
pub struct GearSolution {
    pub t: DVector<f64>,
    /// one row per grid point, one column per state component
    pub y: DMatrix<f64>,
    pub failed_steps: Vec<StepFailure>,
}

impl GearSolution {
    pub fn all_converged(&self) -> bool {
        self.failed_steps.is_empty()
    }

    pub fn sample(&self, i: usize) -> DVector<f64> {
        self.y.row(i).transpose()
    }
}

/// the k-step residual R(u); pure function of its arguments, bound per step into a closure
fn gear_residual(
    u: &DVector<f64>,
    coeffs: &GearCoeffs,
    h: f64,
    t_new: f64,
    window: &[DVector<f64>],
    fun: &dyn Fn(f64, &DVector<f64>) -> DVector<f64>,
) -> DVector<f64> {
    let mut r = u.clone();
    for (c, y_m) in coeffs.history.iter().zip(window) {
        r -= *c * y_m;
    }
    r -= coeffs.beta * h * fun(t_new, u);
    r
}

/// Integrate y' = f(t, y) over the grid `t` with the Gear method of the given order.
///
/// `jac`, when supplied, is the jacobian of the right-hand side; it is wrapped
/// into the residual jacobian `I - β h jac(t, u)` before reaching Newton.
/// Configuration problems fail fast with `GearError`; per-step non-convergence
/// does not abort the run and is reported in `GearSolution::failed_steps`.
pub fn gear_integrate(
    order: usize,
    y0: &DVector<f64>,
    t: &DVector<f64>,
    fun: &dyn Fn(f64, &DVector<f64>) -> DVector<f64>,
    jac: Option<&dyn Fn(f64, &DVector<f64>) -> DMatrix<f64>>,
    tolerance: f64,
    max_iterations: usize,
) -> Result<GearSolution, GearError> {
    let coeffs = gear_coeffs(order).ok_or(GearError::UnsupportedOrder(order))?;
    let y0 = check_arguments(y0.as_slice())?;
    let n = t.len();
    if n < order + 1 {
        return Err(GearError::GridTooShort { order, length: n });
    }
    let dim = y0.len();
    info!(
        "Gear-{}: {} grid points, state dimension {}",
        order, n, dim
    );

    let mut y = rk4_bootstrap(&y0, &t.as_slice()[..order], fun);
    let newton = NRGear::new(tolerance, max_iterations);
    let mut failed_steps: Vec<StepFailure> = Vec::new();

    for i in 0..=(n - order - 1) {
        let h = t[i + 1] - t[i];
        let t_new = t[i + order];
        let window = &y[i..i + order];
        let guess = &y[i + order - 1];
        let residual = |u: &DVector<f64>| gear_residual(u, coeffs, h, t_new, window, fun);
        let (root, converged, message) = if let Some(jac_fun) = jac {
            let jac_residual = |u: &DVector<f64>| {
                DMatrix::identity(dim, dim) - coeffs.beta * h * jac_fun(t_new, u)
            };
            newton.solve(&residual, guess, Some(&jac_residual))
        } else {
            newton.solve(&residual, guess, None)
        };
        if !converged {
            warn!(
                "step {} at t = {} did not converge: {}",
                i + order,
                t_new,
                message
            );
            failed_steps.push(StepFailure {
                step: i + order,
                t: t_new,
                message,
            });
        }
        y.push(root);
    }

    let rows = y.len();
    let cols = y[0].len();
    let mut flat_vec: Vec<f64> = Vec::new();
    for vector in y.iter() {
        flat_vec.extend(vector.iter());
    }
    let y_res: DMatrix<f64> = DMatrix::from_vec(cols, rows, flat_vec).transpose();
    if failed_steps.is_empty() {
        info!("integration finished, all {} implicit steps converged", n - order);
    } else {
        warn!(
            "integration finished with {} non-converged steps out of {}",
            failed_steps.len(),
            n - order
        );
    }
    Ok(GearSolution {
        t: t.clone(),
        y: y_res,
        failed_steps,
    })
}

/// Integrate the same right-hand side from many initial conditions in parallel.
///
/// Every initial condition owns an independent trajectory, so the batch is
/// embarrassingly parallel; nothing inside a single integration runs
/// concurrently.
pub fn gear_integrate_batch<F>(
    order: usize,
    y0s: &[DVector<f64>],
    t: &DVector<f64>,
    fun: F,
    tolerance: f64,
    max_iterations: usize,
) -> Vec<Result<GearSolution, GearError>>
where
    F: Fn(f64, &DVector<f64>) -> DVector<f64> + Sync,
{
    y0s.par_iter()
        .map(|y0| gear_integrate(order, y0, t, &fun, None, tolerance, max_iterations))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::Examples_and_utils::linspace;
    use approx::assert_relative_eq;

    fn decay(_t: f64, y: &DVector<f64>) -> DVector<f64> {
        -y.clone()
    }

    fn decay_jac(_t: f64, _y: &DVector<f64>) -> DMatrix<f64> {
        DMatrix::from_vec(1, 1, vec![-1.0])
    }

    #[test]
    fn test_implicit_euler_matches_closed_form() {
        // order 1 on y' = -y with constant h must give y_n = y0 / (1+h)^n
        let h = 0.1;
        let n = 11;
        let t = linspace(0.0, h * (n - 1) as f64, n);
        let y0 = DVector::from_vec(vec![1.0]);
        let sol = gear_integrate(1, &y0, &t, &decay, None, 1e-12, 50).unwrap();
        assert!(sol.all_converged());
        for i in 0..n {
            assert_relative_eq!(sol.y[(i, 0)], 1.0 / (1.0 + h).powi(i as i32), epsilon = 1e-9);
        }
    }

    fn final_error(order: usize, n: usize) -> f64 {
        let t = linspace(0.0, 1.0, n);
        let y0 = DVector::from_vec(vec![1.0]);
        let sol = gear_integrate(order, &y0, &t, &decay, Some(&decay_jac), 1e-13, 100).unwrap();
        assert!(sol.all_converged());
        (sol.y[(n - 1, 0)] - (-1.0f64).exp()).abs()
    }

    #[test]
    fn test_convergence_rates_on_linear_decay() {
        // halving h must shrink the final-point error at the theoretical rate;
        // orders 5 and 6 are floored by the RK4 bootstrap accuracy
        for order in 1..=6 {
            let e1 = final_error(order, 21);
            let e2 = final_error(order, 41);
            let observed = (e1 / e2).log2();
            let expected = (order as f64).min(4.5);
            assert!(
                observed > expected - 0.5,
                "order {}: observed rate {:.2}, errors {:.3e} -> {:.3e}",
                order,
                observed,
                e1,
                e2
            );
        }
    }

    #[test]
    fn test_first_samples_equal_bootstrap_output() {
        let order = 4;
        let t = linspace(0.0, 0.9, 10);
        let y0 = DVector::from_vec(vec![1.0, 2.0]);
        let fun = |_t: f64, y: &DVector<f64>| -y.clone();
        let sol = gear_integrate(order, &y0, &t, &fun, None, 1e-10, 50).unwrap();
        let boot = rk4_bootstrap(&y0, &t.as_slice()[..order], &fun);
        for i in 0..order {
            assert_eq!(sol.sample(i), boot[i]);
        }
    }

    #[test]
    fn test_state_shape_is_preserved() {
        let t = linspace(0.0, 0.7, 8);
        let y0 = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let sol = gear_integrate(2, &y0, &t, &decay_componentwise, None, 1e-10, 50).unwrap();
        assert_eq!(sol.y.shape(), (8, 3));
        assert_eq!(sol.sample(7).len(), 3);
        assert!(sol.y.iter().all(|v| v.is_finite()));

        let scalar = DVector::from_vec(vec![1.0]);
        let sol = gear_integrate(2, &scalar, &t, &decay, None, 1e-10, 50).unwrap();
        assert_eq!(sol.y.shape(), (8, 1));
    }

    fn decay_componentwise(_t: f64, y: &DVector<f64>) -> DVector<f64> {
        -y.clone()
    }

    #[test]
    fn test_analytic_jacobian_does_not_change_the_root() {
        let t = linspace(0.0, 1.0, 21);
        let y0 = DVector::from_vec(vec![1.0]);
        let with_jac = gear_integrate(3, &y0, &t, &decay, Some(&decay_jac), 1e-12, 50).unwrap();
        let without = gear_integrate(3, &y0, &t, &decay, None, 1e-12, 50).unwrap();
        for i in 0..t.len() {
            assert_relative_eq!(with_jac.y[(i, 0)], without.y[(i, 0)], epsilon = 1e-8);
        }
    }

    #[test]
    fn test_nan_rhs_is_reported_and_trajectory_still_populated() {
        // right-hand side blows up past t = 0.55: the affected steps must be
        // reported as failures while the trajectory keeps its best-effort values
        let fun = |t: f64, y: &DVector<f64>| {
            if t > 0.55 {
                DVector::from_vec(vec![f64::NAN])
            } else {
                -y.clone()
            }
        };
        let t = linspace(0.0, 1.0, 11);
        let y0 = DVector::from_vec(vec![1.0]);
        let sol = gear_integrate(2, &y0, &t, &fun, None, 1e-10, 50).unwrap();
        assert!(!sol.all_converged());
        assert!(!sol.failed_steps.is_empty());
        assert_eq!(sol.y.nrows(), 11);
        assert!(sol.y.iter().all(|v| v.is_finite()));
        for failure in sol.failed_steps.iter() {
            assert!(failure.t > 0.55);
            assert!(failure.message.contains("non-finite"));
        }
    }

    #[test]
    fn test_configuration_errors_fail_fast() {
        let y0 = DVector::from_vec(vec![1.0]);
        let short = linspace(0.0, 0.2, 3);
        match gear_integrate(3, &y0, &short, &decay, None, 1e-10, 50) {
            Err(GearError::GridTooShort { order: 3, length: 3 }) => {}
            other => panic!("expected GridTooShort, got {:?}", other.map(|s| s.y.shape())),
        }
        let t = linspace(0.0, 1.0, 11);
        assert!(matches!(
            gear_integrate(7, &y0, &t, &decay, None, 1e-10, 50),
            Err(GearError::UnsupportedOrder(7))
        ));
        let bad = DVector::from_vec(vec![f64::NAN]);
        assert!(matches!(
            gear_integrate(2, &bad, &t, &decay, None, 1e-10, 50),
            Err(GearError::NonFiniteInitialState)
        ));
    }

    #[test]
    fn test_batch_integration_over_initial_conditions() {
        let t = linspace(0.0, 1.0, 21);
        let y0s: Vec<DVector<f64>> = (1..=4)
            .map(|i| DVector::from_vec(vec![i as f64]))
            .collect();
        let results = gear_integrate_batch(2, &y0s, &t, decay, 1e-10, 50);
        assert_eq!(results.len(), 4);
        for (i, result) in results.iter().enumerate() {
            let sol = result.as_ref().unwrap();
            // linear equation: the solution scales with the initial condition
            assert_relative_eq!(
                sol.y[(20, 0)],
                (i + 1) as f64 * (-1.0f64).exp(),
                epsilon = 1e-2
            );
        }
    }
}
