use crate::numerical::Gear::common::norm;
use log::info;
use nalgebra::{DMatrix, DVector};

const EPS: f64 = f64::EPSILON;

/// Newton-Raphson solver of the implicit step equation R(u) = 0.
///
/// The residual and the optional residual jacobian are bound per step by the
/// Gear solver; this struct only carries the iteration budget. When no
/// jacobian is supplied the iteration falls back to a forward-difference
/// jacobian of the residual, so both call variants satisfy the same contract.
///
/// Non-convergence is not fatal: `solve` always returns the best-effort
/// iterate together with a converged flag and a diagnostic message, and the
/// caller decides what to do with a failed step.
pub struct NRGear {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl NRGear {
    pub fn new(tolerance: f64, max_iterations: usize) -> NRGear {
        assert!(tolerance >= 0.0, "tolerance should be a non-negative number");
        assert!(max_iterations > 0, "max_iterations should be a positive number");
        NRGear {
            tolerance,
            max_iterations,
        }
    }

    /// solve R(u) = 0 starting from `guess`, returns (root, converged, message)
    pub fn solve<F>(
        &self,
        residual: F,
        guess: &DVector<f64>,
        jacobian: Option<&dyn Fn(&DVector<f64>) -> DMatrix<f64>>,
    ) -> (DVector<f64>, bool, String)
    where
        F: Fn(&DVector<f64>) -> DVector<f64>,
    {
        let mut x = guess.clone();
        for i in 0..self.max_iterations {
            let r = residual(&x);
            if !r.iter().all(|v| v.is_finite()) {
                return (
                    x,
                    false,
                    format!("residual contains non-finite values at iteration {}", i),
                );
            }
            if norm(&r) < self.tolerance {
                return (x, true, "converged".to_string());
            }
            let j = match jacobian {
                Some(jac) => jac(&x),
                None => numerical_jacobian(&residual, &x, &r),
            };
            let lu = j.lu();
            let delta = match lu.solve(&r) {
                Some(delta) => delta,
                None => {
                    return (
                        x,
                        false,
                        format!("jacobian of the residual is singular at iteration {}", i),
                    );
                }
            };
            // element wise subtraction
            x -= &delta;
            if norm(&delta) < self.tolerance {
                info!("Newton-Raphson converged in {} iterations", i + 1);
                return (x, true, "converged".to_string());
            }
        }
        (
            x,
            false,
            "maximum number of iterations reached".to_string(),
        )
    }
}

/// forward-difference jacobian of the residual, used when no analytic jacobian is supplied
fn numerical_jacobian<F>(residual: &F, x: &DVector<f64>, rx: &DVector<f64>) -> DMatrix<f64>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    let n = x.len();
    let mut jacobian = DMatrix::zeros(n, n);
    let eps = EPS.sqrt();
    for i in 0..n {
        let step = eps * x[i].abs().max(1.0);
        let mut x_eps = x.clone();
        x_eps[i] += step;
        let r_eps = residual(&x_eps);
        let dr = (r_eps - rx) / step;
        jacobian.set_column(i, &dr);
    }
    jacobian
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // u^2 - 4 = 0, root u = 2
    fn quadratic(u: &DVector<f64>) -> DVector<f64> {
        DVector::from_vec(vec![u[0] * u[0] - 4.0])
    }

    #[test]
    fn test_newton_with_analytic_jacobian() {
        let nr = NRGear::new(1e-12, 50);
        let jac = |u: &DVector<f64>| DMatrix::from_vec(1, 1, vec![2.0 * u[0]]);
        let guess = DVector::from_vec(vec![3.0]);
        let (root, converged, message) = nr.solve(quadratic, &guess, Some(&jac));
        assert!(converged, "message = {}", message);
        assert_relative_eq!(root[0], 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_newton_with_numerical_jacobian() {
        let nr = NRGear::new(1e-12, 50);
        let guess = DVector::from_vec(vec![3.0]);
        let (root, converged, _) = nr.solve(quadratic, &guess, None);
        assert!(converged);
        assert_relative_eq!(root[0], 2.0, epsilon = 1e-8);
    }

    #[test]
    fn test_newton_on_coupled_system() {
        // z + y = 7, z * y = 12 -> (3, 4) from a nearby guess
        let residual = |u: &DVector<f64>| {
            DVector::from_vec(vec![u[0] + u[1] - 7.0, u[0] * u[1] - 12.0])
        };
        let nr = NRGear::new(1e-12, 100);
        let guess = DVector::from_vec(vec![2.5, 4.5]);
        let (root, converged, _) = nr.solve(residual, &guess, None);
        assert!(converged);
        assert_relative_eq!(root[0], 3.0, epsilon = 1e-8);
        assert_relative_eq!(root[1], 4.0, epsilon = 1e-8);
    }

    #[test]
    fn test_non_finite_residual_is_reported_not_thrown() {
        let residual = |_u: &DVector<f64>| DVector::from_vec(vec![f64::NAN]);
        let nr = NRGear::new(1e-12, 50);
        let guess = DVector::from_vec(vec![1.0]);
        let (root, converged, message) = nr.solve(residual, &guess, None);
        assert!(!converged);
        assert!(message.contains("non-finite"));
        // best-effort iterate is the untouched guess
        assert_eq!(root, guess);
    }

    #[test]
    fn test_iteration_budget_exhaustion() {
        // R(u) = u^2 + 1 has no real root, Newton must give up gracefully
        let residual = |u: &DVector<f64>| DVector::from_vec(vec![u[0] * u[0] + 1.0]);
        let nr = NRGear::new(1e-12, 10);
        let guess = DVector::from_vec(vec![1.0]);
        let (root, converged, message) = nr.solve(residual, &guess, None);
        assert!(!converged);
        assert_eq!(message, "maximum number of iterations reached");
        assert!(root[0].is_finite());
    }
}
