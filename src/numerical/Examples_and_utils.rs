/// a collection of linear test problems with known exact solutions, used for
/// testing and benching the Gear solvers
use nalgebra::{DMatrix, DVector};
use strum_macros::EnumIter;

/// uniform grid of n points from start to end inclusive
pub fn linspace(start: f64, end: f64, n: usize) -> DVector<f64> {
    assert!(n >= 2, "linspace needs at least two points");
    let step = (end - start) / (n - 1) as f64;
    DVector::from_iterator(n, (0..n).map(|i| start + i as f64 * step))
}

// EXAMPLES OF IVP WITH ELEMENTARY EXACT SOLUTIONS
/*
exponential decay:
y' = -y, y(0) = 1
exact solution: y = exp(-t)

harmonic oscillator as a first order system:
y1' = y2, y2' = -y1, y(0) = (1, 0)
exact solution: y = (cos(t), -sin(t))

decoupled stiff pair (rates 100 and 1):
y1' = -100*y1, y2' = -y2, y(0) = (1, 1)
exact solution: y = (exp(-100*t), exp(-t))
*/
#[derive(Debug, PartialEq, Eq, EnumIter)]
pub enum TestODE {
    ExponentialDecay,
    HarmonicOscillator,
    StiffPair,
}

impl TestODE {
    pub fn rhs(&self) -> Box<dyn Fn(f64, &DVector<f64>) -> DVector<f64> + Sync> {
        match self {
            TestODE::ExponentialDecay => Box::new(|_t, y| -y.clone()),
            TestODE::HarmonicOscillator => {
                Box::new(|_t, y: &DVector<f64>| DVector::from_vec(vec![y[1], -y[0]]))
            }
            TestODE::StiffPair => {
                Box::new(|_t, y: &DVector<f64>| DVector::from_vec(vec![-100.0 * y[0], -y[1]]))
            }
        }
    }

    pub fn jac(&self) -> Box<dyn Fn(f64, &DVector<f64>) -> DMatrix<f64> + Sync> {
        match self {
            TestODE::ExponentialDecay => Box::new(|_t, _y| DMatrix::from_vec(1, 1, vec![-1.0])),
            TestODE::HarmonicOscillator => {
                Box::new(|_t, _y| DMatrix::from_row_slice(2, 2, &[0.0, 1.0, -1.0, 0.0]))
            }
            TestODE::StiffPair => {
                Box::new(|_t, _y| DMatrix::from_row_slice(2, 2, &[-100.0, 0.0, 0.0, -1.0]))
            }
        }
    }

    pub fn y0(&self) -> DVector<f64> {
        match self {
            TestODE::ExponentialDecay => DVector::from_vec(vec![1.0]),
            TestODE::HarmonicOscillator => DVector::from_vec(vec![1.0, 0.0]),
            TestODE::StiffPair => DVector::from_vec(vec![1.0, 1.0]),
        }
    }

    pub fn exact(&self, t: f64) -> DVector<f64> {
        match self {
            TestODE::ExponentialDecay => DVector::from_vec(vec![(-t).exp()]),
            TestODE::HarmonicOscillator => DVector::from_vec(vec![t.cos(), -t.sin()]),
            TestODE::StiffPair => DVector::from_vec(vec![(-100.0 * t).exp(), (-t).exp()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn test_linspace_endpoints() {
        let t = linspace(0.0, 1.0, 11);
        assert_eq!(t.len(), 11);
        assert_eq!(t[0], 0.0);
        assert_relative_eq!(t[10], 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_exact_solutions_satisfy_their_equations() {
        // rhs evaluated on the exact solution must equal its time derivative
        let dt = 1e-6;
        for problem in TestODE::iter() {
            let fun = problem.rhs();
            assert_eq!(problem.exact(0.0), problem.y0());
            for &t in [0.1, 0.5].iter() {
                let derivative = (problem.exact(t + dt) - problem.exact(t - dt)) / (2.0 * dt);
                let rhs = fun(t, &problem.exact(t));
                for i in 0..rhs.len() {
                    assert_relative_eq!(derivative[i], rhs[i], epsilon = 1e-3, max_relative = 1e-3);
                }
            }
        }
    }

    #[test]
    fn test_jacobians_match_rhs() {
        // all catalog problems are linear: jac * y must reproduce rhs(y)
        for problem in TestODE::iter() {
            let fun = problem.rhs();
            let jac = problem.jac();
            let y = problem.y0();
            let expected = fun(0.3, &y);
            let from_jac = jac(0.3, &y) * &y;
            for i in 0..expected.len() {
                assert_relative_eq!(from_jac[i], expected[i], epsilon = 1e-12);
            }
        }
    }
}
