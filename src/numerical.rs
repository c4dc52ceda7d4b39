/// SOLVER OF IVP BY IMPLICIT MULTISTEP (GEAR/BDF) METHODS of orders 1..6
/// Example#1
/// ```
/// use RustedGear::numerical::Gear::Gear_api::GearODEsolver;
/// use nalgebra::DVector;
/// // y' = -y, y(0) = 1 on a uniform grid of 11 points
/// let t = DVector::from_iterator(11, (0..11).map(|i| i as f64 * 0.1));
/// let y0 = DVector::from_vec(vec![1.0]);
/// let fun = Box::new(|_t: f64, y: &DVector<f64>| -y.clone());
/// let mut solver = GearODEsolver::new();
/// solver.set_initial(2, fun, None, t, y0, 1e-10, 50);
/// solver.solve().unwrap();
/// let (_t_res, y_res) = solver.get_result();
/// assert_eq!(y_res.unwrap().nrows(), 11);
/// assert!(solver.all_converged());
/// ```
pub mod Gear;
/// Newton-Raphson solver of the implicit step equation, used on each step of Gear methods
pub mod NR_for_Gear;
/// explicit Runge-Kutta bootstrap filling the first k samples before the implicit recursion has enough history
pub mod RK_bootstrap;
/// collection of test problems with closed-form solutions, used by tests and benches
pub mod Examples_and_utils;
