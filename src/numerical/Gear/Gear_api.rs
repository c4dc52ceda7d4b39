use crate::Utils::logger::{init_logger, save_matrix_to_csv};
use crate::Utils::task_parser::GearTask;
use crate::numerical::Gear::Gear_solver::{GearSolution, StepFailure, gear_integrate};
use log::{info, warn};
use nalgebra::{DMatrix, DVector};
use std::env;
use std::error::Error;
use std::time::Instant;

/// Solver facade for the fixed-order Gear (BDF) methods.
///
/// Follows the usual workflow of the IVP solvers in this project: create with
/// `new()`, feed the problem with `set_initial` (or `set_initial_from_task`),
/// then `solve()` and collect the trajectory with `get_result()`. Per-step
/// convergence failures never abort the run; inspect them with
/// `failed_steps()` / `all_converged()`.
pub struct GearODEsolver {
    pub order: usize,
    fun: Box<dyn Fn(f64, &DVector<f64>) -> DVector<f64>>,
    jac: Option<Box<dyn Fn(f64, &DVector<f64>) -> DMatrix<f64>>>,
    t: DVector<f64>,
    y0: DVector<f64>,
    pub tolerance: f64,
    pub max_iterations: usize,
    pub loglevel: Option<String>,
    status: String,
    message: Option<String>,
    t_result: DVector<f64>,
    y_result: DMatrix<f64>,
    failed_steps: Vec<StepFailure>,
}

impl GearODEsolver {
    pub fn new() -> GearODEsolver {
        GearODEsolver {
            order: 1,
            fun: Box::new(|_t, y| {
                let mut dydt = DVector::zeros(y.len());
                dydt[0] = y[1];
                dydt[1] = -y[0];
                dydt
            }),
            jac: None,
            t: DVector::zeros(0),
            y0: DVector::from_vec(vec![1.0, 0.0]),
            tolerance: 1e-6,
            max_iterations: 100,
            loglevel: None,
            status: "running".to_string(),
            message: None,
            t_result: DVector::zeros(0),
            y_result: DMatrix::zeros(0, 0),
            failed_steps: Vec::new(),
        }
    }

    pub fn set_initial(
        &mut self,
        order: usize,
        fun: Box<dyn Fn(f64, &DVector<f64>) -> DVector<f64>>,
        jac: Option<Box<dyn Fn(f64, &DVector<f64>) -> DMatrix<f64>>>,
        t: DVector<f64>,
        y0: DVector<f64>,
        tolerance: f64,
        max_iterations: usize,
    ) {
        self.order = order;
        self.fun = fun;
        self.jac = jac;
        self.t = t;
        self.y0 = y0;
        self.tolerance = tolerance;
        self.max_iterations = max_iterations;
        self.check();
    }

    /// take order, tolerances and the time grid from a parsed task document
    pub fn set_initial_from_task(
        &mut self,
        task: &GearTask,
        fun: Box<dyn Fn(f64, &DVector<f64>) -> DVector<f64>>,
        jac: Option<Box<dyn Fn(f64, &DVector<f64>) -> DMatrix<f64>>>,
        y0: DVector<f64>,
    ) {
        self.loglevel = task.loglevel.clone();
        self.set_initial(
            task.method.order(),
            fun,
            jac,
            task.time_grid(),
            y0,
            task.tolerance,
            task.max_iterations,
        );
    }

    pub fn check(&self) {
        assert!(!self.y0.is_empty(), "initial y is empty");
        assert!(!self.t.is_empty(), "time grid is empty");
        assert!(self.tolerance >= 0.0, "tolerance must be non-negative");
        assert!(self.max_iterations >= 1, "max_iterations must be at least 1");
    }

    pub fn solve(&mut self) -> Result<(), Box<dyn Error>> {
        if let Some(level) = &self.loglevel {
            init_logger(level);
        }
        let start = Instant::now();
        let solution = gear_integrate(
            self.order,
            &self.y0,
            &self.t,
            self.fun.as_ref(),
            self.jac.as_deref(),
            self.tolerance,
            self.max_iterations,
        );
        let solution: GearSolution = match solution {
            Ok(solution) => solution,
            Err(e) => {
                self.status = "failed".to_string();
                self.message = Some(e.to_string());
                return Err(Box::new(e));
            }
        };
        let duration = start.elapsed();
        info!("Program took {} milliseconds to run", duration.as_millis());
        self.t_result = solution.t.clone();
        self.y_result = solution.y.clone();
        self.failed_steps = solution.failed_steps;
        if !self.failed_steps.is_empty() {
            let message = format!(
                "{} steps did not converge, see failed_steps()",
                self.failed_steps.len()
            );
            warn!("{}", message);
            self.message = Some(message);
        } else {
            self.message = None;
        }
        self.status = "finished".to_string();
        Ok(())
    }

    pub fn get_result(&self) -> (Option<DVector<f64>>, Option<DMatrix<f64>>) {
        (Some(self.t_result.clone()), Some(self.y_result.clone()))
    }

    pub fn get_status(&self) -> (&str, Option<&String>) {
        (&self.status, self.message.as_ref())
    }

    pub fn failed_steps(&self) -> &[StepFailure] {
        &self.failed_steps
    }

    pub fn all_converged(&self) -> bool {
        self.failed_steps.is_empty()
    }

    pub fn save_result(&self) -> Result<(), Box<dyn Error>> {
        let headers: Vec<String> = (0..self.y_result.ncols())
            .map(|i| format!("y{}", i))
            .collect();
        let current_dir = env::current_dir()?;
        let file_name = format!("GEAR{}_result.csv", self.order);
        let full_path = current_dir.join(file_name);
        save_matrix_to_csv(
            &self.y_result,
            &headers,
            full_path.to_str().ok_or("non-utf8 path")?,
            &self.t_result,
            &"t".to_string(),
        )?;
        info!("result saved");
        Ok(())
    }
}
