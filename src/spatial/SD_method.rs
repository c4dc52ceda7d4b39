//! # Spectral difference method for the 1D transport equation
//!
//! Semi-discretization of `u_t + c u_x = 0` on a periodic mesh. Each cell
//! carries two interpolation point sets on the reference interval [-1, 1]:
//! solution points (Legendre roots) storing the state, and flux points
//! (cell ends plus interior Legendre roots) storing the flux. Three matrices
//! are built once at construction from Lagrange basis evaluation:
//!
//! ```text
//! sol_to_flux : (p+1) x p      solution points -> flux points
//! flux_to_sol : p x (p+1)      flux points -> solution points
//! d_in_flux   : (p+1) x (p+1)  differentiation at the flux points
//! ```
//!
//! `rhs` then evaluates du/dt cell by cell: transfer the solution to the flux
//! points, form the flux -c*u, make the flux continuous across interfaces by
//! upwinding (for c > 0 every cell's left end takes the value from its left
//! neighbour's right end, cell 0 wrapping around to the last cell - the mesh
//! is periodic; mirrored for negative c), differentiate, transfer back. Cells
//! couple only through their shared interfaces.
//!
//! The operator is handed to the Gear solver as the right-hand-side callback;
//! since it is linear in the state, its jacobian is a constant matrix that
//! `jac()` assembles column by column.

use crate::spatial::lagrange::{d_lagrange, lagrange};
use gauss_quad::GaussLegendre;
use itertools::iproduct;
use log::info;
use nalgebra::{DMatrix, DVector};
use std::error::Error;

pub struct SpectralDifference {
    /// cell boundaries, strictly increasing, n_cell + 1 values
    pub mesh: DVector<f64>,
    /// number of solution points per cell
    pub p: usize,
    /// transport coefficient
    pub c: f64,
    n_cell: usize,
    sol_pts: Vec<f64>,
    flux_pts: Vec<f64>,
    sol_to_flux: DMatrix<f64>,
    flux_to_sol: DMatrix<f64>,
    d_in_flux: DMatrix<f64>,
}

/// roots of the Legendre polynomial of the given degree, ascending
fn legendre_roots(degree: usize) -> Result<Vec<f64>, Box<dyn Error>> {
    let mut roots: Vec<f64> = match degree {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => GaussLegendre::new(degree)
            .map_err(|e| format!("failed to create Gauss-Legendre rule: {:?}", e))?
            .nodes()
            .copied()
            .collect(),
    };
    roots.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Ok(roots)
}

impl SpectralDifference {
    pub fn new(mesh: DVector<f64>, p: usize, c: f64) -> Result<SpectralDifference, Box<dyn Error>> {
        if mesh.len() < 2 {
            return Err("mesh must contain at least two cell boundaries".into());
        }
        if mesh.as_slice().windows(2).any(|w| w[1] <= w[0]) {
            return Err("mesh boundaries must be strictly increasing".into());
        }
        if p < 1 {
            return Err("polynomial order must be at least 1".into());
        }
        let n_cell = mesh.len() - 1;

        // solution points are the Legendre roots, flux points add the cell ends
        let sol_pts = legendre_roots(p)?;
        let mut flux_pts = vec![-1.0];
        flux_pts.extend(legendre_roots(p - 1)?);
        flux_pts.push(1.0);

        let mut sol_to_flux = DMatrix::zeros(p + 1, p);
        let mut flux_to_sol = DMatrix::zeros(p, p + 1);
        let mut d_in_flux = DMatrix::zeros(p + 1, p + 1);
        for (j, i) in iproduct!(0..p + 1, 0..p) {
            sol_to_flux[(j, i)] = lagrange(flux_pts[j], &sol_pts, i);
            flux_to_sol[(i, j)] = lagrange(sol_pts[i], &flux_pts, j);
        }
        for (i, j) in iproduct!(0..p + 1, 0..p + 1) {
            d_in_flux[(i, j)] = d_lagrange(flux_pts[i], &flux_pts, j);
        }
        info!(
            "spectral difference operator: {} cells, {} solution points per cell, c = {}",
            n_cell, p, c
        );

        Ok(SpectralDifference {
            mesh,
            p,
            c,
            n_cell,
            sol_pts,
            flux_pts,
            sol_to_flux,
            flux_to_sol,
            d_in_flux,
        })
    }

    /// total number of degrees of freedom
    pub fn n_dof(&self) -> usize {
        self.n_cell * self.p
    }

    /// physical coordinates of every solution point, cell by cell
    pub fn solution_points(&self) -> DVector<f64> {
        let mut points = DVector::zeros(self.n_dof());
        for i in 0..self.n_cell {
            let left = self.mesh[i];
            let width = self.mesh[i + 1] - self.mesh[i];
            for j in 0..self.p {
                points[i * self.p + j] = left + width * (self.sol_pts[j] + 1.0) / 2.0;
            }
        }
        points
    }

    /// evaluate du/dt for the current state; the time argument is unused but
    /// kept so the operator matches the solver's rhs callback signature
    pub fn rhs(&self, _t: f64, y: &DVector<f64>) -> DVector<f64> {
        let p = self.p;
        let n_cell = self.n_cell;
        assert_eq!(y.len(), self.n_dof(), "state length must equal n_cell * p");

        // solution scaled by the reference-cell map, then moved to flux points
        let mut sol_in_sol_point = DVector::zeros(n_cell * p);
        for i in 0..n_cell {
            let scale = 2.0 / (self.mesh[i + 1] - self.mesh[i]);
            for j in 0..p {
                sol_in_sol_point[i * p + j] = scale * y[i * p + j];
            }
        }
        let mut flux_in_flux_point = DVector::zeros(n_cell * (p + 1));
        for i in 0..n_cell {
            let local = sol_in_sol_point.rows(i * p, p).clone_owned();
            let local_in_flux = &self.sol_to_flux * &local;
            for j in 0..p + 1 {
                flux_in_flux_point[i * (p + 1) + j] = -self.c * local_in_flux[j];
            }
        }

        // flux continuity at the interfaces, upwinded, periodic wraparound
        if self.c > 0.0 {
            for i in 0..n_cell {
                let prev = if i == 0 { n_cell - 1 } else { i - 1 };
                flux_in_flux_point[i * (p + 1)] = flux_in_flux_point[prev * (p + 1) + p];
            }
        } else {
            for i in 0..n_cell {
                let next = if i + 1 == n_cell { 0 } else { i + 1 };
                flux_in_flux_point[i * (p + 1) + p] = flux_in_flux_point[next * (p + 1)];
            }
        }

        // differentiate in flux space and come back to the solution points
        let mut rhs_in_sol_point = DVector::zeros(n_cell * p);
        for i in 0..n_cell {
            let local = flux_in_flux_point.rows(i * (p + 1), p + 1).clone_owned();
            let derivative = &self.d_in_flux * &local;
            let back = &self.flux_to_sol * derivative;
            for j in 0..p {
                rhs_in_sol_point[i * p + j] = back[j];
            }
        }
        rhs_in_sol_point
    }

    /// jacobian of the right-hand side; the operator is linear and autonomous,
    /// so the matrix is constant and assembled column by column
    pub fn jac(&self) -> DMatrix<f64> {
        let n = self.n_dof();
        let mut jacobian = DMatrix::zeros(n, n);
        let mut e = DVector::zeros(n);
        for j in 0..n {
            e[j] = 1.0;
            jacobian.set_column(j, &self.rhs(0.0, &e));
            e[j] = 0.0;
        }
        jacobian
    }

    /// consume the operator into a boxed rhs callback for the ODE solvers
    pub fn rhs_closure(self) -> Box<dyn Fn(f64, &DVector<f64>) -> DVector<f64>> {
        Box::new(move |t, y| self.rhs(t, y))
    }
}
