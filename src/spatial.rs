//! spatial discretization operators turning a PDE into an ODE system y' = f(t, y)
/// Lagrange basis polynomial evaluation and derivative
pub mod lagrange;
/// spectral difference method for the 1D transport equation
pub mod SD_method;
