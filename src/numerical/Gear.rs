/// SOLVER OF IVP BY FIXED-ORDER IMPLICIT MULTISTEP (GEAR) METHODS
/// rewrite to Rust of the classic BDF schemes of orders 1..6
pub mod Gear_solver;
/// static table of Gear (BDF) coefficients for every supported order
pub mod Gear_coeffs;
/// some utilities and error taxonomy for the Gear solver
pub mod common;
/// api for Gear solver
pub mod Gear_api;
