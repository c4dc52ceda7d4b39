extern crate nalgebra as na;

use na::{DVector, Scalar};
use num_traits::Float;
use std::error::Error;
use std::fmt::{self, Debug, Display};

/// fatal configuration errors, raised before any stepping begins
#[derive(Debug, Clone, PartialEq)]
pub enum GearError {
    /// requested order is outside the supported range 1..6
    UnsupportedOrder(usize),
    /// the time grid is too short for the requested order: at least order + 1 points are needed
    GridTooShort { order: usize, length: usize },
    EmptyInitialState,
    NonFiniteInitialState,
}

impl Display for GearError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GearError::UnsupportedOrder(order) => {
                write!(f, "Gear methods exist only for orders 1..6, got {}", order)
            }
            GearError::GridTooShort { order, length } => write!(
                f,
                "time grid of length {} is too short for order {}: at least {} points are needed",
                length,
                order,
                order + 1
            ),
            GearError::EmptyInitialState => write!(f, "initial state `y0` must not be empty"),
            GearError::NonFiniteInitialState => {
                write!(f, "all components of the initial state `y0` must be finite")
            }
        }
    }
}

impl Error for GearError {}

/// validate the initial state and turn it into a column vector
pub fn check_arguments<T>(y0: &[T]) -> Result<DVector<T>, GearError>
where
    T: Float + Scalar + Debug,
{
    if y0.is_empty() {
        return Err(GearError::EmptyInitialState);
    }
    if y0.iter().any(|x| !x.is_finite()) {
        return Err(GearError::NonFiniteInitialState);
    }
    Ok(DVector::from_column_slice(y0))
}

/// RMS norm used for Newton convergence tests
pub fn norm(vector: &DVector<f64>) -> f64 {
    vector.norm() / (vector.len() as f64).sqrt()
}
