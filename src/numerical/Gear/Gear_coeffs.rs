//! # Gear (BDF) coefficient tables
//!
//! The k-step Gear method advances the solution through the implicit relation
//!
//! ```text
//! y_{n+k} = Σ(m=0 to k-1) c_m y_{n+m} + β h f(t_{n+k}, y_{n+k})
//! ```
//!
//! so each step requires the root of the residual
//!
//! ```text
//! R(u) = u - Σ(m=0 to k-1) c_m y_{n+m} - β h f(t_{n+k}, u)
//! ```
//!
//! The weights `c_m` (oldest sample first) and `β` are fixed rational numbers,
//! one row per order k = 1..6. Order 1 is the backward Euler scheme, order 2
//! the classic Gear-2 method; orders above 6 are zero-unstable and do not
//! exist as usable BDF schemes.
//!
//! The table is compiled-in data and never mutated at runtime.

/// coefficients of a single k-step Gear scheme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GearCoeffs {
    pub order: usize,
    /// weights of the k previous samples, oldest first
    pub history: &'static [f64],
    /// weight of the h*f(t_new, u) term
    pub beta: f64,
}

pub const GEAR_TABLE: [GearCoeffs; 6] = [
    GearCoeffs {
        order: 1,
        history: &[1.0],
        beta: 1.0,
    },
    GearCoeffs {
        order: 2,
        history: &[-1.0 / 3.0, 4.0 / 3.0],
        beta: 2.0 / 3.0,
    },
    GearCoeffs {
        order: 3,
        history: &[2.0 / 11.0, -9.0 / 11.0, 18.0 / 11.0],
        beta: 6.0 / 11.0,
    },
    GearCoeffs {
        order: 4,
        history: &[-3.0 / 25.0, 16.0 / 25.0, -36.0 / 25.0, 48.0 / 25.0],
        beta: 12.0 / 25.0,
    },
    GearCoeffs {
        order: 5,
        history: &[
            12.0 / 137.0,
            -75.0 / 137.0,
            200.0 / 137.0,
            -300.0 / 137.0,
            300.0 / 137.0,
        ],
        beta: 60.0 / 137.0,
    },
    GearCoeffs {
        order: 6,
        history: &[
            -10.0 / 147.0,
            72.0 / 147.0,
            -225.0 / 147.0,
            400.0 / 147.0,
            -450.0 / 147.0,
            360.0 / 147.0,
        ],
        beta: 60.0 / 147.0,
    },
];

/// returns the coefficient row for the requested order, None if the order is not in 1..6
pub fn gear_coeffs(order: usize) -> Option<&'static GearCoeffs> {
    if (1..=GEAR_TABLE.len()).contains(&order) {
        Some(&GEAR_TABLE[order - 1])
    } else {
        None
    }
}
