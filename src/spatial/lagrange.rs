//! Lagrange basis polynomials on an arbitrary set of interpolation points.
//!
//! The basis is defined by `L_i(points[j]) = δ_ij`; the spectral difference
//! operator uses these functions to build its transfer and differentiation
//! matrices once at construction. No state, plain scalar math.

/// evaluate in `x` the `i`-th Lagrange basis polynomial on `interpolation_points`
pub fn lagrange(x: f64, interpolation_points: &[f64], i: usize) -> f64 {
    let xi = interpolation_points[i];
    let mut val = 1.0;
    for (j, &xj) in interpolation_points.iter().enumerate() {
        if j != i {
            val *= (x - xj) / (xi - xj);
        }
    }
    val
}

/// evaluate in `x` the derivative of the `i`-th Lagrange basis polynomial on `interpolation_points`
pub fn d_lagrange(x: f64, interpolation_points: &[f64], i: usize) -> f64 {
    let xi = interpolation_points[i];
    let others: Vec<f64> = interpolation_points
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != i)
        .map(|(_, &xj)| xj)
        .collect();
    // d/dx Π (x - x_j) = Σ_k Π_{m != k} (x - x_m)
    let mut numerator = 0.0;
    for k in 0..others.len() {
        let mut prod = 1.0;
        for (m, &xm) in others.iter().enumerate() {
            if m != k {
                prod *= x - xm;
            }
        }
        numerator += prod;
    }
    let mut denominator = 1.0;
    for &xj in others.iter() {
        denominator *= xi - xj;
    }
    numerator / denominator
}
