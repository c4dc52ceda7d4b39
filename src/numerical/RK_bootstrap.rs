use nalgebra::DVector;

/// Classic 4th order Runge-Kutta pass over a prefix of the time grid.
///
/// Implicit multistep methods of order k need k already known samples before
/// the recursion can start; this routine produces them from the initial value
/// alone. Returns one sample per grid point, `out[0] = y0`. The grid may be
/// non-uniform, each step uses its own spacing.
///
/// The accuracy of this phase floors the effective order of the whole
/// integration for k > 4; that is a property of the method family, not
/// corrected here.
pub fn rk4_bootstrap(
    y0: &DVector<f64>,
    t: &[f64],
    fun: &dyn Fn(f64, &DVector<f64>) -> DVector<f64>,
) -> Vec<DVector<f64>> {
    let mut out: Vec<DVector<f64>> = Vec::with_capacity(t.len());
    out.push(y0.clone());
    for i in 0..t.len().saturating_sub(1) {
        let h = t[i + 1] - t[i];
        let y = &out[i];
        let k1 = fun(t[i], y);
        let k2 = fun(t[i] + 0.5 * h, &(y + 0.5 * h * &k1));
        let k3 = fun(t[i] + 0.5 * h, &(y + 0.5 * h * &k2));
        let k4 = fun(t[i] + h, &(y + h * &k3));
        let y_next = y + (h / 6.0) * (k1 + 2.0 * k2 + 2.0 * k3 + k4);
        out.push(y_next);
    }
    out
}
