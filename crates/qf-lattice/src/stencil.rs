//! Periodic finite-difference stencils.

/// Writes the periodic second difference of `field` into `out`.
///
/// `out[i] = (field[i+1] + field[i-1] - 2 field[i]) / dx^2` with indices taken
/// modulo `N`. The neighbour sum is formed first so that sites mirrored about
/// any grid point see bit-identical arithmetic.
pub fn laplacian_into(field: &[f64], dx: f64, out: &mut [f64]) {
    debug_assert_eq!(field.len(), out.len());
    let n = field.len();
    if n == 0 {
        return;
    }
    let inv_dx2 = 1.0 / (dx * dx);
    for i in 0..n {
        let left = field[(i + n - 1) % n];
        let right = field[(i + 1) % n];
        out[i] = ((right + left) - 2.0 * field[i]) * inv_dx2;
    }
}

/// Allocating variant of [`laplacian_into`].
pub fn laplacian(field: &[f64], dx: f64) -> Vec<f64> {
    let mut out = vec![0.0; field.len()];
    laplacian_into(field, dx, &mut out);
    out
}

/// Writes the periodic central difference `(field[i+1] - field[i-1]) / 2dx`.
pub fn gradient_into(field: &[f64], dx: f64, out: &mut [f64]) {
    debug_assert_eq!(field.len(), out.len());
    let n = field.len();
    if n == 0 {
        return;
    }
    let inv_2dx = 1.0 / (2.0 * dx);
    for i in 0..n {
        out[i] = (field[(i + 1) % n] - field[(i + n - 1) % n]) * inv_2dx;
    }
}

/// Allocating variant of [`gradient_into`].
pub fn gradient(field: &[f64], dx: f64) -> Vec<f64> {
    let mut out = vec![0.0; field.len()];
    gradient_into(field, dx, &mut out);
    out
}
