//! Quadrature rules for the one-dimensional domain `[-1, 1]`.

use crate::Rule1d;
use std::f64::consts::PI;

/// Maximum number of Newton iterations used to locate a single Legendre root.
const MAX_NEWTON_ITERATIONS: usize = 100;

/// Evaluates the Legendre polynomial `P_n` and its derivative at `x`.
///
/// The derivative is computed with the identity
///  `(x^2 - 1) P_n'(x) = n (x P_n(x) - P_{n - 1}(x))`,
/// which is singular at `|x| == 1`. Only use for `x` in the open interval `(-1, 1)`.
fn legendre_with_derivative(n: usize, x: f64) -> (f64, f64) {
    // Bonnet's recursion: m P_m = (2m - 1) x P_{m - 1} - (m - 1) P_{m - 2}
    let mut p_current = 1.0;
    let mut p_previous = 0.0;
    for m in 1..=n {
        let m = m as f64;
        let p_next = ((2.0 * m - 1.0) * x * p_current - (m - 1.0) * p_previous) / m;
        p_previous = p_current;
        p_current = p_next;
    }
    let derivative = n as f64 * (x * p_current - p_previous) / (x * x - 1.0);
    (p_current, derivative)
}

/// Gauss-Legendre quadrature on `[-1, 1]` with the given number of points.
///
/// A rule with `n` points integrates polynomials of degree up to `2n - 1` exactly.
/// Points are returned in ascending order.
///
/// # Panics
///
/// Panics if zero points are requested.
pub fn gauss(num_points: usize) -> Rule1d {
    let n = num_points;
    assert!(n > 0, "number of points must be positive");

    let mut points = vec![[0.0]; n];
    let mut weights = vec![0.0; n];

    // Roots are symmetric about the origin, so only the non-negative half is located
    let num_unique = (n + 1) / 2;
    for i in 0..num_unique {
        // Chebyshev-like initial guess for the i-th largest root
        let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        let mut dp = legendre_with_derivative(n, x).1;
        for _ in 0..MAX_NEWTON_ITERATIONS {
            let (p, derivative) = legendre_with_derivative(n, x);
            let dx = p / derivative;
            x -= dx;
            dp = derivative;
            if dx.abs() <= 1e-15 {
                dp = legendre_with_derivative(n, x).1;
                break;
            }
        }

        let w = 2.0 / ((1.0 - x * x) * dp * dp);
        // Largest roots go to the back, their mirror images to the front
        points[n - 1 - i] = [x];
        weights[n - 1 - i] = w;
        points[i] = [-x];
        weights[i] = w;
    }

    // The middle point of an odd rule is exactly the origin
    if n % 2 == 1 {
        points[n / 2] = [0.0];
    }

    (weights, points)
}
