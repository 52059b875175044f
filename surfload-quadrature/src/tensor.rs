//! Quadrature rules on the reference quadrilateral formed as tensor products of 1D rules.

use crate::univariate::gauss;
use crate::Rule2d;

/// The largest supported number of points per dimension.
pub const MAX_POINTS_PER_DIM: usize = 64;

/// A Gauss quadrature rule for the reference quadrilateral `[-1, 1]^2`.
///
/// The rule is the tensor product of two 1D Gauss rules with `num_points_per_dim` points each.
/// Points are ordered with the second coordinate varying fastest.
///
/// # Panics
///
/// Panics if `num_points_per_dim` is zero or exceeds [`MAX_POINTS_PER_DIM`].
pub fn quadrilateral_gauss(num_points_per_dim: usize) -> Rule2d {
    assert!(
        num_points_per_dim <= MAX_POINTS_PER_DIM,
        "number of points per dimension must not exceed {MAX_POINTS_PER_DIM}"
    );
    let (weights1d, points1d) = gauss(num_points_per_dim);
    let n = weights1d.len();

    let mut weights = Vec::with_capacity(n * n);
    let mut points = Vec::with_capacity(n * n);
    for (wx, [x]) in weights1d.iter().zip(&points1d) {
        for (wy, [y]) in weights1d.iter().zip(&points1d) {
            weights.push(wx * wy);
            points.push([*x, *y]);
        }
    }

    (weights, points)
}
