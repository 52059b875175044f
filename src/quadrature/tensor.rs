use crate::quadrature::{convert_quadrature_rule_from_2d_f64, QuadratureError, QuadraturePair2d};
use crate::Real;

use surfload_quadrature::tensor;

pub use surfload_quadrature::tensor::MAX_POINTS_PER_DIM;

/// Tensor-product Gauss rule on the reference quadrilateral `[-1, 1]^2`.
///
/// A rule with `n` points per direction integrates polynomials of degree `2n - 1` in each
/// variable exactly.
///
/// # Errors
///
/// Returns [`QuadratureError::NoRuleAvailable`] if `num_points_per_dim` is zero or exceeds
/// [`MAX_POINTS_PER_DIM`].
pub fn quadrilateral_gauss<T: Real>(num_points_per_dim: usize) -> Result<QuadraturePair2d<T>, QuadratureError> {
    if num_points_per_dim == 0 || num_points_per_dim > MAX_POINTS_PER_DIM {
        return Err(QuadratureError::NoRuleAvailable);
    }
    Ok(convert_quadrature_rule_from_2d_f64(tensor::quadrilateral_gauss(
        num_points_per_dim,
    )))
}
