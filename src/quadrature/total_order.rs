//! Quadrature rules parametrized by polynomial total-order accuracy.
use crate::quadrature::{convert_quadrature_rule_from_2d_f64, QuadratureError, QuadraturePair2d};
use crate::Real;

/// A rule on the reference triangle `(-1, -1), (1, -1), (-1, 1)` that integrates polynomials of
/// total degree `strength` exactly.
pub fn triangle<T: Real>(strength: usize) -> Result<QuadraturePair2d<T>, QuadratureError> {
    let rule = surfload_quadrature::triangle::total_order(strength)?;
    Ok(convert_quadrature_rule_from_2d_f64(rule))
}
