//! Quadrature rules for the reference domains of surface finite elements.
//!
//! All rules are given in `f64`. The reference quadrilateral is `[-1, 1]^2` and the reference
//! triangle is the triangle with corners `(-1, -1)`, `(1, -1)` and `(-1, 1)`, so that the
//! weights of a rule sum to `4` and `2`, respectively.
//!
//! The rules in this crate are independent of `surfload` and can be used on their own.

use std::fmt;
use std::fmt::{Display, Formatter};

pub mod tensor;
pub mod triangle;
pub mod univariate;

/// Library-wide error type.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Indicates that a rule satisfying the given requirements is not available.
    NoRuleAvailable,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRuleAvailable => {
                write!(f, "There is no quadrature rule satisfying the requirements available")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A D-dimensional point.
pub type Point<const D: usize> = [f64; D];

/// A two-dimensional point.
pub type Point2 = Point<2>;

/// A D-dimensional rule, given as a pair of weights and points.
pub type Rule<const D: usize> = (Vec<f64>, Vec<Point<D>>);

/// A one-dimensional rule.
pub type Rule1d = Rule<1>;

/// A two-dimensional quadrature rule.
pub type Rule2d = Rule<2>;

/// Approximates the integral of `f` with the given rule.
pub fn integrate<const D: usize>(rule: &Rule<D>, f: impl Fn(&Point<D>) -> f64) -> f64 {
    let (weights, points) = rule;
    weights
        .iter()
        .zip(points)
        .map(|(w, x)| w * f(x))
        .sum()
}
