//! Symmetric quadrature rules on the reference triangle `(-1, -1), (1, -1), (-1, 1)`.
//!
//! The rules are tabulated in barycentric coordinates with weights normalized to sum to one,
//! and mapped onto the reference triangle (of area 2) when requested.

use crate::{Error, Point2, Rule2d};

/// The highest polynomial degree for which a triangle rule is available.
pub const MAX_STRENGTH: usize = 5;

/// A symmetry orbit of points in barycentric coordinates.
enum Orbit {
    /// The centroid `(1/3, 1/3, 1/3)`.
    Centroid { weight: f64 },
    /// The three permutations of `(a, a, 1 - 2a)`.
    Permutations3 { a: f64, weight: f64 },
}

const STRENGTH_1: &[Orbit] = &[Orbit::Centroid { weight: 1.0 }];

const STRENGTH_2: &[Orbit] = &[Orbit::Permutations3 {
    a: 1.0 / 6.0,
    weight: 1.0 / 3.0,
}];

// Dunavant (1985), degree 4, 6 points with positive weights
const STRENGTH_4: &[Orbit] = &[
    Orbit::Permutations3 {
        a: 0.445948490915965,
        weight: 0.223381589678011,
    },
    Orbit::Permutations3 {
        a: 0.091576213509771,
        weight: 0.109951743655322,
    },
];

// Dunavant (1985), degree 5, 7 points
const STRENGTH_5: &[Orbit] = &[
    Orbit::Centroid { weight: 0.225 },
    Orbit::Permutations3 {
        a: 0.470142064105115,
        weight: 0.132394152788506,
    },
    Orbit::Permutations3 {
        a: 0.101286507323456,
        weight: 0.125939180544827,
    },
];

/// Maps barycentric coordinates associated with the vertices `(-1, -1), (1, -1), (-1, 1)`
/// to reference coordinates.
fn reference_point(l1: f64, l2: f64) -> Point2 {
    [2.0 * l1 - 1.0, 2.0 * l2 - 1.0]
}

/// A quadrature rule for the reference triangle that integrates polynomials of total degree
/// up to `strength` exactly.
///
/// The returned rule may be stronger than requested: strength 3 is served by the degree 4 rule.
///
/// # Errors
///
/// Returns [`Error::NoRuleAvailable`] if `strength` is zero or exceeds [`MAX_STRENGTH`].
pub fn total_order(strength: usize) -> Result<Rule2d, Error> {
    let orbits = match strength {
        1 => STRENGTH_1,
        2 => STRENGTH_2,
        3 | 4 => STRENGTH_4,
        5 => STRENGTH_5,
        _ => return Err(Error::NoRuleAvailable),
    };

    // Normalized weights sum to one, the reference triangle has area 2
    let area = 2.0;
    let mut weights = Vec::new();
    let mut points = Vec::new();
    for orbit in orbits {
        match *orbit {
            Orbit::Centroid { weight } => {
                weights.push(area * weight);
                points.push(reference_point(1.0 / 3.0, 1.0 / 3.0));
            }
            Orbit::Permutations3 { a, weight } => {
                let b = 1.0 - 2.0 * a;
                for (l1, l2) in [(a, a), (a, b), (b, a)] {
                    weights.push(area * weight);
                    points.push(reference_point(l1, l2));
                }
            }
        }
    }

    Ok((weights, points))
}
