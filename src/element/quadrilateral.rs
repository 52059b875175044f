use crate::element::{FixedNodesReferenceElement, ReferenceFiniteElement, SurfaceFiniteElement};
use crate::Real;
use nalgebra::{Matrix1x4, Matrix2x4, Matrix3x2, Point2, Point3, SMatrix, Vector2};
use numeric_literals::replace_float_literals;

/// Bilinear basis functions on the reference quadrilateral `[-1, 1]^2`.
#[rustfmt::skip]
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn quad4_basis<T: Real>(xi: &Point2<T>) -> Matrix1x4<T> {
    // N_{alpha, beta} is one at the corner (alpha, beta) with alpha, beta = 1 or -1
    let phi = |alpha: T, beta: T| (1.0 + alpha * xi.x) * (1.0 + beta * xi.y) / 4.0;
    Matrix1x4::new(
        phi(-1.0, -1.0),
        phi( 1.0, -1.0),
        phi( 1.0,  1.0),
        phi(-1.0,  1.0),
    )
}

/// A surface element with bilinear basis functions on a quadrilateral, in three dimensions.
///
/// The four vertices need not be coplanar, in which case the surface is a bilinear patch.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quad4d3Element<T: Real> {
    vertices: [Point3<T>; 4],
}

impl<T: Real> Quad4d3Element<T> {
    pub fn from_vertices(vertices: [Point3<T>; 4]) -> Self {
        Self { vertices }
    }
}

impl<T: Real> FixedNodesReferenceElement<T, 4> for Quad4d3Element<T> {
    fn evaluate_basis(&self, xi: &Point2<T>) -> Matrix1x4<T> {
        quad4_basis(xi)
    }

    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn gradients(&self, xi: &Point2<T>) -> Matrix2x4<T> {
        let phi_grad = |alpha: T, beta: T| Vector2::new(
            alpha * (1.0 + beta * xi.y) / 4.0,
            beta * (1.0 + alpha * xi.x) / 4.0,
        );
        Matrix2x4::from_columns(&[
            phi_grad(-1.0, -1.0),
            phi_grad( 1.0, -1.0),
            phi_grad( 1.0,  1.0),
            phi_grad(-1.0,  1.0),
        ])
    }
}

impl_surface_finite_element_for_fixed!(Quad4d3Element, 4);

/// Reference coordinates of the nodes of the 9-node quadrilateral. The 8-node quadrilateral uses
/// the first eight.
#[rustfmt::skip]
const QUAD9_NODES: [(f64, f64); 9] = [
    (-1.0, -1.0), ( 1.0, -1.0), ( 1.0,  1.0), (-1.0,  1.0),
    ( 0.0, -1.0), ( 1.0,  0.0), ( 0.0,  1.0), (-1.0,  0.0),
    ( 0.0,  0.0),
];

fn quad_node<T: Real>(index: usize) -> (T, T) {
    let (a, b) = QUAD9_NODES[index];
    (
        T::from_f64(a).expect("Literal must fit in T"),
        T::from_f64(b).expect("Literal must fit in T"),
    )
}

/// A surface element with quadratic serendipity basis functions on a quadrilateral.
///
/// Nodes 4 through 7 are the midpoints of the edges (0, 1), (1, 2), (2, 3) and (3, 0).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quad8d3Element<T: Real> {
    vertices: [Point3<T>; 8],
}

impl<T: Real> Quad8d3Element<T> {
    pub fn from_vertices(vertices: [Point3<T>; 8]) -> Self {
        Self { vertices }
    }
}

impl<'a, T: Real> From<&'a Quad4d3Element<T>> for Quad8d3Element<T> {
    fn from(quad4: &'a Quad4d3Element<T>) -> Self {
        let [a, b, c, d] = quad4.vertices;
        let midpoint = |p: Point3<T>, q: Point3<T>| nalgebra::center(&p, &q);
        Self::from_vertices([a, b, c, d, midpoint(a, b), midpoint(b, c), midpoint(c, d), midpoint(d, a)])
    }
}

impl<T: Real> FixedNodesReferenceElement<T, 8> for Quad8d3Element<T> {
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn evaluate_basis(&self, xi: &Point2<T>) -> SMatrix<T, 1, 8> {
        let (x, y) = (xi.x, xi.y);
        SMatrix::<T, 1, 8>::from_fn(|_, i| {
            let (a, b) = quad_node::<T>(i);
            if i < 4 {
                (1.0 + a * x) * (1.0 + b * y) * (a * x + b * y - 1.0) / 4.0
            } else if a == 0.0 {
                (1.0 - x * x) * (1.0 + b * y) / 2.0
            } else {
                (1.0 + a * x) * (1.0 - y * y) / 2.0
            }
        })
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn gradients(&self, xi: &Point2<T>) -> SMatrix<T, 2, 8> {
        let (x, y) = (xi.x, xi.y);
        let mut gradients = SMatrix::<T, 2, 8>::zeros();
        for i in 0..8 {
            let (a, b) = quad_node::<T>(i);
            let g = if i < 4 {
                Vector2::new(
                    a * (1.0 + b * y) * (2.0 * a * x + b * y) / 4.0,
                    b * (1.0 + a * x) * (a * x + 2.0 * b * y) / 4.0,
                )
            } else if a == 0.0 {
                Vector2::new(-x * (1.0 + b * y), b * (1.0 - x * x) / 2.0)
            } else {
                Vector2::new(a * (1.0 - y * y) / 2.0, -y * (1.0 + a * x))
            };
            gradients.set_column(i, &g);
        }
        gradients
    }
}

impl_surface_finite_element_for_fixed!(Quad8d3Element, 8);

/// One-dimensional quadratic Lagrange polynomial on `[-1, 1]` that is one at the node `alpha`
/// (one of -1, 0, 1) and zero at the other two nodes, together with its derivative.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn lagrange_1d<T: Real>(alpha: T, x: T) -> (T, T) {
    if alpha == 0.0 {
        (1.0 - x * x, -2.0 * x)
    } else {
        (x * (x + alpha) / 2.0, (2.0 * x + alpha) / 2.0)
    }
}

/// A surface element with biquadratic Lagrange basis functions on a quadrilateral.
///
/// Nodes are ordered as for [`Quad8d3Element`], with node 8 at the center of the element.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quad9d3Element<T: Real> {
    vertices: [Point3<T>; 9],
}

impl<T: Real> Quad9d3Element<T> {
    pub fn from_vertices(vertices: [Point3<T>; 9]) -> Self {
        Self { vertices }
    }
}

impl<'a, T: Real> From<&'a Quad4d3Element<T>> for Quad9d3Element<T> {
    fn from(quad4: &'a Quad4d3Element<T>) -> Self {
        let quad8 = Quad8d3Element::from(quad4);
        let v = quad8.vertices;
        let center = nalgebra::center(&v[4], &v[6]);
        Self::from_vertices([v[0], v[1], v[2], v[3], v[4], v[5], v[6], v[7], center])
    }
}

impl<T: Real> FixedNodesReferenceElement<T, 9> for Quad9d3Element<T> {
    fn evaluate_basis(&self, xi: &Point2<T>) -> SMatrix<T, 1, 9> {
        SMatrix::<T, 1, 9>::from_fn(|_, i| {
            let (a, b) = quad_node::<T>(i);
            lagrange_1d(a, xi.x).0 * lagrange_1d(b, xi.y).0
        })
    }

    fn gradients(&self, xi: &Point2<T>) -> SMatrix<T, 2, 9> {
        SMatrix::<T, 2, 9>::from_fn(|row, i| {
            let (a, b) = quad_node::<T>(i);
            let (phi_x, dphi_x) = lagrange_1d(a, xi.x);
            let (phi_y, dphi_y) = lagrange_1d(b, xi.y);
            if row == 0 {
                dphi_x * phi_y
            } else {
                phi_x * dphi_y
            }
        })
    }
}

impl_surface_finite_element_for_fixed!(Quad9d3Element, 9);
