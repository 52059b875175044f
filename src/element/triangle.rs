use crate::element::{FixedNodesReferenceElement, ReferenceFiniteElement, SurfaceFiniteElement};
use crate::Real;
use nalgebra::{Matrix1x3, Matrix1x6, Matrix2x3, Matrix2x6, Matrix3x2, Point2, Point3, SMatrix, Vector2};
use numeric_literals::replace_float_literals;

/// Linear basis functions on the reference triangle `(-1, -1), (1, -1), (-1, 1)`.
#[rustfmt::skip]
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn tri3_basis<T: Real>(xi: &Point2<T>) -> Matrix1x3<T> {
    Matrix1x3::new(
        -0.5 * xi.x - 0.5 * xi.y,
        0.5 * xi.x + 0.5,
        0.5 * xi.y + 0.5,
    )
}

#[rustfmt::skip]
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn tri3_gradients<T: Real>() -> Matrix2x3<T> {
    Matrix2x3::from_columns(&[
        Vector2::new(-0.5, -0.5),
        Vector2::new(0.5, 0.0),
        Vector2::new(0.0, 0.5),
    ])
}

/// A surface element with linear basis functions on a triangle, in three dimensions.
///
/// The reference element is the triangle with corners (-1, -1), (1, -1), (-1, 1).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tri3d3Element<T: Real> {
    vertices: [Point3<T>; 3],
}

impl<T: Real> Tri3d3Element<T> {
    pub fn from_vertices(vertices: [Point3<T>; 3]) -> Self {
        Self { vertices }
    }
}

impl<T: Real> FixedNodesReferenceElement<T, 3> for Tri3d3Element<T> {
    fn evaluate_basis(&self, xi: &Point2<T>) -> Matrix1x3<T> {
        tri3_basis(xi)
    }

    fn gradients(&self, _xi: &Point2<T>) -> Matrix2x3<T> {
        tri3_gradients()
    }
}

impl_surface_finite_element_for_fixed!(Tri3d3Element, 3);

/// A surface element with quadratic basis functions on a triangle, in three dimensions.
///
/// Nodes 3, 4 and 5 sit on the edges (0, 1), (1, 2) and (2, 0). The geometry is interpolated with
/// the quadratic basis, so edges may be curved.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tri6d3Element<T: Real> {
    vertices: [Point3<T>; 6],
}

impl<T: Real> Tri6d3Element<T> {
    pub fn from_vertices(vertices: [Point3<T>; 6]) -> Self {
        Self { vertices }
    }
}

impl<'a, T: Real> From<&'a Tri3d3Element<T>> for Tri6d3Element<T> {
    fn from(tri3: &'a Tri3d3Element<T>) -> Self {
        let [a, b, c] = tri3.vertices;
        let midpoint = |p: Point3<T>, q: Point3<T>| nalgebra::center(&p, &q);
        Self::from_vertices([a, b, c, midpoint(a, b), midpoint(b, c), midpoint(c, a)])
    }
}

impl<T: Real> FixedNodesReferenceElement<T, 6> for Tri6d3Element<T> {
    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn evaluate_basis(&self, xi: &Point2<T>) -> Matrix1x6<T> {
        // Quadratic basis functions as products of the linear ones
        let psi = tri3_basis(xi);
        Matrix1x6::from_row_slice(&[
            psi[0] * (2.0 * psi[0] - 1.0),
            psi[1] * (2.0 * psi[1] - 1.0),
            psi[2] * (2.0 * psi[2] - 1.0),
            4.0 * psi[0] * psi[1],
            4.0 * psi[1] * psi[2],
            4.0 * psi[2] * psi[0],
        ])
    }

    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn gradients(&self, xi: &Point2<T>) -> Matrix2x6<T> {
        let psi = tri3_basis(xi);
        let g: Matrix2x3<T> = tri3_gradients();

        let corner = |i: usize| g.column(i) * (4.0 * psi[i] - 1.0);
        let edge = |i: usize, j: usize| g.column(i) * (4.0 * psi[j]) + g.column(j) * (4.0 * psi[i]);

        Matrix2x6::from_columns(&[
            corner(0),
            corner(1),
            corner(2),
            edge(0, 1),
            edge(1, 2),
            edge(2, 0),
        ])
    }
}

impl_surface_finite_element_for_fixed!(Tri6d3Element, 6);
