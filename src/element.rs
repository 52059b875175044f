//! Isoparametric surface finite elements embedded in three dimensions.
//!
//! Every element maps a two-dimensional reference domain onto a (possibly curved) surface in
//! 3D. The Jacobian of this map is a 3x2 matrix whose columns are the tangent vectors along the
//! two reference coordinate directions.
use crate::connectivity::{InterpolationOrder, ReferenceShape, SurfaceGeometryType};
use crate::distance::Distance;
use crate::error::GeometryError;
use crate::Real;
use itertools::Itertools;
use nalgebra::{Matrix3x2, Point2, Point3, SMatrix, Vector3};
use std::convert::TryFrom;

/// Reference elements with a number of nodes fixed at compile-time.
pub trait FixedNodesReferenceElement<T: Real, const N: usize> {
    /// Evaluates each basis function at the given reference coordinates. The result is given
    /// in a row vector where each entry is the value of the corresponding basis function.
    fn evaluate_basis(&self, xi: &Point2<T>) -> SMatrix<T, 1, N>;

    /// Construct a matrix whose columns are the reference gradients of each basis function.
    fn gradients(&self, xi: &Point2<T>) -> SMatrix<T, 2, N>;
}

/// The cross product `t0 x t1` of the tangents given by the columns of a surface Jacobian.
///
/// Its length is the local ratio between physical and reference area.
pub fn surface_normal<T: Real>(jacobian: &Matrix3x2<T>) -> Vector3<T> {
    jacobian.column(0).cross(&jacobian.column(1))
}

pub trait ReferenceFiniteElement<T: Real> {
    /// Returns the number of nodes in the element.
    fn num_nodes(&self) -> usize;

    /// Evaluates each basis function at the given reference coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `basis_values` does not have exactly one entry per node.
    fn populate_basis(&self, basis_values: &mut [T], reference_coords: &Point2<T>);
}

pub trait SurfaceFiniteElement<T: Real>: ReferenceFiniteElement<T> {
    fn vertices(&self) -> &[Point3<T>];

    /// Compute the Jacobian of the transformation from the reference element to the given
    /// element at the given reference coordinates.
    ///
    /// Column `k` is the derivative of the physical position with respect to the `k`-th
    /// reference coordinate.
    fn reference_jacobian(&self, reference_coords: &Point2<T>) -> Matrix3x2<T>;

    /// Maps reference coordinates to physical coordinates on the surface.
    fn map_reference_coords(&self, reference_coords: &Point2<T>) -> Point3<T>;

    /// The normal at the given reference coordinates, scaled by the local area element.
    ///
    /// This is the cross product of the two tangent vectors. Its length is the ratio between
    /// physical and reference area at the point, and it vanishes where the tangents are parallel.
    fn normal(&self, reference_coords: &Point2<T>) -> Vector3<T> {
        surface_normal(&self.reference_jacobian(reference_coords))
    }

    /// The largest distance between any two vertices of the element.
    fn diameter(&self) -> T {
        self.vertices()
            .iter()
            .tuple_combinations()
            .map(|(x, y)| Distance::between(x, y))
            .fold(Distance::zero(), |a, b| if b > a { b } else { a })
            .distance()
    }
}

/// Implements `ReferenceFiniteElement` and `SurfaceFiniteElement` for an element storing its
/// vertices in a fixed-size array and implementing `FixedNodesReferenceElement`.
macro_rules! impl_surface_finite_element_for_fixed {
    ($element:ident, $num_nodes:expr) => {
        impl<T: Real> ReferenceFiniteElement<T> for $element<T> {
            fn num_nodes(&self) -> usize {
                $num_nodes
            }

            fn populate_basis(&self, result: &mut [T], reference_coords: &Point2<T>) {
                let basis_values =
                    <Self as FixedNodesReferenceElement<T, $num_nodes>>::evaluate_basis(self, reference_coords);
                result.copy_from_slice(basis_values.as_slice());
            }
        }

        impl<T: Real> SurfaceFiniteElement<T> for $element<T> {
            fn vertices(&self) -> &[Point3<T>] {
                &self.vertices
            }

            #[allow(non_snake_case)]
            fn reference_jacobian(&self, xi: &Point2<T>) -> Matrix3x2<T> {
                let X = SMatrix::<T, 3, $num_nodes>::from_fn(|i, j| self.vertices[j][i]);
                let G = <Self as FixedNodesReferenceElement<T, $num_nodes>>::gradients(self, xi);
                X * G.transpose()
            }

            #[allow(non_snake_case)]
            fn map_reference_coords(&self, xi: &Point2<T>) -> Point3<T> {
                let X = SMatrix::<T, 3, $num_nodes>::from_fn(|i, j| self.vertices[j][i]);
                let N = <Self as FixedNodesReferenceElement<T, $num_nodes>>::evaluate_basis(self, xi);
                Point3::from(X * N.transpose())
            }
        }
    };
}

mod quadrilateral;
mod triangle;

pub use quadrilateral::*;
pub use triangle::*;

/// Any of the supported surface elements.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SurfaceElement<T: Real> {
    Tri3(Tri3d3Element<T>),
    Tri6(Tri6d3Element<T>),
    Quad4(Quad4d3Element<T>),
    Quad8(Quad8d3Element<T>),
    Quad9(Quad9d3Element<T>),
}

macro_rules! dispatch {
    ($self:expr, $element:ident => $body:expr) => {
        match $self {
            SurfaceElement::Tri3($element) => $body,
            SurfaceElement::Tri6($element) => $body,
            SurfaceElement::Quad4($element) => $body,
            SurfaceElement::Quad8($element) => $body,
            SurfaceElement::Quad9($element) => $body,
        }
    };
}

fn vertex_array<T: Real, const N: usize>(
    geometry_type: SurfaceGeometryType,
    vertices: &[Point3<T>],
) -> Result<[Point3<T>; N], GeometryError> {
    <[Point3<T>; N]>::try_from(vertices).map_err(|_| GeometryError::NodeCountMismatch {
        geometry_type,
        expected: N,
        actual: vertices.len(),
    })
}

impl<T: Real> SurfaceElement<T> {
    /// Constructs the element of the given type from its vertices, in local node order.
    pub fn from_vertices(geometry_type: SurfaceGeometryType, vertices: &[Point3<T>]) -> Result<Self, GeometryError> {
        use SurfaceGeometryType::*;
        let element = match geometry_type {
            Triangle3 => Self::Tri3(Tri3d3Element::from_vertices(vertex_array(geometry_type, vertices)?)),
            Triangle6 => Self::Tri6(Tri6d3Element::from_vertices(vertex_array(geometry_type, vertices)?)),
            Quadrilateral4 => Self::Quad4(Quad4d3Element::from_vertices(vertex_array(geometry_type, vertices)?)),
            Quadrilateral8 => Self::Quad8(Quad8d3Element::from_vertices(vertex_array(geometry_type, vertices)?)),
            Quadrilateral9 => Self::Quad9(Quad9d3Element::from_vertices(vertex_array(geometry_type, vertices)?)),
        };
        Ok(element)
    }

    pub fn geometry_type(&self) -> SurfaceGeometryType {
        match self {
            Self::Tri3(_) => SurfaceGeometryType::Triangle3,
            Self::Tri6(_) => SurfaceGeometryType::Triangle6,
            Self::Quad4(_) => SurfaceGeometryType::Quadrilateral4,
            Self::Quad8(_) => SurfaceGeometryType::Quadrilateral8,
            Self::Quad9(_) => SurfaceGeometryType::Quadrilateral9,
        }
    }

    /// Evaluates the basis functions of the given interpolation order.
    ///
    /// For the order of the geometry, these are the ordinary basis functions of the element. For a
    /// lower order, the basis functions of the linear element spanned by the corner nodes are
    /// returned, so that `basis_values` must have one entry per corner node.
    pub fn populate_basis_of_order(
        &self,
        order: InterpolationOrder,
        basis_values: &mut [T],
        xi: &Point2<T>,
    ) -> Result<(), GeometryError> {
        let geometry_type = self.geometry_type();
        let expected = geometry_type
            .num_nodes_for_order(order)
            .ok_or(GeometryError::UnsupportedOrder { geometry_type, order })?;
        if basis_values.len() != expected {
            return Err(GeometryError::ShapeFunctionBufferSize {
                expected,
                actual: basis_values.len(),
            });
        }

        if order == geometry_type.order() {
            self.populate_basis(basis_values, xi);
        } else {
            match geometry_type.reference_shape() {
                ReferenceShape::Triangle => basis_values.copy_from_slice(tri3_basis(xi).as_slice()),
                ReferenceShape::Quadrilateral => basis_values.copy_from_slice(quad4_basis(xi).as_slice()),
            }
        }
        Ok(())
    }
}

impl<T: Real> ReferenceFiniteElement<T> for SurfaceElement<T> {
    fn num_nodes(&self) -> usize {
        dispatch!(self, element => element.num_nodes())
    }

    fn populate_basis(&self, basis_values: &mut [T], reference_coords: &Point2<T>) {
        dispatch!(self, element => element.populate_basis(basis_values, reference_coords))
    }
}

impl<T: Real> SurfaceFiniteElement<T> for SurfaceElement<T> {
    fn vertices(&self) -> &[Point3<T>] {
        dispatch!(self, element => element.vertices())
    }

    fn reference_jacobian(&self, reference_coords: &Point2<T>) -> Matrix3x2<T> {
        dispatch!(self, element => element.reference_jacobian(reference_coords))
    }

    fn map_reference_coords(&self, reference_coords: &Point2<T>) -> Point3<T> {
        dispatch!(self, element => element.map_reference_coords(reference_coords))
    }
}
