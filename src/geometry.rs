//! Access to the geometric data of a single condition.
use crate::connectivity::{InterpolationOrder, SurfaceConnectivity, SurfaceGeometryType};
use crate::element::{SurfaceElement, SurfaceFiniteElement};
use crate::error::GeometryError;
use crate::quadrature::QuadraturePair2d;
use crate::Real;
use nalgebra::{Matrix3x2, Point2, Point3};

/// Provides integration points, Jacobians and shape functions for one surface element.
///
/// Integration points are identified by their index into the integration scheme, and are always
/// visited in index order.
pub trait GeometryProvider<T: Real> {
    fn geometry_type(&self) -> SurfaceGeometryType;

    /// The global indices of the nodes of the element, in local node order.
    fn node_indices(&self) -> &[usize];

    fn num_nodes(&self) -> usize {
        self.node_indices().len()
    }

    fn quadrature_weights(&self) -> &[T];

    fn quadrature_points(&self) -> &[Point2<T>];

    fn num_integration_points(&self) -> usize {
        self.quadrature_weights().len()
    }

    /// The 3x2 Jacobian of the map from reference to physical coordinates at the given
    /// integration point.
    fn jacobian(&self, point: usize) -> Result<Matrix3x2<T>, GeometryError>;

    /// The number of shape functions of the given interpolation order.
    fn num_shape_functions(&self, order: InterpolationOrder) -> Result<usize, GeometryError> {
        let geometry_type = self.geometry_type();
        geometry_type
            .num_nodes_for_order(order)
            .ok_or(GeometryError::UnsupportedOrder { geometry_type, order })
    }

    /// Evaluates the shape functions of the given order at the given integration point.
    fn populate_shape_functions(
        &self,
        order: InterpolationOrder,
        point: usize,
        values: &mut [T],
    ) -> Result<(), GeometryError>;
}

/// The geometry of a condition, constructed from the mesh vertices and an integration scheme.
#[derive(Debug, Clone)]
pub struct SurfaceGeometry<'a, T: Real> {
    element: SurfaceElement<T>,
    connectivity: &'a SurfaceConnectivity,
    quadrature: &'a QuadraturePair2d<T>,
}

impl<'a, T: Real> SurfaceGeometry<'a, T> {
    pub fn from_mesh(
        connectivity: &'a SurfaceConnectivity,
        vertices: &[Point3<T>],
        quadrature: &'a QuadraturePair2d<T>,
    ) -> Result<Self, GeometryError> {
        let element_vertices = connectivity
            .vertex_indices()
            .iter()
            .map(|&node| vertices.get(node).copied().ok_or(GeometryError::MissingVertex { node }))
            .collect::<Result<Vec<_>, _>>()?;
        let element = SurfaceElement::from_vertices(connectivity.geometry_type(), &element_vertices)?;
        Ok(Self {
            element,
            connectivity,
            quadrature,
        })
    }

    pub fn element(&self) -> &SurfaceElement<T> {
        &self.element
    }

    fn reference_point(&self, point: usize) -> Result<&Point2<T>, GeometryError> {
        let (weights, points) = self.quadrature;
        let num_points = weights.len();
        points
            .get(point)
            .ok_or(GeometryError::IntegrationPointOutOfRange { point, num_points })
    }
}

impl<'a, T: Real> GeometryProvider<T> for SurfaceGeometry<'a, T> {
    fn geometry_type(&self) -> SurfaceGeometryType {
        self.connectivity.geometry_type()
    }

    fn node_indices(&self) -> &[usize] {
        self.connectivity.vertex_indices()
    }

    fn quadrature_weights(&self) -> &[T] {
        &self.quadrature.0
    }

    fn quadrature_points(&self) -> &[Point2<T>] {
        &self.quadrature.1
    }

    fn jacobian(&self, point: usize) -> Result<Matrix3x2<T>, GeometryError> {
        let xi = self.reference_point(point)?;
        let jacobian = self.element.reference_jacobian(xi);
        if jacobian.iter().all(|entry| entry.is_finite()) {
            Ok(jacobian)
        } else {
            Err(GeometryError::NonFiniteJacobian { point })
        }
    }

    fn populate_shape_functions(
        &self,
        order: InterpolationOrder,
        point: usize,
        values: &mut [T],
    ) -> Result<(), GeometryError> {
        let xi = self.reference_point(point)?;
        self.element.populate_basis_of_order(order, values, xi)
    }
}
