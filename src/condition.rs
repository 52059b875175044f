//! Surface conditions contributing distributed loads to the right-hand side.
use crate::connectivity::{SurfaceConnectivity, SurfaceGeometryType};
use crate::error::{ConditionError, EvaluationStage, GeometryError};
use crate::geometry::{GeometryProvider, SurfaceGeometry};
use crate::mesh::{NodalValues, SurfaceMesh};
use crate::model::PropertiesId;
use crate::quadrature::SurfaceQuadratureTable;
use crate::{Real, SPATIAL_DIM};
use nalgebra::{DMatrix, DVector, DVectorViewMut};
use serde::{Deserialize, Serialize};

mod load;
mod variables;

pub use load::*;
pub use variables::*;

fn evaluation_error(
    id: usize,
    stage: EvaluationStage,
    point: Option<usize>,
) -> impl FnOnce(GeometryError) -> ConditionError {
    move |source| ConditionError::Evaluation {
        id,
        stage,
        point,
        source,
    }
}

/// A surface element on the boundary of a 3D mesh that applies a distributed load.
///
/// The condition stores the indices of its nodes and of its properties. Vertices, nodal values
/// and properties are owned by the mesh and model. Each node carries three degrees of freedom,
/// one force component per spatial direction.
///
/// The shape functions used for interpolating the load and for distributing it to the nodes
/// are those of the geometry itself. Geometries of quadratic order can additionally provide
/// the linear shape functions of their corner nodes through [`GeometryProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    id: usize,
    connectivity: SurfaceConnectivity,
    properties: PropertiesId,
    load: SurfaceLoad,
}

impl Condition {
    pub fn new(
        id: usize,
        geometry_type: SurfaceGeometryType,
        nodes: Vec<usize>,
        properties: PropertiesId,
        load: impl Into<SurfaceLoad>,
    ) -> Result<Self, ConditionError> {
        let connectivity = SurfaceConnectivity::try_new(geometry_type, nodes)
            .map_err(|source| ConditionError::InvalidGeometry { id, source })?;
        Ok(Self {
            id,
            connectivity,
            properties,
            load: load.into(),
        })
    }

    /// Creates a new condition of the same geometry type and load as this one.
    ///
    /// # Errors
    ///
    /// Fails if the number of nodes does not match the geometry type. No condition is created.
    pub fn create(&self, id: usize, nodes: &[usize], properties: PropertiesId) -> Result<Self, ConditionError> {
        Self::new(id, self.geometry_type(), nodes.to_vec(), properties, self.load)
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn connectivity(&self) -> &SurfaceConnectivity {
        &self.connectivity
    }

    pub fn geometry_type(&self) -> SurfaceGeometryType {
        self.connectivity.geometry_type()
    }

    pub fn nodes(&self) -> &[usize] {
        self.connectivity.vertex_indices()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes().len()
    }

    pub fn properties(&self) -> PropertiesId {
        self.properties
    }

    pub fn load(&self) -> SurfaceLoad {
        self.load
    }

    /// The size of the local vector, three entries per node.
    pub fn local_size(&self) -> usize {
        SPATIAL_DIM * self.num_nodes()
    }

    /// Populates the global degrees of freedom of the local vector entries.
    ///
    /// Entry `3 i + k` of the local vector corresponds to the global degree of freedom
    /// `3 n + k`, where `n` is the global index of the `i`-th node.
    pub fn equation_ids(&self, output: &mut Vec<usize>) {
        output.clear();
        for &node in self.nodes() {
            output.extend((0..SPATIAL_DIM).map(|k| SPATIAL_DIM * node + k));
        }
    }

    /// Constructs the geometry of this condition from the vertices of the mesh.
    pub fn geometry<'a, T: Real>(
        &'a self,
        mesh: &SurfaceMesh<T>,
        quadrature: &'a SurfaceQuadratureTable<T>,
    ) -> Result<SurfaceGeometry<'a, T>, ConditionError> {
        let rule = quadrature.rule(self.geometry_type());
        SurfaceGeometry::from_mesh(&self.connectivity, mesh.vertices(), rule)
            .map_err(evaluation_error(self.id, EvaluationStage::Geometry, None))
    }

    /// Verifies that every node exists in the mesh and carries the nodal values read by the load.
    pub fn check<T: Real>(&self, mesh: &SurfaceMesh<T>) -> Result<(), ConditionError> {
        let nodal_values = mesh.nodal_values();
        for &node in self.nodes() {
            if node >= mesh.num_nodes() {
                return Err(ConditionError::Evaluation {
                    id: self.id,
                    stage: EvaluationStage::Geometry,
                    point: None,
                    source: GeometryError::MissingVertex { node },
                });
            }
            for &variable in SurfaceLoadFormula::<T>::nodal_variables(&self.load) {
                nodal_values
                    .value(variable, node)
                    .map_err(evaluation_error(self.id, EvaluationStage::NodalValues, None))?;
            }
        }
        Ok(())
    }

    /// Computes the local right-hand side of this condition.
    ///
    /// The output is resized to three entries per node and overwritten.
    pub fn calculate_right_hand_side<T: Real>(
        &self,
        mesh: &SurfaceMesh<T>,
        quadrature: &SurfaceQuadratureTable<T>,
        rhs: &mut DVector<T>,
    ) -> Result<(), ConditionError> {
        let geometry = self.geometry(mesh, quadrature)?;
        rhs.resize_vertically_mut(self.local_size(), T::zero());
        let mut variables = ConditionVariables::new();
        self.calculate_right_hand_side_with(&geometry, mesh.nodal_values(), &mut variables, DVectorViewMut::from(rhs))
    }

    /// Computes the local right-hand side with the given geometry and scratch variables.
    ///
    /// The output is zeroed before the contributions of the integration points are accumulated
    /// into it, in the order of the integration scheme.
    ///
    /// # Panics
    ///
    /// Panics if the length of `output` is not three times the number of nodes of the geometry.
    pub fn calculate_right_hand_side_with<T: Real>(
        &self,
        geometry: &impl GeometryProvider<T>,
        nodal_values: &NodalValues<T>,
        variables: &mut ConditionVariables<T>,
        mut output: DVectorViewMut<T>,
    ) -> Result<(), ConditionError> {
        let num_nodes = geometry.num_nodes();
        assert_eq!(
            output.len(),
            SPATIAL_DIM * num_nodes,
            "Output length must be three times the number of nodes"
        );
        output.fill(T::zero());
        variables.reset(num_nodes);

        let load = &self.load;
        nodal_values
            .gather(
                SurfaceLoadFormula::<T>::nodal_variables(load),
                geometry.node_indices(),
                &mut variables.nodal_values,
            )
            .map_err(evaluation_error(self.id, EvaluationStage::NodalValues, None))?;

        let num_points = geometry.num_integration_points();
        for point in 0..num_points {
            let jacobian = geometry
                .jacobian(point)
                .map_err(evaluation_error(self.id, EvaluationStage::Jacobians, Some(point)))?;
            variables.j_container.push(jacobian);
        }

        let order = geometry.geometry_type().order();
        let weights = geometry.quadrature_weights();
        for point in 0..num_points {
            geometry
                .populate_shape_functions(order, point, &mut variables.nu)
                .map_err(evaluation_error(self.id, EvaluationStage::ShapeFunctions, Some(point)))?;
            load.compute_condition_vector(variables, point);
            variables.integration_coefficient =
                load.compute_integration_coefficient(point, weights, &variables.j_container);
            load.calculate_and_add_condition_force(&mut output, variables);
        }

        Ok(())
    }

    /// Load conditions contribute no stiffness. The output is resized and zeroed.
    pub fn calculate_left_hand_side<T: Real>(&self, lhs: &mut DMatrix<T>) {
        let n = self.local_size();
        lhs.resize_mut(n, n, T::zero());
        lhs.fill(T::zero());
    }

    pub fn calculate_local_system<T: Real>(
        &self,
        mesh: &SurfaceMesh<T>,
        quadrature: &SurfaceQuadratureTable<T>,
        lhs: &mut DMatrix<T>,
        rhs: &mut DVector<T>,
    ) -> Result<(), ConditionError> {
        self.calculate_left_hand_side(lhs);
        self.calculate_right_hand_side(mesh, quadrature, rhs)
    }
}
