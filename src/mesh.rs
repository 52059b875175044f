//! Minimal storage for the vertices and nodal solution values that conditions refer to.
use crate::connectivity::SurfaceConnectivity;
use crate::distance::Distance;
use crate::error::GeometryError;
use crate::Real;
use nalgebra::{Point3, Scalar};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

pub mod procedural;

/// Named scalar solution variables stored at the nodes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodalVariable {
    /// The normal contact stress, positive in the direction of the surface normal.
    NormalContactStress,
    SurfaceLoadX,
    SurfaceLoadY,
    SurfaceLoadZ,
}

impl NodalVariable {
    /// The three components of the surface load (traction) vector.
    pub const SURFACE_LOAD: [NodalVariable; 3] = [Self::SurfaceLoadX, Self::SurfaceLoadY, Self::SurfaceLoadZ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::NormalContactStress => "NORMAL_CONTACT_STRESS",
            Self::SurfaceLoadX => "SURFACE_LOAD_X",
            Self::SurfaceLoadY => "SURFACE_LOAD_Y",
            Self::SurfaceLoadZ => "SURFACE_LOAD_Z",
        }
    }
}

impl Display for NodalVariable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Values of nodal variables, one value per node for each stored variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct NodalValues<T> {
    num_nodes: usize,
    values: FxHashMap<NodalVariable, Vec<T>>,
}

impl<T: Scalar + Copy> NodalValues<T> {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            values: FxHashMap::default(),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Sets the values of a variable at all nodes, replacing any previous values.
    ///
    /// # Panics
    ///
    /// Panics if the number of values does not match the number of nodes.
    pub fn set(&mut self, variable: NodalVariable, values: Vec<T>) {
        assert_eq!(
            values.len(),
            self.num_nodes,
            "Number of values must be equal to the number of nodes"
        );
        self.values.insert(variable, values);
    }

    /// Sets the same value of a variable at all nodes.
    pub fn set_uniform(&mut self, variable: NodalVariable, value: T) {
        self.values.insert(variable, vec![value; self.num_nodes]);
    }

    pub fn get(&self, variable: NodalVariable) -> Option<&[T]> {
        self.values.get(&variable).map(Vec::as_slice)
    }

    pub fn contains(&self, variable: NodalVariable) -> bool {
        self.values.contains_key(&variable)
    }

    /// The value of a variable at a single node.
    pub fn value(&self, variable: NodalVariable, node: usize) -> Result<T, GeometryError> {
        self.get(variable)
            .and_then(|values| values.get(node))
            .copied()
            .ok_or(GeometryError::MissingNodalValue { variable, node })
    }

    /// Gathers the values of the given variables at the given nodes into `output`.
    ///
    /// The output is node-major: the values of all variables at the first node, followed by
    /// the values at the second node, and so on.
    pub fn gather(
        &self,
        variables: &[NodalVariable],
        nodes: &[usize],
        output: &mut Vec<T>,
    ) -> Result<(), GeometryError> {
        output.clear();
        for &node in nodes {
            for &variable in variables {
                output.push(self.value(variable, node)?);
            }
        }
        Ok(())
    }
}

/// Vertices of a surface mesh together with nodal values.
///
/// The mesh does not store element connectivity. Surface elements are described by the
/// conditions that refer to the vertices by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct SurfaceMesh<T: Scalar> {
    vertices: Vec<Point3<T>>,
    nodal_values: NodalValues<T>,
}

impl<T: Real> SurfaceMesh<T> {
    pub fn from_vertices(vertices: Vec<Point3<T>>) -> Self {
        let nodal_values = NodalValues::new(vertices.len());
        Self {
            vertices,
            nodal_values,
        }
    }

    pub fn vertices(&self) -> &[Point3<T>] {
        &self.vertices
    }

    pub fn num_nodes(&self) -> usize {
        self.vertices.len()
    }

    pub fn nodal_values(&self) -> &NodalValues<T> {
        &self.nodal_values
    }

    pub fn nodal_values_mut(&mut self) -> &mut NodalValues<T> {
        &mut self.nodal_values
    }

    /// Looks up the vertices of the given connectivity, in local node order.
    pub fn populate_element_vertices(
        &self,
        connectivity: &SurfaceConnectivity,
        output: &mut Vec<Point3<T>>,
    ) -> Result<(), GeometryError> {
        output.clear();
        for &node in connectivity.vertex_indices() {
            let vertex = self
                .vertices
                .get(node)
                .ok_or(GeometryError::MissingVertex { node })?;
            output.push(*vertex);
        }
        Ok(())
    }

    /// The index of the vertex closest to the given point, or `None` if the mesh is empty.
    pub fn closest_vertex(&self, point: &Point3<T>) -> Option<usize> {
        self.vertices
            .iter()
            .map(|vertex| Distance::between(vertex, point))
            .enumerate()
            .fold(None, |closest: Option<(usize, Distance<T>)>, (index, distance)| match closest {
                Some((_, closest_distance)) if closest_distance <= distance => closest,
                _ => Some((index, distance)),
            })
            .map(|(index, _)| index)
    }
}
