use crate::condition::Condition;
use crate::error::ConditionError;
use crate::mesh::SurfaceMesh;
use crate::quadrature::{QuadratureError, QuadratureSettings, SurfaceQuadratureTable};
use crate::Real;
use log::debug;
use nalgebra::DVector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Identifies a [`Properties`] record of a model.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropertiesId(pub usize);

/// Named physical parameters shared by many conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct Properties<T> {
    id: PropertiesId,
    parameters: FxHashMap<String, T>,
}

impl<T: Real> Properties<T> {
    pub fn new(id: PropertiesId) -> Self {
        Self {
            id,
            parameters: FxHashMap::default(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: T) -> Self {
        self.set_parameter(name, value);
        self
    }

    pub fn id(&self) -> PropertiesId {
        self.id
    }

    pub fn set_parameter(&mut self, name: impl Into<String>, value: T) {
        self.parameters.insert(name.into(), value);
    }

    pub fn parameter(&self, name: &str) -> Option<T> {
        self.parameters.get(name).copied()
    }
}

/// Owns the mesh, the shared properties and the conditions applied to the mesh.
///
/// Conditions refer to vertices and properties by index, so the model is the only holder of
/// this data.
#[derive(Debug, Clone)]
pub struct Model<T: Real> {
    mesh: SurfaceMesh<T>,
    properties: FxHashMap<PropertiesId, Properties<T>>,
    conditions: Vec<Condition>,
    condition_indices: FxHashMap<usize, usize>,
    quadrature: SurfaceQuadratureTable<T>,
}

impl<T: Real> Model<T> {
    pub fn new(mesh: SurfaceMesh<T>, settings: &QuadratureSettings) -> Result<Self, QuadratureError> {
        let quadrature = SurfaceQuadratureTable::from_settings(settings)?;
        debug!("Created model with {} nodes", mesh.num_nodes());
        Ok(Self {
            mesh,
            properties: FxHashMap::default(),
            conditions: Vec::new(),
            condition_indices: FxHashMap::default(),
            quadrature,
        })
    }

    /// Creates a model using the default quadrature settings.
    pub fn from_mesh(mesh: SurfaceMesh<T>) -> Self {
        Self {
            mesh,
            properties: FxHashMap::default(),
            conditions: Vec::new(),
            condition_indices: FxHashMap::default(),
            quadrature: SurfaceQuadratureTable::default(),
        }
    }

    pub fn mesh(&self) -> &SurfaceMesh<T> {
        &self.mesh
    }

    /// Mutable access to the mesh, typically for updating nodal values between evaluations.
    pub fn mesh_mut(&mut self) -> &mut SurfaceMesh<T> {
        &mut self.mesh
    }

    pub fn quadrature(&self) -> &SurfaceQuadratureTable<T> {
        &self.quadrature
    }

    /// Adds a properties record, replacing any previous record with the same id.
    pub fn add_properties(&mut self, properties: Properties<T>) -> PropertiesId {
        let id = properties.id();
        self.properties.insert(id, properties);
        id
    }

    pub fn properties(&self, id: PropertiesId) -> Option<&Properties<T>> {
        self.properties.get(&id)
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn condition_by_id(&self, id: usize) -> Option<&Condition> {
        self.condition_indices
            .get(&id)
            .map(|&index| &self.conditions[index])
    }

    /// Adds a condition to the model.
    ///
    /// # Errors
    ///
    /// Fails if the properties of the condition are not part of the model, or if a condition with
    /// the same id already exists.
    pub fn add_condition(&mut self, condition: Condition) -> Result<&Condition, ConditionError> {
        let id = condition.id();
        let properties = condition.properties();
        if !self.properties.contains_key(&properties) {
            return Err(ConditionError::UnknownProperties {
                id,
                properties: properties.0,
            });
        }
        if self.condition_indices.contains_key(&id) {
            return Err(ConditionError::DuplicateId { id });
        }

        let index = self.conditions.len();
        self.condition_indices.insert(id, index);
        self.conditions.push(condition);
        Ok(&self.conditions[index])
    }

    /// Creates a condition from a prototype and adds it to the model.
    pub fn create_condition(
        &mut self,
        prototype: &Condition,
        id: usize,
        nodes: &[usize],
        properties: PropertiesId,
    ) -> Result<&Condition, ConditionError> {
        let condition = prototype.create(id, nodes, properties)?;
        self.add_condition(condition)
    }

    /// Checks every condition against the mesh.
    pub fn check(&self) -> Result<(), ConditionError> {
        self.conditions
            .iter()
            .try_for_each(|condition| condition.check(&self.mesh))
    }

    /// Computes the local right-hand side of the condition with the given index.
    ///
    /// Conditions are indexed in the order they were added, see [`conditions`](Self::conditions).
    ///
    /// # Panics
    ///
    /// Panics if `index` is not smaller than the number of conditions.
    pub fn calculate_condition_right_hand_side(&self, index: usize, rhs: &mut DVector<T>) -> Result<(), ConditionError> {
        self.conditions[index].calculate_right_hand_side(&self.mesh, &self.quadrature, rhs)
    }
}
