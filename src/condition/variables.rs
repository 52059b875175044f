use crate::Real;
use nalgebra::{Matrix3x2, Scalar, Vector3};

/// Scratch state for the evaluation of a single condition.
///
/// The container is reset at the start of every evaluation, so a single instance can be reused
/// for many conditions in sequence. It must never be shared between concurrent evaluations.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionVariables<T: Scalar> {
    /// Shape function values at the current integration point, one per node.
    pub nu: Vec<T>,
    /// The Jacobian at every integration point.
    pub j_container: Vec<Matrix3x2<T>>,
    /// The load vector at the current integration point.
    pub condition_vector: Vector3<T>,
    pub integration_coefficient: T,
    /// Nodal values read by the load, node-major.
    pub nodal_values: Vec<T>,
}

impl<T: Real> ConditionVariables<T> {
    pub fn new() -> Self {
        Self {
            nu: Vec::new(),
            j_container: Vec::new(),
            condition_vector: Vector3::zeros(),
            integration_coefficient: T::zero(),
            nodal_values: Vec::new(),
        }
    }

    /// Prepares the container for a condition with the given number of nodes.
    pub fn reset(&mut self, num_nodes: usize) {
        self.nu.clear();
        self.nu.resize(num_nodes, T::zero());
        self.j_container.clear();
        self.condition_vector = Vector3::zeros();
        self.integration_coefficient = T::zero();
        self.nodal_values.clear();
    }
}

impl<T: Real> Default for ConditionVariables<T> {
    fn default() -> Self {
        Self::new()
    }
}
