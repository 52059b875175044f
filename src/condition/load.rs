use crate::condition::ConditionVariables;
use crate::element::surface_normal;
use crate::mesh::NodalVariable;
use crate::{Real, SPATIAL_DIM};
use nalgebra::{DVectorViewMut, Matrix3x2, Vector3};
use serde::{Deserialize, Serialize};

/// The per-point formulas of a distributed surface load.
///
/// The driver loop in [`Condition`](crate::condition::Condition) calls
/// [`compute_condition_vector`](Self::compute_condition_vector) and
/// [`compute_integration_coefficient`](Self::compute_integration_coefficient) at every
/// integration point, and accumulates the product of the two into the local vector with
/// [`calculate_and_add_condition_force`](Self::calculate_and_add_condition_force). How the
/// area scaling of the surface is split between the vector and the coefficient is up to the load.
pub trait SurfaceLoadFormula<T: Real> {
    /// The nodal variables that are gathered into [`ConditionVariables::nodal_values`] before
    /// evaluation, in the order they are stored for each node.
    fn nodal_variables(&self) -> &'static [NodalVariable];

    /// Computes `variables.condition_vector` at the given integration point.
    ///
    /// Shape functions for the point and the Jacobians at all points are already populated.
    fn compute_condition_vector(&self, variables: &mut ConditionVariables<T>, point: usize);

    fn compute_integration_coefficient(&self, point: usize, weights: &[T], jacobians: &[Matrix3x2<T>]) -> T;

    /// Accumulates the force contribution of the current integration point into `output`.
    ///
    /// Node `i` receives `nu[i] * condition_vector * integration_coefficient` in the entries
    /// `3 i`, `3 i + 1` and `3 i + 2`.
    fn calculate_and_add_condition_force(&self, output: &mut DVectorViewMut<T>, variables: &ConditionVariables<T>) {
        let cv = &variables.condition_vector;
        let coefficient = variables.integration_coefficient;
        for (i, &nu_i) in variables.nu.iter().enumerate() {
            for k in 0..SPATIAL_DIM {
                output[SPATIAL_DIM * i + k] += nu_i * cv[k] * coefficient;
            }
        }
    }
}

/// A load acting along the surface normal with magnitude given by the nodal normal contact stress.
///
/// The condition vector is the interpolated stress times the unnormalized normal `t0 x t1`, whose
/// length is the ratio of physical to reference area. The integration coefficient is therefore
/// just the quadrature weight. Where the tangents are parallel the normal vanishes and the point
/// contributes nothing.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalLoad;

impl<T: Real> SurfaceLoadFormula<T> for NormalLoad {
    fn nodal_variables(&self) -> &'static [NodalVariable] {
        &[NodalVariable::NormalContactStress]
    }

    fn compute_condition_vector(&self, variables: &mut ConditionVariables<T>, point: usize) {
        let normal = surface_normal(&variables.j_container[point]);
        let stress = variables
            .nu
            .iter()
            .zip(&variables.nodal_values)
            .fold(T::zero(), |sum, (&nu_i, &stress_i)| sum + nu_i * stress_i);
        variables.condition_vector = normal * stress;
    }

    fn compute_integration_coefficient(&self, point: usize, weights: &[T], _jacobians: &[Matrix3x2<T>]) -> T {
        weights[point]
    }
}

/// A load given as a traction vector per unit physical area, interpolated from the nodal
/// `SURFACE_LOAD` components.
///
/// The area scaling is carried by the integration coefficient, which is the quadrature weight
/// times the length of `t0 x t1`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceTraction;

impl<T: Real> SurfaceLoadFormula<T> for SurfaceTraction {
    fn nodal_variables(&self) -> &'static [NodalVariable] {
        &NodalVariable::SURFACE_LOAD
    }

    fn compute_condition_vector(&self, variables: &mut ConditionVariables<T>, _point: usize) {
        let mut traction = Vector3::zeros();
        for (&nu_i, load_i) in variables
            .nu
            .iter()
            .zip(variables.nodal_values.chunks_exact(SPATIAL_DIM))
        {
            traction += Vector3::from_column_slice(load_i) * nu_i;
        }
        variables.condition_vector = traction;
    }

    fn compute_integration_coefficient(&self, point: usize, weights: &[T], jacobians: &[Matrix3x2<T>]) -> T {
        weights[point] * surface_normal(&jacobians[point]).norm()
    }
}

/// The closed set of loads a condition can apply, selected when the condition is created.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceLoad {
    Normal(NormalLoad),
    Traction(SurfaceTraction),
}

impl Default for SurfaceLoad {
    fn default() -> Self {
        Self::Normal(NormalLoad)
    }
}

impl From<NormalLoad> for SurfaceLoad {
    fn from(load: NormalLoad) -> Self {
        Self::Normal(load)
    }
}

impl From<SurfaceTraction> for SurfaceLoad {
    fn from(load: SurfaceTraction) -> Self {
        Self::Traction(load)
    }
}

impl<T: Real> SurfaceLoadFormula<T> for SurfaceLoad {
    fn nodal_variables(&self) -> &'static [NodalVariable] {
        match self {
            Self::Normal(load) => SurfaceLoadFormula::<T>::nodal_variables(load),
            Self::Traction(load) => SurfaceLoadFormula::<T>::nodal_variables(load),
        }
    }

    fn compute_condition_vector(&self, variables: &mut ConditionVariables<T>, point: usize) {
        match self {
            Self::Normal(load) => load.compute_condition_vector(variables, point),
            Self::Traction(load) => load.compute_condition_vector(variables, point),
        }
    }

    fn compute_integration_coefficient(&self, point: usize, weights: &[T], jacobians: &[Matrix3x2<T>]) -> T {
        match self {
            Self::Normal(load) => load.compute_integration_coefficient(point, weights, jacobians),
            Self::Traction(load) => load.compute_integration_coefficient(point, weights, jacobians),
        }
    }
}
