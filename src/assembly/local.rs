use crate::condition::ConditionVariables;
use crate::model::Model;
use crate::{Real, SPATIAL_DIM};
use nalgebra::{DVectorViewMut, Scalar};

pub trait ConditionConnectivityAssembler {
    fn solution_dim(&self) -> usize;

    fn num_conditions(&self) -> usize;

    fn num_nodes(&self) -> usize;

    fn condition_node_count(&self, condition_index: usize) -> usize;

    fn populate_condition_nodes(&self, output: &mut [usize], condition_index: usize);
}

pub trait ConditionVectorAssembler<T: Scalar>: ConditionConnectivityAssembler {
    /// Computes the local vector of the given condition.
    ///
    /// `variables` is scratch space owned by the caller. The output has length
    /// `solution_dim * condition_node_count` and is overwritten.
    fn assemble_condition_vector_into(
        &self,
        condition_index: usize,
        variables: &mut ConditionVariables<T>,
        output: DVectorViewMut<T>,
    ) -> eyre::Result<()>;
}

impl<T: Real> ConditionConnectivityAssembler for Model<T> {
    fn solution_dim(&self) -> usize {
        SPATIAL_DIM
    }

    fn num_conditions(&self) -> usize {
        self.conditions().len()
    }

    fn num_nodes(&self) -> usize {
        self.mesh().num_nodes()
    }

    fn condition_node_count(&self, condition_index: usize) -> usize {
        self.conditions()[condition_index].num_nodes()
    }

    fn populate_condition_nodes(&self, output: &mut [usize], condition_index: usize) {
        output.copy_from_slice(self.conditions()[condition_index].nodes());
    }
}

impl<T: Real> ConditionVectorAssembler<T> for Model<T> {
    fn assemble_condition_vector_into(
        &self,
        condition_index: usize,
        variables: &mut ConditionVariables<T>,
        output: DVectorViewMut<T>,
    ) -> eyre::Result<()> {
        let condition = &self.conditions()[condition_index];
        let geometry = condition.geometry(self.mesh(), self.quadrature())?;
        condition.calculate_right_hand_side_with(&geometry, self.mesh().nodal_values(), variables, output)?;
        Ok(())
    }
}
