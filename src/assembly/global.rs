use crate::assembly::local::{ConditionConnectivityAssembler, ConditionVectorAssembler};
use crate::condition::ConditionVariables;
use crate::Real;
use eyre::WrapErr;
use log::{debug, trace};
use nalgebra::{DVector, DVectorViewMut, Scalar};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::cell::RefCell;
use thread_local::ThreadLocal;

/// A serial assembler for global vectors.
#[derive(Debug, Clone)]
pub struct VectorAssembler<T: Real> {
    workspace: RefCell<VectorAssemblerWorkspace<T>>,
}

impl<T: Real> Default for VectorAssembler<T> {
    fn default() -> Self {
        Self {
            workspace: RefCell::new(VectorAssemblerWorkspace::default()),
        }
    }
}

#[derive(Debug, Clone)]
struct VectorAssemblerWorkspace<T: Real> {
    // All members are buffers that help prevent unnecessary allocations
    // when assembling multiple vectors with the same assembler
    condition_global_nodes: Vec<usize>,
    condition_vector: DVector<T>,
    variables: ConditionVariables<T>,
}

impl<T: Real> Default for VectorAssemblerWorkspace<T> {
    fn default() -> Self {
        Self {
            condition_global_nodes: Vec::new(),
            condition_vector: DVector::zeros(0),
            variables: ConditionVariables::default(),
        }
    }
}

impl<T: Real> VectorAssemblerWorkspace<T> {
    /// Computes the local vector and global nodes of a single condition into the workspace.
    fn assemble_condition(
        &mut self,
        condition_index: usize,
        assembler: &dyn ConditionVectorAssembler<T>,
    ) -> eyre::Result<()> {
        let sdim = assembler.solution_dim();
        let node_count = assembler.condition_node_count(condition_index);

        self.condition_global_nodes.resize(node_count, 0);
        assembler.populate_condition_nodes(&mut self.condition_global_nodes, condition_index);
        self.condition_vector
            .resize_vertically_mut(sdim * node_count, T::zero());

        let output = DVectorViewMut::from(&mut self.condition_vector);
        assembler
            .assemble_condition_vector_into(condition_index, &mut self.variables, output)
            .wrap_err_with(|| format!("Failed to assemble local vector of condition at index {condition_index}"))
    }
}

fn check_global_vector_dim<T, A>(output: &DVectorViewMut<T>, assembler: &A)
where
    T: Scalar,
    A: ?Sized + ConditionConnectivityAssembler,
{
    assert_eq!(
        output.len(),
        assembler.solution_dim() * assembler.num_nodes(),
        "Global vector dimension must match the number of degrees of freedom"
    );
}

/// Adds a node-major local vector into the global vector at the degrees of freedom of the given nodes.
pub fn add_local_to_global<T: Real>(
    global: &mut DVectorViewMut<T>,
    local: &DVector<T>,
    global_nodes: &[usize],
    solution_dim: usize,
) {
    debug_assert_eq!(local.len(), solution_dim * global_nodes.len());
    for (local_node, &global_node) in global_nodes.iter().enumerate() {
        for i in 0..solution_dim {
            global[solution_dim * global_node + i] += local[solution_dim * local_node + i];
        }
    }
}

impl<T: Real> VectorAssembler<T> {
    pub fn assemble_vector(&self, assembler: &dyn ConditionVectorAssembler<T>) -> eyre::Result<DVector<T>> {
        let n = assembler.solution_dim() * assembler.num_nodes();
        let mut output = DVector::zeros(n);
        self.assemble_vector_into(DVectorViewMut::from(&mut output), assembler)?;
        Ok(output)
    }

    /// Adds the contributions of all conditions to `output`, in condition order.
    pub fn assemble_vector_into(
        &self,
        mut output: DVectorViewMut<T>,
        assembler: &dyn ConditionVectorAssembler<T>,
    ) -> eyre::Result<()> {
        check_global_vector_dim(&output, assembler);
        debug!("Assembling vector from {} conditions (serial)", assembler.num_conditions());

        // Reuse previously allocated buffers
        let ws = &mut *self.workspace.borrow_mut();
        let sdim = assembler.solution_dim();
        for condition_index in 0..assembler.num_conditions() {
            ws.assemble_condition(condition_index, assembler)?;
            add_local_to_global(&mut output, &ws.condition_vector, &ws.condition_global_nodes, sdim);
            trace!("Assembled condition at index {}", condition_index);
        }

        Ok(())
    }
}

/// A parallel assembler for global vectors.
///
/// Local vectors are computed in parallel, each thread with its own workspace. They are then
/// added to the global vector sequentially in condition order, so the result is identical to
/// that of [`VectorAssembler`].
#[derive(Debug)]
pub struct VectorParAssembler<T: Real + Send> {
    workspace: ThreadLocal<RefCell<VectorAssemblerWorkspace<T>>>,
}

impl<T: Real + Send> Default for VectorParAssembler<T> {
    fn default() -> Self {
        Self {
            workspace: Default::default(),
        }
    }
}

impl<T: Real + Send> VectorParAssembler<T> {
    pub fn assemble_vector(
        &self,
        assembler: &(dyn Sync + ConditionVectorAssembler<T>),
    ) -> eyre::Result<DVector<T>> {
        let n = assembler.solution_dim() * assembler.num_nodes();
        let mut output = DVector::zeros(n);
        self.assemble_vector_into(DVectorViewMut::from(&mut output), assembler)?;
        Ok(output)
    }

    pub fn assemble_vector_into(
        &self,
        mut output: DVectorViewMut<T>,
        assembler: &(dyn Sync + ConditionVectorAssembler<T>),
    ) -> eyre::Result<()> {
        check_global_vector_dim(&output, assembler);
        debug!("Assembling vector from {} conditions (parallel)", assembler.num_conditions());

        let local_contributions = (0..assembler.num_conditions())
            .into_par_iter()
            .map(|condition_index| -> eyre::Result<_> {
                let ws = &mut *self.workspace.get_or_default().borrow_mut();
                ws.assemble_condition(condition_index, assembler)?;
                trace!("Assembled condition at index {}", condition_index);
                Ok((ws.condition_global_nodes.clone(), ws.condition_vector.clone()))
            })
            .collect::<eyre::Result<Vec<_>>>()?;

        let sdim = assembler.solution_dim();
        for (global_nodes, local_vector) in &local_contributions {
            add_local_to_global(&mut output, local_vector, global_nodes, sdim);
        }

        Ok(())
    }
}
