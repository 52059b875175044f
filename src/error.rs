//! Error types.
//!
//! Failures are never recovered from locally. They are reported to the caller with enough
//! context (condition, stage and integration point) to trace them back to the offending geometry.
use crate::connectivity::{InterpolationOrder, SurfaceGeometryType};
use crate::mesh::NodalVariable;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Failure to retrieve geometric or nodal data for a single element.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GeometryError {
    /// The number of nodes does not match the geometry type.
    NodeCountMismatch {
        geometry_type: SurfaceGeometryType,
        expected: usize,
        actual: usize,
    },
    /// A node index does not refer to a vertex of the mesh.
    MissingVertex { node: usize },
    /// The Jacobian at an integration point has non-finite entries.
    NonFiniteJacobian { point: usize },
    /// The requested integration point does not exist in the integration scheme.
    IntegrationPointOutOfRange { point: usize, num_points: usize },
    /// The geometry can not provide shape functions of the requested order.
    UnsupportedOrder {
        geometry_type: SurfaceGeometryType,
        order: InterpolationOrder,
    },
    /// The buffer provided for shape function values has the wrong length.
    ShapeFunctionBufferSize { expected: usize, actual: usize },
    /// A node does not carry a value for the requested nodal variable.
    MissingNodalValue { variable: NodalVariable, node: usize },
}

impl Display for GeometryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeCountMismatch {
                geometry_type,
                expected,
                actual,
            } => write!(
                f,
                "geometry {geometry_type} requires {expected} nodes, but {actual} nodes were given"
            ),
            Self::MissingVertex { node } => write!(f, "node {node} is not a vertex of the mesh"),
            Self::NonFiniteJacobian { point } => {
                write!(f, "non-finite Jacobian at integration point {point}")
            }
            Self::IntegrationPointOutOfRange { point, num_points } => write!(
                f,
                "integration point {point} is out of range for a scheme with {num_points} points"
            ),
            Self::UnsupportedOrder { geometry_type, order } => {
                write!(f, "geometry {geometry_type} can not interpolate with order {order:?}")
            }
            Self::ShapeFunctionBufferSize { expected, actual } => write!(
                f,
                "shape function buffer has length {actual}, expected {expected}"
            ),
            Self::MissingNodalValue { variable, node } => {
                write!(f, "node {node} has no value for variable {variable}")
            }
        }
    }
}

impl Error for GeometryError {}

/// The stage of a condition evaluation in which a failure occurred.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EvaluationStage {
    /// Construction of the element geometry from the mesh.
    Geometry,
    /// Gathering nodal values from the mesh.
    NodalValues,
    /// Computation of the Jacobians at the integration points.
    Jacobians,
    /// Evaluation of shape functions at an integration point.
    ShapeFunctions,
}

impl Display for EvaluationStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let stage = match self {
            Self::Geometry => "geometry construction",
            Self::NodalValues => "nodal value retrieval",
            Self::Jacobians => "Jacobian computation",
            Self::ShapeFunctions => "shape function evaluation",
        };
        write!(f, "{stage}")
    }
}

/// Errors produced by conditions, either when they are created or evaluated.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConditionError {
    /// The condition could not be created. No condition is returned.
    InvalidGeometry { id: usize, source: GeometryError },
    /// The properties referenced by the condition do not exist.
    UnknownProperties { id: usize, properties: usize },
    /// A condition with the same identifier already exists.
    DuplicateId { id: usize },
    /// Evaluation of the condition failed.
    Evaluation {
        id: usize,
        stage: EvaluationStage,
        point: Option<usize>,
        source: GeometryError,
    },
}

impl ConditionError {
    /// The identifier of the condition that produced the error.
    pub fn condition_id(&self) -> usize {
        match self {
            Self::InvalidGeometry { id, .. } => *id,
            Self::UnknownProperties { id, .. } => *id,
            Self::DuplicateId { id } => *id,
            Self::Evaluation { id, .. } => *id,
        }
    }

    /// The failing evaluation stage, if the error occurred during evaluation.
    pub fn stage(&self) -> Option<EvaluationStage> {
        match self {
            Self::Evaluation { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl Display for ConditionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGeometry { id, source } => {
                write!(f, "failed to create condition {id}: {source}")
            }
            Self::UnknownProperties { id, properties } => {
                write!(f, "condition {id} refers to unknown properties {properties}")
            }
            Self::DuplicateId { id } => write!(f, "a condition with id {id} already exists"),
            Self::Evaluation {
                id,
                stage,
                point: Some(point),
                source,
            } => write!(
                f,
                "condition {id}: {stage} failed at integration point {point}: {source}"
            ),
            Self::Evaluation {
                id,
                stage,
                point: None,
                source,
            } => write!(f, "condition {id}: {stage} failed: {source}"),
        }
    }
}

impl Error for ConditionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidGeometry { source, .. } => Some(source),
            Self::Evaluation { source, .. } => Some(source),
            Self::UnknownProperties { .. } | Self::DuplicateId { .. } => None,
        }
    }
}
