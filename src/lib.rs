//! Equivalent nodal forces for distributed loads on boundary surfaces of 3D finite element meshes.
//!
//! A [`Condition`](condition::Condition) is a surface element on the boundary of a mesh that
//! contributes a load vector, but no stiffness, to the global system. Its local right-hand side
//! is computed by numerically integrating a distributed load, such as a normal contact stress
//! given at the nodes, over the surface.
//!
//! The local vector is laid out node-major with three force components per node, in the node
//! order of the condition's geometry. Scattering local vectors into a global vector is provided by
//! the [`assembly`] module.
use nalgebra::RealField;

pub mod assembly;
pub mod condition;
pub mod connectivity;
pub mod distance;
pub mod element;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod model;
pub mod quadrature;

#[cfg(feature = "proptest")]
pub mod proptest;

pub extern crate nalgebra;

/// Real scalar types supported by `surfload`.
///
/// Used as a trait alias for `RealField + Copy`.
pub trait Real: RealField + Copy {}

impl<T: RealField + Copy> Real for T {}

/// The number of spatial dimensions of the physical domain.
pub const SPATIAL_DIM: usize = 3;
