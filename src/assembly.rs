//! Assembly of condition contributions into global vectors.
//!
//! The [`local`] module exposes the per-condition data through the assembler traits, and the
//! [`global`] module scatters the local vectors into a global vector, serially or in parallel.
pub mod global;
pub mod local;
