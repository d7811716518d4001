//!
//! Sparse grid quadrature and interpolation over products of one dimensional
//! rules: Smolyak combinations of global rules and adaptive grids of
//! hierarchical local polynomials.
//!
pub mod basis;
pub mod errors;
pub mod grids;
pub mod index_set;
pub mod rules;
pub mod serialization;
pub mod utilities;
