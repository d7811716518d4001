pub mod domain_transform;
pub mod global_grid;
pub mod local_polynomial_grid;
pub mod sparse_grid;
