pub(crate) mod clenshaw_curtis_table;
pub mod eigen;
pub mod lagrange;
pub mod special_functions;
