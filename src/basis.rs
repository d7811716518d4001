pub mod base;
pub mod clenshaw_curtis;
pub mod gauss;
pub mod global;
pub mod local_polynomial;
