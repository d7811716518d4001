use crate::rules::RuleType;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SGError
{
    #[error("number of dimensions must be positive")]
    InvalidDimensions,
    #[error("number of outputs {0} is not valid for this grid")]
    InvalidOutputs(usize),
    #[error("depth must be non-negative, got {0}")]
    InvalidDepth(i32),
    #[error("anisotropic weights have length {found}, expected {expected}")]
    AnisotropicWeightsMismatch { expected: usize, found: usize },
    #[error("anisotropic weights must be positive, got {0}")]
    InvalidAnisotropicWeight(i32),
    #[error("rule parameter {name} = {value} is out of range")]
    InvalidRuleParameter { name: &'static str, value: f64 },
    #[error("rule {0:?} is not supported by this grid")]
    UnsupportedRule(RuleType),
    #[error("polynomial order {0} is not supported")]
    InvalidOrder(i32),
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("expected {expected} values, found {found}")]
    NumberOfPointsAndValuesMismatch { expected: usize, found: usize },
    #[error("grid has no loaded values")]
    NoValuesLoaded,
    #[error("domain transform is invalid")]
    InvalidTransform,
    #[error("tridiagonal eigensolver did not converge for size {size}")]
    EigenSolverNotConverged { size: usize },
    #[error("serialization failed")]
    SerializationFailed,
    #[error("deserialization failed")]
    DeserializationFailed,
    #[error("LZ4 decompression failed")]
    LZ4DecompressionFailed,
    #[error("file could not be opened")]
    FileIOError,
    #[error("failed to read buffer")]
    ReadBufferFailed,
    #[error("failed to write buffer")]
    WriteBufferFailed,
}
