use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VectorDbError {
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("Index is empty")]
    EmptyIndex,
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, VectorDbError>;
