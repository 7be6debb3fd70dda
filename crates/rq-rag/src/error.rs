use rq_core::CoreError;
use rq_llm::ProviderError;
use rq_vectordb::VectorDbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RagError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("No data available: the corpus is empty.")]
    EmptyIndex,
    #[error("Embedding failed: {0}")]
    Embedding(#[source] ProviderError),
    #[error("Generation failed: {0}")]
    Generation(#[source] ProviderError),
}

impl RagError {
    /// Whether a query session can report this and keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::EmptyIndex | Self::Embedding(_) | Self::Generation(_))
    }
}

impl From<VectorDbError> for RagError {
    fn from(err: VectorDbError) -> Self {
        match err {
            VectorDbError::DimensionMismatch { expected, got } => {
                Self::DimensionMismatch { expected, got }
            }
            VectorDbError::EmptyIndex => Self::EmptyIndex,
            VectorDbError::InvalidArgument(msg) => Self::InvalidArgument(msg),
        }
    }
}

impl From<CoreError> for RagError {
    fn from(err: CoreError) -> Self {
        Self::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RagError>;
