use super::SearchResult;
use crate::error::Result;

/// Read side of a built vector index.
///
/// Implementations must return the exact top-k by squared L2 distance,
/// ascending, with equal distances ordered by ascending id.
pub trait VectorIndex: Send + Sync {
    /// Search for the `top_k` nearest vectors.
    ///
    /// Fails with `InvalidArgument` when `top_k` is zero, `EmptyIndex` when
    /// nothing is stored, and `DimensionMismatch` when the query has the
    /// wrong length. A `top_k` larger than the index returns every entry.
    fn search(&self, query: &[f32], top_k: usize) -> Result<SearchResult>;

    /// Number of stored vectors.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shared vector dimension, or `None` before the first vector.
    fn dimension(&self) -> Option<usize>;
}
