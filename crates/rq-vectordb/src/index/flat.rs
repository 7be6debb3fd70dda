use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use tracing::debug;

use super::{traits::VectorIndex, SearchResult};
use crate::distance;
use crate::error::{Result, VectorDbError};

/// Brute-force (flat) vector index.
/// Exact nearest-neighbor search by scanning all vectors.
///
/// Vectors are stored row-major in one contiguous buffer; row `i` is the
/// vector with id `i`.
#[derive(Debug, Clone, Default)]
pub struct FlatIndex {
    dimension: Option<usize>,
    data: Vec<f32>,
    count: usize,
}

impl FlatIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from vectors in input order. Ids are assigned `0..n`.
    ///
    /// The first vector fixes the dimension; any later vector of another
    /// length fails with `DimensionMismatch`. Empty input gives an empty index.
    pub fn build<I>(vectors: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<[f32]>,
    {
        let mut index = Self::new();
        for vector in vectors {
            index.push(vector.as_ref())?;
        }
        debug!(vectors = index.count, dimension = ?index.dimension, "built flat index");
        Ok(index)
    }

    fn push(&mut self, vector: &[f32]) -> Result<usize> {
        match self.dimension {
            Some(expected) if expected != vector.len() => {
                return Err(VectorDbError::DimensionMismatch {
                    expected,
                    got: vector.len(),
                });
            }
            Some(_) => {}
            None => {
                if vector.is_empty() {
                    return Err(VectorDbError::InvalidArgument(
                        "vectors must have at least one component".into(),
                    ));
                }
                self.dimension = Some(vector.len());
                self.data.reserve(vector.len());
            }
        }
        self.data.extend_from_slice(vector);
        let id = self.count;
        self.count += 1;
        Ok(id)
    }

    /// Stored vector for `id`, if any.
    pub fn vector(&self, id: usize) -> Option<&[f32]> {
        let dim = self.dimension?;
        if id >= self.count {
            return None;
        }
        Some(&self.data[id * dim..(id + 1) * dim])
    }

    fn rows(&self) -> impl Iterator<Item = &[f32]> {
        // chunks_exact panics on 0; an index with a dimension has dim >= 1.
        self.data.chunks_exact(self.dimension.unwrap_or(1))
    }
}

fn by_distance_then_id(a: &(usize, f32), b: &(usize, f32)) -> Ordering {
    OrderedFloat(a.1)
        .cmp(&OrderedFloat(b.1))
        .then_with(|| a.0.cmp(&b.0))
}

impl VectorIndex for FlatIndex {
    fn search(&self, query: &[f32], top_k: usize) -> Result<SearchResult> {
        if top_k == 0 {
            return Err(VectorDbError::InvalidArgument("k must be at least 1".into()));
        }
        let Some(dim) = self.dimension else {
            return Err(VectorDbError::EmptyIndex);
        };
        if query.len() != dim {
            return Err(VectorDbError::DimensionMismatch {
                expected: dim,
                got: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .rows()
            .enumerate()
            .map(|(id, vec)| (id, distance::l2_squared(query, vec)))
            .collect();

        // Partial selection first, then sort only the survivors.
        if top_k < scored.len() {
            scored.select_nth_unstable_by(top_k - 1, by_distance_then_id);
            scored.truncate(top_k);
        }
        scored.sort_unstable_by(by_distance_then_id);

        Ok(scored.into_iter().collect())
    }

    fn len(&self) -> usize {
        self.count
    }

    fn dimension(&self) -> Option<usize> {
        self.dimension
    }
}
