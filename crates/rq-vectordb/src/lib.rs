//! In-memory vector index for document retrieval.
//!
//! Exact k-nearest-neighbour search by squared Euclidean distance. The index
//! is built once from an ordered sequence of vectors and only read afterwards.

pub mod distance;
pub mod error;
pub mod index;

pub use error::{Result, VectorDbError};
pub use index::{FlatIndex, SearchResult, VectorIndex};
