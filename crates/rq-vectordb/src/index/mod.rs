//! Vector index implementations.

mod flat;
mod traits;

pub use flat::FlatIndex;
pub use traits::VectorIndex;

/// Search result: `(id, distance)` pairs sorted by ascending distance,
/// ties broken by ascending id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    pub ids: Vec<usize>,
    pub distances: Vec<f32>,
}

impl SearchResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.ids.iter().copied().zip(self.distances.iter().copied())
    }
}

impl FromIterator<(usize, f32)> for SearchResult {
    fn from_iter<I: IntoIterator<Item = (usize, f32)>>(iter: I) -> Self {
        let (ids, distances) = iter.into_iter().unzip();
        Self { ids, distances }
    }
}
