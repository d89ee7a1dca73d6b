//! Nearest-neighbour search over corpus embeddings.

pub mod flat;

pub use flat::FlatIndex;

use ragline_core::Result;

/// One search hit: the index row and its squared-L2 distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub row: usize,
    pub distance: f32,
}

/// A read-only index whose rows line up one-to-one with a chunk store.
pub trait SimilarityIndex: Send + Sync {
    /// Vector width every row and query must have
    fn dimension(&self) -> usize;

    /// Number of rows
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Up to `k` rows by ascending distance (all rows when `k >= len`).
    /// Repeated calls with the same query return identical results.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>>;
}
