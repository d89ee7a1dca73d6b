use crate::{Neighbor, SimilarityIndex};
use ragline_core::vector::squared_l2;
use ragline_core::{RagError, Result};
use std::cmp::Ordering;
use tracing::debug;

/// Exact brute-force index under squared Euclidean distance.
///
/// Vectors are stored row-major in one contiguous buffer; row `i` is the
/// `i`-th vector passed to [`FlatIndex::build`]. Ties on distance are broken
/// by row, so results are fully deterministic.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimension: usize,
    rows: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Build from one vector per chunk, in chunk order.
    ///
    /// Fails on empty input, zero-width vectors or mixed widths.
    pub fn build(vectors: Vec<Vec<f32>>) -> Result<Self> {
        let first = vectors
            .first()
            .ok_or_else(|| RagError::index("cannot build an index from zero vectors"))?;
        let dimension = first.len();
        if dimension == 0 {
            return Err(RagError::index("vectors must have at least one dimension"));
        }

        let mut data = Vec::with_capacity(dimension * vectors.len());
        for (row, vector) in vectors.iter().enumerate() {
            if vector.len() != dimension {
                return Err(RagError::index(format!(
                    "row {} has dimension {}, expected {}",
                    row,
                    vector.len(),
                    dimension
                )));
            }
            data.extend_from_slice(vector);
        }

        debug!(rows = vectors.len(), dimension, "built flat index");
        Ok(Self {
            dimension,
            rows: vectors.len(),
            data,
        })
    }
}

fn by_distance_then_row(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.row.cmp(&b.row))
}

impl SimilarityIndex for FlatIndex {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.rows
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dimension {
            return Err(RagError::index(format!(
                "query has dimension {}, index expects {}",
                query.len(),
                self.dimension
            )));
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut hits: Vec<Neighbor> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(row, vector)| Neighbor {
                row,
                distance: squared_l2(query, vector),
            })
            .collect();

        if k < hits.len() {
            hits.select_nth_unstable_by(k - 1, by_distance_then_row);
            hits.truncate(k);
        }
        hits.sort_unstable_by(by_distance_then_row);
        Ok(hits)
    }
}
