use proptest::prelude::*;
use ragline_core::vector::{normalize, squared_l2};
use ragline_index::{FlatIndex, SimilarityIndex};

const DIM: usize = 4;

fn unit_vector() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-1.0f32..1.0, DIM)
        .prop_filter_map("degenerate vector", normalize)
}

proptest! {
    #[test]
    fn search_is_deterministic(
        corpus in prop::collection::vec(unit_vector(), 1..40),
        query in unit_vector(),
        k in 1usize..50,
    ) {
        let index = FlatIndex::build(corpus).unwrap();
        let first = index.search(&query, k).unwrap();
        let second = index.search(&query, k).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn search_returns_min_k_n_sorted(
        corpus in prop::collection::vec(unit_vector(), 1..40),
        query in unit_vector(),
        k in 1usize..50,
    ) {
        let n = corpus.len();
        let index = FlatIndex::build(corpus).unwrap();
        let hits = index.search(&query, k).unwrap();
        prop_assert_eq!(hits.len(), k.min(n));
        prop_assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
        prop_assert!(hits.iter().all(|h| h.row < n));
    }

    #[test]
    fn search_matches_exhaustive_ranking(
        corpus in prop::collection::vec(unit_vector(), 1..30),
        query in unit_vector(),
        k in 1usize..10,
    ) {
        let mut expected: Vec<(usize, f32)> = corpus
            .iter()
            .enumerate()
            .map(|(row, v)| (row, squared_l2(&query, v)))
            .collect();
        expected.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        expected.truncate(k);

        let index = FlatIndex::build(corpus).unwrap();
        let rows: Vec<usize> = index.search(&query, k).unwrap().iter().map(|h| h.row).collect();
        let expected_rows: Vec<usize> = expected.iter().map(|(row, _)| *row).collect();
        prop_assert_eq!(rows, expected_rows);
    }
}
