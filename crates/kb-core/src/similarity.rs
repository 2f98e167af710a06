//! Cosine similarity and brute-force top-K ranking.
//!
//! Ranking is a full O(N·D) scan over every stored vector. It is meant for
//! collections in the dozens; past [`SCAN_WARN_THRESHOLD`] documents callers
//! should log the scaling limit rather than expect an index.

use std::cmp::Ordering;

use tracing::debug;

use crate::knowledge::model::{KnowledgeDocument, ScoredResult};

/// Default number of results returned by a retrieval.
pub const DEFAULT_LIMIT: usize = 3;

/// Collection size past which a full scan is considered out of its depth.
pub const SCAN_WARN_THRESHOLD: usize = 1000;

/// Cosine similarity between two vectors of equal length.
///
/// Returns 0.0 when the result is undefined (a zero vector, NaN inputs).
/// Sums accumulate in `f64` so large `f32` components do not overflow. The
/// result is clamped to `[-1, 1]` to absorb rounding error.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let score = dot / (norm_a.sqrt() * norm_b.sqrt());
    if score.is_finite() {
        score.clamp(-1.0, 1.0) as f32
    } else {
        0.0
    }
}

/// Score every rankable document against `query`, sort descending and keep
/// the first `limit`.
///
/// Documents without an embedding, or whose embedding length differs from
/// the query vector, are left out. Ties keep their input order.
pub fn rank_documents<'a, I>(query: &[f32], documents: I, limit: usize) -> Vec<ScoredResult>
where
    I: IntoIterator<Item = &'a KnowledgeDocument>,
{
    if limit == 0 || query.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<ScoredResult> = documents
        .into_iter()
        .filter(|doc| {
            if !doc.has_embedding() {
                debug!(id = %doc.id, "Skipping document without embedding");
                return false;
            }
            if doc.dimensions() != query.len() {
                debug!(
                    id = %doc.id,
                    expected = query.len(),
                    actual = doc.dimensions(),
                    "Skipping document with mismatched dimensions"
                );
                return false;
            }
            true
        })
        .map(|doc| ScoredResult {
            content: doc.content.clone(),
            score: cosine_similarity(query, &doc.embedding),
        })
        .collect();

    // sort_by is stable, so equal scores keep collection order
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::model::Category;
    use proptest::prelude::*;

    fn doc(content: &str, embedding: Vec<f32>) -> KnowledgeDocument {
        KnowledgeDocument::new(content, Category::General, embedding)
    }

    #[test]
    fn test_identical_vectors_score_one() {
        let v = [0.3, -0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_opposite_vectors_score_minus_one() {
        assert!((cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_large_components_do_not_overflow() {
        let v = [3e19f32, 1e19];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
        assert!((cosine_similarity(&[f32::MAX, 0.0], &[f32::MAX, f32::MAX]) - 0.70710677).abs() < 1e-6);
    }

    #[test]
    fn test_nan_input_scores_zero() {
        assert_eq!(cosine_similarity(&[f32::NAN, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_top_two_of_three() {
        let docs = vec![
            doc("x-axis", vec![1.0, 0.0]),
            doc("y-axis", vec![0.0, 1.0]),
            doc("mostly-x", vec![0.9, 0.1]),
        ];

        let results = rank_documents(&[1.0, 0.0], &docs, 2);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content, "x-axis");
        assert!((results[0].score - 1.0).abs() < 1e-6);
        assert_eq!(results[1].content, "mostly-x");
        assert!((results[1].score - 0.9939).abs() < 1e-3);
        assert!(results.iter().all(|r| r.content != "y-axis"));
    }

    #[test]
    fn test_skips_missing_and_mismatched_embeddings() {
        let docs = vec![
            doc("empty", Vec::new()),
            doc("three-dim", vec![1.0, 0.0, 0.0]),
            doc("ok", vec![0.5, 0.5]),
        ];

        let results = rank_documents(&[1.0, 0.0], &docs, 10);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "ok");
    }

    #[test]
    fn test_zero_vector_document_is_ranked_with_zero() {
        let docs = vec![doc("zero", vec![0.0, 0.0]), doc("neg", vec![-1.0, 0.0])];
        let results = rank_documents(&[1.0, 0.0], &docs, 5);
        assert_eq!(results[0].content, "zero");
        assert_eq!(results[0].score, 0.0);
        assert_eq!(results[1].content, "neg");
    }

    #[test]
    fn test_ties_keep_collection_order() {
        let docs = vec![
            doc("first", vec![0.6, 0.8]),
            doc("second", vec![0.6, 0.8]),
            doc("third", vec![0.6, 0.8]),
        ];
        let results = rank_documents(&[0.8, 0.6], &docs, 3);
        let order: Vec<&str> = results.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_zero_limit_and_empty_inputs() {
        let docs = vec![doc("a", vec![1.0])];
        assert!(rank_documents(&[1.0], &docs, 0).is_empty());
        assert!(rank_documents(&[], &docs, 3).is_empty());
        assert!(rank_documents(&[1.0], &Vec::<KnowledgeDocument>::new(), 3).is_empty());
    }

    fn vec_pair(dim: usize) -> impl Strategy<Value = (Vec<f32>, Vec<f32>)> {
        (
            proptest::collection::vec(-1.0f32..1.0f32, dim),
            proptest::collection::vec(-1.0f32..1.0f32, dim),
        )
    }

    proptest! {
        #[test]
        fn prop_cosine_is_symmetric((a, b) in vec_pair(8)) {
            prop_assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
        }

        #[test]
        fn prop_cosine_stays_in_range((a, b) in vec_pair(8)) {
            let score = cosine_similarity(&a, &b);
            prop_assert!((-1.0..=1.0).contains(&score));
        }

        #[test]
        fn prop_results_bounded_and_sorted(
            embeddings in proptest::collection::vec(
                prop_oneof![
                    Just(Vec::new()),
                    proptest::collection::vec(-1.0f32..1.0f32, 4),
                ],
                0..20,
            ),
            query in proptest::collection::vec(-1.0f32..1.0f32, 4),
            limit in 0usize..25,
        ) {
            let docs: Vec<KnowledgeDocument> = embeddings
                .into_iter()
                .enumerate()
                .map(|(i, e)| doc(&format!("doc-{i}"), e))
                .collect();
            let valid = docs.iter().filter(|d| d.has_embedding()).count();

            let results = rank_documents(&query, &docs, limit);

            prop_assert!(results.len() <= limit);
            prop_assert!(results.len() <= valid);
            for pair in results.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
        }
    }
}
