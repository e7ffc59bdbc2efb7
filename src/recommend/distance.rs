use rayon::prelude::*;

use crate::catalog::FeatureVector;

/// Upper bound of `1 - cos`, used when either operand has zero magnitude
/// (cosine similarity is undefined there, the request must not fail).
pub const MAX_COSINE_DISTANCE: f64 = 2.0;

pub fn cosine_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for i in 0..a.len() {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }
    if norm_a <= 0.0 || norm_b <= 0.0 {
        return MAX_COSINE_DISTANCE;
    }
    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Ranks candidate rows ascending by cosine distance to the query.
///
/// The sort is stable over the given row order, so candidates at equal
/// distance keep their catalog order.
pub fn rank_rows(
    query: &FeatureVector,
    normalized: &[FeatureVector],
    rows: &[usize],
) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = rows
        .par_iter()
        .map(|&row| (row, cosine_distance(query, &normalized[row])))
        .collect();
    ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FEATURE_DIM;

    fn vector(values: &[(usize, f64)]) -> FeatureVector {
        let mut v = [0.0; FEATURE_DIM];
        for &(i, value) in values {
            v[i] = value;
        }
        v
    }

    #[test]
    fn identical_vectors_have_zero_distance() {
        let a = vector(&[(0, 1.0), (3, 2.5), (14, -0.5)]);
        assert!(cosine_distance(&a, &a).abs() < 1e-12);
    }

    #[test]
    fn scaling_does_not_change_the_distance() {
        let a = vector(&[(0, 1.0), (5, 2.0)]);
        let mut b = a;
        for value in &mut b {
            *value *= 42.0;
        }
        assert!(cosine_distance(&a, &b).abs() < 1e-12);
    }

    #[test]
    fn orthogonal_vectors_are_at_distance_one() {
        let a = vector(&[(0, 1.0)]);
        let b = vector(&[(1, 1.0)]);
        assert!((cosine_distance(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn opposite_vectors_are_at_distance_two() {
        let a = vector(&[(2, 1.0)]);
        let b = vector(&[(2, -1.0)]);
        assert!((cosine_distance(&a, &b) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn zero_vector_yields_the_maximal_distance() {
        let zero = [0.0; FEATURE_DIM];
        let a = vector(&[(0, 1.0)]);
        assert_eq!(cosine_distance(&zero, &a), MAX_COSINE_DISTANCE);
        assert_eq!(cosine_distance(&a, &zero), MAX_COSINE_DISTANCE);
        assert_eq!(cosine_distance(&zero, &zero), MAX_COSINE_DISTANCE);
    }

    #[test]
    fn ranking_is_ascending_and_stable_on_ties() {
        let query = vector(&[(0, 1.0)]);
        let normalized = vec![
            vector(&[(1, 1.0)]),           // distance 1
            vector(&[(0, 2.0)]),           // distance 0
            vector(&[(1, 3.0)]),           // distance 1, ties with row 0
            vector(&[(0, 1.0), (1, 1.0)]), // distance between 0 and 1
        ];
        let rows: Vec<usize> = (0..normalized.len()).collect();

        let ranked = rank_rows(&query, &normalized, &rows);
        let order: Vec<usize> = ranked.iter().map(|(row, _)| *row).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);

        for pair in ranked.windows(2) {
            assert!(pair[0].1 <= pair[1].1);
        }
    }
}
