//! Raw cosine similarity over validated, equal-length vectors.

/// Element-wise tolerance under which two vectors are treated as identical.
pub(crate) const IDENTITY_TOLERANCE: f32 = 1e-6;

/// Raw cosine similarity between two equal-length vectors, clamped to
/// [-1, 1].
///
/// Vectors that are equal within [`IDENTITY_TOLERANCE`] element-wise
/// short-circuit to exactly `1.0`, so near-unit vectors cannot drift below
/// a perfect score. A zero-magnitude pair returns `0.0` instead of dividing
/// by zero; validation rejects such vectors earlier, this is the defensive
/// path that keeps one bad record from aborting a batch.
///
/// Accumulation happens in f64: catalogue embeddings run to a few thousand
/// components and f32 partial sums lose digits at that length.
pub fn raw_cosine(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "validator must enforce equal length");

    if a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|(x, y)| (x - y).abs() < IDENTITY_TOLERANCE)
    {
        return 1.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    (similarity as f32).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_score_exactly_one() {
        let v = vec![0.123_f32, -0.456, 0.789, 0.001];
        assert_eq!(raw_cosine(&v, &v), 1.0);
    }

    #[test]
    fn near_identical_vectors_short_circuit_to_one() {
        let a = vec![0.5_f32, 0.5, 0.5];
        let b = vec![0.5 + 5e-7, 0.5 - 5e-7, 0.5];
        assert_eq!(raw_cosine(&a, &b), 1.0);
    }

    #[test]
    fn symmetry() {
        let a = vec![0.2_f32, 0.7, -0.1, 0.4];
        let b = vec![0.9_f32, -0.3, 0.5, 0.2];
        assert_eq!(raw_cosine(&a, &b), raw_cosine(&b, &a));
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        let a = vec![1.0_f32, 0.0];
        let b = vec![0.0_f32, 1.0];
        assert!(raw_cosine(&a, &b).abs() < 1e-7);
    }

    #[test]
    fn opposite_vectors_score_negative_one() {
        let a = vec![1.0_f32, 2.0, 3.0];
        let b = vec![-1.0_f32, -2.0, -3.0];
        assert!((raw_cosine(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_magnitude_pair_returns_zero() {
        let a = vec![0.0_f32, 0.0];
        let b = vec![1.0_f32, 1.0];
        assert_eq!(raw_cosine(&a, &b), 0.0);
        assert_eq!(raw_cosine(&b, &a), 0.0);
    }

    #[test]
    fn result_is_clamped() {
        // Parallel vectors of different magnitudes can overshoot 1.0 by a
        // few ulps; the clamp absorbs it.
        let a = vec![0.1_f32; 512];
        let b = vec![0.3_f32; 512];
        let similarity = raw_cosine(&a, &b);
        assert!(similarity <= 1.0);
        assert!((similarity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn scale_invariance() {
        let a = vec![0.2_f32, 0.7, -0.1];
        let b: Vec<f32> = a.iter().map(|v| v * 8.0).collect();
        assert!((raw_cosine(&a, &b) - 1.0).abs() < 1e-6);
    }
}
