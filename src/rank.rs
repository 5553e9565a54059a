//! Thresholding and deterministic ordering of scored candidates.

use crate::types::ScoredCourse;

/// Drop candidates below `min_score` (inclusive threshold) and sort the
/// rest descending by score.
///
/// The sort is stable, so candidates with equal scores keep corpus
/// iteration order and repeated scans over the same snapshot produce
/// byte-identical result lists. No result-size cap is applied here;
/// pagination is a presentation concern.
pub fn threshold_and_sort(mut candidates: Vec<ScoredCourse>, min_score: f32) -> Vec<ScoredCourse> {
    candidates.retain(|candidate| candidate.score >= min_score);
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates
}
