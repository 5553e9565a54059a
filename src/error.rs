use thiserror::Error;

/// Per-candidate embedding failures.
///
/// During a corpus scan these are caught, counted, and logged by the engine;
/// they never abort the batch. The same errors are fatal when they afflict
/// the *query* vector, in which case they propagate wrapped in
/// [`MatchError::Query`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmbeddingError {
    /// Stored embedding text could not be decoded into a flat numeric vector.
    #[error("malformed embedding: {0}")]
    Parse(String),
    /// Embedding length does not match the query's dimensionality.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// Zero-magnitude vector; it has no direction to compare.
    #[error("degenerate embedding: zero magnitude")]
    Degenerate,
}

/// Corpus-level failures surfaced to the caller.
///
/// Everything per-candidate stays inside the engine; only these cross the
/// API boundary. An empty result list is *not* an error: a scan where no
/// candidate clears the threshold returns `RankedMatches` with empty hits.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Invalid engine configuration.
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    /// No candidate courses were supplied at all.
    #[error("empty corpus: no candidate courses supplied")]
    EmptyCorpus,
    /// The query embedding itself was malformed or degenerate.
    #[error("query embedding rejected: {0}")]
    Query(#[from] EmbeddingError),
    /// The scan was cancelled by the caller between records.
    #[error("scan cancelled by caller")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_error_display() {
        let err = EmbeddingError::Parse("unexpected token".into());
        assert!(err.to_string().contains("malformed embedding"));

        let err = EmbeddingError::DimensionMismatch {
            expected: 1536,
            actual: 2000,
        };
        assert!(err.to_string().contains("expected 1536"));
        assert!(err.to_string().contains("got 2000"));

        let err = EmbeddingError::Degenerate;
        assert!(err.to_string().contains("zero magnitude"));
    }

    #[test]
    fn match_error_display() {
        let err = MatchError::EmptyCorpus;
        assert!(err.to_string().contains("empty corpus"));

        let err = MatchError::InvalidConfig("min_score out of range".into());
        assert!(err.to_string().contains("invalid match config"));

        let err = MatchError::Cancelled;
        assert!(err.to_string().contains("cancelled"));
    }

    #[test]
    fn query_error_wraps_embedding_error() {
        let err: MatchError = EmbeddingError::Degenerate.into();
        assert!(matches!(err, MatchError::Query(EmbeddingError::Degenerate)));
        assert!(err.to_string().contains("query embedding rejected"));
    }
}
