use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info};

use crate::cache::{pair_key, SimilarityCache};
use crate::config::MatchConfig;
use crate::embedding::{decode, EmbeddingVector};
use crate::error::{EmbeddingError, MatchError};
use crate::metrics::metrics_recorder;
use crate::rank::threshold_and_sort;
use crate::similarity::raw_cosine;
use crate::types::{CourseRecord, QueryCourse, RankedMatches, ScanDiagnostics, ScoredCourse};


/// Cooperative cancellation flag, checked between records during a scan.
///
/// Cloning shares the flag; the caller keeps one handle and hands the other
/// to the scan, then calls [`cancel`](Self::cancel) when a request timeout
/// fires. Cancellation is sticky.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of any scan holding this flag.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why a candidate was excluded from scoring.
enum SkipCause {
    Parse,
    Dimension,
    Degenerate,
}

/// Outcome of scoring one corpus record.
enum Outcome {
    Scored(ScoredCourse),
    Skipped(SkipCause),
}

/// Scoring and ranking engine over an in-memory corpus snapshot.
///
/// One instance is cheap and stateless across calls: embeddings are
/// re-decoded from their raw stored form on every pass, and scored
/// candidates live only until the response is built. The optional
/// [`SimilarityCache`] is the single deliberate exception, injected by the
/// caller.
pub struct OverlapEngine {
    config: MatchConfig,
    cache: Option<Arc<dyn SimilarityCache>>,
}

impl OverlapEngine {
    /// Construct an engine from an explicit config.
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            cache: None,
        }
    }

    /// Construct an engine with an injected similarity cache.
    pub fn with_cache(config: MatchConfig, cache: Arc<dyn SimilarityCache>) -> Self {
        Self {
            config,
            cache: Some(cache),
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Score and rank the full corpus snapshot against the query.
    ///
    /// Per-candidate failures (malformed stored embedding, dimension
    /// mismatch, zero-magnitude vector) are counted in the diagnostics and
    /// never abort the batch. Only corpus-level problems (an invalid
    /// config or an empty snapshot) return an error. A scan where no
    /// candidate clears the threshold returns empty `hits`.
    pub fn rank(
        &self,
        query: &QueryCourse,
        corpus: &[CourseRecord],
    ) -> Result<RankedMatches, MatchError> {
        self.rank_with_cancel(query, corpus, &CancelFlag::default())
    }

    /// [`rank`](Self::rank) with cooperative cancellation: `cancel` is
    /// checked between records and aborts the scan with
    /// [`MatchError::Cancelled`].
    pub fn rank_with_cancel(
        &self,
        query: &QueryCourse,
        corpus: &[CourseRecord],
        cancel: &CancelFlag,
    ) -> Result<RankedMatches, MatchError> {
        self.config.validate()?;
        if corpus.is_empty() {
            return Err(MatchError::EmptyCorpus);
        }

        let start = Instant::now();
        let outcomes = self.scan(query, corpus, cancel)?;

        let mut diagnostics = ScanDiagnostics::default();
        let mut candidates = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                Outcome::Scored(candidate) => {
                    diagnostics.processed += 1;
                    candidates.push(candidate);
                }
                Outcome::Skipped(SkipCause::Parse) => diagnostics.skipped_parse += 1,
                Outcome::Skipped(SkipCause::Dimension) => diagnostics.skipped_dimension += 1,
                Outcome::Skipped(SkipCause::Degenerate) => diagnostics.skipped_degenerate += 1,
            }
        }

        if !candidates.is_empty() {
            let mut min = f32::MAX;
            let mut max = f32::MIN;
            let mut sum = 0.0f64;
            for candidate in &candidates {
                min = min.min(candidate.score);
                max = max.max(candidate.score);
                sum += f64::from(candidate.score);
            }
            diagnostics.score_min = Some(min);
            diagnostics.score_max = Some(max);
            diagnostics.score_mean = Some((sum / candidates.len() as f64) as f32);
        }

        let hits = threshold_and_sort(candidates, self.config.min_score);
        let latency = start.elapsed();

        info!(
            processed = diagnostics.processed,
            skipped = diagnostics.skipped(),
            hits = hits.len(),
            elapsed_ms = latency.as_millis() as u64,
            "corpus scan complete"
        );

        if let Some(recorder) = metrics_recorder() {
            recorder.record_scan(
                &self.config.policy,
                latency,
                diagnostics.processed,
                diagnostics.skipped(),
            );
        }

        Ok(RankedMatches { hits, diagnostics })
    }

    fn scan(
        &self,
        query: &QueryCourse,
        corpus: &[CourseRecord],
        cancel: &CancelFlag,
    ) -> Result<Vec<Outcome>, MatchError> {
        #[cfg(feature = "parallel")]
        if self.config.use_parallel {
            return self.scan_parallel(query, corpus, cancel);
        }

        let mut outcomes = Vec::with_capacity(corpus.len());
        for record in corpus {
            if cancel.is_cancelled() {
                return Err(MatchError::Cancelled);
            }
            outcomes.push(self.score_record(query, record));
        }
        Ok(outcomes)
    }

    /// Parallel scan. Each worker produces independent per-record outcomes;
    /// the indexed collect is the only synchronization point and preserves
    /// corpus order, so tie-breaks match the sequential scan exactly.
    #[cfg(feature = "parallel")]
    fn scan_parallel(
        &self,
        query: &QueryCourse,
        corpus: &[CourseRecord],
        cancel: &CancelFlag,
    ) -> Result<Vec<Outcome>, MatchError> {
        let outcomes: Vec<Option<Outcome>> = corpus
            .par_iter()
            .map(|record| {
                if cancel.is_cancelled() {
                    None
                } else {
                    Some(self.score_record(query, record))
                }
            })
            .collect();

        // A `None` can only appear once the flag is set, and the flag is
        // sticky, so this check cannot miss a partial scan.
        if cancel.is_cancelled() {
            return Err(MatchError::Cancelled);
        }
        Ok(outcomes.into_iter().flatten().collect())
    }

    fn score_record(&self, query: &QueryCourse, record: &CourseRecord) -> Outcome {
        let (query_vector, candidate_vector) = match self.resolve_embedding(query, record) {
            Ok(pair) => pair,
            Err(cause) => return Outcome::Skipped(cause),
        };

        let raw = self.cached_cosine(query_vector, &candidate_vector);

        let cross_language = match (&query.language, &record.language) {
            (Some(query_language), Some(record_language)) => query_language != record_language,
            _ => false,
        };
        let score = self.config.policy.calibrate(raw, cross_language);

        Outcome::Scored(ScoredCourse {
            code: record.code.clone(),
            name: record.name.clone(),
            score,
            raw_similarity: raw,
            metadata: record.metadata.clone(),
        })
    }

    /// Pick the first stored embedding compatible with the query: decoded
    /// cleanly and matching the primary (or secondary) dimensionality.
    ///
    /// When nothing is compatible, the most specific failure wins the skip
    /// counter: a well-formed vector of the wrong dimension over a
    /// degenerate one, a degenerate one over undecodable text.
    fn resolve_embedding<'q>(
        &self,
        query: &'q QueryCourse,
        record: &CourseRecord,
    ) -> Result<(&'q EmbeddingVector, EmbeddingVector), SkipCause> {
        let mut saw_dimension_mismatch = false;
        let mut saw_degenerate = false;

        for raw in &record.embeddings {
            match decode(raw) {
                Ok(vector) => {
                    if vector.matches_dimension(query.primary.dimension()) {
                        return Ok((&query.primary, vector));
                    }
                    if let Some(secondary) = &query.secondary {
                        if vector.matches_dimension(secondary.dimension()) {
                            return Ok((secondary, vector));
                        }
                    }
                    debug!(
                        code = %record.code,
                        expected = query.primary.dimension(),
                        actual = vector.dimension(),
                        "skipping candidate: dimension mismatch"
                    );
                    saw_dimension_mismatch = true;
                }
                Err(EmbeddingError::Degenerate) => {
                    debug!(code = %record.code, "skipping candidate: degenerate embedding");
                    saw_degenerate = true;
                }
                Err(err) => {
                    debug!(code = %record.code, error = %err, "skipping candidate: undecodable embedding");
                }
            }
        }

        if saw_dimension_mismatch {
            Err(SkipCause::Dimension)
        } else if saw_degenerate {
            Err(SkipCause::Degenerate)
        } else {
            if record.embeddings.is_empty() {
                debug!(code = %record.code, "skipping candidate: no embedding present");
            }
            Err(SkipCause::Parse)
        }
    }

    fn cached_cosine(&self, query: &EmbeddingVector, candidate: &EmbeddingVector) -> f32 {
        match &self.cache {
            Some(cache) => {
                let key = pair_key(query.as_slice(), candidate.as_slice());
                if let Some(raw) = cache.get(key) {
                    raw
                } else {
                    let raw = raw_cosine(query.as_slice(), candidate.as_slice());
                    cache.put(key, raw);
                    raw
                }
            }
            None => raw_cosine(query.as_slice(), candidate.as_slice()),
        }
    }
}
