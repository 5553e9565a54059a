//! # coursematch
//!
//! ## Purpose
//!
//! `coursematch` is the scoring and ranking core of a course-overlap
//! analysis service. Given a query embedding (generated upstream from a
//! free-text course description) and an in-memory snapshot of catalogued
//! courses, it computes a calibrated 0–100 overlap score per candidate,
//! filters out non-matches, and returns a deterministically ordered result
//! list.
//!
//! Embedding generation, natural-language explanations, persistence, and
//! result presentation are external collaborators: the engine consumes
//! their output ([`CourseRecord`] snapshots, [`QueryCourse`] vectors) and
//! produces input for them ([`RankedMatches`]).
//!
//! ## Core Types
//!
//! - [`RawEmbedding`]: a stored embedding as the data store returns it:
//!   native array, JSON array text, or delimited numeric text.
//! - [`EmbeddingVector`]: a validated vector; produced by
//!   [`embedding::decode`] or [`EmbeddingVector::from_values`].
//! - [`CourseRecord`] / [`QueryCourse`]: corpus snapshot entry and
//!   per-request query.
//! - [`CalibrationPolicy`]: swappable score calibration strategy:
//!   `power_law` or the canonical `breakpoint` with cross-language boost.
//! - [`MatchConfig`]: threshold, policy, parallelism; YAML-loadable.
//! - [`OverlapEngine`]: runs the scan; [`RankedMatches`] carries the
//!   ordered hits plus per-scan [`ScanDiagnostics`].
//!
//! ## Example Usage
//!
//! ```
//! use coursematch::{
//!     CourseRecord, EmbeddingVector, MatchConfig, OverlapEngine, QueryCourse, RawEmbedding,
//! };
//!
//! let query = QueryCourse::new(EmbeddingVector::from_values(vec![0.1, 0.7, 0.2])?)
//!     .with_language("nb");
//!
//! let corpus = vec![
//!     CourseRecord::new(
//!         "GRA4136",
//!         "Marketing Analytics",
//!         RawEmbedding::Values(vec![0.1, 0.7, 0.2]),
//!     ),
//!     CourseRecord::new(
//!         "EXC3100",
//!         "Strategy",
//!         RawEmbedding::Text("[0.9, -0.1, 0.0]".into()),
//!     ),
//! ];
//!
//! let engine = OverlapEngine::new(MatchConfig::default());
//! let matches = engine.rank(&query, &corpus)?;
//!
//! assert_eq!(matches.hits.len(), 1);
//! assert_eq!(matches.hits[0].code, "GRA4136");
//! assert_eq!(matches.hits[0].score, 100.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Observability
//!
//! Install a [`MatchMetrics`] implementation via [`set_match_metrics`] to
//! record per-scan latency and hit/skip counts. Per-candidate skips are
//! additionally logged at `debug` level through `tracing` and tallied in
//! [`ScanDiagnostics`].

pub mod cache;
pub mod calibrate;
pub mod config;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod rank;
pub mod similarity;
pub mod types;

pub use crate::cache::{pair_key, LruSimilarityCache, SimilarityCache};
pub use crate::calibrate::CalibrationPolicy;
pub use crate::config::{ConfigLoadError, MatchConfig};
pub use crate::embedding::{decode, EmbeddingVector};
pub use crate::engine::{CancelFlag, OverlapEngine};
pub use crate::error::{EmbeddingError, MatchError};
pub use crate::metrics::{set_match_metrics, MatchMetrics};
pub use crate::rank::threshold_and_sort;
pub use crate::similarity::raw_cosine;
pub use crate::types::{
    CourseRecord, QueryCourse, RankedMatches, RawEmbedding, ScanDiagnostics, ScoredCourse,
};
