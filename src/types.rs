use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::embedding::EmbeddingVector;

/// Stored embedding exactly as it arrives from the data store.
///
/// Catalogue backends are inconsistent about the column type: some return a
/// native numeric array, others a string holding JSON array text or
/// delimited numbers. Both forms are accepted here and normalized in a
/// single place by [`crate::embedding::decode`] at the start of each scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawEmbedding {
    /// Native numeric sequence.
    Values(Vec<f32>),
    /// String-encoded form: JSON array text or delimited numeric text.
    Text(String),
}

/// A catalogued course as supplied by the data-store collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseRecord {
    /// Unique course code, e.g. `"GRA4136"`. Primary key in the catalogue.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Teaching-language tag, e.g. `"nb"` or `"en"`. Untagged records never
    /// receive a cross-language boost.
    #[serde(default)]
    pub language: Option<String>,
    /// One or more stored embeddings. A record may carry vectors from more
    /// than one generation model concurrently; the engine resolves which one
    /// to use by dimension compatibility with the query.
    pub embeddings: Vec<RawEmbedding>,
    /// Opaque pass-through blob (credits, level of study, coordinator, …).
    /// Never inspected by the engine, only copied onto hits.
    #[serde(default)]
    pub metadata: JsonValue,
}

impl CourseRecord {
    /// Convenience constructor for a record with a single embedding and no
    /// language tag or metadata.
    pub fn new(code: impl Into<String>, name: impl Into<String>, embedding: RawEmbedding) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            language: None,
            embeddings: vec![embedding],
            metadata: JsonValue::Null,
        }
    }

    /// Attach a teaching-language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Attach a pass-through metadata blob.
    pub fn with_metadata(mut self, metadata: JsonValue) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Ephemeral query: one or two validated embeddings derived externally from
/// free text, plus an optional language tag.
///
/// The second vector exists for corpora that mix generation models: when a
/// candidate's dimension does not match the primary vector but matches the
/// secondary, the secondary is used for that candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCourse {
    /// Primary query embedding.
    pub primary: EmbeddingVector,
    /// Optional second embedding from another generation model.
    pub secondary: Option<EmbeddingVector>,
    /// Language tag of the query text.
    pub language: Option<String>,
}

impl QueryCourse {
    pub fn new(primary: EmbeddingVector) -> Self {
        Self {
            primary,
            secondary: None,
            language: None,
        }
    }

    /// Attach a second embedding from another generation model.
    pub fn with_secondary(mut self, secondary: EmbeddingVector) -> Self {
        self.secondary = Some(secondary);
        self
    }

    /// Attach the query's language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// A single ranked hit: candidate course plus its calibrated overlap score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredCourse {
    /// Course code of the matched candidate.
    pub code: String,
    /// Display name of the matched candidate.
    pub name: String,
    /// Calibrated overlap score in [0, 100], one-decimal precision.
    pub score: f32,
    /// Raw cosine similarity that produced the score, surfaced for
    /// observability and explanation tooling.
    pub raw_similarity: f32,
    /// Metadata blob copied verbatim from the record.
    pub metadata: JsonValue,
}

/// Aggregate per-scan diagnostics.
///
/// These support observability and test assertions; the correctness of the
/// returned hit list does not depend on them. Score statistics cover every
/// calibrated candidate, before thresholding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScanDiagnostics {
    /// Candidates successfully decoded, validated, and scored.
    pub processed: usize,
    /// Candidates skipped because no stored embedding decoded cleanly.
    pub skipped_parse: usize,
    /// Candidates skipped because no stored embedding matched the query's
    /// dimensionality.
    pub skipped_dimension: usize,
    /// Candidates skipped because the stored embedding had zero magnitude.
    pub skipped_degenerate: usize,
    /// Lowest calibrated score observed.
    pub score_min: Option<f32>,
    /// Highest calibrated score observed.
    pub score_max: Option<f32>,
    /// Mean calibrated score.
    pub score_mean: Option<f32>,
}

impl ScanDiagnostics {
    /// Total candidates skipped, across all causes.
    pub fn skipped(&self) -> usize {
        self.skipped_parse + self.skipped_dimension + self.skipped_degenerate
    }
}

/// Result of one ranking pass: ordered hits plus scan diagnostics.
///
/// `hits` is sorted non-increasing by score, ties preserving corpus order,
/// and contains no score below the configured threshold. Empty `hits` is a
/// valid outcome, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedMatches {
    pub hits: Vec<ScoredCourse>,
    pub diagnostics: ScanDiagnostics,
}
