//! Storage-boundary decoding and validation of stored embeddings.
//!
//! Every raw embedding is normalized here, once, at the edge of the engine:
//! native arrays pass through, string payloads are tried as JSON array text
//! first and as comma/whitespace-delimited numbers second. Downstream code
//! only ever sees a validated [`EmbeddingVector`].

use crate::error::EmbeddingError;
use crate::types::RawEmbedding;

/// A validated embedding vector: non-empty, all components finite, nonzero
/// Euclidean norm.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingVector {
    values: Vec<f32>,
}

impl EmbeddingVector {
    /// Validate a native vector supplied by the caller (e.g. a freshly
    /// generated query embedding).
    pub fn from_values(values: Vec<f32>) -> Result<Self, EmbeddingError> {
        if values.is_empty() {
            return Err(EmbeddingError::Parse("empty embedding".into()));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(EmbeddingError::Parse(
                "embedding contains a non-finite component".into(),
            ));
        }
        let norm_sq: f32 = values.iter().map(|v| v * v).sum();
        if norm_sq == 0.0 {
            return Err(EmbeddingError::Degenerate);
        }
        Ok(Self { values })
    }

    /// Dimensionality of the vector.
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// True iff the vector has exactly `expected` components.
    pub fn matches_dimension(&self, expected: usize) -> bool {
        self.values.len() == expected
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }
}

/// Decode a stored embedding into a validated vector.
///
/// Fails with [`EmbeddingError::Parse`] when decoding yields a non-flat or
/// non-numeric result, and with [`EmbeddingError::Degenerate`] when the
/// decoded vector has zero magnitude.
pub fn decode(raw: &RawEmbedding) -> Result<EmbeddingVector, EmbeddingError> {
    let values = match raw {
        RawEmbedding::Values(values) => values.clone(),
        RawEmbedding::Text(text) => decode_text(text)?,
    };
    EmbeddingVector::from_values(values)
}

fn decode_text(text: &str) -> Result<Vec<f32>, EmbeddingError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(EmbeddingError::Parse("empty embedding text".into()));
    }
    // JSON array text is the common stored form; nested arrays or mixed
    // element types fail the typed parse and are rejected as non-flat.
    if trimmed.starts_with('[') {
        return serde_json::from_str::<Vec<f32>>(trimmed)
            .map_err(|e| EmbeddingError::Parse(format!("invalid JSON array: {e}")));
    }
    trimmed
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<f32>()
                .map_err(|_| EmbeddingError::Parse(format!("invalid number {part:?}")))
        })
        .collect()
}
