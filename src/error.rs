//! Errors that can escape the extraction engine.
//!
//! Per-field probe failures never show up here: they are absorbed by the extractor
//! and the affected field is simply omitted. What remains is input the engine cannot
//! start from at all.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The caller handed over something that is not a document (null, malformed JSON,
    /// wrong shape).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Descriptors could not be encoded (only reachable from fingerprinting).
    #[error("failed to encode descriptors: {0}")]
    Encode(#[from] serde_json::Error),
}
