//! Error types for the locus graph engine.
//!
//! One enum per concern, folded into [`LocusError`] at the service boundary.
//! Storage failures are fatal to the enclosing request; annotation lookup
//! failures are absorbed by the cache layer (see `annotation::cache`), so
//! [`AnnotationError`] normally surfaces only from direct client use.

use thiserror::Error;

/// Top-level error for locus graph resolution.
#[derive(Error, Debug)]
pub enum LocusError {
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("annotation lookup error: {0}")]
    Annotation(#[from] AnnotationError),

    #[error("invalid query: {0}")]
    Filter(#[from] FilterError),
}

/// Rejected filter, selection, or interval input.
///
/// These are raised before any predicate is built; a malformed filter never
/// reaches the store.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("range filter '{field}' must have exactly 2 bounds, got {len}")]
    MalformedRange { field: &'static str, len: usize },

    #[error("range filter '{field}' bounds must be finite numbers")]
    NonFiniteRange { field: &'static str },

    #[error("unknown evidence field '{0}'")]
    UnknownEvidenceField(String),

    #[error("selection id '{id}' is not a '{separator}'-separated pair")]
    MalformedSelectionId { id: String, separator: char },

    #[error("interval start {start} is greater than end {end}")]
    InvalidInterval { start: i64, end: i64 },

    #[error("interval chromosome must not be empty")]
    EmptyChromosome,

    #[error("pagination offset {offset} and limit {limit} must be non-negative")]
    InvalidPagination { offset: i64, limit: i64 },
}

/// Failure talking to or decoding the external annotation source.
#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("invalid annotation base url: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error("annotation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("annotation source returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode annotation payload: {0}")]
    Decode(#[from] serde_json::Error),
}
