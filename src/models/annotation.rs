//! Location metadata served by the external annotation source.

use serde::{Deserialize, Serialize};

/// One exon of a canonical transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exon {
    pub id: String,
    pub start: i64,
    pub end: i64,
}

/// The representative transcript model for a gene.
///
/// A gene with zero or more than one canonical transcript reported by the
/// source carries no transcript here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalTranscript {
    pub id: String,
    pub start: i64,
    pub end: i64,
    pub forward_strand: bool,
    pub exons: Vec<Exon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_end: Option<i64>,
}

/// Gene annotation decoded from the source's expanded lookup payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneAnnotation {
    pub id: String,
    pub symbol: Option<String>,
    pub description: Option<String>,
    pub chromosome: String,
    pub start: i64,
    pub end: i64,
    pub forward_strand: bool,
    pub biotype: Option<String>,
    pub canonical_transcript: Option<CanonicalTranscript>,
}

/// Variant coordinates (plus allele metadata when the source reports it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantLocation {
    pub id: String,
    pub chromosome: String,
    pub position: i64,
    pub maf: Option<f64>,
    pub ancestral_allele: Option<String>,
    pub minor_allele: Option<String>,
}
