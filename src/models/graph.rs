//! Graph node and edge records read from the association store.
//!
//! Row decoding happens straight into these types via `sqlx::FromRow`; the
//! column aliases in the repository queries match the field names. Fields
//! filled in by the annotation merge (`forward_strand`,
//! `canonical_transcript`) and the `selected` tag default when the query does
//! not produce them.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::annotation::CanonicalTranscript;

/// A gene node. Location comes from the store; strand and transcript
/// structure are merged in from the annotation cache.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gene {
    pub id: String,
    pub symbol: String,
    pub chromosome: String,
    pub tss: i64,
    pub start: i64,
    pub end: i64,
    #[sqlx(skip)]
    pub forward_strand: Option<bool>,
    #[sqlx(skip)]
    pub canonical_transcript: Option<CanonicalTranscript>,
    #[sqlx(default)]
    pub selected: bool,
}

/// A variant node (LD-expanded SNP).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: String,
    pub chromosome: String,
    pub position: i64,
    #[sqlx(default)]
    pub selected: bool,
}

/// A GWAS lead variant node.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadVariant {
    pub id: String,
    pub chromosome: String,
    pub position: i64,
    #[sqlx(default)]
    pub selected: bool,
}

/// A disease node.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disease {
    pub id: String,
    pub name: String,
    #[sqlx(default)]
    pub selected: bool,
}

/// Functional evidence scores linking a gene to a variant.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct G2vEvidence {
    pub g2v_score: f64,
    pub vep: Option<f64>,
    pub gtex: Option<f64>,
    pub pchic: Option<f64>,
    pub fantom5: Option<f64>,
    pub dhs: Option<f64>,
    pub nearest: Option<f64>,
}

/// Gene-variant association edge; id is `geneId-variantId`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneVariantEdge {
    pub id: String,
    pub gene_id: String,
    pub gene_symbol: String,
    pub gene_chromosome: String,
    pub gene_tss: i64,
    pub variant_id: String,
    pub variant_chromosome: String,
    pub variant_position: i64,
    #[sqlx(flatten)]
    pub evidence: G2vEvidence,
    #[sqlx(skip)]
    pub canonical_transcript: Option<CanonicalTranscript>,
    #[sqlx(default)]
    pub selected: bool,
}

/// Variant to lead-variant LD edge; id is `variantId-leadVariantId`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantLeadVariantEdge {
    pub id: String,
    pub variant_id: String,
    pub variant_chromosome: String,
    pub variant_position: i64,
    pub lead_variant_id: String,
    pub lead_variant_chromosome: String,
    pub lead_variant_position: i64,
    pub r2: f64,
    #[sqlx(default)]
    pub selected: bool,
}

/// GWAS study statistics attached to a lead-variant/disease association.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GwasStats {
    pub p_value: f64,
    pub odds_ratio: Option<f64>,
    pub beta: Option<f64>,
    pub study: Option<String>,
    pub pmid: Option<String>,
    pub size: Option<i64>,
}

/// Lead-variant to disease edge; id is `leadVariantId-diseaseId`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadVariantDiseaseEdge {
    pub id: String,
    pub lead_variant_id: String,
    pub lead_variant_chromosome: String,
    pub lead_variant_position: i64,
    pub disease_id: String,
    pub disease_name: String,
    #[sqlx(flatten)]
    pub gwas_stats: GwasStats,
    #[sqlx(default)]
    pub selected: bool,
}

/// The assembled locus graph for one interval query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocusGraph {
    pub genes: Vec<Gene>,
    pub variants: Vec<Variant>,
    pub lead_variants: Vec<LeadVariant>,
    pub diseases: Vec<Disease>,
    pub gene_variant_edges: Vec<GeneVariantEdge>,
    pub variant_lead_variant_edges: Vec<VariantLeadVariantEdge>,
    pub lead_variant_disease_edges: Vec<LeadVariantDiseaseEdge>,
    pub max_gwas_p_value: f64,
}

/// An exact-match search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub hit_type: &'static str,
}

/// Location of an id that may be a variant, a lead variant, or both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantLocationInfo {
    pub id: String,
    pub is_variant: bool,
    pub is_lead_variant: bool,
    pub chromosome: Option<String>,
    pub position: Option<i64>,
}
