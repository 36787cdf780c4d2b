//! Flat table projection of the association store.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One raw association row: a single (gene, variant, lead variant, disease)
/// co-occurrence with its evidence and GWAS statistics.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationRow {
    pub gene_id: String,
    pub gene_symbol: String,
    pub gene_chromosome: String,
    pub gene_tss: i64,
    pub variant_id: String,
    pub variant_chromosome: String,
    pub variant_position: i64,
    pub lead_variant_id: String,
    pub disease_id: String,
    pub disease_name: String,
    pub g2v_score: f64,
    pub vep: Option<f64>,
    pub gtex: Option<f64>,
    pub pchic: Option<f64>,
    pub fantom5: Option<f64>,
    pub dhs: Option<f64>,
    pub nearest: Option<f64>,
    pub r2: f64,
    pub gwas_p_value: f64,
    pub gwas_odds_ratio: Option<f64>,
    pub gwas_beta: Option<f64>,
    pub gwas_study: Option<String>,
    pub gwas_pmid: Option<String>,
    pub gwas_size: Option<i64>,
}

/// A page of association rows plus the total match count.
///
/// `total` counts every row matching the predicate and never depends on
/// `offset`/`limit`.
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub rows: Vec<AssociationRow>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}
