//! Request-side types: interval, filters, selection, query envelopes.

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// A genomic interval on a named chromosome, 1-based inclusive coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub chromosome: String,
    pub start: i64,
    pub end: i64,
}

impl Interval {
    pub fn new(chromosome: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            chromosome: chromosome.into(),
            start,
            end,
        }
    }

    /// Basic integrity check, run before any predicate is built.
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.chromosome.is_empty() {
            return Err(FilterError::EmptyChromosome);
        }
        if self.start > self.end {
            return Err(FilterError::InvalidInterval {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// Evidence filters applied to edge queries.
///
/// Ranges arrive as JSON arrays and are validated (exactly two finite bounds)
/// when compiled; `gwas_significance_range` is expressed in -log10 units and
/// inverted into probability space by the compiler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub must_have_evidence: Vec<String>,
    pub g2v_score_range: Option<Vec<f64>>,
    pub r2_range: Option<Vec<f64>>,
    pub gwas_significance_range: Option<Vec<f64>>,
}

impl FilterSpec {
    pub fn is_empty(&self) -> bool {
        self.must_have_evidence.is_empty()
            && self.g2v_score_range.is_none()
            && self.r2_range.is_none()
            && self.gwas_significance_range.is_none()
    }
}

/// The record kind a selection points at.
///
/// Unrecognized type names are rejected at deserialization time.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionType {
    Gene,
    Variant,
    LeadVariant,
    Disease,
    GeneVariant,
    VariantLeadVariant,
    LeadVariantDisease,
}

/// A user selection to tag in the result set.
///
/// Compound types carry a `"-"`-joined id pair ("ENSG...-rs...").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub id: String,
    #[serde(rename = "type")]
    pub selection_type: SelectionType,
}

/// Full graph query: interval plus optional filters and selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocusQuery {
    pub interval: Interval,
    #[serde(default)]
    pub filters: FilterSpec,
    #[serde(default)]
    pub selection: Option<Selection>,
}

fn default_limit() -> i64 {
    25
}

/// Flat table query over an interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocusTableQuery {
    pub interval: Interval,
    #[serde(default)]
    pub filters: FilterSpec,
    #[serde(default)]
    pub selection: Option<Selection>,
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

/// Flat table query scoped to one disease.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseTableQuery {
    pub disease_id: String,
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}
