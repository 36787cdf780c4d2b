//! Selection tagging: marking one record as selected in the result set.
//!
//! A selection targets exactly one of the seven queries. The tagged query
//! gains a `selected` column and an ascending `ORDER BY selected`, so
//! unselected records come first and the selected record(s) last; downstream
//! rendering relies on that order to paint the selection on top.

use crate::error::FilterError;
use crate::models::{Selection, SelectionType};
use crate::query::mapping::TableMapping;

const COMPOUND_SEPARATOR: char = '-';

/// Which of the seven entity queries a tag applies to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum TagTarget {
    Genes,
    Variants,
    LeadVariants,
    Diseases,
    GeneVariantEdges,
    VariantLeadVariantEdges,
    LeadVariantDiseaseEdges,
}

/// A validated selection, resolved to the query it targets and the key
/// values to match. Values are bound into the query, never interpolated.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionTag {
    Gene(String),
    Variant(String),
    LeadVariant(String),
    Disease(String),
    GeneVariant {
        gene_id: String,
        variant_id: String,
    },
    VariantLeadVariant {
        variant_id: String,
        lead_variant_id: String,
    },
    LeadVariantDisease {
        lead_variant_id: String,
        disease_id: String,
    },
}

impl SelectionTag {
    pub(crate) fn target(&self) -> TagTarget {
        match self {
            SelectionTag::Gene(_) => TagTarget::Genes,
            SelectionTag::Variant(_) => TagTarget::Variants,
            SelectionTag::LeadVariant(_) => TagTarget::LeadVariants,
            SelectionTag::Disease(_) => TagTarget::Diseases,
            SelectionTag::GeneVariant { .. } => TagTarget::GeneVariantEdges,
            SelectionTag::VariantLeadVariant { .. } => TagTarget::VariantLeadVariantEdges,
            SelectionTag::LeadVariantDisease { .. } => TagTarget::LeadVariantDiseaseEdges,
        }
    }

    /// The (column, value) keys identifying the selected record. One key for
    /// node selections, two conjunctive keys for edge selections.
    pub(crate) fn keys(&self, mapping: &TableMapping) -> Vec<(&'static str, String)> {
        match self {
            SelectionTag::Gene(id) => vec![(mapping.gene_id, id.clone())],
            SelectionTag::Variant(id) => vec![(mapping.variant_id, id.clone())],
            SelectionTag::LeadVariant(id) => vec![(mapping.lead_variant_id, id.clone())],
            SelectionTag::Disease(id) => vec![(mapping.disease_id, id.clone())],
            SelectionTag::GeneVariant {
                gene_id,
                variant_id,
            } => vec![
                (mapping.gene_id, gene_id.clone()),
                (mapping.variant_id, variant_id.clone()),
            ],
            SelectionTag::VariantLeadVariant {
                variant_id,
                lead_variant_id,
            } => vec![
                (mapping.variant_id, variant_id.clone()),
                (mapping.lead_variant_id, lead_variant_id.clone()),
            ],
            SelectionTag::LeadVariantDisease {
                lead_variant_id,
                disease_id,
            } => vec![
                (mapping.lead_variant_id, lead_variant_id.clone()),
                (mapping.disease_id, disease_id.clone()),
            ],
        }
    }
}

fn split_compound(id: &str) -> Result<(String, String), FilterError> {
    match id.split_once(COMPOUND_SEPARATOR) {
        Some((left, right)) if !left.is_empty() && !right.is_empty() => {
            Ok((left.to_string(), right.to_string()))
        }
        _ => Err(FilterError::MalformedSelectionId {
            id: id.to_string(),
            separator: COMPOUND_SEPARATOR,
        }),
    }
}

impl Selection {
    /// Validate this selection and resolve it into a [`SelectionTag`].
    pub fn tag(&self) -> Result<SelectionTag, FilterError> {
        let tag = match self.selection_type {
            SelectionType::Gene => SelectionTag::Gene(self.id.clone()),
            SelectionType::Variant => SelectionTag::Variant(self.id.clone()),
            SelectionType::LeadVariant => SelectionTag::LeadVariant(self.id.clone()),
            SelectionType::Disease => SelectionTag::Disease(self.id.clone()),
            SelectionType::GeneVariant => {
                let (gene_id, variant_id) = split_compound(&self.id)?;
                SelectionTag::GeneVariant {
                    gene_id,
                    variant_id,
                }
            }
            SelectionType::VariantLeadVariant => {
                let (variant_id, lead_variant_id) = split_compound(&self.id)?;
                SelectionTag::VariantLeadVariant {
                    variant_id,
                    lead_variant_id,
                }
            }
            SelectionType::LeadVariantDisease => {
                let (lead_variant_id, disease_id) = split_compound(&self.id)?;
                SelectionTag::LeadVariantDisease {
                    lead_variant_id,
                    disease_id,
                }
            }
        };
        Ok(tag)
    }
}
