//! Versioned table/column mapping for the association store.
//!
//! Every query is generated from one [`TableMapping`], so a schema rename or
//! a different reference build is a new mapping value, not a parallel copy of
//! the query code. Column names are program constants and are interpolated
//! into SQL; all query values are bound parameters.

use crate::query::filter::{EvidenceField, RangeField};

/// Column names for one build/version of the association table.
#[derive(Debug, Clone)]
pub struct TableMapping {
    pub table: &'static str,
    pub gene_id: &'static str,
    pub gene_symbol: &'static str,
    pub gene_chromosome: &'static str,
    pub gene_tss: &'static str,
    pub gene_start: &'static str,
    pub gene_end: &'static str,
    pub variant_id: &'static str,
    pub variant_chromosome: &'static str,
    pub variant_position: &'static str,
    pub lead_variant_id: &'static str,
    pub lead_variant_chromosome: &'static str,
    pub lead_variant_position: &'static str,
    pub disease_id: &'static str,
    pub disease_name: &'static str,
    pub g2v_score: &'static str,
    pub vep: &'static str,
    pub gtex: &'static str,
    pub pchic: &'static str,
    pub fantom5: &'static str,
    pub dhs: &'static str,
    pub nearest: &'static str,
    pub r2: &'static str,
    pub gwas_pvalue: &'static str,
    pub gwas_odds_ratio: &'static str,
    pub gwas_beta: &'static str,
    pub gwas_study: &'static str,
    pub gwas_pmid: &'static str,
    pub gwas_size: &'static str,
}

impl TableMapping {
    /// The GRCh38 build of the processed association table.
    pub fn grch38() -> Self {
        Self {
            table: "processed",
            gene_id: "gene_id",
            gene_symbol: "gene_symbol",
            gene_chromosome: "GRCh38_gene_chrom",
            gene_tss: "GRCh38_gene_pos",
            gene_start: "GRCh38_gene_start",
            gene_end: "GRCh38_gene_end",
            variant_id: "ld_snp_rsID",
            variant_chromosome: "GRCh38_chrom",
            variant_position: "GRCh38_pos",
            lead_variant_id: "gwas_snp",
            lead_variant_chromosome: "GRCh38_gwas_snp_chrom",
            lead_variant_position: "GRCh38_gwas_snp_pos",
            disease_id: "disease_efo_id",
            disease_name: "disease_name",
            g2v_score: "ot_g2v_score",
            vep: "VEP",
            gtex: "GTEx",
            pchic: "PCHiC",
            fantom5: "Fantom5",
            dhs: "DHS",
            nearest: "Nearest",
            r2: "r2",
            gwas_pvalue: "gwas_pvalue",
            gwas_odds_ratio: "gwas_odds_ratio",
            gwas_beta: "gwas_beta",
            gwas_study: "gwas_study",
            gwas_pmid: "gwas_pmid",
            gwas_size: "gwas_size",
        }
    }

    /// Column backing an evidence field predicate.
    pub fn evidence_column(&self, field: EvidenceField) -> &'static str {
        match field {
            EvidenceField::G2vScore => self.g2v_score,
            EvidenceField::Vep => self.vep,
            EvidenceField::Gtex => self.gtex,
            EvidenceField::Pchic => self.pchic,
            EvidenceField::Fantom5 => self.fantom5,
            EvidenceField::Dhs => self.dhs,
            EvidenceField::Nearest => self.nearest,
        }
    }

    /// Column backing a numeric range predicate.
    pub fn range_column(&self, field: RangeField) -> &'static str {
        match field {
            RangeField::G2vScore => self.g2v_score,
            RangeField::R2 => self.r2,
            RangeField::GwasPValue => self.gwas_pvalue,
        }
    }
}

impl Default for TableMapping {
    fn default() -> Self {
        Self::grch38()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mapping_targets_grch38() {
        let mapping = TableMapping::default();
        assert_eq!(mapping.table, "processed");
        assert_eq!(mapping.gene_start, "GRCh38_gene_start");
        assert_eq!(mapping.evidence_column(EvidenceField::Gtex), "GTEx");
        assert_eq!(mapping.range_column(RangeField::GwasPValue), "gwas_pvalue");
    }
}
