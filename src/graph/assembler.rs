//! Locus graph assembly.
//!
//! One request fans out the eight store queries concurrently, joins them,
//! enriches genes and gene-variant edges from the annotation cache, and
//! derives the p-value ceiling used to calibrate the visualization. Any
//! store failure aborts the whole resolution; there is no partial graph.

use std::collections::HashSet;
use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::debug;

use crate::annotation::AnnotationCache;
use crate::database::{LocusRepository, TableRepository};
use crate::error::{FilterError, LocusError};
use crate::models::{
    DiseaseTableQuery, GeneAnnotation, LocusGraph, LocusQuery, LocusTableQuery, SearchHit,
    TableView, VariantLocationInfo,
};
use crate::query::{LocusQueryContext, TableMapping};

/// Ceiling reported for an interval with no GWAS rows: effectively
/// unbounded (2^53 - 1), so an empty window never clips the scale.
pub const MAX_GWAS_PVALUE_UNBOUNDED: f64 = 9_007_199_254_740_991.0;

/// The query-composition and graph-assembly engine.
pub struct LocusService {
    repository: LocusRepository,
    tables: TableRepository,
    annotations: Arc<AnnotationCache>,
}

impl LocusService {
    pub fn new(pool: SqlitePool, mapping: TableMapping, annotations: Arc<AnnotationCache>) -> Self {
        Self {
            repository: LocusRepository::new(pool.clone(), mapping.clone()),
            tables: TableRepository::new(pool, mapping),
            annotations,
        }
    }

    /// Resolve the full locus graph for one interval query.
    pub async fn locus_graph(&self, query: &LocusQuery) -> Result<LocusGraph, LocusError> {
        let ctx = LocusQueryContext::new(&query.interval, &query.filters, query.selection.as_ref())?;

        debug!(
            chromosome = %query.interval.chromosome,
            start = query.interval.start,
            end = query.interval.end,
            filtered = !query.filters.is_empty(),
            "resolving locus graph"
        );

        let (
            mut genes,
            variants,
            lead_variants,
            diseases,
            mut gene_variant_edges,
            variant_lead_variant_edges,
            lead_variant_disease_edges,
            min_gwas_pvalue,
        ) = tokio::try_join!(
            self.repository.genes(&ctx),
            self.repository.variants(&ctx),
            self.repository.lead_variants(&ctx),
            self.repository.diseases(&ctx),
            self.repository.gene_variant_edges(&ctx),
            self.repository.variant_lead_variant_edges(&ctx),
            self.repository.lead_variant_disease_edges(&ctx),
            self.repository.min_gwas_pvalue(&ctx),
        )?;

        let mut gene_ids: Vec<String> = Vec::new();
        let mut seen = HashSet::new();
        for id in genes
            .iter()
            .map(|g| &g.id)
            .chain(gene_variant_edges.iter().map(|e| &e.gene_id))
        {
            if seen.insert(id.clone()) {
                gene_ids.push(id.clone());
            }
        }

        let annotations = self.annotations.resolve_genes(&gene_ids).await;

        for gene in &mut genes {
            if let Some(annotation) = annotations.get(&gene.id) {
                gene.forward_strand = Some(annotation.forward_strand);
                gene.canonical_transcript = annotation.canonical_transcript.clone();
            }
        }
        for edge in &mut gene_variant_edges {
            if let Some(annotation) = annotations.get(&edge.gene_id) {
                edge.canonical_transcript = annotation.canonical_transcript.clone();
            }
        }

        let max_gwas_p_value = match min_gwas_pvalue {
            Some(p) => -p.log10(),
            None => MAX_GWAS_PVALUE_UNBOUNDED,
        };

        Ok(LocusGraph {
            genes,
            variants,
            lead_variants,
            diseases,
            gene_variant_edges,
            variant_lead_variant_edges,
            lead_variant_disease_edges,
            max_gwas_p_value,
        })
    }

    fn validate_pagination(offset: i64, limit: i64) -> Result<(), FilterError> {
        if offset < 0 || limit < 0 {
            return Err(FilterError::InvalidPagination { offset, limit });
        }
        Ok(())
    }

    /// Flat paginated rows for an interval query.
    pub async fn locus_table(&self, query: &LocusTableQuery) -> Result<TableView, LocusError> {
        Self::validate_pagination(query.offset, query.limit)?;
        let ctx = LocusQueryContext::new(&query.interval, &query.filters, query.selection.as_ref())?;

        let (rows, total) = tokio::try_join!(
            self.tables.interval_rows(&ctx, query.offset, query.limit),
            self.tables.interval_total(&ctx),
        )?;

        Ok(TableView {
            rows,
            total,
            offset: query.offset,
            limit: query.limit,
        })
    }

    /// Flat paginated rows for one disease.
    pub async fn disease_table(&self, query: &DiseaseTableQuery) -> Result<TableView, LocusError> {
        Self::validate_pagination(query.offset, query.limit)?;

        let (rows, total) = tokio::try_join!(
            self.tables
                .disease_rows(&query.disease_id, query.offset, query.limit),
            self.tables.disease_total(&query.disease_id),
        )?;

        Ok(TableView {
            rows,
            total,
            offset: query.offset,
            limit: query.limit,
        })
    }

    /// Exact-match search for a variant or lead-variant id.
    pub async fn search(&self, query_string: &str) -> Result<Vec<SearchHit>, LocusError> {
        let (variant, lead_variant) = tokio::try_join!(
            self.repository.find_variant(query_string),
            self.repository.find_lead_variant(query_string),
        )?;

        let hit = variant
            .map(|v| v.id)
            .or(lead_variant.map(|lv| lv.id))
            .map(|id| SearchHit {
                name: id.clone(),
                id,
                hit_type: "variant",
            });

        Ok(hit.into_iter().collect())
    }

    /// Locate an id that may be a variant, a lead variant, or both. Falls
    /// back to the annotation source when the store has no row for it.
    pub async fn variant_location(
        &self,
        id: &str,
    ) -> Result<Option<VariantLocationInfo>, LocusError> {
        let (variant, lead_variant) = tokio::try_join!(
            self.repository.find_variant(id),
            self.repository.find_lead_variant(id),
        )?;

        let is_variant = variant.is_some();
        let is_lead_variant = lead_variant.is_some();

        if let Some(v) = variant {
            return Ok(Some(VariantLocationInfo {
                id: v.id,
                is_variant,
                is_lead_variant,
                chromosome: Some(v.chromosome),
                position: Some(v.position),
            }));
        }
        if let Some(lv) = lead_variant {
            return Ok(Some(VariantLocationInfo {
                id: lv.id,
                is_variant,
                is_lead_variant,
                chromosome: Some(lv.chromosome),
                position: Some(lv.position),
            }));
        }

        let mut fetched = self.annotations.resolve_variants(&[id.to_string()]).await;
        Ok(fetched.remove(id).map(|location| VariantLocationInfo {
            id: location.id,
            is_variant: false,
            is_lead_variant: false,
            chromosome: Some(location.chromosome),
            position: Some(location.position),
        }))
    }

    /// Gene location metadata through the cache.
    pub async fn gene_location(&self, gene_id: &str) -> Result<Option<GeneAnnotation>, LocusError> {
        let mut resolved = self.annotations.resolve_genes(&[gene_id.to_string()]).await;
        Ok(resolved.remove(gene_id))
    }
}
