//! The correlated range queries behind one locus resolution.
//!
//! Four node queries and the aggregate run against the unfiltered predicate;
//! the three edge queries run against the filtered predicate. All share the
//! same bound interval values from the query context. Grouping by natural key
//! deduplicates the wide association rows into nodes and edges.

use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::models::{
    Disease, Gene, GeneVariantEdge, LeadVariant, LeadVariantDiseaseEdge, Variant,
    VariantLeadVariantEdge,
};
use crate::query::predicate::{push_selected_tag, push_where_clause};
use crate::query::selection::TagTarget;
use crate::query::{LocusQueryContext, TableMapping};

/// Runs the seven entity queries and the p-value aggregate.
pub struct LocusRepository {
    pool: SqlitePool,
    mapping: TableMapping,
}

impl LocusRepository {
    pub fn new(pool: SqlitePool, mapping: TableMapping) -> Self {
        Self { pool, mapping }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Selection keys when the context's tag targets the given query.
    fn tag_for(
        &self,
        ctx: &LocusQueryContext,
        target: TagTarget,
    ) -> Option<Vec<(&'static str, String)>> {
        ctx.tag
            .as_ref()
            .filter(|tag| tag.target() == target)
            .map(|tag| tag.keys(&self.mapping))
    }

    /// Gene nodes in the interval (unfiltered predicate).
    pub async fn genes(&self, ctx: &LocusQueryContext) -> Result<Vec<Gene>, sqlx::Error> {
        let m = &self.mapping;
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {id} AS id, {symbol} AS symbol, {chrom} AS chromosome, \
             {tss} AS tss, {start} AS start, {end} AS \"end\"",
            id = m.gene_id,
            symbol = m.gene_symbol,
            chrom = m.gene_chromosome,
            tss = m.gene_tss,
            start = m.gene_start,
            end = m.gene_end,
        ));
        let tag = self.tag_for(ctx, TagTarget::Genes);
        if let Some(keys) = &tag {
            push_selected_tag(&mut qb, keys);
        }
        qb.push(format!(" FROM {}", m.table));
        push_where_clause(&mut qb, m, ctx.interval(), ctx.node_filters());
        qb.push(format!(" GROUP BY {}", m.gene_id));
        if tag.is_some() {
            qb.push(" ORDER BY selected");
        }
        qb.build_query_as::<Gene>().fetch_all(&self.pool).await
    }

    /// Variant nodes in the interval (unfiltered predicate).
    pub async fn variants(&self, ctx: &LocusQueryContext) -> Result<Vec<Variant>, sqlx::Error> {
        let m = &self.mapping;
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {id} AS id, {chrom} AS chromosome, {pos} AS position",
            id = m.variant_id,
            chrom = m.variant_chromosome,
            pos = m.variant_position,
        ));
        let tag = self.tag_for(ctx, TagTarget::Variants);
        if let Some(keys) = &tag {
            push_selected_tag(&mut qb, keys);
        }
        qb.push(format!(" FROM {}", m.table));
        push_where_clause(&mut qb, m, ctx.interval(), ctx.node_filters());
        qb.push(format!(" GROUP BY {}", m.variant_id));
        if tag.is_some() {
            qb.push(" ORDER BY selected");
        }
        qb.build_query_as::<Variant>().fetch_all(&self.pool).await
    }

    /// Lead-variant nodes in the interval (unfiltered predicate).
    pub async fn lead_variants(
        &self,
        ctx: &LocusQueryContext,
    ) -> Result<Vec<LeadVariant>, sqlx::Error> {
        let m = &self.mapping;
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {id} AS id, {chrom} AS chromosome, {pos} AS position",
            id = m.lead_variant_id,
            chrom = m.lead_variant_chromosome,
            pos = m.lead_variant_position,
        ));
        let tag = self.tag_for(ctx, TagTarget::LeadVariants);
        if let Some(keys) = &tag {
            push_selected_tag(&mut qb, keys);
        }
        qb.push(format!(" FROM {}", m.table));
        push_where_clause(&mut qb, m, ctx.interval(), ctx.node_filters());
        qb.push(format!(" GROUP BY {}", m.lead_variant_id));
        if tag.is_some() {
            qb.push(" ORDER BY selected");
        }
        qb.build_query_as::<LeadVariant>()
            .fetch_all(&self.pool)
            .await
    }

    /// Disease nodes in the interval (unfiltered predicate).
    pub async fn diseases(&self, ctx: &LocusQueryContext) -> Result<Vec<Disease>, sqlx::Error> {
        let m = &self.mapping;
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {id} AS id, {name} AS name",
            id = m.disease_id,
            name = m.disease_name,
        ));
        let tag = self.tag_for(ctx, TagTarget::Diseases);
        if let Some(keys) = &tag {
            push_selected_tag(&mut qb, keys);
        }
        qb.push(format!(" FROM {}", m.table));
        push_where_clause(&mut qb, m, ctx.interval(), ctx.node_filters());
        qb.push(format!(" GROUP BY {}", m.disease_id));
        if tag.is_some() {
            qb.push(" ORDER BY selected");
        }
        qb.build_query_as::<Disease>().fetch_all(&self.pool).await
    }

    /// Gene-variant edges in the interval (filtered predicate).
    pub async fn gene_variant_edges(
        &self,
        ctx: &LocusQueryContext,
    ) -> Result<Vec<GeneVariantEdge>, sqlx::Error> {
        let m = &self.mapping;
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT ({gene} || '-' || {variant}) AS id, \
             {gene} AS gene_id, {symbol} AS gene_symbol, \
             {gchrom} AS gene_chromosome, {gtss} AS gene_tss, \
             {variant} AS variant_id, {vchrom} AS variant_chromosome, \
             {vpos} AS variant_position, \
             {score} AS g2v_score, {vep} AS vep, {gtex} AS gtex, \
             {pchic} AS pchic, {fantom5} AS fantom5, {dhs} AS dhs, \
             {nearest} AS nearest",
            gene = m.gene_id,
            symbol = m.gene_symbol,
            gchrom = m.gene_chromosome,
            gtss = m.gene_tss,
            variant = m.variant_id,
            vchrom = m.variant_chromosome,
            vpos = m.variant_position,
            score = m.g2v_score,
            vep = m.vep,
            gtex = m.gtex,
            pchic = m.pchic,
            fantom5 = m.fantom5,
            dhs = m.dhs,
            nearest = m.nearest,
        ));
        let tag = self.tag_for(ctx, TagTarget::GeneVariantEdges);
        if let Some(keys) = &tag {
            push_selected_tag(&mut qb, keys);
        }
        qb.push(format!(" FROM {}", m.table));
        push_where_clause(&mut qb, m, ctx.interval(), ctx.edge_filters());
        qb.push(format!(" GROUP BY {}, {}", m.gene_id, m.variant_id));
        if tag.is_some() {
            qb.push(" ORDER BY selected");
        }
        qb.build_query_as::<GeneVariantEdge>()
            .fetch_all(&self.pool)
            .await
    }

    /// Variant to lead-variant edges in the interval (filtered predicate).
    pub async fn variant_lead_variant_edges(
        &self,
        ctx: &LocusQueryContext,
    ) -> Result<Vec<VariantLeadVariantEdge>, sqlx::Error> {
        let m = &self.mapping;
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT ({variant} || '-' || {lead}) AS id, \
             {variant} AS variant_id, {vchrom} AS variant_chromosome, \
             {vpos} AS variant_position, \
             {lead} AS lead_variant_id, {lchrom} AS lead_variant_chromosome, \
             {lpos} AS lead_variant_position, {r2} AS r2",
            variant = m.variant_id,
            vchrom = m.variant_chromosome,
            vpos = m.variant_position,
            lead = m.lead_variant_id,
            lchrom = m.lead_variant_chromosome,
            lpos = m.lead_variant_position,
            r2 = m.r2,
        ));
        let tag = self.tag_for(ctx, TagTarget::VariantLeadVariantEdges);
        if let Some(keys) = &tag {
            push_selected_tag(&mut qb, keys);
        }
        qb.push(format!(" FROM {}", m.table));
        push_where_clause(&mut qb, m, ctx.interval(), ctx.edge_filters());
        qb.push(format!(" GROUP BY {}, {}", m.variant_id, m.lead_variant_id));
        if tag.is_some() {
            qb.push(" ORDER BY selected");
        }
        qb.build_query_as::<VariantLeadVariantEdge>()
            .fetch_all(&self.pool)
            .await
    }

    /// Lead-variant to disease edges in the interval (filtered predicate).
    pub async fn lead_variant_disease_edges(
        &self,
        ctx: &LocusQueryContext,
    ) -> Result<Vec<LeadVariantDiseaseEdge>, sqlx::Error> {
        let m = &self.mapping;
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT ({lead} || '-' || {disease}) AS id, \
             {lead} AS lead_variant_id, {lchrom} AS lead_variant_chromosome, \
             {lpos} AS lead_variant_position, \
             {disease} AS disease_id, {dname} AS disease_name, \
             {pvalue} AS p_value, {odds} AS odds_ratio, {beta} AS beta, \
             {study} AS study, {pmid} AS pmid, {size} AS size",
            lead = m.lead_variant_id,
            lchrom = m.lead_variant_chromosome,
            lpos = m.lead_variant_position,
            disease = m.disease_id,
            dname = m.disease_name,
            pvalue = m.gwas_pvalue,
            odds = m.gwas_odds_ratio,
            beta = m.gwas_beta,
            study = m.gwas_study,
            pmid = m.gwas_pmid,
            size = m.gwas_size,
        ));
        let tag = self.tag_for(ctx, TagTarget::LeadVariantDiseaseEdges);
        if let Some(keys) = &tag {
            push_selected_tag(&mut qb, keys);
        }
        qb.push(format!(" FROM {}", m.table));
        push_where_clause(&mut qb, m, ctx.interval(), ctx.edge_filters());
        qb.push(format!(" GROUP BY {}, {}", m.lead_variant_id, m.disease_id));
        if tag.is_some() {
            qb.push(" ORDER BY selected");
        }
        qb.build_query_as::<LeadVariantDiseaseEdge>()
            .fetch_all(&self.pool)
            .await
    }

    /// Minimum raw GWAS p-value over the interval (unfiltered predicate).
    /// NULL when no row matches.
    pub async fn min_gwas_pvalue(
        &self,
        ctx: &LocusQueryContext,
    ) -> Result<Option<f64>, sqlx::Error> {
        let m = &self.mapping;
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT MIN({}) AS min_gwas_pvalue FROM {}",
            m.gwas_pvalue, m.table,
        ));
        push_where_clause(&mut qb, m, ctx.interval(), ctx.node_filters());
        let row = qb.build().fetch_one(&self.pool).await?;
        row.try_get("min_gwas_pvalue")
    }

    /// Exact-match lookup of a variant id.
    pub async fn find_variant(&self, id: &str) -> Result<Option<Variant>, sqlx::Error> {
        let m = &self.mapping;
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {id} AS id, {chrom} AS chromosome, {pos} AS position FROM {table} WHERE {id} = ",
            id = m.variant_id,
            chrom = m.variant_chromosome,
            pos = m.variant_position,
            table = m.table,
        ));
        qb.push_bind(id.to_string());
        qb.push(format!(" GROUP BY {}", m.variant_id));
        qb.build_query_as::<Variant>()
            .fetch_optional(&self.pool)
            .await
    }

    /// Exact-match lookup of a lead-variant id.
    pub async fn find_lead_variant(&self, id: &str) -> Result<Option<LeadVariant>, sqlx::Error> {
        let m = &self.mapping;
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {id} AS id, {chrom} AS chromosome, {pos} AS position FROM {table} WHERE {id} = ",
            id = m.lead_variant_id,
            chrom = m.lead_variant_chromosome,
            pos = m.lead_variant_position,
            table = m.table,
        ));
        qb.push_bind(id.to_string());
        qb.push(format!(" GROUP BY {}", m.lead_variant_id));
        qb.build_query_as::<LeadVariant>()
            .fetch_optional(&self.pool)
            .await
    }
}
