//! Flat paginated projections of the association table.
//!
//! Interval mode reuses the filtered locus predicate; a selection narrows the
//! rows with bound equality predicates. Disease mode is a plain equality on
//! the disease id. Each mode pairs a LIMIT/OFFSET rows query with an
//! independent COUNT over the same predicate, so `total` never depends on
//! pagination. Rows come back in storage order.

use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::models::AssociationRow;
use crate::query::predicate::{push_selection_equality, push_where_clause};
use crate::query::{LocusQueryContext, TableMapping};

/// Runs the paginated row and count queries.
pub struct TableRepository {
    pool: SqlitePool,
    mapping: TableMapping,
}

impl TableRepository {
    pub fn new(pool: SqlitePool, mapping: TableMapping) -> Self {
        Self { pool, mapping }
    }

    fn select_rows(&self) -> QueryBuilder<'static, Sqlite> {
        let m = &self.mapping;
        QueryBuilder::new(format!(
            "SELECT {gene} AS gene_id, {symbol} AS gene_symbol, \
             {gchrom} AS gene_chromosome, {gtss} AS gene_tss, \
             {variant} AS variant_id, {vchrom} AS variant_chromosome, \
             {vpos} AS variant_position, {lead} AS lead_variant_id, \
             {disease} AS disease_id, {dname} AS disease_name, \
             {score} AS g2v_score, {vep} AS vep, {gtex} AS gtex, \
             {pchic} AS pchic, {fantom5} AS fantom5, {dhs} AS dhs, \
             {nearest} AS nearest, {r2} AS r2, \
             {pvalue} AS gwas_p_value, {odds} AS gwas_odds_ratio, \
             {beta} AS gwas_beta, {study} AS gwas_study, \
             {pmid} AS gwas_pmid, {size} AS gwas_size FROM {table}",
            gene = m.gene_id,
            symbol = m.gene_symbol,
            gchrom = m.gene_chromosome,
            gtss = m.gene_tss,
            variant = m.variant_id,
            vchrom = m.variant_chromosome,
            vpos = m.variant_position,
            lead = m.lead_variant_id,
            disease = m.disease_id,
            dname = m.disease_name,
            score = m.g2v_score,
            vep = m.vep,
            gtex = m.gtex,
            pchic = m.pchic,
            fantom5 = m.fantom5,
            dhs = m.dhs,
            nearest = m.nearest,
            r2 = m.r2,
            pvalue = m.gwas_pvalue,
            odds = m.gwas_odds_ratio,
            beta = m.gwas_beta,
            study = m.gwas_study,
            pmid = m.gwas_pmid,
            size = m.gwas_size,
            table = m.table,
        ))
    }

    fn push_interval_predicate(&self, qb: &mut QueryBuilder<'static, Sqlite>, ctx: &LocusQueryContext) {
        push_where_clause(qb, &self.mapping, ctx.interval(), ctx.edge_filters());
        if let Some(tag) = &ctx.tag {
            push_selection_equality(qb, &tag.keys(&self.mapping));
        }
    }

    /// One page of rows for an interval query.
    pub async fn interval_rows(
        &self,
        ctx: &LocusQueryContext,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<AssociationRow>, sqlx::Error> {
        let mut qb = self.select_rows();
        self.push_interval_predicate(&mut qb, ctx);
        qb.push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        qb.build_query_as::<AssociationRow>()
            .fetch_all(&self.pool)
            .await
    }

    /// Total row count for an interval query, ignoring pagination.
    pub async fn interval_total(&self, ctx: &LocusQueryContext) -> Result<i64, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT COUNT(*) AS total FROM {}",
            self.mapping.table,
        ));
        self.push_interval_predicate(&mut qb, ctx);
        let row = qb.build().fetch_one(&self.pool).await?;
        row.try_get("total")
    }

    /// One page of rows for a disease query.
    pub async fn disease_rows(
        &self,
        disease_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<AssociationRow>, sqlx::Error> {
        let mut qb = self.select_rows();
        qb.push(format!(" WHERE {} = ", self.mapping.disease_id));
        qb.push_bind(disease_id.to_string());
        qb.push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        qb.build_query_as::<AssociationRow>()
            .fetch_all(&self.pool)
            .await
    }

    /// Total row count for a disease query, ignoring pagination.
    pub async fn disease_total(&self, disease_id: &str) -> Result<i64, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT COUNT(*) AS total FROM {} WHERE {} = ",
            self.mapping.table, self.mapping.disease_id,
        ));
        qb.push_bind(disease_id.to_string());
        let row = qb.build().fetch_one(&self.pool).await?;
        row.try_get("total")
    }
}
