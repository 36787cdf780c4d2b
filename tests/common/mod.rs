//! Shared fixtures for the integration tests: an in-memory association
//! store seeded row by row, and a counting mock annotation source.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use locus_graph::{
    AnnotationCache, AnnotationError, AnnotationSource, CanonicalTranscript, Exon, GeneAnnotation,
    LocusService, TableMapping, VariantLocation,
};

/// Single-connection in-memory store; one connection keeps the in-memory
/// database alive for the whole test.
pub async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory store")
}

pub const CREATE_PROCESSED_TABLE: &str = "\
CREATE TABLE processed (
    gene_id TEXT,
    gene_symbol TEXT,
    GRCh38_gene_chrom TEXT,
    GRCh38_gene_pos INTEGER,
    GRCh38_gene_start INTEGER,
    GRCh38_gene_end INTEGER,
    ld_snp_rsID TEXT,
    GRCh38_chrom TEXT,
    GRCh38_pos INTEGER,
    gwas_snp TEXT,
    GRCh38_gwas_snp_chrom TEXT,
    GRCh38_gwas_snp_pos INTEGER,
    disease_efo_id TEXT,
    disease_name TEXT,
    ot_g2v_score REAL,
    VEP REAL,
    GTEx REAL,
    PCHiC REAL,
    Fantom5 REAL,
    DHS REAL,
    Nearest REAL,
    r2 REAL,
    gwas_pvalue REAL,
    gwas_odds_ratio REAL,
    gwas_beta REAL,
    gwas_study TEXT,
    gwas_pmid TEXT,
    gwas_size INTEGER
)";

pub async fn create_schema(pool: &SqlitePool) {
    sqlx::query(CREATE_PROCESSED_TABLE)
        .execute(pool)
        .await
        .expect("create association table");
}

/// One association row; override fields per test case.
#[derive(Debug, Clone)]
pub struct FixtureRow {
    pub gene_id: &'static str,
    pub gene_symbol: &'static str,
    pub gene_chromosome: &'static str,
    pub gene_tss: i64,
    pub gene_start: i64,
    pub gene_end: i64,
    pub variant_id: &'static str,
    pub variant_chromosome: &'static str,
    pub variant_position: i64,
    pub lead_variant_id: &'static str,
    pub lead_variant_chromosome: &'static str,
    pub lead_variant_position: i64,
    pub disease_id: &'static str,
    pub disease_name: &'static str,
    pub g2v_score: f64,
    pub vep: Option<f64>,
    pub gtex: Option<f64>,
    pub pchic: Option<f64>,
    pub fantom5: Option<f64>,
    pub dhs: Option<f64>,
    pub nearest: Option<f64>,
    pub r2: f64,
    pub gwas_pvalue: f64,
    pub gwas_odds_ratio: Option<f64>,
    pub gwas_beta: Option<f64>,
    pub gwas_study: Option<&'static str>,
    pub gwas_pmid: Option<&'static str>,
    pub gwas_size: Option<i64>,
}

impl Default for FixtureRow {
    fn default() -> Self {
        Self {
            gene_id: "ENSG0000001",
            gene_symbol: "ABC1",
            gene_chromosome: "1",
            gene_tss: 150_000,
            gene_start: 140_000,
            gene_end: 160_000,
            variant_id: "rs1",
            variant_chromosome: "1",
            variant_position: 150_500,
            lead_variant_id: "rs100",
            lead_variant_chromosome: "1",
            lead_variant_position: 151_000,
            disease_id: "EFO_0000001",
            disease_name: "Disease One",
            g2v_score: 0.6,
            vep: Some(0.6),
            gtex: None,
            pchic: None,
            fantom5: None,
            dhs: None,
            nearest: Some(1.0),
            r2: 0.8,
            gwas_pvalue: 1e-8,
            gwas_odds_ratio: Some(1.2),
            gwas_beta: None,
            gwas_study: Some("GWAS Study"),
            gwas_pmid: Some("21833088"),
            gwas_size: Some(5_000),
        }
    }
}

impl FixtureRow {
    pub async fn insert(&self, pool: &SqlitePool) {
        sqlx::query(
            "INSERT INTO processed (
                gene_id, gene_symbol, GRCh38_gene_chrom, GRCh38_gene_pos,
                GRCh38_gene_start, GRCh38_gene_end,
                ld_snp_rsID, GRCh38_chrom, GRCh38_pos,
                gwas_snp, GRCh38_gwas_snp_chrom, GRCh38_gwas_snp_pos,
                disease_efo_id, disease_name,
                ot_g2v_score, VEP, GTEx, PCHiC, Fantom5, DHS, Nearest,
                r2, gwas_pvalue, gwas_odds_ratio, gwas_beta,
                gwas_study, gwas_pmid, gwas_size
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(self.gene_id)
        .bind(self.gene_symbol)
        .bind(self.gene_chromosome)
        .bind(self.gene_tss)
        .bind(self.gene_start)
        .bind(self.gene_end)
        .bind(self.variant_id)
        .bind(self.variant_chromosome)
        .bind(self.variant_position)
        .bind(self.lead_variant_id)
        .bind(self.lead_variant_chromosome)
        .bind(self.lead_variant_position)
        .bind(self.disease_id)
        .bind(self.disease_name)
        .bind(self.g2v_score)
        .bind(self.vep)
        .bind(self.gtex)
        .bind(self.pchic)
        .bind(self.fantom5)
        .bind(self.dhs)
        .bind(self.nearest)
        .bind(self.r2)
        .bind(self.gwas_pvalue)
        .bind(self.gwas_odds_ratio)
        .bind(self.gwas_beta)
        .bind(self.gwas_study)
        .bind(self.gwas_pmid)
        .bind(self.gwas_size)
        .execute(pool)
        .await
        .expect("insert association row");
    }
}

fn transcript(gene_id: &str, start: i64, end: i64) -> CanonicalTranscript {
    CanonicalTranscript {
        id: format!("{gene_id}-T1"),
        start,
        end,
        forward_strand: true,
        exons: vec![Exon {
            id: format!("{gene_id}-E1"),
            start,
            end: start + 500,
        }],
        translation_start: Some(start + 100),
        translation_end: Some(end - 100),
    }
}

fn gene_annotation(id: &str, start: i64, end: i64) -> GeneAnnotation {
    GeneAnnotation {
        id: id.to_string(),
        symbol: Some(format!("{id}-SYM")),
        description: None,
        chromosome: "1".to_string(),
        start,
        end,
        forward_strand: true,
        biotype: Some("protein_coding".to_string()),
        canonical_transcript: Some(transcript(id, start, end)),
    }
}

/// Counting annotation source: known genes, one known external-only variant,
/// and a failure switch for degradation tests.
pub struct MockAnnotations {
    genes: HashMap<String, GeneAnnotation>,
    variants: HashMap<String, VariantLocation>,
    pub gene_fetches: Mutex<HashMap<String, usize>>,
    pub fail: AtomicBool,
}

impl MockAnnotations {
    pub fn new() -> Self {
        let mut genes = HashMap::new();
        for (id, start, end) in [
            ("ENSG0000001", 140_000, 160_000),
            ("ENSG0000002", 170_000, 190_000),
        ] {
            genes.insert(id.to_string(), gene_annotation(id, start, end));
        }

        let mut variants = HashMap::new();
        variants.insert(
            "rs999".to_string(),
            VariantLocation {
                id: "rs999".to_string(),
                chromosome: "2".to_string(),
                position: 42_000,
                maf: Some(0.01),
                ancestral_allele: None,
                minor_allele: Some("A".to_string()),
            },
        );

        Self {
            genes,
            variants,
            gene_fetches: Mutex::new(HashMap::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn fetch_count(&self, id: &str) -> usize {
        *self.gene_fetches.lock().unwrap().get(id).unwrap_or(&0)
    }
}

#[async_trait]
impl AnnotationSource for MockAnnotations {
    async fn fetch_genes(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, GeneAnnotation>, AnnotationError> {
        {
            let mut counts = self.gene_fetches.lock().unwrap();
            for id in ids {
                *counts.entry(id.clone()).or_insert(0) += 1;
            }
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(AnnotationError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.genes.get(id).map(|g| (id.clone(), g.clone())))
            .collect())
    }

    async fn fetch_variants(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, VariantLocation>, AnnotationError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.variants.get(id).map(|v| (id.clone(), v.clone())))
            .collect())
    }
}

pub fn service_with(pool: SqlitePool, source: Arc<MockAnnotations>) -> LocusService {
    LocusService::new(
        pool,
        TableMapping::grch38(),
        Arc::new(AnnotationCache::new(source)),
    )
}
