//! Ensembl REST client for gene and variant location metadata.
//!
//! Rate-limited HTTP client issuing batch POST lookups. The expanded gene
//! payload carries transcripts, exons and translations; it is decoded here
//! into the crate's annotation model. Ids unknown to the source come back as
//! null entries and are dropped.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::time::sleep;
use url::Url;

use crate::annotation::AnnotationSource;
use crate::error::AnnotationError;
use crate::models::{CanonicalTranscript, Exon, GeneAnnotation, VariantLocation};

const DEFAULT_API_BASE: &str = "https://rest.ensembl.org/";
const GENE_LOOKUP_PATH: &str = "lookup/id";
const VARIATION_PATH: &str = "variation/homo_sapiens";
const RATE_LIMIT_DELAY_MS: u64 = 100;
// Ensembl caps POST lookups at 1000 ids per request.
const MAX_BATCH_SIZE: usize = 1000;

/// Annotation source configuration, environment-driven with defaults.
#[derive(Debug, Clone)]
pub struct AnnotationConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("ANNOTATION_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            request_timeout: Duration::from_secs(30),
        }
    }
}

pub struct EnsemblClient {
    client: Client,
    base_url: Url,
    last_request: Mutex<Instant>,
}

impl EnsemblClient {
    pub fn new(config: AnnotationConfig) -> Result<Self, AnnotationError> {
        let base_url = Url::parse(&config.base_url)?;
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            base_url,
            last_request: Mutex::new(Instant::now()),
        })
    }

    /// Enforce rate limiting between requests.
    async fn rate_limit(&self) {
        let elapsed = {
            let last = self.last_request.lock().unwrap();
            last.elapsed()
        };

        if elapsed < Duration::from_millis(RATE_LIMIT_DELAY_MS) {
            sleep(Duration::from_millis(RATE_LIMIT_DELAY_MS) - elapsed).await;
        }

        let mut last = self.last_request.lock().unwrap();
        *last = Instant::now();
    }

    async fn post_batch(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<String, AnnotationError> {
        self.rate_limit().await;
        let url = self.base_url.join(path)?;

        let response = self.client.post(url).json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AnnotationError::Status {
                status,
                body: body.chars().take(200).collect(),
            });
        }

        Ok(response.text().await?)
    }

    /// Fetch expanded gene records for a batch of gene ids.
    pub async fn lookup_genes(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, GeneAnnotation>, AnnotationError> {
        let mut genes = HashMap::new();

        for chunk in ids.chunks(MAX_BATCH_SIZE) {
            let body = serde_json::json!({ "ids": chunk, "expand": true });
            let text = self.post_batch(GENE_LOOKUP_PATH, &body).await?;
            let raw: HashMap<String, Option<RawGene>> = serde_json::from_str(&text)?;

            tracing::debug!(
                requested = chunk.len(),
                returned = raw.len(),
                "gene annotation lookup"
            );

            genes.extend(
                raw.into_iter()
                    .filter_map(|(id, gene)| gene.map(|g| (id, transform_gene(g)))),
            );
        }

        Ok(genes)
    }

    /// Fetch variant mappings for a batch of variant ids.
    pub async fn lookup_variants(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, VariantLocation>, AnnotationError> {
        let mut variants = HashMap::new();

        for chunk in ids.chunks(MAX_BATCH_SIZE) {
            let body = serde_json::json!({ "ids": chunk });
            let text = self.post_batch(VARIATION_PATH, &body).await?;
            let raw: HashMap<String, Option<RawVariant>> = serde_json::from_str(&text)?;

            tracing::debug!(
                requested = chunk.len(),
                returned = raw.len(),
                "variant annotation lookup"
            );

            variants.extend(
                raw.into_iter()
                    .filter_map(|(id, variant)| variant.and_then(transform_variant).map(|v| (id, v))),
            );
        }

        Ok(variants)
    }
}

#[async_trait]
impl AnnotationSource for EnsemblClient {
    async fn fetch_genes(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, GeneAnnotation>, AnnotationError> {
        self.lookup_genes(ids).await
    }

    async fn fetch_variants(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, VariantLocation>, AnnotationError> {
        self.lookup_variants(ids).await
    }
}

#[derive(Debug, Deserialize)]
struct RawGene {
    id: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    start: i64,
    end: i64,
    strand: i64,
    seq_region_name: String,
    #[serde(default)]
    biotype: Option<String>,
    #[serde(rename = "Transcript", default)]
    transcripts: Vec<RawTranscript>,
}

#[derive(Debug, Deserialize)]
struct RawTranscript {
    id: String,
    start: i64,
    end: i64,
    strand: i64,
    #[serde(default)]
    is_canonical: i64,
    #[serde(rename = "Exon", default)]
    exons: Vec<RawExon>,
    #[serde(rename = "Translation", default)]
    translation: Option<RawTranslation>,
}

#[derive(Debug, Deserialize)]
struct RawExon {
    id: String,
    start: i64,
    end: i64,
}

#[derive(Debug, Deserialize)]
struct RawTranslation {
    start: i64,
    end: i64,
}

#[derive(Debug, Deserialize)]
struct RawVariant {
    name: String,
    #[serde(rename = "MAF", default)]
    maf: Option<f64>,
    #[serde(default)]
    ancestral_allele: Option<String>,
    #[serde(default)]
    minor_allele: Option<String>,
    #[serde(default)]
    mappings: Vec<RawVariantMapping>,
}

#[derive(Debug, Deserialize)]
struct RawVariantMapping {
    seq_region_name: String,
    start: i64,
}

fn transform_gene(raw: RawGene) -> GeneAnnotation {
    let mut canonical: Vec<CanonicalTranscript> = raw
        .transcripts
        .into_iter()
        .filter(|t| t.is_canonical == 1)
        .map(|t| CanonicalTranscript {
            id: t.id,
            start: t.start,
            end: t.end,
            forward_strand: t.strand == 1,
            exons: t
                .exons
                .into_iter()
                .map(|e| Exon {
                    id: e.id,
                    start: e.start,
                    end: e.end,
                })
                .collect(),
            translation_start: t.translation.as_ref().map(|tr| tr.start),
            translation_end: t.translation.as_ref().map(|tr| tr.end),
        })
        .collect();

    // At most one canonical transcript; anything else means no transcript.
    let canonical_transcript = if canonical.len() == 1 {
        Some(canonical.remove(0))
    } else {
        None
    };

    GeneAnnotation {
        id: raw.id,
        symbol: raw.display_name,
        description: raw.description,
        chromosome: raw.seq_region_name,
        start: raw.start,
        end: raw.end,
        forward_strand: raw.strand == 1,
        biotype: raw.biotype,
        canonical_transcript,
    }
}

fn transform_variant(raw: RawVariant) -> Option<VariantLocation> {
    let mapping = raw.mappings.first()?;
    Some(VariantLocation {
        id: raw.name,
        chromosome: mapping.seq_region_name.clone(),
        position: mapping.start,
        maf: raw.maf,
        ancestral_allele: raw.ancestral_allele,
        minor_allele: raw.minor_allele,
    })
}
