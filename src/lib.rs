//! locus-graph - locus association query and graph-assembly engine
//!
//! Given a genomic interval and a set of evidence filters, this crate
//! resolves a cross-referenced graph of genes, variants, GWAS lead variants,
//! diseases and the association edges between them, ready for visualization.
//!
//! ## Architecture
//! One request flows: filter/selection compilation -> shared query context ->
//! concurrent fan-out of the entity queries over the read-only association
//! store -> annotation cache merge -> assembled graph.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use locus_graph::{
//!     AnnotationCache, AnnotationConfig, DatabaseManager, EnsemblClient, Interval, LocusQuery,
//!     LocusService, TableMapping,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = DatabaseManager::with_default_config().await?;
//!     let source = Arc::new(EnsemblClient::new(AnnotationConfig::default())?);
//!     let annotations = Arc::new(AnnotationCache::new(source));
//!     let service = LocusService::new(db.pool().clone(), TableMapping::grch38(), annotations);
//!
//!     let graph = service
//!         .locus_graph(&LocusQuery {
//!             interval: Interval::new("1", 100_000, 200_000),
//!             filters: Default::default(),
//!             selection: None,
//!         })
//!         .await?;
//!     println!("{} genes in window", graph.genes.len());
//!     Ok(())
//! }
//! ```

// External annotation source and cache
pub mod annotation;

// Association store access
pub mod database;

// Core error handling
pub mod error;

// Graph assembly service
pub mod graph;

// Request/response data model
pub mod models;

// Query composition: filters, selection, predicates, table mapping
pub mod query;

// Public re-exports
pub use annotation::{AnnotationCache, AnnotationConfig, AnnotationSource, EnsemblClient};
pub use database::{DatabaseConfig, DatabaseManager, LocusRepository, TableRepository};
pub use error::{AnnotationError, FilterError, LocusError};
pub use graph::{LocusService, MAX_GWAS_PVALUE_UNBOUNDED};
pub use models::{
    AssociationRow, CanonicalTranscript, Disease, DiseaseTableQuery, Exon, FilterSpec,
    G2vEvidence, Gene, GeneAnnotation, GeneVariantEdge, GwasStats, Interval, LeadVariant,
    LeadVariantDiseaseEdge, LocusGraph, LocusQuery, LocusTableQuery, SearchHit, Selection,
    SelectionType, TableView, Variant, VariantLeadVariantEdge, VariantLocation,
    VariantLocationInfo,
};
pub use query::{LocusQueryContext, TableMapping};
