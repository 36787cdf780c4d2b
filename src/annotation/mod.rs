//! External annotation source integration and the process-lifetime cache.

mod cache;
mod client;

pub use cache::AnnotationCache;
pub use client::{AnnotationConfig, EnsemblClient};

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::AnnotationError;
use crate::models::{GeneAnnotation, VariantLocation};

/// Batch lookup of location metadata by stable external id.
///
/// Partial and empty results are tolerated: an id the source does not know
/// is simply absent from the returned map.
#[async_trait]
pub trait AnnotationSource: Send + Sync {
    async fn fetch_genes(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, GeneAnnotation>, AnnotationError>;

    async fn fetch_variants(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, VariantLocation>, AnnotationError>;
}
