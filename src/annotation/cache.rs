//! Process-lifetime annotation cache.
//!
//! Two namespaces (gene annotations, variant locations), each a monotonically
//! growing map keyed by external stable id. Entries are never evicted; the
//! dataset is bounded at tens of thousands of keys. Misses are fetched from
//! the injected [`AnnotationSource`] in one batch per resolution, with
//! single-flight coalescing per key: a key already being fetched by another
//! request is awaited, not re-fetched. Insertion overwrites on key collision,
//! so a straggling fetch cannot corrupt the map.
//!
//! A failed source fetch degrades gracefully: the affected ids stay
//! unresolved for this request and nothing is cached for them, so a later
//! request will try again.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::warn;

use crate::annotation::AnnotationSource;
use crate::error::AnnotationError;
use crate::models::{GeneAnnotation, VariantLocation};

struct FlightState<V> {
    ready: HashMap<String, V>,
    inflight: HashMap<String, watch::Receiver<bool>>,
}

/// One cache namespace with single-flight miss handling.
struct FlightMap<V> {
    state: Mutex<FlightState<V>>,
}

impl<V: Clone> FlightMap<V> {
    fn new() -> Self {
        Self {
            state: Mutex::new(FlightState {
                ready: HashMap::new(),
                inflight: HashMap::new(),
            }),
        }
    }

    async fn resolve<F, Fut>(&self, ids: &[String], fetch: F) -> HashMap<String, V>
    where
        F: FnOnce(Vec<String>) -> Fut,
        Fut: Future<Output = Result<HashMap<String, V>, AnnotationError>>,
    {
        let mut resolved = HashMap::new();
        let mut owned: Vec<String> = Vec::new();
        let mut waiting: Vec<(String, watch::Receiver<bool>)> = Vec::new();
        let mut done_tx: Option<watch::Sender<bool>> = None;

        {
            let mut state = self.state.lock().await;
            let mut seen = HashSet::new();
            for id in ids {
                if !seen.insert(id.as_str()) {
                    continue;
                }
                if let Some(value) = state.ready.get(id) {
                    resolved.insert(id.clone(), value.clone());
                } else if let Some(rx) = state.inflight.get(id) {
                    waiting.push((id.clone(), rx.clone()));
                } else {
                    let tx = done_tx.get_or_insert_with(|| watch::channel(false).0);
                    state.inflight.insert(id.clone(), tx.subscribe());
                    owned.push(id.clone());
                }
            }
        }

        if let Some(done_tx) = done_tx {
            let fetched = fetch(owned.clone()).await;
            {
                let mut state = self.state.lock().await;
                for id in &owned {
                    state.inflight.remove(id);
                }
                match fetched {
                    Ok(entries) => {
                        for (id, value) in entries {
                            state.ready.insert(id, value);
                        }
                        for id in &owned {
                            if let Some(value) = state.ready.get(id) {
                                resolved.insert(id.clone(), value.clone());
                            }
                        }
                    }
                    Err(error) => {
                        warn!(
                            error = %error,
                            misses = owned.len(),
                            "annotation fetch failed; returning unenriched results"
                        );
                    }
                }
            }
            let _ = done_tx.send(true);
        }

        for (id, mut rx) in waiting {
            // An owner that died without completing closes the channel; the
            // id is then simply unresolved for this request.
            let _ = rx.wait_for(|done| *done).await;
            let state = self.state.lock().await;
            if let Some(value) = state.ready.get(&id) {
                resolved.insert(id, value.clone());
            }
        }

        resolved
    }
}

/// Shared cache service for gene and lead-variant location metadata.
pub struct AnnotationCache {
    source: Arc<dyn AnnotationSource>,
    genes: FlightMap<GeneAnnotation>,
    variants: FlightMap<VariantLocation>,
}

impl AnnotationCache {
    pub fn new(source: Arc<dyn AnnotationSource>) -> Self {
        Self {
            source,
            genes: FlightMap::new(),
            variants: FlightMap::new(),
        }
    }

    /// Resolve gene annotations, fetching only uncached ids.
    pub async fn resolve_genes(&self, ids: &[String]) -> HashMap<String, GeneAnnotation> {
        let source = Arc::clone(&self.source);
        self.genes
            .resolve(ids, move |misses| async move {
                source.fetch_genes(&misses).await
            })
            .await
    }

    /// Resolve variant locations, fetching only uncached ids.
    pub async fn resolve_variants(&self, ids: &[String]) -> HashMap<String, VariantLocation> {
        let source = Arc::clone(&self.source);
        self.variants
            .resolve(ids, move |misses| async move {
                source.fetch_variants(&misses).await
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    fn annotation(id: &str) -> GeneAnnotation {
        GeneAnnotation {
            id: id.to_string(),
            symbol: None,
            description: None,
            chromosome: "1".to_string(),
            start: 1,
            end: 2,
            forward_strand: true,
            biotype: None,
            canonical_transcript: None,
        }
    }

    struct MockSource {
        genes: HashMap<String, GeneAnnotation>,
        gene_fetches: AtomicUsize,
        fail: AtomicBool,
        delay: Duration,
    }

    impl MockSource {
        fn with_genes(ids: &[&str]) -> Self {
            Self {
                genes: ids.iter().map(|id| (id.to_string(), annotation(id))).collect(),
                gene_fetches: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
                delay: Duration::from_millis(0),
            }
        }
    }

    #[async_trait]
    impl AnnotationSource for MockSource {
        async fn fetch_genes(
            &self,
            ids: &[String],
        ) -> Result<HashMap<String, GeneAnnotation>, AnnotationError> {
            self.gene_fetches.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
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
            _ids: &[String],
        ) -> Result<HashMap<String, VariantLocation>, AnnotationError> {
            Ok(HashMap::new())
        }
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn overlapping_resolutions_never_refetch() {
        let source = Arc::new(MockSource::with_genes(&["g1", "g2", "g3"]));
        let cache = AnnotationCache::new(source.clone());

        let first = cache.resolve_genes(&ids(&["g1", "g2"])).await;
        assert_eq!(first.len(), 2);
        assert_eq!(source.gene_fetches.load(Ordering::SeqCst), 1);

        // g1/g2 are cached; only g3 may be fetched.
        let second = cache.resolve_genes(&ids(&["g1", "g2", "g3"])).await;
        assert_eq!(second.len(), 3);
        assert_eq!(source.gene_fetches.load(Ordering::SeqCst), 2);

        let third = cache.resolve_genes(&ids(&["g1", "g3"])).await;
        assert_eq!(third.len(), 2);
        assert_eq!(source.gene_fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_overlapping_misses_coalesce_into_one_fetch() {
        let mut mock = MockSource::with_genes(&["g1"]);
        mock.delay = Duration::from_millis(20);
        let source = Arc::new(mock);
        let cache = AnnotationCache::new(source.clone());

        let req = ids(&["g1"]);
        let (a, b) = tokio::join!(
            cache.resolve_genes(&req),
            cache.resolve_genes(&req),
        );
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert_eq!(source.gene_fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn duplicate_ids_in_one_request_fetch_once() {
        let source = Arc::new(MockSource::with_genes(&["g1"]));
        let cache = AnnotationCache::new(source.clone());

        let resolved = cache.resolve_genes(&ids(&["g1", "g1", "g1"])).await;
        assert_eq!(resolved.len(), 1);
        assert_eq!(source.gene_fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_fetch_degrades_and_is_retried_later() {
        let source = Arc::new(MockSource::with_genes(&["g1"]));
        source.fail.store(true, Ordering::SeqCst);
        let cache = AnnotationCache::new(source.clone());

        let degraded = cache.resolve_genes(&ids(&["g1"])).await;
        assert!(degraded.is_empty());

        // Nothing was cached for the failed batch, so the next resolution
        // goes back to the source.
        source.fail.store(false, Ordering::SeqCst);
        let recovered = cache.resolve_genes(&ids(&["g1"])).await;
        assert_eq!(recovered.len(), 1);
        assert_eq!(source.gene_fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unknown_ids_are_tolerated() {
        let source = Arc::new(MockSource::with_genes(&["g1"]));
        let cache = AnnotationCache::new(source.clone());

        let resolved = cache.resolve_genes(&ids(&["g1", "ghost"])).await;
        assert_eq!(resolved.len(), 1);
        assert!(resolved.contains_key("g1"));

        // The unknown id stays a miss and is re-asked next time.
        let resolved = cache.resolve_genes(&ids(&["ghost"])).await;
        assert!(resolved.is_empty());
        assert_eq!(source.gene_fetches.load(Ordering::SeqCst), 2);
    }
}
