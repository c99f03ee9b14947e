//! Cache Manager
//!
//! Public face of the data layer: cached and coalesced fetches, batch fetches,
//! invalidation and page-aware preloading.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{Admission, CacheKey, CacheStats, CacheStore, FetchOutcome, RequestCoalescer};
use crate::error::Result;
use crate::gateway::{RequestOptions, Transport};
use crate::manager::PagePolicy;
use crate::models::{Endpoint, FetchOptions};

// == Cache Manager ==
/// Session-scoped request cache.
///
/// Cheap to clone; clones share the same store, in-flight registry and transport.
#[derive(Clone)]
pub struct CacheManager {
    store: Arc<Mutex<CacheStore>>,
    coalescer: RequestCoalescer,
    transport: Arc<dyn Transport>,
    pages: Arc<PagePolicy>,
    started: Arc<AtomicBool>,
}

impl CacheManager {
    // == Constructors ==
    /// Creates a manager over `transport` whose entries stay fresh for `ttl`.
    pub fn new(transport: Arc<dyn Transport>, ttl: Duration) -> Self {
        Self {
            store: Arc::new(Mutex::new(CacheStore::new(ttl))),
            coalescer: RequestCoalescer::new(),
            transport,
            pages: Arc::new(PagePolicy::dashboard()),
            started: Arc::new(AtomicBool::new(false)),
        }
    }

    // == Fetch ==
    /// Returns the payload for `url`, from cache when fresh.
    ///
    /// Concurrent callers for the same key share one network call and observe the
    /// same outcome. `force_refresh` skips the freshness check but still joins a
    /// call already in flight. Failures are returned unchanged and never cached.
    pub async fn fetch(&self, url: &str, options: FetchOptions) -> Result<Value> {
        let key = CacheKey::derive(url, &options.params);

        let admission = self.coalescer.admit(
            &key,
            || {
                if options.force_refresh {
                    None
                } else {
                    self.store.lock().get(&key)
                }
            },
            || self.network_call(url, &key, &options),
        );

        match &admission {
            Admission::Cached(_) => debug!(url, "cache hit"),
            Admission::Joined(_) => debug!(url, "request already in flight"),
            Admission::Started(_) => debug!(url, force_refresh = options.force_refresh, "fetching"),
        }
        admission.outcome().await
    }

    /// Builds the computation registered with the coalescer for `key`.
    ///
    /// The payload is stored before the computation completes, so the key is
    /// never absent from both the store and the in-flight registry.
    fn network_call(
        &self,
        url: &str,
        key: &CacheKey,
        options: &FetchOptions,
    ) -> impl Future<Output = FetchOutcome> + Send + 'static {
        let transport = Arc::clone(&self.transport);
        let store = Arc::clone(&self.store);
        let url = url.to_string();
        let key = key.clone();
        let request = RequestOptions::from_fetch_options(options);
        let preload = options.preload;

        async move {
            let value = transport.call(&url, &request).await?;
            {
                let mut store = store.lock();
                store.set(key.clone(), value.clone());
                if preload {
                    store.mark_preloaded(key);
                }
            }
            debug!(url = %url, "API call completed");
            Ok(value)
        }
    }

    // == Fetch Batch ==
    /// Fetches every endpoint concurrently.
    ///
    /// One outcome per endpoint, in input order; a failing endpoint does not
    /// affect the others.
    pub async fn fetch_batch<I, E>(&self, endpoints: I) -> Vec<FetchOutcome>
    where
        I: IntoIterator<Item = E>,
        E: Into<Endpoint>,
    {
        let fetches: Vec<_> = endpoints
            .into_iter()
            .map(|endpoint| {
                let (url, options) = endpoint.into().into_parts();
                async move { self.fetch(&url, options).await }
            })
            .collect();
        debug!(count = fetches.len(), "batch fetching");
        join_all(fetches).await
    }

    // == Invalidation ==
    /// Removes cached entries.
    ///
    /// Without a pattern (or with an empty one) the whole store and every preload
    /// marker are dropped; otherwise every key containing `pattern` is removed.
    /// Returns the number of entries removed.
    pub fn clear_cache(&self, pattern: Option<&str>) -> usize {
        let mut store = self.store.lock();
        match pattern {
            Some(pattern) if !pattern.is_empty() => {
                let removed = store.remove_matching(pattern);
                info!(pattern, removed, "cache cleared for pattern");
                removed
            }
            _ => {
                let removed = store.len();
                store.clear();
                info!(removed, "all cache cleared");
                removed
            }
        }
    }

    /// Removes the entries belonging to the page at `path`.
    ///
    /// The root page owns every entry, so `/` clears the whole store together
    /// with the preload markers. Calls already in flight are not cancelled: one
    /// that started before the invalidation still stores its payload when it
    /// settles, and a following fetch of that key joins it.
    pub fn invalidate_page_cache(&self, path: &str) -> usize {
        self.pages
            .invalidation_patterns(path)
            .iter()
            .map(|pattern| self.clear_cache(Some(pattern)))
            .sum()
    }

    /// Invalidates the page at `path`, then loads its data again.
    pub async fn refresh_page_data(&self, path: &str) -> Vec<FetchOutcome> {
        self.invalidate_page_cache(path);
        self.load_page_data(path).await
    }

    // == Page Loading ==
    /// Loads the data the page at `path` renders. Unknown pages load nothing.
    pub async fn load_page_data(&self, path: &str) -> Vec<FetchOutcome> {
        let endpoints = self.pages.page_endpoints(path);
        if endpoints.is_empty() {
            return Vec::new();
        }
        self.fetch_batch(endpoints).await
    }

    /// Warms the cache for the page at `path` without blocking the caller.
    ///
    /// Returns the handle of the background task, or None when the page has no
    /// critical endpoints.
    pub fn preload_page_data(&self, path: &str) -> Option<JoinHandle<()>> {
        let endpoints = self.pages.critical_endpoints(path).to_vec();
        if endpoints.is_empty() {
            return None;
        }

        let manager = self.clone();
        let path = path.to_string();
        Some(tokio::spawn(async move {
            debug!(path = %path, "preloading page data");
            manager.preload(&endpoints, FetchOptions::preload()).await;
            debug!(path = %path, "page data preloaded");
        }))
    }

    /// Warms the endpoints every page needs.
    pub async fn preload_critical_data(&self) {
        let endpoints = self.pages.startup_endpoints().to_vec();
        let options = FetchOptions {
            preload: true,
            ..FetchOptions::default()
        };
        let failed = self.preload(&endpoints, options).await;
        info!(
            total = endpoints.len(),
            failed, "critical data preloaded"
        );
    }

    /// Runs the startup preload in the background, the first time only.
    pub fn start(&self) -> Option<JoinHandle<()>> {
        if self.started.swap(true, Ordering::SeqCst) {
            return None;
        }
        let manager = self.clone();
        Some(tokio::spawn(async move {
            manager.preload_critical_data().await;
        }))
    }

    /// Fetches `endpoints` as a warm-up; failures are logged and counted only.
    async fn preload(&self, endpoints: &[String], options: FetchOptions) -> usize {
        let outcomes = join_all(
            endpoints
                .iter()
                .map(|url| self.fetch(url, options.clone())),
        )
        .await;

        let mut failed = 0;
        for (url, outcome) in endpoints.iter().zip(outcomes) {
            if let Err(err) = outcome {
                warn!(url = %url, error = %err, "preload failed");
                failed += 1;
            }
        }
        failed
    }

    // == Stats ==
    /// Diagnostic snapshot of the cache.
    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    /// Number of keys with a network call in flight.
    pub fn in_flight(&self) -> usize {
        self.coalescer.len()
    }
}
