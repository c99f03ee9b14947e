//! Request Coalescer Module
//!
//! Tracks requests in flight so that each cache key has at most one underlying
//! network call at a time. Late callers await the call already running.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::cache::CacheKey;
use crate::error::{FetchError, Result};

/// Outcome every waiter of a flight observes.
pub type FetchOutcome = Result<Value>;

/// Handle to an in-flight computation, cloneable to any number of waiters.
pub type SharedFetch = Shared<BoxFuture<'static, FetchOutcome>>;

type InFlightMap = Arc<Mutex<HashMap<CacheKey, SharedFetch>>>;

// == Admission ==
/// How a caller was admitted for a key.
pub enum Admission {
    /// A fresh value was available and no call is needed
    Cached(Value),
    /// Another caller's call is running; await its outcome
    Joined(SharedFetch),
    /// This caller started the call
    Started(SharedFetch),
}

impl Admission {
    /// Awaits the outcome regardless of how the caller was admitted.
    pub async fn outcome(self) -> FetchOutcome {
        match self {
            Admission::Cached(value) => Ok(value),
            Admission::Joined(flight) | Admission::Started(flight) => flight.await,
        }
    }
}

// == Request Coalescer ==
/// Single-flight registry keyed by [`CacheKey`].
#[derive(Clone, Default)]
pub struct RequestCoalescer {
    in_flight: InFlightMap,
}

impl RequestCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    // == Begin ==
    /// Joins the call in flight for `key`, or starts `computation` if there is none.
    pub fn begin<F, Fut>(&self, key: &CacheKey, computation: F) -> SharedFetch
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = FetchOutcome> + Send + 'static,
    {
        let mut in_flight = self.in_flight.lock();
        if let Some(flight) = in_flight.get(key) {
            return flight.clone();
        }
        let flight = self.spawn(key.clone(), computation());
        in_flight.insert(key.clone(), flight.clone());
        flight
    }

    // == Admit ==
    /// Like [`begin`](Self::begin), but consults `cached` between the in-flight
    /// check and starting a call.
    ///
    /// The three steps run under one lock, so no caller can slip between a miss
    /// and the registration of the call that fills it.
    pub fn admit<C, F, Fut>(&self, key: &CacheKey, cached: C, computation: F) -> Admission
    where
        C: FnOnce() -> Option<Value>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = FetchOutcome> + Send + 'static,
    {
        let mut in_flight = self.in_flight.lock();
        if let Some(flight) = in_flight.get(key) {
            debug!(key = %key, "joining in-flight request");
            return Admission::Joined(flight.clone());
        }
        if let Some(value) = cached() {
            return Admission::Cached(value);
        }
        let flight = self.spawn(key.clone(), computation());
        in_flight.insert(key.clone(), flight.clone());
        Admission::Started(flight)
    }

    /// Runs `computation` as its own task so that no waiter can cancel it.
    ///
    /// The in-flight marker is dropped inside the task, before any waiter sees
    /// the outcome, and also if the computation panics.
    fn spawn<Fut>(&self, key: CacheKey, computation: Fut) -> SharedFetch
    where
        Fut: Future<Output = FetchOutcome> + Send + 'static,
    {
        let guard = InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
            key,
        };
        let handle = tokio::spawn(async move {
            let outcome = computation.await;
            drop(guard);
            outcome
        });

        async move {
            match handle.await {
                Ok(outcome) => outcome,
                Err(err) => Err(FetchError::Internal(format!("in-flight request died: {err}"))),
            }
        }
        .boxed()
        .shared()
    }

    pub fn is_in_flight(&self, key: &CacheKey) -> bool {
        self.in_flight.lock().contains_key(key)
    }

    /// Number of keys with a call in flight.
    pub fn len(&self) -> usize {
        self.in_flight.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_flight.lock().is_empty()
    }
}

struct InFlightGuard {
    in_flight: InFlightMap,
    key: CacheKey,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counting_call(
        calls: &Arc<AtomicUsize>,
        outcome: FetchOutcome,
    ) -> impl Future<Output = FetchOutcome> + Send + 'static {
        calls.fetch_add(1, Ordering::SeqCst);
        async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            outcome
        }
    }

    async fn exploding_call() -> FetchOutcome {
        tokio::time::sleep(Duration::from_millis(10)).await;
        panic!("handler exploded");
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_call() {
        let coalescer = RequestCoalescer::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = CacheKey::for_url("/api/news");

        let flights: Vec<SharedFetch> = (0..5)
            .map(|_| coalescer.begin(&key, || counting_call(&calls, Ok(json!(["a"])))))
            .collect();
        assert!(coalescer.is_in_flight(&key));

        let outcomes = futures::future::join_all(flights).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(outcomes.iter().all(|o| o == &Ok(json!(["a"]))));
        assert!(!coalescer.is_in_flight(&key));
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_is_shared_and_marker_cleared() {
        let coalescer = RequestCoalescer::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = CacheKey::for_url("/api/market-cap");
        let err = FetchError::Http {
            status: 503,
            status_text: "Service Unavailable".to_string(),
        };

        let a = coalescer.begin(&key, || counting_call(&calls, Err(err.clone())));
        let b = coalescer.begin(&key, || counting_call(&calls, Ok(json!(1))));

        assert_eq!(a.await, Err(err.clone()));
        assert_eq!(b.await, Err(err));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(coalescer.is_empty());

        // Eligible for a fresh call right away
        let c = coalescer.begin(&key, || counting_call(&calls, Ok(json!(2))));
        assert_eq!(c.await, Ok(json!(2)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_distinct_keys_do_not_coalesce() {
        let coalescer = RequestCoalescer::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let a = coalescer.begin(&CacheKey::for_url("/a"), || counting_call(&calls, Ok(json!("a"))));
        let b = coalescer.begin(&CacheKey::for_url("/b"), || counting_call(&calls, Ok(json!("b"))));
        assert_eq!(coalescer.len(), 2);

        assert_eq!(a.await, Ok(json!("a")));
        assert_eq!(b.await, Ok(json!("b")));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_admit_prefers_flight_then_cache() {
        let coalescer = RequestCoalescer::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = CacheKey::for_url("/api/index/all");

        let cached = coalescer.admit(&key, || Some(json!("cached")), || {
            counting_call(&calls, Ok(json!("net")))
        });
        assert!(matches!(cached, Admission::Cached(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let started = coalescer.admit(&key, || None, || counting_call(&calls, Ok(json!("net"))));
        assert!(matches!(started, Admission::Started(_)));

        // A cached value does not short-circuit a running call
        let joined = coalescer.admit(&key, || Some(json!("cached")), || {
            counting_call(&calls, Ok(json!("other")))
        });
        assert!(matches!(joined, Admission::Joined(_)));

        assert_eq!(started.outcome().await, Ok(json!("net")));
        assert_eq!(joined.outcome().await, Ok(json!("net")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_waiters_does_not_cancel_call() {
        let coalescer = RequestCoalescer::new();
        let finished = Arc::new(AtomicUsize::new(0));
        let key = CacheKey::for_url("/api/news");

        let done = Arc::clone(&finished);
        let flight = coalescer.begin(&key, move || async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            done.fetch_add(1, Ordering::SeqCst);
            Ok(json!(null))
        });
        drop(flight);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
        assert!(!coalescer.is_in_flight(&key));
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_call_clears_marker() {
        let coalescer = RequestCoalescer::new();
        let key = CacheKey::for_url("/api/boom");

        let flight = coalescer.begin(&key, exploding_call);

        assert!(matches!(flight.await, Err(FetchError::Internal(_))));
        assert!(!coalescer.is_in_flight(&key));
    }
}
