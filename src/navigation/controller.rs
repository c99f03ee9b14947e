//! Navigation Controller
//!
//! Drives page transitions: fetches a page's partial content, records history and
//! broadcasts lifecycle events to subscribers such as the cache manager's page
//! policy.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

use crate::error::{FetchError, NavigationError};
use crate::gateway::{RequestOptions, Transport};
use crate::models::PartialContent;
use crate::navigation::history::{push_record, NavigationRecord, SessionHistory};
use crate::navigation::{NavigationEvent, RouteMap};

/// Capacity of the event channel; slower subscribers see `Lagged`.
const EVENT_CAPACITY: usize = 64;

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    /// Content for the destination was swapped in
    Navigated(PartialContent),
    /// Already on the destination, or another navigation is running
    Skipped,
}

/// Diagnostic view of the controller.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationStats {
    pub current_path: String,
    pub is_loading: bool,
    pub history_length: usize,
    pub last_navigation: Option<NavigationRecord>,
}

struct NavigationState {
    current_path: String,
    is_loading: bool,
    log: Vec<NavigationRecord>,
    session: SessionHistory,
}

// == Navigation Controller ==
pub struct NavigationController {
    transport: Arc<dyn Transport>,
    routes: RouteMap,
    timeout: Duration,
    state: Arc<Mutex<NavigationState>>,
    events: broadcast::Sender<NavigationEvent>,
}

impl NavigationController {
    /// Creates a controller positioned at `initial_path`.
    ///
    /// Partial-content fetches are aborted after `timeout`.
    pub fn new(transport: Arc<dyn Transport>, timeout: Duration, initial_path: &str) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let state = NavigationState {
            current_path: initial_path.to_string(),
            is_loading: false,
            log: vec![NavigationRecord::new(initial_path, None)],
            session: SessionHistory::new(initial_path),
        };
        Self {
            transport,
            routes: RouteMap::dashboard(),
            timeout,
            state: Arc::new(Mutex::new(state)),
            events,
        }
    }

    /// Pages this controller can swap to.
    pub fn routes(&self) -> &RouteMap {
        &self.routes
    }

    /// Subscribes to lifecycle events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<NavigationEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: NavigationEvent) {
        if self.events.send(event).is_err() {
            debug!("no navigation subscribers");
        }
    }

    // == Navigate ==
    /// Swaps to the page at `path`.
    ///
    /// Does nothing while another navigation runs or when already on `path`.
    /// With `push_state` the destination becomes a new back/forward entry.
    pub async fn navigate_to(
        &self,
        path: &str,
        push_state: bool,
    ) -> Result<NavigationOutcome, NavigationError> {
        let previous_path = {
            let mut state = self.state.lock();
            if state.is_loading || state.current_path == path {
                return Ok(NavigationOutcome::Skipped);
            }
            state.is_loading = true;
            state.current_path.clone()
        };
        let _loading = LoadingGuard(Arc::clone(&self.state));

        self.emit(NavigationEvent::BeforeNavigate {
            path: path.to_string(),
            previous_path: previous_path.clone(),
        });

        let partial = match self.fetch_partial(path).await {
            Ok(partial) => partial,
            Err(err) => {
                error!(path, error = %err, "navigation failed");
                return Err(err);
            }
        };

        {
            let mut state = self.state.lock();
            if push_state {
                state.session.push(path);
            }
            state.current_path = path.to_string();
            push_record(
                &mut state.log,
                NavigationRecord::new(path, Some(previous_path.clone())),
            );
        }

        self.emit(NavigationEvent::ContentChanged {
            path: path.to_string(),
            previous_path,
            title: partial.title.clone(),
        });
        info!(path, "navigated");
        Ok(NavigationOutcome::Navigated(partial))
    }

    async fn fetch_partial(&self, path: &str) -> Result<PartialContent, NavigationError> {
        let endpoint = self.routes.partial_endpoint(path);
        let request = RequestOptions::default()
            .with_header("X-Requested-With", "XMLHttpRequest")
            .with_header("Cache-Control", "no-cache")
            .with_timeout(self.timeout);

        let body = self.transport.call(&endpoint, &request).await?;
        // Sequences would otherwise fill the fields by position
        if !body.is_object() {
            return Err(NavigationError::Fetch(FetchError::Parse(format!(
                "partial content for {path} is not a JSON object"
            ))));
        }
        let partial: PartialContent = serde_json::from_value(body)
            .map_err(|e| NavigationError::Fetch(e.into()))?;

        match partial.error {
            Some(message) => Err(NavigationError::Server(message)),
            None => Ok(partial),
        }
    }

    // == Back / Forward ==
    /// Re-navigates to the previous session entry without pushing a new one.
    pub async fn back(&self) -> Result<NavigationOutcome, NavigationError> {
        self.step(-1).await
    }

    /// Re-navigates to the next session entry without pushing a new one.
    pub async fn forward(&self) -> Result<NavigationOutcome, NavigationError> {
        self.step(1).await
    }

    async fn step(&self, delta: isize) -> Result<NavigationOutcome, NavigationError> {
        let target = {
            let state = self.state.lock();
            let target = if delta < 0 {
                state.session.back_target()
            } else {
                state.session.forward_target()
            };
            match target {
                Some(target) => target.to_string(),
                None => return Ok(NavigationOutcome::Skipped),
            }
        };

        let outcome = self.navigate_to(&target, false).await?;
        if matches!(outcome, NavigationOutcome::Navigated(_)) {
            self.state.lock().session.step(delta);
        }
        Ok(outcome)
    }

    // == Accessors ==
    pub fn current_path(&self) -> String {
        self.state.lock().current_path.clone()
    }

    /// False while a navigation is running.
    pub fn is_enabled(&self) -> bool {
        !self.state.lock().is_loading
    }

    pub fn stats(&self) -> NavigationStats {
        let state = self.state.lock();
        NavigationStats {
            current_path: state.current_path.clone(),
            is_loading: state.is_loading,
            history_length: state.log.len(),
            last_navigation: state.log.last().cloned(),
        }
    }
}

/// Clears the loading flag however a navigation ends.
struct LoadingGuard(Arc<Mutex<NavigationState>>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.lock().is_loading = false;
    }
}
