//! Session
//!
//! Wires one dashboard session together: a transport shared by the cache
//! manager and the navigation controller, the page policy listening to
//! navigation events, and the one-time startup preload.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::gateway::{HttpGateway, Transport};
use crate::manager::{CacheManager, ManagerSlot, WaitPolicy};
use crate::navigation::NavigationController;
use crate::tasks::spawn_page_policy;

/// Path a fresh session starts on.
pub const INITIAL_PATH: &str = "/";

pub struct Session {
    manager: CacheManager,
    navigation: Arc<NavigationController>,
    page_policy: JoinHandle<()>,
    startup: Option<JoinHandle<()>>,
}

impl Session {
    /// Starts a session against the HTTP backend named in `config`.
    pub fn start(config: &Config) -> Result<Self> {
        let gateway = HttpGateway::from_config(config)?;
        info!(base_url = %gateway.base_url(), "dashboard session starting");
        Ok(Self::with_transport(config, Arc::new(gateway)))
    }

    /// Starts a session over an arbitrary transport.
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_transport(config: &Config, transport: Arc<dyn Transport>) -> Self {
        let navigation = Arc::new(NavigationController::new(
            Arc::clone(&transport),
            config.navigation_timeout,
            INITIAL_PATH,
        ));

        // Subscribe before anything can navigate so no event is missed
        let slot = ManagerSlot::new();
        let page_policy = spawn_page_policy(
            slot.clone(),
            navigation.subscribe(),
            WaitPolicy::from_config(config),
        );

        let manager = CacheManager::new(transport, config.ttl);
        if !slot.install(manager.clone()) {
            warn!("cache manager already installed");
        }
        let startup = manager.start();

        Self {
            manager,
            navigation,
            page_policy,
            startup,
        }
    }

    pub fn manager(&self) -> &CacheManager {
        &self.manager
    }

    pub fn navigation(&self) -> &Arc<NavigationController> {
        &self.navigation
    }

    /// Waits for the startup preload to finish. Later calls return immediately.
    pub async fn wait_startup(&mut self) {
        if let Some(startup) = self.startup.take() {
            if let Err(err) = startup.await {
                warn!(error = %err, "startup preload aborted");
            }
        }
    }

    /// Stops the session's background tasks.
    pub fn shutdown(self) {
        self.page_policy.abort();
        if let Some(startup) = self.startup {
            startup.abort();
        }
        info!("dashboard session stopped");
    }
}
