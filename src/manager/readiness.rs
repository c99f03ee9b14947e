//! Manager Readiness
//!
//! A slot the cache manager is installed into once constructed, and a bounded
//! wait for components that come up before it.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::NavigationError;
use crate::manager::CacheManager;

/// How long to poll for the manager before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub interval: Duration,
    pub attempts: u32,
}

impl WaitPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.manager_wait_interval,
            attempts: config.manager_wait_attempts,
        }
    }
}

/// Shared, write-once home of the session's cache manager.
#[derive(Clone, Default)]
pub struct ManagerSlot {
    inner: Arc<OnceLock<CacheManager>>,
}

impl ManagerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `manager`. Returns false if one was already installed.
    pub fn install(&self, manager: CacheManager) -> bool {
        self.inner.set(manager).is_ok()
    }

    pub fn get(&self) -> Option<CacheManager> {
        self.inner.get().cloned()
    }

    /// Polls for the manager every `policy.interval`, at most `policy.attempts`
    /// times after the first check.
    pub async fn wait(&self, policy: WaitPolicy) -> Result<CacheManager, NavigationError> {
        if let Some(manager) = self.get() {
            return Ok(manager);
        }
        for attempt in 1..=policy.attempts {
            tokio::time::sleep(policy.interval).await;
            if let Some(manager) = self.get() {
                debug!(attempt, "cache manager became available");
                return Ok(manager);
            }
        }
        warn!(attempts = policy.attempts, "gave up waiting for cache manager");
        Err(NavigationError::ManagerUnavailable {
            attempts: policy.attempts,
        })
    }
}
