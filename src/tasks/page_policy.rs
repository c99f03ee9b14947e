//! Page Policy Task
//!
//! Background task that reacts to navigation events: data for the destination
//! page is warmed before the transition and loaded once the content changed.

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::manager::{ManagerSlot, WaitPolicy};
use crate::navigation::NavigationEvent;

/// Spawns the task that applies the page-preload policy to navigation events.
///
/// The task first waits for a manager to be installed in `slot` (bounded by
/// `wait`) and exits if none shows up. It stops when the event channel closes.
pub fn spawn_page_policy(
    slot: ManagerSlot,
    mut events: broadcast::Receiver<NavigationEvent>,
    wait: WaitPolicy,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let manager = match slot.wait(wait).await {
            Ok(manager) => manager,
            Err(err) => {
                warn!(error = %err, "page policy disabled");
                return;
            }
        };
        info!("page policy started");

        loop {
            match events.recv().await {
                Ok(NavigationEvent::BeforeNavigate { path, .. }) => {
                    debug!(path = %path, "warming page before navigation");
                    manager.preload_page_data(&path);
                }
                Ok(NavigationEvent::ContentChanged { path, .. }) => {
                    let failed = manager
                        .load_page_data(&path)
                        .await
                        .iter()
                        .filter(|outcome| outcome.is_err())
                        .count();
                    if failed > 0 {
                        warn!(path = %path, failed, "page data partially loaded");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "page policy lagging behind navigation");
                }
                Err(RecvError::Closed) => break,
            }
        }
        debug!("page policy stopped");
    })
}
