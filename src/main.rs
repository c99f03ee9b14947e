//! Dashboard Cache - command-line session runner
//!
//! Starts a session against the configured backend, runs the startup preload,
//! walks the page paths given on the command line and prints the resulting
//! cache and navigation statistics as JSON.

use anyhow::Context;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dashboard_cache::navigation::NavigationOutcome;
use dashboard_cache::{Config, Session};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Start the session and wait for the startup preload
/// 4. Navigate to every path given as an argument
/// 5. Print statistics and stop the session
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dashboard_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        base_url = %config.base_url,
        ttl_secs = config.ttl.as_secs(),
        "configuration loaded"
    );

    let mut session = Session::start(&config).context("failed to start dashboard session")?;
    session.wait_startup().await;

    // Page data is loaded by the session's page policy on every content change
    for path in std::env::args().skip(1) {
        if !session.navigation().routes().should_intercept(&path) {
            warn!(path = %path, "not a dashboard page, skipping");
            continue;
        }
        match session.navigation().navigate_to(&path, true).await {
            Ok(NavigationOutcome::Navigated(_)) => {}
            Ok(NavigationOutcome::Skipped) => info!(path = %path, "navigation skipped"),
            Err(err) => warn!(path = %path, error = %err, "navigation failed"),
        }
    }

    let report = json!({
        "cache": session.manager().stats(),
        "navigation": session.navigation().stats(),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to render statistics")?
    );

    session.shutdown();
    Ok(())
}
