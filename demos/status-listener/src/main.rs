//! Demo service: one fatal HTTP dependency check, a status listener and a
//! `/healthcheck` endpoint.
//!
//! Run a dependency on `127.0.0.1:8081` (anything answering HTTP 200 on
//! `/healthz`), then:
//!
//! ```text
//! cargo run -p status-listener-demo
//! curl localhost:8080/healthcheck
//! ```
//!
//! Kill and restart the dependency to watch the listener report the outage
//! and the recovery.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tracing::{info, warn};
use vigil_checkers::{HttpChecker, HttpConfig};
use vigil_core::{Config, Health, State, StatusListener};

struct LoggingListener;

#[async_trait]
impl StatusListener for LoggingListener {
    async fn on_failed(&self, state: &State) {
        warn!(
            check = %state.name,
            error = state.error.as_deref().unwrap_or_default(),
            "dependency went down"
        );
    }

    async fn on_recovered(&self, state: &State, contiguous_failures: u64, duration_secs: f64) {
        info!(
            check = %state.name,
            failures = contiguous_failures,
            seconds = duration_secs,
            "dependency recovered"
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,vigil_core=debug".parse().expect("valid filter")),
        )
        .init();

    let checker = HttpChecker::new(HttpConfig {
        url: "http://127.0.0.1:8081/healthz".to_string(),
        timeout: Some(Duration::from_secs(1)),
        ..Default::default()
    })?;

    let health = Arc::new(Health::new());
    health.set_status_listener(Arc::new(LoggingListener));
    health
        .add_check(
            Config::new("dependency-check", Arc::new(checker), Duration::from_secs(2))
                .with_fatal(true),
        )
        .await?;
    health.start().await?;

    let app = vigil_handlers::router(health);
    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .context("binding 0.0.0.0:8080")?;
    info!("serving /healthcheck on 0.0.0.0:8080");
    axum::serve(listener, app).await?;
    Ok(())
}
