//! vigil-core — async dependency health checking for services on
//! orchestrated container platforms.
//!
//! Registers named checks, runs each on its own background task at its own
//! cadence and aggregates the latest outcome per check, so a `/healthcheck`
//! endpoint can answer from always-current state instead of fanning out to
//! every dependency on each probe.
//!
//! # Architecture
//!
//! ```text
//! Health
//!   ├── Per-check background worker
//!   │   ├── Checker::check() → CheckResult
//!   │   ├── apply_transition() (streak counter, first-failure timestamp)
//!   │   └── StateStore (latest State per name, mutex-guarded)
//!   ├── Optional StatusListener for ok↔failed edges
//!   └── Injectable Logger (tracing-backed by default)
//! ```
//!
//! Workers shut down cooperatively via a watch channel per check; `stop`
//! clears all recorded state but keeps the configurations, so the instance
//! can be started again.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use async_trait::async_trait;
//! use vigil_core::{CheckResult, Checker, Config, Health};
//!
//! struct Ping;
//!
//! #[async_trait]
//! impl Checker for Ping {
//!     async fn check(&self) -> CheckResult {
//!         CheckResult::ok()
//!     }
//! }
//!
//! # async fn run() -> vigil_core::Result<()> {
//! let health = Health::new();
//! health
//!     .add_check(
//!         Config::new("ping", Arc::new(Ping), Duration::from_secs(5)).with_fatal(true),
//!     )
//!     .await?;
//! health.start().await?;
//!
//! let (states, failed) = health.state();
//! # let _ = (states, failed);
//! # Ok(())
//! # }
//! ```

pub mod check;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod health;
pub mod listener;
pub mod logger;
pub mod state;
pub mod store;

pub use check::{CheckResult, Checker};
pub use config::{Config, OnComplete};
pub use dispatcher::Transition;
pub use error::{Error, Result};
pub use health::Health;
pub use listener::StatusListener;
pub use logger::{Fields, Logger, NoopLogger, TracingLogger};
pub use state::{CheckStatus, State};
