//! The `Health` facade: check registration, lifecycle and per-check workers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tokio::sync::{watch, RwLock};
use tokio::time::MissedTickBehavior;

use crate::check::CheckResult;
use crate::config::Config;
use crate::dispatcher::{apply_transition, Transition};
use crate::error::{Error, Result};
use crate::listener::StatusListener;
use crate::logger::{fields, Logger, NoopLogger, TracingLogger};
use crate::state::{CheckStatus, State};
use crate::store::StateStore;

/// Runs registered health checks in the background and aggregates their
/// most recent outcomes.
///
/// Register checks with [`add_check`](Health::add_check) /
/// [`add_checks`](Health::add_checks), then call [`start`](Health::start).
/// Each check runs on its own task at its configured interval; the first
/// check fires immediately without waiting for the first tick. Read the
/// aggregate with [`state`](Health::state) or [`failed`](Health::failed);
/// both are cheap enough to back a `/healthcheck` endpoint directly.
///
/// [`stop`](Health::stop) halts every worker and clears recorded state;
/// configurations are retained, so `start` may be called again.
pub struct Health {
    /// Whether workers are currently running.
    active: AtomicBool,
    /// Registered configurations, in registration order.
    configs: RwLock<Vec<Config>>,
    /// Stop signal per running worker, keyed by check name.
    runners: RwLock<HashMap<String, watch::Sender<bool>>>,
    /// Latest state per check.
    store: Arc<StateStore>,
    /// Swappable only while stopped; workers capture it at `start`.
    logger: parking_lot::RwLock<Arc<dyn Logger>>,
    /// Swappable only while stopped; workers capture it at `start`.
    listener: parking_lot::RwLock<Option<Arc<dyn StatusListener>>>,
}

impl Health {
    pub fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            configs: RwLock::new(Vec::new()),
            runners: RwLock::new(HashMap::new()),
            store: Arc::new(StateStore::new()),
            logger: parking_lot::RwLock::new(Arc::new(TracingLogger)),
            listener: parking_lot::RwLock::new(None),
        }
    }

    /// Register a single check configuration.
    ///
    /// Fails with [`Error::AlreadyActive`] while running, and with
    /// [`Error::InvalidConfig`] / [`Error::DuplicateName`] when the
    /// configuration doesn't pass registration-time validation.
    pub async fn add_check(&self, config: Config) -> Result<()> {
        if self.is_active() {
            return Err(Error::AlreadyActive);
        }

        let mut configs = self.configs.write().await;
        validate(&config, &configs)?;
        configs.push(config);
        Ok(())
    }

    /// Register several check configurations at once.
    ///
    /// All-or-nothing: if any configuration is invalid, none are added.
    /// An empty input is a successful no-op.
    pub async fn add_checks(&self, new_configs: Vec<Config>) -> Result<()> {
        if self.is_active() {
            return Err(Error::AlreadyActive);
        }

        let mut configs = self.configs.write().await;
        for (index, config) in new_configs.iter().enumerate() {
            validate(config, &configs)?;
            if new_configs[..index].iter().any(|c| c.name == config.name) {
                return Err(Error::DuplicateName(config.name.clone()));
            }
        }
        configs.extend(new_configs);
        Ok(())
    }

    /// Start a worker per registered check.
    ///
    /// Returns without waiting for any tick; every worker performs its
    /// first check immediately. Fails with [`Error::AlreadyRunning`] if
    /// already active. With zero registered checks this is a no-op that
    /// leaves the instance inactive.
    pub async fn start(&self) -> Result<()> {
        if self.is_active() {
            return Err(Error::AlreadyRunning);
        }

        let configs = self.configs.read().await;
        if configs.is_empty() {
            return Ok(());
        }

        let logger = self.logger.read().clone();
        let listener = self.listener.read().clone();

        let mut runners = self.runners.write().await;
        for config in configs.iter() {
            logger.debug("Starting checker", &fields([("name", json!(config.name))]));

            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            let worker = Worker {
                config: config.clone(),
                store: Arc::clone(&self.store),
                logger: logger.clone(),
                listener: listener.clone(),
            };
            tokio::spawn(worker.run(shutdown_rx));
            runners.insert(config.name.clone(), shutdown_tx);
        }

        self.active.store(true, Ordering::Release);
        Ok(())
    }

    /// Signal every worker to stop and clear all recorded state.
    ///
    /// A worker blocked inside a checker invocation is not interrupted; it
    /// observes the signal once the call returns. Fails with
    /// [`Error::AlreadyStopped`] if not active.
    pub async fn stop(&self) -> Result<()> {
        if !self.is_active() {
            return Err(Error::AlreadyStopped);
        }

        let logger = self.logger.read().clone();
        let mut runners = self.runners.write().await;
        for (name, shutdown_tx) in runners.drain() {
            logger.debug("Stopping checker", &fields([("name", json!(name))]));
            let _ = shutdown_tx.send(true);
        }

        self.store.reset();
        self.active.store(false, Ordering::Release);
        Ok(())
    }

    /// A snapshot of every check's latest state plus the global failure
    /// predicate.
    ///
    /// The snapshot is a deep copy keyed by check name; callers may retain
    /// it indefinitely without affecting the store. Entries appear as soon
    /// as each worker records its first outcome and disappear on `stop`.
    pub fn state(&self) -> (HashMap<String, State>, bool) {
        (self.store.snapshot(), self.failed())
    }

    /// Whether any fatal check's latest outcome is a failure.
    ///
    /// Recovers automatically: once a fatal check reports ok again, this
    /// returns `false`.
    pub fn failed(&self) -> bool {
        self.store.any_fatal_failure()
    }

    /// Whether workers are currently running.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Replace the logger. Only safe while stopped; running workers keep
    /// the logger they captured at `start`.
    pub fn set_logger(&self, logger: Arc<dyn Logger>) {
        *self.logger.write() = logger;
    }

    /// Silence all logging from this library.
    pub fn disable_logging(&self) {
        self.set_logger(Arc::new(NoopLogger));
    }

    /// Install or replace the status listener. Only safe while stopped;
    /// running workers keep the listener they captured at `start`.
    pub fn set_status_listener(&self, listener: Arc<dyn StatusListener>) {
        *self.listener.write() = Some(listener);
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new()
    }
}

/// Registration-time validation, rejecting configurations the scheduler
/// cannot run sensibly: an empty name, a zero interval (the tick source
/// panics on it) or a name that is already taken.
fn validate(config: &Config, existing: &[Config]) -> Result<()> {
    if config.name.is_empty() {
        return Err(Error::InvalidConfig("check name must not be empty".to_string()));
    }
    if config.interval.is_zero() {
        return Err(Error::InvalidConfig(format!(
            "check '{}' has a zero interval",
            config.name
        )));
    }
    if existing.iter().any(|c| c.name == config.name) {
        return Err(Error::DuplicateName(config.name.clone()));
    }
    Ok(())
}

/// One background task driving a single check on its cadence.
struct Worker {
    config: Config,
    store: Arc<StateStore>,
    logger: Arc<dyn Logger>,
    listener: Option<Arc<dyn StatusListener>>,
}

impl Worker {
    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.config.interval);
        // A check slower than the interval just lowers the effective tick
        // rate; ticks never overlap and never burst to catch up.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                // The first tick completes immediately.
                _ = ticker.tick() => {}
                _ = shutdown.changed() => break,
            }
            self.perform_check(&shutdown).await;
        }

        self.logger.debug(
            "Checker exiting",
            &fields([("name", json!(self.config.name))]),
        );
    }

    /// Invoke the checker once and record the outcome.
    async fn perform_check(&self, shutdown: &watch::Receiver<bool>) {
        // The checker runs on its own task so a panicking check is
        // recorded as a failing tick instead of tearing the worker down.
        let checker = Arc::clone(&self.config.checker);
        let result = match tokio::spawn(async move { checker.check().await }).await {
            Ok(result) => result,
            Err(join_error) => CheckResult::failed(format!("checker panicked: {join_error}")),
        };

        // `stop` raced with this tick and already reset the store: the
        // outcome must not repopulate it.
        if *shutdown.borrow() {
            return;
        }

        let mut next = State {
            name: self.config.name.clone(),
            status: if result.is_failed() {
                CheckStatus::Failed
            } else {
                CheckStatus::Ok
            },
            error: result.error,
            details: result.details,
            check_time: Utc::now(),
            fatal: self.config.fatal,
            contiguous_failures: 0,
            time_of_first_failure: None,
        };

        if let Some(reason) = &next.error {
            self.logger.error(
                "healthcheck has failed",
                &fields([
                    ("check", json!(self.config.name)),
                    ("fatal", json!(self.config.fatal)),
                    ("err", json!(reason)),
                ]),
            );
        }

        let prev = self.store.get(&self.config.name);
        let transition = apply_transition(prev.as_ref(), &mut next);
        self.store.update(next.clone());

        if let (Some(transition), Some(listener)) = (transition, self.listener.clone()) {
            let state = next.clone();
            tokio::spawn(async move {
                match transition {
                    Transition::Failed => listener.on_failed(&state).await,
                    Transition::Recovered {
                        contiguous_failures,
                        duration_secs,
                    } => {
                        listener
                            .on_recovered(&state, contiguous_failures, duration_secs)
                            .await
                    }
                }
            });
        }

        if let Some(hook) = self.config.on_complete.clone() {
            tokio::spawn(hook(next));
        }
    }
}
