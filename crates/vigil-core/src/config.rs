//! Check configuration.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::check::Checker;
use crate::state::State;

type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Hook invoked on a detached task after each tick's state is stored.
///
/// Receives a value copy of the stored state; mutations do not reach the
/// store and the return value is ignored.
pub type OnComplete = Arc<dyn Fn(State) -> BoxFuture + Send + Sync>;

/// Defines one health check: a name, the checker to invoke, its cadence and
/// whether a failing outcome taints the global failure predicate.
///
/// Treated as owned by the scheduler once registered; configurations are
/// retained across stop/start cycles.
#[derive(Clone)]
pub struct Config {
    /// Unique name of the check.
    pub name: String,
    /// The probe to invoke on each tick.
    pub checker: Arc<dyn Checker>,
    /// Cadence of the check. Must be non-zero.
    pub interval: Duration,
    /// Whether a failing outcome fails the whole healthcheck.
    pub fatal: bool,
    /// Optional per-tick completion hook.
    pub on_complete: Option<OnComplete>,
}

impl Config {
    /// Create a non-fatal check configuration with no completion hook.
    pub fn new(name: impl Into<String>, checker: Arc<dyn Checker>, interval: Duration) -> Self {
        Self {
            name: name.into(),
            checker,
            interval,
            fatal: false,
            on_complete: None,
        }
    }

    /// Mark whether a failing outcome of this check is fatal.
    pub fn with_fatal(mut self, fatal: bool) -> Self {
        self.fatal = fatal;
        self
    }

    /// Install a hook invoked with a copy of the stored state after each tick.
    pub fn with_on_complete<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(State) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_complete = Some(Arc::new(move |state| Box::pin(hook(state))));
        self
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("name", &self.name)
            .field("interval", &self.interval)
            .field("fatal", &self.fatal)
            .field("on_complete", &self.on_complete.is_some())
            .finish_non_exhaustive()
    }
}
