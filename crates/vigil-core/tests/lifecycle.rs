//! End-to-end scheduler scenarios with scripted checkers.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use vigil_core::{CheckResult, CheckStatus, Checker, Config, Health, State, StatusListener};

const INTERVAL: Duration = Duration::from_millis(10);

/// Always succeeds; counts invocations.
struct AlwaysOk {
    calls: AtomicUsize,
}

impl AlwaysOk {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Checker for AlwaysOk {
    async fn check(&self) -> CheckResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        CheckResult::ok_with(json!({"ping": "pong"}))
    }
}

/// Always fails with a fixed reason.
struct AlwaysFail(&'static str);

#[async_trait]
impl Checker for AlwaysFail {
    async fn check(&self) -> CheckResult {
        CheckResult::failed(self.0)
    }
}

/// Fails while the flag is set, succeeds otherwise.
struct Switchable {
    failing: AtomicBool,
}

impl Switchable {
    fn new(failing: bool) -> Arc<Self> {
        Arc::new(Self {
            failing: AtomicBool::new(failing),
        })
    }

    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl Checker for Switchable {
    async fn check(&self) -> CheckResult {
        if self.failing.load(Ordering::SeqCst) {
            CheckResult::failed("dependency down")
        } else {
            CheckResult::ok()
        }
    }
}

/// Fails the first `fail_first` calls, then succeeds forever.
struct FailsThenRecovers {
    fail_first: usize,
    calls: AtomicUsize,
}

impl FailsThenRecovers {
    fn new(fail_first: usize) -> Arc<Self> {
        Arc::new(Self {
            fail_first,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Checker for FailsThenRecovers {
    async fn check(&self) -> CheckResult {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.fail_first {
            CheckResult::failed("still warming up")
        } else {
            CheckResult::ok()
        }
    }
}

/// Records every listener event.
#[derive(Default)]
struct Recorder {
    failed: Mutex<Vec<State>>,
    recovered: Mutex<Vec<(State, u64, f64)>>,
}

#[async_trait]
impl StatusListener for Recorder {
    async fn on_failed(&self, state: &State) {
        self.failed.lock().push(state.clone());
    }

    async fn on_recovered(&self, state: &State, contiguous_failures: u64, duration_secs: f64) {
        self.recovered
            .lock()
            .push((state.clone(), contiguous_failures, duration_secs));
    }
}

async fn settle(ticks: u64) {
    tokio::time::sleep(INTERVAL * ticks as u32 + Duration::from_millis(5)).await;
}

#[tokio::test]
async fn two_green_checks_report_ok() {
    let health = Health::new();
    health.disable_logging();

    let foo = AlwaysOk::new();
    let bar = AlwaysOk::new();
    health
        .add_checks(vec![
            Config::new("foo", foo.clone(), INTERVAL),
            Config::new("bar", bar.clone(), INTERVAL),
        ])
        .await
        .unwrap();

    health.start().await.unwrap();
    settle(4).await;

    let (states, failed) = health.state();
    assert!(!failed);
    assert_eq!(states.len(), 2);
    for name in ["foo", "bar"] {
        let state = &states[name];
        assert_eq!(state.status, CheckStatus::Ok);
        assert!(state.error.is_none());
        assert_eq!(state.contiguous_failures, 0);
        assert!(state.time_of_first_failure.is_none());
        assert_eq!(state.details.as_ref().unwrap()["ping"], "pong");
    }
    // First check is immediate, then one per tick.
    assert!(foo.calls() >= 2, "foo ran {} times", foo.calls());
    assert!(bar.calls() >= 2, "bar ran {} times", bar.calls());

    health.stop().await.unwrap();
}

#[tokio::test]
async fn non_fatal_failure_does_not_poison_global_state() {
    let health = Health::new();
    health.disable_logging();

    health
        .add_checks(vec![
            Config::new("foo", AlwaysOk::new(), INTERVAL),
            Config::new("bar", Arc::new(AlwaysFail("something failed")), INTERVAL),
        ])
        .await
        .unwrap();

    health.start().await.unwrap();
    settle(3).await;

    let (states, failed) = health.state();
    assert!(!failed);
    assert!(!health.failed());
    assert_eq!(states["bar"].status, CheckStatus::Failed);
    assert_eq!(states["bar"].error.as_deref(), Some("something failed"));
    assert!(states["bar"].contiguous_failures >= 1);
    assert!(states["bar"].time_of_first_failure.is_some());
    assert_eq!(states["foo"].status, CheckStatus::Ok);

    health.stop().await.unwrap();
}

#[tokio::test]
async fn fatal_failure_flips_and_recovery_clears_the_predicate() {
    let health = Health::new();
    health.disable_logging();

    let bar = Switchable::new(true);
    health
        .add_checks(vec![
            Config::new("foo", AlwaysOk::new(), INTERVAL),
            Config::new("bar", bar.clone(), INTERVAL).with_fatal(true),
        ])
        .await
        .unwrap();

    health.start().await.unwrap();
    settle(3).await;
    assert!(health.failed());

    bar.set_failing(false);
    settle(3).await;

    let (states, failed) = health.state();
    assert!(!failed);
    assert_eq!(states["bar"].status, CheckStatus::Ok);
    assert!(states["bar"].error.is_none());

    health.stop().await.unwrap();
}

#[tokio::test]
async fn listener_sees_one_failure_and_one_recovery() {
    let health = Health::new();
    health.disable_logging();

    let recorder = Arc::new(Recorder::default());
    health.set_status_listener(recorder.clone());
    health
        .add_check(Config::new("foo", FailsThenRecovers::new(3), INTERVAL))
        .await
        .unwrap();

    health.start().await.unwrap();
    // Enough ticks to cover the three failures, the recovery and a few
    // steady-state repeats that must not re-fire the listener.
    settle(8).await;

    let failed_events = recorder.failed.lock().clone();
    assert_eq!(failed_events.len(), 1);
    assert_eq!(failed_events[0].name, "foo");
    assert_eq!(failed_events[0].contiguous_failures, 1);

    let recovered_events = recorder.recovered.lock().clone();
    assert_eq!(recovered_events.len(), 1);
    let (state, contiguous_failures, duration_secs) = &recovered_events[0];
    assert_eq!(state.status, CheckStatus::Ok);
    assert_eq!(*contiguous_failures, 3);
    assert!(
        *duration_secs > 0.0 && *duration_secs < 1.0,
        "streak of three 10ms ticks lasted {duration_secs}s"
    );

    health.stop().await.unwrap();
}

#[tokio::test]
async fn stop_clears_state_and_restart_repopulates() {
    let health = Health::new();
    health.disable_logging();

    health
        .add_check(Config::new("foo", AlwaysOk::new(), INTERVAL))
        .await
        .unwrap();

    health.start().await.unwrap();
    settle(2).await;
    assert!(health.state().0.contains_key("foo"));

    health.stop().await.unwrap();
    let (states, failed) = health.state();
    assert!(states.is_empty());
    assert!(!failed);

    // Workers are gone; nothing repopulates the store while stopped.
    settle(3).await;
    assert!(health.state().0.is_empty());

    health.start().await.unwrap();
    settle(2).await;
    assert!(health.state().0.contains_key("foo"));

    health.stop().await.unwrap();
}

#[tokio::test]
async fn snapshots_do_not_alias_the_store() {
    let health = Health::new();
    health.disable_logging();

    health
        .add_check(Config::new("foo", AlwaysOk::new(), INTERVAL))
        .await
        .unwrap();
    health.start().await.unwrap();
    settle(2).await;

    let (mut first, _) = health.state();
    first.remove("foo");

    let (second, _) = health.state();
    assert!(second.contains_key("foo"));

    health.stop().await.unwrap();
}

#[tokio::test]
async fn on_complete_hook_sees_each_stored_tick() {
    let health = Health::new();
    health.disable_logging();

    let seen: Arc<Mutex<Vec<State>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    health
        .add_check(
            Config::new("foo", AlwaysOk::new(), INTERVAL).with_on_complete(move |state| {
                let sink = sink.clone();
                async move {
                    sink.lock().push(state);
                }
            }),
        )
        .await
        .unwrap();

    health.start().await.unwrap();
    settle(4).await;
    health.stop().await.unwrap();

    let seen = seen.lock();
    assert!(seen.len() >= 2, "hook ran {} times", seen.len());
    for state in seen.iter() {
        assert_eq!(state.name, "foo");
        assert_eq!(state.status, CheckStatus::Ok);
    }
}
