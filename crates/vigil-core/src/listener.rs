//! Observer hook for status transitions.

use async_trait::async_trait;

use crate::state::State;

/// Observer notified when a check crosses an ok↔failed edge.
///
/// At most one listener is installed at a time (via
/// [`Health::set_status_listener`](crate::Health::set_status_listener)).
/// Callbacks run on detached tasks off the worker's critical path: a slow
/// or panicking listener cannot wedge a worker or delay the next tick.
#[async_trait]
pub trait StatusListener: Send + Sync {
    /// Called exactly once per transition from ok (or absent) to failed.
    async fn on_failed(&self, state: &State);

    /// Called exactly once per transition from failed to ok.
    ///
    /// `contiguous_failures` is the length of the streak that just ended;
    /// `failure_duration_secs` is the elapsed real time between the first
    /// failing tick and this successful one.
    async fn on_recovered(&self, state: &State, contiguous_failures: u64, failure_duration_secs: f64);
}
