//! Status-transition bookkeeping.
//!
//! On every tick the worker folds the previously stored state into the
//! prospective one: the contiguous-failure counter and first-failure
//! timestamp are carried, and an event is emitted on every ok↔failed edge
//! for the optional [`StatusListener`](crate::StatusListener).

use crate::state::State;

/// A status edge detected between two consecutive ticks of one check.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// The check failed after being ok (or on its first ever tick).
    Failed,
    /// The check recovered after a failing streak.
    Recovered {
        /// Length of the streak that just ended.
        contiguous_failures: u64,
        /// Elapsed real time between the first failing tick and the
        /// recovering tick, in fractional seconds.
        duration_secs: f64,
    },
}

/// Fold `prev` into the prospective state `next` and report any edge.
///
/// `next` arrives with `contiguous_failures == 0` and no first-failure
/// timestamp; both are rewritten here. An absent `prev` is treated as ok.
pub fn apply_transition(prev: Option<&State>, next: &mut State) -> Option<Transition> {
    match prev.filter(|p| p.status.is_failed()) {
        // Previous tick failed: either the streak extends or it ends.
        Some(prev) if next.status.is_failed() => {
            next.contiguous_failures = prev.contiguous_failures + 1;
            next.time_of_first_failure = prev.time_of_first_failure;
            None
        }
        Some(prev) => {
            let duration_secs = prev
                .time_of_first_failure
                .map(|first| (next.check_time - first).num_milliseconds() as f64 / 1000.0)
                .unwrap_or_default();
            let contiguous_failures = prev.contiguous_failures;
            next.contiguous_failures = 0;
            next.time_of_first_failure = None;
            Some(Transition::Recovered {
                contiguous_failures,
                duration_secs,
            })
        }
        // Previous tick was ok or absent.
        None if next.status.is_failed() => {
            next.contiguous_failures = 1;
            next.time_of_first_failure = Some(next.check_time);
            Some(Transition::Failed)
        }
        None => {
            next.contiguous_failures = 0;
            next.time_of_first_failure = None;
            None
        }
    }
}
