//! Concurrency-safe store of the latest state per check.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::state::State;

/// Holds the current [`State`] for each registered check name.
///
/// A single mutex guards the map; writers replace one entry per tick and
/// readers take a deep copy, so critical sections stay short and no lock is
/// ever held across a checker call.
#[derive(Default)]
pub struct StateStore {
    states: Mutex<HashMap<String, State>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest state recorded under `name`, if any.
    pub fn get(&self, name: &str) -> Option<State> {
        self.states.lock().get(name).cloned()
    }

    /// Replace the entry for `state.name`.
    pub fn update(&self, state: State) {
        self.states.lock().insert(state.name.clone(), state);
    }

    /// A deep copy of the whole map. The opaque `details` payloads are
    /// shared by reference; everything else is value-copied, so callers may
    /// retain the snapshot indefinitely.
    pub fn snapshot(&self) -> HashMap<String, State> {
        self.states.lock().clone()
    }

    /// Drop all entries.
    pub fn reset(&self) {
        self.states.lock().clear();
    }

    /// Whether any stored state is a failing outcome of a fatal check.
    pub fn any_fatal_failure(&self) -> bool {
        self.states
            .lock()
            .values()
            .any(|state| state.is_fatal_failure())
    }
}
