//! The check contract consumed by the scheduler.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

/// Outcome of a single check invocation.
///
/// A present `error` means the tick failed; `details` is an opaque payload
/// that downstream renderers expose under the check's state (it may
/// accompany either outcome). The scheduler treats `details` as opaque and
/// shares it by reference across snapshots.
#[derive(Debug, Clone, Default)]
pub struct CheckResult {
    /// Optional payload surfaced under `State::details`.
    pub details: Option<Arc<Value>>,
    /// Failure reason; `None` means the check succeeded.
    pub error: Option<String>,
}

impl CheckResult {
    /// A successful outcome with no details.
    pub fn ok() -> Self {
        Self::default()
    }

    /// A successful outcome carrying a detail payload.
    pub fn ok_with(details: impl Into<Value>) -> Self {
        Self {
            details: Some(Arc::new(details.into())),
            error: None,
        }
    }

    /// A failed outcome with the given reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            details: None,
            error: Some(reason.into()),
        }
    }

    /// A failed outcome that still carries a detail payload.
    pub fn failed_with(details: impl Into<Value>, reason: impl Into<String>) -> Self {
        Self {
            details: Some(Arc::new(details.into())),
            error: Some(reason.into()),
        }
    }

    /// Whether this outcome represents a failed tick.
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// A single dependency probe.
///
/// Implementations perform one check per call and report the outcome; the
/// scheduler invokes `check` on the configured cadence. The core places no
/// timeout around the call; checkers enforce their own. Bundled
/// implementations live in the `vigil-checkers` crate; anything satisfying
/// this trait can be registered.
#[async_trait]
pub trait Checker: Send + Sync {
    /// Perform one check.
    async fn check(&self) -> CheckResult;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_has_no_error() {
        let result = CheckResult::ok();
        assert!(!result.is_failed());
        assert!(result.details.is_none());
    }

    #[test]
    fn failed_with_keeps_both_fields() {
        let result = CheckResult::failed_with(json!({"attempts": 3}), "connection refused");
        assert!(result.is_failed());
        assert_eq!(result.error.as_deref(), Some("connection refused"));
        assert_eq!(result.details.unwrap()["attempts"], 3);
    }
}
