//! The recorded outcome of one named check.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Status of the most recent tick of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Failed,
}

impl CheckStatus {
    pub fn is_ok(self) -> bool {
        self == CheckStatus::Ok
    }

    pub fn is_failed(self) -> bool {
        self == CheckStatus::Failed
    }
}

/// The latest recorded outcome for one named check.
///
/// One `State` exists per registered name while the scheduler is active; it
/// is replaced wholesale on every tick. Snapshots returned by
/// [`Health::state`](crate::Health::state) are value copies; the opaque
/// `details` payload is shared by reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct State {
    /// Name of the check this outcome belongs to.
    pub name: String,
    /// Whether the latest tick succeeded.
    pub status: CheckStatus,
    /// Failure reason reported by the checker; `None` when ok.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Opaque payload reported by the checker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Arc<Value>>,
    /// When the tick ran.
    pub check_time: DateTime<Utc>,
    /// Copied from the check's configuration: a failing outcome of this
    /// check taints the global failure predicate.
    pub fatal: bool,
    /// Length of the current failing streak; 0 iff `status` is ok.
    pub contiguous_failures: u64,
    /// Timestamp of the first tick of the current failing streak;
    /// `None` while the check is ok.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_first_failure: Option<DateTime<Utc>>,
}

impl State {
    /// Whether this state taints the global failure predicate.
    pub fn is_fatal_failure(&self) -> bool {
        self.fatal && self.status.is_failed()
    }
}
