//! Error types for the vigil core.

use thiserror::Error;

/// Result type alias for vigil core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the [`Health`](crate::Health) facade.
///
/// Check failures are never errors at this level; they are recorded as
/// failing [`State`](crate::State) entries instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Check configurations cannot be added while checks are running.
    #[error("unable to add check configurations while the healthcheck is active")]
    AlreadyActive,

    /// `start` was called on an instance that is already running.
    #[error("healthcheck is already running - nothing to start")]
    AlreadyRunning,

    /// `stop` was called on an instance that is not running.
    #[error("healthcheck is not running - nothing to stop")]
    AlreadyStopped,

    /// A configuration failed registration-time validation.
    #[error("invalid check configuration: {0}")]
    InvalidConfig(String),

    /// A configuration reused the name of an already registered check.
    #[error("a check named '{0}' is already registered")]
    DuplicateName(String),
}
