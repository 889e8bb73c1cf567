//! vigil-checkers — bundled [`Checker`](vigil_core::Checker)
//! implementations for the vigil health checking core.
//!
//! | Checker | Probes |
//! |---|---|
//! | [`HttpChecker`] | an HTTP/1.1 endpoint: status code and optional body content |
//! | [`ReachableChecker`] | TCP connectability of a `host:port` |
//! | [`DiskUsageChecker`] | used-space percentage of a mount path against thresholds |
//!
//! Each checker validates its configuration at construction and enforces
//! its own timeout; the scheduling core places none around the call.

pub mod disk;
pub mod http;
pub mod reachable;

use thiserror::Error;

pub use disk::{DiskUsageChecker, DiskUsageConfig};
pub use http::{HttpChecker, HttpConfig};
pub use reachable::{ReachableChecker, ReachableConfig};

/// Errors produced when constructing a checker from an invalid
/// configuration.
#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("invalid checker configuration: {0}")]
    InvalidConfig(String),
}
