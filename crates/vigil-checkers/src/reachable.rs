//! TCP reachability checker.

use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::debug;
use vigil_core::{CheckResult, Checker};

use crate::CheckerError;

const DEFAULT_PORT: u16 = 80;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Configuration for a [`ReachableChecker`].
#[derive(Debug, Clone, Default)]
pub struct ReachableConfig {
    /// `host` or `host:port` to dial. Without a port, 80 is assumed.
    pub address: String,
    /// Dial timeout. Defaults to 3s.
    pub timeout: Option<Duration>,
}

/// Succeeds when a TCP connection to the address can be established within
/// the timeout. No bytes are exchanged.
pub struct ReachableChecker {
    address: String,
    timeout: Duration,
}

impl ReachableChecker {
    pub fn new(config: ReachableConfig) -> Result<Self, CheckerError> {
        if config.address.is_empty() {
            return Err(CheckerError::InvalidConfig(
                "address must not be empty".to_string(),
            ));
        }

        let address = if config.address.contains(':') {
            config.address
        } else {
            format!("{}:{DEFAULT_PORT}", config.address)
        };

        Ok(Self {
            address,
            timeout: config.timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }
}

#[async_trait]
impl Checker for ReachableChecker {
    async fn check(&self) -> CheckResult {
        match tokio::time::timeout(self.timeout, TcpStream::connect(&self.address)).await {
            Ok(Ok(_stream)) => CheckResult::ok(),
            Ok(Err(e)) => {
                debug!(address = %self.address, error = %e, "reachability probe failed");
                CheckResult::failed(format!("'{}' is unreachable: {e}", self.address))
            }
            Err(_) => CheckResult::failed(format!(
                "dialing '{}' timed out after {:?}",
                self.address, self.timeout
            )),
        }
    }
}
