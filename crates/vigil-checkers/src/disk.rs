//! Disk usage checker.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::json;
use sysinfo::Disks;
use vigil_core::{CheckResult, Checker};

use crate::CheckerError;

/// Configuration for a [`DiskUsageChecker`]. All fields are required;
/// thresholds are used-space percentages with `0 < warning < critical < 100`.
#[derive(Debug, Clone)]
pub struct DiskUsageConfig {
    /// Directory or drive whose filesystem is inspected.
    pub path: PathBuf,
    /// Used-space percentage that makes the tick warn (still ok).
    pub warning_threshold: f64,
    /// Used-space percentage that fails the tick.
    pub critical_threshold: f64,
}

/// Compares the used-space percentage of the filesystem containing `path`
/// against the configured thresholds. Crossing the critical threshold fails
/// the tick; crossing only the warning threshold keeps the tick ok but
/// reports a warning in the details.
pub struct DiskUsageChecker {
    config: DiskUsageConfig,
}

impl DiskUsageChecker {
    pub fn new(config: DiskUsageConfig) -> Result<Self, CheckerError> {
        let warn = config.warning_threshold;
        let crit = config.critical_threshold;
        if !(0.0..100.0).contains(&warn) || warn == 0.0 {
            return Err(CheckerError::InvalidConfig(format!(
                "warning threshold {warn} must be within (0, 100)"
            )));
        }
        if !(0.0..100.0).contains(&crit) || crit == 0.0 {
            return Err(CheckerError::InvalidConfig(format!(
                "critical threshold {crit} must be within (0, 100)"
            )));
        }
        if warn >= crit {
            return Err(CheckerError::InvalidConfig(format!(
                "warning threshold {warn} must be below critical threshold {crit}"
            )));
        }
        Ok(Self { config })
    }

    fn classify(&self, used_percent: f64) -> CheckResult {
        if used_percent >= self.config.critical_threshold {
            return CheckResult::failed_with(
                json!({ "used_percent": used_percent }),
                format!(
                    "critical: disk usage at {used_percent:.2}% exceeds {:.2}%",
                    self.config.critical_threshold
                ),
            );
        }
        if used_percent >= self.config.warning_threshold {
            return CheckResult::ok_with(json!({
                "used_percent": used_percent,
                "warning": format!(
                    "disk usage at {used_percent:.2}% exceeds {:.2}%",
                    self.config.warning_threshold
                ),
            }));
        }
        CheckResult::ok_with(json!({ "used_percent": used_percent }))
    }
}

#[async_trait]
impl Checker for DiskUsageChecker {
    async fn check(&self) -> CheckResult {
        let path = self.config.path.clone();
        match tokio::task::spawn_blocking(move || used_percent_for(&path)).await {
            Ok(Some(used_percent)) => self.classify(used_percent),
            Ok(None) => CheckResult::failed(format!(
                "no filesystem found containing '{}'",
                self.config.path.display()
            )),
            Err(e) => CheckResult::failed(format!("disk usage probe failed: {e}")),
        }
    }
}

/// Used-space percentage of the filesystem whose mount point is the longest
/// prefix of `path`. `None` when no mounted filesystem contains the path.
fn used_percent_for(path: &Path) -> Option<f64> {
    let disks = Disks::new_with_refreshed_list();
    let disk = disks
        .list()
        .iter()
        .filter(|disk| path.starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().as_os_str().len())?;

    let total = disk.total_space();
    if total == 0 {
        return None;
    }
    let used = total.saturating_sub(disk.available_space());
    Some(used as f64 / total as f64 * 100.0)
}
