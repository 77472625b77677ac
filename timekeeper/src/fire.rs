//! The alert child: sleep, alert, then drop our own registry line.
//!
//! This runs detached from the invocation that spawned it, with stdout and
//! stderr pointing at the alert log. Nothing here may stop the alert from
//! firing; registry cleanup is best-effort since the reconciler prunes
//! finished children anyway.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::time::{sleep, Duration};

use crate::error::RegistryError;
use crate::registry;

/// Positional arguments of the alert child, in spawn order.
#[derive(Debug, Clone, clap::Args)]
pub struct FireArgs {
    /// Seconds to wait before alerting; zero or negative alerts immediately.
    #[arg(allow_negative_numbers = true)]
    pub delay_secs: i64,
    pub app_label: String,
    pub subtitle: String,
    pub content: String,
    pub registry_path: PathBuf,
    pub notifier: PathBuf,
}

pub async fn run(args: FireArgs) -> Result<()> {
    if args.delay_secs > 0 {
        sleep(Duration::from_secs(args.delay_secs.unsigned_abs())).await;
    }

    let alerted = alert(&args).await;
    if let Err(e) = &alerted {
        tracing::error!("alert failed: {e:#}");
    }

    let pid = std::process::id();
    match forget(&args.registry_path, pid).await {
        Ok(true) => tracing::debug!(pid, "removed own registry record"),
        Ok(false) => {}
        Err(e) => tracing::warn!(error = %e, "could not clean up registry"),
    }
    alerted
}

/// Runs the notifier as `NOTIFIER "<label>: <subtitle>" "<content>"`.
async fn alert(args: &FireArgs) -> Result<()> {
    let summary = format!("{}: {}", args.app_label, args.subtitle);
    tracing::info!(%summary, content = %args.content, "firing");

    let status = tokio::process::Command::new(&args.notifier)
        .arg(&summary)
        .arg(&args.content)
        .status()
        .await
        .with_context(|| format!("Failed to run notifier {}", args.notifier.display()))?;
    if !status.success() {
        anyhow::bail!("Notifier {} exited with {status}", args.notifier.display());
    }
    Ok(())
}

/// Removes every record for `pid`. Returns whether anything was removed; the
/// file is only rewritten when it was.
pub async fn forget(path: &Path, pid: u32) -> Result<bool, RegistryError> {
    let records = registry::read_all(path).await?;
    let total = records.len();
    let kept: Vec<_> = records.into_iter().filter(|r| r.pid != pid).collect();
    if kept.len() == total {
        return Ok(false);
    }
    registry::overwrite(path, &kept).await?;
    Ok(true)
}
