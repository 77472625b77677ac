//! Copying the rendered summary to the system clipboard.

use anyhow::{bail, Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Pipes `text` into the configured clipboard command and waits for it.
pub async fn copy(command: &[String], text: &str) -> Result<()> {
    let Some((program, args)) = command.split_first() else {
        bail!("No clipboard command configured");
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(std::process::Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to start clipboard command {program}"))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .await
            .context("Failed to write to clipboard command")?;
        // Closing stdin lets the command see EOF.
        drop(stdin);
    }

    let status = child.wait().await.context("Clipboard command did not finish")?;
    if !status.success() {
        bail!("Clipboard command {program} exited with {status}");
    }
    Ok(())
}
