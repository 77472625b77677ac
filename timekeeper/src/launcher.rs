//! Spawning of detached alert children.
//!
//! The child is started with positional arguments
//!   `<prefix args…> DELAY LABEL SUBTITLE CONTENT REGISTRY NOTIFIER`
//! and is never waited on. On unix it starts a new session (`setsid`), so it
//! has no controlling terminal: neither a Ctrl+C nor a hangup of the parent's
//! terminal reaches it. Its stdout/stderr are appended to the configured log
//! file.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::config::AlertCommand;
use crate::error::LaunchError;
use crate::registry::EventKind;

/// Everything the alert child needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRequest {
    /// Seconds to sleep before alerting. May be zero or negative.
    pub delay_secs: i64,
    pub kind: EventKind,
    /// User message; the kind's default content is used when absent.
    pub message: Option<String>,
}

impl LaunchRequest {
    /// The text the alert will show.
    pub fn content(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or_else(|| self.kind.default_message())
    }
}

/// Creates the child process for a scheduled event and returns its pid.
pub trait Launcher {
    fn launch(&self, request: &LaunchRequest) -> Result<u32, LaunchError>;
}

/// [`Launcher`] that spawns a real detached OS process.
#[derive(Debug, Clone)]
pub struct DetachedLauncher {
    pub command: AlertCommand,
    pub app_label: String,
    pub registry_path: PathBuf,
    pub notifier: PathBuf,
    pub log_path: PathBuf,
}

impl DetachedLauncher {
    /// Positional arguments appended after the command's prefix args.
    pub fn child_args(&self, request: &LaunchRequest) -> Vec<String> {
        vec![
            request.delay_secs.to_string(),
            self.app_label.clone(),
            request.kind.subtitle().to_string(),
            request.content().to_string(),
            self.registry_path.to_string_lossy().into_owned(),
            self.notifier.to_string_lossy().into_owned(),
        ]
    }
}

impl Launcher for DetachedLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<u32, LaunchError> {
        let log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|source| LaunchError::Log {
                path: self.log_path.clone(),
                source,
            })?;
        let log_err = log.try_clone().map_err(|source| LaunchError::Log {
            path: self.log_path.clone(),
            source,
        })?;

        let mut command = Command::new(&self.command.program);
        command
            .args(&self.command.args)
            .args(self.child_args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::from(log_err));

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // SAFETY: runs in the forked child before exec; setsid is
            // async-signal-safe and touches no memory shared with the parent.
            unsafe {
                command.pre_exec(|| {
                    if libc::setsid() == -1 {
                        return Err(std::io::Error::last_os_error());
                    }
                    Ok(())
                });
            }
        }

        let child = command.spawn().map_err(|source| LaunchError::Spawn {
            program: self.command.program.clone(),
            source,
        })?;
        let pid = child.id();
        // Dropping a std Child neither waits for nor kills it.
        drop(child);

        tracing::debug!(pid, delay_secs = request.delay_secs, kind = ?request.kind, "alert child spawned");
        Ok(pid)
    }
}
