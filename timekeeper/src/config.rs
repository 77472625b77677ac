//! TOML configuration with per-field defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::paths;

pub const DEFAULT_APP_LABEL: &str = "Timekeeper";
pub const DEFAULT_NOTIFIER: &str = "notify-send";
pub const DEFAULT_CLIPBOARD_COMMAND: [&str; 3] = ["xclip", "-selection", "clipboard"];

/// Root configuration structure. Deserialized from <config dir>/config.toml.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Registry file shared by every invocation.
    #[serde(default = "paths::default_registry_path")]
    pub registry_path: PathBuf,
    /// Append-mode log that receives the stdout/stderr of alert children.
    #[serde(default = "paths::default_log_path")]
    pub log_path: PathBuf,
    /// Label passed to the alert child and shown as the notification title.
    #[serde(default = "default_app_label")]
    pub app_label: String,
    /// Notifier executable the alert child runs when its delay elapses.
    #[serde(default = "default_notifier")]
    pub notifier: PathBuf,
    /// Program plus fixed prefix arguments used to spawn the alert child.
    /// Empty means `<current exe> fire`.
    #[serde(default)]
    pub alert_command: Vec<String>,
    /// Program plus arguments that receive the rendered summary on stdin.
    #[serde(default = "default_clipboard_command")]
    pub clipboard_command: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_path: paths::default_registry_path(),
            log_path: paths::default_log_path(),
            app_label: default_app_label(),
            notifier: default_notifier(),
            alert_command: Vec::new(),
            clipboard_command: default_clipboard_command(),
        }
    }
}

/// Resolved program and prefix arguments of the alert child.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Config {
    /// Returns the configured alert command, or this binary's own `fire`
    /// subcommand when none is configured.
    pub fn effective_alert_command(&self) -> Result<AlertCommand> {
        match self.alert_command.split_first() {
            Some((program, args)) => Ok(AlertCommand {
                program: PathBuf::from(program),
                args: args.to_vec(),
            }),
            None => {
                let exe = std::env::current_exe()
                    .context("Failed to locate timekeeper executable")?;
                Ok(AlertCommand {
                    program: exe,
                    args: vec!["fire".to_string()],
                })
            }
        }
    }
}

/// Loads the config file at `path`, returning `Config::default()` if the file does not exist.
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn default_app_label() -> String {
    DEFAULT_APP_LABEL.to_string()
}

fn default_notifier() -> PathBuf {
    PathBuf::from(DEFAULT_NOTIFIER)
}

fn default_clipboard_command() -> Vec<String> {
    DEFAULT_CLIPBOARD_COMMAND.iter().map(|s| s.to_string()).collect()
}
