//! Canonical file paths for timekeeper data files.
//!
//!   - config.toml       Read on every invocation; lives in the user config dir.
//!   - .timer-registry   One JSON record per scheduled event; lives in the temp dir.
//!   - timekeeper.log    stdout/stderr of detached alert children.

use std::path::PathBuf;

const APP_DIR_NAME: &str = "timekeeper";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const REGISTRY_FILE_NAME: &str = ".timer-registry";
pub const LOG_FILE_NAME: &str = "timekeeper.log";

/// Environment variable that overrides [`config_dir`].
pub const CONFIG_DIR_ENV: &str = "TIMEKEEPER_CONFIG_DIR";

/// Returns the timekeeper config directory.
///
/// `$TIMEKEEPER_CONFIG_DIR` wins; otherwise `dirs::config_dir()/timekeeper`,
/// falling back to the temp dir on platforms without a config dir.
pub fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

/// Returns the full path to the config file: <config dir>/config.toml
pub fn config_file_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// Returns the default registry path: <temp dir>/.timer-registry
pub fn default_registry_path() -> PathBuf {
    std::env::temp_dir().join(REGISTRY_FILE_NAME)
}

/// Returns the default child log path: <temp dir>/timekeeper.log
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_path_has_correct_name() {
        let path = config_file_path();
        assert_eq!(path.file_name().unwrap(), CONFIG_FILE_NAME);
    }

    #[test]
    fn registry_lives_in_temp_dir() {
        let path = default_registry_path();
        assert_eq!(path.parent().unwrap(), std::env::temp_dir().as_path());
        assert_eq!(path.file_name().unwrap(), REGISTRY_FILE_NAME);
    }

    #[test]
    fn registry_and_log_share_same_parent_dir() {
        assert_eq!(default_registry_path().parent(), default_log_path().parent());
    }
}
