//! Error types for the registry, launcher and scheduler.

use std::path::PathBuf;

/// Failure reading, writing or parsing the registry file.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The file could not be opened, read or written (a missing file included).
    #[error("registry I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line was not a well-formed record.
    #[error("malformed registry record on line {line} of {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be serialized.
    #[error("failed to encode registry record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Failure creating the detached alert child.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// The OS refused to create the process.
    #[error("failed to spawn {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The child's log file could not be opened for appending.
    #[error("failed to open alert log {}: {source}", path.display())]
    Log {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure anywhere in the create-timer / create-alarm flow.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error(transparent)]
    Launch(#[from] LaunchError),

    /// The child was spawned but its record could not be appended.
    #[error("alert process {pid} is running but was not recorded: {source}")]
    Record {
        pid: u32,
        #[source]
        source: RegistryError,
    },
}
