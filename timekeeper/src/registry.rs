//! Line-oriented registry of scheduled events.
//!
//! Each line of the file is one JSON object:
//!   {"pid":123,"time":1700000000,"type":"timer","message":null,"stringTime":"…"}
//!
//! The file is the only durable state shared between invocations. Appends
//! write a whole line in one call; a full rewrite (reconciliation only)
//! replaces the contents with whole lines. There is no locking.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::io::AsyncWriteExt;

use crate::error::RegistryError;

/// Whether an event was created as a countdown or for a wall-clock time.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Timer,
    Alarm,
}

impl EventKind {
    /// Subtitle passed to the alert child.
    pub fn subtitle(self) -> &'static str {
        match self {
            EventKind::Timer => "Timer",
            EventKind::Alarm => "Alarm",
        }
    }

    /// Alert content used when the user gave no message.
    pub fn default_message(self) -> &'static str {
        match self {
            EventKind::Timer => "The timer is done",
            EventKind::Alarm => "The alarm is going off",
        }
    }
}

/// One spawned alert child, as recorded in the registry.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct ScheduledEvent {
    /// Pid of the detached child. May be reused by the OS once it exits.
    pub pid: u32,
    /// Unix seconds at which the child is expected to fire.
    pub time: i64,
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// User-supplied title; `null` when none was given.
    #[serde(default)]
    pub message: Option<String>,
    /// When/how-long string computed at creation time.
    #[serde(rename = "stringTime")]
    pub display_time: String,
}

/// Appends `record` as one line, creating the file if absent.
pub async fn append(path: &Path, record: &ScheduledEvent) -> Result<(), RegistryError> {
    let mut line = serde_json::to_string(record)?;
    line.push('\n');

    let io_err = |source| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(io_err)?;
    file.write_all(line.as_bytes()).await.map_err(io_err)?;
    file.flush().await.map_err(io_err)
}

/// Replaces the whole file with `records`, one per line.
pub async fn overwrite(path: &Path, records: &[ScheduledEvent]) -> Result<(), RegistryError> {
    let mut content = String::new();
    for record in records {
        content.push_str(&serde_json::to_string(record)?);
        content.push('\n');
    }
    tokio::fs::write(path, content)
        .await
        .map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Reads every record in file order.
///
/// A missing file is an error, not an empty registry. Empty lines are
/// skipped; any other line that is not a record, whitespace-only lines
/// included, fails the whole read.
pub async fn read_all(path: &Path) -> Result<Vec<ScheduledEvent>, RegistryError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    parse_lines(path, &content)
}

fn parse_lines(path: &Path, content: &str) -> Result<Vec<ScheduledEvent>, RegistryError> {
    content
        .split('\n')
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|source| RegistryError::Parse {
                path: path.to_path_buf(),
                line: i + 1,
                source,
            })
        })
        .collect()
}
