//! Creation of timers and alarms: launch the alert child, then record it.
//!
//! The pid must exist before the record is appended, so the two steps run
//! strictly in that order. A failure in either step is logged and turned into
//! a generic failure [`Notice`]; the user never learns which step failed.

use chrono::{DateTime, Duration, Local};
use std::path::PathBuf;

use crate::error::ScheduleError;
use crate::format::{format_date_time, format_duration, DurationParts};
use crate::launcher::{LaunchRequest, Launcher};
use crate::registry::{self, EventKind, ScheduledEvent};

/// What the user is shown after a create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub subtitle: String,
}

impl Notice {
    fn new(title: &str, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            subtitle: subtitle.into(),
        }
    }

    pub fn alarm_failed() -> Self {
        Self::new("Timer", "An error occurred setting an alarm")
    }

    pub fn timer_failed() -> Self {
        Self::new("Timer", "An error occurred starting a timer")
    }
}

pub struct Scheduler<L> {
    launcher: L,
    registry_path: PathBuf,
}

impl<L: Launcher> Scheduler<L> {
    pub fn new(launcher: L, registry_path: PathBuf) -> Self {
        Self {
            launcher,
            registry_path,
        }
    }

    /// Schedules an alert for the wall-clock time `at`.
    ///
    /// A target in the past is not rejected; the child fires straight away.
    pub async fn create_alarm(
        &self,
        title: Option<String>,
        at: DateTime<Local>,
        now: DateTime<Local>,
    ) -> Notice {
        let display_time = format_date_time(&at, &now);
        let delay_secs = (at - now).num_seconds();

        match self
            .schedule(EventKind::Alarm, title, delay_secs, display_time.clone(), now)
            .await
        {
            Ok(_) => Notice::new("Alarm", format!("Set an alarm for {display_time}")),
            Err(e) => {
                tracing::error!(error = %e, "failed to set alarm");
                Notice::alarm_failed()
            }
        }
    }

    /// Schedules an alert `duration` from `now`.
    pub async fn create_timer(
        &self,
        title: Option<String>,
        duration: DurationParts,
        now: DateTime<Local>,
    ) -> Notice {
        let duration_text = format_duration(&duration.normalized());
        let display_time = format!(
            "{duration_text} started at {}",
            format_date_time(&now, &now)
        );
        let delay_secs = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);

        match self
            .schedule(EventKind::Timer, title, delay_secs, display_time, now)
            .await
        {
            Ok(_) => Notice::new("Timer", format!("Started a timer for {duration_text}")),
            Err(e) => {
                tracing::error!(error = %e, "failed to start timer");
                Notice::timer_failed()
            }
        }
    }

    async fn schedule(
        &self,
        kind: EventKind,
        message: Option<String>,
        delay_secs: i64,
        display_time: String,
        now: DateTime<Local>,
    ) -> Result<ScheduledEvent, ScheduleError> {
        let request = LaunchRequest {
            delay_secs,
            kind,
            message,
        };
        let pid = self.launcher.launch(&request)?;

        let fire_at = Duration::try_seconds(delay_secs)
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(now);
        let record = ScheduledEvent {
            pid,
            time: fire_at.timestamp(),
            kind,
            message: request.message,
            display_time,
        };
        registry::append(&self.registry_path, &record)
            .await
            .map_err(|source| ScheduleError::Record { pid, source })?;

        tracing::info!(pid, kind = ?kind, fire_at = record.time, "scheduled");
        Ok(record)
    }
}
