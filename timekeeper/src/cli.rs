//! Command-line surface: subcommands, global flags and alarm time parsing.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::fire::FireArgs;
use crate::format::DurationParts;

#[derive(Debug, Parser)]
#[command(author, version, about = "Schedule timers and alarms as detached alert processes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Registry file, overriding the configured one
    #[arg(long, env = "TIMEKEEPER_REGISTRY", global = true)]
    pub registry: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a countdown timer
    Timer(TimerArgs),

    /// Set an alarm for a wall-clock time
    Alarm(AlarmArgs),

    /// List pending timers and alarms
    Check {
        /// Also copy the summary to the clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Internal: the detached alert process
    #[command(hide = true)]
    Fire(FireArgs),
}

#[derive(Debug, clap::Args)]
pub struct TimerArgs {
    /// Name shown when the timer goes off
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(long, default_value_t = 0)]
    pub days: u64,
    #[arg(long, default_value_t = 0)]
    pub hours: u64,
    #[arg(long, default_value_t = 0)]
    pub minutes: u64,
    #[arg(long, default_value_t = 0)]
    pub seconds: u64,
}

impl TimerArgs {
    pub fn duration(&self) -> DurationParts {
        DurationParts {
            days: self.days,
            hours: self.hours,
            minutes: self.minutes,
            seconds: self.seconds,
            ..DurationParts::default()
        }
    }
}

#[derive(Debug, clap::Args)]
pub struct AlarmArgs {
    /// Name shown when the alarm goes off
    #[arg(short, long)]
    pub title: Option<String>,
    /// "YYYY-MM-DD HH:MM", or "HH:MM" for today
    #[arg(long)]
    pub at: String,
}

/// Resolves an alarm time in local time. `HH:MM` means that time on `now`'s date.
pub fn parse_at(input: &str, now: &DateTime<Local>) -> Option<DateTime<Local>> {
    let input = input.trim();
    let naive = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M")
        .ok()
        .or_else(|| {
            let time = NaiveTime::parse_from_str(input, "%H:%M").ok()?;
            let date: NaiveDate = now.date_naive();
            Some(date.and_time(time))
        })?;
    Local.from_local_datetime(&naive).earliest()
}
