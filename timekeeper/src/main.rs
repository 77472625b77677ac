mod cli;
mod clipboard;
mod config;
mod error;
mod fire;
mod format;
mod launcher;
mod paths;
mod process_monitor;
mod reconcile;
mod registry;
mod scheduler;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::launcher::DetachedLauncher;
use crate::process_monitor::ProcessTable;
use crate::scheduler::{Notice, Scheduler};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // ── Logging ───────────────────────────────────────────────────────────────
    // stderr only: stdout carries notices and the check summary.
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(cli).await {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let Cli {
        command,
        config: config_path,
        registry,
        ..
    } = cli;
    let load = move || load_config(config_path, registry);
    let now = chrono::Local::now();

    match command {
        Commands::Timer(args) => {
            let config = load();
            let notice = match new_scheduler(&config) {
                Ok(s) => s.create_timer(args.title.clone(), args.duration(), now).await,
                Err(e) => {
                    tracing::error!("{e:#}");
                    Notice::timer_failed()
                }
            };
            show(&notice);
        }

        Commands::Alarm(args) => {
            let at = cli::parse_at(&args.at, &now)
                .with_context(|| format!("Unrecognised alarm time: {}", args.at))?;
            let config = load();
            let notice = match new_scheduler(&config) {
                Ok(s) => s.create_alarm(args.title.clone(), at, now).await,
                Err(e) => {
                    tracing::error!("{e:#}");
                    Notice::alarm_failed()
                }
            };
            show(&notice);
        }

        Commands::Check { copy } => {
            let config = load();
            let mut processes = ProcessTable::new();
            let live = reconcile::list_active(&config.registry_path, &mut processes)
                .await
                .context("Failed to read timers")?;
            let summary = reconcile::render(&live);
            println!("{summary}");
            if copy {
                clipboard::copy(&config.clipboard_command, &summary).await?;
            }
        }

        // The alert child gets everything it needs on its command line.
        Commands::Fire(args) => fire::run(args).await?,
    }
    Ok(())
}

/// Loads the config file, falling back to defaults on error, and applies the
/// `--registry` override.
fn load_config(path: Option<PathBuf>, registry: Option<PathBuf>) -> config::Config {
    let path = path.unwrap_or_else(paths::config_file_path);
    let mut config = config::load_or_default(&path).unwrap_or_else(|e| {
        tracing::warn!("config error (using defaults): {e:#}");
        config::Config::default()
    });
    if let Some(registry) = registry {
        config.registry_path = registry;
    }
    tracing::debug!(registry = %config.registry_path.display(), "configuration loaded");
    config
}

fn new_scheduler(config: &config::Config) -> Result<Scheduler<DetachedLauncher>> {
    let launcher = DetachedLauncher {
        command: config.effective_alert_command()?,
        app_label: config.app_label.clone(),
        registry_path: config.registry_path.clone(),
        notifier: config.notifier.clone(),
        log_path: config.log_path.clone(),
    };
    Ok(Scheduler::new(launcher, config.registry_path.clone()))
}

fn show(notice: &Notice) {
    println!("{}: {}", notice.title, notice.subtitle);
}
