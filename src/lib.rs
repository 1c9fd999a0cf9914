pub mod activity_log;
pub mod cli;
pub mod constants;
pub mod control;
pub mod error;
pub mod logging;
pub mod models;
pub mod mover;
mod platform;
pub mod settings;
#[cfg(test)]
mod test_utils;
pub mod tracker;
pub mod validation;

use crate::activity_log::ActivityLogTarget;
use crate::cli::Cli;
use crate::error::AppError;
use crate::mover::Supervisor;
use crate::settings::{AppPaths, Settings};
use clap::Parser;
use log::{error, info, warn};
use std::io::Write;
use std::sync::{Mutex, MutexGuard};

/// Lock a mutex, recovering from poisoning if necessary
pub(crate) fn safe_lock<'a, T>(mutex: &'a Mutex<T>, context: &str) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("{} mutex was poisoned, recovering", context);
            poisoned.into_inner()
        }
    }
}

fn load_settings(cli: &Cli, paths: &AppPaths) -> Result<Settings, AppError> {
    let path = cli.config.as_deref().unwrap_or(&paths.settings_file);
    let mut settings = Settings::load_or_create(path)?;
    info!("Loaded settings from {}", path.display());
    cli.apply(&mut settings);
    settings.validate()?;
    Ok(settings)
}

pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    let paths = AppPaths::discover()?;
    let settings = load_settings(&cli, &paths)?;

    if cli.print_settings {
        let json = serde_json::to_string_pretty(&settings)?;
        writeln!(std::io::stdout().lock(), "{json}")?;
        return Ok(());
    }

    let log_target = if settings.activity_log {
        info!("Activity log at {}", paths.activity_log.display());
        ActivityLogTarget::File(paths.activity_log.clone())
    } else {
        ActivityLogTarget::Disabled
    };

    let supervisor = Supervisor::global_with(|| Supervisor::native(&settings, log_target));

    if !cli.paused {
        if let Err(e) = supervisor.start() {
            if e.is_construction_error() {
                warn!("Could not start moving yet: {e}. Send 'start' to retry");
            } else {
                error!("Failed to start: {e}");
            }
        }
    }

    let stdin = std::io::stdin();
    let result = control::run(supervisor, stdin.lock(), std::io::stdout());

    supervisor.quit();
    info!("Finished quitting");
    result
}
