//! Command-line interface for the idle mover.

use crate::settings::Settings;
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

/// idlemover - keeps the session looking busy while you are away
#[derive(Parser, Debug)]
#[command(name = "idlemover")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (default: settings.json in the user config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Seconds between heartbeats
    #[arg(long, value_name = "SECONDS")]
    pub heartbeat_secs: Option<u64>,

    /// Seconds between input samples
    #[arg(long, value_name = "SECONDS")]
    pub sample_secs: Option<u64>,

    /// Nudge offset in pixels
    #[arg(long, value_name = "PIXELS", allow_negative_numbers = true)]
    pub nudge_pixels: Option<i16>,

    /// Append lifecycle and decision events to the activity log
    #[arg(long)]
    pub activity_log: bool,

    /// Do not start moving at launch; wait for a `start` command
    #[arg(long)]
    pub paused: bool,

    /// Log level (error, warn, info, debug, trace, off)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<LevelFilter>,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    pub print_settings: bool,
}

impl Cli {
    /// Overlay command-line values on top of the persisted settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(secs) = self.heartbeat_secs {
            settings.heartbeat_interval_secs = secs;
        }
        if let Some(secs) = self.sample_secs {
            settings.sample_interval_secs = secs;
        }
        if let Some(pixels) = self.nudge_pixels {
            settings.nudge_pixels = pixels;
        }
        if self.activity_log {
            settings.activity_log = true;
        }
    }
}
