// src/constants.rs

use std::time::Duration;

/// Default heartbeat interval in seconds
pub const DEFAULT_HEARTBEAT_SECS: u64 = 60;

/// Default input sampling interval in seconds
pub const DEFAULT_SAMPLE_SECS: u64 = 10;

/// Longest accepted heartbeat interval (one hour)
pub const MAX_HEARTBEAT_SECS: u64 = 60 * 60;

/// Default nudge offset in pixels
pub const DEFAULT_NUDGE_PIXELS: i16 = 1;

/// Largest accepted nudge offset in pixels
pub const MAX_NUDGE_PIXELS: i16 = 50;

/// Wall clock running ahead of the monotonic clock by more than this between
/// two samples means the host was suspended.
pub const SLEEP_GAP_THRESHOLD: Duration = Duration::from_secs(5);

/// Input this close to the previous sample is treated as our own nudge.
pub const INPUT_ECHO_SLACK: Duration = Duration::from_secs(1);

/// How long Stop waits for the heartbeat loop to acknowledge.
pub const STOP_GRACE: Duration = Duration::from_secs(2);

/// Settings file name inside the config directory
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Activity log file name inside the logs directory
pub const ACTIVITY_LOG_FILE_NAME: &str = "activity.log";

pub const APP_NAME: &str = "idlemover";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
