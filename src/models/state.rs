use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Mutable record owned by the idle state machine.
///
/// `None` timestamps mean "never happened".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineState {
    pub running: bool,
    pub system_sleeping: bool,
    pub last_moved_at: Option<SystemTime>,
    pub consecutive_failures: u32,
    pub last_error_at: Option<SystemTime>,
}

/// Seconds since the unix epoch, clamped to zero for pre-epoch clocks.
pub fn unix_secs(at: SystemTime) -> u64 {
    at.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub running: bool,
    pub system_sleeping: bool,
    pub last_moved_at: Option<u64>,
    pub consecutive_failures: u32,
    pub last_error_at: Option<u64>,
}

impl From<&MachineState> for StatusResponse {
    fn from(state: &MachineState) -> Self {
        Self {
            running: state.running,
            system_sleeping: state.system_sleeping,
            last_moved_at: state.last_moved_at.map(unix_secs),
            consecutive_failures: state.consecutive_failures,
            last_error_at: state.last_error_at.map(unix_secs),
        }
    }
}
