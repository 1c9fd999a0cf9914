use crate::models::{ActivityKind, Heartbeat, MachineState};
use crate::mover::injector::PointerInjector;
use crate::safe_lock;
use log::{debug, warn};
use std::fmt;
use std::sync::Mutex;
use std::time::SystemTime;

/// What a single heartbeat did to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    SleepObserved,
    WakeObserved,
    UserActive,
    SuppressedAsleep,
    Moved,
    MoveFailed { consecutive_failures: u32 },
}

impl fmt::Display for TickOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickOutcome::SleepObserved => f.write_str("machine went to sleep"),
            TickOutcome::WakeObserved => f.write_str("machine woke up"),
            TickOutcome::UserActive => f.write_str("user active, not moving"),
            TickOutcome::SuppressedAsleep => f.write_str("machine asleep, not moving"),
            TickOutcome::Moved => f.write_str("moved pointer"),
            TickOutcome::MoveFailed {
                consecutive_failures,
            } => write!(f, "pointer move failed ({consecutive_failures} in a row)"),
        }
    }
}

/// The heartbeat-driven idle state machine.
///
/// `process_heartbeat` must only be called from one consumer at a time. The
/// query methods may be called from anywhere.
pub struct IdleStateMachine {
    state: Mutex<MachineState>,
    injector: Box<dyn PointerInjector>,
}

impl IdleStateMachine {
    pub fn new(injector: Box<dyn PointerInjector>) -> Self {
        Self {
            state: Mutex::new(MachineState::default()),
            injector,
        }
    }

    pub fn process_heartbeat(&self, heartbeat: &Heartbeat) -> TickOutcome {
        if heartbeat.was_any_activity {
            let mut state = safe_lock(&self.state, "Machine state");
            // Sleep wins over anything else reported in the same interval.
            if heartbeat.has(ActivityKind::MachineSleep) {
                state.system_sleeping = true;
                return TickOutcome::SleepObserved;
            }
            if heartbeat.has(ActivityKind::MachineWake) {
                state.system_sleeping = false;
                return TickOutcome::WakeObserved;
            }
            return TickOutcome::UserActive;
        }

        if safe_lock(&self.state, "Machine state").system_sleeping {
            return TickOutcome::SuppressedAsleep;
        }

        // Lock is released while the injector runs so status queries never wait on it.
        let result = self.injector.nudge();
        let now = SystemTime::now();
        let mut state = safe_lock(&self.state, "Machine state");
        match result {
            Ok(()) => {
                state.last_moved_at = Some(now);
                state.consecutive_failures = 0;
                debug!("Nudged pointer");
                TickOutcome::Moved
            }
            Err(e) => {
                state.consecutive_failures = state.consecutive_failures.saturating_add(1);
                state.last_error_at = Some(now);
                warn!(
                    "Pointer nudge failed ({} in a row): {}",
                    state.consecutive_failures, e
                );
                TickOutcome::MoveFailed {
                    consecutive_failures: state.consecutive_failures,
                }
            }
        }
    }

    pub fn snapshot(&self) -> MachineState {
        safe_lock(&self.state, "Machine state").clone()
    }

    pub fn is_running(&self) -> bool {
        safe_lock(&self.state, "Machine state").running
    }

    pub fn is_system_sleeping(&self) -> bool {
        safe_lock(&self.state, "Machine state").system_sleeping
    }

    pub(crate) fn set_running(&self, running: bool) {
        safe_lock(&self.state, "Machine state").running = running;
    }
}
