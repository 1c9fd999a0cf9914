use crate::constants::{INPUT_ECHO_SLACK, SLEEP_GAP_THRESHOLD};
use crate::models::{ActivityKind, Heartbeat};
use std::mem;
use std::time::{Duration, SystemTime};

/// One reading taken by the polling source.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    /// Wall clock at the time of the reading.
    pub wall: SystemTime,
    /// Wall-clock time since the previous reading.
    pub wall_elapsed: Duration,
    /// Monotonic time since the previous reading. Does not advance while suspended.
    pub mono_elapsed: Duration,
    /// Time since the last user input, if the platform can tell.
    pub idle: Option<Duration>,
}

/// Folds samples into heartbeats.
pub struct HeartbeatAccumulator {
    input_kind: ActivityKind,
    pending: Heartbeat,
    deferred_wake: Option<SystemTime>,
}

impl HeartbeatAccumulator {
    pub fn new(input_kind: ActivityKind) -> Self {
        Self {
            input_kind,
            pending: Heartbeat::idle(),
            deferred_wake: None,
        }
    }

    pub fn observe(&mut self, sample: &Sample) {
        let suspended_for = sample.wall_elapsed.saturating_sub(sample.mono_elapsed);
        if suspended_for > SLEEP_GAP_THRESHOLD {
            let slept_at = sample
                .wall
                .checked_sub(sample.wall_elapsed)
                .unwrap_or(sample.wall);
            self.pending.record(ActivityKind::MachineSleep, slept_at);
            // Sleep takes precedence within a heartbeat, so the wake goes into the next one.
            self.deferred_wake = Some(sample.wall);
            return;
        }

        if let Some(idle) = sample.idle {
            if idle + INPUT_ECHO_SLACK < sample.mono_elapsed {
                let input_at = sample.wall.checked_sub(idle).unwrap_or(sample.wall);
                self.pending.record(self.input_kind, input_at);
            }
        }
    }

    /// Hand out the heartbeat for the interval that just ended.
    pub fn flush(&mut self) -> Heartbeat {
        let heartbeat = mem::take(&mut self.pending);
        if let Some(woke_at) = self.deferred_wake.take() {
            self.pending.record(ActivityKind::MachineWake, woke_at);
        }
        heartbeat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEN: Duration = Duration::from_secs(10);

    fn sample(idle_secs: Option<u64>) -> Sample {
        Sample {
            wall: SystemTime::now(),
            wall_elapsed: TEN,
            mono_elapsed: TEN,
            idle: idle_secs.map(Duration::from_secs),
        }
    }

    #[test]
    fn test_no_input_gives_idle_heartbeat() {
        let mut acc = HeartbeatAccumulator::new(ActivityKind::UserInput);
        acc.observe(&sample(Some(40)));
        acc.observe(&sample(Some(50)));
        assert_eq!(acc.flush(), Heartbeat::idle());
    }

    #[test]
    fn test_recent_input_is_recorded() {
        let mut acc = HeartbeatAccumulator::new(ActivityKind::UserInput);
        acc.observe(&sample(Some(3)));
        let hb = acc.flush();
        assert!(hb.was_any_activity);
        assert!(hb.has(ActivityKind::UserInput));
        assert!(!hb.has(ActivityKind::MachineSleep));
    }

    #[test]
    fn test_own_nudge_right_after_previous_sample_is_ignored() {
        let mut acc = HeartbeatAccumulator::new(ActivityKind::UserInput);
        let mut s = sample(None);
        s.idle = Some(TEN - Duration::from_millis(20));
        acc.observe(&s);
        assert!(!acc.flush().was_any_activity);
    }

    #[test]
    fn test_unknown_idle_time_never_counts_as_input() {
        let mut acc = HeartbeatAccumulator::new(ActivityKind::PointerMovement);
        acc.observe(&sample(None));
        assert!(!acc.flush().was_any_activity);
    }

    #[test]
    fn test_flush_resets_pending() {
        let mut acc = HeartbeatAccumulator::new(ActivityKind::UserInput);
        acc.observe(&sample(Some(1)));
        assert!(acc.flush().was_any_activity);
        assert!(!acc.flush().was_any_activity);
    }

    #[test]
    fn test_suspend_gap_emits_sleep_then_wake() {
        let mut acc = HeartbeatAccumulator::new(ActivityKind::UserInput);
        let resumed = sample(Some(0));
        let resumed = Sample {
            wall_elapsed: Duration::from_secs(3600),
            ..resumed
        };
        acc.observe(&resumed);

        let first = acc.flush();
        assert!(first.has(ActivityKind::MachineSleep));
        assert!(!first.has(ActivityKind::MachineWake));
        // Input readings across a suspend are not trusted.
        assert!(!first.has(ActivityKind::UserInput));

        let second = acc.flush();
        assert!(second.has(ActivityKind::MachineWake));
        assert!(!second.has(ActivityKind::MachineSleep));
        assert_eq!(second.activity[&ActivityKind::MachineWake], vec![resumed.wall]);

        assert!(!acc.flush().was_any_activity);
    }

    #[test]
    fn test_small_clock_drift_is_not_sleep() {
        let mut acc = HeartbeatAccumulator::new(ActivityKind::UserInput);
        let drift = Sample {
            wall_elapsed: TEN + Duration::from_secs(2),
            ..sample(Some(60))
        };
        acc.observe(&drift);
        assert!(!acc.flush().was_any_activity);
    }
}
