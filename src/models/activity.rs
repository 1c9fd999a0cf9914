use std::collections::BTreeMap;
use std::fmt;
use std::time::SystemTime;

/// Kinds of activity an activity source can report.
///
/// Only the machine sleep/wake kinds carry meaning for the idle state machine;
/// the rest only make a heartbeat count as "active".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActivityKind {
    UserInput,
    PointerMovement,
    MachineSleep,
    MachineWake,
}

impl ActivityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::UserInput => "user-input",
            ActivityKind::PointerMovement => "pointer-movement",
            ActivityKind::MachineSleep => "machine-sleep",
            ActivityKind::MachineWake => "machine-wake",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of the activity seen during one monitoring interval.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Heartbeat {
    pub was_any_activity: bool,
    pub activity: BTreeMap<ActivityKind, Vec<SystemTime>>,
}

impl Heartbeat {
    /// A heartbeat for an interval with no activity at all.
    pub fn idle() -> Self {
        Self::default()
    }

    /// A heartbeat carrying a single activity observation.
    pub fn with_activity(kind: ActivityKind, at: SystemTime) -> Self {
        let mut heartbeat = Self::default();
        heartbeat.record(kind, at);
        heartbeat
    }

    /// Add an observation, keeping the timestamps of each kind in order.
    pub fn record(&mut self, kind: ActivityKind, at: SystemTime) {
        self.was_any_activity = true;
        let times = self.activity.entry(kind).or_default();
        let pos = times.partition_point(|t| *t <= at);
        times.insert(pos, at);
    }

    /// True when at least one timestamp of `kind` was reported.
    pub fn has(&self, kind: ActivityKind) -> bool {
        self.activity.get(&kind).is_some_and(|times| !times.is_empty())
    }

    pub fn kinds(&self) -> impl Iterator<Item = ActivityKind> + '_ {
        self.activity
            .iter()
            .filter(|(_, times)| !times.is_empty())
            .map(|(kind, _)| *kind)
    }
}
