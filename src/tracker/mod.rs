pub mod polling;
pub mod sampler;

pub use polling::{PollingActivitySource, TrackerConfig};

use crate::error::AppError;
use crate::models::Heartbeat;
use std::sync::mpsc::Sender;

/// Messages consumed by the heartbeat loop. Heartbeats and the stop signal
/// share one queue so the loop waits on a single receiver.
pub(crate) enum LoopEvent {
    Heartbeat(Heartbeat),
    Stop,
}

/// Producer half of a heartbeat stream, handed to an activity source.
#[derive(Clone)]
pub struct HeartbeatSink {
    tx: Sender<LoopEvent>,
}

impl HeartbeatSink {
    pub(crate) fn new(tx: Sender<LoopEvent>) -> Self {
        Self { tx }
    }

    /// Queue a heartbeat. Returns false once the consumer has gone away.
    pub fn send(&self, heartbeat: Heartbeat) -> bool {
        self.tx.send(LoopEvent::Heartbeat(heartbeat)).is_ok()
    }
}

/// A live heartbeat stream. Cancelling must not block and may be repeated.
pub trait Subscription: Send {
    fn cancel(&mut self);
}

/// Anything that can produce a stream of heartbeats.
pub trait ActivitySource: Send + Sync {
    fn subscribe(&self, sink: HeartbeatSink) -> Result<Box<dyn Subscription>, AppError>;
}
