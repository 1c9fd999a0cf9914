//! Shared test utilities for the idle mover.
//!
//! Activity sources a test can drive by hand, an injector that blocks until
//! released, and a polling wait helper.

#![cfg(test)]

use crate::error::AppError;
use crate::models::Heartbeat;
use crate::mover::PointerInjector;
use crate::tracker::{ActivitySource, HeartbeatSink, Subscription};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Activity source whose heartbeats are pushed by the test.
///
/// Clones share the same stream, so a test keeps one clone and hands another
/// to the supervisor.
#[derive(Clone, Default)]
pub struct ManualSource {
    sink: Arc<Mutex<Option<HeartbeatSink>>>,
    subscriptions: Arc<AtomicUsize>,
    cancellations: Arc<AtomicUsize>,
}

impl ManualSource {
    /// Push a heartbeat into the live stream. False when nobody is subscribed.
    pub fn push(&self, heartbeat: Heartbeat) -> bool {
        self.sink
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|sink| sink.send(heartbeat))
    }

    pub fn subscriptions(&self) -> usize {
        self.subscriptions.load(Ordering::SeqCst)
    }

    pub fn cancellations(&self) -> usize {
        self.cancellations.load(Ordering::SeqCst)
    }
}

impl ActivitySource for ManualSource {
    fn subscribe(&self, sink: HeartbeatSink) -> Result<Box<dyn Subscription>, AppError> {
        *self.sink.lock().unwrap() = Some(sink);
        self.subscriptions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ManualSubscription {
            sink: Arc::clone(&self.sink),
            cancellations: Arc::clone(&self.cancellations),
            cancelled: false,
        }))
    }
}

struct ManualSubscription {
    sink: Arc<Mutex<Option<HeartbeatSink>>>,
    cancellations: Arc<AtomicUsize>,
    cancelled: bool,
}

impl Subscription for ManualSubscription {
    fn cancel(&mut self) {
        if !self.cancelled {
            self.cancelled = true;
            self.sink.lock().unwrap().take();
            self.cancellations.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Source that cannot be opened, like a missing display.
pub struct FailingSource;

impl ActivitySource for FailingSource {
    fn subscribe(&self, _sink: HeartbeatSink) -> Result<Box<dyn Subscription>, AppError> {
        Err(AppError::SourceUnavailable("no display".into()))
    }
}

/// Injector whose nudges block until `release` is called, like a display
/// server that stopped answering. Every nudge succeeds once released.
#[derive(Default)]
pub struct GatedInjector {
    open: Mutex<bool>,
    opened: Condvar,
    calls: AtomicUsize,
}

impl GatedInjector {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn release(&self) {
        *self.open.lock().unwrap() = true;
        self.opened.notify_all();
    }
}

impl PointerInjector for GatedInjector {
    fn nudge(&self) -> Result<(), AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut open = self.open.lock().unwrap();
        while !*open {
            open = self.opened.wait(open).unwrap();
        }
        Ok(())
    }
}

/// Poll `condition` until it holds or `timeout` passes. Returns the last result.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(5));
    }
}
