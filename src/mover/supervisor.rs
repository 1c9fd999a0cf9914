use crate::activity_log::{ActivityLog, ActivityLogTarget};
use crate::constants::STOP_GRACE;
use crate::error::AppError;
use crate::models::{Heartbeat, MachineState};
use crate::mover::machine::{IdleStateMachine, TickOutcome};
use crate::mover::PointerInjector;
use crate::platform::NativeInjector;
use crate::safe_lock;
use crate::settings::Settings;
use crate::tracker::{ActivitySource, HeartbeatSink, LoopEvent, PollingActivitySource, Subscription};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    NotRunning,
}

/// The running heartbeat loop and the stream feeding it.
struct Worker {
    events: Sender<LoopEvent>,
    subscription: Box<dyn Subscription>,
    stopping: Arc<AtomicBool>,
    handle: JoinHandle<()>,
    done: Receiver<()>,
}

impl Worker {
    fn request_stop(&mut self) {
        // Checked by the loop before every tick, so queued heartbeats are dropped.
        self.stopping.store(true, Ordering::SeqCst);
        self.subscription.cancel();
        // The loop may already be gone; a second stop is harmless.
        let _ = self.events.send(LoopEvent::Stop);
    }

    fn wait(self, grace: Duration) {
        match self.done.recv_timeout(grace) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if self.handle.join().is_err() {
                    warn!("Heartbeat loop panicked");
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!("Heartbeat loop did not stop within {grace:?}, detaching it");
            }
        }
    }
}

static INSTANCE: OnceLock<Supervisor> = OnceLock::new();

/// Owns the idle state machine and drives it from an activity source.
///
/// Start/stop may be called from any thread; they are serialized internally
/// and both are idempotent.
pub struct Supervisor {
    machine: Arc<IdleStateMachine>,
    source: Box<dyn ActivitySource>,
    log_target: ActivityLogTarget,
    worker: Mutex<Option<Worker>>,
}

impl Supervisor {
    pub fn new(
        injector: Box<dyn PointerInjector>,
        source: Box<dyn ActivitySource>,
        log_target: ActivityLogTarget,
    ) -> Self {
        Self {
            machine: Arc::new(IdleStateMachine::new(injector)),
            source,
            log_target,
            worker: Mutex::new(None),
        }
    }

    /// Process-wide instance. The first initializer to run wins; later calls
    /// get the same instance and their `init` is never run.
    pub fn global_with<F>(init: F) -> &'static Supervisor
    where
        F: FnOnce() -> Supervisor,
    {
        INSTANCE.get_or_init(init)
    }

    /// Process-wide instance built from default settings and the native platform.
    pub fn global() -> &'static Supervisor {
        Self::global_with(|| Self::native(&Settings::default(), ActivityLogTarget::Disabled))
    }

    pub fn native(settings: &Settings, log_target: ActivityLogTarget) -> Supervisor {
        Self::new(
            Box::new(NativeInjector::new(settings.nudge_pixels)),
            Box::new(PollingActivitySource::native(settings.tracker_config())),
            log_target,
        )
    }

    pub fn start(&self) -> Result<StartOutcome, AppError> {
        let mut worker = safe_lock(&self.worker, "Supervisor");
        if self.machine.is_running() {
            return Ok(StartOutcome::AlreadyRunning);
        }

        let mut log = self.log_target.open()?;
        let (events_tx, events_rx) = mpsc::channel();
        let mut subscription = self.source.subscribe(HeartbeatSink::new(events_tx.clone()))?;

        let (done_tx, done_rx) = mpsc::channel();
        let machine = Arc::clone(&self.machine);
        let stopping = Arc::new(AtomicBool::new(false));
        let loop_stopping = Arc::clone(&stopping);
        log.append("started");
        let spawned = thread::Builder::new()
            .name("heartbeat-loop".into())
            .spawn(move || {
                run_loop(&machine, &events_rx, &loop_stopping, log.as_mut());
                let _ = done_tx.send(());
            });
        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                subscription.cancel();
                return Err(AppError::Io(e));
            }
        };

        self.machine.set_running(true);
        *worker = Some(Worker {
            events: events_tx,
            subscription,
            stopping,
            handle,
            done: done_rx,
        });
        info!("Idle mover started");
        Ok(StartOutcome::Started)
    }

    pub fn stop(&self) -> StopOutcome {
        let mut worker = safe_lock(&self.worker, "Supervisor");
        if !self.machine.is_running() {
            return StopOutcome::NotRunning;
        }

        let mut current = worker.take();
        if let Some(w) = current.as_mut() {
            w.request_stop();
        }
        self.machine.set_running(false);
        if let Some(w) = current {
            w.wait(STOP_GRACE);
        }

        info!("Idle mover stopped");
        StopOutcome::Stopped
    }

    pub fn quit(&self) -> StopOutcome {
        info!("Requesting quit");
        self.stop()
    }

    pub fn is_running(&self) -> bool {
        self.machine.is_running()
    }

    pub fn snapshot(&self) -> MachineState {
        self.machine.snapshot()
    }

    pub fn machine(&self) -> &IdleStateMachine {
        &self.machine
    }
}

fn run_loop(
    machine: &IdleStateMachine,
    events: &Receiver<LoopEvent>,
    stopping: &AtomicBool,
    log: &mut dyn ActivityLog,
) {
    // Blocks until the next heartbeat or the stop signal, whichever comes first.
    while let Ok(LoopEvent::Heartbeat(heartbeat)) = events.recv() {
        if stopping.load(Ordering::SeqCst) {
            break;
        }
        let outcome = machine.process_heartbeat(&heartbeat);
        debug!("Heartbeat processed: {outcome}");
        log.append(&describe(&heartbeat, outcome));
    }
    log.append("stopped");
}

fn describe(heartbeat: &Heartbeat, outcome: TickOutcome) -> String {
    match outcome {
        TickOutcome::UserActive => {
            let kinds: Vec<&str> = heartbeat.kinds().map(|kind| kind.as_str()).collect();
            format!("{outcome} ({})", kinds.join(", "))
        }
        TickOutcome::SleepObserved
        | TickOutcome::WakeObserved
        | TickOutcome::SuppressedAsleep
        | TickOutcome::Moved
        | TickOutcome::MoveFailed { .. } => outcome.to_string(),
    }
}
