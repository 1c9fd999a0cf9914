use crate::constants::{DEFAULT_HEARTBEAT_SECS, DEFAULT_SAMPLE_SECS};
use crate::error::AppError;
use crate::platform::{InputProbe, NativeProbe};
use crate::tracker::sampler::{HeartbeatAccumulator, Sample};
use crate::tracker::{ActivitySource, HeartbeatSink, Subscription};
use log::{debug, info};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub heartbeat_interval: Duration,
    pub sample_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(DEFAULT_HEARTBEAT_SECS),
            sample_interval: Duration::from_secs(DEFAULT_SAMPLE_SECS),
        }
    }
}

type ProbeFactory = Box<dyn Fn() -> Result<Box<dyn InputProbe>, AppError> + Send + Sync>;

/// Activity source that polls an input probe on its own thread and emits one
/// heartbeat per heartbeat interval.
pub struct PollingActivitySource {
    config: TrackerConfig,
    probe_factory: ProbeFactory,
}

impl PollingActivitySource {
    pub fn new<F>(config: TrackerConfig, probe_factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn InputProbe>, AppError> + Send + Sync + 'static,
    {
        Self {
            config,
            probe_factory: Box::new(probe_factory),
        }
    }

    /// Source backed by the platform's own input probe.
    pub fn native(config: TrackerConfig) -> Self {
        Self::new(config, || -> Result<Box<dyn InputProbe>, AppError> {
            Ok(Box::new(NativeProbe::connect()?))
        })
    }
}

impl ActivitySource for PollingActivitySource {
    fn subscribe(&self, sink: HeartbeatSink) -> Result<Box<dyn Subscription>, AppError> {
        let probe = (self.probe_factory)()?;
        let (cancel_tx, cancel_rx) = mpsc::channel();
        let config = self.config.clone();

        thread::Builder::new()
            .name("activity-tracker".into())
            .spawn(move || poll(probe, &config, &sink, &cancel_rx))?;

        info!(
            "Activity tracker started (heartbeat {:?}, sampling {:?})",
            self.config.heartbeat_interval, self.config.sample_interval
        );
        Ok(Box::new(PollingSubscription {
            cancel: Some(cancel_tx),
        }))
    }
}

/// Dropping the sender wakes the polling thread, which then exits on its own.
struct PollingSubscription {
    cancel: Option<Sender<()>>,
}

impl Subscription for PollingSubscription {
    fn cancel(&mut self) {
        if self.cancel.take().is_some() {
            debug!("Activity tracker cancelled");
        }
    }
}

fn poll(
    mut probe: Box<dyn InputProbe>,
    config: &TrackerConfig,
    sink: &HeartbeatSink,
    cancel: &Receiver<()>,
) {
    let mut acc = HeartbeatAccumulator::new(probe.input_kind());
    let mut last_mono = Instant::now();
    let mut last_wall = SystemTime::now();
    let mut next_heartbeat = last_mono + config.heartbeat_interval;

    loop {
        match cancel.recv_timeout(config.sample_interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }

        let mono = Instant::now();
        let wall = SystemTime::now();
        let sample = Sample {
            wall,
            wall_elapsed: wall.duration_since(last_wall).unwrap_or_default(),
            mono_elapsed: mono.duration_since(last_mono),
            idle: probe.idle_time(),
        };
        acc.observe(&sample);
        last_mono = mono;
        last_wall = wall;

        if mono >= next_heartbeat {
            if !sink.send(acc.flush()) {
                break;
            }
            next_heartbeat = mono + config.heartbeat_interval;
        }
    }

    debug!("Activity tracker stopped");
}
