//! Recognition scheduling
//!
//! Decides when recognition attempts happen: a repeating interval gated
//! on the ink latch, plus user-initiated triggers, with at most one
//! attempt in flight at a time. A trigger that loses to the gate is
//! dropped, never queued; the next tick or click tries again against the
//! then-current canvas. The loop runs on its own worker thread driving a
//! tokio runtime so the UI thread never waits on the network.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use parking_lot::RwLock;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::client::RecognitionClient;
use super::RecognizeError;
use crate::config::RecognitionSettings;
use crate::shared::{RecognitionEvent, SchedulerCommand, SharedSketchState};

/// Observable scheduler state
#[derive(Debug, Default)]
pub struct SchedulerStatus {
    timer_active: AtomicBool,
    in_flight: AtomicBool,
}

impl SchedulerStatus {
    /// Whether the interval ticker is armed
    pub fn timer_active(&self) -> bool {
        self.timer_active.load(Ordering::SeqCst)
    }

    /// Whether a recognition attempt is currently in flight
    pub fn in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Where a trigger came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Timer,
    Manual,
}

/// What a trigger is allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriggerDecision {
    /// Attempt recognition now
    Proceed,
    /// Nothing drawn on an automatic tick: the expected common case,
    /// skipped without any notification
    SkipSilently,
    /// Nothing drawn on a manual trigger: tell the user
    ReportNothingDrawn,
    /// An attempt is already in flight: drop, do not queue
    DropBusy,
}

/// Gate a trigger against the ink latch and the in-flight flag. The ink
/// check wins: a manual trigger on a blank canvas reports the mistake
/// even while an attempt is in flight.
fn assess_trigger(trigger: Trigger, has_ink: bool, in_flight: bool) -> TriggerDecision {
    if !has_ink {
        return match trigger {
            Trigger::Timer => TriggerDecision::SkipSilently,
            Trigger::Manual => TriggerDecision::ReportNothingDrawn,
        };
    }
    if in_flight {
        return TriggerDecision::DropBusy;
    }
    TriggerDecision::Proceed
}

/// Drives automatic and manual recognition attempts.
///
/// The interval is armed once at startup and torn down exactly once when
/// the handle is dropped; configuration changes never restart it.
pub struct RecognitionScheduler {
    commands: mpsc::Sender<SchedulerCommand>,
    cancel: CancellationToken,
    status: Arc<SchedulerStatus>,
    worker: Option<JoinHandle<()>>,
}

impl RecognitionScheduler {
    /// Start the scheduler on a background thread. Events flow back over
    /// `events`; the first automatic tick lands one full period after
    /// startup.
    pub fn start(
        settings: &RecognitionSettings,
        shared: Arc<RwLock<SharedSketchState>>,
        events: Sender<RecognitionEvent>,
    ) -> Result<Self> {
        let client = RecognitionClient::new(settings)?;
        let period = Duration::from_millis(settings.interval_ms.max(100));
        let (commands, command_rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        let status = Arc::new(SchedulerStatus::default());

        let worker_ctx = Worker {
            client,
            shared,
            events,
            status: status.clone(),
        };
        let worker_cancel = cancel.clone();

        let worker = std::thread::Builder::new()
            .name("recognition-scheduler".to_string())
            .spawn(move || match Runtime::new() {
                Ok(rt) => rt.block_on(worker_ctx.run(period, command_rx, worker_cancel)),
                Err(e) => error!("Failed to create scheduler runtime: {}", e),
            })
            .context("Failed to spawn scheduler thread")?;

        Ok(Self {
            commands,
            cancel,
            status,
            worker: Some(worker),
        })
    }

    /// Ask for a recognition attempt right now. If the command queue is
    /// full the request is dropped; the next click simply tries again.
    pub fn request_recognition(&self) {
        if self
            .commands
            .try_send(SchedulerCommand::Recognize)
            .is_err()
        {
            debug!("Recognize command dropped: scheduler busy or stopped");
        }
    }

    /// Shared view of the scheduler state
    pub fn status(&self) -> Arc<SchedulerStatus> {
        self.status.clone()
    }
}

impl Drop for RecognitionScheduler {
    fn drop(&mut self) {
        self.cancel.cancel();

        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// State owned by the scheduler loop
struct Worker {
    client: RecognitionClient,
    shared: Arc<RwLock<SharedSketchState>>,
    events: Sender<RecognitionEvent>,
    status: Arc<SchedulerStatus>,
}

impl Worker {
    async fn run(
        self,
        period: Duration,
        mut commands: mpsc::Receiver<SchedulerCommand>,
        cancel: CancellationToken,
    ) {
        // First tick one full period in, matching a freshly armed timer
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.status.timer_active.store(true, Ordering::SeqCst);
        info!("Recognition scheduler armed: one attempt per {:?}", period);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.handle_trigger(Trigger::Timer);
                }
                cmd = commands.recv() => {
                    match cmd {
                        Some(SchedulerCommand::Recognize) => self.handle_trigger(Trigger::Manual),
                        None => break,
                    }
                }
                _ = cancel.cancelled() => {
                    debug!("Recognition scheduler shutting down");
                    break;
                }
            }
        }

        self.status.timer_active.store(false, Ordering::SeqCst);
        info!("Recognition scheduler stopped");
    }

    fn handle_trigger(&self, trigger: Trigger) {
        let has_ink = self.shared.read().has_ink();
        let in_flight = self.status.in_flight();

        match assess_trigger(trigger, has_ink, in_flight) {
            TriggerDecision::SkipSilently => {
                debug!("Skipping automatic tick: nothing drawn");
            }
            TriggerDecision::ReportNothingDrawn => {
                debug!("Manual recognize with nothing drawn");
                let _ = self
                    .events
                    .send(RecognitionEvent::Failed(RecognizeError::NothingDrawn));
            }
            TriggerDecision::DropBusy => {
                debug!("Dropping {:?} trigger: attempt already in flight", trigger);
            }
            TriggerDecision::Proceed => self.begin_attempt(),
        }
    }

    /// Snapshot the raster and run one attempt. The in-flight flag is
    /// claimed here and released by the spawned task on any outcome, so
    /// no failure can leave the scheduler gated.
    fn begin_attempt(&self) {
        if self.status.in_flight.swap(true, Ordering::SeqCst) {
            debug!("Dropping trigger: attempt already in flight");
            return;
        }

        let snapshot = self.shared.read().snapshot();
        let _ = self.events.send(RecognitionEvent::Started);

        let client = self.client.clone();
        let events = self.events.clone();
        let status = self.status.clone();
        tokio::spawn(async move {
            let outcome = client.recognize(snapshot).await;
            status.in_flight.store(false, Ordering::SeqCst);

            let event = match outcome {
                Ok(ranked) => {
                    debug!("Recognition completed with {} entries", ranked.len());
                    RecognitionEvent::Completed(ranked)
                }
                Err(err) => {
                    warn!("Recognition attempt failed: {}", err);
                    RecognitionEvent::Failed(err)
                }
            };
            let _ = events.send(event);
        });
    }
}
