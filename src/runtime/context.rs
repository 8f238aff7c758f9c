use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::codec::{WireDecode, WireEncode, decode_checked};
use crate::domain::UtcDatetime;
use crate::error::{ActivityError, WorkflowError};
use crate::workflow::types::PricingResult;

use super::clock::WorkflowClock;
use super::history::{EventKind, History};
use super::retry::ActivityOptions;

/// Handed to every activity attempt: heartbeating and cooperative
/// cancellation. Activities may do I/O and read the wall clock; this is
/// the non-deterministic side of the fence.
#[derive(Clone)]
pub struct ActivityContext {
    heartbeat: mpsc::UnboundedSender<()>,
    cancel: CancellationToken,
}

impl ActivityContext {
    /// Tell the runtime this attempt is still alive. Mandatory within
    /// the step's heartbeat window, where one is configured.
    pub fn heartbeat(&self) {
        let _ = self.heartbeat.send(());
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves when the workflow is cancelled; long activities should
    /// select against this and return promptly.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }
}

/// The workflow's only window onto the world.
///
/// Every suspension point lives here, and every suspension appends to
/// (or, on replay, consumes from) the durable event history. Workflow
/// code holding a `WorkflowCtx` must not read the wall clock, spawn
/// tasks, or touch I/O — activities do that, on the other side of
/// [`WorkflowCtx::execute_activity`].
pub struct WorkflowCtx {
    clock: Arc<dyn WorkflowClock>,
    history: Arc<Mutex<History>>,
    cursor: usize,
    logical_now: UtcDatetime,
    signals: mpsc::UnboundedReceiver<Value>,
    // Keeps `signals.recv()` from resolving to None if every external
    // handle is dropped mid-run; the wait then ends by timeout or
    // cancellation instead.
    _signal_keepalive: mpsc::UnboundedSender<Value>,
    status_tx: watch::Sender<String>,
    pricing_tx: watch::Sender<Option<PricingResult>>,
    cancel: CancellationToken,
}

enum AttemptOutcome<Out> {
    Completed(Out),
    Failed(ActivityError),
    Cancelled,
}

enum WaitOutcome {
    Signal(Value),
    TimedOut,
    Cancelled,
}

impl WorkflowCtx {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        clock: Arc<dyn WorkflowClock>,
        history: History,
        signals: mpsc::UnboundedReceiver<Value>,
        signal_keepalive: mpsc::UnboundedSender<Value>,
        status_tx: watch::Sender<String>,
        pricing_tx: watch::Sender<Option<PricingResult>>,
        cancel: CancellationToken,
    ) -> Self {
        let logical_now = history
            .events()
            .first()
            .map(|e| e.timestamp)
            .unwrap_or_else(|| clock.wall_now());
        Self {
            clock,
            history: Arc::new(Mutex::new(history)),
            cursor: 0,
            logical_now,
            signals,
            _signal_keepalive: signal_keepalive,
            status_tx,
            pricing_tx,
            cancel,
        }
    }

    pub(crate) fn history_handle(&self) -> Arc<Mutex<History>> {
        Arc::clone(&self.history)
    }

    /// Replay-safe current time: the timestamp of the most recent
    /// history event. Identical on the live run and on every replay.
    pub fn now(&self) -> UtcDatetime {
        self.logical_now
    }

    /// True while recorded events remain to be consumed.
    pub fn is_replaying(&self) -> bool {
        self.cursor < self.history.lock().expect("history lock").len()
    }

    /// Publish the workflow phase for `get_status` queries.
    pub fn set_status(&self, status: impl Into<String>) {
        let _ = self.status_tx.send(status.into());
    }

    /// Publish the latest pricing for `get_current_pricing` queries.
    pub fn publish_pricing(&self, pricing: Option<PricingResult>) {
        let _ = self.pricing_tx.send(pricing);
    }

    fn append(&mut self, kind: EventKind) {
        let timestamp = self.clock.wall_now();
        let mut history = self.history.lock().expect("history lock");
        history.push(timestamp, kind);
        self.cursor = history.len();
        self.logical_now = timestamp;
    }

    fn next_recorded(&mut self) -> Option<super::history::HistoryEvent> {
        let history = self.history.lock().expect("history lock");
        let event = history.get(self.cursor).cloned();
        drop(history);
        if let Some(event) = &event {
            self.cursor += 1;
            self.logical_now = event.timestamp;
        }
        event
    }

    /// Record (or on replay, verify) the start of the run with its
    /// codec-encoded input.
    pub fn record_start<T: WireEncode>(&mut self, input: &T) -> Result<(), WorkflowError> {
        if !self.is_replaying() {
            self.append(EventKind::WorkflowStarted {
                input: input.encode(),
            });
            return Ok(());
        }
        let event = self.next_recorded().expect("replaying implies an event");
        match event.kind {
            EventKind::WorkflowStarted { .. } => Ok(()),
            other => Err(WorkflowError::HistoryMismatch {
                seq: event.seq,
                message: format!("expected WorkflowStarted, found {other:?}"),
            }),
        }
    }

    /// Run one activity step under its options: per-attempt timeout,
    /// heartbeat watchdog, retry policy with exponential backoff. Only
    /// the settled outcome enters the history, so replay sees a single
    /// event regardless of how many attempts the live run burned.
    pub async fn execute_activity<In, Out, F, Fut>(
        &mut self,
        name: &'static str,
        opts: &ActivityOptions,
        input: In,
        mut run: F,
    ) -> Result<Out, WorkflowError>
    where
        In: Clone,
        Out: WireEncode + WireDecode,
        F: FnMut(In, ActivityContext) -> Fut,
        Fut: Future<Output = Result<Out, ActivityError>>,
    {
        if self.is_replaying() {
            let event = self.next_recorded().expect("replaying implies an event");
            return match event.kind {
                EventKind::ActivityCompleted {
                    name: recorded,
                    output,
                } if recorded == name => Out::decode(&output).map_err(|e| {
                    WorkflowError::HistoryMismatch {
                        seq: event.seq,
                        message: format!("recorded output of '{name}' failed to decode: {e}"),
                    }
                }),
                EventKind::ActivityFailed {
                    name: recorded,
                    kind,
                    message,
                } if recorded == name => Err(WorkflowError::ActivityFailed {
                    name,
                    source: ActivityError::new(kind, message),
                }),
                other => Err(WorkflowError::HistoryMismatch {
                    seq: event.seq,
                    message: format!("expected activity '{name}', found {other:?}"),
                }),
            };
        }

        let mut completed_attempts = 0u32;
        loop {
            if self.cancel.is_cancelled() {
                return Err(WorkflowError::Cancelled);
            }
            let (heartbeat_tx, heartbeat_rx) = mpsc::unbounded_channel();
            let attempt_ctx = ActivityContext {
                heartbeat: heartbeat_tx,
                cancel: self.cancel.clone(),
            };
            let outcome = run_attempt(
                run(input.clone(), attempt_ctx),
                opts,
                heartbeat_rx,
                &self.cancel,
            )
            .await;
            completed_attempts += 1;

            match outcome {
                AttemptOutcome::Completed(output) => {
                    self.append(EventKind::ActivityCompleted {
                        name: name.to_string(),
                        output: output.encode(),
                    });
                    return Ok(output);
                }
                AttemptOutcome::Cancelled => return Err(WorkflowError::Cancelled),
                AttemptOutcome::Failed(error) => {
                    if opts.retry.allows_retry(error.kind, completed_attempts) {
                        let delay = opts.retry.backoff_after(completed_attempts);
                        warn!(
                            activity = name,
                            attempt = completed_attempts,
                            error = %error,
                            delay_s = delay.as_secs_f64(),
                            "Activity attempt failed; backing off"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    warn!(
                        activity = name,
                        attempts = completed_attempts,
                        error = %error,
                        "Activity failed terminally"
                    );
                    self.append(EventKind::ActivityFailed {
                        name: name.to_string(),
                        kind: error.kind,
                        message: error.message.clone(),
                    });
                    return Err(WorkflowError::ActivityFailed {
                        name,
                        source: error,
                    });
                }
            }
        }
    }

    /// Suspend until a signal arrives or `timeout` elapses. Signals are
    /// durable: ones sent while the workflow was busy are already queued
    /// and are consumed here in arrival order.
    pub async fn next_signal<T: WireDecode>(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<T>, WorkflowError> {
        if self.is_replaying() {
            let event = self.next_recorded().expect("replaying implies an event");
            return match event.kind {
                EventKind::SignalReceived { payload } => decode_checked::<T>(&payload)
                    .map(Some)
                    .map_err(WorkflowError::BadSignal),
                EventKind::WaitTimedOut => Ok(None),
                other => Err(WorkflowError::HistoryMismatch {
                    seq: event.seq,
                    message: format!("expected a signal wait, found {other:?}"),
                }),
            };
        }

        let outcome = {
            let cancel = self.cancel.clone();
            tokio::select! {
                _ = cancel.cancelled() => WaitOutcome::Cancelled,
                payload = self.signals.recv() => {
                    WaitOutcome::Signal(payload.expect("runtime keeps a signal sender alive"))
                }
                _ = tokio::time::sleep(timeout) => WaitOutcome::TimedOut,
            }
        };

        match outcome {
            WaitOutcome::Cancelled => Err(WorkflowError::Cancelled),
            WaitOutcome::TimedOut => {
                self.append(EventKind::WaitTimedOut);
                Ok(None)
            }
            WaitOutcome::Signal(payload) => {
                let decoded = decode_checked::<T>(&payload).map_err(WorkflowError::BadSignal)?;
                self.append(EventKind::SignalReceived { payload });
                Ok(Some(decoded))
            }
        }
    }
}

async fn run_attempt<Out, Fut>(
    attempt: Fut,
    opts: &ActivityOptions,
    heartbeats: mpsc::UnboundedReceiver<()>,
    cancel: &CancellationToken,
) -> AttemptOutcome<Out>
where
    Fut: Future<Output = Result<Out, ActivityError>>,
{
    tokio::select! {
        _ = cancel.cancelled() => AttemptOutcome::Cancelled,
        _ = heartbeat_watchdog(opts.heartbeat_timeout, heartbeats) => {
            AttemptOutcome::Failed(ActivityError::timeout(format!(
                "no heartbeat within {:?}",
                opts.heartbeat_timeout.unwrap_or_default()
            )))
        }
        settled = tokio::time::timeout(opts.start_to_close_timeout, attempt) => match settled {
            Ok(Ok(output)) => AttemptOutcome::Completed(output),
            Ok(Err(error)) => AttemptOutcome::Failed(error),
            Err(_) => AttemptOutcome::Failed(ActivityError::timeout(format!(
                "attempt exceeded start-to-close timeout of {:?}",
                opts.start_to_close_timeout
            ))),
        },
    }
}

/// Resolves only if a heartbeat window elapses with no beat. Steps with
/// no heartbeat requirement never resolve here.
async fn heartbeat_watchdog(window: Option<Duration>, mut beats: mpsc::UnboundedReceiver<()>) {
    let Some(window) = window else {
        return std::future::pending().await;
    };
    loop {
        match tokio::time::timeout(window, beats.recv()).await {
            // Beat arrived: the window restarts.
            Ok(Some(())) => continue,
            // Activity dropped its context; let the attempt settle on
            // its own timeout instead.
            Ok(None) => return std::future::pending().await,
            // Window elapsed in silence: the attempt is stuck.
            Err(_) => return,
        }
    }
}
