use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::codec::decode_checked;
use crate::config;
use crate::error::{DeskResult, WorkflowError};
use crate::instrument::InstrumentDetail;
use crate::runtime::{
    History, SystemClock, WorkflowClock, WorkflowCtx, WorkflowHandle,
};
use crate::workflow::activities::{DeskActivities, RfqActivities};
use crate::workflow::engine::{RfqWorkflow, WorkflowStatus};
use crate::workflow::registries::{
    PreTradeCheck, PreTradeCheckRegistry, Pricer, PricingRegistry, ProductMapper,
    ProductMapperRegistry,
};
use crate::workflow::types::RfqInput;

/// Assembles the registries and clock into a runnable [`Worker`].
///
/// Registration happens here, during init, and nowhere else: `build`
/// moves the registries behind `Arc`, after which they are read-only for
/// the life of the process.
pub struct WorkerBuilder {
    clock: Arc<dyn WorkflowClock>,
    task_queue: String,
    mappers: ProductMapperRegistry,
    checks: PreTradeCheckRegistry,
    pricers: PricingRegistry,
}

impl Default for WorkerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerBuilder {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            task_queue: config::TASK_QUEUE.to_string(),
            mappers: ProductMapperRegistry::new(),
            checks: PreTradeCheckRegistry::new(),
            pricers: PricingRegistry::new(),
        }
    }

    pub fn with_clock(mut self, clock: impl WorkflowClock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_task_queue(mut self, task_queue: impl Into<String>) -> Self {
        self.task_queue = task_queue.into();
        self
    }

    pub fn register_mapper(
        mut self,
        qualifier: impl Fn(&InstrumentDetail) -> bool + Send + Sync + 'static,
        mapper: impl ProductMapper + 'static,
    ) -> Self {
        self.mappers.register(qualifier, mapper);
        self
    }

    pub fn register_check(mut self, check: impl PreTradeCheck + 'static) -> Self {
        self.checks.register(check);
        self
    }

    pub fn register_pricer(
        mut self,
        qualifier: impl Fn(&InstrumentDetail) -> bool + Send + Sync + 'static,
        pricer: impl Pricer + 'static,
    ) -> Self {
        self.pricers.register(qualifier, pricer);
        self
    }

    pub fn build(self) -> Worker<DeskActivities> {
        let activities = DeskActivities::new(
            Arc::new(self.mappers),
            Arc::new(self.checks),
            Arc::new(self.pricers),
        );
        Worker::with_activities(activities, self.clock, self.task_queue)
    }
}

/// Hosts RFQ workflow runs: one task per RFQ, addressed by `rfq_id`.
///
/// The worker is the scoped resource at the desk boundary: create it at
/// startup, [`Worker::shutdown`] cancels every in-flight run and their
/// activities on the way out.
pub struct Worker<A: RfqActivities> {
    activities: Arc<A>,
    clock: Arc<dyn WorkflowClock>,
    task_queue: String,
    running: Arc<Mutex<HashSet<String>>>,
    // The worker is the durable store: histories survive run completion
    // so crashed or finished runs can be inspected and replayed.
    histories: Arc<Mutex<HashMap<String, Arc<Mutex<History>>>>>,
    shutdown: CancellationToken,
}

impl<A: RfqActivities> Worker<A> {
    pub fn with_activities(
        activities: A,
        clock: Arc<dyn WorkflowClock>,
        task_queue: String,
    ) -> Self {
        Self {
            activities: Arc::new(activities),
            clock,
            task_queue,
            running: Arc::new(Mutex::new(HashSet::new())),
            histories: Arc::new(Mutex::new(HashMap::new())),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn task_queue(&self) -> &str {
        &self.task_queue
    }

    /// Start a fresh workflow run. The `rfq_id` is the workflow id: a
    /// second submission while the first run is live is refused, which
    /// is what makes client resubmission idempotent.
    pub fn submit(&self, rfq: RfqInput) -> DeskResult<WorkflowHandle> {
        self.start(rfq, History::new())
    }

    /// Resume a run from its recorded history. The input is decoded from
    /// the history's own start event; completed steps replay from the
    /// log without re-executing their activities.
    pub fn resume(&self, history: History) -> DeskResult<WorkflowHandle> {
        let input = history
            .start_input()
            .ok_or(WorkflowError::HistoryMismatch {
                seq: 0,
                message: "history has no WorkflowStarted event".to_string(),
            })?;
        let rfq: RfqInput = decode_checked(input)?;
        self.start(rfq, history)
    }

    pub fn is_running(&self, rfq_id: &str) -> bool {
        self.running.lock().expect("running set lock").contains(rfq_id)
    }

    /// Point-in-time copy of a run's event history, live or completed.
    pub fn history(&self, rfq_id: &str) -> Option<History> {
        self.histories
            .lock()
            .expect("history store lock")
            .get(rfq_id)
            .map(|shared| shared.lock().expect("history lock").clone())
    }

    /// Cancel every in-flight run; cancellation propagates into their
    /// activities via the shared token.
    pub fn shutdown(&self) {
        info!(task_queue = %self.task_queue, "Worker shutting down");
        self.shutdown.cancel();
    }

    fn start(&self, rfq: RfqInput, history: History) -> DeskResult<WorkflowHandle> {
        let id = rfq.rfq_id().as_str().to_string();
        {
            let mut running = self.running.lock().expect("running set lock");
            if !running.insert(id.clone()) {
                return Err(WorkflowError::AlreadyRunning(id).into());
            }
        }

        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(WorkflowStatus::Received.to_string());
        let (pricing_tx, pricing_rx) = watch::channel(None);
        let cancel = self.shutdown.child_token();

        let mut ctx = WorkflowCtx::new(
            Arc::clone(&self.clock),
            history,
            signal_rx,
            signal_tx.clone(),
            status_tx,
            pricing_tx,
            cancel.clone(),
        );
        let history_handle = ctx.history_handle();
        self.histories
            .lock()
            .expect("history store lock")
            .insert(id.clone(), Arc::clone(&history_handle));

        let activities = Arc::clone(&self.activities);
        let running = Arc::clone(&self.running);
        let task_id = id.clone();
        let join = tokio::spawn(async move {
            let result = RfqWorkflow::new().run(&mut ctx, activities, rfq).await;
            running.lock().expect("running set lock").remove(&task_id);
            result
        });

        Ok(WorkflowHandle::new(
            id,
            signal_tx,
            status_rx,
            pricing_rx,
            cancel,
            history_handle,
            join,
        ))
    }
}
