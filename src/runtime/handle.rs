use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::codec::WireEncode;
use crate::error::{DeskResult, WorkflowError};
use crate::workflow::types::{ClientResponse, PricingResult, RfqResult};

use super::history::History;

/// Client-side view of one running RFQ workflow: the signal channel, the
/// two query channels, cancellation, and the final result.
///
/// Queries are pure reads of the latest published snapshot; they never
/// touch workflow state and never block on it.
#[derive(Debug)]
pub struct WorkflowHandle {
    rfq_id: String,
    signal_tx: mpsc::UnboundedSender<Value>,
    status_rx: watch::Receiver<String>,
    pricing_rx: watch::Receiver<Option<PricingResult>>,
    cancel: CancellationToken,
    history: Arc<Mutex<History>>,
    join: JoinHandle<DeskResult<RfqResult>>,
}

impl WorkflowHandle {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        rfq_id: String,
        signal_tx: mpsc::UnboundedSender<Value>,
        status_rx: watch::Receiver<String>,
        pricing_rx: watch::Receiver<Option<PricingResult>>,
        cancel: CancellationToken,
        history: Arc<Mutex<History>>,
        join: JoinHandle<DeskResult<RfqResult>>,
    ) -> Self {
        Self {
            rfq_id,
            signal_tx,
            status_rx,
            pricing_rx,
            cancel,
            history,
            join,
        }
    }

    pub fn rfq_id(&self) -> &str {
        &self.rfq_id
    }

    /// Deliver a `client_responds` signal. The payload crosses the wire
    /// boundary encoded, exactly as it would from a remote client, and
    /// is queued until the workflow's next suspension point.
    pub fn signal(&self, response: &ClientResponse) -> DeskResult<()> {
        self.signal_tx
            .send(response.encode())
            .map_err(|_| WorkflowError::Finished(self.rfq_id.clone()).into())
    }

    /// `get_status` query: the current workflow phase.
    pub fn query_status(&self) -> String {
        self.status_rx.borrow().clone()
    }

    /// `get_current_pricing` query: the latest successful pricing, if
    /// any round has priced yet.
    pub fn query_current_pricing(&self) -> Option<PricingResult> {
        self.pricing_rx.borrow().clone()
    }

    /// Suspend the caller until the workflow publishes `target` as its
    /// status. Errors if the run ends without ever reaching it.
    pub async fn wait_for_status(&self, target: &str) -> DeskResult<()> {
        let mut rx = self.status_rx.clone();
        rx.wait_for(|status| status.as_str() == target)
            .await
            .map(|_| ())
            .map_err(|_| WorkflowError::Finished(self.rfq_id.clone()).into())
    }

    /// Request cancellation; propagates to any in-flight activity.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Snapshot of the durable event history recorded so far.
    pub fn history_snapshot(&self) -> History {
        self.history.lock().expect("history lock").clone()
    }

    /// Await the terminal outcome.
    pub async fn result(self) -> DeskResult<RfqResult> {
        match self.join.await {
            Ok(result) => result,
            Err(_) => Err(WorkflowError::StateInvariant("workflow task panicked").into()),
        }
    }
}
