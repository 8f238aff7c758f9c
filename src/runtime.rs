//! Durable-execution substrate for the RFQ workflow.
//!
//! The engine in [`crate::workflow::engine`] is written against this
//! module's guarantees:
//!
//! - Workflow code suspends only inside [`context::WorkflowCtx`] calls
//!   (activity execution, signal waits). Between suspensions it runs to
//!   completion, so signals never interrupt synchronous logic.
//! - Every suspension appends a [`history::HistoryEvent`]. Re-running the
//!   workflow over a recorded history consumes events instead of
//!   executing effects, which is what makes a crashed run resumable —
//!   and what makes determinism mandatory in workflow code.
//! - Wall-clock reads happen here, never in the workflow: the logical
//!   clock replays the recorded timestamps.

pub mod clock;
pub mod context;
pub mod handle;
pub mod history;
pub mod retry;

pub use clock::{FixedClock, SystemClock, WorkflowClock};
pub use context::{ActivityContext, WorkflowCtx};
pub use handle::WorkflowHandle;
pub use history::{EventKind, History, HistoryEvent};
pub use retry::{ActivityOptions, RetryPolicy};
