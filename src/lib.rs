// === Public Modules (The Canonical Paths) ===
pub mod attestation;
pub mod codec;
pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod instrument;
pub mod reporting;
pub mod runtime;
pub mod workflow;

// === Private Implementation Details ===
mod macros;

// === Facades (Re-exporting internals) ===
// The error surface every fallible API in this crate speaks.
pub use crate::error::{DeskError, DeskResult};

// The pieces a worker host wires together.
pub use crate::workflow::engine::RfqWorkflow;
pub use crate::workflow::worker::{Worker, WorkerBuilder};
