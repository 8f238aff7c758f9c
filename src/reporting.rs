//! Regulatory reporting projections.
//!
//! Reporting is projection, not transformation: a report carries exactly
//! the fields of the canonical order it was projected from, reshaped to
//! the regime's schema. No new values are computed here.

pub mod emir;
pub mod mifid2;

pub use emir::{EmirTradeReport, project_emir_report};
pub use mifid2::{Mifid2Report, project_mifid2_report};
