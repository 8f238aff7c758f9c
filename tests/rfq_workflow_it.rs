//! End-to-end scenarios for the RFQ workflow, driven through the worker
//! and handle exactly as a client gateway would drive them.
//!
//! Tests run on tokio's paused clock, so the 24-hour client window and
//! the retry backoffs elapse instantly once every task is idle.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use dealdesk::Worker;
use dealdesk::error::{DeskError, WorkflowError};
use dealdesk::runtime::{History, SystemClock};
use dealdesk::workflow::activities::term_sheet_hash;
use dealdesk::workflow::types::{ClientResponse, RfqOutcome};

#[tokio::test(start_paused = true)]
async fn happy_path_executes_with_derived_trade_id() {
    init_tracing();
    let worker = desk_worker(FixedPricer { price: "42.50" });
    let handle = worker.submit(equity_rfq("RFQ-HAPPY")).unwrap();

    handle.wait_for_status("AWAITING_CLIENT").await.unwrap();
    assert_eq!(handle.query_status(), "AWAITING_CLIENT");

    // get_current_pricing during AWAITING_CLIENT is the last pricing output.
    let pricing = handle.query_current_pricing().expect("pricing published");
    assert_eq!(pricing.model_name().as_str(), "BlackScholes");
    assert_eq!(pricing, pricing_result("42.50"));

    let hash = term_sheet_hash(&nes("RFQ-HAPPY"), &pricing);
    handle
        .signal(&ClientResponse::accept(
            nes("RFQ-HAPPY"),
            ts("2025-06-15T12:30:00Z"),
            nes(&hash),
        ))
        .unwrap();

    let result = handle.result().await.unwrap();
    assert_eq!(result.outcome(), RfqOutcome::Executed);
    assert_eq!(result.trade_id().unwrap().as_str(), "TRADE-RFQ-HAPPY");
    assert_eq!(result.pricing_attestation_id().unwrap().as_str(), "att-001");
}

#[tokio::test(start_paused = true)]
async fn credit_breach_rejects_pre_trade() {
    init_tracing();
    // Desk credit line is 50m; ask for 60m.
    let worker = desk_worker(FixedPricer { price: "42.50" });
    let handle = worker
        .submit(equity_rfq_with_notional("RFQ-PRETRADE-FAIL", "60000000"))
        .unwrap();

    let result = handle.result().await.unwrap();
    assert_eq!(result.outcome(), RfqOutcome::RejectedPreTrade);
    assert!(
        result
            .rejection_reasons()
            .contains(&"Credit limit exceeded".to_string())
    );
    assert!(result.trade_id().is_none());
}

#[tokio::test(start_paused = true)]
async fn unmapped_product_fails() {
    init_tracing();
    // Only the equity mapper is registered; a futures RFQ has no mapper.
    let worker = desk_worker(FixedPricer { price: "42.50" });
    let handle = worker.submit(futures_rfq("RFQ-MAP-FAIL")).unwrap();

    let result = handle.result().await.unwrap();
    assert_eq!(result.outcome(), RfqOutcome::Failed);
    assert!(
        result
            .rejection_reasons()
            .iter()
            .any(|r| r.contains("Unsupported product type"))
    );
}

#[tokio::test(start_paused = true)]
async fn pricing_error_fails_with_reason() {
    init_tracing();
    let worker = desk_worker(FailingPricer {
        reason: "Calibration diverged",
    });
    let handle = worker.submit(equity_rfq("RFQ-PRICE-FAIL")).unwrap();

    let result = handle.result().await.unwrap();
    assert_eq!(result.outcome(), RfqOutcome::Failed);
    assert!(
        result
            .rejection_reasons()
            .iter()
            .any(|r| r.contains("Pricing failed"))
    );
    assert!(
        result
            .rejection_reasons()
            .iter()
            .any(|r| r.contains("Calibration diverged"))
    );
}

#[tokio::test(start_paused = true)]
async fn client_rejection_carries_message() {
    init_tracing();
    let worker = desk_worker(FixedPricer { price: "42.50" });
    let handle = worker.submit(equity_rfq("RFQ-REJECT")).unwrap();

    handle.wait_for_status("AWAITING_CLIENT").await.unwrap();
    handle
        .signal(&ClientResponse::reject(
            nes("RFQ-REJECT"),
            ts("2025-06-15T12:30:00Z"),
            Some("Too expensive".to_string()),
        ))
        .unwrap();

    let result = handle.result().await.unwrap();
    assert_eq!(result.outcome(), RfqOutcome::RejectedByClient);
    assert_eq!(result.rejection_reasons(), ["Too expensive".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn refresh_reprices_then_accept_executes() {
    init_tracing();
    let worker = desk_worker(SteppingPricer::new(42));
    let handle = worker.submit(equity_rfq("RFQ-REFRESH")).unwrap();

    handle.wait_for_status("AWAITING_CLIENT").await.unwrap();
    let first = handle.query_current_pricing().unwrap();
    assert_eq!(first.indicative_price().amount(), dec("42.00"));

    handle
        .signal(&ClientResponse::refresh(
            nes("RFQ-REFRESH"),
            ts("2025-06-15T12:30:00Z"),
        ))
        .unwrap();

    // Second round: wait until the refreshed price is live.
    loop {
        if let Some(pricing) = handle.query_current_pricing()
            && pricing.indicative_price().amount() == dec("43.00")
        {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    let second = handle.query_current_pricing().unwrap();

    let hash = term_sheet_hash(&nes("RFQ-REFRESH"), &second);
    handle
        .signal(&ClientResponse::accept(
            nes("RFQ-REFRESH"),
            ts("2025-06-15T13:00:00Z"),
            nes(&hash),
        ))
        .unwrap();

    let result = handle.result().await.unwrap();
    assert_eq!(result.outcome(), RfqOutcome::Executed);
}

#[tokio::test(start_paused = true)]
async fn stale_acceptance_fails() {
    init_tracing();
    let worker = desk_worker(FixedPricer { price: "42.50" });
    let handle = worker.submit(equity_rfq("RFQ-STALE")).unwrap();

    handle.wait_for_status("AWAITING_CLIENT").await.unwrap();
    handle
        .signal(&ClientResponse::accept(
            nes("RFQ-STALE"),
            ts("2025-06-15T12:30:00Z"),
            nes("wrong-hash"),
        ))
        .unwrap();

    let result = handle.result().await.unwrap();
    assert_eq!(result.outcome(), RfqOutcome::Failed);
    assert!(
        result
            .rejection_reasons()
            .iter()
            .any(|r| r.to_lowercase().contains("stale"))
    );
    assert!(result.trade_id().is_none());
}

#[tokio::test(start_paused = true)]
async fn booking_conflict_fails_after_acceptance() {
    init_tracing();
    let activities = MockActivities {
        booking_error: Some("Ledger conflict"),
        ..MockActivities::default()
    };
    let worker = Worker::with_activities(
        activities,
        Arc::new(SystemClock),
        "test-rfq".to_string(),
    );
    let handle = worker.submit(equity_rfq("RFQ-BOOK-FAIL")).unwrap();

    handle.wait_for_status("AWAITING_CLIENT").await.unwrap();
    let pricing = handle.query_current_pricing().unwrap();
    let hash = term_sheet_hash(&nes("RFQ-BOOK-FAIL"), &pricing);
    handle
        .signal(&ClientResponse::accept(
            nes("RFQ-BOOK-FAIL"),
            ts("2025-06-15T12:30:00Z"),
            nes(&hash),
        ))
        .unwrap();

    let result = handle.result().await.unwrap();
    assert_eq!(result.outcome(), RfqOutcome::Failed);
    assert!(
        result
            .rejection_reasons()
            .iter()
            .any(|r| r.contains("Booking failed"))
    );
    assert!(result.trade_id().is_none());
    // The pricing that backed the failed booking stays attributable.
    assert_eq!(result.pricing_attestation_id().unwrap().as_str(), "att-001");
}

#[tokio::test(start_paused = true)]
async fn silent_client_expires_after_24h() {
    init_tracing();
    let worker = desk_worker(FixedPricer { price: "42.50" });
    let handle = worker.submit(equity_rfq("RFQ-SILENT")).unwrap();

    // Nobody answers; the paused clock fast-forwards the 24h window.
    let result = handle.result().await.unwrap();
    assert_eq!(result.outcome(), RfqOutcome::Expired);
    assert_eq!(result.pricing_attestation_id().unwrap().as_str(), "att-001");
    assert!(result.trade_id().is_none());
}

#[tokio::test(start_paused = true)]
async fn sixth_refresh_expires_the_rfq() {
    init_tracing();
    let worker = desk_worker(SteppingPricer::new(42));
    let handle = worker.submit(equity_rfq("RFQ-CHURN")).unwrap();

    // Signals are durable and applied in arrival order: queue six
    // refreshes up front, one per quote round.
    for _ in 0..6 {
        handle
            .signal(&ClientResponse::refresh(
                nes("RFQ-CHURN"),
                ts("2025-06-15T12:30:00Z"),
            ))
            .unwrap();
    }

    let result = handle.result().await.unwrap();
    assert_eq!(result.outcome(), RfqOutcome::Expired);
    assert!(
        result
            .rejection_reasons()
            .contains(&"Exceeded 5 price refreshes".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn stuck_pricer_times_out_on_missed_heartbeats() {
    init_tracing();
    let activities = MockActivities {
        pricing_hangs: true,
        ..MockActivities::default()
    };
    let worker = Worker::with_activities(
        activities,
        Arc::new(SystemClock),
        "test-rfq".to_string(),
    );
    let handle = worker.submit(equity_rfq("RFQ-STUCK")).unwrap();

    let result = handle.result().await.unwrap();
    assert_eq!(result.outcome(), RfqOutcome::Failed);
    assert!(
        result
            .rejection_reasons()
            .iter()
            .any(|r| r.contains("Timeout"))
    );
}

#[tokio::test(start_paused = true)]
async fn confirmation_outage_does_not_unwind_the_trade() {
    init_tracing();
    let worker = Worker::with_activities(
        MockActivities {
            confirmation_fails: true,
            ..MockActivities::default()
        },
        Arc::new(SystemClock),
        "test-rfq".to_string(),
    );
    let handle = worker.submit(equity_rfq("RFQ-CONFIRM-DOWN")).unwrap();

    handle.wait_for_status("AWAITING_CLIENT").await.unwrap();
    let pricing = handle.query_current_pricing().unwrap();
    let hash = term_sheet_hash(&nes("RFQ-CONFIRM-DOWN"), &pricing);
    handle
        .signal(&ClientResponse::accept(
            nes("RFQ-CONFIRM-DOWN"),
            ts("2025-06-15T12:30:00Z"),
            nes(&hash),
        ))
        .unwrap();

    // Delivery exhausts its 5 attempts; the executed trade stands.
    let result = handle.result().await.unwrap();
    assert_eq!(result.outcome(), RfqOutcome::Executed);
    assert_eq!(result.trade_id().unwrap().as_str(), "TRADE-RFQ-CONFIRM-DOWN");
}

#[tokio::test(start_paused = true)]
async fn duplicate_submission_is_refused_while_running() {
    init_tracing();
    let worker = desk_worker(FixedPricer { price: "42.50" });
    let handle = worker.submit(equity_rfq("RFQ-DUP")).unwrap();
    handle.wait_for_status("AWAITING_CLIENT").await.unwrap();
    assert!(worker.is_running("RFQ-DUP"));

    let err = worker.submit(equity_rfq("RFQ-DUP")).unwrap_err();
    assert!(matches!(
        err,
        DeskError::Workflow(WorkflowError::AlreadyRunning(ref id)) if id == "RFQ-DUP"
    ));

    handle
        .signal(&ClientResponse::reject(
            nes("RFQ-DUP"),
            ts("2025-06-15T12:30:00Z"),
            None,
        ))
        .unwrap();
    let result = handle.result().await.unwrap();
    assert_eq!(result.outcome(), RfqOutcome::RejectedByClient);
    assert_eq!(result.rejection_reasons(), ["Client rejected".to_string()]);

    // The id frees up once the first run resolves.
    assert!(!worker.is_running("RFQ-DUP"));
    let second = worker.submit(equity_rfq("RFQ-DUP")).unwrap();
    second.cancel();
    assert!(matches!(
        second.result().await.unwrap_err(),
        DeskError::Workflow(WorkflowError::Cancelled)
    ));
}

#[tokio::test(start_paused = true)]
async fn replay_resolves_from_history_without_activities() -> anyhow::Result<()> {
    init_tracing();
    // Live run with real activities.
    let worker = desk_worker(FixedPricer { price: "42.50" });
    let handle = worker.submit(equity_rfq("RFQ-REPLAY"))?;
    handle.wait_for_status("AWAITING_CLIENT").await?;
    let pricing = handle.query_current_pricing().expect("pricing published");
    let hash = term_sheet_hash(&nes("RFQ-REPLAY"), &pricing);
    handle.signal(&ClientResponse::accept(
        nes("RFQ-REPLAY"),
        ts("2025-06-15T12:30:00Z"),
        nes(&hash),
    ))?;
    let live = handle.result().await?;

    // Persist and reload the settled log as a durable store would.
    let settled = worker.history("RFQ-REPLAY").expect("retained history");
    let persisted = settled.encode().to_string();
    let reloaded = History::decode(&serde_json::from_str(&persisted)?)?;

    // Replay against activities that panic if invoked: every step must
    // resolve from the log alone.
    let replay_worker = Worker::with_activities(
        PanickingActivities,
        Arc::new(SystemClock),
        "test-rfq".to_string(),
    );
    let replay_handle = replay_worker.resume(reloaded)?;
    let replayed = replay_handle.result().await?;

    assert_eq!(replayed, live);
    assert_eq!(replayed.outcome(), RfqOutcome::Executed);
    Ok(())
}
