use std::sync::Arc;

use strum::{Display, EnumString, IntoStaticStr};
use tracing::{debug, info, warn};

use crate::config;
use crate::domain::NonEmptyStr;
use crate::error::{DeskResult, WorkflowError};
use crate::runtime::WorkflowCtx;
use crate::workflow::activities::RfqActivities;
use crate::workflow::types::{
    BookingInput, BookingOutput, ClientAction, ClientResponse, ConfirmationInput, IndicativeInput,
    MappingOutput, PreTradeInput, PricingInput, PricingOutput, PricingResult, RfqInput, RfqResult,
    TermSheet,
};

/// Observable phases of a run, published through the `get_status` query.
#[derive(Copy, Clone, Debug, Display, EnumString, IntoStaticStr, PartialEq, Eq)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStatus {
    Received,
    Mapping,
    PreTradeChecks,
    Pricing,
    Quoting,
    AwaitingClient,
    Booking,
    Confirming,
    Completed,
}

/// Dispatch one activity through the workflow context, cloning the
/// activity set into the per-attempt future.
macro_rules! activity {
    ($ctx:expr, $acts:expr, $name:literal, $opts:expr, $input:expr, $method:ident) => {{
        let acts = Arc::clone(&$acts);
        $ctx.execute_activity($name, $opts, $input, move |input, actx| {
            let acts = Arc::clone(&acts);
            async move { acts.$method(input, actx).await }
        })
        .await
    }};
}

/// The durable RFQ state machine.
///
/// Sequence: map → check → (price → quote → await)* → book → confirm.
/// The quote loop repeats on client REFRESH, bounded by
/// [`config::MAX_REFRESHES`].
///
/// Invariants held by this engine:
/// - every run terminates in exactly one [`RfqOutcome`](crate::workflow::types::RfqOutcome);
/// - no trade books without every pre-trade check passing;
/// - no trade books without an explicit client ACCEPT whose hash matches
///   the live term sheet;
/// - the refresh loop is bounded;
/// - all state lives in the four fields below, mutated only between
///   suspension points, so the run replays deterministically.
///
/// This code must stay free of I/O, wall-clock reads, randomness, and
/// global state; those live in activities.
pub struct RfqWorkflow {
    status: WorkflowStatus,
    client_response: Option<ClientResponse>,
    current_pricing: Option<PricingResult>,
    current_term_sheet: Option<TermSheet>,
}

impl Default for RfqWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl RfqWorkflow {
    pub fn new() -> Self {
        Self {
            status: WorkflowStatus::Received,
            client_response: None,
            current_pricing: None,
            current_term_sheet: None,
        }
    }

    /// Current phase, mirrored to the `get_status` query channel.
    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    /// Most recent client signal applied to this run.
    pub fn client_response(&self) -> Option<&ClientResponse> {
        self.client_response.as_ref()
    }

    /// Latest successful pricing, mirrored to `get_current_pricing`.
    pub fn current_pricing(&self) -> Option<&PricingResult> {
        self.current_pricing.as_ref()
    }

    pub fn current_term_sheet(&self) -> Option<&TermSheet> {
        self.current_term_sheet.as_ref()
    }

    fn transition(&mut self, ctx: &WorkflowCtx, status: WorkflowStatus) {
        self.status = status;
        ctx.set_status(status.to_string());
        debug!(status = %status, "Workflow transition");
    }

    /// An activity that failed terminally resolves the RFQ as FAILED
    /// with a readable reason; runtime-level aborts propagate as errors.
    fn settle_failure(rfq_id: NonEmptyStr, err: WorkflowError) -> DeskResult<RfqResult> {
        match err {
            WorkflowError::ActivityFailed { .. } => Ok(RfqResult::failed(rfq_id, err.to_string())),
            other => Err(other.into()),
        }
    }

    /// Execute the full RFQ lifecycle.
    pub async fn run<A: RfqActivities>(
        mut self,
        ctx: &mut WorkflowCtx,
        activities: Arc<A>,
        rfq: RfqInput,
    ) -> DeskResult<RfqResult> {
        ctx.record_start(&rfq)?;
        let rfq_id = rfq.rfq_id().clone();
        info!(
            rfq_id = %rfq_id,
            instrument = %rfq.instrument_detail().kind(),
            notional = %rfq.notional(),
            side = %rfq.side(),
            "RFQ received"
        );

        // --- Step 1: map to product ---
        self.transition(ctx, WorkflowStatus::Mapping);
        let mapping = match activity!(
            ctx,
            activities,
            "map_to_cdm_product",
            &config::MAPPING,
            rfq.clone(),
            map_to_cdm_product
        ) {
            Ok(output) => output,
            Err(err) => return Self::settle_failure(rfq_id, err),
        };
        let product = match mapping {
            MappingOutput::Mapped(product) => product,
            MappingOutput::Error(reason) => {
                warn!(rfq_id = %rfq_id, reason = %reason, "Mapping refused the RFQ");
                return Ok(RfqResult::failed(rfq_id, reason));
            }
        };

        // --- Step 2: pre-trade checks ---
        self.transition(ctx, WorkflowStatus::PreTradeChecks);
        let checks = match activity!(
            ctx,
            activities,
            "run_pre_trade_checks",
            &config::PRE_TRADE,
            PreTradeInput::new(rfq.clone(), product.clone()),
            run_pre_trade_checks
        ) {
            Ok(result) => result,
            Err(err) => return Self::settle_failure(rfq_id, err),
        };
        if !checks.passed() {
            let reasons = checks.rejection_reasons();
            warn!(rfq_id = %rfq_id, ?reasons, "RFQ rejected pre-trade");
            return Ok(RfqResult::rejected_pre_trade(rfq_id, reasons));
        }

        // --- Steps 3-6: price / quote / await loop ---
        let mut refresh_count: u32 = 0;
        let (pricing, term_sheet) = loop {
            self.transition(ctx, WorkflowStatus::Pricing);
            let pricing_out = match activity!(
                ctx,
                activities,
                "price_product",
                &config::PRICING,
                PricingInput::new(rfq.clone(), product.clone()),
                price_product
            ) {
                Ok(output) => output,
                Err(err) => return Self::settle_failure(rfq_id, err),
            };
            let pricing = match pricing_out {
                PricingOutput::Priced(pricing) => pricing,
                PricingOutput::Error(reason) => {
                    return Ok(RfqResult::failed(rfq_id, format!("Pricing failed: {reason}")));
                }
            };
            self.current_pricing = Some(pricing.clone());
            ctx.publish_pricing(Some(pricing.clone()));

            self.transition(ctx, WorkflowStatus::Quoting);
            let term_sheet = match activity!(
                ctx,
                activities,
                "generate_and_send_indicative",
                &config::QUOTING,
                IndicativeInput::new(rfq.clone(), pricing.clone(), config::TERM_SHEET_VALID_FOR),
                generate_and_send_indicative
            ) {
                Ok(sheet) => sheet,
                Err(err) => return Self::settle_failure(rfq_id, err),
            };
            self.current_term_sheet = Some(term_sheet.clone());

            self.transition(ctx, WorkflowStatus::AwaitingClient);
            self.client_response = None;
            let response = match ctx
                .next_signal::<ClientResponse>(config::CLIENT_TIMEOUT)
                .await?
            {
                Some(response) => response,
                None => {
                    info!(rfq_id = %rfq_id, "Client window elapsed; quote expired");
                    return Ok(RfqResult::expired(
                        rfq_id,
                        vec![],
                        Some(pricing.pricing_attestation_id().clone()),
                    ));
                }
            };
            self.client_response = Some(response.clone());

            match response.action() {
                ClientAction::Reject => {
                    let reason = response.message().unwrap_or("Client rejected").to_string();
                    info!(rfq_id = %rfq_id, reason = %reason, "Client rejected the quote");
                    return Ok(RfqResult::rejected_by_client(
                        rfq_id,
                        reason,
                        Some(pricing.pricing_attestation_id().clone()),
                    ));
                }
                ClientAction::Refresh => {
                    refresh_count += 1;
                    if refresh_count > config::MAX_REFRESHES {
                        return Ok(RfqResult::expired(
                            rfq_id,
                            vec![format!(
                                "Exceeded {} price refreshes",
                                config::MAX_REFRESHES
                            )],
                            None,
                        ));
                    }
                    info!(rfq_id = %rfq_id, refresh_count, "Client requested a refreshed quote");
                    continue;
                }
                ClientAction::Accept => {
                    // Stale-acceptance guard: the acceptance binds to a
                    // specific document hash, which must be the live one.
                    let accepted_hash = response.term_sheet_hash().map(NonEmptyStr::as_str);
                    if accepted_hash != Some(term_sheet.document_hash().as_str()) {
                        warn!(
                            rfq_id = %rfq_id,
                            accepted = accepted_hash.unwrap_or("<none>"),
                            live = %term_sheet.document_hash(),
                            "Acceptance referenced a stale term sheet"
                        );
                        return Ok(RfqResult::failed(rfq_id, "Client accepted stale term sheet"));
                    }
                    break (pricing, term_sheet);
                }
            }
        };

        // --- Step 7: book the trade ---
        self.transition(ctx, WorkflowStatus::Booking);
        let booking = match activity!(
            ctx,
            activities,
            "book_trade",
            &config::BOOKING,
            BookingInput::new(
                rfq.clone(),
                product.clone(),
                pricing.clone(),
                pricing.indicative_price().clone(),
            ),
            book_trade
        ) {
            Ok(output) => output,
            Err(err) => return Self::settle_failure(rfq_id, err),
        };
        let booked = match booking {
            BookingOutput::Booked(result) => result,
            BookingOutput::Error(reason) => {
                return Ok(
                    RfqResult::failed(rfq_id, format!("Booking failed: {reason}"))
                        .with_attestation(pricing.pricing_attestation_id().clone()),
                );
            }
        };

        // --- Step 8: confirmation, best-effort at-least-once ---
        self.transition(ctx, WorkflowStatus::Confirming);
        match activity!(
            ctx,
            activities,
            "send_confirmation",
            &config::CONFIRMATION,
            ConfirmationInput::new(rfq.clone(), booked.clone(), term_sheet.clone()),
            send_confirmation
        ) {
            Ok(()) => {}
            Err(WorkflowError::ActivityFailed { source, .. }) => {
                // The booking stands; confirmation is idempotent by
                // trade_id and can be redelivered out of band.
                warn!(
                    rfq_id = %rfq_id,
                    error = %source,
                    "Confirmation delivery failed after retries"
                );
            }
            Err(other) => return Err(other.into()),
        }

        self.transition(ctx, WorkflowStatus::Completed);
        info!(rfq_id = %rfq_id, trade_id = %booked.trade_id(), "RFQ executed");
        Ok(RfqResult::executed(
            rfq_id,
            booked.trade_id().clone(),
            pricing.pricing_attestation_id().clone(),
        ))
    }
}
