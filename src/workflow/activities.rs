use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;

use crate::codec;
use crate::domain::{NonEmptyStr, UtcDatetime};
use crate::error::{ActivityError, ErrorKind};
use crate::instrument::{
    EconomicTerms, EquityPayoutSpec, InstrumentDetail, InstrumentKind, PayoutSpec, PositionStatus,
    Product,
};
use crate::runtime::ActivityContext;
use crate::workflow::registries::{
    PreTradeCheck, PreTradeCheckRegistry, PricingRegistry, ProductMapper, ProductMapperRegistry,
};
use crate::workflow::types::{
    BookingInput, BookingOutput, BookingResult, CheckReport, ConfirmationInput, IndicativeInput,
    MappingOutput, PreTradeCheckResult, PreTradeInput, PricingInput, PricingOutput, PricingResult,
    RfqInput, TermSheet,
};

/// The six activities the RFQ workflow sequences.
///
/// Activities run on the non-deterministic side of the fence: they may
/// read the wall clock and do I/O. Each takes one immutable input record,
/// returns one immutable output record, and is idempotent — side effects
/// deduplicate on a natural key (`rfq_id`, `document_hash`, `trade_id`).
pub trait RfqActivities: Send + Sync + 'static {
    fn map_to_cdm_product(
        &self,
        rfq: RfqInput,
        ctx: ActivityContext,
    ) -> impl Future<Output = Result<MappingOutput, ActivityError>> + Send;

    fn run_pre_trade_checks(
        &self,
        input: PreTradeInput,
        ctx: ActivityContext,
    ) -> impl Future<Output = Result<PreTradeCheckResult, ActivityError>> + Send;

    fn price_product(
        &self,
        input: PricingInput,
        ctx: ActivityContext,
    ) -> impl Future<Output = Result<PricingOutput, ActivityError>> + Send;

    fn generate_and_send_indicative(
        &self,
        input: IndicativeInput,
        ctx: ActivityContext,
    ) -> impl Future<Output = Result<TermSheet, ActivityError>> + Send;

    fn book_trade(
        &self,
        input: BookingInput,
        ctx: ActivityContext,
    ) -> impl Future<Output = Result<BookingOutput, ActivityError>> + Send;

    fn send_confirmation(
        &self,
        input: ConfirmationInput,
        ctx: ActivityContext,
    ) -> impl Future<Output = Result<(), ActivityError>> + Send;
}

/// Canonical document hash of an indicative term sheet: SHA-256 over the
/// key pricing fields rendered as canonical JSON (sorted keys). A client
/// acceptance echoes this digest back, which is what the stale-acceptance
/// guard compares against.
pub fn term_sheet_hash(rfq_id: &NonEmptyStr, pricing: &PricingResult) -> String {
    let content = json!({
        "rfq_id": rfq_id.as_str(),
        "price": pricing.indicative_price().amount().to_string(),
        "currency": pricing.indicative_price().currency().as_str(),
        "model": pricing.model_name().as_str(),
        "snapshot": pricing.market_data_snapshot_id().as_str(),
    });
    codec::content_hash(&content)
}

/// Registry-driven reference implementation of the activity set.
///
/// All domain logic lives in the registries; these methods are thin
/// orchestration shims around them.
pub struct DeskActivities {
    mappers: Arc<ProductMapperRegistry>,
    checks: Arc<PreTradeCheckRegistry>,
    pricers: Arc<PricingRegistry>,
}

impl DeskActivities {
    pub fn new(
        mappers: Arc<ProductMapperRegistry>,
        checks: Arc<PreTradeCheckRegistry>,
        pricers: Arc<PricingRegistry>,
    ) -> Self {
        Self {
            mappers,
            checks,
            pricers,
        }
    }
}

impl RfqActivities for DeskActivities {
    async fn map_to_cdm_product(
        &self,
        rfq: RfqInput,
        _ctx: ActivityContext,
    ) -> Result<MappingOutput, ActivityError> {
        info!(rfq_id = %rfq.rfq_id(), kind = %rfq.instrument_detail().kind(), "Mapping RFQ to product");
        match self.mappers.resolve(rfq.instrument_detail()) {
            None => Ok(MappingOutput::err(format!(
                "Unsupported product type: {}",
                rfq.instrument_detail().kind()
            ))),
            Some(mapper) => match mapper.map(&rfq) {
                Ok(product) => Ok(MappingOutput::ok(product)),
                Err(reason) => Ok(MappingOutput::err(reason)),
            },
        }
    }

    async fn run_pre_trade_checks(
        &self,
        input: PreTradeInput,
        _ctx: ActivityContext,
    ) -> Result<PreTradeCheckResult, ActivityError> {
        info!(rfq_id = %input.rfq().rfq_id(), checks = self.checks.len(), "Running pre-trade checks");
        let mut reports = Vec::with_capacity(self.checks.len());
        for check in self.checks.checks() {
            let name = NonEmptyStr::parse(check.name())
                .map_err(|e| ActivityError::new(ErrorKind::Validation, e.to_string()))?;
            let report = match check.run(input.rfq(), input.product()) {
                Ok(()) => CheckReport::passed(name),
                Err(reason) => CheckReport::failed(name, reason),
            };
            reports.push(report);
        }
        Ok(PreTradeCheckResult::new(reports))
    }

    async fn price_product(
        &self,
        input: PricingInput,
        ctx: ActivityContext,
    ) -> Result<PricingOutput, ActivityError> {
        info!(rfq_id = %input.rfq().rfq_id(), "Pricing RFQ");
        ctx.heartbeat();
        match self.pricers.resolve(input.rfq().instrument_detail()) {
            None => Ok(PricingOutput::err(
                "No pricer registered for this product type",
            )),
            Some(pricer) => match pricer.price(&input) {
                Ok(result) => Ok(PricingOutput::ok(result)),
                Err(reason) => Ok(PricingOutput::err(reason)),
            },
        }
    }

    async fn generate_and_send_indicative(
        &self,
        input: IndicativeInput,
        _ctx: ActivityContext,
    ) -> Result<TermSheet, ActivityError> {
        let generated_at = UtcDatetime::now();
        let valid_for = chrono::Duration::from_std(input.valid_for())
            .map_err(|e| ActivityError::new(ErrorKind::Validation, e.to_string()))?;
        let valid_until = UtcDatetime::new(generated_at.value() + valid_for);

        let digest = term_sheet_hash(input.rfq().rfq_id(), input.pricing());
        let document_hash = NonEmptyStr::parse(&digest)
            .map_err(|e| ActivityError::new(ErrorKind::Validation, e.to_string()))?;
        let sheet = TermSheet::new(
            input.rfq().rfq_id().clone(),
            input.pricing().clone(),
            document_hash,
            valid_until,
            generated_at,
        )
        .map_err(|e| ActivityError::new(ErrorKind::Validation, e.to_string()))?;

        // Delivery transport is injected at the desk boundary; issuance
        // is deduplicated by (rfq_id, document_hash).
        info!(
            rfq_id = %input.rfq().rfq_id(),
            document_hash = %sheet.document_hash(),
            valid_until = %sheet.valid_until(),
            "Issued indicative term sheet"
        );
        Ok(sheet)
    }

    async fn book_trade(
        &self,
        input: BookingInput,
        _ctx: ActivityContext,
    ) -> Result<BookingOutput, ActivityError> {
        // Contract formation drives the position lifecycle; a desk that
        // re-books a formed trade gets refused here, non-retryably.
        let status = PositionStatus::Proposed
            .transition(PositionStatus::Formed)
            .map_err(|e| ActivityError::new(ErrorKind::IllegalTransition, e))?;

        // rfq_id is the idempotency key: re-booking the same RFQ yields
        // the same trade id, so a retried attempt cannot double-book.
        let trade_id = NonEmptyStr::parse(&format!("TRADE-{}", input.rfq().rfq_id()))
            .map_err(|e| ActivityError::new(ErrorKind::Validation, e.to_string()))?;
        info!(
            rfq_id = %input.rfq().rfq_id(),
            trade_id = %trade_id,
            price = %input.accepted_price(),
            status = %status,
            "Booking trade"
        );
        Ok(BookingOutput::ok(BookingResult::new(trade_id)))
    }

    async fn send_confirmation(
        &self,
        input: ConfirmationInput,
        _ctx: ActivityContext,
    ) -> Result<(), ActivityError> {
        info!(
            trade_id = %input.trade_result().trade_id(),
            rfq_id = %input.rfq().rfq_id(),
            "Sending trade confirmation"
        );
        Ok(())
    }
}

// ================================================================================================
// Stock Checks & Mappers
// ================================================================================================

/// Fails when the underlying appears on the restricted list.
pub struct RestrictedUnderlyingCheck {
    restricted: HashSet<String>,
}

impl RestrictedUnderlyingCheck {
    pub fn new(restricted: impl IntoIterator<Item = String>) -> Self {
        Self {
            restricted: restricted.into_iter().collect(),
        }
    }
}

impl PreTradeCheck for RestrictedUnderlyingCheck {
    fn name(&self) -> &str {
        "restricted_underlying"
    }

    fn run(&self, rfq: &RfqInput, _product: &Product) -> Result<(), String> {
        match rfq.instrument_detail().underlying_id() {
            Some(underlying) if self.restricted.contains(underlying.as_str()) => {
                Err("Underlying on restricted list".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// Fails when the notional exceeds the client's credit line.
pub struct CreditLimitCheck {
    max_notional: Decimal,
}

impl CreditLimitCheck {
    pub fn new(max_notional: Decimal) -> Self {
        Self { max_notional }
    }
}

impl PreTradeCheck for CreditLimitCheck {
    fn name(&self) -> &str {
        "credit_limit"
    }

    fn run(&self, rfq: &RfqInput, _product: &Product) -> Result<(), String> {
        if rfq.notional().value() > self.max_notional {
            Err("Credit limit exceeded".to_string())
        } else {
            Ok(())
        }
    }
}

/// Fails when the client is not cleared for this product family.
pub struct EligibilityCheck {
    eligible: HashSet<InstrumentKind>,
}

impl EligibilityCheck {
    pub fn new(eligible: impl IntoIterator<Item = InstrumentKind>) -> Self {
        Self {
            eligible: eligible.into_iter().collect(),
        }
    }
}

impl PreTradeCheck for EligibilityCheck {
    fn name(&self) -> &str {
        "eligibility"
    }

    fn run(&self, rfq: &RfqInput, _product: &Product) -> Result<(), String> {
        if self.eligible.contains(&rfq.instrument_detail().kind()) {
            Ok(())
        } else {
            Err("Client not eligible for this product type".to_string())
        }
    }
}

/// Maps cash-equity RFQs onto a single-payout product.
pub struct EquityProductMapper {
    exchange: String,
}

impl EquityProductMapper {
    pub fn new(exchange: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
        }
    }
}

/// Qualifier for [`EquityProductMapper`].
pub fn is_equity(detail: &InstrumentDetail) -> bool {
    detail.kind() == InstrumentKind::Equity
}

impl ProductMapper for EquityProductMapper {
    fn map(&self, rfq: &RfqInput) -> Result<Product, String> {
        let InstrumentDetail::Equity(detail) = rfq.instrument_detail() else {
            return Err(format!(
                "EquityProductMapper cannot map {} instruments",
                rfq.instrument_detail().kind()
            ));
        };
        let payout = EquityPayoutSpec::create(
            detail.underlying_id().as_str(),
            rfq.currency().as_str(),
            &self.exchange,
        )
        .map_err(|e| e.to_string())?;
        let terms = EconomicTerms::new(
            vec![PayoutSpec::Equity(payout)],
            rfq.trade_date(),
            None,
        )
        .map_err(|e| e.to_string())?;
        Ok(Product::new(terms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attestation::Confidence;
    use crate::domain::{CurrencyCode, FrozenMap, Lei, Money, PositiveDecimal};
    use crate::gateway::OrderSide;
    use crate::instrument::EquityDetail;
    use crate::workflow::types::PricingResult;
    use chrono::NaiveDate;

    fn nes(s: &str) -> NonEmptyStr {
        NonEmptyStr::parse(s).unwrap()
    }

    fn rfq(underlying: &str, notional: &str) -> RfqInput {
        RfqInput::new(
            nes("RFQ-ACT"),
            Lei::parse("529900T8BM49AURSDO55").unwrap(),
            InstrumentDetail::Equity(EquityDetail::new(nes(underlying))),
            PositiveDecimal::parse(notional.parse().unwrap()).unwrap(),
            CurrencyCode::parse("USD").unwrap(),
            OrderSide::Buy,
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 17).unwrap(),
            UtcDatetime::parse("2025-06-15T12:00:00Z").unwrap(),
        )
        .unwrap()
    }

    fn pricing(price: &str) -> PricingResult {
        PricingResult::new(
            Money::new(price.parse().unwrap(), "USD").unwrap(),
            FrozenMap::empty(),
            nes("BlackScholes"),
            nes("snap-001"),
            Confidence::Firm {
                source: nes("TEST"),
                attestation_ref: nes("att-0"),
            },
            nes("att-001"),
            UtcDatetime::parse("2025-06-15T12:00:00Z").unwrap(),
        )
    }

    #[test]
    fn term_sheet_hash_is_deterministic_and_price_sensitive() {
        let first = term_sheet_hash(&nes("RFQ-ACT"), &pricing("42.50"));
        let second = term_sheet_hash(&nes("RFQ-ACT"), &pricing("42.50"));
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);

        let repriced = term_sheet_hash(&nes("RFQ-ACT"), &pricing("43.00"));
        assert_ne!(first, repriced);
    }

    #[test]
    fn stock_checks_emit_their_contracted_reasons() {
        let product = EquityProductMapper::new("XNAS").map(&rfq("NVDA", "100")).unwrap();

        let restricted = RestrictedUnderlyingCheck::new(["NVDA".to_string()]);
        assert_eq!(
            restricted.run(&rfq("NVDA", "100"), &product).unwrap_err(),
            "Underlying on restricted list"
        );
        assert!(restricted.run(&rfq("AAPL", "100"), &product).is_ok());

        let credit = CreditLimitCheck::new("1000".parse().unwrap());
        assert_eq!(
            credit.run(&rfq("NVDA", "5000"), &product).unwrap_err(),
            "Credit limit exceeded"
        );
        assert!(credit.run(&rfq("NVDA", "1000"), &product).is_ok());

        let eligibility = EligibilityCheck::new([InstrumentKind::Fx]);
        assert_eq!(
            eligibility.run(&rfq("NVDA", "100"), &product).unwrap_err(),
            "Client not eligible for this product type"
        );
    }

    #[test]
    fn equity_mapper_produces_a_payout() {
        let product = EquityProductMapper::new("XNAS").map(&rfq("NVDA", "100")).unwrap();
        assert_eq!(product.economic_terms().payouts().len(), 1);
        assert_eq!(
            product.economic_terms().effective_date(),
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
        );
    }
}
