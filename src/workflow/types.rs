use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use strum::{Display, EnumString, IntoStaticStr};

use crate::attestation::Confidence;
use crate::domain::{CurrencyCode, FrozenMap, Lei, Money, NonEmptyStr, PositiveDecimal, UtcDatetime};
use crate::error::DomainError;
use crate::gateway::OrderSide;
use crate::instrument::{InstrumentDetail, Product};

// ================================================================================================
// Enums
// ================================================================================================

/// The three possible client responses to an indicative quote.
#[derive(Copy, Clone, Debug, Display, EnumString, IntoStaticStr, PartialEq, Eq, Hash)]
pub enum ClientAction {
    Accept,
    Reject,
    Refresh,
}

/// Terminal states of the RFQ workflow. Every run ends in exactly one.
#[derive(Copy, Clone, Debug, Display, EnumString, IntoStaticStr, PartialEq, Eq, Hash)]
pub enum RfqOutcome {
    Executed,
    RejectedPreTrade,
    RejectedByClient,
    Expired,
    Failed,
}

// ================================================================================================
// Workflow input
// ================================================================================================

/// What the client wants. Workflow entry point; the `rfq_id` doubles as
/// the workflow id, which is what makes resubmission idempotent.
#[derive(Debug, Clone, PartialEq)]
pub struct RfqInput {
    rfq_id: NonEmptyStr,
    client_lei: Lei,
    instrument_detail: InstrumentDetail,
    notional: PositiveDecimal,
    currency: CurrencyCode,
    side: OrderSide,
    trade_date: NaiveDate,
    settlement_date: NaiveDate,
    timestamp: UtcDatetime,
}

impl RfqInput {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rfq_id: NonEmptyStr,
        client_lei: Lei,
        instrument_detail: InstrumentDetail,
        notional: PositiveDecimal,
        currency: CurrencyCode,
        side: OrderSide,
        trade_date: NaiveDate,
        settlement_date: NaiveDate,
        timestamp: UtcDatetime,
    ) -> Result<Self, DomainError> {
        if settlement_date < trade_date {
            return Err(DomainError::invariant(
                "RfqInput",
                format!("settlement_date ({settlement_date}) must be >= trade_date ({trade_date})"),
            ));
        }
        Ok(Self {
            rfq_id,
            client_lei,
            instrument_detail,
            notional,
            currency,
            side,
            trade_date,
            settlement_date,
            timestamp,
        })
    }

    pub fn rfq_id(&self) -> &NonEmptyStr {
        &self.rfq_id
    }

    pub fn client_lei(&self) -> &Lei {
        &self.client_lei
    }

    pub fn instrument_detail(&self) -> &InstrumentDetail {
        &self.instrument_detail
    }

    pub fn notional(&self) -> PositiveDecimal {
        self.notional
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn side(&self) -> OrderSide {
        self.side
    }

    pub fn trade_date(&self) -> NaiveDate {
        self.trade_date
    }

    pub fn settlement_date(&self) -> NaiveDate {
        self.settlement_date
    }

    pub fn timestamp(&self) -> UtcDatetime {
        self.timestamp
    }
}

// ================================================================================================
// Activity I/O: mapping
// ================================================================================================

/// Output of the product-mapping activity: a product or a reason, never
/// both and never neither.
#[derive(Debug, Clone, PartialEq)]
pub enum MappingOutput {
    Mapped(Product),
    Error(String),
}

impl MappingOutput {
    pub fn ok(product: Product) -> Self {
        MappingOutput::Mapped(product)
    }

    pub fn err(reason: impl Into<String>) -> Self {
        MappingOutput::Error(reason.into())
    }

    pub fn product(&self) -> Option<&Product> {
        match self {
            MappingOutput::Mapped(p) => Some(p),
            MappingOutput::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            MappingOutput::Mapped(_) => None,
            MappingOutput::Error(e) => Some(e),
        }
    }
}

// ================================================================================================
// Activity I/O: pre-trade checks
// ================================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PreTradeInput {
    rfq: RfqInput,
    product: Product,
}

impl PreTradeInput {
    pub fn new(rfq: RfqInput, product: Product) -> Self {
        Self { rfq, product }
    }

    pub fn rfq(&self) -> &RfqInput {
        &self.rfq
    }

    pub fn product(&self) -> &Product {
        &self.product
    }
}

/// Verdict of one registered compliance check. A passing report carries
/// no reason; a failing one always does.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    name: NonEmptyStr,
    reason: Option<String>,
}

impl CheckReport {
    pub fn passed(name: NonEmptyStr) -> Self {
        Self { name, reason: None }
    }

    pub fn failed(name: NonEmptyStr, reason: impl Into<String>) -> Self {
        Self {
            name,
            reason: Some(reason.into()),
        }
    }

    pub fn name(&self) -> &NonEmptyStr {
        &self.name
    }

    pub fn is_passed(&self) -> bool {
        self.reason.is_none()
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

/// Aggregated outcome of every registered pre-trade check, in
/// registration order.
#[derive(Debug, Clone, PartialEq)]
pub struct PreTradeCheckResult {
    reports: Vec<CheckReport>,
}

impl PreTradeCheckResult {
    pub fn new(reports: Vec<CheckReport>) -> Self {
        Self { reports }
    }

    pub fn reports(&self) -> &[CheckReport] {
        &self.reports
    }

    pub fn passed(&self) -> bool {
        self.reports.iter().all(CheckReport::is_passed)
    }

    /// Failure reasons in check-registration order.
    pub fn rejection_reasons(&self) -> Vec<String> {
        self.reports
            .iter()
            .filter_map(|r| r.reason().map(str::to_string))
            .collect()
    }
}

// ================================================================================================
// Activity I/O: pricing
// ================================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PricingInput {
    rfq: RfqInput,
    product: Product,
}

impl PricingInput {
    pub fn new(rfq: RfqInput, product: Product) -> Self {
        Self { rfq, product }
    }

    pub fn rfq(&self) -> &RfqInput {
        &self.rfq
    }

    pub fn product(&self) -> &Product {
        &self.product
    }
}

/// Output of the quant pricing activity.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingResult {
    indicative_price: Money,
    greeks: FrozenMap<Decimal>,
    model_name: NonEmptyStr,
    market_data_snapshot_id: NonEmptyStr,
    confidence: Confidence,
    pricing_attestation_id: NonEmptyStr,
    timestamp: UtcDatetime,
}

impl PricingResult {
    pub fn new(
        indicative_price: Money,
        greeks: FrozenMap<Decimal>,
        model_name: NonEmptyStr,
        market_data_snapshot_id: NonEmptyStr,
        confidence: Confidence,
        pricing_attestation_id: NonEmptyStr,
        timestamp: UtcDatetime,
    ) -> Self {
        Self {
            indicative_price,
            greeks,
            model_name,
            market_data_snapshot_id,
            confidence,
            pricing_attestation_id,
            timestamp,
        }
    }

    pub fn indicative_price(&self) -> &Money {
        &self.indicative_price
    }

    pub fn greeks(&self) -> &FrozenMap<Decimal> {
        &self.greeks
    }

    pub fn model_name(&self) -> &NonEmptyStr {
        &self.model_name
    }

    pub fn market_data_snapshot_id(&self) -> &NonEmptyStr {
        &self.market_data_snapshot_id
    }

    pub fn confidence(&self) -> &Confidence {
        &self.confidence
    }

    pub fn pricing_attestation_id(&self) -> &NonEmptyStr {
        &self.pricing_attestation_id
    }

    pub fn timestamp(&self) -> UtcDatetime {
        self.timestamp
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PricingOutput {
    Priced(PricingResult),
    Error(String),
}

impl PricingOutput {
    pub fn ok(result: PricingResult) -> Self {
        PricingOutput::Priced(result)
    }

    pub fn err(reason: impl Into<String>) -> Self {
        PricingOutput::Error(reason.into())
    }

    pub fn result(&self) -> Option<&PricingResult> {
        match self {
            PricingOutput::Priced(r) => Some(r),
            PricingOutput::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PricingOutput::Priced(_) => None,
            PricingOutput::Error(e) => Some(e),
        }
    }
}

// ================================================================================================
// Activity I/O: indicative term sheet
// ================================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct IndicativeInput {
    rfq: RfqInput,
    pricing: PricingResult,
    valid_for: Duration,
}

impl IndicativeInput {
    pub fn new(rfq: RfqInput, pricing: PricingResult, valid_for: Duration) -> Self {
        Self {
            rfq,
            pricing,
            valid_for,
        }
    }

    pub fn rfq(&self) -> &RfqInput {
        &self.rfq
    }

    pub fn pricing(&self) -> &PricingResult {
        &self.pricing
    }

    pub fn valid_for(&self) -> Duration {
        self.valid_for
    }
}

/// Indicative term sheet with content-addressed integrity. The document
/// hash is what a client acceptance must echo back.
#[derive(Debug, Clone, PartialEq)]
pub struct TermSheet {
    rfq_id: NonEmptyStr,
    pricing_result: PricingResult,
    document_hash: NonEmptyStr,
    valid_until: UtcDatetime,
    generated_at: UtcDatetime,
}

impl TermSheet {
    pub fn new(
        rfq_id: NonEmptyStr,
        pricing_result: PricingResult,
        document_hash: NonEmptyStr,
        valid_until: UtcDatetime,
        generated_at: UtcDatetime,
    ) -> Result<Self, DomainError> {
        if valid_until < generated_at {
            return Err(DomainError::invariant(
                "TermSheet",
                format!("valid_until ({valid_until}) must be >= generated_at ({generated_at})"),
            ));
        }
        Ok(Self {
            rfq_id,
            pricing_result,
            document_hash,
            valid_until,
            generated_at,
        })
    }

    pub fn rfq_id(&self) -> &NonEmptyStr {
        &self.rfq_id
    }

    pub fn pricing_result(&self) -> &PricingResult {
        &self.pricing_result
    }

    pub fn document_hash(&self) -> &NonEmptyStr {
        &self.document_hash
    }

    pub fn valid_until(&self) -> UtcDatetime {
        self.valid_until
    }

    pub fn generated_at(&self) -> UtcDatetime {
        self.generated_at
    }
}

// ================================================================================================
// Client response (signal payload)
// ================================================================================================

/// Signal payload from the client. Accepting binds the client to a
/// specific term sheet, so ACCEPT must carry the hash it refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientResponse {
    rfq_id: NonEmptyStr,
    action: ClientAction,
    timestamp: UtcDatetime,
    term_sheet_hash: Option<NonEmptyStr>,
    message: Option<String>,
}

impl ClientResponse {
    pub fn new(
        rfq_id: NonEmptyStr,
        action: ClientAction,
        timestamp: UtcDatetime,
        term_sheet_hash: Option<NonEmptyStr>,
        message: Option<String>,
    ) -> Result<Self, DomainError> {
        if action == ClientAction::Accept && term_sheet_hash.is_none() {
            return Err(DomainError::invariant(
                "ClientResponse",
                "term_sheet_hash is required when action is Accept",
            ));
        }
        Ok(Self {
            rfq_id,
            action,
            timestamp,
            term_sheet_hash,
            message,
        })
    }

    pub fn accept(rfq_id: NonEmptyStr, timestamp: UtcDatetime, term_sheet_hash: NonEmptyStr) -> Self {
        Self {
            rfq_id,
            action: ClientAction::Accept,
            timestamp,
            term_sheet_hash: Some(term_sheet_hash),
            message: None,
        }
    }

    pub fn reject(rfq_id: NonEmptyStr, timestamp: UtcDatetime, message: Option<String>) -> Self {
        Self {
            rfq_id,
            action: ClientAction::Reject,
            timestamp,
            term_sheet_hash: None,
            message,
        }
    }

    pub fn refresh(rfq_id: NonEmptyStr, timestamp: UtcDatetime) -> Self {
        Self {
            rfq_id,
            action: ClientAction::Refresh,
            timestamp,
            term_sheet_hash: None,
            message: None,
        }
    }

    pub fn rfq_id(&self) -> &NonEmptyStr {
        &self.rfq_id
    }

    pub fn action(&self) -> ClientAction {
        self.action
    }

    pub fn timestamp(&self) -> UtcDatetime {
        self.timestamp
    }

    pub fn term_sheet_hash(&self) -> Option<&NonEmptyStr> {
        self.term_sheet_hash.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

// ================================================================================================
// Activity I/O: booking & confirmation
// ================================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct BookingInput {
    rfq: RfqInput,
    product: Product,
    pricing: PricingResult,
    accepted_price: Money,
}

impl BookingInput {
    pub fn new(
        rfq: RfqInput,
        product: Product,
        pricing: PricingResult,
        accepted_price: Money,
    ) -> Self {
        Self {
            rfq,
            product,
            pricing,
            accepted_price,
        }
    }

    pub fn rfq(&self) -> &RfqInput {
        &self.rfq
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn pricing(&self) -> &PricingResult {
        &self.pricing
    }

    pub fn accepted_price(&self) -> &Money {
        &self.accepted_price
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingResult {
    trade_id: NonEmptyStr,
}

impl BookingResult {
    pub fn new(trade_id: NonEmptyStr) -> Self {
        Self { trade_id }
    }

    pub fn trade_id(&self) -> &NonEmptyStr {
        &self.trade_id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutput {
    Booked(BookingResult),
    Error(String),
}

impl BookingOutput {
    pub fn ok(result: BookingResult) -> Self {
        BookingOutput::Booked(result)
    }

    pub fn err(reason: impl Into<String>) -> Self {
        BookingOutput::Error(reason.into())
    }

    pub fn result(&self) -> Option<&BookingResult> {
        match self {
            BookingOutput::Booked(r) => Some(r),
            BookingOutput::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            BookingOutput::Booked(_) => None,
            BookingOutput::Error(e) => Some(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationInput {
    rfq: RfqInput,
    trade_result: BookingResult,
    term_sheet: TermSheet,
}

impl ConfirmationInput {
    pub fn new(rfq: RfqInput, trade_result: BookingResult, term_sheet: TermSheet) -> Self {
        Self {
            rfq,
            trade_result,
            term_sheet,
        }
    }

    pub fn rfq(&self) -> &RfqInput {
        &self.rfq
    }

    pub fn trade_result(&self) -> &BookingResult {
        &self.trade_result
    }

    pub fn term_sheet(&self) -> &TermSheet {
        &self.term_sheet
    }
}

// ================================================================================================
// Workflow output
// ================================================================================================

/// Terminal outcome of the workflow. A trade id exists exactly when the
/// outcome is `Executed`; the constructors make any other combination
/// unrepresentable, and the checked `new` guards the decode path.
#[derive(Debug, Clone, PartialEq)]
pub struct RfqResult {
    rfq_id: NonEmptyStr,
    outcome: RfqOutcome,
    trade_id: Option<NonEmptyStr>,
    rejection_reasons: Vec<String>,
    pricing_attestation_id: Option<NonEmptyStr>,
}

impl RfqResult {
    pub fn new(
        rfq_id: NonEmptyStr,
        outcome: RfqOutcome,
        trade_id: Option<NonEmptyStr>,
        rejection_reasons: Vec<String>,
        pricing_attestation_id: Option<NonEmptyStr>,
    ) -> Result<Self, DomainError> {
        match (outcome, &trade_id) {
            (RfqOutcome::Executed, None) => {
                return Err(DomainError::invariant(
                    "RfqResult",
                    "Executed outcome requires trade_id",
                ));
            }
            (RfqOutcome::Executed, Some(_)) => {}
            (other, Some(_)) => {
                return Err(DomainError::invariant(
                    "RfqResult",
                    format!("{other} outcome must not have trade_id"),
                ));
            }
            (_, None) => {}
        }
        Ok(Self {
            rfq_id,
            outcome,
            trade_id,
            rejection_reasons,
            pricing_attestation_id,
        })
    }

    pub fn executed(
        rfq_id: NonEmptyStr,
        trade_id: NonEmptyStr,
        pricing_attestation_id: NonEmptyStr,
    ) -> Self {
        Self {
            rfq_id,
            outcome: RfqOutcome::Executed,
            trade_id: Some(trade_id),
            rejection_reasons: vec![],
            pricing_attestation_id: Some(pricing_attestation_id),
        }
    }

    pub fn failed(rfq_id: NonEmptyStr, reason: impl Into<String>) -> Self {
        Self {
            rfq_id,
            outcome: RfqOutcome::Failed,
            trade_id: None,
            rejection_reasons: vec![reason.into()],
            pricing_attestation_id: None,
        }
    }

    pub fn rejected_pre_trade(rfq_id: NonEmptyStr, reasons: Vec<String>) -> Self {
        Self {
            rfq_id,
            outcome: RfqOutcome::RejectedPreTrade,
            trade_id: None,
            rejection_reasons: reasons,
            pricing_attestation_id: None,
        }
    }

    pub fn rejected_by_client(
        rfq_id: NonEmptyStr,
        reason: impl Into<String>,
        pricing_attestation_id: Option<NonEmptyStr>,
    ) -> Self {
        Self {
            rfq_id,
            outcome: RfqOutcome::RejectedByClient,
            trade_id: None,
            rejection_reasons: vec![reason.into()],
            pricing_attestation_id,
        }
    }

    pub fn expired(
        rfq_id: NonEmptyStr,
        reasons: Vec<String>,
        pricing_attestation_id: Option<NonEmptyStr>,
    ) -> Self {
        Self {
            rfq_id,
            outcome: RfqOutcome::Expired,
            trade_id: None,
            rejection_reasons: reasons,
            pricing_attestation_id,
        }
    }

    /// Attach the attestation id of the pricing that was live when the
    /// run terminated.
    pub fn with_attestation(mut self, pricing_attestation_id: NonEmptyStr) -> Self {
        self.pricing_attestation_id = Some(pricing_attestation_id);
        self
    }

    pub fn rfq_id(&self) -> &NonEmptyStr {
        &self.rfq_id
    }

    pub fn outcome(&self) -> RfqOutcome {
        self.outcome
    }

    pub fn trade_id(&self) -> Option<&NonEmptyStr> {
        self.trade_id.as_ref()
    }

    pub fn rejection_reasons(&self) -> &[String] {
        &self.rejection_reasons
    }

    pub fn pricing_attestation_id(&self) -> Option<&NonEmptyStr> {
        self.pricing_attestation_id.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::{EquityDetail, EconomicTerms, EquityPayoutSpec, PayoutSpec};

    fn nes(s: &str) -> NonEmptyStr {
        NonEmptyStr::parse(s).unwrap()
    }

    fn ts(s: &str) -> UtcDatetime {
        UtcDatetime::parse(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rfq_input(trade: NaiveDate, settle: NaiveDate) -> Result<RfqInput, DomainError> {
        RfqInput::new(
            nes("RFQ-1"),
            Lei::parse("529900T8BM49AURSDO55").unwrap(),
            InstrumentDetail::Equity(EquityDetail::new(nes("NVDA"))),
            PositiveDecimal::parse("1000000".parse().unwrap()).unwrap(),
            CurrencyCode::parse("USD").unwrap(),
            OrderSide::Buy,
            trade,
            settle,
            ts("2025-06-15T12:00:00Z"),
        )
    }

    #[test]
    fn rfq_input_settlement_not_before_trade() {
        assert!(rfq_input(date(2025, 6, 15), date(2025, 6, 17)).is_ok());
        assert!(rfq_input(date(2025, 6, 15), date(2025, 6, 15)).is_ok());
        let err = rfq_input(date(2025, 6, 15), date(2025, 6, 14)).unwrap_err();
        assert!(err.to_string().contains("settlement_date"));
    }

    #[test]
    fn mapping_output_is_exclusive() {
        let terms = EconomicTerms::new(
            vec![PayoutSpec::Equity(
                EquityPayoutSpec::create("NVDA", "USD", "XNAS").unwrap(),
            )],
            date(2025, 6, 15),
            None,
        )
        .unwrap();
        let ok = MappingOutput::ok(Product::new(terms));
        assert!(ok.product().is_some());
        assert!(ok.error().is_none());

        let err = MappingOutput::err("Unsupported product type");
        assert!(err.product().is_none());
        assert_eq!(err.error(), Some("Unsupported product type"));
    }

    #[test]
    fn client_accept_requires_hash() {
        let err = ClientResponse::new(
            nes("RFQ-1"),
            ClientAction::Accept,
            ts("2025-06-15T12:00:00Z"),
            None,
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("term_sheet_hash"));

        let ok = ClientResponse::accept(nes("RFQ-1"), ts("2025-06-15T12:00:00Z"), nes("abc123"));
        assert_eq!(ok.action(), ClientAction::Accept);
    }

    #[test]
    fn reject_and_refresh_carry_no_hash() {
        let rej = ClientResponse::reject(
            nes("RFQ-1"),
            ts("2025-06-15T12:00:00Z"),
            Some("Too expensive".into()),
        );
        assert!(rej.term_sheet_hash().is_none());
        assert_eq!(rej.message(), Some("Too expensive"));

        let refresh = ClientResponse::refresh(nes("RFQ-1"), ts("2025-06-15T12:00:00Z"));
        assert_eq!(refresh.action(), ClientAction::Refresh);
    }

    #[test]
    fn rfq_result_trade_id_iff_executed() {
        let err = RfqResult::new(nes("RFQ-1"), RfqOutcome::Executed, None, vec![], None)
            .unwrap_err();
        assert!(err.to_string().contains("trade_id"));

        let err = RfqResult::new(
            nes("RFQ-1"),
            RfqOutcome::Failed,
            Some(nes("TRADE-1")),
            vec![],
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("must not have trade_id"));

        let ok = RfqResult::executed(nes("RFQ-1"), nes("TRADE-RFQ-1"), nes("att-1"));
        assert_eq!(ok.outcome(), RfqOutcome::Executed);
        assert_eq!(ok.trade_id().unwrap().as_str(), "TRADE-RFQ-1");
    }

    #[test]
    fn pre_trade_result_aggregates_in_registration_order() {
        let result = PreTradeCheckResult::new(vec![
            CheckReport::passed(nes("restricted_underlying")),
            CheckReport::failed(nes("credit_limit"), "Credit limit exceeded"),
            CheckReport::failed(nes("eligibility"), "Client not eligible for this product type"),
        ]);
        assert!(!result.passed());
        assert_eq!(
            result.rejection_reasons(),
            vec![
                "Credit limit exceeded".to_string(),
                "Client not eligible for this product type".to_string(),
            ]
        );
    }

    #[test]
    fn term_sheet_validity_window() {
        let rfq = rfq_input(date(2025, 6, 15), date(2025, 6, 17)).unwrap();
        let pricing = PricingResult::new(
            Money::new("42.50".parse().unwrap(), "USD").unwrap(),
            FrozenMap::empty(),
            nes("BlackScholes"),
            nes("snap-001"),
            Confidence::Firm {
                source: nes("TEST"),
                attestation_ref: nes("att-0"),
            },
            nes("att-001"),
            rfq.timestamp(),
        );
        let err = TermSheet::new(
            nes("RFQ-1"),
            pricing.clone(),
            nes("hash"),
            ts("2025-06-15T11:00:00Z"),
            ts("2025-06-15T12:00:00Z"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("valid_until"));

        assert!(
            TermSheet::new(
                nes("RFQ-1"),
                pricing,
                nes("hash"),
                ts("2025-06-15T13:00:00Z"),
                ts("2025-06-15T12:00:00Z"),
            )
            .is_ok()
        );
    }
}
