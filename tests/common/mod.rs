#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use dealdesk::attestation::Confidence;
use dealdesk::domain::{
    CurrencyCode, FrozenMap, Lei, Money, NonEmptyStr, PositiveDecimal, UtcDatetime,
};
use dealdesk::error::{ActivityError, ErrorKind};
use dealdesk::gateway::OrderSide;
use dealdesk::instrument::{
    EquityDetail, FuturesDetail, InstrumentDetail, InstrumentKind, SettlementType,
};
use dealdesk::runtime::ActivityContext;
use dealdesk::workflow::activities::{
    CreditLimitCheck, DeskActivities, EligibilityCheck, EquityProductMapper, RfqActivities,
    RestrictedUnderlyingCheck, is_equity, term_sheet_hash,
};
use dealdesk::workflow::registries::{Pricer, ProductMapper};
use dealdesk::workflow::types::{
    BookingInput, BookingOutput, BookingResult, CheckReport, ConfirmationInput, IndicativeInput,
    MappingOutput, PreTradeCheckResult, PreTradeInput, PricingInput, PricingOutput, PricingResult,
    RfqInput, TermSheet,
};
use dealdesk::{Worker, WorkerBuilder};

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn nes(s: &str) -> NonEmptyStr {
    NonEmptyStr::parse(s).unwrap()
}

pub fn lei() -> Lei {
    Lei::parse("529900T8BM49AURSDO55").unwrap()
}

pub fn ts(s: &str) -> UtcDatetime {
    UtcDatetime::parse(s).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// One-million-notional NVDA cash equity RFQ.
pub fn equity_rfq(rfq_id: &str) -> RfqInput {
    equity_rfq_with_notional(rfq_id, "1000000")
}

pub fn equity_rfq_with_notional(rfq_id: &str, notional: &str) -> RfqInput {
    RfqInput::new(
        nes(rfq_id),
        lei(),
        InstrumentDetail::Equity(EquityDetail::new(nes("NVDA"))),
        PositiveDecimal::parse(dec(notional)).unwrap(),
        CurrencyCode::parse("USD").unwrap(),
        OrderSide::Buy,
        date(2025, 6, 15),
        date(2025, 6, 17),
        ts("2025-06-15T12:00:00Z"),
    )
    .unwrap()
}

/// A futures RFQ no registered mapper understands.
pub fn futures_rfq(rfq_id: &str) -> RfqInput {
    RfqInput::new(
        nes(rfq_id),
        lei(),
        InstrumentDetail::Futures(
            FuturesDetail::new(
                date(2025, 12, 19),
                date(2025, 12, 18),
                PositiveDecimal::parse(dec("50")).unwrap(),
                SettlementType::Cash,
            )
            .unwrap(),
        ),
        PositiveDecimal::parse(dec("1000000")).unwrap(),
        CurrencyCode::parse("USD").unwrap(),
        OrderSide::Buy,
        date(2025, 6, 15),
        date(2025, 6, 17),
        ts("2025-06-15T12:00:00Z"),
    )
    .unwrap()
}

pub fn pricing_result(price: &str) -> PricingResult {
    PricingResult::new(
        Money::new(dec(price), "USD").unwrap(),
        FrozenMap::from_entries([("delta".to_string(), dec("0.55"))]).unwrap(),
        nes("BlackScholes"),
        nes("snap-001"),
        Confidence::Derived {
            method: nes("BS"),
            config_ref: nes("v1"),
            fit_quality: FrozenMap::from_entries([("rmse".to_string(), dec("0.001"))]).unwrap(),
        },
        nes("att-001"),
        ts("2025-06-15T12:00:00Z"),
    )
}

/// Pricer returning a fixed Black-Scholes result.
pub struct FixedPricer {
    pub price: &'static str,
}

impl Pricer for FixedPricer {
    fn price(&self, _input: &PricingInput) -> Result<PricingResult, String> {
        Ok(pricing_result(self.price))
    }
}

/// Pricer whose price ticks up one dollar per call, so tests can observe
/// that a refresh really repriced.
pub struct SteppingPricer {
    pub base: i64,
    calls: AtomicU32,
}

impl SteppingPricer {
    pub fn new(base: i64) -> Self {
        Self {
            base,
            calls: AtomicU32::new(0),
        }
    }
}

impl Pricer for SteppingPricer {
    fn price(&self, _input: &PricingInput) -> Result<PricingResult, String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) as i64;
        Ok(pricing_result(&format!("{}.00", self.base + call)))
    }
}

pub struct FailingPricer {
    pub reason: &'static str,
}

impl Pricer for FailingPricer {
    fn price(&self, _input: &PricingInput) -> Result<PricingResult, String> {
        Err(self.reason.to_string())
    }
}

/// The standard desk worker: equity mapper, the three stock checks, and
/// the given pricer.
pub fn desk_worker(pricer: impl Pricer + 'static) -> Worker<DeskActivities> {
    WorkerBuilder::new()
        .register_mapper(is_equity, EquityProductMapper::new("XNAS"))
        .register_check(RestrictedUnderlyingCheck::new(["RSTX".to_string()]))
        .register_check(CreditLimitCheck::new(dec("50000000")))
        .register_check(EligibilityCheck::new([InstrumentKind::Equity]))
        .register_pricer(is_equity, pricer)
        .build()
}

/// Fully scriptable activity set for failure-path scenarios.
///
/// Defaults to the happy path; set a field to steer one step off it.
pub struct MockActivities {
    pub mapping_error: Option<&'static str>,
    pub failing_checks: Vec<(&'static str, &'static str)>,
    pub pricing_error: Option<&'static str>,
    pub pricing_hangs: bool,
    pub booking_error: Option<&'static str>,
    pub confirmation_fails: bool,
    pub pricing_calls: AtomicU32,
    pub confirmation_attempts: AtomicU32,
}

impl Default for MockActivities {
    fn default() -> Self {
        Self {
            mapping_error: None,
            failing_checks: vec![],
            pricing_error: None,
            pricing_hangs: false,
            booking_error: None,
            confirmation_fails: false,
            pricing_calls: AtomicU32::new(0),
            confirmation_attempts: AtomicU32::new(0),
        }
    }
}

impl RfqActivities for MockActivities {
    async fn map_to_cdm_product(
        &self,
        rfq: RfqInput,
        _ctx: ActivityContext,
    ) -> Result<MappingOutput, ActivityError> {
        match self.mapping_error {
            Some(reason) => Ok(MappingOutput::err(reason)),
            None => Ok(MappingOutput::ok(
                EquityProductMapper::new("XNAS")
                    .map(&rfq)
                    .map_err(|e| ActivityError::new(ErrorKind::Validation, e))?,
            )),
        }
    }

    async fn run_pre_trade_checks(
        &self,
        _input: PreTradeInput,
        _ctx: ActivityContext,
    ) -> Result<PreTradeCheckResult, ActivityError> {
        let mut reports = vec![CheckReport::passed(nes("restricted_underlying"))];
        for (name, reason) in &self.failing_checks {
            reports.push(CheckReport::failed(nes(name), *reason));
        }
        Ok(PreTradeCheckResult::new(reports))
    }

    async fn price_product(
        &self,
        _input: PricingInput,
        ctx: ActivityContext,
    ) -> Result<PricingOutput, ActivityError> {
        self.pricing_calls.fetch_add(1, Ordering::SeqCst);
        if self.pricing_hangs {
            // Deliberately silent: no heartbeat, so the watchdog fires.
            tokio::time::sleep(std::time::Duration::from_secs(600)).await;
        }
        ctx.heartbeat();
        match self.pricing_error {
            Some(reason) => Ok(PricingOutput::err(reason)),
            None => Ok(PricingOutput::ok(pricing_result("42.50"))),
        }
    }

    async fn generate_and_send_indicative(
        &self,
        input: IndicativeInput,
        _ctx: ActivityContext,
    ) -> Result<TermSheet, ActivityError> {
        let generated_at = UtcDatetime::now();
        let valid_until = UtcDatetime::new(
            generated_at.value()
                + chrono::Duration::from_std(input.valid_for())
                    .map_err(|e| ActivityError::new(ErrorKind::Validation, e.to_string()))?,
        );
        let digest = term_sheet_hash(input.rfq().rfq_id(), input.pricing());
        TermSheet::new(
            input.rfq().rfq_id().clone(),
            input.pricing().clone(),
            nes(&digest),
            valid_until,
            generated_at,
        )
        .map_err(|e| ActivityError::new(ErrorKind::Validation, e.to_string()))
    }

    async fn book_trade(
        &self,
        input: BookingInput,
        _ctx: ActivityContext,
    ) -> Result<BookingOutput, ActivityError> {
        match self.booking_error {
            Some(reason) => Ok(BookingOutput::err(reason)),
            None => Ok(BookingOutput::ok(BookingResult::new(nes(&format!(
                "TRADE-{}",
                input.rfq().rfq_id()
            ))))),
        }
    }

    async fn send_confirmation(
        &self,
        _input: ConfirmationInput,
        _ctx: ActivityContext,
    ) -> Result<(), ActivityError> {
        self.confirmation_attempts.fetch_add(1, Ordering::SeqCst);
        if self.confirmation_fails {
            return Err(ActivityError::transient("confirmation gateway unreachable"));
        }
        Ok(())
    }
}

/// Activity set that must never run: replayed histories resolve every
/// step from the log.
pub struct PanickingActivities;

impl RfqActivities for PanickingActivities {
    async fn map_to_cdm_product(
        &self,
        _rfq: RfqInput,
        _ctx: ActivityContext,
    ) -> Result<MappingOutput, ActivityError> {
        panic!("replay must not execute map_to_cdm_product");
    }

    async fn run_pre_trade_checks(
        &self,
        _input: PreTradeInput,
        _ctx: ActivityContext,
    ) -> Result<PreTradeCheckResult, ActivityError> {
        panic!("replay must not execute run_pre_trade_checks");
    }

    async fn price_product(
        &self,
        _input: PricingInput,
        _ctx: ActivityContext,
    ) -> Result<PricingOutput, ActivityError> {
        panic!("replay must not execute price_product");
    }

    async fn generate_and_send_indicative(
        &self,
        _input: IndicativeInput,
        _ctx: ActivityContext,
    ) -> Result<TermSheet, ActivityError> {
        panic!("replay must not execute generate_and_send_indicative");
    }

    async fn book_trade(
        &self,
        _input: BookingInput,
        _ctx: ActivityContext,
    ) -> Result<BookingOutput, ActivityError> {
        panic!("replay must not execute book_trade");
    }

    async fn send_confirmation(
        &self,
        _input: ConfirmationInput,
        _ctx: ActivityContext,
    ) -> Result<(), ActivityError> {
        panic!("replay must not execute send_confirmation");
    }
}
