use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::attestation::{Attestation, Confidence};
use crate::codec::encode::{self, RecordBuilder, WireEncode};
use crate::codec;
use crate::domain::{CurrencyCode, Isin, Lei, NonEmptyStr, PositiveDecimal, Uti, UtcDatetime};
use crate::error::DeskResult;
use crate::gateway::{CanonicalOrder, OrderSide};

/// EMIR trade report, projected field-for-field from a canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct EmirTradeReport {
    uti: Uti,
    reporting_counterparty_lei: Lei,
    other_counterparty_lei: Lei,
    instrument_id: NonEmptyStr,
    isin: Option<Isin>,
    direction: OrderSide,
    quantity: PositiveDecimal,
    price: Decimal,
    currency: CurrencyCode,
    trade_date: NaiveDate,
    settlement_date: NaiveDate,
    venue: NonEmptyStr,
    report_timestamp: UtcDatetime,
    attestation_refs: Vec<NonEmptyStr>,
}

impl EmirTradeReport {
    pub fn uti(&self) -> &Uti {
        &self.uti
    }

    pub fn reporting_counterparty_lei(&self) -> &Lei {
        &self.reporting_counterparty_lei
    }

    pub fn other_counterparty_lei(&self) -> &Lei {
        &self.other_counterparty_lei
    }

    pub fn instrument_id(&self) -> &NonEmptyStr {
        &self.instrument_id
    }

    pub fn isin(&self) -> Option<&Isin> {
        self.isin.as_ref()
    }

    pub fn direction(&self) -> OrderSide {
        self.direction
    }

    pub fn quantity(&self) -> PositiveDecimal {
        self.quantity
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn trade_date(&self) -> NaiveDate {
        self.trade_date
    }

    pub fn settlement_date(&self) -> NaiveDate {
        self.settlement_date
    }

    pub fn venue(&self) -> &NonEmptyStr {
        &self.venue
    }

    pub fn report_timestamp(&self) -> UtcDatetime {
        self.report_timestamp
    }

    pub fn attestation_refs(&self) -> &[NonEmptyStr] {
        &self.attestation_refs
    }
}

// Encode-only: reports are hashed and attested, never decoded back, so
// their type path stays off the codec allow-list.
impl WireEncode for EmirTradeReport {
    fn encode(&self) -> Value {
        let refs: Vec<Value> = self.attestation_refs.iter().map(WireEncode::encode).collect();
        RecordBuilder::new("dealdesk.reporting.emir.EmirTradeReport")
            .field("uti", self.uti.encode())
            .field(
                "reporting_counterparty_lei",
                self.reporting_counterparty_lei.encode(),
            )
            .field("other_counterparty_lei", self.other_counterparty_lei.encode())
            .field("instrument_id", self.instrument_id.encode())
            .opt("isin", self.isin.as_ref().map(WireEncode::encode))
            .field("direction", self.direction.encode())
            .field("quantity", self.quantity.encode())
            .field("price", encode::decimal(self.price))
            .field("currency", self.currency.encode())
            .field("trade_date", encode::date(self.trade_date))
            .field("settlement_date", encode::date(self.settlement_date))
            .field("venue", self.venue.encode())
            .field("report_timestamp", self.report_timestamp.encode())
            .field("attestation_refs", Value::Array(refs))
            .build()
    }
}

/// Project an EMIR report from a canonical order.
///
/// The UTI is the reporting party's LEI followed by 32 hex chars of the
/// order's content hash: 52 characters, alphanumeric prefix, and stable
/// for the same order.
pub fn project_emir_report(
    order: &CanonicalOrder,
    trade_attestation_id: &NonEmptyStr,
) -> DeskResult<Attestation<EmirTradeReport>> {
    let content_digest = codec::content_hash(&order.encode());
    let uti_raw = format!(
        "{}{}",
        order.executing_party_lei().as_str(),
        &content_digest[..32]
    );
    let uti = Uti::parse(&uti_raw).map_err(|e| e.in_field("EmirTradeReport", "uti"))?;

    let report = EmirTradeReport {
        uti,
        reporting_counterparty_lei: order.executing_party_lei().clone(),
        other_counterparty_lei: order.counterparty_lei().clone(),
        instrument_id: order.instrument_id().clone(),
        isin: order.isin().cloned(),
        direction: order.side(),
        quantity: order.quantity(),
        price: order.price(),
        currency: order.currency().clone(),
        trade_date: order.trade_date(),
        settlement_date: order.settlement_date(),
        venue: order.venue().clone(),
        report_timestamp: order.timestamp(),
        attestation_refs: vec![trade_attestation_id.clone()],
    };

    let source = NonEmptyStr::parse("EMIR_REPORTING")?;
    let confidence = Confidence::Firm {
        source: source.clone(),
        attestation_ref: trade_attestation_id.clone(),
    };
    Ok(Attestation::attest(
        report,
        confidence,
        source,
        order.timestamp(),
        vec![trade_attestation_id.clone()],
    ))
}
