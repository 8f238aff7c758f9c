use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::attestation::{Attestation, Confidence};
use crate::codec::encode::{self, RecordBuilder, WireEncode};
use crate::domain::{CurrencyCode, Lei, NonEmptyStr, PositiveDecimal, UtcDatetime};
use crate::error::DeskResult;
use crate::gateway::{CanonicalOrder, OrderSide};
use crate::instrument::{DayCount, InstrumentDetail, OptionStyle, OptionType, SettlementType};

/// Option-specific fields for the MiFID II schema.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionReportFields {
    pub strike: Decimal,
    pub expiry_date: NaiveDate,
    pub option_type: OptionType,
    pub option_style: OptionStyle,
}

/// Futures-specific fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FuturesReportFields {
    pub expiry_date: NaiveDate,
    pub contract_size: Decimal,
}

/// FX-specific fields. `forward_rate` is absent for spot.
#[derive(Debug, Clone, PartialEq)]
pub struct FxReportFields {
    pub currency_pair: String,
    pub forward_rate: Option<Decimal>,
    pub settlement_type: SettlementType,
}

/// IRS-specific fields.
#[derive(Debug, Clone, PartialEq)]
pub struct IrSwapReportFields {
    pub fixed_rate: Decimal,
    pub float_index: String,
    pub day_count: DayCount,
    pub tenor_months: u32,
    pub notional_currency: String,
}

/// Instrument-specific section of the report. Variants without dedicated
/// MiFID II fields (cash equity, swaption, CDS) report no section.
#[derive(Debug, Clone, PartialEq)]
pub enum InstrumentReportFields {
    Option(OptionReportFields),
    Futures(FuturesReportFields),
    Fx(FxReportFields),
    IrSwap(IrSwapReportFields),
}

/// MiFID II transaction report, projected from a canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct Mifid2Report {
    transaction_ref: NonEmptyStr,
    reporting_entity_lei: Lei,
    counterparty_lei: Lei,
    instrument_id: NonEmptyStr,
    instrument_fields: Option<InstrumentReportFields>,
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

impl Mifid2Report {
    pub fn transaction_ref(&self) -> &NonEmptyStr {
        &self.transaction_ref
    }

    pub fn instrument_fields(&self) -> Option<&InstrumentReportFields> {
        self.instrument_fields.as_ref()
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

impl WireEncode for InstrumentReportFields {
    fn encode(&self) -> Value {
        match self {
            InstrumentReportFields::Option(f) => {
                RecordBuilder::new("dealdesk.reporting.mifid2.OptionReportFields")
                    .field("strike", encode::decimal(f.strike))
                    .field("expiry_date", encode::date(f.expiry_date))
                    .field("option_type", f.option_type.encode())
                    .field("option_style", f.option_style.encode())
                    .build()
            }
            InstrumentReportFields::Futures(f) => {
                RecordBuilder::new("dealdesk.reporting.mifid2.FuturesReportFields")
                    .field("expiry_date", encode::date(f.expiry_date))
                    .field("contract_size", encode::decimal(f.contract_size))
                    .build()
            }
            InstrumentReportFields::Fx(f) => {
                RecordBuilder::new("dealdesk.reporting.mifid2.FxReportFields")
                    .field("currency_pair", Value::String(f.currency_pair.clone()))
                    .opt("forward_rate", f.forward_rate.map(encode::decimal))
                    .field("settlement_type", f.settlement_type.encode())
                    .build()
            }
            InstrumentReportFields::IrSwap(f) => {
                RecordBuilder::new("dealdesk.reporting.mifid2.IrSwapReportFields")
                    .field("fixed_rate", encode::decimal(f.fixed_rate))
                    .field("float_index", Value::String(f.float_index.clone()))
                    .field("day_count", f.day_count.encode())
                    .field("tenor_months", Value::from(f.tenor_months))
                    .field("notional_currency", Value::String(f.notional_currency.clone()))
                    .build()
            }
        }
    }
}

// Encode-only, like the EMIR report: hashed and attested, never decoded.
impl WireEncode for Mifid2Report {
    fn encode(&self) -> Value {
        let refs: Vec<Value> = self.attestation_refs.iter().map(WireEncode::encode).collect();
        RecordBuilder::new("dealdesk.reporting.mifid2.Mifid2Report")
            .field("transaction_ref", self.transaction_ref.encode())
            .field("reporting_entity_lei", self.reporting_entity_lei.encode())
            .field("counterparty_lei", self.counterparty_lei.encode())
            .field("instrument_id", self.instrument_id.encode())
            .opt(
                "instrument_fields",
                self.instrument_fields.as_ref().map(WireEncode::encode),
            )
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

/// Extract the instrument-specific report section by variant.
fn instrument_fields(order: &CanonicalOrder) -> Option<InstrumentReportFields> {
    match order.instrument_detail() {
        InstrumentDetail::Option(d) => Some(InstrumentReportFields::Option(OptionReportFields {
            strike: d.strike().value(),
            expiry_date: d.expiry_date(),
            option_type: d.option_type(),
            option_style: d.option_style(),
        })),
        InstrumentDetail::Futures(d) => {
            Some(InstrumentReportFields::Futures(FuturesReportFields {
                expiry_date: d.expiry_date(),
                contract_size: d.contract_size().value(),
            }))
        }
        InstrumentDetail::Fx(d) => Some(InstrumentReportFields::Fx(FxReportFields {
            currency_pair: d.currency_pair().to_string(),
            forward_rate: d.forward_rate().map(|r| r.value()),
            settlement_type: d.settlement_type(),
        })),
        InstrumentDetail::IrSwap(d) => Some(InstrumentReportFields::IrSwap(IrSwapReportFields {
            fixed_rate: d.fixed_rate(),
            float_index: d.floating_index().as_str().to_string(),
            day_count: d.day_count(),
            tenor_months: d.tenor_months(),
            notional_currency: order.currency().as_str().to_string(),
        })),
        _ => None,
    }
}

/// Project a MiFID II transaction report from a canonical order.
pub fn project_mifid2_report(
    order: &CanonicalOrder,
    trade_attestation_id: &NonEmptyStr,
) -> DeskResult<Attestation<Mifid2Report>> {
    let report = Mifid2Report {
        transaction_ref: trade_attestation_id.clone(),
        reporting_entity_lei: order.executing_party_lei().clone(),
        counterparty_lei: order.counterparty_lei().clone(),
        instrument_id: order.instrument_id().clone(),
        instrument_fields: instrument_fields(order),
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

    let source = NonEmptyStr::parse("mifid2-reporter")?;
    let confidence = Confidence::Firm {
        source: source.clone(),
        attestation_ref: trade_attestation_id.clone(),
    };
    Ok(Attestation::attest(
        report,
        confidence,
        source,
        order.timestamp(),
        vec![],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Isin, NonZeroDecimal};
    use crate::instrument::{CurrencyPair, EquityDetail, FxDetail};

    fn nes(s: &str) -> NonEmptyStr {
        NonEmptyStr::parse(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn order(detail: InstrumentDetail) -> CanonicalOrder {
        CanonicalOrder::new(
            Lei::parse("529900T8BM49AURSDO55").unwrap(),
            Lei::parse("5493001KJTIIGC8Y1R12").unwrap(),
            nes("NVDA"),
            Some(Isin::parse("US0378331005").unwrap()),
            detail,
            OrderSide::Buy,
            PositiveDecimal::parse("100".parse().unwrap()).unwrap(),
            "42.50".parse().unwrap(),
            CurrencyCode::parse("USD").unwrap(),
            date(2025, 6, 15),
            date(2025, 6, 17),
            nes("XOFF"),
            UtcDatetime::parse("2025-06-15T12:00:00Z").unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn equity_orders_report_no_instrument_section() {
        let order = order(InstrumentDetail::Equity(EquityDetail::new(nes("NVDA"))));
        let attested = project_mifid2_report(&order, &nes("att-trade-1")).unwrap();
        assert!(attested.value().instrument_fields().is_none());
        assert_eq!(attested.value().price(), order.price());
        assert_eq!(attested.value().attestation_refs(), &[nes("att-trade-1")]);
    }

    #[test]
    fn fx_orders_report_pair_and_forward() {
        let pair = CurrencyPair::new(
            CurrencyCode::parse("EUR").unwrap(),
            CurrencyCode::parse("USD").unwrap(),
        )
        .unwrap();
        let fx = FxDetail::forward(
            pair,
            date(2025, 9, 17),
            NonZeroDecimal::parse("1.0845".parse().unwrap()).unwrap(),
        );
        let order = order(InstrumentDetail::Fx(fx));
        let attested = project_mifid2_report(&order, &nes("att-trade-2")).unwrap();
        match attested.value().instrument_fields() {
            Some(InstrumentReportFields::Fx(fields)) => {
                assert_eq!(fields.currency_pair, "EUR/USD");
                assert_eq!(fields.forward_rate, Some("1.0845".parse().unwrap()));
            }
            other => panic!("expected FX fields, got {other:?}"),
        }
    }
}
