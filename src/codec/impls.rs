use rust_decimal::Decimal;
use serde_json::Value;

use crate::attestation::Confidence;
use crate::domain::{
    CurrencyCode, FrozenMap, IdempotencyKey, Isin, Lei, Money, NonEmptyStr, NonNegativeDecimal,
    NonZeroDecimal, PositiveDecimal, Uti, UtcDatetime,
};
use crate::error::CodecError;
use crate::gateway::OrderSide;
use crate::instrument::{
    CdsDetail, CurrencyPair, DayCount, EconomicTerms, EquityDetail, EquityPayoutSpec,
    FuturesDetail, FxDetail, InstrumentDetail, IrSwapDetail, OptionDetail, OptionStyle,
    OptionType, Party, PaymentFrequency, PayoutSpec, PositionStatus, Product, SettlementType,
    SwaptionDetail,
};
use crate::workflow::types::{
    BookingInput, BookingOutput, BookingResult, CheckReport, ClientAction, ClientResponse,
    ConfirmationInput, IndicativeInput, MappingOutput, PreTradeCheckResult, PreTradeInput,
    PricingInput, PricingOutput, PricingResult, RfqInput, RfqOutcome, RfqResult, TermSheet,
};

use super::decode::{self, Fields, WireDecode};
use super::encode::{self, RecordBuilder, WireEncode};
use super::registry::paths;

// ================================================================================================
// Impl Macros
// ================================================================================================

/// Validated string newtypes: tagged record with a single `value` field,
/// re-validated through `parse` on decode.
macro_rules! impl_wire_scalar_str {
    ($type:ty, $path:expr) => {
        impl WireEncode for $type {
            fn encode(&self) -> Value {
                RecordBuilder::new($path)
                    .field("value", Value::String(self.as_str().to_string()))
                    .build()
            }
        }

        impl WireDecode for $type {
            fn decode(value: &Value) -> Result<Self, CodecError> {
                let fields = Fields::expect(value, $path)?;
                let raw = decode::string(fields.required("value")?, $path)?;
                Ok(<$type>::parse(raw)?)
            }
        }
    };
}

/// Validated decimal newtypes: same shape, decimal-tagged payload.
macro_rules! impl_wire_scalar_decimal {
    ($type:ty, $path:expr) => {
        impl WireEncode for $type {
            fn encode(&self) -> Value {
                RecordBuilder::new($path)
                    .field("value", encode::decimal(self.value()))
                    .build()
            }
        }

        impl WireDecode for $type {
            fn decode(value: &Value) -> Result<Self, CodecError> {
                let fields = Fields::expect(value, $path)?;
                let raw = decode::decimal(fields.required("value")?, $path)?;
                Ok(<$type>::parse(raw)?)
            }
        }
    };
}

/// Enums travel as their wire string, no tag.
macro_rules! impl_wire_enum {
    ($type:ty, $name:literal) => {
        impl WireEncode for $type {
            fn encode(&self) -> Value {
                Value::String(self.to_string())
            }
        }

        impl WireDecode for $type {
            fn decode(value: &Value) -> Result<Self, CodecError> {
                let raw = decode::string(value, $name)?;
                raw.parse().map_err(|_| CodecError::UnknownEnumValue {
                    type_name: $name,
                    value: raw.to_string(),
                })
            }
        }
    };
}

// ================================================================================================
// Domain Scalars
// ================================================================================================

impl_wire_scalar_str!(Lei, paths::LEI);
impl_wire_scalar_str!(Uti, paths::UTI);
impl_wire_scalar_str!(Isin, paths::ISIN);
impl_wire_scalar_str!(NonEmptyStr, paths::NON_EMPTY_STR);
impl_wire_scalar_str!(CurrencyCode, paths::CURRENCY_CODE);
impl_wire_scalar_str!(IdempotencyKey, paths::IDEMPOTENCY_KEY);

impl_wire_scalar_decimal!(PositiveDecimal, paths::POSITIVE_DECIMAL);
impl_wire_scalar_decimal!(NonNegativeDecimal, paths::NON_NEGATIVE_DECIMAL);
impl_wire_scalar_decimal!(NonZeroDecimal, paths::NON_ZERO_DECIMAL);

impl_wire_enum!(OrderSide, "OrderSide");
impl_wire_enum!(OptionType, "OptionType");
impl_wire_enum!(OptionStyle, "OptionStyle");
impl_wire_enum!(SettlementType, "SettlementType");
impl_wire_enum!(DayCount, "DayCount");
impl_wire_enum!(PaymentFrequency, "PaymentFrequency");
impl_wire_enum!(PositionStatus, "PositionStatus");
impl_wire_enum!(ClientAction, "ClientAction");
impl_wire_enum!(RfqOutcome, "RfqOutcome");

impl WireEncode for UtcDatetime {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::UTC_DATETIME)
            .field("value", encode::datetime(*self))
            .build()
    }
}

impl WireDecode for UtcDatetime {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::UTC_DATETIME)?;
        decode::datetime(fields.required("value")?, paths::UTC_DATETIME)
    }
}

impl WireEncode for Money {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::MONEY)
            .field("amount", encode::decimal(self.amount()))
            .field("currency", self.currency().encode())
            .build()
    }
}

impl WireDecode for Money {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::MONEY)?;
        let amount = decode::decimal(fields.required("amount")?, paths::MONEY)?;
        let currency = CurrencyCode::decode(fields.required("currency")?)?;
        Ok(Money::from_parts(amount, currency))
    }
}

/// Entries travel as an array of pairs: a JSON object would re-sort the
/// keys and lose the map's insertion order.
impl WireEncode for FrozenMap<Decimal> {
    fn encode(&self) -> Value {
        let entries: Vec<Value> = self
            .iter()
            .map(|(k, v)| Value::Array(vec![Value::String(k.to_string()), encode::decimal(*v)]))
            .collect();
        RecordBuilder::new(paths::FROZEN_MAP)
            .field("entries", Value::Array(entries))
            .build()
    }
}

impl WireDecode for FrozenMap<Decimal> {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::FROZEN_MAP)?;
        let raw = decode::array(fields.required("entries")?, paths::FROZEN_MAP)?;
        let mut entries = Vec::with_capacity(raw.len());
        for pair in raw {
            let pair = decode::array(pair, paths::FROZEN_MAP)?;
            let [key, val] = pair else {
                return Err(CodecError::InvalidValue {
                    context: paths::FROZEN_MAP,
                    message: format!("expected [key, value] pairs, got {pair:?}"),
                });
            };
            entries.push((
                decode::string(key, paths::FROZEN_MAP)?.to_string(),
                decode::decimal(val, paths::FROZEN_MAP)?,
            ));
        }
        Ok(FrozenMap::from_entries(entries)?)
    }
}

// ================================================================================================
// Instrument Details
// ================================================================================================

impl WireEncode for EquityDetail {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::EQUITY_DETAIL)
            .field("underlying_id", self.underlying_id().encode())
            .build()
    }
}

impl WireDecode for EquityDetail {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::EQUITY_DETAIL)?;
        Ok(EquityDetail::new(NonEmptyStr::decode(
            fields.required("underlying_id")?,
        )?))
    }
}

impl WireEncode for OptionDetail {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::OPTION_DETAIL)
            .field("strike", self.strike().encode())
            .field("expiry_date", encode::date(self.expiry_date()))
            .field("option_type", self.option_type().encode())
            .field("option_style", self.option_style().encode())
            .field("settlement_type", self.settlement_type().encode())
            .field("underlying_id", self.underlying_id().encode())
            .build()
    }
}

impl WireDecode for OptionDetail {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::OPTION_DETAIL)?;
        Ok(OptionDetail::new(
            NonNegativeDecimal::decode(fields.required("strike")?)?,
            decode::date(fields.required("expiry_date")?, paths::OPTION_DETAIL)?,
            OptionType::decode(fields.required("option_type")?)?,
            OptionStyle::decode(fields.required("option_style")?)?,
            SettlementType::decode(fields.required("settlement_type")?)?,
            NonEmptyStr::decode(fields.required("underlying_id")?)?,
        ))
    }
}

impl WireEncode for FuturesDetail {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::FUTURES_DETAIL)
            .field("expiry_date", encode::date(self.expiry_date()))
            .field("last_trading_date", encode::date(self.last_trading_date()))
            .field("contract_size", self.contract_size().encode())
            .field("settlement_type", self.settlement_type().encode())
            .build()
    }
}

impl WireDecode for FuturesDetail {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::FUTURES_DETAIL)?;
        Ok(FuturesDetail::new(
            decode::date(fields.required("expiry_date")?, paths::FUTURES_DETAIL)?,
            decode::date(fields.required("last_trading_date")?, paths::FUTURES_DETAIL)?,
            PositiveDecimal::decode(fields.required("contract_size")?)?,
            SettlementType::decode(fields.required("settlement_type")?)?,
        )?)
    }
}

impl WireEncode for CurrencyPair {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::CURRENCY_PAIR)
            .field("base", self.base().encode())
            .field("quote", self.quote().encode())
            .build()
    }
}

impl WireDecode for CurrencyPair {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::CURRENCY_PAIR)?;
        Ok(CurrencyPair::new(
            CurrencyCode::decode(fields.required("base")?)?,
            CurrencyCode::decode(fields.required("quote")?)?,
        )?)
    }
}

impl WireEncode for FxDetail {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::FX_DETAIL)
            .field("currency_pair", self.currency_pair().encode())
            .field("settlement_date", encode::date(self.settlement_date()))
            .field("settlement_type", self.settlement_type().encode())
            .opt("forward_rate", self.forward_rate().map(|r| r.encode()))
            .opt("fixing_date", self.fixing_date().map(encode::date))
            .build()
    }
}

impl WireDecode for FxDetail {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::FX_DETAIL)?;
        let forward_rate = fields
            .optional("forward_rate")
            .map(NonZeroDecimal::decode)
            .transpose()?;
        let fixing_date = fields
            .optional("fixing_date")
            .map(|v| decode::date(v, paths::FX_DETAIL))
            .transpose()?;
        Ok(FxDetail::from_parts(
            CurrencyPair::decode(fields.required("currency_pair")?)?,
            decode::date(fields.required("settlement_date")?, paths::FX_DETAIL)?,
            SettlementType::decode(fields.required("settlement_type")?)?,
            forward_rate,
            fixing_date,
        )?)
    }
}

impl WireEncode for IrSwapDetail {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::IR_SWAP_DETAIL)
            .field("fixed_rate", encode::decimal(self.fixed_rate()))
            .field("floating_index", self.floating_index().encode())
            .field("day_count", self.day_count().encode())
            .field("payment_frequency", self.payment_frequency().encode())
            .field("tenor_months", Value::from(self.tenor_months()))
            .field("start_date", encode::date(self.start_date()))
            .field("end_date", encode::date(self.end_date()))
            .build()
    }
}

impl WireDecode for IrSwapDetail {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::IR_SWAP_DETAIL)?;
        Ok(IrSwapDetail::new(
            decode::decimal(fields.required("fixed_rate")?, paths::IR_SWAP_DETAIL)?,
            NonEmptyStr::decode(fields.required("floating_index")?)?,
            DayCount::decode(fields.required("day_count")?)?,
            PaymentFrequency::decode(fields.required("payment_frequency")?)?,
            decode::u32(fields.required("tenor_months")?, paths::IR_SWAP_DETAIL)?,
            decode::date(fields.required("start_date")?, paths::IR_SWAP_DETAIL)?,
            decode::date(fields.required("end_date")?, paths::IR_SWAP_DETAIL)?,
        )?)
    }
}

impl WireEncode for SwaptionDetail {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::SWAPTION_DETAIL)
            .field("option_expiry", encode::date(self.option_expiry()))
            .field("option_style", self.option_style().encode())
            .field("swap", self.swap().encode())
            .build()
    }
}

impl WireDecode for SwaptionDetail {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::SWAPTION_DETAIL)?;
        Ok(SwaptionDetail::new(
            decode::date(fields.required("option_expiry")?, paths::SWAPTION_DETAIL)?,
            OptionStyle::decode(fields.required("option_style")?)?,
            IrSwapDetail::decode(fields.required("swap")?)?,
        )?)
    }
}

impl WireEncode for CdsDetail {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::CDS_DETAIL)
            .field("reference_entity", self.reference_entity().encode())
            .field("spread_bps", self.spread_bps().encode())
            .field("effective_date", encode::date(self.effective_date()))
            .field(
                "scheduled_termination_date",
                encode::date(self.scheduled_termination_date()),
            )
            .build()
    }
}

impl WireDecode for CdsDetail {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::CDS_DETAIL)?;
        Ok(CdsDetail::new(
            NonEmptyStr::decode(fields.required("reference_entity")?)?,
            NonNegativeDecimal::decode(fields.required("spread_bps")?)?,
            decode::date(fields.required("effective_date")?, paths::CDS_DETAIL)?,
            decode::date(
                fields.required("scheduled_termination_date")?,
                paths::CDS_DETAIL,
            )?,
        )?)
    }
}

/// The union travels as whichever variant it holds; the tag is the
/// discriminator.
impl WireEncode for InstrumentDetail {
    fn encode(&self) -> Value {
        match self {
            InstrumentDetail::Equity(d) => d.encode(),
            InstrumentDetail::Option(d) => d.encode(),
            InstrumentDetail::Futures(d) => d.encode(),
            InstrumentDetail::Fx(d) => d.encode(),
            InstrumentDetail::IrSwap(d) => d.encode(),
            InstrumentDetail::Swaption(d) => d.encode(),
            InstrumentDetail::Cds(d) => d.encode(),
        }
    }
}

impl WireDecode for InstrumentDetail {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        match decode::tag_of(value) {
            Some(paths::EQUITY_DETAIL) => Ok(Self::Equity(EquityDetail::decode(value)?)),
            Some(paths::OPTION_DETAIL) => Ok(Self::Option(OptionDetail::decode(value)?)),
            Some(paths::FUTURES_DETAIL) => Ok(Self::Futures(FuturesDetail::decode(value)?)),
            Some(paths::FX_DETAIL) => Ok(Self::Fx(FxDetail::decode(value)?)),
            Some(paths::IR_SWAP_DETAIL) => Ok(Self::IrSwap(IrSwapDetail::decode(value)?)),
            Some(paths::SWAPTION_DETAIL) => Ok(Self::Swaption(SwaptionDetail::decode(value)?)),
            Some(paths::CDS_DETAIL) => Ok(Self::Cds(CdsDetail::decode(value)?)),
            Some(other) => Err(CodecError::DisallowedType(other.to_string())),
            None => Err(CodecError::InvalidValue {
                context: "InstrumentDetail",
                message: format!("expected a tagged instrument variant, got {value}"),
            }),
        }
    }
}

// ================================================================================================
// Product Model
// ================================================================================================

impl WireEncode for Party {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::PARTY)
            .field("party_id", self.party_id().encode())
            .field("name", self.name().encode())
            .field("lei", self.lei().encode())
            .build()
    }
}

impl WireDecode for Party {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::PARTY)?;
        Ok(Party::new(
            NonEmptyStr::decode(fields.required("party_id")?)?,
            NonEmptyStr::decode(fields.required("name")?)?,
            Lei::decode(fields.required("lei")?)?,
        ))
    }
}

impl WireEncode for EquityPayoutSpec {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::EQUITY_PAYOUT_SPEC)
            .field("instrument_id", self.instrument_id().encode())
            .field("currency", self.currency().encode())
            .field("exchange", self.exchange().encode())
            .build()
    }
}

impl WireDecode for EquityPayoutSpec {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::EQUITY_PAYOUT_SPEC)?;
        let instrument_id = NonEmptyStr::decode(fields.required("instrument_id")?)?;
        let currency = NonEmptyStr::decode(fields.required("currency")?)?;
        let exchange = NonEmptyStr::decode(fields.required("exchange")?)?;
        Ok(EquityPayoutSpec::create(
            instrument_id.as_str(),
            currency.as_str(),
            exchange.as_str(),
        )?)
    }
}

impl WireEncode for PayoutSpec {
    fn encode(&self) -> Value {
        match self {
            PayoutSpec::Equity(spec) => spec.encode(),
        }
    }
}

impl WireDecode for PayoutSpec {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        match decode::tag_of(value) {
            Some(paths::EQUITY_PAYOUT_SPEC) => {
                Ok(PayoutSpec::Equity(EquityPayoutSpec::decode(value)?))
            }
            Some(other) => Err(CodecError::DisallowedType(other.to_string())),
            None => Err(CodecError::InvalidValue {
                context: "PayoutSpec",
                message: format!("expected a tagged payout variant, got {value}"),
            }),
        }
    }
}

impl WireEncode for EconomicTerms {
    fn encode(&self) -> Value {
        let payouts: Vec<Value> = self.payouts().iter().map(WireEncode::encode).collect();
        RecordBuilder::new(paths::ECONOMIC_TERMS)
            .field("payouts", Value::Array(payouts))
            .field("effective_date", encode::date(self.effective_date()))
            .opt("termination_date", self.termination_date().map(encode::date))
            .build()
    }
}

impl WireDecode for EconomicTerms {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::ECONOMIC_TERMS)?;
        let payouts = decode::array(fields.required("payouts")?, paths::ECONOMIC_TERMS)?
            .iter()
            .map(PayoutSpec::decode)
            .collect::<Result<Vec<_>, _>>()?;
        let termination_date = fields
            .optional("termination_date")
            .map(|v| decode::date(v, paths::ECONOMIC_TERMS))
            .transpose()?;
        Ok(EconomicTerms::new(
            payouts,
            decode::date(fields.required("effective_date")?, paths::ECONOMIC_TERMS)?,
            termination_date,
        )?)
    }
}

impl WireEncode for Product {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::PRODUCT)
            .field("economic_terms", self.economic_terms().encode())
            .build()
    }
}

impl WireDecode for Product {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::PRODUCT)?;
        Ok(Product::new(EconomicTerms::decode(
            fields.required("economic_terms")?,
        )?))
    }
}

// ================================================================================================
// Attestation Confidence
// ================================================================================================

impl WireEncode for Confidence {
    fn encode(&self) -> Value {
        match self {
            Confidence::Firm {
                source,
                attestation_ref,
            } => RecordBuilder::new(paths::FIRM_CONFIDENCE)
                .field("source", source.encode())
                .field("attestation_ref", attestation_ref.encode())
                .build(),
            Confidence::Derived {
                method,
                config_ref,
                fit_quality,
            } => RecordBuilder::new(paths::DERIVED_CONFIDENCE)
                .field("method", method.encode())
                .field("config_ref", config_ref.encode())
                .field("fit_quality", fit_quality.encode())
                .build(),
        }
    }
}

impl WireDecode for Confidence {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        match decode::tag_of(value) {
            Some(paths::FIRM_CONFIDENCE) => {
                let fields = Fields::expect(value, paths::FIRM_CONFIDENCE)?;
                Ok(Confidence::Firm {
                    source: NonEmptyStr::decode(fields.required("source")?)?,
                    attestation_ref: NonEmptyStr::decode(fields.required("attestation_ref")?)?,
                })
            }
            Some(paths::DERIVED_CONFIDENCE) => {
                let fields = Fields::expect(value, paths::DERIVED_CONFIDENCE)?;
                Ok(Confidence::Derived {
                    method: NonEmptyStr::decode(fields.required("method")?)?,
                    config_ref: NonEmptyStr::decode(fields.required("config_ref")?)?,
                    fit_quality: FrozenMap::decode(fields.required("fit_quality")?)?,
                })
            }
            Some(other) => Err(CodecError::DisallowedType(other.to_string())),
            None => Err(CodecError::InvalidValue {
                context: "Confidence",
                message: format!("expected a tagged confidence variant, got {value}"),
            }),
        }
    }
}

// ================================================================================================
// Workflow Records
// ================================================================================================

impl WireEncode for RfqInput {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::RFQ_INPUT)
            .field("rfq_id", self.rfq_id().encode())
            .field("client_lei", self.client_lei().encode())
            .field("instrument_detail", self.instrument_detail().encode())
            .field("notional", self.notional().encode())
            .field("currency", self.currency().encode())
            .field("side", self.side().encode())
            .field("trade_date", encode::date(self.trade_date()))
            .field("settlement_date", encode::date(self.settlement_date()))
            .field("timestamp", self.timestamp().encode())
            .build()
    }
}

impl WireDecode for RfqInput {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::RFQ_INPUT)?;
        Ok(RfqInput::new(
            NonEmptyStr::decode(fields.required("rfq_id")?)?,
            Lei::decode(fields.required("client_lei")?)?,
            InstrumentDetail::decode(fields.required("instrument_detail")?)?,
            PositiveDecimal::decode(fields.required("notional")?)?,
            CurrencyCode::decode(fields.required("currency")?)?,
            OrderSide::decode(fields.required("side")?)?,
            decode::date(fields.required("trade_date")?, paths::RFQ_INPUT)?,
            decode::date(fields.required("settlement_date")?, paths::RFQ_INPUT)?,
            UtcDatetime::decode(fields.required("timestamp")?)?,
        )?)
    }
}

/// Output wrappers hold exactly one of result or error; a payload with
/// both or neither is structurally invalid and refused here.
macro_rules! impl_wire_output {
    ($type:ty, $path:expr, $result_field:literal, $inner:ty) => {
        impl WireEncode for $type {
            fn encode(&self) -> Value {
                RecordBuilder::new($path)
                    .opt($result_field, self.result_value())
                    .opt("error", self.error().map(|e| Value::String(e.to_string())))
                    .build()
            }
        }

        impl WireDecode for $type {
            fn decode(value: &Value) -> Result<Self, CodecError> {
                let fields = Fields::expect(value, $path)?;
                let result = fields
                    .optional($result_field)
                    .map(<$inner>::decode)
                    .transpose()?;
                let error = fields
                    .optional("error")
                    .map(|v| decode::string(v, $path).map(str::to_string))
                    .transpose()?;
                match (result, error) {
                    (Some(r), None) => Ok(Self::ok(r)),
                    (None, Some(e)) => Ok(Self::err(e)),
                    _ => Err(CodecError::InvalidValue {
                        context: $path,
                        message: concat!(
                            "exactly one of ",
                            $result_field,
                            " or error must be present"
                        )
                        .to_string(),
                    }),
                }
            }
        }
    };
}

impl MappingOutput {
    fn result_value(&self) -> Option<Value> {
        self.product().map(WireEncode::encode)
    }
}

impl PricingOutput {
    fn result_value(&self) -> Option<Value> {
        self.result().map(WireEncode::encode)
    }
}

impl BookingOutput {
    fn result_value(&self) -> Option<Value> {
        self.result().map(WireEncode::encode)
    }
}

impl_wire_output!(MappingOutput, paths::MAPPING_OUTPUT, "product", Product);
impl_wire_output!(PricingOutput, paths::PRICING_OUTPUT, "result", PricingResult);
impl_wire_output!(BookingOutput, paths::BOOKING_OUTPUT, "result", BookingResult);

impl WireEncode for PreTradeInput {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::PRE_TRADE_INPUT)
            .field("rfq", self.rfq().encode())
            .field("product", self.product().encode())
            .build()
    }
}

impl WireDecode for PreTradeInput {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::PRE_TRADE_INPUT)?;
        Ok(PreTradeInput::new(
            RfqInput::decode(fields.required("rfq")?)?,
            Product::decode(fields.required("product")?)?,
        ))
    }
}

impl WireEncode for CheckReport {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::CHECK_REPORT)
            .field("name", self.name().encode())
            .opt("reason", self.reason().map(|r| Value::String(r.to_string())))
            .build()
    }
}

impl WireDecode for CheckReport {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::CHECK_REPORT)?;
        let name = NonEmptyStr::decode(fields.required("name")?)?;
        match fields.optional("reason") {
            None => Ok(CheckReport::passed(name)),
            Some(v) => Ok(CheckReport::failed(
                name,
                decode::string(v, paths::CHECK_REPORT)?,
            )),
        }
    }
}

impl WireEncode for PreTradeCheckResult {
    fn encode(&self) -> Value {
        let reports: Vec<Value> = self.reports().iter().map(WireEncode::encode).collect();
        RecordBuilder::new(paths::PRE_TRADE_CHECK_RESULT)
            .field("reports", Value::Array(reports))
            .build()
    }
}

impl WireDecode for PreTradeCheckResult {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::PRE_TRADE_CHECK_RESULT)?;
        let reports = decode::array(fields.required("reports")?, paths::PRE_TRADE_CHECK_RESULT)?
            .iter()
            .map(CheckReport::decode)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PreTradeCheckResult::new(reports))
    }
}

impl WireEncode for PricingInput {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::PRICING_INPUT)
            .field("rfq", self.rfq().encode())
            .field("product", self.product().encode())
            .build()
    }
}

impl WireDecode for PricingInput {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::PRICING_INPUT)?;
        Ok(PricingInput::new(
            RfqInput::decode(fields.required("rfq")?)?,
            Product::decode(fields.required("product")?)?,
        ))
    }
}

impl WireEncode for PricingResult {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::PRICING_RESULT)
            .field("indicative_price", self.indicative_price().encode())
            .field("greeks", self.greeks().encode())
            .field("model_name", self.model_name().encode())
            .field(
                "market_data_snapshot_id",
                self.market_data_snapshot_id().encode(),
            )
            .field("confidence", self.confidence().encode())
            .field(
                "pricing_attestation_id",
                self.pricing_attestation_id().encode(),
            )
            .field("timestamp", self.timestamp().encode())
            .build()
    }
}

impl WireDecode for PricingResult {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::PRICING_RESULT)?;
        Ok(PricingResult::new(
            Money::decode(fields.required("indicative_price")?)?,
            FrozenMap::decode(fields.required("greeks")?)?,
            NonEmptyStr::decode(fields.required("model_name")?)?,
            NonEmptyStr::decode(fields.required("market_data_snapshot_id")?)?,
            Confidence::decode(fields.required("confidence")?)?,
            NonEmptyStr::decode(fields.required("pricing_attestation_id")?)?,
            UtcDatetime::decode(fields.required("timestamp")?)?,
        ))
    }
}

impl WireEncode for IndicativeInput {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::INDICATIVE_INPUT)
            .field("rfq", self.rfq().encode())
            .field("pricing", self.pricing().encode())
            .field("valid_for", encode::duration(self.valid_for()))
            .build()
    }
}

impl WireDecode for IndicativeInput {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::INDICATIVE_INPUT)?;
        Ok(IndicativeInput::new(
            RfqInput::decode(fields.required("rfq")?)?,
            PricingResult::decode(fields.required("pricing")?)?,
            decode::duration(fields.required("valid_for")?, paths::INDICATIVE_INPUT)?,
        ))
    }
}

impl WireEncode for TermSheet {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::TERM_SHEET)
            .field("rfq_id", self.rfq_id().encode())
            .field("pricing_result", self.pricing_result().encode())
            .field("document_hash", self.document_hash().encode())
            .field("valid_until", self.valid_until().encode())
            .field("generated_at", self.generated_at().encode())
            .build()
    }
}

impl WireDecode for TermSheet {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::TERM_SHEET)?;
        Ok(TermSheet::new(
            NonEmptyStr::decode(fields.required("rfq_id")?)?,
            PricingResult::decode(fields.required("pricing_result")?)?,
            NonEmptyStr::decode(fields.required("document_hash")?)?,
            UtcDatetime::decode(fields.required("valid_until")?)?,
            UtcDatetime::decode(fields.required("generated_at")?)?,
        )?)
    }
}

impl WireEncode for ClientResponse {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::CLIENT_RESPONSE)
            .field("rfq_id", self.rfq_id().encode())
            .field("action", self.action().encode())
            .field("timestamp", self.timestamp().encode())
            .opt(
                "term_sheet_hash",
                self.term_sheet_hash().map(WireEncode::encode),
            )
            .opt("message", self.message().map(|m| Value::String(m.to_string())))
            .build()
    }
}

impl WireDecode for ClientResponse {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::CLIENT_RESPONSE)?;
        let term_sheet_hash = fields
            .optional("term_sheet_hash")
            .map(NonEmptyStr::decode)
            .transpose()?;
        let message = fields
            .optional("message")
            .map(|v| decode::string(v, paths::CLIENT_RESPONSE).map(str::to_string))
            .transpose()?;
        Ok(ClientResponse::new(
            NonEmptyStr::decode(fields.required("rfq_id")?)?,
            ClientAction::decode(fields.required("action")?)?,
            UtcDatetime::decode(fields.required("timestamp")?)?,
            term_sheet_hash,
            message,
        )?)
    }
}

impl WireEncode for BookingInput {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::BOOKING_INPUT)
            .field("rfq", self.rfq().encode())
            .field("product", self.product().encode())
            .field("pricing", self.pricing().encode())
            .field("accepted_price", self.accepted_price().encode())
            .build()
    }
}

impl WireDecode for BookingInput {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::BOOKING_INPUT)?;
        Ok(BookingInput::new(
            RfqInput::decode(fields.required("rfq")?)?,
            Product::decode(fields.required("product")?)?,
            PricingResult::decode(fields.required("pricing")?)?,
            Money::decode(fields.required("accepted_price")?)?,
        ))
    }
}

impl WireEncode for BookingResult {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::BOOKING_RESULT)
            .field("trade_id", self.trade_id().encode())
            .build()
    }
}

impl WireDecode for BookingResult {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::BOOKING_RESULT)?;
        Ok(BookingResult::new(NonEmptyStr::decode(
            fields.required("trade_id")?,
        )?))
    }
}

impl WireEncode for ConfirmationInput {
    fn encode(&self) -> Value {
        RecordBuilder::new(paths::CONFIRMATION_INPUT)
            .field("rfq", self.rfq().encode())
            .field("trade_result", self.trade_result().encode())
            .field("term_sheet", self.term_sheet().encode())
            .build()
    }
}

impl WireDecode for ConfirmationInput {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::CONFIRMATION_INPUT)?;
        Ok(ConfirmationInput::new(
            RfqInput::decode(fields.required("rfq")?)?,
            BookingResult::decode(fields.required("trade_result")?)?,
            TermSheet::decode(fields.required("term_sheet")?)?,
        ))
    }
}

impl WireEncode for RfqResult {
    fn encode(&self) -> Value {
        let reasons: Vec<Value> = self
            .rejection_reasons()
            .iter()
            .map(|r| Value::String(r.clone()))
            .collect();
        RecordBuilder::new(paths::RFQ_RESULT)
            .field("rfq_id", self.rfq_id().encode())
            .field("outcome", self.outcome().encode())
            .opt("trade_id", self.trade_id().map(WireEncode::encode))
            .field("rejection_reasons", Value::Array(reasons))
            .opt(
                "pricing_attestation_id",
                self.pricing_attestation_id().map(WireEncode::encode),
            )
            .build()
    }
}

impl WireDecode for RfqResult {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        let fields = Fields::expect(value, paths::RFQ_RESULT)?;
        let trade_id = fields
            .optional("trade_id")
            .map(NonEmptyStr::decode)
            .transpose()?;
        let pricing_attestation_id = fields
            .optional("pricing_attestation_id")
            .map(NonEmptyStr::decode)
            .transpose()?;
        // Missing reasons default to the empty list (forward compat).
        let rejection_reasons = match fields.optional("rejection_reasons") {
            None => vec![],
            Some(v) => decode::array(v, paths::RFQ_RESULT)?
                .iter()
                .map(|r| decode::string(r, paths::RFQ_RESULT).map(str::to_string))
                .collect::<Result<Vec<_>, _>>()?,
        };
        Ok(RfqResult::new(
            NonEmptyStr::decode(fields.required("rfq_id")?)?,
            RfqOutcome::decode(fields.required("outcome")?)?,
            trade_id,
            rejection_reasons,
            pricing_attestation_id,
        )?)
    }
}

/// Encode-only: the canonical order is hashed for UTI derivation and
/// report attestation, never transported through the durable layer, so
/// its path stays off the allow-list.
impl WireEncode for crate::gateway::CanonicalOrder {
    fn encode(&self) -> Value {
        RecordBuilder::new("dealdesk.gateway.CanonicalOrder")
            .field("executing_party_lei", self.executing_party_lei().encode())
            .field("counterparty_lei", self.counterparty_lei().encode())
            .field("instrument_id", self.instrument_id().encode())
            .opt("isin", self.isin().map(WireEncode::encode))
            .field("instrument_detail", self.instrument_detail().encode())
            .field("side", self.side().encode())
            .field("quantity", self.quantity().encode())
            .field("price", encode::decimal(self.price()))
            .field("currency", self.currency().encode())
            .field("trade_date", encode::date(self.trade_date()))
            .field("settlement_date", encode::date(self.settlement_date()))
            .field("venue", self.venue().encode())
            .field("timestamp", self.timestamp().encode())
            .build()
    }
}

/// Confirmation delivery has no payload; its recorded output is null.
impl WireEncode for () {
    fn encode(&self) -> Value {
        Value::Null
    }
}

impl WireDecode for () {
    fn decode(value: &Value) -> Result<Self, CodecError> {
        if value.is_null() {
            Ok(())
        } else {
            Err(CodecError::InvalidValue {
                context: "unit",
                message: format!("expected null, got {value}"),
            })
        }
    }
}
