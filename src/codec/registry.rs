use std::collections::HashSet;
use std::sync::LazyLock;

use serde_json::Value;

use crate::error::CodecError;

use super::decode::WireDecode;

/// Dotted type paths pinned as the wire contract. Renaming a Rust type
/// must not change its path here, or old histories stop decoding.
pub mod paths {
    pub const LEI: &str = "dealdesk.domain.identifiers.Lei";
    pub const UTI: &str = "dealdesk.domain.identifiers.Uti";
    pub const ISIN: &str = "dealdesk.domain.identifiers.Isin";

    pub const NON_EMPTY_STR: &str = "dealdesk.domain.money.NonEmptyStr";
    pub const POSITIVE_DECIMAL: &str = "dealdesk.domain.money.PositiveDecimal";
    pub const NON_NEGATIVE_DECIMAL: &str = "dealdesk.domain.money.NonNegativeDecimal";
    pub const NON_ZERO_DECIMAL: &str = "dealdesk.domain.money.NonZeroDecimal";
    pub const CURRENCY_CODE: &str = "dealdesk.domain.money.CurrencyCode";
    pub const MONEY: &str = "dealdesk.domain.money.Money";

    pub const UTC_DATETIME: &str = "dealdesk.domain.time.UtcDatetime";
    pub const IDEMPOTENCY_KEY: &str = "dealdesk.domain.time.IdempotencyKey";
    pub const FROZEN_MAP: &str = "dealdesk.domain.frozen_map.FrozenMap";

    pub const EQUITY_DETAIL: &str = "dealdesk.instrument.detail.EquityDetail";
    pub const OPTION_DETAIL: &str = "dealdesk.instrument.detail.OptionDetail";
    pub const FUTURES_DETAIL: &str = "dealdesk.instrument.detail.FuturesDetail";
    pub const CURRENCY_PAIR: &str = "dealdesk.instrument.detail.CurrencyPair";
    pub const FX_DETAIL: &str = "dealdesk.instrument.detail.FxDetail";
    pub const IR_SWAP_DETAIL: &str = "dealdesk.instrument.detail.IrSwapDetail";
    pub const SWAPTION_DETAIL: &str = "dealdesk.instrument.detail.SwaptionDetail";
    pub const CDS_DETAIL: &str = "dealdesk.instrument.detail.CdsDetail";

    pub const PARTY: &str = "dealdesk.instrument.product.Party";
    pub const EQUITY_PAYOUT_SPEC: &str = "dealdesk.instrument.product.EquityPayoutSpec";
    pub const ECONOMIC_TERMS: &str = "dealdesk.instrument.product.EconomicTerms";
    pub const PRODUCT: &str = "dealdesk.instrument.product.Product";

    pub const FIRM_CONFIDENCE: &str = "dealdesk.attestation.FirmConfidence";
    pub const DERIVED_CONFIDENCE: &str = "dealdesk.attestation.DerivedConfidence";

    pub const RFQ_INPUT: &str = "dealdesk.workflow.types.RfqInput";
    pub const MAPPING_OUTPUT: &str = "dealdesk.workflow.types.MappingOutput";
    pub const PRE_TRADE_INPUT: &str = "dealdesk.workflow.types.PreTradeInput";
    pub const CHECK_REPORT: &str = "dealdesk.workflow.types.CheckReport";
    pub const PRE_TRADE_CHECK_RESULT: &str = "dealdesk.workflow.types.PreTradeCheckResult";
    pub const PRICING_INPUT: &str = "dealdesk.workflow.types.PricingInput";
    pub const PRICING_RESULT: &str = "dealdesk.workflow.types.PricingResult";
    pub const PRICING_OUTPUT: &str = "dealdesk.workflow.types.PricingOutput";
    pub const INDICATIVE_INPUT: &str = "dealdesk.workflow.types.IndicativeInput";
    pub const TERM_SHEET: &str = "dealdesk.workflow.types.TermSheet";
    pub const CLIENT_RESPONSE: &str = "dealdesk.workflow.types.ClientResponse";
    pub const BOOKING_INPUT: &str = "dealdesk.workflow.types.BookingInput";
    pub const BOOKING_RESULT: &str = "dealdesk.workflow.types.BookingResult";
    pub const BOOKING_OUTPUT: &str = "dealdesk.workflow.types.BookingOutput";
    pub const CONFIRMATION_INPUT: &str = "dealdesk.workflow.types.ConfirmationInput";
    pub const RFQ_RESULT: &str = "dealdesk.workflow.types.RfqResult";
}

/// The closed set of decodable type paths. Anything tagged outside this
/// set is refused before any constructor runs.
static ALLOW_LIST: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    use paths::*;
    HashSet::from([
        LEI,
        UTI,
        ISIN,
        NON_EMPTY_STR,
        POSITIVE_DECIMAL,
        NON_NEGATIVE_DECIMAL,
        NON_ZERO_DECIMAL,
        CURRENCY_CODE,
        MONEY,
        UTC_DATETIME,
        IDEMPOTENCY_KEY,
        FROZEN_MAP,
        EQUITY_DETAIL,
        OPTION_DETAIL,
        FUTURES_DETAIL,
        CURRENCY_PAIR,
        FX_DETAIL,
        IR_SWAP_DETAIL,
        SWAPTION_DETAIL,
        CDS_DETAIL,
        PARTY,
        EQUITY_PAYOUT_SPEC,
        ECONOMIC_TERMS,
        PRODUCT,
        FIRM_CONFIDENCE,
        DERIVED_CONFIDENCE,
        RFQ_INPUT,
        MAPPING_OUTPUT,
        PRE_TRADE_INPUT,
        CHECK_REPORT,
        PRE_TRADE_CHECK_RESULT,
        PRICING_INPUT,
        PRICING_RESULT,
        PRICING_OUTPUT,
        INDICATIVE_INPUT,
        TERM_SHEET,
        CLIENT_RESPONSE,
        BOOKING_INPUT,
        BOOKING_RESULT,
        BOOKING_OUTPUT,
        CONFIRMATION_INPUT,
        RFQ_RESULT,
    ])
});

pub fn is_allowed(path: &str) -> bool {
    ALLOW_LIST.contains(path)
}

/// Walk a payload and refuse any `__type__` tag outside the allow-list.
/// Runs before typed decoding so a hostile tag is rejected even when it
/// is buried in a field the decoder would never read.
pub fn verify_tags(value: &Value) -> Result<(), CodecError> {
    match value {
        Value::Object(map) => {
            if let Some(tag) = map.get("__type__") {
                let tag = tag.as_str().ok_or_else(|| CodecError::InvalidValue {
                    context: "__type__",
                    message: format!("tag must be a string, got {tag}"),
                })?;
                if !is_allowed(tag) {
                    return Err(CodecError::DisallowedType(tag.to_string()));
                }
            }
            map.values().try_for_each(verify_tags)
        }
        Value::Array(items) => items.iter().try_for_each(verify_tags),
        _ => Ok(()),
    }
}

/// Ingress decoding: allow-list scan, then the typed decode.
pub fn decode_checked<T: WireDecode>(value: &Value) -> Result<T, CodecError> {
    verify_tags(value)?;
    T::decode(value)
}
