use chrono::NaiveDate;
use rust_decimal::Decimal;
use strum::{Display, IntoStaticStr};
use strum_macros::EnumString;

use crate::domain::{CurrencyCode, NonEmptyStr, NonNegativeDecimal, NonZeroDecimal, PositiveDecimal};
use crate::error::DomainError;

// ================================================================================================
// Trade Economics Enums
// ================================================================================================

#[derive(Copy, Clone, Debug, Display, EnumString, IntoStaticStr, PartialEq, Eq, Hash)]
pub enum OptionType {
    Call,
    Put,
}

#[derive(Copy, Clone, Debug, Display, EnumString, IntoStaticStr, PartialEq, Eq, Hash)]
pub enum OptionStyle {
    American,
    European,
}

#[derive(Copy, Clone, Debug, Display, EnumString, IntoStaticStr, PartialEq, Eq, Hash)]
pub enum SettlementType {
    Cash,
    Physical,
}

#[derive(Copy, Clone, Debug, Display, EnumString, IntoStaticStr, PartialEq, Eq, Hash)]
pub enum DayCount {
    #[strum(serialize = "ACT/360")]
    Act360,
    #[strum(serialize = "ACT/365F")]
    Act365Fixed,
    #[strum(serialize = "30/360")]
    Thirty360,
}

#[derive(Copy, Clone, Debug, Display, EnumString, IntoStaticStr, PartialEq, Eq, Hash)]
pub enum PaymentFrequency {
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

/// Discriminant of [`InstrumentDetail`], used by registry qualifiers and
/// for log/wire labels.
#[derive(Copy, Clone, Debug, Display, EnumString, IntoStaticStr, PartialEq, Eq, Hash)]
pub enum InstrumentKind {
    Equity,
    Option,
    Futures,
    Fx,
    IrSwap,
    Swaption,
    Cds,
}

// ================================================================================================
// Per-Variant Detail Records
// ================================================================================================

/// Cash equity. No economics beyond the underlying reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquityDetail {
    underlying_id: NonEmptyStr,
}

impl EquityDetail {
    pub fn new(underlying_id: NonEmptyStr) -> Self {
        Self { underlying_id }
    }

    pub fn underlying_id(&self) -> &NonEmptyStr {
        &self.underlying_id
    }
}

/// Vanilla equity option. A zero strike is legal (zero-strike calls are a
/// standard delta-one wrapper); a negative strike is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDetail {
    strike: NonNegativeDecimal,
    expiry_date: NaiveDate,
    option_type: OptionType,
    option_style: OptionStyle,
    settlement_type: SettlementType,
    underlying_id: NonEmptyStr,
}

impl OptionDetail {
    pub fn new(
        strike: NonNegativeDecimal,
        expiry_date: NaiveDate,
        option_type: OptionType,
        option_style: OptionStyle,
        settlement_type: SettlementType,
        underlying_id: NonEmptyStr,
    ) -> Self {
        Self {
            strike,
            expiry_date,
            option_type,
            option_style,
            settlement_type,
            underlying_id,
        }
    }

    pub fn strike(&self) -> NonNegativeDecimal {
        self.strike
    }

    pub fn expiry_date(&self) -> NaiveDate {
        self.expiry_date
    }

    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    pub fn option_style(&self) -> OptionStyle {
        self.option_style
    }

    pub fn settlement_type(&self) -> SettlementType {
        self.settlement_type
    }

    pub fn underlying_id(&self) -> &NonEmptyStr {
        &self.underlying_id
    }
}

/// Listed future. Trading stops on or before expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuturesDetail {
    expiry_date: NaiveDate,
    last_trading_date: NaiveDate,
    contract_size: PositiveDecimal,
    settlement_type: SettlementType,
}

impl FuturesDetail {
    pub fn new(
        expiry_date: NaiveDate,
        last_trading_date: NaiveDate,
        contract_size: PositiveDecimal,
        settlement_type: SettlementType,
    ) -> Result<Self, DomainError> {
        if last_trading_date > expiry_date {
            return Err(DomainError::invariant(
                "FuturesDetail",
                format!(
                    "last_trading_date ({last_trading_date}) must be <= expiry_date ({expiry_date})"
                ),
            ));
        }
        Ok(Self {
            expiry_date,
            last_trading_date,
            contract_size,
            settlement_type,
        })
    }

    pub fn expiry_date(&self) -> NaiveDate {
        self.expiry_date
    }

    pub fn last_trading_date(&self) -> NaiveDate {
        self.last_trading_date
    }

    pub fn contract_size(&self) -> PositiveDecimal {
        self.contract_size
    }

    pub fn settlement_type(&self) -> SettlementType {
        self.settlement_type
    }
}

/// An FX currency pair. Base and quote must differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyPair {
    base: CurrencyCode,
    quote: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(base: CurrencyCode, quote: CurrencyCode) -> Result<Self, DomainError> {
        if base == quote {
            return Err(DomainError::invariant(
                "CurrencyPair",
                format!("base and quote must differ, both are {base}"),
            ));
        }
        Ok(Self { base, quote })
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    pub fn quote(&self) -> &CurrencyCode {
        &self.quote
    }
}

impl std::fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// FX spot, forward, or NDF.
///
/// Spot carries no forward rate. A forward carries one. An NDF carries a
/// forward rate plus a fixing date that must not fall after settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FxDetail {
    currency_pair: CurrencyPair,
    settlement_date: NaiveDate,
    settlement_type: SettlementType,
    forward_rate: Option<NonZeroDecimal>,
    fixing_date: Option<NaiveDate>,
}

impl FxDetail {
    pub fn spot(currency_pair: CurrencyPair, settlement_date: NaiveDate) -> Self {
        Self {
            currency_pair,
            settlement_date,
            settlement_type: SettlementType::Physical,
            forward_rate: None,
            fixing_date: None,
        }
    }

    pub fn forward(
        currency_pair: CurrencyPair,
        settlement_date: NaiveDate,
        forward_rate: NonZeroDecimal,
    ) -> Self {
        Self {
            currency_pair,
            settlement_date,
            settlement_type: SettlementType::Physical,
            forward_rate: Some(forward_rate),
            fixing_date: None,
        }
    }

    /// Non-deliverable forward: cash-settled against a fixing taken on or
    /// before the settlement date.
    pub fn ndf(
        currency_pair: CurrencyPair,
        settlement_date: NaiveDate,
        forward_rate: NonZeroDecimal,
        fixing_date: NaiveDate,
    ) -> Result<Self, DomainError> {
        if fixing_date > settlement_date {
            return Err(DomainError::invariant(
                "FxDetail",
                format!(
                    "fixing_date ({fixing_date}) must be <= settlement_date ({settlement_date})"
                ),
            ));
        }
        Ok(Self {
            currency_pair,
            settlement_date,
            settlement_type: SettlementType::Cash,
            forward_rate: Some(forward_rate),
            fixing_date: Some(fixing_date),
        })
    }

    /// Reassemble from already-validated parts (wire decode path). Runs
    /// the same fixing/settlement predicate as [`FxDetail::ndf`].
    pub fn from_parts(
        currency_pair: CurrencyPair,
        settlement_date: NaiveDate,
        settlement_type: SettlementType,
        forward_rate: Option<NonZeroDecimal>,
        fixing_date: Option<NaiveDate>,
    ) -> Result<Self, DomainError> {
        if let Some(fixing) = fixing_date
            && fixing > settlement_date
        {
            return Err(DomainError::invariant(
                "FxDetail",
                format!("fixing_date ({fixing}) must be <= settlement_date ({settlement_date})"),
            ));
        }
        Ok(Self {
            currency_pair,
            settlement_date,
            settlement_type,
            forward_rate,
            fixing_date,
        })
    }

    pub fn currency_pair(&self) -> &CurrencyPair {
        &self.currency_pair
    }

    pub fn settlement_date(&self) -> NaiveDate {
        self.settlement_date
    }

    pub fn settlement_type(&self) -> SettlementType {
        self.settlement_type
    }

    pub fn forward_rate(&self) -> Option<NonZeroDecimal> {
        self.forward_rate
    }

    pub fn fixing_date(&self) -> Option<NaiveDate> {
        self.fixing_date
    }

    pub fn is_ndf(&self) -> bool {
        self.fixing_date.is_some()
    }
}

/// Fixed-for-floating interest rate swap. The fixed rate is a plain
/// decimal: negative rates are a market reality, not a validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrSwapDetail {
    fixed_rate: Decimal,
    floating_index: NonEmptyStr,
    day_count: DayCount,
    payment_frequency: PaymentFrequency,
    tenor_months: u32,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl IrSwapDetail {
    pub fn new(
        fixed_rate: Decimal,
        floating_index: NonEmptyStr,
        day_count: DayCount,
        payment_frequency: PaymentFrequency,
        tenor_months: u32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, DomainError> {
        if tenor_months == 0 {
            return Err(DomainError::invariant(
                "IrSwapDetail",
                "tenor_months must be > 0",
            ));
        }
        if start_date >= end_date {
            return Err(DomainError::invariant(
                "IrSwapDetail",
                format!("start_date ({start_date}) must be < end_date ({end_date})"),
            ));
        }
        Ok(Self {
            fixed_rate,
            floating_index,
            day_count,
            payment_frequency,
            tenor_months,
            start_date,
            end_date,
        })
    }

    pub fn fixed_rate(&self) -> Decimal {
        self.fixed_rate
    }

    pub fn floating_index(&self) -> &NonEmptyStr {
        &self.floating_index
    }

    pub fn day_count(&self) -> DayCount {
        self.day_count
    }

    pub fn payment_frequency(&self) -> PaymentFrequency {
        self.payment_frequency
    }

    pub fn tenor_months(&self) -> u32 {
        self.tenor_months
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }
}

/// Option to enter the embedded swap. Exercise must not postdate the
/// swap's own start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwaptionDetail {
    option_expiry: NaiveDate,
    option_style: OptionStyle,
    swap: IrSwapDetail,
}

impl SwaptionDetail {
    pub fn new(
        option_expiry: NaiveDate,
        option_style: OptionStyle,
        swap: IrSwapDetail,
    ) -> Result<Self, DomainError> {
        if option_expiry > swap.start_date() {
            return Err(DomainError::invariant(
                "SwaptionDetail",
                format!(
                    "option_expiry ({option_expiry}) must be <= swap start_date ({})",
                    swap.start_date()
                ),
            ));
        }
        Ok(Self {
            option_expiry,
            option_style,
            swap,
        })
    }

    pub fn option_expiry(&self) -> NaiveDate {
        self.option_expiry
    }

    pub fn option_style(&self) -> OptionStyle {
        self.option_style
    }

    pub fn swap(&self) -> &IrSwapDetail {
        &self.swap
    }
}

/// Single-name credit default swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdsDetail {
    reference_entity: NonEmptyStr,
    spread_bps: NonNegativeDecimal,
    effective_date: NaiveDate,
    scheduled_termination_date: NaiveDate,
}

impl CdsDetail {
    pub fn new(
        reference_entity: NonEmptyStr,
        spread_bps: NonNegativeDecimal,
        effective_date: NaiveDate,
        scheduled_termination_date: NaiveDate,
    ) -> Result<Self, DomainError> {
        if effective_date >= scheduled_termination_date {
            return Err(DomainError::invariant(
                "CdsDetail",
                format!(
                    "effective_date ({effective_date}) must be < scheduled_termination_date ({scheduled_termination_date})"
                ),
            ));
        }
        Ok(Self {
            reference_entity,
            spread_bps,
            effective_date,
            scheduled_termination_date,
        })
    }

    pub fn reference_entity(&self) -> &NonEmptyStr {
        &self.reference_entity
    }

    pub fn spread_bps(&self) -> NonNegativeDecimal {
        self.spread_bps
    }

    pub fn effective_date(&self) -> NaiveDate {
        self.effective_date
    }

    pub fn scheduled_termination_date(&self) -> NaiveDate {
        self.scheduled_termination_date
    }
}

// ================================================================================================
// The Tagged Sum
// ================================================================================================

/// What the client actually wants a price on.
///
/// The orchestrator never matches on this — registries do, through
/// first-match qualifier predicates over [`InstrumentDetail::kind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstrumentDetail {
    Equity(EquityDetail),
    Option(OptionDetail),
    Futures(FuturesDetail),
    Fx(FxDetail),
    IrSwap(IrSwapDetail),
    Swaption(SwaptionDetail),
    Cds(CdsDetail),
}

impl InstrumentDetail {
    pub fn kind(&self) -> InstrumentKind {
        match self {
            InstrumentDetail::Equity(_) => InstrumentKind::Equity,
            InstrumentDetail::Option(_) => InstrumentKind::Option,
            InstrumentDetail::Futures(_) => InstrumentKind::Futures,
            InstrumentDetail::Fx(_) => InstrumentKind::Fx,
            InstrumentDetail::IrSwap(_) => InstrumentKind::IrSwap,
            InstrumentDetail::Swaption(_) => InstrumentKind::Swaption,
            InstrumentDetail::Cds(_) => InstrumentKind::Cds,
        }
    }

    /// Reference id of the underlying, where the variant has one.
    pub fn underlying_id(&self) -> Option<&NonEmptyStr> {
        match self {
            InstrumentDetail::Equity(d) => Some(d.underlying_id()),
            InstrumentDetail::Option(d) => Some(d.underlying_id()),
            InstrumentDetail::Cds(d) => Some(d.reference_entity()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn nes(s: &str) -> NonEmptyStr {
        NonEmptyStr::parse(s).unwrap()
    }

    fn pair(base: &str, quote: &str) -> CurrencyPair {
        CurrencyPair::new(
            CurrencyCode::parse(base).unwrap(),
            CurrencyCode::parse(quote).unwrap(),
        )
        .unwrap()
    }

    fn swap() -> IrSwapDetail {
        IrSwapDetail::new(
            "0.0325".parse().unwrap(),
            nes("SOFR"),
            DayCount::Act360,
            PaymentFrequency::Quarterly,
            60,
            date(2025, 7, 1),
            date(2030, 7, 1),
        )
        .unwrap()
    }

    #[test]
    fn futures_last_trading_bounded_by_expiry() {
        let ok = FuturesDetail::new(
            date(2025, 12, 19),
            date(2025, 12, 18),
            PositiveDecimal::parse("50".parse().unwrap()).unwrap(),
            SettlementType::Cash,
        );
        assert!(ok.is_ok());

        let err = FuturesDetail::new(
            date(2025, 12, 19),
            date(2025, 12, 20),
            PositiveDecimal::parse("50".parse().unwrap()).unwrap(),
            SettlementType::Cash,
        )
        .unwrap_err();
        assert!(err.to_string().contains("FuturesDetail"));
    }

    #[test]
    fn zero_strike_option_is_legal() {
        let detail = OptionDetail::new(
            NonNegativeDecimal::parse("0".parse().unwrap()).unwrap(),
            date(2026, 6, 19),
            OptionType::Call,
            OptionStyle::European,
            SettlementType::Cash,
            nes("NVDA"),
        );
        assert_eq!(detail.strike().value(), "0".parse().unwrap());
    }

    #[test]
    fn currency_pair_rejects_same_legs() {
        let err = CurrencyPair::new(
            CurrencyCode::parse("USD").unwrap(),
            CurrencyCode::parse("USD").unwrap(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("CurrencyPair"));
    }

    #[test]
    fn ndf_fixing_must_precede_settlement() {
        let rate = NonZeroDecimal::parse("17.25".parse().unwrap()).unwrap();
        assert!(FxDetail::ndf(pair("USD", "INR"), date(2025, 9, 17), rate, date(2025, 9, 15)).is_ok());
        let err = FxDetail::ndf(pair("USD", "INR"), date(2025, 9, 17), rate, date(2025, 9, 18))
            .unwrap_err();
        assert!(err.to_string().contains("fixing_date"));
    }

    #[test]
    fn swap_accepts_negative_fixed_rate() {
        let detail = IrSwapDetail::new(
            "-0.005".parse().unwrap(),
            nes("ESTR"),
            DayCount::Act360,
            PaymentFrequency::Annual,
            24,
            date(2025, 7, 1),
            date(2027, 7, 1),
        )
        .unwrap();
        assert!(detail.fixed_rate().is_sign_negative());
    }

    #[test]
    fn swap_rejects_inverted_schedule() {
        let err = IrSwapDetail::new(
            "0.03".parse().unwrap(),
            nes("SOFR"),
            DayCount::Act360,
            PaymentFrequency::Quarterly,
            12,
            date(2026, 7, 1),
            date(2026, 7, 1),
        )
        .unwrap_err();
        assert!(err.to_string().contains("start_date"));
    }

    #[test]
    fn swaption_expiry_bounded_by_swap_start() {
        assert!(SwaptionDetail::new(date(2025, 6, 30), OptionStyle::European, swap()).is_ok());
        let err =
            SwaptionDetail::new(date(2025, 7, 2), OptionStyle::European, swap()).unwrap_err();
        assert!(err.to_string().contains("SwaptionDetail"));
    }

    #[test]
    fn cds_schedule_ordering() {
        let spread = NonNegativeDecimal::parse("85".parse().unwrap()).unwrap();
        assert!(
            CdsDetail::new(nes("ACME Corp"), spread, date(2025, 6, 20), date(2030, 6, 20)).is_ok()
        );
        let err = CdsDetail::new(nes("ACME Corp"), spread, date(2030, 6, 20), date(2025, 6, 20))
            .unwrap_err();
        assert!(err.to_string().contains("CdsDetail"));
    }

    #[test]
    fn kind_discriminates_variants() {
        let fx = InstrumentDetail::Fx(FxDetail::spot(pair("EUR", "USD"), date(2025, 6, 17)));
        assert_eq!(fx.kind(), InstrumentKind::Fx);
        assert_eq!(fx.kind().to_string(), "Fx");
        let eq = InstrumentDetail::Equity(EquityDetail::new(nes("NVDA")));
        assert_eq!(eq.underlying_id().unwrap().as_str(), "NVDA");
    }

    #[test]
    fn day_count_wire_values() {
        assert_eq!(DayCount::Act360.to_string(), "ACT/360");
        assert_eq!("30/360".parse::<DayCount>().unwrap(), DayCount::Thirty360);
    }
}
