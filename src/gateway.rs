use chrono::NaiveDate;
use rust_decimal::Decimal;
use strum::{Display, EnumString, IntoStaticStr};

use crate::domain::{CurrencyCode, Isin, Lei, NonEmptyStr, PositiveDecimal, UtcDatetime};
use crate::error::DomainError;
use crate::instrument::InstrumentDetail;

/// Which way the client is trading, seen from the client.
#[derive(Copy, Clone, Debug, Display, EnumString, IntoStaticStr, PartialEq, Eq, Hash)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn opposite(self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }
}

/// The canonical record of an executed order, as booked. Regulatory
/// reports are pure projections of this record; nothing downstream may
/// compute new values from it.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalOrder {
    executing_party_lei: Lei,
    counterparty_lei: Lei,
    instrument_id: NonEmptyStr,
    isin: Option<Isin>,
    instrument_detail: InstrumentDetail,
    side: OrderSide,
    quantity: PositiveDecimal,
    price: Decimal,
    currency: CurrencyCode,
    trade_date: NaiveDate,
    settlement_date: NaiveDate,
    venue: NonEmptyStr,
    timestamp: UtcDatetime,
}

impl CanonicalOrder {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        executing_party_lei: Lei,
        counterparty_lei: Lei,
        instrument_id: NonEmptyStr,
        isin: Option<Isin>,
        instrument_detail: InstrumentDetail,
        side: OrderSide,
        quantity: PositiveDecimal,
        price: Decimal,
        currency: CurrencyCode,
        trade_date: NaiveDate,
        settlement_date: NaiveDate,
        venue: NonEmptyStr,
        timestamp: UtcDatetime,
    ) -> Result<Self, DomainError> {
        if settlement_date < trade_date {
            return Err(DomainError::invariant(
                "CanonicalOrder",
                format!(
                    "settlement_date ({settlement_date}) must be >= trade_date ({trade_date})"
                ),
            ));
        }
        Ok(Self {
            executing_party_lei,
            counterparty_lei,
            instrument_id,
            isin,
            instrument_detail,
            side,
            quantity,
            price,
            currency,
            trade_date,
            settlement_date,
            venue,
            timestamp,
        })
    }

    pub fn executing_party_lei(&self) -> &Lei {
        &self.executing_party_lei
    }

    pub fn counterparty_lei(&self) -> &Lei {
        &self.counterparty_lei
    }

    pub fn instrument_id(&self) -> &NonEmptyStr {
        &self.instrument_id
    }

    pub fn isin(&self) -> Option<&Isin> {
        self.isin.as_ref()
    }

    pub fn instrument_detail(&self) -> &InstrumentDetail {
        &self.instrument_detail
    }

    pub fn side(&self) -> OrderSide {
        self.side
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

    pub fn timestamp(&self) -> UtcDatetime {
        self.timestamp
    }
}
