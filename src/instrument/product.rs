use chrono::NaiveDate;
use strum::{Display, EnumString, IntoStaticStr};

use crate::domain::{Lei, NonEmptyStr};
use crate::error::DomainError;

/// Lifecycle states of a booked position.
#[derive(Copy, Clone, Debug, Display, EnumString, IntoStaticStr, PartialEq, Eq, Hash)]
pub enum PositionStatus {
    Proposed,
    Formed,
    Settled,
    Cancelled,
    Closed,
}

impl PositionStatus {
    /// Advance the lifecycle, refusing transitions the trade state
    /// machine does not define. Cancelled and Closed are terminal.
    pub fn transition(self, next: PositionStatus) -> Result<PositionStatus, String> {
        use PositionStatus::*;
        let legal = matches!(
            (self, next),
            (Proposed, Formed)
                | (Proposed, Cancelled)
                | (Formed, Settled)
                | (Formed, Closed)
                | (Formed, Cancelled)
                | (Settled, Closed)
        );
        if legal {
            Ok(next)
        } else {
            Err(format!("illegal position transition {self} -> {next}"))
        }
    }
}

/// Counterparty or executing party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    party_id: NonEmptyStr,
    name: NonEmptyStr,
    lei: Lei,
}

impl Party {
    pub fn new(party_id: NonEmptyStr, name: NonEmptyStr, lei: Lei) -> Self {
        Self {
            party_id,
            name,
            lei,
        }
    }

    /// Validate raw strings into a `Party`, pointing at the offending
    /// field on failure.
    pub fn create(party_id: &str, name: &str, lei: &str) -> Result<Self, DomainError> {
        Ok(Self {
            party_id: NonEmptyStr::parse(party_id)
                .map_err(|e| e.in_field("Party", "party_id"))?,
            name: NonEmptyStr::parse(name).map_err(|e| e.in_field("Party", "name"))?,
            lei: Lei::parse(lei).map_err(|e| e.in_field("Party", "lei"))?,
        })
    }

    pub fn party_id(&self) -> &NonEmptyStr {
        &self.party_id
    }

    pub fn name(&self) -> &NonEmptyStr {
        &self.name
    }

    pub fn lei(&self) -> &Lei {
        &self.lei
    }
}

/// Cash equity / ETF payout specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquityPayoutSpec {
    instrument_id: NonEmptyStr,
    currency: NonEmptyStr,
    exchange: NonEmptyStr,
}

impl EquityPayoutSpec {
    pub fn create(
        instrument_id: &str,
        currency: &str,
        exchange: &str,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            instrument_id: NonEmptyStr::parse(instrument_id)
                .map_err(|e| e.in_field("EquityPayoutSpec", "instrument_id"))?,
            currency: NonEmptyStr::parse(currency)
                .map_err(|e| e.in_field("EquityPayoutSpec", "currency"))?,
            exchange: NonEmptyStr::parse(exchange)
                .map_err(|e| e.in_field("EquityPayoutSpec", "exchange"))?,
        })
    }

    pub fn instrument_id(&self) -> &NonEmptyStr {
        &self.instrument_id
    }

    pub fn currency(&self) -> &NonEmptyStr {
        &self.currency
    }

    pub fn exchange(&self) -> &NonEmptyStr {
        &self.exchange
    }
}

/// One leg of a product's payout. Currently equity-shaped; new product
/// families extend this sum without touching the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayoutSpec {
    Equity(EquityPayoutSpec),
}

/// Economic terms of a mapped product. A product with no payouts prices
/// to nothing and books to nothing, so emptiness is rejected here rather
/// than discovered downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EconomicTerms {
    payouts: Vec<PayoutSpec>,
    effective_date: NaiveDate,
    termination_date: Option<NaiveDate>,
}

impl EconomicTerms {
    pub fn new(
        payouts: Vec<PayoutSpec>,
        effective_date: NaiveDate,
        termination_date: Option<NaiveDate>,
    ) -> Result<Self, DomainError> {
        if payouts.is_empty() {
            return Err(DomainError::invariant(
                "EconomicTerms",
                "payouts must not be empty",
            ));
        }
        if let Some(termination) = termination_date
            && termination < effective_date
        {
            return Err(DomainError::invariant(
                "EconomicTerms",
                format!(
                    "termination_date ({termination}) must be >= effective_date ({effective_date})"
                ),
            ));
        }
        Ok(Self {
            payouts,
            effective_date,
            termination_date,
        })
    }

    pub fn payouts(&self) -> &[PayoutSpec] {
        &self.payouts
    }

    pub fn effective_date(&self) -> NaiveDate {
        self.effective_date
    }

    pub fn termination_date(&self) -> Option<NaiveDate> {
        self.termination_date
    }
}

/// CDM-style product wrapping its economic terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    economic_terms: EconomicTerms,
}

impl Product {
    pub fn new(economic_terms: EconomicTerms) -> Self {
        Self { economic_terms }
    }

    pub fn economic_terms(&self) -> &EconomicTerms {
        &self.economic_terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn party_create_names_offending_field() {
        let err = Party::create("DESK-1", "", "529900T8BM49AURSDO55").unwrap_err();
        assert_eq!(err.to_string(), "Party.name: NonEmptyStr must be non-empty");

        let err = Party::create("DESK-1", "Desk One", "not-an-lei").unwrap_err();
        assert!(err.to_string().starts_with("Party.lei:"));
    }

    #[test]
    fn economic_terms_reject_empty_payouts() {
        let err = EconomicTerms::new(vec![], date(2025, 6, 15), None).unwrap_err();
        assert!(err.to_string().contains("payouts"));
    }

    #[test]
    fn economic_terms_reject_inverted_dates() {
        let payout = EquityPayoutSpec::create("NVDA", "USD", "XNAS").unwrap();
        let err = EconomicTerms::new(
            vec![PayoutSpec::Equity(payout)],
            date(2025, 6, 15),
            Some(date(2025, 6, 14)),
        )
        .unwrap_err();
        assert!(err.to_string().contains("termination_date"));
    }

    #[test]
    fn position_lifecycle_refuses_undefined_transitions() {
        use PositionStatus::*;
        assert_eq!(Proposed.transition(Formed), Ok(Formed));
        assert_eq!(Formed.transition(Settled), Ok(Settled));
        assert_eq!(Settled.transition(Closed), Ok(Closed));
        assert!(Proposed.transition(Settled).is_err());
        assert!(Cancelled.transition(Formed).is_err());
        assert!(Closed.transition(Proposed).is_err());
        let err = Formed.transition(Proposed).unwrap_err();
        assert!(err.contains("Formed -> Proposed"));
    }

    #[test]
    fn perpetual_products_have_no_termination() {
        let payout = EquityPayoutSpec::create("NVDA", "USD", "XNAS").unwrap();
        let terms =
            EconomicTerms::new(vec![PayoutSpec::Equity(payout)], date(2025, 6, 15), None).unwrap();
        let product = Product::new(terms);
        assert_eq!(product.economic_terms().termination_date(), None);
        assert_eq!(product.economic_terms().payouts().len(), 1);
    }
}
