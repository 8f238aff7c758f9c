use crate::instrument::{InstrumentDetail, Product};
use crate::workflow::types::{PricingInput, PricingResult, RfqInput};

/// Predicate deciding whether a registry entry applies to an instrument.
pub type Qualifier = Box<dyn Fn(&InstrumentDetail) -> bool + Send + Sync>;

/// One pre-trade compliance check. Checks read versioned reference data
/// and must be idempotent; the checks activity runs every registered
/// check and aggregates the failures.
pub trait PreTradeCheck: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(())` if passed, `Err(reason)` with a client-readable reason
    /// if failed.
    fn run(&self, rfq: &RfqInput, product: &Product) -> Result<(), String>;
}

/// Registry of pre-trade checks. Iteration order is registration order,
/// and that order is observable in the aggregated rejection reasons.
///
/// Registries are assembled mutably during worker init and then shared
/// behind `Arc`, so the borrow checker enforces read-only access for the
/// rest of the process lifetime.
#[derive(Default)]
pub struct PreTradeCheckRegistry {
    checks: Vec<Box<dyn PreTradeCheck>>,
}

impl PreTradeCheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, check: impl PreTradeCheck + 'static) {
        self.checks.push(Box::new(check));
    }

    pub fn checks(&self) -> impl Iterator<Item = &dyn PreTradeCheck> {
        self.checks.iter().map(Box::as_ref)
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

/// A product pricer: computes an attested price and greeks.
pub trait Pricer: Send + Sync {
    fn price(&self, input: &PricingInput) -> Result<PricingResult, String>;
}

/// Registry of `(qualifier, pricer)` pairs. Qualifiers are tried in
/// registration order; the first match wins.
#[derive(Default)]
pub struct PricingRegistry {
    entries: Vec<(Qualifier, Box<dyn Pricer>)>,
}

impl PricingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        qualifier: impl Fn(&InstrumentDetail) -> bool + Send + Sync + 'static,
        pricer: impl Pricer + 'static,
    ) {
        self.entries.push((Box::new(qualifier), Box::new(pricer)));
    }

    /// First pricer whose qualifier accepts the instrument, or `None`.
    pub fn resolve(&self, detail: &InstrumentDetail) -> Option<&dyn Pricer> {
        self.entries
            .iter()
            .find(|(qualifier, _)| qualifier(detail))
            .map(|(_, pricer)| pricer.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maps an RFQ onto a bookable product. New product families plug in
/// here; the mapping activity and the workflow never change.
pub trait ProductMapper: Send + Sync {
    fn map(&self, rfq: &RfqInput) -> Result<Product, String>;
}

/// Registry of `(qualifier, mapper)` pairs, first match wins.
#[derive(Default)]
pub struct ProductMapperRegistry {
    entries: Vec<(Qualifier, Box<dyn ProductMapper>)>,
}

impl ProductMapperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        qualifier: impl Fn(&InstrumentDetail) -> bool + Send + Sync + 'static,
        mapper: impl ProductMapper + 'static,
    ) {
        self.entries.push((Box::new(qualifier), Box::new(mapper)));
    }

    pub fn resolve(&self, detail: &InstrumentDetail) -> Option<&dyn ProductMapper> {
        self.entries
            .iter()
            .find(|(qualifier, _)| qualifier(detail))
            .map(|(_, mapper)| mapper.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::{EquityDetail, InstrumentKind};
    use crate::domain::NonEmptyStr;

    struct NamedCheck(&'static str, Result<(), String>);

    impl PreTradeCheck for NamedCheck {
        fn name(&self) -> &str {
            self.0
        }

        fn run(&self, _rfq: &RfqInput, _product: &Product) -> Result<(), String> {
            self.1.clone()
        }
    }

    struct TaggedPricer(&'static str);

    impl Pricer for TaggedPricer {
        fn price(&self, _input: &PricingInput) -> Result<PricingResult, String> {
            Err(self.0.to_string())
        }
    }

    fn equity() -> InstrumentDetail {
        InstrumentDetail::Equity(EquityDetail::new(NonEmptyStr::parse("NVDA").unwrap()))
    }

    #[test]
    fn checks_iterate_in_registration_order() {
        let mut registry = PreTradeCheckRegistry::new();
        registry.register(NamedCheck("zeta", Ok(())));
        registry.register(NamedCheck("alpha", Ok(())));
        registry.register(NamedCheck("mid", Ok(())));
        let names: Vec<_> = registry.checks().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn first_matching_pricer_wins() {
        let mut registry = PricingRegistry::new();
        registry.register(|d| d.kind() == InstrumentKind::Fx, TaggedPricer("fx"));
        registry.register(|_| true, TaggedPricer("catch-all"));
        registry.register(
            |d| d.kind() == InstrumentKind::Equity,
            TaggedPricer("specific-equity"),
        );

        let resolved = registry.resolve(&equity()).unwrap();
        let tag = resolved.price(&dummy_input()).unwrap_err();
        assert_eq!(tag, "catch-all");
    }

    #[test]
    fn resolve_returns_none_without_a_match() {
        let mut registry = PricingRegistry::new();
        registry.register(|d| d.kind() == InstrumentKind::Cds, TaggedPricer("cds"));
        assert!(registry.resolve(&equity()).is_none());

        let empty = PricingRegistry::new();
        assert!(empty.resolve(&equity()).is_none());
        assert!(empty.is_empty());
    }

    fn dummy_input() -> PricingInput {
        use crate::domain::{CurrencyCode, Lei, PositiveDecimal, UtcDatetime};
        use crate::gateway::OrderSide;
        use crate::instrument::{EconomicTerms, EquityPayoutSpec, PayoutSpec};
        use chrono::NaiveDate;

        let rfq = RfqInput::new(
            NonEmptyStr::parse("RFQ-REG").unwrap(),
            Lei::parse("529900T8BM49AURSDO55").unwrap(),
            equity(),
            PositiveDecimal::parse("100".parse().unwrap()).unwrap(),
            CurrencyCode::parse("USD").unwrap(),
            OrderSide::Buy,
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 17).unwrap(),
            UtcDatetime::parse("2025-06-15T12:00:00Z").unwrap(),
        )
        .unwrap();
        let terms = EconomicTerms::new(
            vec![PayoutSpec::Equity(
                EquityPayoutSpec::create("NVDA", "USD", "XNAS").unwrap(),
            )],
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            None,
        )
        .unwrap();
        PricingInput::new(rfq, Product::new(terms))
    }
}
