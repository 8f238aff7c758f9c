use rust_decimal::Decimal;

use crate::error::DomainError;
use crate::{impl_validated_decimal, impl_validated_str};

// ================================================================================================
// Validated Scalars (NewTypes)
// ================================================================================================

/// A string guaranteed non-empty. The workhorse identifier type for
/// everything without a stricter format (model names, snapshot ids,
/// venues, trade ids).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonEmptyStr(String);
impl_validated_str!(NonEmptyStr);

impl NonEmptyStr {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.is_empty() {
            return Err(DomainError::EmptyString);
        }
        Ok(Self(raw.to_string()))
    }
}

/// A decimal strictly greater than zero. Notionals, quantities,
/// contract sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositiveDecimal(Decimal);
impl_validated_decimal!(
    PositiveDecimal,
    |d| d.is_sign_positive() && !d.is_zero(),
    DomainError::NotPositive
);

/// A decimal greater than or equal to zero. Strikes may be zero;
/// spreads may not be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonNegativeDecimal(Decimal);
impl_validated_decimal!(
    NonNegativeDecimal,
    |d| !d.is_sign_negative() || d.is_zero(),
    DomainError::NegativeDecimal
);

/// A decimal that is not zero, either sign. Forward points, rate shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonZeroDecimal(Decimal);
impl_validated_decimal!(
    NonZeroDecimal,
    |d| !d.is_zero(),
    |_| DomainError::ZeroDecimal
);

/// ISO-4217 style currency code: exactly 3 uppercase ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode(String);
impl_validated_str!(CurrencyCode);

impl CurrencyCode {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.len() != 3 || !raw.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(DomainError::CurrencyCode(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }
}

/// An amount in a currency. The amount itself may be negative (PnL,
/// rates contexts); `rust_decimal` guarantees finiteness.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Money {
    amount: Decimal,
    currency: CurrencyCode,
}

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Result<Self, DomainError> {
        let currency =
            CurrencyCode::parse(currency).map_err(|e| e.in_field("Money", "currency"))?;
        Ok(Self { amount, currency })
    }

    pub fn from_parts(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    #[inline]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    #[inline]
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}
