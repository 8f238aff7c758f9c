/// Macro to implement the shared surface of validated `Decimal` newtypes:
/// a `parse` constructor gated on a predicate, a `value` accessor, and
/// `Display` delegating to the inner decimal.
///
/// The inner field stays private, so `parse` is the only construction path.
#[macro_export]
macro_rules! impl_validated_decimal {
    ($wrapper:ident, $predicate:expr, $violation:expr) => {
        impl $wrapper {
            /// Validate and wrap a raw decimal.
            pub fn parse(raw: rust_decimal::Decimal) -> Result<Self, $crate::error::DomainError> {
                let predicate: fn(&rust_decimal::Decimal) -> bool = $predicate;
                let violation: fn(rust_decimal::Decimal) -> $crate::error::DomainError =
                    $violation;
                if predicate(&raw) {
                    Ok(Self(raw))
                } else {
                    Err(violation(raw))
                }
            }

            #[inline]
            pub fn value(&self) -> rust_decimal::Decimal {
                self.0
            }
        }

        impl std::fmt::Display for $wrapper {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<rust_decimal::Decimal> for $wrapper {
            type Error = $crate::error::DomainError;

            fn try_from(raw: rust_decimal::Decimal) -> Result<Self, Self::Error> {
                Self::parse(raw)
            }
        }
    };
}

/// Macro to implement the shared surface of validated `String` newtypes:
/// `as_str`, `into_inner`, and `Display`.
#[macro_export]
macro_rules! impl_validated_str {
    ($wrapper:ident) => {
        impl $wrapper {
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[inline]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $wrapper {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $wrapper {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}
