pub mod frozen_map;
pub mod identifiers;
pub mod money;
pub mod time;

pub use frozen_map::FrozenMap;
pub use identifiers::{Isin, Lei, Uti};
pub use money::{
    CurrencyCode, Money, NonEmptyStr, NonNegativeDecimal, NonZeroDecimal, PositiveDecimal,
};
pub use time::{IdempotencyKey, UtcDatetime};
