pub mod detail;
pub mod product;

pub use detail::{
    CdsDetail, CurrencyPair, DayCount, EquityDetail, FuturesDetail, FxDetail, InstrumentDetail,
    InstrumentKind, IrSwapDetail, OptionDetail, OptionStyle, OptionType, PaymentFrequency,
    SettlementType, SwaptionDetail,
};
pub use product::{
    EconomicTerms, EquityPayoutSpec, Party, PayoutSpec, PositionStatus, Product,
};
