//! Currency display
//!
//! Projection of base-currency amounts into the selected display currency,
//! plus the text fields and labels that follow the currency toggle.

pub mod fields;
pub mod format;
pub mod projector;

pub use fields::{parse_amount, CurrencyLabels, FieldRole, MoneyField, PLAN_PREFIX};
pub use format::{format_grouped, NumberLocale};
pub use projector::{
    CurrencyMode, CurrencyProjector, CurrencySettings, DisplayValue, ExchangeRate, ValueFormatter,
};
