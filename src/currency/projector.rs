//! Currency projection
//!
//! Every monetary amount on a dashboard is stored in the base currency.
//! The projector turns such an amount into what the user sees for the
//! currently selected display currency.

use serde::{Deserialize, Serialize};

use super::format::{format_grouped, NumberLocale};

/// Display currency selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyMode {
    /// Local base currency (UZS)
    #[default]
    Base,
    /// Secondary display currency (USD) derived through the exchange rate
    Secondary,
}

impl CurrencyMode {
    /// Map the toggle's checked state to a mode
    pub fn from_usd_flag(usd: bool) -> Self {
        if usd {
            CurrencyMode::Secondary
        } else {
            CurrencyMode::Base
        }
    }

    pub fn is_secondary(self) -> bool {
        self == CurrencyMode::Secondary
    }
}

/// Base-currency units per one unit of the secondary currency.
///
/// Rates at or below 1 mark conversion as unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeRate(f64);

impl ExchangeRate {
    pub fn new(rate: f64) -> Self {
        Self(rate)
    }

    /// A rate that disables the secondary currency
    pub fn unavailable() -> Self {
        Self(1.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether the secondary currency may be offered at all
    pub fn is_usable(self) -> bool {
        self.0.is_finite() && self.0 > 1.0
    }
}

/// Currency codes, markers and locales used when formatting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySettings {
    #[serde(default = "default_base_code")]
    pub base_code: String,

    #[serde(default = "default_secondary_code")]
    pub secondary_code: String,

    #[serde(default = "default_secondary_symbol")]
    pub secondary_symbol: String,

    #[serde(default = "default_base_locale")]
    pub base_locale: NumberLocale,

    #[serde(default = "default_secondary_locale")]
    pub secondary_locale: NumberLocale,

    /// Rate used when the payload carries none
    #[serde(default)]
    pub fallback_rate: Option<f64>,
}

fn default_base_code() -> String {
    "UZS".to_string()
}

fn default_secondary_code() -> String {
    "USD".to_string()
}

fn default_secondary_symbol() -> String {
    "$".to_string()
}

fn default_base_locale() -> NumberLocale {
    NumberLocale::Ru
}

fn default_secondary_locale() -> NumberLocale {
    NumberLocale::EnUs
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            base_code: default_base_code(),
            secondary_code: default_secondary_code(),
            secondary_symbol: default_secondary_symbol(),
            base_locale: default_base_locale(),
            secondary_locale: default_secondary_locale(),
            fallback_rate: None,
        }
    }
}

/// A projected amount ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayValue {
    /// Converted numeric value
    pub amount: f64,
    /// Grouped number with its leading marker, if any (`$1,000`, `12 650 000`)
    pub text: String,
    /// Currency code of the mode (`UZS`, `USD`)
    pub code: String,
}

impl DisplayValue {
    /// Text followed by the explicit currency code
    pub fn with_code(&self) -> String {
        format!("{} {}", self.text, self.code)
    }
}

/// Number formatter shared by text fields, chart ticks and tooltips
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueFormatter {
    pub locale: NumberLocale,
    pub prefix: String,
}

impl ValueFormatter {
    /// Plain grouping with no currency marker
    pub fn plain(locale: NumberLocale) -> Self {
        Self {
            locale,
            prefix: String::new(),
        }
    }

    pub fn format(&self, value: f64) -> String {
        let grouped = format_grouped(value, self.locale);
        if self.prefix.is_empty() {
            return grouped;
        }
        match grouped.strip_prefix('-') {
            Some(abs) => format!("-{}{}", self.prefix, abs),
            None => format!("{}{}", self.prefix, grouped),
        }
    }
}

/// Converts base-currency amounts into display values
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyProjector {
    rate: ExchangeRate,
    settings: CurrencySettings,
}

impl CurrencyProjector {
    pub fn new(rate: ExchangeRate, settings: CurrencySettings) -> Self {
        Self { rate, settings }
    }

    pub fn settings(&self) -> &CurrencySettings {
        &self.settings
    }

    /// Whether the secondary mode can be offered
    pub fn secondary_available(&self) -> bool {
        self.rate.is_usable()
    }

    /// Mode actually used for formatting; secondary falls back to base
    /// when the rate is unusable.
    pub fn effective_mode(&self, mode: CurrencyMode) -> CurrencyMode {
        if mode.is_secondary() && self.secondary_available() {
            CurrencyMode::Secondary
        } else {
            CurrencyMode::Base
        }
    }

    /// Divisor applied to base amounts in the given mode
    pub fn divisor(&self, mode: CurrencyMode) -> f64 {
        match self.effective_mode(mode) {
            CurrencyMode::Secondary => self.rate.value(),
            CurrencyMode::Base => 1.0,
        }
    }

    pub fn convert(&self, amount: f64, mode: CurrencyMode) -> f64 {
        amount / self.divisor(mode)
    }

    /// Currency code for the mode
    pub fn code(&self, mode: CurrencyMode) -> &str {
        match self.effective_mode(mode) {
            CurrencyMode::Secondary => &self.settings.secondary_code,
            CurrencyMode::Base => &self.settings.base_code,
        }
    }

    /// Formatter for already converted values in the given mode
    pub fn formatter(&self, mode: CurrencyMode) -> ValueFormatter {
        match self.effective_mode(mode) {
            CurrencyMode::Secondary => ValueFormatter {
                locale: self.settings.secondary_locale,
                prefix: self.settings.secondary_symbol.clone(),
            },
            CurrencyMode::Base => ValueFormatter::plain(self.settings.base_locale),
        }
    }

    /// Project a base amount for display
    pub fn project(&self, amount: f64, mode: CurrencyMode) -> DisplayValue {
        let converted = self.convert(amount, mode);
        DisplayValue {
            amount: converted,
            text: self.formatter(mode).format(converted),
            code: self.code(mode).to_string(),
        }
    }
}
