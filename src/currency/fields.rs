//! Monetary text fields and currency labels

use serde::{Deserialize, Serialize};

use super::projector::{CurrencyMode, CurrencyProjector};

/// How a monetary field presents its currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum FieldRole {
    /// Ordinary amount. With a sibling label the code is left to the label.
    Generic {
        #[serde(default)]
        sibling_label: bool,
    },
    /// KPI result: always carries an explicit code
    Kpi,
    /// Metric card value, optionally prefixed with `План: `
    Metric {
        #[serde(default)]
        plan_prefix: bool,
    },
}

impl Default for FieldRole {
    fn default() -> Self {
        FieldRole::Generic {
            sibling_label: false,
        }
    }
}

/// Prefix kept on plan metric values
pub const PLAN_PREFIX: &str = "План: ";

/// A text node holding a monetary amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneyField {
    /// Element identifier
    pub id: String,
    /// Raw base-currency attribute, exactly as rendered by the server
    pub value: String,
    #[serde(flatten)]
    pub role: FieldRole,
}

impl MoneyField {
    pub fn new(id: impl Into<String>, value: impl Into<String>, role: FieldRole) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            role,
        }
    }

    /// Parsed base amount, `None` when the attribute is malformed
    pub fn amount(&self) -> Option<f64> {
        parse_amount(&self.value)
    }

    /// Text to show in the given mode.
    ///
    /// `None` means the field must be left untouched.
    pub fn render(&self, projector: &CurrencyProjector, mode: CurrencyMode) -> Option<String> {
        let amount = self.amount()?;
        let display = projector.project(amount, mode);
        let mode = projector.effective_mode(mode);

        let text = match &self.role {
            FieldRole::Generic { sibling_label: true } => display.text,
            FieldRole::Generic {
                sibling_label: false,
            } => match mode {
                CurrencyMode::Base => display.with_code(),
                CurrencyMode::Secondary => display.text,
            },
            FieldRole::Kpi => display.with_code(),
            FieldRole::Metric { plan_prefix: true } => format!("{}{}", PLAN_PREFIX, display.text),
            FieldRole::Metric { plan_prefix: false } => display.text,
        };

        Some(text)
    }
}

/// Parse a raw amount attribute. Non-finite values count as malformed.
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Texts of the label elements that follow the display currency
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CurrencyLabels {
    /// Sibling label next to generic amounts; empty in secondary mode
    pub symbol: String,
    /// Table/chart captions and the main currency label
    pub caption: String,
}

impl CurrencyLabels {
    pub fn for_mode(projector: &CurrencyProjector, mode: CurrencyMode) -> Self {
        match projector.effective_mode(mode) {
            CurrencyMode::Base => Self {
                symbol: projector.settings().base_code.clone(),
                caption: projector.settings().base_code.clone(),
            },
            CurrencyMode::Secondary => Self {
                symbol: String::new(),
                caption: projector.settings().secondary_code.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::{CurrencySettings, ExchangeRate};

    fn projector() -> CurrencyProjector {
        CurrencyProjector::new(ExchangeRate::new(12650.0), CurrencySettings::default())
    }

    fn render(role: FieldRole, mode: CurrencyMode) -> Option<String> {
        MoneyField::new("f", "12650000", role).render(&projector(), mode)
    }

    #[test]
    fn test_generic_with_sibling() {
        let role = FieldRole::Generic { sibling_label: true };
        assert_eq!(
            render(role.clone(), CurrencyMode::Base).unwrap(),
            "12\u{a0}650\u{a0}000"
        );
        assert_eq!(render(role, CurrencyMode::Secondary).unwrap(), "$1,000");
    }

    #[test]
    fn test_generic_without_sibling() {
        let role = FieldRole::default();
        assert_eq!(
            render(role.clone(), CurrencyMode::Base).unwrap(),
            "12\u{a0}650\u{a0}000 UZS"
        );
        assert_eq!(render(role, CurrencyMode::Secondary).unwrap(), "$1,000");
    }

    #[test]
    fn test_kpi_always_labelled() {
        assert_eq!(
            render(FieldRole::Kpi, CurrencyMode::Secondary).unwrap(),
            "$1,000 USD"
        );
        assert_eq!(
            render(FieldRole::Kpi, CurrencyMode::Base).unwrap(),
            "12\u{a0}650\u{a0}000 UZS"
        );
    }

    #[test]
    fn test_metric_prefix() {
        let role = FieldRole::Metric { plan_prefix: true };
        assert_eq!(
            render(role, CurrencyMode::Secondary).unwrap(),
            "План: $1,000"
        );
    }

    #[test]
    fn test_malformed_value_is_noop() {
        let p = projector();
        for raw in ["", "abc", "NaN", "inf", "12 650"] {
            let field = MoneyField::new("f", raw, FieldRole::Kpi);
            assert_eq!(field.render(&p, CurrencyMode::Secondary), None, "{raw}");
        }
    }

    #[test]
    fn test_labels() {
        let p = projector();
        let base = CurrencyLabels::for_mode(&p, CurrencyMode::Base);
        assert_eq!(base.symbol, "UZS");
        assert_eq!(base.caption, "UZS");

        let usd = CurrencyLabels::for_mode(&p, CurrencyMode::Secondary);
        assert_eq!(usd.symbol, "");
        assert_eq!(usd.caption, "USD");
    }

    #[test]
    fn test_field_deserialize() {
        let json = r#"{"id": "kpi-total", "value": "500", "role": "kpi"}"#;
        let field: MoneyField = serde_json::from_str(json).unwrap();
        assert_eq!(field.role, FieldRole::Kpi);

        let json = r#"{"id": "sum", "value": "1", "role": "generic", "sibling_label": true}"#;
        let field: MoneyField = serde_json::from_str(json).unwrap();
        assert_eq!(field.role, FieldRole::Generic { sibling_label: true });
    }
}
