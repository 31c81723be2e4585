//! Locale-aware number formatting
//!
//! Integer formatting with digit grouping, matching what browsers print
//! for `Intl.NumberFormat(locale, { maximumFractionDigits: 0 })`.

use serde::{Deserialize, Serialize};

/// Number formatting locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumberLocale {
    /// Russian grouping: no-break space, groups only from five digits up
    #[serde(rename = "ru-RU")]
    Ru,
    /// US grouping: comma
    #[serde(rename = "en-US")]
    EnUs,
}

impl NumberLocale {
    /// Character placed between digit groups
    pub fn group_separator(self) -> char {
        match self {
            NumberLocale::Ru => '\u{a0}',
            NumberLocale::EnUs => ',',
        }
    }

    /// Minimum number of integer digits before grouping kicks in
    fn min_grouping_digits(self) -> usize {
        match self {
            NumberLocale::Ru => 5,
            NumberLocale::EnUs => 4,
        }
    }

    /// BCP 47 tag
    pub fn tag(self) -> &'static str {
        match self {
            NumberLocale::Ru => "ru-RU",
            NumberLocale::EnUs => "en-US",
        }
    }
}

/// Format a value rounded to zero decimals with locale grouping.
///
/// Rounds half away from zero. Non-finite values are printed as-is.
pub fn format_grouped(value: f64, locale: NumberLocale) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        out.push('-');
    }

    if digits.len() < locale.min_grouping_digits() {
        out.push_str(&digits);
        return out;
    }

    let separator = locale.group_separator();
    let lead = digits.len() % 3;
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (idx + 3 - lead) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_en_us_grouping() {
        assert_eq!(format_grouped(0.0, NumberLocale::EnUs), "0");
        assert_eq!(format_grouped(999.0, NumberLocale::EnUs), "999");
        assert_eq!(format_grouped(1000.0, NumberLocale::EnUs), "1,000");
        assert_eq!(format_grouped(1234567.0, NumberLocale::EnUs), "1,234,567");
        assert_eq!(format_grouped(-45000.0, NumberLocale::EnUs), "-45,000");
    }

    #[test]
    fn test_ru_grouping() {
        assert_eq!(format_grouped(1000.0, NumberLocale::Ru), "1000");
        assert_eq!(format_grouped(12650.0, NumberLocale::Ru), "12\u{a0}650");
        assert_eq!(
            format_grouped(12650000.0, NumberLocale::Ru),
            "12\u{a0}650\u{a0}000"
        );
    }

    #[test]
    fn test_rounding() {
        assert_eq!(format_grouped(999.5, NumberLocale::EnUs), "1,000");
        assert_eq!(format_grouped(0.4, NumberLocale::EnUs), "0");
        assert_eq!(format_grouped(-0.4, NumberLocale::EnUs), "0");
        assert_eq!(format_grouped(-2.5, NumberLocale::EnUs), "-3");
    }

    #[test]
    fn test_locale_serde() {
        let locale: NumberLocale = serde_json::from_str("\"ru-RU\"").unwrap();
        assert_eq!(locale, NumberLocale::Ru);
        assert_eq!(locale.tag(), "ru-RU");
    }
}
