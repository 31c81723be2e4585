//! Cell comparison for table sorting

use icu_collator::{Collator, CollatorOptions, Strength};
use icu_locid::locale;
use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

thread_local! {
    static COLLATOR: Option<Collator> = russian_collator();
}

/// Russian collation at secondary strength: accents count, case does not.
fn russian_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Secondary);
    match Collator::try_new(&locale!("ru").into(), options) {
        Ok(collator) => Some(collator),
        Err(e) => {
            tracing::warn!("Collation data unavailable, sorting by code point: {}", e);
            None
        }
    }
}

fn non_numeric() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9.+\-]").expect("valid numeric cleanup pattern"))
}

/// Numeric sort key of a cell.
///
/// Everything except digits, sign and decimal point is stripped; cells that
/// still fail to parse sort as zero.
pub fn numeric_key(cell: &str) -> f64 {
    non_numeric()
        .replace_all(cell, "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

pub fn compare_numeric(a: &str, b: &str) -> Ordering {
    numeric_key(a)
        .partial_cmp(&numeric_key(b))
        .unwrap_or(Ordering::Equal)
}

/// Locale-aware, case-insensitive text ordering.
///
/// Falls back to comparing lowercased code points when no collator could be
/// built.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => a.to_lowercase().cmp(&b.to_lowercase()),
    })
}
