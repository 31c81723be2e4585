//! Export link
//!
//! The report export URL carries the display currency as a query parameter
//! while the secondary currency is active.

use crate::currency::CurrencyMode;

/// Export URL of a report page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportLink {
    base: String,
    param: String,
    value: String,
}

impl ExportLink {
    pub fn new(base: impl Into<String>, param: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            param: param.into(),
            value: value.into(),
        }
    }

    /// Link for the mode: bare URL in base mode, parameter appended in
    /// secondary mode.
    pub fn href(&self, mode: CurrencyMode) -> String {
        match mode {
            CurrencyMode::Base => self.base.clone(),
            CurrencyMode::Secondary => {
                let (path, fragment) = match self.base.split_once('#') {
                    Some((path, fragment)) => (path, Some(fragment)),
                    None => (self.base.as_str(), None),
                };
                let separator = if !path.contains('?') {
                    "?"
                } else if path.ends_with('?') || path.ends_with('&') {
                    ""
                } else {
                    "&"
                };

                let mut href = format!(
                    "{}{}{}={}",
                    path,
                    separator,
                    urlencoding::encode(&self.param),
                    urlencoding::encode(&self.value)
                );
                if let Some(fragment) = fragment {
                    href.push('#');
                    href.push_str(fragment);
                }
                href
            }
        }
    }
}
