//! Payload types
//!
//! The JSON document a server injects into the dashboard page.

use chrono::Month;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

use super::error::{PayloadError, PayloadResult};
use crate::currency::{ExchangeRate, MoneyField};
use crate::table::TableData;

/// Everything a dashboard page is rendered from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardPayload {
    /// Base-currency units per USD
    #[serde(default)]
    pub usd_rate: Option<f64>,

    /// Monthly plan/fact records, in chronological order
    #[serde(default)]
    pub performance: Vec<PeriodRecord>,

    /// Month index (1-12) to display name
    #[serde(default)]
    pub month_names: BTreeMap<u32, String>,

    /// Chart datasets keyed by name; values may nest further datasets
    #[serde(default)]
    pub charts: Map<String, Value>,

    /// Monetary text fields
    #[serde(default)]
    pub fields: Vec<MoneyField>,

    /// Sortable results table
    #[serde(default)]
    pub table: Option<TableData>,

    /// Base export URL
    #[serde(default)]
    pub export_url: Option<String>,
}

/// One period of plan/fact figures, all amounts in base currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub month: u32,
    /// Named figures such as `plan_volume` or `fact_income`
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl PeriodRecord {
    pub fn value(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }
}

impl DashboardPayload {
    /// Parse a payload from JSON text
    pub fn from_json(json: &str) -> PayloadResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a payload from a file
    pub fn from_path(path: &Path) -> PayloadResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PayloadError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// Exchange rate, falling back to `fallback` and then to "unavailable"
    pub fn exchange_rate(&self, fallback: Option<f64>) -> ExchangeRate {
        self.usd_rate
            .or(fallback)
            .map(ExchangeRate::new)
            .unwrap_or_else(ExchangeRate::unavailable)
    }

    /// Look up a dataset by dotted path (`sales_analysis.by_floor`)
    pub fn dataset(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.').filter(|p| !p.is_empty());
        let mut current = self.charts.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Display name for a month index
    pub fn month_label(&self, month: u32) -> String {
        if let Some(name) = self.month_names.get(&month) {
            return name.clone();
        }

        u8::try_from(month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name().to_string())
            .unwrap_or_else(|| month.to_string())
    }
}
