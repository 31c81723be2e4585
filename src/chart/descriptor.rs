//! Chart descriptors
//!
//! A [`ChartDescriptor`] holds a slot's raw series exactly as delivered in
//! base currency. [`ChartDescriptor::project`] turns it into a [`ChartSpec`]
//! for one display mode; values are divided at that point and never stored
//! pre-divided.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::currency::{CurrencyMode, CurrencyProjector, ValueFormatter};
use crate::layout::{ChartSlotConfig, SeriesSource};
use crate::payload::DashboardPayload;

/// Fallback palette for series without an explicit color
const SERIES_COLORS: [&str; 5] = [
    "rgba(255, 99, 132, 0.7)",
    "rgba(54, 162, 235, 0.7)",
    "rgba(255, 206, 86, 0.7)",
    "rgba(75, 192, 192, 0.7)",
    "rgba(153, 102, 255, 0.7)",
];

/// Chart type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Doughnut,
    /// Bars and lines on shared axes
    Mixed,
}

/// One raw series of a chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesDescriptor {
    pub label: String,
    pub kind: ChartKind,
    pub color: String,
    pub values: Vec<f64>,
}

/// Everything needed to draw one slot, in base currency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescriptor {
    pub surface: String,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub series: Vec<SeriesDescriptor>,
    /// Values are base-currency amounts subject to projection
    pub currency: bool,
    pub empty_message: String,
}

/// A drawn dataset after projection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSpec {
    pub label: String,
    pub kind: ChartKind,
    pub color: String,
    pub values: Vec<f64>,
}

/// Chart configuration handed to a backend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub surface: String,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<DatasetSpec>,
    pub mode: CurrencyMode,
    pub formatter: ValueFormatter,
}

impl ChartSpec {
    /// Axis tick text
    pub fn tick_label(&self, value: f64) -> String {
        self.formatter.format(value)
    }

    /// Tooltip text for one point: `"<series>: <value>"`
    pub fn tooltip_label(&self, dataset: usize, point: usize) -> Option<String> {
        let dataset = self.datasets.get(dataset)?;
        let value = dataset.values.get(point)?;
        let formatted = self.formatter.format(*value);
        if dataset.label.is_empty() {
            Some(formatted)
        } else {
            Some(format!("{}: {}", dataset.label, formatted))
        }
    }

    /// Largest absolute value across datasets, for axis scaling
    pub fn max_value(&self) -> f64 {
        self.datasets
            .iter()
            .flat_map(|d| d.values.iter())
            .fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }
}

impl ChartDescriptor {
    /// A slot without any value to plot
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.values.is_empty())
    }

    /// Build the descriptor of a configured slot from the payload.
    ///
    /// Missing datasets or keys produce empty series.
    pub fn from_slot(config: &ChartSlotConfig, payload: &DashboardPayload) -> Self {
        let (labels, columns): (Vec<String>, Vec<Vec<f64>>) = match &config.source {
            SeriesSource::Performance { series } => {
                let labels = payload
                    .performance
                    .iter()
                    .map(|r| payload.month_label(r.month))
                    .collect();
                let columns = series
                    .iter()
                    .map(|b| {
                        payload
                            .performance
                            .iter()
                            .map(|r| r.value(&b.key).unwrap_or(0.0))
                            .collect()
                    })
                    .collect();
                (labels, columns)
            }
            SeriesSource::Dataset { path, series } => match payload.dataset(path) {
                Some(dataset) => {
                    let labels = dataset
                        .get("labels")
                        .map(label_list)
                        .unwrap_or_default();
                    let columns = series
                        .iter()
                        .map(|b| dataset.get(&b.key).map(number_list).unwrap_or_default())
                        .collect();
                    (labels, columns)
                }
                None => {
                    tracing::debug!(slot = %config.slot, path = %path, "Dataset absent");
                    (Vec::new(), vec![Vec::new(); series.len()])
                }
            },
        };

        let series = config
            .source
            .series()
            .iter()
            .zip(columns)
            .enumerate()
            .map(|(idx, (binding, values))| SeriesDescriptor {
                label: binding.label.clone(),
                kind: binding.kind.unwrap_or(match config.kind {
                    ChartKind::Mixed => ChartKind::Bar,
                    other => other,
                }),
                color: binding
                    .color
                    .clone()
                    .unwrap_or_else(|| SERIES_COLORS[idx % SERIES_COLORS.len()].to_string()),
                values,
            })
            .collect();

        Self {
            surface: config.surface().to_string(),
            kind: config.kind,
            labels,
            series,
            currency: config.currency,
            empty_message: config.empty_message().to_string(),
        }
    }

    /// Project raw values for `mode`
    pub fn project(&self, projector: &CurrencyProjector, mode: CurrencyMode) -> ChartSpec {
        let (divisor, formatter, mode) = if self.currency {
            (
                projector.divisor(mode),
                projector.formatter(mode),
                projector.effective_mode(mode),
            )
        } else {
            (
                1.0,
                ValueFormatter::plain(projector.settings().base_locale),
                CurrencyMode::Base,
            )
        };

        ChartSpec {
            surface: self.surface.clone(),
            kind: self.kind,
            labels: self.labels.clone(),
            datasets: self
                .series
                .iter()
                .map(|s| DatasetSpec {
                    label: s.label.clone(),
                    kind: s.kind,
                    color: s.color.clone(),
                    values: s.values.iter().map(|v| v / divisor).collect(),
                })
                .collect(),
            mode,
            formatter,
        }
    }
}

fn label_list(value: &Value) -> Vec<String> {
    match value.as_array() {
        Some(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        None => Vec::new(),
    }
}

fn number_list(value: &Value) -> Vec<f64> {
    match value.as_array() {
        Some(items) => items.iter().map(|v| v.as_f64().unwrap_or(0.0)).collect(),
        None => Vec::new(),
    }
}
