//! Dashboard Layout
//!
//! Tabs and chart slots of a dashboard, with the series each slot plots.
//! Series pairings are data: a slot names the payload keys it reads, so a
//! change of which figures a chart shows is a configuration change.

use serde::{Deserialize, Serialize};

use crate::chart::ChartKind;

/// Placeholder shown for slots without data
pub const DEFAULT_EMPTY_MESSAGE: &str = "Нет данных для построения диаграммы.";

/// Tabs and chart slots of one dashboard page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardLayout {
    #[serde(default)]
    pub tabs: Vec<TabConfig>,

    #[serde(default)]
    pub charts: Vec<ChartSlotConfig>,
}

/// A tab pane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabConfig {
    /// Pane identifier as referenced by tab triggers (`#overview`)
    pub id: String,

    #[serde(default)]
    pub title: String,

    /// Initially shown when nothing is persisted
    #[serde(default)]
    pub default: bool,
}

/// A chart slot and where its data comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSlotConfig {
    /// Slot name, unique per page
    pub slot: String,

    /// Rendering surface id; defaults to the slot name
    #[serde(default)]
    pub surface: Option<String>,

    /// Owning tab; slots without a tab are always on screen
    #[serde(default)]
    pub tab: Option<String>,

    pub kind: ChartKind,

    #[serde(default)]
    pub title: String,

    /// Values are base-currency amounts
    #[serde(default)]
    pub currency: bool,

    pub source: SeriesSource,

    #[serde(default)]
    pub empty_message: Option<String>,
}

impl ChartSlotConfig {
    pub fn surface(&self) -> &str {
        self.surface.as_deref().unwrap_or(&self.slot)
    }

    pub fn empty_message(&self) -> &str {
        self.empty_message.as_deref().unwrap_or(DEFAULT_EMPTY_MESSAGE)
    }
}

/// Origin of a slot's series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum SeriesSource {
    /// Monthly plan/fact records, labelled by month name
    Performance { series: Vec<SeriesBinding> },
    /// A chart dataset (`{"labels": [...], "<key>": [...]}`) at a dotted path
    Dataset {
        path: String,
        series: Vec<SeriesBinding>,
    },
}

impl SeriesSource {
    pub fn series(&self) -> &[SeriesBinding] {
        match self {
            SeriesSource::Performance { series } | SeriesSource::Dataset { series, .. } => series,
        }
    }
}

/// One plotted series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesBinding {
    /// Payload key holding the values
    pub key: String,

    /// Legend label
    pub label: String,

    /// Per-series type inside mixed charts
    #[serde(default)]
    pub kind: Option<ChartKind>,

    #[serde(default)]
    pub color: Option<String>,
}

impl SeriesBinding {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: None,
            color: None,
        }
    }

    pub fn kind(mut self, kind: ChartKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }
}

impl DashboardLayout {
    /// Tab shown when nothing usable is persisted: the marked default,
    /// otherwise the first tab.
    pub fn default_tab(&self) -> Option<&str> {
        self.tabs
            .iter()
            .find(|t| t.default)
            .or_else(|| self.tabs.first())
            .map(|t| t.id.as_str())
    }

    pub fn has_tab(&self, id: &str) -> bool {
        self.tabs.iter().any(|t| t.id == id)
    }

    /// Slots owned by `tab`; `None` selects the always-visible slots
    pub fn slots_for_tab<'a>(
        &'a self,
        tab: Option<&'a str>,
    ) -> impl Iterator<Item = &'a ChartSlotConfig> + 'a {
        self.charts.iter().filter(move |c| c.tab.as_deref() == tab)
    }

    pub fn slot(&self, slot: &str) -> Option<&ChartSlotConfig> {
        self.charts.iter().find(|c| c.slot == slot)
    }
}

impl Default for DashboardLayout {
    /// Project dashboard: yearly plan/fact dynamics and remainders on the
    /// overview, monthly performance and sales analysis on their own tabs.
    fn default() -> Self {
        let tab = |id: &str, title: &str, default: bool| TabConfig {
            id: id.to_string(),
            title: title.to_string(),
            default,
        };

        let sold = "Продано квартир, шт.";
        let analysis = |slot: &str, path: &str| ChartSlotConfig {
            slot: slot.to_string(),
            surface: None,
            tab: Some("#analysis".to_string()),
            kind: ChartKind::Bar,
            title: String::new(),
            currency: false,
            source: SeriesSource::Dataset {
                path: path.to_string(),
                series: vec![SeriesBinding::new("data", sold).color("rgba(75, 192, 192, 0.7)")],
            },
            empty_message: Some("Нет данных для анализа.".to_string()),
        };

        let performance = |slot: &str, plan: &str, fact: &str, title: &str| ChartSlotConfig {
            slot: slot.to_string(),
            surface: None,
            tab: Some("#performance".to_string()),
            kind: ChartKind::Bar,
            title: title.to_string(),
            currency: true,
            source: SeriesSource::Performance {
                series: vec![
                    SeriesBinding::new(plan, "План").color("rgba(255, 193, 7, 0.4)"),
                    SeriesBinding::new(fact, "Факт").color("rgba(25, 135, 84, 0.6)"),
                ],
            },
            empty_message: None,
        };

        Self {
            tabs: vec![
                tab("#overview", "Обзор", true),
                tab("#performance", "Выполнение плана", false),
                tab("#analysis", "Анализ продаж", false),
            ],
            charts: vec![
                ChartSlotConfig {
                    slot: "planFactChart".to_string(),
                    surface: None,
                    tab: Some("#overview".to_string()),
                    kind: ChartKind::Mixed,
                    title: "План/факт по годам".to_string(),
                    currency: true,
                    source: SeriesSource::Dataset {
                        path: "plan_fact_dynamics_yearly".to_string(),
                        series: vec![
                            SeriesBinding::new("plan_volume", "План контрактации")
                                .kind(ChartKind::Line)
                                .color("rgba(54, 162, 235, 1)"),
                            SeriesBinding::new("fact_volume", "Факт контрактации")
                                .kind(ChartKind::Bar)
                                .color("rgba(75, 192, 192, 0.7)"),
                            SeriesBinding::new("plan_income", "План поступлений")
                                .kind(ChartKind::Line)
                                .color("rgba(255, 99, 132, 1)"),
                            SeriesBinding::new("fact_income", "Факт поступлений")
                                .kind(ChartKind::Bar)
                                .color("rgba(255, 206, 86, 0.7)"),
                        ],
                    },
                    empty_message: None,
                },
                ChartSlotConfig {
                    slot: "remaindersChart".to_string(),
                    surface: None,
                    tab: Some("#overview".to_string()),
                    kind: ChartKind::Doughnut,
                    title: "Остатки".to_string(),
                    currency: false,
                    source: SeriesSource::Dataset {
                        path: "remainders_chart_data".to_string(),
                        series: vec![SeriesBinding::new("data", "Кол-во остатков, шт.")],
                    },
                    empty_message: Some(
                        "Нет данных для построения диаграммы остатков.".to_string(),
                    ),
                },
                performance(
                    "performanceChartVolume",
                    "plan_volume",
                    "fact_volume",
                    "Контрактация",
                ),
                performance(
                    "performanceChartIncome",
                    "plan_income",
                    "fact_income",
                    "Поступления",
                ),
                analysis("floorChart", "sales_analysis.by_floor"),
                analysis("roomsChart", "sales_analysis.by_rooms"),
                analysis("areaChart", "sales_analysis.by_area"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tab() {
        let layout = DashboardLayout::default();
        assert_eq!(layout.default_tab(), Some("#overview"));

        let mut layout = DashboardLayout::default();
        for tab in &mut layout.tabs {
            tab.default = false;
        }
        layout.tabs.reverse();
        assert_eq!(layout.default_tab(), Some("#analysis"));

        let empty = DashboardLayout {
            tabs: Vec::new(),
            charts: Vec::new(),
        };
        assert_eq!(empty.default_tab(), None);
    }

    #[test]
    fn test_slots_for_tab() {
        let layout = DashboardLayout::default();
        let slots: Vec<&str> = layout
            .slots_for_tab(Some("#performance"))
            .map(|c| c.slot.as_str())
            .collect();
        assert_eq!(slots, ["performanceChartVolume", "performanceChartIncome"]);
        assert_eq!(layout.slots_for_tab(None).count(), 0);
    }

    #[test]
    fn test_surface_and_message_defaults() {
        let layout = DashboardLayout::default();
        let slot = layout.slot("performanceChartVolume").unwrap();
        assert_eq!(slot.surface(), "performanceChartVolume");
        assert_eq!(slot.empty_message(), DEFAULT_EMPTY_MESSAGE);
    }

    #[test]
    fn test_layout_from_toml() {
        let toml_src = r##"
            [[tabs]]
            id = "#main"
            default = true

            [[charts]]
            slot = "volume"
            surface = "volumeCanvas"
            tab = "#main"
            kind = "bar"
            currency = true

            [charts.source]
            from = "performance"

            [[charts.source.series]]
            key = "fact_volume"
            label = "Факт"

            [[charts.source.series]]
            key = "plan_volume"
            label = "План"
        "##;
        let layout: DashboardLayout = toml::from_str(toml_src).unwrap();
        let slot = layout.slot("volume").unwrap();
        assert_eq!(slot.surface(), "volumeCanvas");
        assert_eq!(slot.source.series()[0].key, "fact_volume");
        assert!(matches!(slot.source, SeriesSource::Performance { .. }));
    }
}
