//! UI Components
//!
//! Leptos components of the plan/fact dashboard.

pub mod chart;
pub mod currency_switch;
pub mod money;
pub mod table;
pub mod tabs;

pub use chart::ChartCanvas;
pub use currency_switch::{CurrencyCaption, CurrencySwitch, ExportButton};
pub use money::MoneyPanel;
pub use table::ResultsTable;
pub use tabs::{SharedCharts, Tabs};
