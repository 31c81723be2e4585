//! # Planfact
//!
//! View model of plan/fact financial dashboards: currency-aware charts,
//! monetary text fields, persisted view state and client-side table
//! controls, independent of any DOM.
//!
//! ## Features
//!
//! - **Currency projection**: base-currency amounts shown in UZS or USD at a
//!   fixed exchange rate, with locale grouping
//! - **Chart slots**: at most one live chart per slot, lazily rendered per
//!   tab, rebuilt on currency changes, placeholders for empty data
//! - **View state**: display currency and active tab persisted to a
//!   key/value store
//! - **Results table**: stable sorting and case-insensitive search
//!
//! ## Modules
//!
//! - [`currency`]: projection, formatting, monetary fields
//! - [`chart`]: descriptors, registry, backends
//! - [`state`]: view state and key/value stores
//! - [`table`]: sorting and search
//! - [`view_model`]: trigger dispatch tying everything together
//!
//! ## Quick Start
//!
//! ```rust
//! use planfact::*;
//!
//! let payload = DashboardPayload::from_json(r#"{
//!     "usd_rate": 12650,
//!     "fields": [{"id": "total", "value": "12650000", "role": "kpi"}]
//! }"#).unwrap();
//!
//! let mut vm = DashboardViewModel::new(
//!     payload,
//!     &Config::default(),
//!     SnapshotBackend::open(),
//!     MemoryStore::new(),
//! );
//!
//! vm.dispatch(Trigger::Load);
//! let update = vm.dispatch(Trigger::CurrencyToggle(true));
//! assert_eq!(update.fields[0].text, "$1,000 USD");
//! ```

pub mod chart;
pub mod config;
pub mod currency;
pub mod export;
pub mod layout;
pub mod payload;
pub mod state;
pub mod table;
pub mod view_model;

// Re-export top-level types for convenience
pub use chart::{
    ChartBackend, ChartDescriptor, ChartKind, ChartRegistry, ChartSpec, RenderOutcome,
    SlotStatus, SnapshotBackend, SnapshotView,
};

pub use config::{generate_default_config, Config, ConfigError, LoggingConfig};

pub use currency::{
    CurrencyLabels, CurrencyMode, CurrencyProjector, CurrencySettings, ExchangeRate, FieldRole,
    MoneyField, NumberLocale,
};

pub use export::ExportLink;

pub use layout::{ChartSlotConfig, DashboardLayout, SeriesBinding, SeriesSource, TabConfig};

pub use payload::{DashboardPayload, PayloadError, PayloadResult, PeriodRecord};

pub use state::{
    FileStore, KeyValueStore, MemoryStore, StorageKeys, StoreError, StoreResult, ViewState,
};

pub use table::{
    ColumnSpec, CsvTableImporter, Row, SortIndicator, SortType, TableController, TableData,
    TableError,
};

pub use view_model::{DashboardViewModel, FieldText, TableView, Trigger, ViewUpdate};
