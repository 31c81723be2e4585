//! Dashboard View Model
//!
//! Ties the pieces of one dashboard page together. Every user interaction
//! arrives as a [`Trigger`]; dispatching it applies a state transition,
//! persists what changed, drives the chart registry, and returns a
//! [`ViewUpdate`] describing the text the host page must change.

use serde::Serialize;
use std::collections::HashMap;

use crate::chart::{ChartBackend, ChartDescriptor, ChartRegistry, RenderOutcome};
use crate::config::Config;
use crate::currency::{CurrencyLabels, CurrencyMode, CurrencyProjector};
use crate::export::ExportLink;
use crate::layout::DashboardLayout;
use crate::payload::{DashboardPayload, PayloadError, PayloadResult};
use crate::state::{KeyValueStore, StorageKeys, ViewState};
use crate::table::{Row, SortIndicator, TableController};

/// User interaction or lifecycle event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Page loaded
    Load,
    /// Currency toggle changed; `true` selects USD
    CurrencyToggle(bool),
    /// Tab pane shown
    TabActivate(String),
    /// Search box input
    SearchInput(String),
    /// Sortable header clicked
    HeaderClick(usize),
}

/// New text of one monetary field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldText {
    pub id: String,
    pub text: String,
}

/// Rendered state of the results table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub rows: Vec<Row>,
    pub indicator: Option<SortIndicator>,
}

/// Changes the host page must apply after a trigger
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewUpdate {
    /// Fields whose text changes; malformed fields are never listed
    pub fields: Vec<FieldText>,
    pub labels: Option<CurrencyLabels>,
    pub export_href: Option<String>,
    pub table: Option<TableView>,
    /// Chart slots touched, with what happened to each
    pub charts: Vec<(String, RenderOutcome)>,
}

impl ViewUpdate {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
            && self.labels.is_none()
            && self.export_href.is_none()
            && self.table.is_none()
            && self.charts.is_empty()
    }
}

/// View model of one dashboard page
pub struct DashboardViewModel<B: ChartBackend, S: KeyValueStore> {
    payload: DashboardPayload,
    layout: DashboardLayout,
    descriptors: HashMap<String, ChartDescriptor>,
    projector: CurrencyProjector,
    registry: ChartRegistry<B>,
    store: S,
    keys: StorageKeys,
    state: ViewState,
    table: Option<TableController>,
    export: Option<ExportLink>,
    loaded: bool,
}

impl<B: ChartBackend, S: KeyValueStore> DashboardViewModel<B, S> {
    /// Build the view model for an injected payload.
    ///
    /// Without a payload nothing is initialized at all.
    pub fn from_injected(
        payload: Option<DashboardPayload>,
        config: &Config,
        backend: B,
        store: S,
    ) -> PayloadResult<Self> {
        match payload {
            Some(payload) => Ok(Self::new(payload, config, backend, store)),
            None => {
                tracing::error!("Dashboard payload not found, initialization aborted");
                Err(PayloadError::Missing)
            }
        }
    }

    pub fn new(payload: DashboardPayload, config: &Config, backend: B, store: S) -> Self {
        let rate = payload.exchange_rate(config.currency.fallback_rate);
        let projector = CurrencyProjector::new(rate, config.currency.clone());
        let layout = config.layout.clone();

        let descriptors = layout
            .charts
            .iter()
            .map(|slot| (slot.slot.clone(), ChartDescriptor::from_slot(slot, &payload)))
            .collect();

        let table = payload.table.as_ref().map(TableController::from_data);
        let export = payload
            .export_url
            .as_ref()
            .filter(|url| !url.is_empty())
            .map(|url| ExportLink::new(url.clone(), &config.export.param, &config.export.value));

        if !projector.secondary_available() {
            tracing::info!(rate = rate.value(), "USD display disabled");
        }

        Self {
            payload,
            layout,
            descriptors,
            projector,
            registry: ChartRegistry::new(backend),
            store,
            keys: config.storage.keys(),
            state: ViewState::default(),
            table,
            export,
            loaded: false,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn payload(&self) -> &DashboardPayload {
        &self.payload
    }

    pub fn layout(&self) -> &DashboardLayout {
        &self.layout
    }

    pub fn projector(&self) -> &CurrencyProjector {
        &self.projector
    }

    pub fn registry(&self) -> &ChartRegistry<B> {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn table(&self) -> Option<&TableController> {
        self.table.as_ref()
    }

    /// Whether the currency toggle accepts input
    pub fn toggle_enabled(&self) -> bool {
        self.projector.secondary_available()
    }

    /// Handle one trigger
    pub fn dispatch(&mut self, trigger: Trigger) -> ViewUpdate {
        tracing::debug!(?trigger, "Dispatching trigger");
        match trigger {
            Trigger::Load => self.load(),
            Trigger::CurrencyToggle(usd) => self.toggle_currency(usd),
            Trigger::TabActivate(tab) => self.activate_tab(tab),
            Trigger::SearchInput(term) => self.search(&term),
            Trigger::HeaderClick(column) => self.header_click(column),
        }
    }

    fn load(&mut self) -> ViewUpdate {
        if self.loaded {
            return ViewUpdate::default();
        }
        self.loaded = true;

        self.state = ViewState::restore(
            &self.store,
            &self.keys,
            &self.layout,
            self.projector.secondary_available(),
        );
        tracing::info!(
            currency = ?self.state.display_currency,
            tab = ?self.state.active_tab,
            "View state restored"
        );

        let mut update = self.currency_refresh();
        update.charts = self.render_tab(None);
        let active = self.state.active_tab.clone();
        if let Some(tab) = active.as_deref() {
            update.charts.extend(self.render_tab(Some(tab)));
        }
        update.table = self.table_view();
        update
    }

    fn toggle_currency(&mut self, usd: bool) -> ViewUpdate {
        if !self.toggle_enabled() {
            tracing::debug!("Currency toggle ignored, exchange rate unavailable");
            return ViewUpdate::default();
        }

        self.state.display_currency = CurrencyMode::from_usd_flag(usd);
        if let Err(e) = self.state.persist_currency(&mut self.store, &self.keys) {
            tracing::warn!("Failed to persist currency: {}", e);
        }

        let mut update = self.currency_refresh();
        update.charts = self.rerender_live();
        update
    }

    fn activate_tab(&mut self, tab: String) -> ViewUpdate {
        if !self.layout.has_tab(&tab) {
            tracing::debug!(tab = %tab, "Unknown tab ignored");
            return ViewUpdate::default();
        }

        self.state.active_tab = Some(tab.clone());
        if let Err(e) = self.state.persist_tab(&mut self.store, &self.keys) {
            tracing::warn!("Failed to persist active tab: {}", e);
        }

        ViewUpdate {
            charts: self.render_tab(Some(&tab)),
            ..ViewUpdate::default()
        }
    }

    fn search(&mut self, term: &str) -> ViewUpdate {
        let Some(table) = self.table.as_mut() else {
            return ViewUpdate::default();
        };
        table.filter(term);

        ViewUpdate {
            table: self.table_view(),
            ..ViewUpdate::default()
        }
    }

    fn header_click(&mut self, column: usize) -> ViewUpdate {
        let sorted = self
            .table
            .as_mut()
            .and_then(|table| table.header_click(column))
            .is_some();

        if !sorted {
            return ViewUpdate::default();
        }
        ViewUpdate {
            table: self.table_view(),
            ..ViewUpdate::default()
        }
    }

    /// Field texts, labels and export link for the current mode
    fn currency_refresh(&self) -> ViewUpdate {
        let mode = self.state.display_currency;
        let fields = self
            .payload
            .fields
            .iter()
            .filter_map(|field| match field.render(&self.projector, mode) {
                Some(text) => Some(FieldText {
                    id: field.id.clone(),
                    text,
                }),
                None => {
                    tracing::debug!(field = %field.id, value = %field.value, "Malformed amount left as is");
                    None
                }
            })
            .collect();

        ViewUpdate {
            fields,
            labels: Some(CurrencyLabels::for_mode(&self.projector, mode)),
            export_href: self.export.as_ref().map(|link| link.href(mode)),
            ..ViewUpdate::default()
        }
    }

    /// Render every slot of a tab (or the tab-less slots)
    fn render_tab(&mut self, tab: Option<&str>) -> Vec<(String, RenderOutcome)> {
        let mode = self.state.display_currency;
        let slots: Vec<String> = self
            .layout
            .slots_for_tab(tab)
            .map(|c| c.slot.clone())
            .collect();

        slots
            .into_iter()
            .filter_map(|slot| {
                let descriptor = self.descriptors.get(&slot)?;
                let outcome = self
                    .registry
                    .render(&slot, descriptor, &self.projector, mode);
                Some((slot, outcome))
            })
            .collect()
    }

    /// Bring already-rendered currency charts to the current mode
    fn rerender_live(&mut self) -> Vec<(String, RenderOutcome)> {
        let mode = self.state.display_currency;
        let mut live: Vec<String> = self.registry.live_slots().map(str::to_string).collect();
        live.sort();

        live.into_iter()
            .filter_map(|slot| {
                let descriptor = self.descriptors.get(&slot)?;
                if !descriptor.currency {
                    return None;
                }
                let outcome = self
                    .registry
                    .render(&slot, descriptor, &self.projector, mode);
                Some((slot, outcome))
            })
            .collect()
    }

    fn table_view(&self) -> Option<TableView> {
        self.table.as_ref().map(|table| TableView {
            rows: table.rows().to_vec(),
            indicator: table.indicator(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{SlotStatus, SnapshotBackend};
    use crate::state::MemoryStore;

    fn payload(rate: f64) -> DashboardPayload {
        DashboardPayload::from_json(&format!(
            r#"{{
                "usd_rate": {rate},
                "performance": [
                    {{"month": 1, "plan_volume": 25300000, "fact_volume": 12650000,
                      "plan_income": 1000, "fact_income": 2000}}
                ],
                "charts": {{
                    "plan_fact_dynamics_yearly": {{
                        "labels": ["2024"],
                        "plan_volume": [1], "fact_volume": [2],
                        "plan_income": [3], "fact_income": [4]
                    }},
                    "remainders_chart_data": {{"labels": [], "data": []}}
                }},
                "fields": [
                    {{"id": "total", "value": "12650000", "role": "kpi"}},
                    {{"id": "broken", "value": "n/a", "role": "kpi"}}
                ],
                "export_url": "/reports/export"
            }}"#
        ))
        .unwrap()
    }

    fn view_model(rate: f64) -> DashboardViewModel<SnapshotBackend, MemoryStore> {
        DashboardViewModel::new(
            payload(rate),
            &Config::default(),
            SnapshotBackend::open(),
            MemoryStore::new(),
        )
    }

    #[test]
    fn test_missing_payload_aborts() {
        let result = DashboardViewModel::from_injected(
            None,
            &Config::default(),
            SnapshotBackend::open(),
            MemoryStore::new(),
        );
        assert!(matches!(result, Err(PayloadError::Missing)));
    }

    #[test]
    fn test_load_renders_default_tab_only() {
        let mut vm = view_model(12650.0);
        let update = vm.dispatch(Trigger::Load);

        assert_eq!(vm.state().active_tab.as_deref(), Some("#overview"));
        assert_eq!(
            update.charts,
            [
                ("planFactChart".to_string(), RenderOutcome::Created),
                ("remaindersChart".to_string(), RenderOutcome::PlaceholderShown),
            ]
        );
        assert_eq!(vm.registry().status("performanceChartVolume"), SlotStatus::Absent);
        assert_eq!(update.fields.len(), 1);
        assert_eq!(update.fields[0].text, "12\u{a0}650\u{a0}000 UZS");
        assert_eq!(update.export_href.as_deref(), Some("/reports/export"));
    }

    #[test]
    fn test_second_load_is_noop() {
        let mut vm = view_model(12650.0);
        vm.dispatch(Trigger::Load);
        assert!(vm.dispatch(Trigger::Load).is_empty());
    }

    #[test]
    fn test_toggle_updates_fields_and_persists() {
        let mut vm = view_model(12650.0);
        vm.dispatch(Trigger::Load);

        let update = vm.dispatch(Trigger::CurrencyToggle(true));
        assert_eq!(update.fields[0].text, "$1,000 USD");
        assert_eq!(update.labels.unwrap().caption, "USD");
        assert_eq!(update.export_href.as_deref(), Some("/reports/export?currency=USD"));
        assert_eq!(
            update.charts,
            [("planFactChart".to_string(), RenderOutcome::Recreated)]
        );
        assert_eq!(
            vm.store().get("planFactReport_currencyIsUSD").as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_toggle_inert_without_rate() {
        let mut vm = view_model(1.0);
        vm.dispatch(Trigger::Load);
        assert!(!vm.toggle_enabled());

        let update = vm.dispatch(Trigger::CurrencyToggle(true));
        assert!(update.is_empty());
        assert_eq!(vm.state().display_currency, CurrencyMode::Base);
        assert_eq!(vm.store().get("planFactReport_currencyIsUSD"), None);
    }

    #[test]
    fn test_tab_activation_is_lazy_and_idempotent() {
        let mut vm = view_model(12650.0);
        vm.dispatch(Trigger::Load);

        let first = vm.dispatch(Trigger::TabActivate("#performance".to_string()));
        assert!(first
            .charts
            .iter()
            .all(|(_, outcome)| *outcome == RenderOutcome::Created));
        assert_eq!(first.charts.len(), 2);

        vm.dispatch(Trigger::TabActivate("#overview".to_string()));
        let again = vm.dispatch(Trigger::TabActivate("#performance".to_string()));
        assert!(again
            .charts
            .iter()
            .all(|(_, outcome)| *outcome == RenderOutcome::Unchanged));
        assert_eq!(
            vm.store().get("planFactReport_activeTab").as_deref(),
            Some("#performance")
        );
    }

    #[test]
    fn test_unknown_tab_ignored() {
        let mut vm = view_model(12650.0);
        vm.dispatch(Trigger::Load);
        assert!(vm.dispatch(Trigger::TabActivate("#nope".to_string())).is_empty());
        assert_eq!(vm.state().active_tab.as_deref(), Some("#overview"));
    }
}
