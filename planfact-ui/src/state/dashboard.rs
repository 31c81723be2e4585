//! Dashboard State
//!
//! The view model owns every decision; this module keeps Leptos signals in
//! step with the updates it returns.

use leptos::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use planfact::{
    Config, CurrencyLabels, DashboardLayout, DashboardViewModel, FieldRole, MoneyField, TableView,
    Trigger, ViewUpdate,
};

use crate::components::chart::CanvasBackend;
use crate::dom;
use crate::storage::LocalStore;

type ViewModel = DashboardViewModel<CanvasBackend, LocalStore>;

/// Dashboard state provided to all components
#[derive(Clone)]
pub struct DashboardState {
    model: Rc<RefCell<ViewModel>>,
    /// Current text of every monetary field, keyed by id
    pub fields: RwSignal<HashMap<String, String>>,
    /// Monetary fields in page order
    pub money_fields: Rc<Vec<MoneyField>>,
    pub labels: RwSignal<CurrencyLabels>,
    pub export_href: RwSignal<Option<String>>,
    /// Export link as rendered by the server
    pub export_base: Option<String>,
    pub table: RwSignal<Option<TableView>>,
    /// Whether the USD switch is checked
    pub usd: RwSignal<bool>,
    pub active_tab: RwSignal<Option<String>>,
    /// Whether the exchange rate allows switching at all
    pub toggle_enabled: bool,
    pub layout: Rc<DashboardLayout>,
    pub column_titles: Rc<Vec<String>>,
}

/// Build the dashboard state from the injected payload and provide it to
/// the component tree. Without a payload nothing is initialized.
pub fn provide_dashboard_state() -> Option<DashboardState> {
    let Some(payload) = dom::read_payload() else {
        dom::log_error("Dashboard payload not found, initialization aborted");
        return None;
    };

    let config = Config::default();
    let money_fields = payload.fields.clone();
    let export_base = payload.export_url.clone().filter(|url| !url.is_empty());
    let column_titles = payload
        .table
        .as_ref()
        .map(|t| t.columns.iter().map(|c| c.title.clone()).collect())
        .unwrap_or_default();

    let model = DashboardViewModel::new(payload, &config, CanvasBackend::new(), LocalStore::open());
    let toggle_enabled = model.toggle_enabled();
    if !toggle_enabled {
        dom::log_info("Exchange rate unavailable, USD switch disabled");
    }

    let state = DashboardState {
        fields: create_rw_signal(initial_texts(&money_fields)),
        money_fields: Rc::new(money_fields),
        labels: create_rw_signal(CurrencyLabels::for_mode(model.projector(), Default::default())),
        export_href: create_rw_signal(None),
        export_base,
        table: create_rw_signal(None),
        usd: create_rw_signal(false),
        active_tab: create_rw_signal(None),
        toggle_enabled,
        layout: Rc::new(model.layout().clone()),
        column_titles: Rc::new(column_titles),
        model: Rc::new(RefCell::new(model)),
    };

    provide_context(state.clone());
    Some(state)
}

/// Server-rendered text: the raw attribute until the view model formats it
fn initial_texts(fields: &[MoneyField]) -> HashMap<String, String> {
    fields
        .iter()
        .map(|f| (f.id.clone(), f.value.clone()))
        .collect()
}

impl DashboardState {
    /// Hand a trigger to the view model and apply what it changed
    pub fn dispatch(&self, trigger: Trigger) {
        let update = match self.model.try_borrow_mut() {
            Ok(mut model) => model.dispatch(trigger),
            Err(_) => {
                dom::log_warn("View model busy, trigger dropped");
                return;
            }
        };
        self.apply(update);
    }

    fn apply(&self, update: ViewUpdate) {
        if !update.fields.is_empty() {
            self.fields.update(|texts| {
                for field in update.fields {
                    texts.insert(field.id, field.text);
                }
            });
        }
        if let Some(labels) = update.labels {
            self.labels.set(labels);
        }
        if let Some(href) = update.export_href {
            self.export_href.set(Some(href));
        }
        if let Some(table) = update.table {
            self.table.set(Some(table));
        }

        let model = self.model.borrow();
        let view_state = model.state();
        self.usd.set(view_state.display_currency.is_secondary());
        self.active_tab.set(view_state.active_tab.clone());
    }

    /// Text of a monetary field
    pub fn field_text(&self, id: &str) -> String {
        self.fields
            .with(|texts| texts.get(id).cloned())
            .unwrap_or_default()
    }

    /// Whether a field is followed by the shared currency label
    pub fn has_sibling_label(field: &MoneyField) -> bool {
        matches!(
            field.role,
            FieldRole::Generic {
                sibling_label: true
            }
        )
    }
}
