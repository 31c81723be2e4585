//! App Root Component
//!
//! Dashboard layout, state provider and the load trigger.

use leptos::*;

use planfact::Trigger;

use crate::components::{
    CurrencyCaption, CurrencySwitch, ExportButton, MoneyPanel, ResultsTable, SharedCharts, Tabs,
};
use crate::state::provide_dashboard_state;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Without a payload there is nothing to initialize
    let Some(state) = provide_dashboard_state() else {
        return ().into_view();
    };

    // Load once the canvases are in the document
    let state_for_load = state.clone();
    request_animation_frame(move || state_for_load.dispatch(Trigger::Load));

    let export = state
        .export_base
        .clone()
        .map(|href| view! { <ExportButton base_href=href /> });
    let has_table = !state.column_titles.is_empty();

    view! {
        <div class="container-fluid py-4">
            <header class="d-flex align-items-center justify-content-between mb-4">
                <h4 class="mb-0">
                    "План/факт, " <CurrencyCaption />
                </h4>
                <div class="d-flex align-items-center gap-3">
                    <CurrencySwitch />
                    {export}
                </div>
            </header>

            <MoneyPanel />
            <SharedCharts />
            <Tabs />
            {has_table.then(|| view! { <ResultsTable /> })}
        </div>
    }
    .into_view()
}
