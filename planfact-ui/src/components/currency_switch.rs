//! Currency Switch
//!
//! UZS/USD toggle, the currency captions and the export link that follow it.

use leptos::*;

use planfact::Trigger;

use crate::state::DashboardState;

/// UZS/USD switch; disabled without a usable exchange rate
#[component]
pub fn CurrencySwitch() -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");
    let usd = state.usd;

    let switch = if state.toggle_enabled {
        let state_for_change = state.clone();
        view! {
            <input
                id="currencyToggle"
                type="checkbox"
                class="form-check-input"
                prop:checked=move || usd.get()
                on:change=move |ev| {
                    state_for_change.dispatch(Trigger::CurrencyToggle(event_target_checked(&ev)));
                }
            />
        }
    } else {
        view! {
            <input
                id="currencyToggle"
                type="checkbox"
                class="form-check-input"
                disabled=true
                title="Курс USD недоступен"
            />
        }
    };

    view! {
        <div class="form-check form-switch d-flex align-items-center gap-2">
            <span class="small">"UZS"</span>
            {switch}
            <span class="small">"USD"</span>
        </div>
    }
}

/// Caption naming the display currency
#[component]
pub fn CurrencyCaption() -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");
    let labels = state.labels;

    view! {
        <span class="currency-label">{move || labels.with(|l| l.caption.clone())}</span>
    }
}

/// Export link carrying the display currency
#[component]
pub fn ExportButton(
    /// Link target in the base currency
    #[prop(into)]
    base_href: String,
) -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");
    let export_href = state.export_href;

    view! {
        <a
            id="exportBtn"
            class="btn btn-outline-success btn-sm"
            href=move || export_href.get().unwrap_or_else(|| base_href.clone())
        >
            "Экспорт в Excel"
        </a>
    }
}
