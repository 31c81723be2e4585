//! Money Fields
//!
//! Monetary values whose text follows the display currency.

use leptos::*;

use planfact::MoneyField;

use crate::state::DashboardState;

/// One monetary value
#[component]
pub fn MoneyValue(field: MoneyField) -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");
    let sibling = DashboardState::has_sibling_label(&field);
    let labels = state.labels;
    let id = field.id.clone();
    let text_id = field.id;

    view! {
        <span class="money-value">
            <span id=id>{move || state.field_text(&text_id)}</span>
            {sibling.then(|| view! {
                " "
                <span class="currency-symbol">{move || labels.with(|l| l.symbol.clone())}</span>
            })}
        </span>
    }
}

/// Cards of every monetary field in the payload
#[component]
pub fn MoneyPanel() -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");

    view! {
        <div class="row g-3 mb-4">
            {state
                .money_fields
                .iter()
                .cloned()
                .map(|field| view! {
                    <div class="col-md-3">
                        <div class="card metric-card p-3">
                            <small class="text-muted">{field.id.clone()}</small>
                            <div class="fs-5 fw-bold">
                                <MoneyValue field=field />
                            </div>
                        </div>
                    </div>
                })
                .collect_view()}
        </div>
    }
}
