//! Tabs
//!
//! Tab navigation and the panes holding each tab's chart slots. Panes stay
//! in the DOM; charts inside are drawn the first time their tab is shown.

use leptos::*;

use planfact::Trigger;

use crate::components::chart::ChartCanvas;
use crate::state::DashboardState;

/// Chart slots that belong to no tab
#[component]
pub fn SharedCharts() -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");

    state
        .layout
        .slots_for_tab(None)
        .map(|slot| view! { <ChartCanvas surface=slot.surface().to_string() title=slot.title.clone() /> })
        .collect_view()
}

/// Tab strip and panes
#[component]
pub fn Tabs() -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");
    let active_tab = state.active_tab;

    let links = state
        .layout
        .tabs
        .iter()
        .map(|tab| {
            let id = tab.id.clone();
            let id_for_class = tab.id.clone();
            let state_for_click = state.clone();
            let title = if tab.title.is_empty() {
                tab.id.trim_start_matches('#').to_string()
            } else {
                tab.title.clone()
            };

            view! {
                <li class="nav-item">
                    <button
                        type="button"
                        class=move || {
                            if active_tab.get().as_deref() == Some(id_for_class.as_str()) {
                                "nav-link active"
                            } else {
                                "nav-link"
                            }
                        }
                        on:click=move |_| state_for_click.dispatch(Trigger::TabActivate(id.clone()))
                    >
                        {title}
                    </button>
                </li>
            }
        })
        .collect_view();

    let panes = state
        .layout
        .tabs
        .iter()
        .map(|tab| {
            let id = tab.id.clone();
            let charts = state
                .layout
                .slots_for_tab(Some(&tab.id))
                .map(|slot| view! { <ChartCanvas surface=slot.surface().to_string() title=slot.title.clone() /> })
                .collect_view();

            view! {
                <div
                    id=tab.id.trim_start_matches('#').to_string()
                    class=move || {
                        if active_tab.get().as_deref() == Some(id.as_str()) {
                            "tab-pane show active"
                        } else {
                            "tab-pane d-none"
                        }
                    }
                >
                    {charts}
                </div>
            }
        })
        .collect_view();

    view! {
        <ul class="nav nav-tabs mb-3">{links}</ul>
        <div class="tab-content">{panes}</div>
    }
}
