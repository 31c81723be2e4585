//! Results Table
//!
//! Search box and sortable headers over the payload's table.

use leptos::*;

use planfact::{SortIndicator, Trigger};

use crate::state::DashboardState;

/// Header text with the sort arrow of the active column
pub fn header_label(title: &str, column: usize, indicator: Option<SortIndicator>) -> String {
    match indicator {
        Some(SortIndicator { column: active, ascending }) if active == column => {
            format!("{} {}", title, if ascending { "▲" } else { "▼" })
        }
        _ => title.to_string(),
    }
}

/// Searchable, sortable table
#[component]
pub fn ResultsTable() -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");
    let table = state.table;

    let state_for_search = state.clone();
    let on_input = move |ev| {
        state_for_search.dispatch(Trigger::SearchInput(event_target_value(&ev)));
    };

    let headers = state
        .column_titles
        .iter()
        .enumerate()
        .map(|(column, title)| {
            let title = title.clone();
            let state_for_click = state.clone();
            view! {
                <th
                    class="sortable"
                    style="cursor: pointer"
                    on:click=move |_| state_for_click.dispatch(Trigger::HeaderClick(column))
                >
                    {move || {
                        let indicator = table.with(|t| t.as_ref().and_then(|t| t.indicator));
                        header_label(&title, column, indicator)
                    }}
                </th>
            }
        })
        .collect_view();

    view! {
        <div class="card mt-4">
            <div class="card-body">
                <input
                    id="tableSearch"
                    type="search"
                    class="form-control mb-3"
                    placeholder="Поиск..."
                    on:input=on_input
                />
                <table class="table table-hover">
                    <thead>
                        <tr>{headers}</tr>
                    </thead>
                    <tbody>
                        {move || {
                            table.with(|t| {
                                t.as_ref()
                                    .map(|t| {
                                        t.rows
                                            .iter()
                                            .map(|row| {
                                                let style = if row.visible { "" } else { "display: none" };
                                                view! {
                                                    <tr style=style>
                                                        {row.cells.iter().map(|cell| view! { <td>{cell.clone()}</td> }).collect_view()}
                                                    </tr>
                                                }
                                            })
                                            .collect_view()
                                    })
                                    .unwrap_or_else(|| ().into_view())
                            })
                        }}
                    </tbody>
                </table>
            </div>
        </div>
    }
}
