//! Plan/Fact Dashboard
//!
//! Browser front end of the plan/fact financial report built with Leptos
//! (WASM).
//!
//! # Features
//!
//! - Canvas charts with currency-aware axes and tooltips
//! - UZS/USD switch persisted in localStorage
//! - Lazily rendered tab panes
//! - Sortable, searchable results table
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. The server embeds the report data as JSON in a
//! `<script id="dashboard-payload">` element; every interaction is handed to
//! the `planfact` view model and its updates are mirrored into signals.

use leptos::*;

mod app;
mod components;
mod dom;
mod state;
mod storage;

#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
