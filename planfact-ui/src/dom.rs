//! DOM access helpers

use planfact::DashboardPayload;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

/// Element holding the server-rendered report payload
pub const PAYLOAD_ELEMENT_ID: &str = "dashboard-payload";

/// Read and parse the injected payload; `None` when absent or malformed
pub fn read_payload() -> Option<DashboardPayload> {
    let text = web_sys::window()?
        .document()?
        .get_element_by_id(PAYLOAD_ELEMENT_ID)?
        .text_content()?;

    match DashboardPayload::from_json(&text) {
        Ok(payload) => Some(payload),
        Err(e) => {
            log_error(&format!("Dashboard payload is malformed: {}", e));
            None
        }
    }
}

/// Canvas element with the given id
pub fn canvas_by_id(id: &str) -> Option<HtmlCanvasElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()
}

pub fn log_info(message: &str) {
    web_sys::console::log_1(&message.into());
}

pub fn log_warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}

pub fn log_error(message: &str) {
    web_sys::console::error_1(&message.into());
}
