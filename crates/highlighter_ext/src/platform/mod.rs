//! Browser bindings. Each `start_*` export wires one extension context.
mod background;
mod chrome;
mod content;
mod dom;
mod logging;
mod popup;

use ext_logging::ExecutionContext;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

fn init(context: ExecutionContext) {
    console_error_panic_hook::set_once();
    logging::initialize(context);
}

#[wasm_bindgen]
pub fn start_background() -> Result<(), JsValue> {
    init(ExecutionContext::Background);
    background::start().map_err(to_js_error)
}

/// Feeds one `commands.onCommand` event to the background controller.
#[wasm_bindgen]
pub async fn handle_command(command: String) -> Result<(), JsValue> {
    background::handle(command).await.map_err(to_js_error)
}

#[wasm_bindgen]
pub fn start_content() -> Result<(), JsValue> {
    init(ExecutionContext::Page);
    content::start().map_err(to_js_error)
}

#[wasm_bindgen]
pub fn start_popup() -> Result<(), JsValue> {
    init(ExecutionContext::Popup);
    popup::start().map_err(to_js_error)
}

fn to_js_error(err: anyhow::Error) -> JsValue {
    js_sys::Error::new(&format!("{err:#}")).into()
}

/// Best-effort text for a thrown JS value or rejected promise.
pub(crate) fn js_error(value: JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

pub(crate) fn js_anyhow(value: JsValue) -> anyhow::Error {
    anyhow::anyhow!(js_error(value))
}
