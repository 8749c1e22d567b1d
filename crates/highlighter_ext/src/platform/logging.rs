//! Console logging for the extension contexts.
//!
//! Each context (background worker, content script, popup) loads its own
//! module instance, so the logger and the execution context are set once per
//! instance. Records are targeted at the context name by the `ext_*` macros.
use ext_logging::{set_context, ExecutionContext};
use log::Level;

pub fn initialize(context: ExecutionContext) {
    set_context(context);

    let level = if cfg!(debug_assertions) {
        Level::Debug
    } else {
        Level::Info
    };
    wasm_logger::init(wasm_logger::Config::new(level));
}
