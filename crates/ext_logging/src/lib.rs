#![deny(missing_docs)]
//! Shared logging utilities for the extension workspace.
//!
//! This crate provides the `ext_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every record is
//! targeted at the execution context of the calling thread, so a combined
//! log shows whether a line came from the background script, the popup or a
//! page.

use std::cell::Cell;
use std::fmt;

#[doc(hidden)]
pub use log;

/// The extension context a thread is running in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionContext {
    /// Persistent background logic (keyboard commands).
    Background,
    /// The transient popup window.
    Popup,
    /// The agent injected into a web page.
    Page,
    /// Native code outside a browser: tests and tools.
    #[default]
    Host,
}

impl ExecutionContext {
    /// Log target used for records emitted in this context.
    pub fn target(self) -> &'static str {
        match self {
            ExecutionContext::Background => "background",
            ExecutionContext::Popup => "popup",
            ExecutionContext::Page => "page",
            ExecutionContext::Host => "host",
        }
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target())
    }
}

thread_local! {
    static CONTEXT: Cell<ExecutionContext> = const { Cell::new(ExecutionContext::Host) };
}

/// Sets the execution context for the current thread.
/// Each entry point calls this once before emitting any log line.
pub fn set_context(context: ExecutionContext) {
    CONTEXT.with(|c| c.set(context));
}

/// Retrieves the execution context for the current thread.
/// Returns [`ExecutionContext::Host`] if no context has been set.
pub fn current_context() -> ExecutionContext {
    CONTEXT.with(|c| c.get())
}

/// Logs a trace-level message targeted at the current context.
#[macro_export]
macro_rules! ext_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!(target: $crate::current_context().target(), $($arg)*);
    }};
}

/// Logs a debug-level message targeted at the current context.
#[macro_export]
macro_rules! ext_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!(target: $crate::current_context().target(), $($arg)*);
    }};
}

/// Logs an info-level message targeted at the current context.
#[macro_export]
macro_rules! ext_info {
    ($($arg:tt)*) => {{
        $crate::log::info!(target: $crate::current_context().target(), $($arg)*);
    }};
}

/// Logs a warn-level message targeted at the current context.
#[macro_export]
macro_rules! ext_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!(target: $crate::current_context().target(), $($arg)*);
    }};
}

/// Logs an error-level message targeted at the current context.
#[macro_export]
macro_rules! ext_error {
    ($($arg:tt)*) => {{
        $crate::log::error!(target: $crate::current_context().target(), $($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
#[cfg(not(target_arch = "wasm32"))]
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let config = ConfigBuilder::new()
        .set_target_level(log::LevelFilter::Error)
        .build();

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
