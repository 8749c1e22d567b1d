//! Highlighter engine: collaborator seams, effect execution and messaging.
mod agent;
mod asset;
mod clipboard;
mod config;
mod controller;
mod extract;
#[cfg(not(target_arch = "wasm32"))]
mod http;
mod page;
mod store;
mod transport;
mod types;

pub use agent::{Dispatch, LoadedInstructions, PageAgent, PendingCopy};
pub use asset::{decode_text, AssetLoader, StaticAssetLoader};
pub use clipboard::{Clipboard, MemoryClipboard};
pub use config::{ConfigError, ExtensionConfig, HighlightConfig};
pub use controller::{Controller, PopupWindow};
pub use extract::{visible_text, Extractor, SelectorPriorityExtractor, DEFAULT_CONTENT_SELECTORS};
#[cfg(not(target_arch = "wasm32"))]
pub use http::{AssetFetchSettings, HttpAssetLoader};
pub use page::{MemoryPage, PageSurface};
pub use store::{read_flag, write_flag, MemorySettingsStore, SettingsStore, ENABLED_KEY};
pub use transport::{AgentEndpoint, Envelope, LocalBus, TabMessenger};
pub use types::{AssetError, ClipboardError, PageError, StoreError, TabId, TransportError};
