//! Page Highlighter browser extension.
//!
//! Ships the bundled configuration and assets. On `wasm32` it also exports
//! the entry points the background, content and popup scripts call after
//! loading the module.
#[cfg(target_arch = "wasm32")]
mod platform;

use anyhow::Context;
use highlighter_engine::{ExtensionConfig, StaticAssetLoader};

/// `static/config.ron`, compiled into the module.
pub const BUNDLED_CONFIG: &str = include_str!("../static/config.ron");

/// `static/instructions.txt`. Pages fetch the packaged copy at runtime; this
/// one serves hosts without extension packaging.
pub const BUNDLED_INSTRUCTIONS: &str = include_str!("../static/instructions.txt");

pub fn bundled_config() -> anyhow::Result<ExtensionConfig> {
    ExtensionConfig::from_ron(BUNDLED_CONFIG).context("parsing bundled config.ron")
}

/// In-memory copies of the packaged assets, keyed the way `config` names them.
pub fn bundled_assets(config: &ExtensionConfig) -> StaticAssetLoader {
    StaticAssetLoader::new().with_asset(config.instructions_asset.clone(), BUNDLED_INSTRUCTIONS)
}
