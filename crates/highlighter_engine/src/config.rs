use highlighter_core::{
    AgentOptions, AssistantEndpoint, ControllerOptions, HighlightStyle, LinkError,
    DEFAULT_BANNER_DURATION_MS, DEFAULT_ENABLED, DEFAULT_INSTRUCTIONS_ASSET,
    DEFAULT_MARKER_BACKGROUND, DEFAULT_MARKER_CLASS, DEFAULT_TOGGLE_COMMAND,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extract::{SelectorPriorityExtractor, DEFAULT_CONTENT_SELECTORS};
use crate::store::ENABLED_KEY;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid RON: {0}")]
    Parse(String),
    #[error("config lists no content selectors")]
    NoSelectors,
    #[error("assistant endpoint: {0}")]
    Assistant(#[from] LinkError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub style: HighlightStyle,
    pub background: String,
    pub class_name: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            style: HighlightStyle::default(),
            background: DEFAULT_MARKER_BACKGROUND.to_string(),
            class_name: DEFAULT_MARKER_CLASS.to_string(),
        }
    }
}

/// Everything the three contexts read at startup. Missing fields take their
/// defaults, so a config file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    pub settings_key: String,
    pub default_enabled: bool,
    pub toggle_command: String,
    pub highlight: HighlightConfig,
    pub content_selectors: Vec<String>,
    pub instructions_asset: String,
    pub banner_duration_ms: u64,
    pub assistant: AssistantEndpoint,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            settings_key: ENABLED_KEY.to_string(),
            default_enabled: DEFAULT_ENABLED,
            toggle_command: DEFAULT_TOGGLE_COMMAND.to_string(),
            highlight: HighlightConfig::default(),
            content_selectors: DEFAULT_CONTENT_SELECTORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            instructions_asset: DEFAULT_INSTRUCTIONS_ASSET.to_string(),
            banner_duration_ms: DEFAULT_BANNER_DURATION_MS,
            assistant: AssistantEndpoint::default(),
        }
    }
}

impl ExtensionConfig {
    /// Parses and validates a RON document.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new();
        ron::ser::to_string_pretty(self, pretty).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content_selectors.is_empty() {
            return Err(ConfigError::NoSelectors);
        }
        self.assistant.validate()?;
        Ok(())
    }

    pub fn agent_options(&self) -> AgentOptions {
        AgentOptions {
            default_enabled: self.default_enabled,
            highlight_style: self.highlight.style,
            marker_background: self.highlight.background.clone(),
            marker_class: self.highlight.class_name.clone(),
            instructions_asset: self.instructions_asset.clone(),
            banner_duration_ms: self.banner_duration_ms,
        }
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            default_enabled: self.default_enabled,
            toggle_command: self.toggle_command.clone(),
            assistant: self.assistant.clone(),
        }
    }

    pub fn extractor(&self) -> SelectorPriorityExtractor {
        SelectorPriorityExtractor::new(&self.content_selectors)
    }
}
