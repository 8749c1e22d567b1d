use crate::highlight::{HighlightStyle, DEFAULT_MARKER_BACKGROUND, DEFAULT_MARKER_CLASS};
use crate::notice::DEFAULT_BANNER_DURATION_MS;

/// Enabled flag value used when the settings store holds nothing.
pub const DEFAULT_ENABLED: bool = false;

pub const DEFAULT_INSTRUCTIONS_ASSET: &str = "instructions.txt";

/// Knobs the page agent reads from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentOptions {
    pub default_enabled: bool,
    pub highlight_style: HighlightStyle,
    pub marker_background: String,
    pub marker_class: String,
    pub instructions_asset: String,
    pub banner_duration_ms: u64,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            default_enabled: DEFAULT_ENABLED,
            highlight_style: HighlightStyle::default(),
            marker_background: DEFAULT_MARKER_BACKGROUND.to_string(),
            marker_class: DEFAULT_MARKER_CLASS.to_string(),
            instructions_asset: DEFAULT_INSTRUCTIONS_ASSET.to_string(),
            banner_duration_ms: DEFAULT_BANNER_DURATION_MS,
        }
    }
}

/// Where the enabled flag currently comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagSource {
    /// Nothing loaded yet; the configured default applies.
    #[default]
    Default,
    /// Initialised from the settings store.
    Store,
    /// Set by a toggle message. The store is not consulted again.
    Message,
}

/// Session-scoped state of one page agent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AgentState {
    options: AgentOptions,
    enabled: bool,
    source: FlagSource,
    highlights: usize,
}

impl AgentState {
    pub fn new(options: AgentOptions) -> Self {
        Self {
            enabled: options.default_enabled,
            options,
            source: FlagSource::Default,
            highlights: 0,
        }
    }

    pub fn options(&self) -> &AgentOptions {
        &self.options
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn flag_source(&self) -> FlagSource {
        self.source
    }

    /// Markers the page accepted during this session.
    pub fn highlight_count(&self) -> usize {
        self.highlights
    }

    pub(crate) fn load_flag(&mut self, stored: Option<bool>) -> bool {
        if self.source == FlagSource::Message {
            return false;
        }
        self.enabled = stored.unwrap_or(self.options.default_enabled);
        self.source = FlagSource::Store;
        true
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.source = FlagSource::Message;
    }

    pub(crate) fn record_highlight(&mut self) {
        self.highlights += 1;
    }
}
