use highlighter_core::HighlightStyle;
use highlighter_engine::{ConfigError, ExtensionConfig, DEFAULT_CONTENT_SELECTORS};
use pretty_assertions::assert_eq;

#[test]
fn defaults_survive_a_ron_round_trip() {
    let config = ExtensionConfig::default();
    let text = config.to_ron().expect("serialize");
    assert_eq!(ExtensionConfig::from_ron(&text).expect("parse"), config);
}

#[test]
fn partial_config_keeps_other_defaults() {
    let config = ExtensionConfig::from_ron(
        r#"(
            default_enabled: true,
            highlight: (style: Emphasis),
            assistant: (max_url_len: 2000),
        )"#,
    )
    .expect("parse");

    assert!(config.default_enabled);
    assert_eq!(config.highlight.style, HighlightStyle::Emphasis);
    assert_eq!(config.highlight.background, "yellow");
    assert_eq!(config.assistant.max_url_len, 2000);
    assert_eq!(config.assistant.base_url, "https://chatgpt.com/");
    assert_eq!(config.content_selectors.len(), DEFAULT_CONTENT_SELECTORS.len());
    assert_eq!(config.settings_key, "highlighterEnabled");
}

#[test]
fn derived_options_follow_the_config() {
    let config = ExtensionConfig::from_ron(
        r#"(default_enabled: true, toggle_command: "flip", banner_duration_ms: 500)"#,
    )
    .expect("parse");

    let agent = config.agent_options();
    assert!(agent.default_enabled);
    assert_eq!(agent.banner_duration_ms, 500);
    assert_eq!(agent.instructions_asset, "instructions.txt");

    let controller = config.controller_options();
    assert!(controller.default_enabled);
    assert_eq!(controller.toggle_command, "flip");
}

#[test]
fn invalid_configs_are_rejected() {
    assert!(matches!(
        ExtensionConfig::from_ron("(content_selectors: [])"),
        Err(ConfigError::NoSelectors)
    ));
    assert!(matches!(
        ExtensionConfig::from_ron(r#"(assistant: (base_url: "nope"))"#),
        Err(ConfigError::Assistant(_))
    ));
    assert!(matches!(
        ExtensionConfig::from_ron("(default_enabled: maybe)"),
        Err(ConfigError::Parse(_))
    ));
}
