use highlighter_engine::{AssetLoader, ExtensionConfig};
use highlighter_ext::{bundled_assets, bundled_config, BUNDLED_INSTRUCTIONS};
use pretty_assertions::assert_eq;
use serde_json::Value;

const MANIFEST: &str = include_str!("../static/manifest.json");

#[test]
fn bundled_config_matches_the_built_in_defaults() {
    let config = bundled_config().expect("bundled config parses");
    assert_eq!(config, ExtensionConfig::default());
}

#[test]
fn article_is_the_first_content_selector() {
    let config = bundled_config().expect("bundled config parses");
    assert_eq!(config.content_selectors.first().map(String::as_str), Some("article"));
    assert!(config.content_selectors.iter().any(|s| s == "[role=\"main\"]"));
}

#[tokio::test]
async fn instructions_load_from_the_bundled_assets() {
    let config = bundled_config().expect("bundled config parses");
    let text = bundled_assets(&config)
        .load_text(&config.instructions_asset)
        .await
        .expect("instructions are bundled");
    assert_eq!(text, BUNDLED_INSTRUCTIONS);
    assert!(!text.trim().is_empty());
}

#[test]
fn manifest_declares_the_configured_command() {
    let config = bundled_config().expect("bundled config parses");
    let manifest: Value = serde_json::from_str(MANIFEST).expect("manifest is json");

    assert_eq!(manifest["manifest_version"], 3);
    assert!(manifest["commands"][config.toggle_command.as_str()].is_object());
    let permissions = manifest["permissions"].as_array().expect("permissions");
    assert!(permissions.iter().any(|p| p == "storage"));
}

#[test]
fn manifest_exposes_the_instructions_asset() {
    let config = bundled_config().expect("bundled config parses");
    let manifest: Value = serde_json::from_str(MANIFEST).expect("manifest is json");

    let resources = manifest["web_accessible_resources"][0]["resources"]
        .as_array()
        .expect("resources");
    assert!(resources
        .iter()
        .any(|r| r.as_str() == Some(config.instructions_asset.as_str())));
}

const BACKGROUND_JS: &str = include_str!("../static/background.js");

#[test]
fn command_listener_is_registered_at_top_level() {
    // A worker woken by a shortcut only sees listeners added synchronously.
    let listener = BACKGROUND_JS
        .lines()
        .position(|line| line.starts_with("chrome.commands.onCommand.addListener("))
        .expect("top-level onCommand listener");
    let startup = BACKGROUND_JS
        .lines()
        .position(|line| line.contains("init()"))
        .expect("module startup");

    assert!(listener > startup);
    assert!(BACKGROUND_JS.contains("handle_command(command)"));
    assert!(!BACKGROUND_JS.contains("await init()"));
}
