use std::cell::RefCell;
use std::sync::Once;

use async_trait::async_trait;
use highlighter_core::{ActionMessage, AgentOptions, AgentResponse, Banner, HighlightMarker};
use highlighter_engine::{
    AssetError, AssetLoader, ClipboardError, Dispatch, MemoryClipboard, MemoryPage,
    MemorySettingsStore, PageAgent, PageError, PageSurface, SelectorPriorityExtractor,
    StaticAssetLoader, ENABLED_KEY,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::oneshot;

const ARTICLE: &str =
    "<html><body><nav>Home</nav><article><p>The quick brown fox</p></article></body></html>";
const MARKER_CLASS: &str = "page-highlighter-mark";

type TestAgent = PageAgent<MemoryPage, MemoryClipboard, StaticAssetLoader>;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(ext_logging::initialize_for_tests);
}

fn agent_with(clipboard: MemoryClipboard, assets: StaticAssetLoader) -> TestAgent {
    PageAgent::new(
        AgentOptions::default(),
        MemoryPage::new(ARTICLE),
        clipboard,
        assets,
        Box::new(SelectorPriorityExtractor::default()),
    )
}

fn agent() -> TestAgent {
    agent_with(
        MemoryClipboard::new(),
        StaticAssetLoader::new().with_asset("instructions.txt", "Summarise this page.\n"),
    )
}

async fn loaded(stored: Option<bool>) -> TestAgent {
    let store = MemorySettingsStore::new();
    if let Some(flag) = stored {
        store.insert(ENABLED_KEY, json!(flag));
    }
    let mut agent = agent();
    agent.load(&store, ENABLED_KEY).await;
    agent
}

#[tokio::test]
async fn initial_state_mirrors_the_store() {
    init_logging();
    assert!(loaded(Some(true)).await.is_enabled());
    assert!(!loaded(Some(false)).await.is_enabled());
    assert!(!loaded(None).await.is_enabled());
}

#[tokio::test]
async fn non_boolean_setting_counts_as_unset() {
    init_logging();
    let store = MemorySettingsStore::with_value(ENABLED_KEY, json!("yes"));
    let mut agent = agent();
    agent.load(&store, ENABLED_KEY).await;
    assert!(!agent.is_enabled());
}

#[tokio::test]
async fn disabled_agent_leaves_the_page_alone() {
    init_logging();
    let mut agent = loaded(Some(false)).await;
    assert!(agent.page_mut().select("quick"));

    agent.pointer_released();

    assert_eq!(agent.page().document_html(), ARTICLE);
    assert!(agent.page().has_selection());
}

#[tokio::test]
async fn enabled_agent_wraps_selection_in_one_marker() {
    init_logging();
    let mut agent = loaded(Some(true)).await;
    assert!(agent.page_mut().select("quick"));

    agent.pointer_released();

    assert_eq!(agent.page().marker_count(MARKER_CLASS), 1);
    assert!(!agent.page().has_selection());
    assert!(agent.page().document_html().contains(
        "<span class=\"page-highlighter-mark\" style=\"background-color: yellow\">**quick**</span>"
    ));
    assert_eq!(agent.extract_main_content(), "The **quick** brown fox");
    assert_eq!(agent.state().highlight_count(), 1);
}

#[tokio::test]
async fn release_without_selection_does_nothing() {
    init_logging();
    let mut agent = loaded(Some(true)).await;
    agent.pointer_released();
    assert_eq!(agent.page().document_html(), ARTICLE);
    assert_eq!(agent.state().highlight_count(), 0);
}

#[tokio::test]
async fn toggle_message_controls_highlighting() {
    init_logging();
    let mut agent = loaded(Some(true)).await;
    let reply = agent
        .handle(ActionMessage::ToggleHighlighter { enabled: false })
        .await;
    assert_eq!(reply, None);

    agent.page_mut().select("brown");
    agent.pointer_released();
    assert_eq!(agent.page().marker_count(MARKER_CLASS), 0);
}

#[tokio::test]
async fn copy_all_text_stages_main_content() {
    init_logging();
    let mut agent = loaded(None).await;
    let reply = agent.handle(ActionMessage::CopyAllText).await;

    assert_eq!(reply, Some(AgentResponse::copied(true)));
    assert_eq!(agent.clipboard().last(), Some("The quick brown fox"));
}

#[tokio::test]
async fn failed_copy_replies_false() {
    init_logging();
    let mut agent = agent_with(
        MemoryClipboard::failing(ClipboardError::StagingUnavailable("no body".into())),
        StaticAssetLoader::new(),
    );
    let reply = agent.handle(ActionMessage::CopyAllText).await;
    assert_eq!(reply, Some(AgentResponse::copied(false)));
}

#[tokio::test]
async fn copy_with_instructions_is_deferred_and_composed() {
    init_logging();
    let mut agent = loaded(None).await;

    let Dispatch::Deferred(pending) = agent.dispatch(ActionMessage::CopyWithInstructions) else {
        panic!("instructions copy should be deferred");
    };
    let loaded = pending.loaded().await;
    assert_eq!(agent.complete_copy(loaded), Some(AgentResponse::copied(true)));

    assert_eq!(
        agent.clipboard().last(),
        Some("Summarise this page.\n\nThe quick brown fox")
    );
}

#[tokio::test]
async fn missing_instructions_fail_the_copy() {
    init_logging();
    let mut agent = agent_with(MemoryClipboard::new(), StaticAssetLoader::new());
    let reply = agent.handle(ActionMessage::CopyWithInstructions).await;

    assert_eq!(reply, Some(AgentResponse::copied(false)));
    assert!(agent.clipboard().copies().is_empty());
}

#[tokio::test]
async fn annotated_text_and_notifications() {
    init_logging();
    let mut agent = loaded(Some(true)).await;
    agent.page_mut().select("fox");
    agent.pointer_released();

    let Dispatch::Immediate(reply) = agent.dispatch(ActionMessage::GetAnnotatedText) else {
        panic!("annotated text should be immediate");
    };
    assert_eq!(
        reply,
        Some(AgentResponse::Text {
            text: "The quick brown **fox**".to_string()
        })
    );

    let reply = agent
        .handle(ActionMessage::ShowNotification {
            message: "Done".to_string(),
        })
        .await;
    assert_eq!(reply, None);
    assert_eq!(
        agent.page().banners(),
        &[Banner {
            message: "Done".to_string(),
            duration_ms: 3_000,
        }]
    );
}

/// Serves one asset once `release` fires.
struct GatedAssets {
    gate: RefCell<Option<oneshot::Receiver<()>>>,
    text: String,
}

#[async_trait(?Send)]
impl AssetLoader for GatedAssets {
    async fn load_text(&self, path: &str) -> Result<String, AssetError> {
        let gate = self.gate.borrow_mut().take();
        let released = match gate {
            Some(gate) => gate.await.is_ok(),
            None => false,
        };
        if released {
            Ok(self.text.clone())
        } else {
            Err(AssetError::NotFound(path.to_string()))
        }
    }
}

#[tokio::test]
async fn messages_are_handled_while_instructions_load() {
    init_logging();
    let (release, gate) = oneshot::channel();
    let mut agent = PageAgent::new(
        AgentOptions::default(),
        MemoryPage::new(ARTICLE),
        MemoryClipboard::new(),
        GatedAssets {
            gate: RefCell::new(Some(gate)),
            text: "Summarise.".to_string(),
        },
        Box::new(SelectorPriorityExtractor::default()),
    );

    let dispatch = agent.dispatch(ActionMessage::CopyWithInstructions);
    assert!(dispatch.is_deferred());
    let Dispatch::Deferred(pending) = dispatch else {
        unreachable!();
    };
    let loading = pending.loaded();

    // The agent is free while the asset is outstanding.
    let reply = agent
        .handle(ActionMessage::ToggleHighlighter { enabled: true })
        .await;
    assert_eq!(reply, None);
    assert!(agent.is_enabled());

    agent.page_mut().select("brown");
    agent.pointer_released();
    assert_eq!(agent.page().marker_count(MARKER_CLASS), 1);

    release.send(()).expect("loader is waiting");
    let loaded = loading.await;
    assert_eq!(agent.complete_copy(loaded), Some(AgentResponse::copied(true)));
    assert_eq!(
        agent.clipboard().last(),
        Some("Summarise.\n\nThe quick **brown** fox")
    );
}

/// Reports a selection but refuses every marker.
struct ReadOnlyPage;

impl PageSurface for ReadOnlyPage {
    fn selected_text(&self) -> Option<String> {
        Some("locked".to_string())
    }

    fn mark_selection(&mut self, _marker: &HighlightMarker) -> Result<(), PageError> {
        Err(PageError::Dom("node is not editable".to_string()))
    }

    fn clear_selection(&mut self) {}

    fn document_html(&self) -> String {
        "<p>locked</p>".to_string()
    }

    fn show_banner(&mut self, _banner: &Banner) {}
}

#[tokio::test]
async fn rejected_markers_are_not_counted() {
    init_logging();
    let mut agent = PageAgent::new(
        AgentOptions::default(),
        ReadOnlyPage,
        MemoryClipboard::new(),
        StaticAssetLoader::new(),
        Box::new(SelectorPriorityExtractor::default()),
    );
    agent.settings_loaded(Some(true));

    agent.pointer_released();

    assert_eq!(agent.state().highlight_count(), 0);
}
