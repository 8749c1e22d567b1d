//! Page agent runtime: feeds events into the core state machine and executes
//! the resulting effects against the page, the clipboard and the assets.
use std::rc::Rc;

use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;

use ext_logging::{ext_debug, ext_info, ext_warn};
use highlighter_core::{
    compose_with_instructions, update, ActionMessage, AgentOptions, AgentResponse, AgentState,
    Banner, Effect, HighlightMarker, Msg,
};

use crate::asset::AssetLoader;
use crate::clipboard::Clipboard;
use crate::extract::Extractor;
use crate::page::PageSurface;
use crate::store::{read_flag, SettingsStore};
use crate::AssetError;

/// How the answer to an inbound message is delivered.
pub enum Dispatch {
    /// The reply is ready now.
    Immediate(Option<AgentResponse>),
    /// The reply needs an asset first; the reply channel must stay open until
    /// [`PageAgent::complete_copy`] has run.
    Deferred(PendingCopy),
}

impl Dispatch {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Dispatch::Deferred(_))
    }
}

/// An instructions copy waiting on its asset. The load does not borrow the
/// agent, so other messages are handled while it is in flight.
pub struct PendingCopy {
    load: LocalBoxFuture<'static, Result<String, AssetError>>,
}

impl PendingCopy {
    pub async fn loaded(self) -> LoadedInstructions {
        LoadedInstructions(self.load.await)
    }
}

/// Outcome of a [`PendingCopy`], consumed by [`PageAgent::complete_copy`].
#[derive(Debug)]
pub struct LoadedInstructions(Result<String, AssetError>);

pub struct PageAgent<P, C, A> {
    state: AgentState,
    page: P,
    clipboard: C,
    assets: Rc<A>,
    extractor: Box<dyn Extractor>,
}

impl<P, C, A> PageAgent<P, C, A>
where
    P: PageSurface,
    C: Clipboard,
    A: AssetLoader + 'static,
{
    pub fn new(
        options: AgentOptions,
        page: P,
        clipboard: C,
        assets: A,
        extractor: Box<dyn Extractor>,
    ) -> Self {
        Self {
            state: AgentState::new(options),
            page,
            clipboard,
            assets: Rc::new(assets),
            extractor,
        }
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Reads the enabled flag once the page has loaded. A failed read leaves
    /// the configured default in place.
    pub async fn load(&mut self, store: &dyn SettingsStore, key: &str) {
        let stored = match read_flag(store, key).await {
            Ok(stored) => stored,
            Err(err) => {
                ext_warn!("reading {key} failed, using default: {err}");
                None
            }
        };
        self.settings_loaded(stored);
    }

    /// Applies an initial flag read performed elsewhere.
    pub fn settings_loaded(&mut self, stored: Option<bool>) {
        let effects = self.apply(Msg::SettingsLoaded(stored));
        debug_assert!(effects.is_empty());
    }

    /// Handles the end of a selection gesture.
    pub fn pointer_released(&mut self) {
        if !self.state.is_enabled() {
            return;
        }
        let selection = self.page.selected_text();
        for effect in self.apply(Msg::PointerReleased { selection }) {
            if let Effect::MarkSelection(marker) = effect {
                self.mark(&marker);
            }
        }
    }

    /// Single entry point for inbound action messages.
    pub fn dispatch(&mut self, message: ActionMessage) -> Dispatch {
        ext_debug!("dispatching {}", message.name());
        let mut response = None;
        for effect in self.apply(Msg::Action(message)) {
            match effect {
                Effect::CopyMainContent => {
                    response = Some(AgentResponse::copied(self.copy_all_text()));
                }
                Effect::CopyWithInstructions { asset } => {
                    let assets = Rc::clone(&self.assets);
                    let load = async move { assets.load_text(&asset).await }.boxed_local();
                    return Dispatch::Deferred(PendingCopy { load });
                }
                Effect::ReplyAnnotatedText => {
                    response = Some(AgentResponse::Text {
                        text: self.extract_main_content(),
                    });
                }
                Effect::ShowBanner(banner) => self.show_notification(&banner),
                Effect::MarkSelection(marker) => self.mark(&marker),
            }
        }
        Dispatch::Immediate(response)
    }

    /// Finishes a deferred instructions copy with the page as it is now.
    pub fn complete_copy(&mut self, loaded: LoadedInstructions) -> Option<AgentResponse> {
        let success = match loaded.0 {
            Ok(instructions) => self.stage_with_instructions(&instructions),
            Err(err) => {
                ext_warn!("loading instructions failed: {err}");
                false
            }
        };
        Some(AgentResponse::copied(success))
    }

    /// Convenience for callers that own the agent for the whole exchange.
    pub async fn handle(&mut self, message: ActionMessage) -> Option<AgentResponse> {
        match self.dispatch(message) {
            Dispatch::Immediate(response) => response,
            Dispatch::Deferred(pending) => {
                let loaded = pending.loaded().await;
                self.complete_copy(loaded)
            }
        }
    }

    pub fn extract_main_content(&self) -> String {
        self.extractor.extract(&self.page.document_html())
    }

    pub fn copy_all_text(&mut self) -> bool {
        let text = self.extract_main_content();
        self.stage_and_copy(&text)
    }

    pub async fn copy_with_instructions(&mut self, asset: &str) -> bool {
        match self.assets.load_text(asset).await {
            Ok(instructions) => self.stage_with_instructions(&instructions),
            Err(err) => {
                ext_warn!("loading instructions failed: {err}");
                false
            }
        }
    }

    pub fn show_notification(&mut self, banner: &Banner) {
        self.page.show_banner(banner);
    }

    fn apply(&mut self, msg: Msg) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        effects
    }

    fn mark(&mut self, marker: &HighlightMarker) {
        match self.page.mark_selection(marker) {
            Ok(()) => {
                ext_debug!("highlighted {} chars", marker.decorated.len());
                let effects = self.apply(Msg::MarkerPlaced);
                debug_assert!(effects.is_empty());
            }
            Err(err) => ext_warn!("highlight failed: {err}"),
        }
        self.page.clear_selection();
    }

    fn stage_with_instructions(&mut self, instructions: &str) -> bool {
        let content = self.extract_main_content();
        let composed = compose_with_instructions(instructions, &content);
        self.stage_and_copy(&composed)
    }

    fn stage_and_copy(&mut self, text: &str) -> bool {
        match self.clipboard.copy_text(text) {
            Ok(()) => {
                ext_info!("copied {} chars", text.chars().count());
                true
            }
            Err(err) => {
                ext_warn!("copy failed: {err}");
                false
            }
        }
    }
}
