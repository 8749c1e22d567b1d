use std::collections::VecDeque;

use ext_logging::{ext_info, ext_warn};
use highlighter_core::{
    update_controller, ActionMessage, AgentResponse, ControllerEffect, ControllerMsg,
    ControllerOptions, ControllerState,
};

use crate::store::{read_flag, write_flag, SettingsStore};
use crate::transport::TabMessenger;
use crate::TransportError;

/// The popup window hosting the controls, when the controller runs in one.
pub trait PopupWindow {
    fn close(&self);
}

/// Executes controller effects against the settings store and the tabs.
pub struct Controller<S, M> {
    state: ControllerState,
    store: S,
    messenger: M,
    settings_key: String,
    popup: Option<Box<dyn PopupWindow>>,
}

impl<S, M> Controller<S, M>
where
    S: SettingsStore,
    M: TabMessenger,
{
    /// Controller for the background context (keyboard commands).
    pub fn background(
        options: ControllerOptions,
        store: S,
        messenger: M,
        settings_key: &str,
    ) -> Self {
        Self {
            state: ControllerState::new(options),
            store,
            messenger,
            settings_key: settings_key.to_string(),
            popup: None,
        }
    }

    /// Controller for the popup; `popup` is closed after successful copies.
    pub fn popup(
        options: ControllerOptions,
        store: S,
        messenger: M,
        settings_key: &str,
        popup: Box<dyn PopupWindow>,
    ) -> Self {
        Self {
            popup: Some(popup),
            ..Self::background(options, store, messenger, settings_key)
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Loads the stored flag for the checkbox and returns what it should show.
    pub async fn popup_opened(&mut self) -> bool {
        let stored = self.stored_flag().await;
        self.process(ControllerMsg::PopupOpened { stored }).await;
        self.state.checkbox()
    }

    pub async fn on_command(&mut self, command: &str) {
        let stored = self.stored_flag().await;
        self.process(ControllerMsg::CommandReceived {
            command: command.to_string(),
            stored,
        })
        .await;
    }

    pub async fn on_checkbox_changed(&mut self, checked: bool) {
        self.process(ControllerMsg::CheckboxChanged(checked)).await;
    }

    pub async fn copy_clicked(&mut self) {
        self.process(ControllerMsg::CopyClicked).await;
    }

    pub async fn copy_with_instructions_clicked(&mut self) {
        self.process(ControllerMsg::CopyWithInstructionsClicked).await;
    }

    pub async fn open_assistant_clicked(&mut self) {
        self.process(ControllerMsg::OpenAssistantClicked).await;
    }

    async fn stored_flag(&self) -> Option<bool> {
        match read_flag(&self.store, &self.settings_key).await {
            Ok(stored) => stored,
            Err(err) => {
                ext_warn!("reading {} failed: {err}", self.settings_key);
                None
            }
        }
    }

    async fn process(&mut self, msg: ControllerMsg) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update_controller(state, msg);
            self.state = state;
            for effect in effects {
                if let Some(next) = self.run(effect).await {
                    inbox.push_back(next);
                }
            }
        }
    }

    async fn run(&mut self, effect: ControllerEffect) -> Option<ControllerMsg> {
        match effect {
            ControllerEffect::StoreFlag(enabled) => {
                if let Err(err) = write_flag(&self.store, &self.settings_key, enabled).await {
                    ext_warn!("storing {}={enabled} failed: {err}", self.settings_key);
                }
                None
            }
            ControllerEffect::PostToActiveTab(message) => {
                if let Err(err) = self.post(message).await {
                    ext_warn!("message not delivered: {err}");
                }
                None
            }
            ControllerEffect::RequestFromActiveTab(message) => {
                let response = match self.request(message).await {
                    Ok(response) => response,
                    Err(err) => {
                        ext_warn!("request not delivered: {err}");
                        None
                    }
                };
                Some(ControllerMsg::ResponseReceived(response))
            }
            ControllerEffect::ClosePopup => {
                if let Some(popup) = &self.popup {
                    popup.close();
                }
                None
            }
            ControllerEffect::OpenTab { url } => {
                ext_info!("opening assistant tab ({} bytes)", url.len());
                if let Err(err) = self.messenger.open_tab(&url).await {
                    ext_warn!("opening tab failed: {err}");
                }
                None
            }
        }
    }

    async fn post(&self, message: ActionMessage) -> Result<(), TransportError> {
        let tab = self.messenger.active_tab().await?;
        self.messenger.post(tab, message).await
    }

    async fn request(
        &self,
        message: ActionMessage,
    ) -> Result<Option<AgentResponse>, TransportError> {
        let tab = self.messenger.active_tab().await?;
        self.messenger.request(tab, message).await
    }
}
