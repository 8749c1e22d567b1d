use ext_logging::{ext_debug, ext_warn};

use crate::assistant::AssistantEndpoint;
use crate::notice::{
    ASSISTANT_TRUNCATED, COPY_FAILURE, COPY_SUCCESS, COPY_WITH_INSTRUCTIONS_SUCCESS, TEXT_FAILURE,
};
use crate::state::DEFAULT_ENABLED;
use crate::{ActionMessage, AgentResponse, ControllerEffect, ControllerMsg};

pub const DEFAULT_TOGGLE_COMMAND: &str = "toggle-highlighter";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerOptions {
    pub default_enabled: bool,
    pub toggle_command: String,
    pub assistant: AssistantEndpoint,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            default_enabled: DEFAULT_ENABLED,
            toggle_command: DEFAULT_TOGGLE_COMMAND.to_string(),
            assistant: AssistantEndpoint::default(),
        }
    }
}

/// The request the controller is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingRequest {
    Copy,
    CopyWithInstructions,
    AnnotatedText,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControllerState {
    options: ControllerOptions,
    checkbox: bool,
    pending: Option<PendingRequest>,
}

impl ControllerState {
    pub fn new(options: ControllerOptions) -> Self {
        Self {
            checkbox: options.default_enabled,
            options,
            pending: None,
        }
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    /// Value the popup checkbox shows.
    pub fn checkbox(&self) -> bool {
        self.checkbox
    }

    pub fn pending(&self) -> Option<PendingRequest> {
        self.pending
    }

    fn begin(&mut self, request: PendingRequest, message: ActionMessage) -> Vec<ControllerEffect> {
        if let Some(current) = self.pending {
            ext_debug!("ignoring {request:?}; {current:?} still in flight");
            return Vec::new();
        }
        self.pending = Some(request);
        vec![ControllerEffect::RequestFromActiveTab(message)]
    }
}

/// Pure update function for the controller (background command handler and
/// popup).
pub fn update_controller(
    mut state: ControllerState,
    msg: ControllerMsg,
) -> (ControllerState, Vec<ControllerEffect>) {
    let effects = match msg {
        ControllerMsg::PopupOpened { stored } => {
            state.checkbox = stored.unwrap_or(state.options.default_enabled);
            Vec::new()
        }
        ControllerMsg::CommandReceived { command, stored } => {
            if command != state.options.toggle_command {
                ext_debug!("ignoring unknown command {command:?}");
                return (state, Vec::new());
            }
            let enabled = !stored.unwrap_or(state.options.default_enabled);
            state.checkbox = enabled;
            toggle_effects(enabled)
        }
        ControllerMsg::CheckboxChanged(checked) => {
            state.checkbox = checked;
            toggle_effects(checked)
        }
        ControllerMsg::CopyClicked => state.begin(PendingRequest::Copy, ActionMessage::CopyAllText),
        ControllerMsg::CopyWithInstructionsClicked => state.begin(
            PendingRequest::CopyWithInstructions,
            ActionMessage::CopyWithInstructions,
        ),
        ControllerMsg::OpenAssistantClicked => state.begin(
            PendingRequest::AnnotatedText,
            ActionMessage::GetAnnotatedText,
        ),
        ControllerMsg::ResponseReceived(response) => match state.pending.take() {
            Some(PendingRequest::Copy) => copy_outcome(response.as_ref(), COPY_SUCCESS),
            Some(PendingRequest::CopyWithInstructions) => {
                copy_outcome(response.as_ref(), COPY_WITH_INSTRUCTIONS_SUCCESS)
            }
            Some(PendingRequest::AnnotatedText) => {
                assistant_outcome(&state.options.assistant, response.as_ref())
            }
            None => {
                ext_debug!("dropping unsolicited response {response:?}");
                Vec::new()
            }
        },
    };

    (state, effects)
}

fn toggle_effects(enabled: bool) -> Vec<ControllerEffect> {
    vec![
        ControllerEffect::StoreFlag(enabled),
        ControllerEffect::PostToActiveTab(ActionMessage::ToggleHighlighter { enabled }),
    ]
}

fn notify(message: &str) -> ControllerEffect {
    ControllerEffect::PostToActiveTab(ActionMessage::ShowNotification {
        message: message.to_string(),
    })
}

fn copy_outcome(response: Option<&AgentResponse>, success_message: &str) -> Vec<ControllerEffect> {
    if response.is_some_and(AgentResponse::is_success) {
        // The popup cannot run anything once closed, so notify first.
        vec![notify(success_message), ControllerEffect::ClosePopup]
    } else {
        vec![notify(COPY_FAILURE)]
    }
}

fn assistant_outcome(
    endpoint: &AssistantEndpoint,
    response: Option<&AgentResponse>,
) -> Vec<ControllerEffect> {
    let Some(text) = response.and_then(AgentResponse::text) else {
        return vec![notify(TEXT_FAILURE)];
    };
    match endpoint.compose_link(text) {
        Ok(link) => {
            let mut effects = Vec::with_capacity(2);
            if link.truncated {
                ext_warn!(
                    "assistant payload truncated to {} of {} chars",
                    link.kept_chars,
                    text.chars().count()
                );
                effects.push(notify(ASSISTANT_TRUNCATED));
            }
            effects.push(ControllerEffect::OpenTab { url: link.url });
            effects
        }
        Err(err) => {
            ext_warn!("cannot build assistant link: {err}");
            vec![notify(TEXT_FAILURE)]
        }
    }
}
