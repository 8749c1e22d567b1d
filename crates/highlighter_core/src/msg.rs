use crate::protocol::{ActionMessage, AgentResponse};

/// Inputs to the page agent state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The settings store answered the initial read (`None` when unset).
    SettingsLoaded(Option<bool>),
    /// The user released the pointer; carries the current selection text.
    PointerReleased { selection: Option<String> },
    /// The page accepted the marker produced for the last selection.
    MarkerPlaced,
    /// An action message arrived from the controller.
    Action(ActionMessage),
    /// Fallback for placeholder wiring.
    NoOp,
}

/// Inputs to the controller state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerMsg {
    /// The popup finished loading; carries the stored flag.
    PopupOpened { stored: Option<bool> },
    /// A keyboard command fired; carries the stored flag read beforehand.
    CommandReceived { command: String, stored: Option<bool> },
    /// The popup checkbox changed to the given value.
    CheckboxChanged(bool),
    CopyClicked,
    CopyWithInstructionsClicked,
    OpenAssistantClicked,
    /// The page agent answered the pending request (`None` when it did not).
    ResponseReceived(Option<AgentResponse>),
}
