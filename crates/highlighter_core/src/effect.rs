use crate::highlight::HighlightMarker;
use crate::notice::Banner;
use crate::protocol::ActionMessage;

/// Work the page agent runtime performs after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace the current selection with a marker, then clear the selection.
    MarkSelection(HighlightMarker),
    /// Copy the main content and reply `{ success }`.
    CopyMainContent,
    /// Fetch the instructions asset, copy it with the main content and reply
    /// `{ success }` once done.
    CopyWithInstructions { asset: String },
    /// Reply `{ text }` with the main content.
    ReplyAnnotatedText,
    ShowBanner(Banner),
}

/// Work the controller runtime performs after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEffect {
    /// Persist the enabled flag.
    StoreFlag(bool),
    /// Send to the active tab without waiting for a reply.
    PostToActiveTab(ActionMessage),
    /// Send to the active tab and feed the reply back as
    /// [`crate::ControllerMsg::ResponseReceived`].
    RequestFromActiveTab(ActionMessage),
    ClosePopup,
    OpenTab { url: String },
}
