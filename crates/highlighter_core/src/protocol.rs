use serde::{Deserialize, Serialize};

/// A one-shot request sent from the controller to a page agent.
///
/// Serialized as `{ "action": "...", "enabled"?: bool, "message"?: string }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ActionMessage {
    /// Replace the agent's enabled flag.
    ToggleHighlighter { enabled: bool },
    /// Copy the page's main content.
    CopyAllText,
    /// Copy the bundled instructions followed by the page's main content.
    CopyWithInstructions,
    /// Reply with the page's main content, highlights included.
    GetAnnotatedText,
    /// Render an on-page banner.
    ShowNotification { message: String },
}

impl ActionMessage {
    pub fn name(&self) -> &'static str {
        match self {
            ActionMessage::ToggleHighlighter { .. } => "toggleHighlighter",
            ActionMessage::CopyAllText => "copyAllText",
            ActionMessage::CopyWithInstructions => "copyWithInstructions",
            ActionMessage::GetAnnotatedText => "getAnnotatedText",
            ActionMessage::ShowNotification { .. } => "showNotification",
        }
    }

    /// How the receiving side answers this action. Only the instructions copy
    /// has to wait for an asset fetch before it can reply.
    pub fn response_mode(&self) -> ResponseMode {
        match self {
            ActionMessage::CopyWithInstructions => ResponseMode::Deferred,
            _ => ResponseMode::Immediate,
        }
    }

    /// Whether the sender is expected to wait for a reply payload.
    pub fn expects_reply(&self) -> bool {
        matches!(
            self,
            ActionMessage::CopyAllText
                | ActionMessage::CopyWithInstructions
                | ActionMessage::GetAnnotatedText
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// The reply is known when the handler returns.
    Immediate,
    /// The reply arrives later; the channel must stay open until then.
    Deferred,
}

/// Reply payload from a page agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgentResponse {
    Copied { success: bool },
    Text { text: String },
}

impl AgentResponse {
    pub fn copied(success: bool) -> Self {
        AgentResponse::Copied { success }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AgentResponse::Copied { success: true })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            AgentResponse::Text { text } => Some(text),
            AgentResponse::Copied { .. } => None,
        }
    }
}
