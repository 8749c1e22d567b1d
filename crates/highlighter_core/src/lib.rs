//! Highlighter core: message schema and the pure state machines of the page
//! agent and the controller.
mod assistant;
mod compose;
mod controller;
mod effect;
mod highlight;
mod msg;
mod notice;
mod protocol;
mod state;
mod update;

pub use assistant::{
    AssistantEndpoint, AssistantLink, LinkError, DEFAULT_ASSISTANT_URL, DEFAULT_MAX_URL_LEN,
    DEFAULT_QUERY_PARAM,
};
pub use compose::compose_with_instructions;
pub use controller::{
    update_controller, ControllerOptions, ControllerState, PendingRequest, DEFAULT_TOGGLE_COMMAND,
};
pub use effect::{ControllerEffect, Effect};
pub use highlight::{
    decorate, HighlightMarker, HighlightStyle, DEFAULT_MARKER_BACKGROUND, DEFAULT_MARKER_CLASS,
};
pub use msg::{ControllerMsg, Msg};
pub use notice::{
    Banner, ASSISTANT_TRUNCATED, COPY_FAILURE, COPY_SUCCESS, COPY_WITH_INSTRUCTIONS_SUCCESS,
    DEFAULT_BANNER_DURATION_MS, TEXT_FAILURE,
};
pub use protocol::{ActionMessage, AgentResponse, ResponseMode};
pub use state::{AgentOptions, AgentState, FlagSource, DEFAULT_ENABLED, DEFAULT_INSTRUCTIONS_ASSET};
pub use update::update;
