use ext_logging::{ext_debug, ext_trace};

use crate::highlight::{decorate, HighlightMarker};
use crate::notice::Banner;
use crate::{ActionMessage, AgentState, Effect, Msg};

/// Pure update function for a page agent: applies a message to state and
/// returns any effects.
pub fn update(mut state: AgentState, msg: Msg) -> (AgentState, Vec<Effect>) {
    let effects = match msg {
        Msg::SettingsLoaded(stored) => {
            if state.load_flag(stored) {
                ext_debug!("highlighter initialised enabled={}", state.is_enabled());
            } else {
                ext_debug!("ignoring late settings read; a toggle message already arrived");
            }
            Vec::new()
        }
        Msg::PointerReleased { selection } => {
            if !state.is_enabled() {
                return (state, Vec::new());
            }
            let Some(decorated) = selection
                .as_deref()
                .and_then(|text| decorate(text, state.options().highlight_style))
            else {
                ext_trace!("pointer released without a selection");
                return (state, Vec::new());
            };
            let options = state.options();
            vec![Effect::MarkSelection(HighlightMarker {
                decorated,
                background: options.marker_background.clone(),
                class_name: options.marker_class.clone(),
            })]
        }
        Msg::MarkerPlaced => {
            state.record_highlight();
            Vec::new()
        }
        Msg::Action(action) => apply_action(&mut state, action),
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn apply_action(state: &mut AgentState, action: ActionMessage) -> Vec<Effect> {
    match action {
        ActionMessage::ToggleHighlighter { enabled } => {
            state.set_enabled(enabled);
            ext_debug!("highlighter toggled enabled={enabled}");
            Vec::new()
        }
        ActionMessage::CopyAllText => vec![Effect::CopyMainContent],
        ActionMessage::CopyWithInstructions => vec![Effect::CopyWithInstructions {
            asset: state.options().instructions_asset.clone(),
        }],
        ActionMessage::GetAnnotatedText => vec![Effect::ReplyAnnotatedText],
        ActionMessage::ShowNotification { message } => vec![Effect::ShowBanner(Banner {
            message,
            duration_ms: state.options().banner_duration_ms,
        })],
    }
}
