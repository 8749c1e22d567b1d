use highlighter_core::{ActionMessage, AgentResponse, ResponseMode};
use serde_json::json;

#[test]
fn messages_use_the_action_discriminator() {
    let toggle = serde_json::to_value(ActionMessage::ToggleHighlighter { enabled: true }).unwrap();
    assert_eq!(toggle, json!({ "action": "toggleHighlighter", "enabled": true }));

    let copy = serde_json::to_value(ActionMessage::CopyAllText).unwrap();
    assert_eq!(copy, json!({ "action": "copyAllText" }));

    let notify = serde_json::to_value(ActionMessage::ShowNotification {
        message: "hi".to_string(),
    })
    .unwrap();
    assert_eq!(notify, json!({ "action": "showNotification", "message": "hi" }));
}

#[test]
fn inbound_messages_parse_from_page_json() {
    let parsed: ActionMessage =
        serde_json::from_value(json!({ "action": "getAnnotatedText" })).unwrap();
    assert_eq!(parsed, ActionMessage::GetAnnotatedText);
    assert_eq!(parsed.name(), "getAnnotatedText");

    let unknown = serde_json::from_value::<ActionMessage>(json!({ "action": "explode" }));
    assert!(unknown.is_err());
}

#[test]
fn responses_are_untagged() {
    assert_eq!(
        serde_json::to_value(AgentResponse::copied(true)).unwrap(),
        json!({ "success": true })
    );
    let text: AgentResponse = serde_json::from_value(json!({ "text": "body" })).unwrap();
    assert_eq!(text.text(), Some("body"));
    assert!(!text.is_success());

    let failed: AgentResponse = serde_json::from_value(json!({ "success": false })).unwrap();
    assert!(!failed.is_success());
}

#[test]
fn only_instruction_copy_is_deferred() {
    let all = [
        ActionMessage::ToggleHighlighter { enabled: false },
        ActionMessage::CopyAllText,
        ActionMessage::CopyWithInstructions,
        ActionMessage::GetAnnotatedText,
        ActionMessage::ShowNotification {
            message: String::new(),
        },
    ];
    let deferred: Vec<_> = all
        .iter()
        .filter(|message| message.response_mode() == ResponseMode::Deferred)
        .map(ActionMessage::name)
        .collect();
    assert_eq!(deferred, vec!["copyWithInstructions"]);

    let replying: Vec<_> = all
        .iter()
        .filter(|message| message.expects_reply())
        .map(ActionMessage::name)
        .collect();
    assert_eq!(
        replying,
        vec!["copyAllText", "copyWithInstructions", "getAnnotatedText"]
    );
}
