use anyhow::Result;

use super::history_window;
use super::Role;
use super::SummaryRequest;
use super::SummaryResponse;
use super::HISTORY_WINDOW;
use crate::domain::models::Message;
use crate::domain::models::Sender;

fn conversation(len: usize) -> Vec<Message> {
    return (0..len)
        .map(|idx| {
            let mut sender = Sender::User;
            if idx % 2 == 1 {
                sender = Sender::Bot;
            }
            return Message::new(&idx.to_string(), sender, &format!("message {idx}"));
        })
        .collect();
}

#[test]
fn it_maps_senders_to_roles() {
    let history = history_window(&conversation(2), HISTORY_WINDOW);

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[1].role, Role::Model);
    assert_eq!(history[1].parts[0].text, "message 1");
}

#[test]
fn it_keeps_the_most_recent_messages_oldest_first() {
    let history = history_window(&conversation(25), HISTORY_WINDOW);

    assert_eq!(history.len(), 20);
    assert_eq!(history[0].parts[0].text, "message 5");
    assert_eq!(history[19].parts[0].text, "message 24");
}

#[test]
fn it_includes_hidden_messages() {
    let mut messages = conversation(1);
    messages.push(Message::new("2_ctx", Sender::User, "[SYSTEM INJECTION] ...").hidden());

    let history = history_window(&messages, HISTORY_WINDOW);
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].role, Role::User);
}

#[test]
fn it_serializes_requests() -> Result<()> {
    let req = SummaryRequest {
        property_id: "prop-42".to_string(),
        history: history_window(&conversation(2), HISTORY_WINDOW),
    };

    insta::assert_snapshot!(serde_json::to_string(&req)?, @r###"{"propertyId":"prop-42","history":[{"role":"user","parts":[{"text":"message 0"}]},{"role":"model","parts":[{"text":"message 1"}]}]}"###);
    return Ok(());
}

#[test]
fn it_deserializes_partial_responses() -> Result<()> {
    let empty: SummaryResponse = serde_json::from_str("{}")?;
    assert_eq!(empty, SummaryResponse::default());

    let nulls: SummaryResponse = serde_json::from_str(r#"{"summary":null,"property":null}"#)?;
    assert!(nulls.summary.is_none());
    assert!(nulls.property.is_none());

    return Ok(());
}
