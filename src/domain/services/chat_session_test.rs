use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use test_utils::chat_history_fixture;

use super::ChatSessionStore;
use super::CHAT_HISTORY_KEY;
use super::WELCOME_MESSAGE;
use crate::domain::models::KeyValueBox;
use crate::domain::models::Message;
use crate::domain::models::PropertyCardData;
use crate::domain::models::Sender;
use crate::infrastructure::storage::memory::MemoryStorage;

async fn storage_with(raw: Option<&str>) -> Result<KeyValueBox> {
    let storage: KeyValueBox = Arc::<MemoryStorage>::default();
    if let Some(raw) = raw {
        storage.set(CHAT_HISTORY_KEY, raw).await?;
    }

    return Ok(storage);
}

async fn stored_messages(storage: &KeyValueBox) -> Result<Vec<Message>> {
    let raw = storage.get(CHAT_HISTORY_KEY).await?.unwrap_or_default();
    return Ok(serde_json::from_str(&raw)?);
}

fn assert_seeded(store: &ChatSessionStore) {
    assert_eq!(store.messages().len(), 1);
    assert_eq!(store.messages()[0].id, "1");
    assert_eq!(store.messages()[0].sender, Sender::Bot);
    assert_eq!(store.messages()[0].text, WELCOME_MESSAGE);
}

#[tokio::test]
async fn it_seeds_when_nothing_is_stored() -> Result<()> {
    let store = ChatSessionStore::load(storage_with(None).await?).await;
    assert_seeded(&store);
    assert!(!store.is_open());

    return Ok(());
}

#[tokio::test]
async fn it_seeds_on_corrupt_history() -> Result<()> {
    for raw in [
        "not json",
        "{}",
        "[]",
        r#"[{"id":"1","text":"hi"}]"#,
        r#"[{"id":"1","text":"hi","sender":"system"}]"#,
        r#"[{"id":"1","text":"hi","sender":"bot"}, null]"#,
    ] {
        let store = ChatSessionStore::load(storage_with(Some(raw)).await?).await;
        assert_seeded(&store);
    }

    return Ok(());
}

#[tokio::test]
async fn it_loads_a_stored_history() -> Result<()> {
    let store = ChatSessionStore::load(storage_with(Some(chat_history_fixture())).await?).await;

    assert_eq!(store.messages().len(), 4);
    assert_eq!(store.visible_messages().len(), 3);
    assert!(store.messages()[3].is_hidden);
    assert_eq!(
        store.messages()[2].properties.as_ref().map(|e| return e.len()),
        Some(1)
    );

    return Ok(());
}

#[tokio::test]
async fn it_keeps_numeric_ids() -> Result<()> {
    let stored = r#"[{"id":1,"text":"hi","sender":"bot"}]"#;
    let store = ChatSessionStore::load(storage_with(Some(stored)).await?).await;

    assert_eq!(store.messages().len(), 1);
    assert_eq!(store.messages()[0].id, "1");
    assert_eq!(store.messages()[0].text, "hi");

    return Ok(());
}

#[tokio::test]
async fn it_keeps_messages_with_unreadable_timestamps() -> Result<()> {
    let stored = r#"[
        {"id":"1","text":"hi","sender":"bot","timestamp":"yesterday"},
        {"id":"2","text":"hello","sender":"user","timestamp":1714554000000}
    ]"#;
    let store = ChatSessionStore::load(storage_with(Some(stored)).await?).await;

    assert_eq!(store.messages().len(), 2);
    assert_eq!(store.messages()[0].text, "hi");
    assert_eq!(
        store.messages()[1].timestamp.to_rfc3339(),
        "2024-05-01T09:00:00+00:00"
    );

    return Ok(());
}

#[tokio::test]
async fn it_drops_malformed_property_cards() -> Result<()> {
    let stored = r#"[
        {"id":"1","text":"hi","sender":"bot"},
        {"id":"2","text":"Take a look","sender":"bot","isHidden":false,
         "properties":[{"propertyId":"prop-42","name":"Azure","price":1,"address":"Pasay"}]}
    ]"#;
    let store = ChatSessionStore::load(storage_with(Some(stored)).await?).await;

    assert_eq!(store.messages().len(), 2);
    assert_eq!(store.messages()[1].text, "Take a look");
    assert!(store.messages()[1].properties.is_none());

    return Ok(());
}

#[tokio::test]
async fn it_appends_and_persists_each_message() -> Result<()> {
    let storage = storage_with(None).await?;
    let mut store = ChatSessionStore::load(storage.clone()).await;

    let message = store.add_message("Any condos in Makati?", Sender::User, None).await;
    assert_eq!(store.messages().len(), 2);
    assert_eq!(store.messages()[1], message);
    assert!(!message.is_hidden);
    assert!(message.properties.is_none());
    assert_eq!(stored_messages(&storage).await?, store.messages());

    return Ok(());
}

#[tokio::test]
async fn it_keeps_ids_strictly_increasing() -> Result<()> {
    let mut store = ChatSessionStore::load(storage_with(None).await?).await;

    let first = store.add_message("one", Sender::User, None).await;
    let second = store.add_message("two", Sender::Bot, None).await;
    let context = store.add_hidden_context(&json!({"propertyId": "prop-42"})).await;
    let third = store.add_message("three", Sender::Bot, None).await;

    let first_id = first.id.parse::<i64>()?;
    let second_id = second.id.parse::<i64>()?;
    let context_id = context.id.trim_end_matches("_ctx").parse::<i64>()?;
    let third_id = third.id.parse::<i64>()?;

    assert!(first_id < second_id);
    assert!(second_id < context_id);
    assert!(context_id < third_id);
    assert!(context.id.ends_with("_ctx"));

    return Ok(());
}

#[tokio::test]
async fn it_continues_ids_after_a_stored_history() -> Result<()> {
    let stored = r#"[{"id":"99999999999999","text":"hi","sender":"bot"}]"#;
    let mut store = ChatSessionStore::load(storage_with(Some(stored)).await?).await;

    let message = store.add_message("next", Sender::User, None).await;
    assert_eq!(message.id, "100000000000000");

    return Ok(());
}

#[tokio::test]
async fn it_adds_hidden_context_messages() -> Result<()> {
    let mut store = ChatSessionStore::load(storage_with(None).await?).await;

    let message = store.add_hidden_context(&json!({"propertyId": "prop-42"})).await;
    assert!(message.is_hidden);
    assert_eq!(message.sender, Sender::User);
    insta::assert_snapshot!(message.text, @r###"[SYSTEM INJECTION] User clicked/viewed property card. PROPERTY DATA: {"propertyId":"prop-42"}"###);

    assert_eq!(store.messages().len(), 2);
    assert_eq!(store.visible_messages().len(), 1);

    return Ok(());
}

#[tokio::test]
async fn it_stores_property_cards() -> Result<()> {
    let mut store = ChatSessionStore::load(storage_with(None).await?).await;
    let card =
        PropertyCardData::from_property(&serde_json::from_str(test_utils::property_fixture())?)?;

    let message = store.add_message("Take a look", Sender::Bot, Some(vec![card.clone()])).await;
    assert_eq!(message.properties, Some(vec![card]));

    return Ok(());
}

#[tokio::test]
async fn it_round_trips_through_storage() -> Result<()> {
    let storage = storage_with(None).await?;
    let mut store = ChatSessionStore::load(storage.clone()).await;
    store.add_message("hello", Sender::User, None).await;
    store.add_hidden_context(&json!({"propertyId": "prop-42", "price": 100})).await;
    store.set_open(true);

    let reloaded = ChatSessionStore::load(storage).await;
    assert_eq!(reloaded.messages(), store.messages());
    assert!(!reloaded.is_open());

    return Ok(());
}

#[tokio::test]
async fn it_resets_to_the_welcome_message() -> Result<()> {
    let storage = storage_with(Some(chat_history_fixture())).await?;
    let mut store = ChatSessionStore::load(storage.clone()).await;

    store.reset().await;
    assert_seeded(&store);
    assert_eq!(stored_messages(&storage).await?.len(), 1);

    return Ok(());
}

#[tokio::test]
async fn it_toggles_open() -> Result<()> {
    let mut store = ChatSessionStore::load(storage_with(None).await?).await;

    store.toggle_open();
    assert!(store.is_open());
    store.toggle_open();
    assert!(!store.is_open());
    store.set_open(true);
    assert!(store.is_open());

    return Ok(());
}
