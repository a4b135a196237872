#[cfg(test)]
#[path = "chat_session_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;
use serde_json::Value;

use crate::domain::models::KeyValueBox;
use crate::domain::models::Message;
use crate::domain::models::PropertyCardData;
use crate::domain::models::Sender;

pub const CHAT_HISTORY_KEY: &str = "vista_chat_history";
pub const WELCOME_MESSAGE: &str =
    "Hi! I'm Mark AI. How can I help you find your perfect property today?";

fn seed_messages() -> Vec<Message> {
    return vec![Message::new("1", Sender::Bot, WELCOME_MESSAGE)];
}

fn lenient_string(value: &Value) -> String {
    return match value {
        Value::String(text) => text.to_string(),
        other => other.to_string(),
    };
}

fn lenient_timestamp(value: Option<&Value>) -> DateTime<Utc> {
    let parsed = match value {
        Some(Value::String(raw)) => DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|e| return e.with_timezone(&Utc)),
        Some(Value::Number(millis)) => millis
            .as_i64()
            .and_then(|e| return Utc.timestamp_millis_opt(e).single()),
        _ => None,
    };

    return parsed.unwrap_or_else(Utc::now);
}

// Only the shape is validated. Fields the transcript can live without fall
// back instead of discarding the whole log.
fn message_from_entry(entry: &Value) -> Message {
    let sender = match entry.get("sender").and_then(|e| return e.as_str()) {
        Some("user") => Sender::User,
        _ => Sender::Bot,
    };

    let properties = entry
        .get("properties")
        .filter(|e| return !e.is_null())
        .and_then(|e| {
            return match serde_json::from_value::<Vec<PropertyCardData>>(e.clone()) {
                Ok(cards) => Some(cards),
                Err(err) => {
                    tracing::warn!(error = ?err, "dropping malformed property cards");
                    None
                }
            };
        });

    let mut message = Message::new(
        &lenient_string(&entry["id"]),
        sender,
        &lenient_string(&entry["text"]),
    )
    .with_properties(properties);
    message.timestamp = lenient_timestamp(entry.get("timestamp"));
    message.is_hidden = entry
        .get("isHidden")
        .and_then(|e| return e.as_bool())
        .unwrap_or(false);

    return message;
}

/// Every entry must be an object carrying `id`, `text`, and a known `sender`.
fn parse_history(raw: &str) -> Result<Vec<Message>> {
    let value: Value = serde_json::from_str(raw)?;
    let entries = match value.as_array() {
        Some(entries) => entries,
        None => bail!("Chat history is not an array"),
    };
    if entries.is_empty() {
        bail!("Chat history is empty");
    }

    for entry in entries {
        let has_fields = entry.get("id").is_some() && entry.get("text").is_some();
        let sender = entry.get("sender").and_then(|e| return e.as_str());
        if !has_fields || !matches!(sender, Some("user") | Some("bot")) {
            bail!(format!("Chat history entry is malformed: {entry}"));
        }
    }

    return Ok(entries.iter().map(message_from_entry).collect());
}

fn id_millis(id: &str) -> i64 {
    return id.trim_end_matches("_ctx").parse::<i64>().unwrap_or(0);
}

pub struct ChatSessionStore {
    storage: KeyValueBox,
    messages: Vec<Message>,
    is_open: bool,
    last_id: i64,
}

impl ChatSessionStore {
    pub async fn load(storage: KeyValueBox) -> ChatSessionStore {
        let messages = match storage.get(CHAT_HISTORY_KEY).await {
            Ok(Some(raw)) => match parse_history(&raw) {
                Ok(messages) => messages,
                Err(err) => {
                    tracing::warn!(error = ?err, "discarding stored chat history");
                    seed_messages()
                }
            },
            Ok(None) => seed_messages(),
            Err(err) => {
                tracing::error!(error = ?err, "failed to read chat history");
                seed_messages()
            }
        };

        let last_id = messages
            .iter()
            .map(|e| return id_millis(&e.id))
            .max()
            .unwrap_or(0);

        return ChatSessionStore {
            storage,
            messages,
            is_open: false,
            last_id,
        };
    }

    pub fn messages(&self) -> &[Message] {
        return &self.messages;
    }

    pub fn visible_messages(&self) -> Vec<&Message> {
        return self.messages.iter().filter(|e| return !e.is_hidden).collect();
    }

    pub async fn add_message(
        &mut self,
        text: &str,
        sender: Sender,
        properties: Option<Vec<PropertyCardData>>,
    ) -> Message {
        let id = self.next_id().to_string();
        let message = Message::new(&id, sender, text).with_properties(properties);

        return self.append(message).await;
    }

    pub async fn add_hidden_context(&mut self, property: &Value) -> Message {
        let id = format!("{}_ctx", self.next_id());
        let message = Message::system_injection(&id, property);

        return self.append(message).await;
    }

    pub async fn reset(&mut self) {
        self.messages = seed_messages();
        self.persist().await;
    }

    pub fn is_open(&self) -> bool {
        return self.is_open;
    }

    pub fn set_open(&mut self, is_open: bool) {
        self.is_open = is_open;
    }

    pub fn toggle_open(&mut self) {
        self.is_open = !self.is_open;
    }

    async fn append(&mut self, message: Message) -> Message {
        self.messages.push(message.clone());
        self.persist().await;

        return message;
    }

    // Millisecond ids, bumped past the previous one when the clock has not moved.
    fn next_id(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last_id = now.max(self.last_id + 1);

        return self.last_id;
    }

    async fn persist(&self) {
        let res = match serde_json::to_string(&self.messages) {
            Ok(raw) => self.storage.set(CHAT_HISTORY_KEY, &raw).await,
            Err(err) => Err(err.into()),
        };

        if let Err(err) = res {
            tracing::error!(error = ?err, "failed to persist chat history");
        }
    }
}
