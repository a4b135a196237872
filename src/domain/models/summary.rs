#[cfg(test)]
#[path = "summary_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Message;
use super::Sender;

pub const HISTORY_WINDOW: usize = 20;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl From<Sender> for Role {
    fn from(sender: Sender) -> Role {
        match sender {
            Sender::User => return Role::User,
            Sender::Bot => return Role::Model,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub parts: Vec<Part>,
}

/// Most recent `window` messages, oldest first, in the summary service's
/// role vocabulary. Hidden messages are included.
pub fn history_window(messages: &[Message], window: usize) -> Vec<HistoryEntry> {
    let start = messages.len().saturating_sub(window);

    return messages[start..]
        .iter()
        .map(|message| {
            return HistoryEntry {
                role: Role::from(message.sender),
                parts: vec![Part {
                    text: message.text.to_string(),
                }],
            };
        })
        .collect();
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub property_id: String,
    pub history: Vec<HistoryEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub property: Option<serde_json::Value>,
}

#[async_trait]
pub trait SummaryService {
    async fn summarize(&self, request: SummaryRequest) -> Result<SummaryResponse>;
}

pub type SummaryServiceBox = Arc<dyn SummaryService + Send + Sync>;
