#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Utc;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::PropertyCardData;

pub const SYSTEM_INJECTION_MARKER: &str = "[SYSTEM INJECTION]";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<PropertyCardData>>,
    #[serde(default)]
    pub is_hidden: bool,
}

impl Message {
    pub fn new(id: &str, sender: Sender, text: &str) -> Message {
        return Message {
            id: id.to_string(),
            text: text.to_string(),
            sender,
            timestamp: Utc::now(),
            properties: None,
            is_hidden: false,
        };
    }

    pub fn with_properties(mut self, properties: Option<Vec<PropertyCardData>>) -> Message {
        self.properties = properties;
        return self;
    }

    pub fn hidden(mut self) -> Message {
        self.is_hidden = true;
        return self;
    }

    pub fn system_injection(id: &str, property: &serde_json::Value) -> Message {
        let text = format!(
            "{SYSTEM_INJECTION_MARKER} User clicked/viewed property card. PROPERTY DATA: {property}"
        );

        return Message::new(id, Sender::User, &text).hidden();
    }

    pub fn is_system_injection(&self) -> bool {
        return self.text.starts_with(SYSTEM_INJECTION_MARKER);
    }

    pub fn as_string_lines(&self, line_max_width: usize) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        let line_max_width = line_max_width.max(1);

        for full_line in self.text.replace('\t', "  ").split('\n') {
            if full_line.trim().is_empty() {
                lines.push(" ".to_string());
                continue;
            }

            let mut char_count = 0;
            let mut current_words: Vec<&str> = vec![];

            for word in full_line.split(' ') {
                let word_len = word.chars().count();
                if !current_words.is_empty() && word_len + char_count + 1 > line_max_width {
                    lines.push(current_words.join(" ").trim_end().to_string());
                    current_words = vec![word];
                    char_count = word_len + 1;
                } else {
                    current_words.push(word);
                    char_count += word_len + 1;
                }
            }
            if !current_words.is_empty() {
                lines.push(current_words.join(" ").trim_end().to_string());
            }
        }

        return lines;
    }
}
