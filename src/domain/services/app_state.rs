#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use std::collections::HashMap;

use ratatui::prelude::Rect;
use serde_json::Value;

use super::ChatSessionStore;
use super::Scroll;
use super::Transcript;
use crate::domain::models::Event;
use crate::domain::models::PanoramicImage;
use crate::domain::models::PropertyCardData;
use crate::domain::models::Sender;
use crate::domain::models::SlashCommand;

pub const HELP_TEXT: &str = "/view <id> ask Mark about a property · /open <id> walk through its panoramas · /clear start over · /quit exit · Ctrl+O show or hide the chat";

#[derive(Clone, Debug, PartialEq)]
pub enum Submitted {
    Nothing,
    Quit,
    PropertyViewed(String),
    OpenPanorama(String, Vec<PanoramicImage>),
}

pub struct AppState {
    pub chat: ChatSessionStore,
    pub transcript: Transcript,
    pub scroll: Scroll,
    pub notice: Option<String>,
    pub last_known_height: u16,
    pub last_known_width: u16,
    properties: HashMap<String, Value>,
    viewed_by_generation: HashMap<u64, String>,
}

impl AppState {
    pub fn new(chat: ChatSessionStore) -> AppState {
        let mut app_state = AppState {
            chat,
            transcript: Transcript::default(),
            scroll: Scroll::default(),
            notice: None,
            last_known_height: 0,
            last_known_width: 0,
            properties: HashMap::new(),
            viewed_by_generation: HashMap::new(),
        };
        app_state.sync_dependants();

        return app_state;
    }

    pub async fn handle_mark_event(&mut self, event: Event) {
        match event {
            Event::ChatOpen() => {
                self.chat.set_open(true);
            }
            Event::MarkContext(generation, property) => {
                tracing::debug!(generation, "appending property context");
                if let Some(property_id) = property.get("propertyId").and_then(|e| return e.as_str()) {
                    self.properties
                        .insert(property_id.to_string(), property.clone());
                    self.viewed_by_generation
                        .insert(generation, property_id.to_string());
                }
                self.chat.add_hidden_context(&property).await;
                self.notice = None;
            }
            Event::MarkSummary(generation, summary) => {
                tracing::debug!(generation, "appending property summary");
                let card = self
                    .viewed_by_generation
                    .remove(&generation)
                    .and_then(|property_id| return self.property_card(&property_id));
                self.chat
                    .add_message(&summary, Sender::Bot, card.map(|e| return vec![e]))
                    .await;
                self.scroll.last();
            }
            _ => return,
        }

        self.sync_dependants();
    }

    pub async fn submit(&mut self, input: &str) -> Submitted {
        let input = input.trim();
        if input.is_empty() {
            return Submitted::Nothing;
        }

        let command = match SlashCommand::parse(input) {
            Some(command) => command,
            None => {
                self.notice = None;
                self.chat.add_message(input, Sender::User, None).await;
                self.scroll.last();
                self.sync_dependants();
                return Submitted::Nothing;
            }
        };

        if command.is_quit() {
            return Submitted::Quit;
        }

        if command.is_help() {
            self.notice = Some(HELP_TEXT.to_string());
            return Submitted::Nothing;
        }

        if command.is_clear() {
            self.chat.reset().await;
            self.properties.clear();
            self.viewed_by_generation.clear();
            self.notice = None;
            self.scroll.last();
            self.sync_dependants();
            return Submitted::Nothing;
        }

        let property_id = command.property_id().unwrap_or_default().to_string();
        if command.is_view() {
            self.notice = Some(format!("Asking Mark about {property_id}..."));
            return Submitted::PropertyViewed(property_id);
        }

        let property = match self.properties.get(&property_id) {
            Some(property) => property,
            None => {
                self.notice = Some(format!(
                    "Mark hasn't seen {property_id} yet. Try /view {property_id} first."
                ));
                return Submitted::Nothing;
            }
        };

        let panoramas = PanoramicImage::from_property(property);
        if panoramas.is_empty() {
            self.notice = Some(format!("{property_id} has no panoramic images."));
            return Submitted::Nothing;
        }

        self.notice = None;
        return Submitted::OpenPanorama(property_id, panoramas);
    }

    pub fn property_card(&self, property_id: &str) -> Option<PropertyCardData> {
        let property = self.properties.get(property_id)?;
        return PropertyCardData::from_property(property).ok();
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    fn sync_dependants(&mut self) {
        self.transcript
            .set_messages(&self.chat.visible_messages(), self.last_known_width);
        self.scroll
            .set_state(self.transcript.len() as u16, self.last_known_height);
    }
}
