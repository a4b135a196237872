#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

use ratatui::prelude::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::widgets::ScrollbarState;
use ratatui::Frame;

use crate::domain::models::Message;
use crate::domain::models::PropertyCardData;
use crate::domain::models::Sender;

const PAGE: u16 = 10;
// Left border, gutter and scrollbar.
const CHROME_WIDTH: usize = 4;

/// Scroll position over the transcript lines. Sticks to the bottom until
/// the user scrolls up.
#[derive(Default)]
pub struct Scroll {
    content_length: u16,
    viewport_length: u16,
    position: u16,
    detached: bool,
    pub scrollbar_state: ScrollbarState,
}

impl Scroll {
    pub fn position(&self) -> u16 {
        return self.position;
    }

    fn max_position(&self) -> u16 {
        return self.content_length.saturating_sub(self.viewport_length);
    }

    pub fn up(&mut self, lines: u16) {
        self.position = self.position.saturating_sub(lines);
        self.detached = self.position < self.max_position();
        self.sync_scrollbar();
    }

    pub fn down(&mut self, lines: u16) {
        self.position = self.position.saturating_add(lines).min(self.max_position());
        self.detached = self.position < self.max_position();
        self.sync_scrollbar();
    }

    pub fn up_page(&mut self) {
        self.up(PAGE);
    }

    pub fn down_page(&mut self) {
        self.down(PAGE);
    }

    pub fn last(&mut self) {
        self.position = self.max_position();
        self.detached = false;
        self.sync_scrollbar();
    }

    pub fn set_state(&mut self, content_length: u16, viewport_length: u16) {
        self.content_length = content_length;
        self.viewport_length = viewport_length;
        if self.detached {
            self.position = self.position.min(self.max_position());
        } else {
            self.position = self.max_position();
        }
        self.sync_scrollbar();
    }

    fn sync_scrollbar(&mut self) {
        self.scrollbar_state = ScrollbarState::default()
            .content_length(self.max_position() as usize)
            .viewport_content_length(self.viewport_length as usize)
            .position(self.position as usize);
    }
}

fn card_lines(card: &PropertyCardData) -> Vec<Line<'static>> {
    let accent = Style::default().fg(Color::Cyan);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("  ▸ ", accent),
            Span::styled(
                card.name.to_string(),
                accent.add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  [{}]", card.property_id),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(format!("    {}", card.summary_line())),
    ];
    if !card.address.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("    {}", card.address),
            Style::default().fg(Color::Gray),
        )));
    }

    return lines;
}

#[derive(Default)]
pub struct Transcript {
    lines: Vec<Line<'static>>,
}

impl Transcript {
    pub fn set_messages(&mut self, messages: &[&Message], width: u16) {
        let text_width = (width as usize).saturating_sub(CHROME_WIDTH).max(10);
        self.lines = vec![];

        for message in messages.iter().filter(|e| return !e.is_hidden) {
            let (author, color) = match message.sender {
                Sender::Bot => ("Mark", Color::Green),
                Sender::User => ("You", Color::Blue),
            };

            self.lines.push(Line::from(vec![
                Span::styled(
                    author.to_string(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", message.timestamp.format("%H:%M")),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));

            for line in message.as_string_lines(text_width) {
                self.lines.push(Line::from(line));
            }

            for card in message.properties.iter().flatten() {
                self.lines.extend(card_lines(card));
            }

            self.lines.push(Line::from(""));
        }
    }

    pub fn len(&self) -> usize {
        return self.lines.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.lines.is_empty();
    }

    pub fn as_plain_text(&self) -> String {
        return self
            .lines
            .iter()
            .map(|line| {
                return line
                    .spans
                    .iter()
                    .map(|span| return span.content.to_string())
                    .collect::<String>();
            })
            .collect::<Vec<String>>()
            .join("\n");
    }

    pub fn render(&self, frame: &mut Frame, rect: Rect, scroll: &mut Scroll) {
        frame.render_widget(
            Paragraph::new(self.lines.clone())
                .block(
                    Block::default()
                        .borders(Borders::LEFT)
                        .border_type(BorderType::Thick)
                        .border_style(Style::default().fg(Color::Green)),
                )
                .scroll((scroll.position(), 0)),
            rect,
        );
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            rect,
            &mut scroll.scrollbar_state,
        );
    }
}
