use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseButton;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use ratatui::Terminal;

use crate::domain::models::ContainerBounds;
use crate::domain::models::PointerInput;
use crate::domain::models::Slider;
use crate::domain::models::TextureLoader;
use crate::domain::services::CompareWidget;
use crate::infrastructure::textures::http::HttpTextureLoader;

fn layout(size: Rect) -> (Rect, Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Min(1), Constraint::Length(1)])
        .split(size);

    return (layout[0], layout[1]);
}

fn bounds(area: Rect) -> ContainerBounds {
    return ContainerBounds {
        left: area.x as f64,
        width: area.width as f64,
    };
}

pub async fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    stream: &mut EventStream,
    before_url: &str,
    after_url: &str,
) -> Result<()> {
    terminal.draw(|frame| {
        frame.render_widget(
            Paragraph::new("Loading before and after images...").alignment(Alignment::Center),
            frame.size(),
        );
    })?;

    let loader = HttpTextureLoader::default();
    let (before, after) = tokio::try_join!(loader.load(before_url), loader.load(after_url))?;

    let mut slider = Slider::default();
    let (area, _) = layout(terminal.size()?);
    slider.mount(bounds(area));

    loop {
        terminal.draw(|frame| {
            let (image_area, status_area) = layout(frame.size());
            frame.render_widget(
                CompareWidget {
                    before: &before,
                    after: &after,
                    position: slider.position(),
                },
                image_area,
            );
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(" Before ", Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(format!("{:.0}%", slider.position())),
                    Span::styled(" | After ", Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw("  drag the divider, q to close"),
                ])),
                status_area,
            );
        })?;

        let event = match stream.next().await {
            Some(Ok(event)) => event,
            Some(Err(err)) => {
                tracing::error!(error = ?err, "terminal event stream failed");
                break;
            }
            None => break,
        };

        match event {
            CrosstermEvent::Key(key) => {
                let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c');
                if ctrl_c || key.code == KeyCode::Esc || key.code == KeyCode::Char('q') {
                    break;
                }
            }
            CrosstermEvent::Mouse(mouse) => {
                let x = mouse.column as f64;
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        slider.handle(PointerInput::MouseDown(x));
                    }
                    MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                        slider.handle(PointerInput::MouseMove(x));
                    }
                    MouseEventKind::Up(MouseButton::Left) => {
                        slider.handle(PointerInput::MouseUp);
                    }
                    _ => (),
                }
            }
            CrosstermEvent::Resize(width, height) => {
                let (area, _) = layout(Rect::new(0, 0, width, height));
                slider.resize(bounds(area));
            }
            CrosstermEvent::FocusLost => {
                slider.handle(PointerInput::MouseLeave);
            }
            _ => (),
        }
    }

    slider.unmount();

    return Ok(());
}
