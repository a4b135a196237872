use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::event::EventStream;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
use tokio::sync::mpsc;

use super::compare_ui;
use super::panorama_ui;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Event;
use crate::domain::models::PanoramicImage;
use crate::domain::models::StorageName;
use crate::domain::models::TextArea;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::ChatSessionStore;
use crate::domain::services::PropertyContextInjector;
use crate::domain::services::Submitted;
use crate::infrastructure::backends::BackendManager;
use crate::infrastructure::storage::StorageManager;

type VistaTerminal = Terminal<CrosstermBackend<io::Stdout>>;

fn render_closed(frame: &mut Frame, app_state: &AppState) {
    let text = vec![
        Line::from(Span::styled(
            "Mark is standing by.",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Press Ctrl+O to open the chat, or Ctrl+C to leave."),
        Line::from(format!(
            "{} message(s) in this conversation.",
            app_state.chat.visible_messages().len()
        )),
    ];

    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title("Vista"),
        ),
        frame.size(),
    );
}

async fn start_loop(
    terminal: &mut VistaTerminal,
    app_state: &mut AppState,
    events: &mut EventsService,
    injector: &mut PropertyContextInjector,
) -> Result<()> {
    let mut textarea = TextArea::default();

    loop {
        terminal.draw(|frame| {
            if !app_state.chat.is_open() {
                render_closed(frame, app_state);
                return;
            }

            let notice_height = if app_state.notice.is_some() { 2 } else { 0 };
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![
                    Constraint::Min(1),
                    Constraint::Length(notice_height),
                    Constraint::Max(4),
                ])
                .split(frame.size());

            if layout[0].width != app_state.last_known_width
                || layout[0].height != app_state.last_known_height
            {
                app_state.set_rect(layout[0]);
            }

            app_state
                .transcript
                .render(frame, layout[0], &mut app_state.scroll);

            if let Some(notice) = &app_state.notice {
                frame.render_widget(
                    Paragraph::new(notice.as_str())
                        .style(Style::default().fg(Color::Yellow))
                        .wrap(Wrap { trim: true }),
                    layout[1],
                );
            }

            frame.render_widget(textarea.widget(), layout[2]);
        })?;

        match events.next().await? {
            Event::KeyboardCTRLC() => {
                break;
            }
            Event::KeyboardCTRLO() => {
                app_state.chat.toggle_open();
            }
            event @ (Event::ChatOpen() | Event::MarkContext(_, _) | Event::MarkSummary(_, _)) => {
                app_state.handle_mark_event(event).await;
            }
            Event::KeyboardEnter() => {
                if !app_state.chat.is_open() {
                    continue;
                }

                let input_str = textarea.lines().join("\n");
                textarea = TextArea::default();

                match app_state.submit(&input_str).await {
                    Submitted::Quit => {
                        break;
                    }
                    Submitted::PropertyViewed(property_id) => {
                        injector.notify_property_view(&property_id, app_state.chat.messages());
                    }
                    Submitted::OpenPanorama(property_id, images) => {
                        tracing::debug!(property_id, images = images.len(), "opening panorama");
                        panorama_ui::run(terminal, events.terminal_stream(), images, false)
                            .await?;
                        terminal.clear()?;
                    }
                    Submitted::Nothing => (),
                }
            }
            Event::KeyboardCharInput(input) => {
                if app_state.chat.is_open() {
                    textarea.input(input);
                }
            }
            Event::KeyboardPaste(text) => {
                if app_state.chat.is_open() {
                    textarea.insert_str(text);
                }
            }
            Event::UIScrollDown() => {
                app_state.scroll.down(1);
            }
            Event::UIScrollUp() => {
                app_state.scroll.up(1);
            }
            Event::UIScrollPageDown() => {
                app_state.scroll.down_page();
            }
            Event::UIScrollPageUp() => {
                app_state.scroll.up_page();
            }
            Event::UIResize() | Event::UITick() => (),
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    );
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

fn setup_terminal() -> Result<VistaTerminal> {
    enable_raw_mode()?;
    crossterm::execute!(
        io::stdout(),
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    return Ok(terminal);
}

fn restore_terminal(terminal: &mut VistaTerminal) -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return Ok(());
}

pub async fn start() -> Result<()> {
    let storage_name =
        StorageName::parse(Config::get(ConfigKey::Storage)).unwrap_or(StorageName::File);
    let storage = StorageManager::get(storage_name).await?;

    let (tx, rx) = mpsc::unbounded_channel::<Event>();
    let mut events = EventsService::new(rx);
    let mut injector = PropertyContextInjector::new(BackendManager::summary(), tx);

    let mut chat = ChatSessionStore::load(storage).await;
    chat.set_open(true);
    let mut app_state = AppState::new(chat);

    let mut terminal = setup_terminal()?;
    let res = start_loop(&mut terminal, &mut app_state, &mut events, &mut injector).await;
    restore_terminal(&mut terminal)?;

    return res;
}

pub async fn start_panorama(images: Vec<PanoramicImage>, handheld: bool) -> Result<()> {
    let mut stream = EventStream::new();
    let mut terminal = setup_terminal()?;
    let res = panorama_ui::run(&mut terminal, &mut stream, images, handheld).await;
    restore_terminal(&mut terminal)?;

    return res;
}

pub async fn start_compare(before: &str, after: &str) -> Result<()> {
    let mut stream = EventStream::new();
    let mut terminal = setup_terminal()?;
    let res = compare_ui::run(&mut terminal, &mut stream, before, after).await;
    restore_terminal(&mut terminal)?;

    return res;
}
