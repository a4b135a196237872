use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseButton;
use crossterm::event::MouseEvent;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use ratatui::Terminal;
use tokio::time;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::OrientationSourceBox;
use crate::domain::models::PanoramicImage;
use crate::domain::models::Platform;
use crate::domain::services::OrbitInput;
use crate::domain::services::PanoramaViewer;
use crate::domain::services::PanoramaWidget;
use crate::domain::services::ViewerOptions;
use crate::infrastructure::sensors::tilt::KeyTiltSource;
use crate::infrastructure::sensors::tilt::TiltHandle;
use crate::infrastructure::sensors::tilt::TILT_STEP;
use crate::infrastructure::textures::http::HttpTextureLoader;

const FRAME_INTERVAL: Duration = Duration::from_millis(33);
const WHEEL_STEP: f64 = 100.0;

enum Control {
    Continue,
    Exit,
}

/// Terminal cells are twice as tall as wide, so pointer rows count double.
fn pointer(mouse: &MouseEvent, area: Rect) -> (f64, f64) {
    let x = mouse.column.saturating_sub(area.x) as f64;
    let y = mouse.row.saturating_sub(area.y) as f64 * 2.0;

    return (x, y);
}

fn status_line(viewer: &PanoramaViewer, images: &[PanoramicImage], idx: usize) -> Line<'static> {
    let image = &images[idx];
    let mut title = image.title.to_string();
    if title.is_empty() {
        title = format!("View {}", idx + 1);
    }

    let state = if let Some(err) = viewer.scene().error() {
        Span::styled(err.to_string(), Style::default().fg(Color::Red))
    } else if viewer.scene().is_loading() {
        Span::styled("Loading...", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("Ready", Style::default().fg(Color::Green))
    };

    return Line::from(vec![
        Span::styled(
            format!(" {title} ({}/{}) ", idx + 1, images.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        state,
        Span::raw(format!(
            "  orientation: {}  drag to look, scroll to zoom, n/p to switch, q to close",
            viewer.orientation_status()
        )),
    ]);
}

fn handle_mouse(viewer: &mut PanoramaViewer, mouse: MouseEvent, area: Rect) {
    let (x, y) = pointer(&mouse, area);
    let viewport_height = area.height as f64 * 2.0;

    let input = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => OrbitInput::PointerDown { x, y },
        MouseEventKind::Drag(MouseButton::Left) => OrbitInput::PointerMove { x, y },
        MouseEventKind::Up(MouseButton::Left) => OrbitInput::PointerUp,
        MouseEventKind::ScrollUp => OrbitInput::Wheel {
            delta_y: -WHEEL_STEP,
        },
        MouseEventKind::ScrollDown => OrbitInput::Wheel {
            delta_y: WHEEL_STEP,
        },
        _ => return,
    };

    viewer.handle_pointer(input, viewport_height);
}

fn handle_key(
    viewer: &mut PanoramaViewer,
    tilt: Option<&TiltHandle>,
    key: KeyEvent,
    images: &[PanoramicImage],
    idx: &mut usize,
) -> Control {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Control::Exit;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            return Control::Exit;
        }
        KeyCode::Char('n') | KeyCode::Right => {
            *idx = (*idx + 1) % images.len();
            viewer.set_image_url(&images[*idx].url);
        }
        KeyCode::Char('p') | KeyCode::Left => {
            *idx = (*idx + images.len() - 1) % images.len();
            viewer.set_image_url(&images[*idx].url);
        }
        _ => {
            if let Some(tilt) = tilt {
                match key.code {
                    KeyCode::Char('a') => tilt.nudge(TILT_STEP, 0.0, 0.0),
                    KeyCode::Char('d') => tilt.nudge(-TILT_STEP, 0.0, 0.0),
                    KeyCode::Char('w') => tilt.nudge(0.0, TILT_STEP, 0.0),
                    KeyCode::Char('s') => tilt.nudge(0.0, -TILT_STEP, 0.0),
                    KeyCode::Char('z') => tilt.nudge(0.0, 0.0, TILT_STEP),
                    KeyCode::Char('x') => tilt.nudge(0.0, 0.0, -TILT_STEP),
                    KeyCode::Char('r') => tilt.reset(),
                    _ => (),
                }
            }
        }
    }

    return Control::Continue;
}

pub async fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    stream: &mut EventStream,
    images: Vec<PanoramicImage>,
    handheld: bool,
) -> Result<()> {
    if images.is_empty() {
        return Ok(());
    }

    let mut tilt = None;
    let mut orientation_source: Option<OrientationSourceBox> = None;
    if handheld {
        let (source, handle) = KeyTiltSource::new();
        orientation_source = Some(Box::new(source));
        tilt = Some(handle);
    }

    let platform = if handheld {
        Platform::handheld()
    } else {
        Platform::desktop()
    };

    let mut viewer = PanoramaViewer::mount(ViewerOptions {
        image_url: images[0].url.to_string(),
        proxy_url: Config::get(ConfigKey::ImageProxyURL),
        platform,
        loader: Arc::<HttpTextureLoader>::default(),
        orientation_source,
        on_ready: Some(Box::new(|| {
            tracing::debug!("panorama ready");
        })),
    })
    .await;

    let mut idx = 0;
    let mut area = Rect::default();
    let mut ticker = time::interval(FRAME_INTERVAL);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                viewer.frame();
                terminal.draw(|frame| {
                    let layout = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints(vec![Constraint::Min(1), Constraint::Length(1)])
                        .split(frame.size());

                    area = layout[0];
                    frame.render_widget(
                        PanoramaWidget {
                            camera: viewer.camera(),
                            mesh: viewer.scene().mesh(),
                        },
                        layout[0],
                    );
                    frame.render_widget(
                        Paragraph::new(status_line(&viewer, &images, idx)),
                        layout[1],
                    );
                })?;
            }
            event = stream.next() => {
                let control = match event {
                    Some(Ok(CrosstermEvent::Key(key))) => {
                        handle_key(&mut viewer, tilt.as_ref(), key, &images, &mut idx)
                    }
                    Some(Ok(CrosstermEvent::Mouse(mouse))) => {
                        handle_mouse(&mut viewer, mouse, area);
                        Control::Continue
                    }
                    Some(Ok(_)) => Control::Continue,
                    Some(Err(err)) => {
                        tracing::error!(error = ?err, "terminal event stream failed");
                        Control::Exit
                    }
                    None => Control::Exit,
                };

                if let Control::Exit = control {
                    break;
                }
            }
        }
    }

    viewer.unmount();

    return Ok(());
}
