use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind};
use eyre::Result;
use futures::StreamExt;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, Paragraph},
};
use strum::IntoEnumIterator;
use tokio::{select, time::interval};

use crate::{
    client::protocol::{OutputId, SwitchState},
    panel::{Notice, NoticeKind, Op, Panel, PanelState},
};

const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Interactive dashboard loop: redraws on a short tick and reacts to key
/// presses, running until `q`/Esc or the input stream closes.
pub async fn run(mut terminal: DefaultTerminal, panel: Panel) -> Result<()> {
    let mut events = EventStream::new();
    let mut timer = interval(FRAME_INTERVAL);

    loop {
        {
            let mut state = panel.state().lock().await;
            state.prune_notices(Instant::now());

            terminal.draw(|frame| draw(frame, &state, panel.base_url()))?;
        }

        select! {
            _ = timer.tick() => {}

            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if handle_key(key, &panel).await {
                        return Ok(());
                    }
                }

                Some(Ok(_)) => {}
                Some(Err(error)) => return Err(error.into()),
                None => return Ok(()),
            }
        }
    }
}

/// Returns true when the dashboard should exit.
async fn handle_key(key: KeyEvent, panel: &Panel) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,

        KeyCode::Char(digit @ '1'..='4') => {
            let number = digit as usize - '0' as usize;

            if let Some(output) = OutputId::led(number) {
                toggle(panel, output).await;
            }
        }

        KeyCode::Char('b') => toggle(panel, OutputId::Buzzer).await,

        KeyCode::Char('l') => spawn_poll(panel, |p| async move { p.poll_light().await }),
        KeyCode::Char('d') => spawn_poll(panel, |p| async move { p.poll_distance().await }),
        KeyCode::Char('s') => spawn_poll(panel, |p| async move { p.poll_combined().await }),

        _ => {}
    }

    false
}

/// Requests the opposite of the output's current state. The request runs as
/// its own task so the draw loop never blocks on the network.
async fn toggle(panel: &Panel, output: OutputId) {
    let switch = match panel.state().lock().await.output_on(output) {
        true => SwitchState::Off,
        false => SwitchState::On,
    };

    let panel = panel.clone();

    tokio::spawn(async move {
        panel.set_output(output, switch).await;
    });
}

fn spawn_poll<F, Fut>(panel: &Panel, poll: F)
where
    F: FnOnce(Panel) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let panel = panel.clone();

    tokio::spawn(async move {
        poll(panel).await;
    });
}

/* == Rendering == */

fn draw(frame: &mut Frame, state: &PanelState, base_url: &str) {
    let [top, notices, footer] = Layout::vertical([
        Constraint::Length(9),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let [outputs_area, sensors_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(top);

    draw_outputs(frame, state, outputs_area);
    draw_sensors(frame, state, sensors_area);
    draw_notices(frame, state, notices);

    let hints = format!("Connected to {base_url}  |  1-4 LEDs  b buzzer  l/d/s read  q quit");

    frame.render_widget(
        Paragraph::new(hints).style(Style::new().fg(Color::DarkGray)),
        footer,
    );
}

fn draw_outputs(frame: &mut Frame, state: &PanelState, area: Rect) {
    let lines = OutputId::iter()
        .map(|output| output_line(state, output))
        .collect::<Vec<_>>();

    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title("Outputs")),
        area,
    );
}

fn output_line(state: &PanelState, output: OutputId) -> Line<'static> {
    let marker = match state.output_on(output) {
        true => Span::styled("● ", Style::new().fg(Color::Green)),
        false => Span::styled("○ ", Style::new().fg(Color::DarkGray)),
    };

    let mut spans = vec![marker, Span::raw(output.to_string())];

    if state.is_loading(Op::Output(output)) {
        spans.push(Span::styled(
            "  (switching)",
            Style::new().add_modifier(Modifier::DIM),
        ));
    }

    Line::from(spans)
}

fn draw_sensors(frame: &mut Frame, state: &PanelState, area: Rect) {
    let lines = vec![
        sensor_line("LDR", format!("{}", state.light), state.is_loading(Op::Light)),
        sensor_line(
            "Distance",
            format!("{} cm", state.distance),
            state.is_loading(Op::Distance),
        ),
        Line::default(),
        sensor_line(
            "All / distance",
            format!("{} cm", state.combined_distance),
            state.is_loading(Op::Combined),
        ),
        sensor_line(
            "All / ldr",
            format!("{}", state.combined_light),
            state.is_loading(Op::Combined),
        ),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title("Sensors")),
        area,
    );
}

fn sensor_line(label: &str, value: String, loading: bool) -> Line<'static> {
    let mut spans = vec![
        Span::raw(format!("{label}: ")),
        Span::styled(value, Style::new().add_modifier(Modifier::BOLD)),
    ];

    if loading {
        spans.push(Span::styled(
            "  (reading)",
            Style::new().add_modifier(Modifier::DIM),
        ));
    }

    Line::from(spans)
}

fn draw_notices(frame: &mut Frame, state: &PanelState, area: Rect) {
    let items = state
        .notices()
        .iter()
        .map(notice_item)
        .collect::<Vec<_>>();

    frame.render_widget(
        List::new(items).block(Block::bordered().title("Notices")),
        area,
    );
}

fn notice_item(notice: &Notice) -> ListItem<'static> {
    let style = match notice.kind {
        NoticeKind::Info => Style::new().fg(Color::Green),
        NoticeKind::Error => Style::new().fg(Color::Red),
    };

    ListItem::new(format!("{}: {}", notice.title, notice.body)).style(style)
}
