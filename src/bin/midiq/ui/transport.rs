//! Transport bar widget - shows BPM, play state, position and queue counters

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{UiStateInit, UiStateUpdate};

/// Render the transport bar
pub fn render_transport(
    frame: &mut Frame,
    area: Rect,
    static_state: &UiStateInit,
    dynamic_state: &UiStateUpdate,
) {
    let block = Block::default().title(" midiq ").borders(Borders::ALL);

    let play_symbol = if dynamic_state.is_playing { "▶" } else { "⏸" };
    let play_state_str = if dynamic_state.is_playing {
        "Playing"
    } else {
        "Paused"
    };

    let now = dynamic_state.now;
    let cycle_beat = now.beat % static_state.loop_beats + 1;

    let line = Line::from(vec![
        Span::styled(
            format!(" BPM: {:.0}  ", static_state.bpm),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{} {}  ", play_symbol, play_state_str),
            Style::default().fg(if dynamic_state.is_playing {
                Color::Green
            } else {
                Color::Yellow
            }),
        ),
        Span::styled(
            format!("Beat {} | Cycle {}/{}  ", now, cycle_beat, static_state.loop_beats),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!(
                "ch {}  {} ticks/beat  ",
                static_state.channel + 1,
                static_state.ticks_per_beat
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(
                "Refused: {}  Dropped: {}",
                dynamic_state.refused, dynamic_state.dropped
            ),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
