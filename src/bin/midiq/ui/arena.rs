//! Arena widgets - slot map and the pending list in delivery order

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use midiq::io::MidiEvent;

use super::{SlotState, UiStateUpdate};

const CELL_WIDTH: u16 = 5;

/// Render every slot as a cell: reserved, free, or holding an event
pub fn render_arena(frame: &mut Frame, area: Rect, state: &UiStateUpdate) {
    let free = state.arena.iter().filter(|s| **s == SlotState::Free).count();
    let block = Block::default()
        .title(format!(
            " Arena  {} pending / {} free ",
            state.pending_len, free
        ))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width < CELL_WIDTH {
        return;
    }

    let per_row = (inner.width / CELL_WIDTH) as usize;
    let lines: Vec<Line> = state
        .arena
        .chunks(per_row)
        .enumerate()
        .map(|(row, cells)| {
            let spans: Vec<Span> = cells
                .iter()
                .enumerate()
                .map(|(col, slot)| {
                    let index = row * per_row + col;
                    let style = match slot {
                        SlotState::Reserved => Style::default().fg(Color::DarkGray),
                        SlotState::Free => Style::default().fg(Color::Green),
                        SlotState::Active => Style::default()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    };
                    Span::styled(format!("{:>3} ", index), style)
                })
                .flat_map(|cell| [cell, Span::raw(" ")])
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the active list head-first, as it will go out on the wire
pub fn render_pending(frame: &mut Frame, area: Rect, state: &UiStateUpdate) {
    let block = Block::default().title(" Pending ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = state
        .pending()
        .iter()
        .take(inner.height as usize)
        .map(|entry| {
            let due = entry.key.is_due(state.now);
            Line::from(vec![
                Span::styled(
                    format!("{:>8}  ", entry.key.to_string()),
                    Style::default().fg(if due { Color::Yellow } else { Color::White }),
                ),
                Span::styled(
                    format!("#{:<3} ", entry.slot),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{}  ", entry.command),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(describe(entry.command.to_midi_event())),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn describe(event: Option<MidiEvent>) -> String {
    match event {
        Some(MidiEvent::NoteOn { key, velocity, .. }) => format!("on  {} vel {}", key, velocity),
        Some(MidiEvent::NoteOff { key, .. }) => format!("off {}", key),
        Some(MidiEvent::ControlChange {
            controller, value, ..
        }) => format!("cc  {}={}", controller, value),
        Some(MidiEvent::ProgramChange { program, .. }) => format!("pgm {}", program),
        Some(MidiEvent::PitchBend { value, .. }) => format!("bend {}", value),
        None => String::from("?"),
    }
}
