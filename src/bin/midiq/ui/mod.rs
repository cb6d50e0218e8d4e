//! TUI module for midiq
//!
//! Shows the queue arena, the pending list and the outgoing bytes while a
//! pattern plays.

mod arena;
pub mod state;
mod transport;
mod wire;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};
use std::time::Duration;

pub use state::{ControlMessage, PendingEntry, SlotState, UiStateInit, UiStateUpdate};

use arena::{render_arena, render_pending};
use transport::render_transport;
use wire::render_wire;

/// Bytes kept for the wire log
const WIRE_LOG_SIZE: usize = 512;

/// UI application state
pub struct UiApp {
    /// Bytes transmitted by the device loop
    wire_rx: Consumer<u8>,
    /// Queue snapshots from the device loop
    state_rx: Consumer<UiStateUpdate>,
    /// Commands back to the device loop
    control_tx: Producer<ControlMessage>,
    static_state: UiStateInit,
    current_state: UiStateUpdate,
    wire_log: Vec<u8>,
    wire_total: u64,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        wire_rx: Consumer<u8>,
        state_rx: Consumer<UiStateUpdate>,
        control_tx: Producer<ControlMessage>,
        static_state: UiStateInit,
    ) -> Self {
        Self {
            wire_rx,
            state_rx,
            control_tx,
            static_state,
            current_state: UiStateUpdate::new(),
            wire_log: Vec::with_capacity(WIRE_LOG_SIZE),
            wire_total: 0,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_wire();
            self.poll_state();

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    fn poll_wire(&mut self) {
        while let Ok(byte) = self.wire_rx.pop() {
            self.wire_log.push(byte);
            self.wire_total += 1;
        }

        if self.wire_log.len() > WIRE_LOG_SIZE {
            let excess = self.wire_log.len() - WIRE_LOG_SIZE;
            self.wire_log.drain(0..excess);
        }
    }

    /// Keep only the latest snapshot
    fn poll_state(&mut self) {
        while let Ok(state) = self.state_rx.pop() {
            self.current_state = state;
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let message = match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char(' ') => ControlMessage::TogglePlayback,
            KeyCode::Char('r') | KeyCode::Char('R') => ControlMessage::Reset,
            _ => return,
        };

        if self.control_tx.push(message).is_err() {
            tracing::warn!(?message, "control channel full");
        }
        if matches!(message, ControlMessage::Reset) {
            self.wire_log.clear();
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Min(8),    // Pending + arena
                Constraint::Length(6), // Wire log
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        render_transport(frame, rows[0], &self.static_state, &self.current_state);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[1]);
        render_pending(frame, columns[0], &self.current_state);
        render_arena(frame, columns[1], &self.current_state);

        render_wire(frame, rows[2], &self.wire_log, self.wire_total);

        let help = Paragraph::new(" [Q] Quit  [Space] Play/Pause  [R] Reset")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[3]);
    }
}
