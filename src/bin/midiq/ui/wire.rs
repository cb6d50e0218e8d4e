//! Wire log widget - most recent bytes sent down the serial channel

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the byte log as hex, newest at the bottom
pub fn render_wire(frame: &mut Frame, area: Rect, wire_log: &[u8], total: u64) {
    let block = Block::default()
        .title(format!(" Wire  {} bytes sent ", total))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let per_line = (inner.width / 3).max(1) as usize;
    let visible = per_line * inner.height as usize;
    let start = wire_log.len().saturating_sub(visible);

    let lines: Vec<Line> = wire_log[start..]
        .chunks(per_line)
        .map(|chunk| {
            let hex: Vec<String> = chunk.iter().map(|b| format!("{:02X}", b)).collect();
            Line::from(hex.join(" "))
        })
        .collect();

    let paragraph = Paragraph::new(lines).style(Style::default().fg(Color::Gray));
    frame.render_widget(paragraph, inner);
}
