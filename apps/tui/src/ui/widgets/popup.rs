use crate::ui::widgets::legend::key_span;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::Buffer;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};
use ratatui::Frame;

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub struct ClearWidget;

impl Widget for ClearWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
    }
}

const SHORTCUTS: [(&str, &str); 11] = [
    ("F1 / ?", "Toggle this help screen"),
    ("↑/↓", "Move the selection"),
    ("PgUp/PgDn", "Jump 5 rows"),
    ("Home/End", "First / last row"),
    ("Enter", "Open district or target area"),
    ("Esc", "Go back (clears a filter first)"),
    ("/", "Filter target areas in a district"),
    ("←/→", "Previous / next spray date"),
    ("a", "Show all spray dates"),
    ("r / s", "Refresh / cycle coverage scheme"),
    ("q", "Quit"),
];

pub fn render_help(f: &mut Frame<'_>, area: Rect) {
    let popup = centered_rect(60, 70, area);
    f.render_widget(ClearWidget, popup);

    let block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let mut lines = vec![
        TextLine::from(Span::styled(
            "Spray Coverage Dashboard",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(
            "Coverage is sprayed structures over all structures; the color follows the active scheme.",
        ),
        TextLine::from(""),
    ];
    lines.extend(SHORTCUTS.iter().map(|(key, action)| {
        TextLine::from(vec![
            key_span(format!("  {key:<10}")),
            Span::raw(format!(" - {action}")),
        ])
    }));

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup,
    );
}
