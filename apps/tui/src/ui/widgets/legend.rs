use crate::coverage::ThresholdTable;
use crate::domain::{HexColor, ThresholdScheme};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub const fn to_color(hex: HexColor) -> Color {
    Color::Rgb(hex.r, hex.g, hex.b)
}

pub fn key_span(text: impl Into<String>) -> Span<'static> {
    Span::styled(
        text.into(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

/// Legend labels from the top bucket down, ending with the fallback.
pub fn legend_entries(table: &ThresholdTable) -> Vec<(String, HexColor)> {
    let mut entries: Vec<(String, HexColor)> = table
        .rows()
        .iter()
        .map(|row| {
            let label = if row.lower_bound >= 100.0 {
                format!("{}%", row.lower_bound)
            } else {
                format!("≥ {}%", row.lower_bound)
            };
            (label, row.color)
        })
        .collect();

    let fallback = table
        .rows()
        .last()
        .map_or_else(|| "all".to_string(), |row| format!("< {}%", row.lower_bound));
    entries.push((fallback, table.fallback()));
    entries
}

pub fn render_legend(f: &mut Frame<'_>, area: Rect, table: &ThresholdTable, scheme: ThresholdScheme) {
    let lines: Vec<TextLine<'_>> = legend_entries(table)
        .into_iter()
        .map(|(label, color)| {
            TextLine::from(vec![
                Span::styled("██ ", Style::default().fg(to_color(color))),
                Span::raw(label),
            ])
        })
        .collect();

    let block = Block::default()
        .title(format!("Legend ({})", scheme.label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Paragraph::new(lines).block(block), area);
}
