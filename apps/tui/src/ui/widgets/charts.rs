use crate::coverage::SpraySummary;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line as TextLine;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};
use ratatui::Frame;

const REASON_COLORS: [Color; 6] = [
    Color::LightRed,
    Color::Yellow,
    Color::Magenta,
    Color::Red,
    Color::Cyan,
    Color::Gray,
];

/// Not-sprayed reasons as a bar chart, one bar per configured reason.
pub fn render_reason_chart(f: &mut Frame<'_>, area: Rect, summary: Option<&SpraySummary>) {
    let block = Block::default()
        .title("Not Sprayed Reasons")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let Some(summary) = summary.filter(|summary| !summary.reasons.is_empty()) else {
        let paragraph = Paragraph::new("No spray data")
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    };

    let bars: Vec<Bar<'_>> = summary
        .reasons
        .iter()
        .enumerate()
        .map(|(index, reason)| {
            Bar::default()
                .value(reason.count)
                .label(TextLine::from(short_label(&reason.label)))
                .style(Style::default().fg(REASON_COLORS[index % REASON_COLORS.len()]))
                .value_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        })
        .collect();

    let max_value = summary
        .reasons
        .iter()
        .map(|reason| reason.count)
        .max()
        .unwrap_or(0)
        .max(1);

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .max(max_value)
        .bar_gap(1)
        .bar_width(7);

    f.render_widget(chart, area);
}

/// Bar labels have room for one short word.
fn short_label(label: &str) -> String {
    label
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or(label)
        .chars()
        .take(7)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_fit_under_bars() {
        assert_eq!(short_label("no one home/missed"), "no");
        assert_eq!(short_label("Refused"), "Refused");
        assert_eq!(short_label("funerals"), "funeral");
    }
}
