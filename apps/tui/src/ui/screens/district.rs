use crate::app::App;
use crate::ui::widgets::legend::key_span;
use crate::ui::widgets::tables::{render_coverage_table, CoverageTable};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

pub fn render_district(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    let rows = app.visible_rows();
    let district = app.selection.district.to_string();
    let title = if app.filter.is_empty() {
        format!("{district}: {} target areas", rows.len())
    } else {
        format!(
            "{district}: {} of {} target areas",
            rows.len(),
            app.district_rows.len()
        )
    };

    let table = CoverageTable {
        title,
        rows: &rows,
        total: app.district_total.as_ref(),
        selected: app.selected_index,
        thresholds: &app.config.thresholds,
    };
    render_coverage_table(f, chunks[0], &table);

    let filter_line = if app.filtering {
        TextLine::from(vec![
            key_span("Filter: "),
            Span::raw(app.filter.clone()),
            Span::styled("█", Style::default().fg(Color::Gray)),
        ])
    } else if app.filter.is_empty() {
        TextLine::from(vec![
            key_span("/"),
            Span::styled(" to filter target areas", Style::default().fg(Color::Gray)),
        ])
    } else {
        TextLine::from(vec![
            key_span("Filter: "),
            Span::raw(app.filter.clone()),
            Span::styled("  (Esc to clear)", Style::default().fg(Color::Gray)),
        ])
    };
    f.render_widget(Paragraph::new(filter_line), chunks[1]);
}
