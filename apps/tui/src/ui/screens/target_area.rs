use crate::app::{App, TargetAreaPanel};
use crate::coverage::{DailyProgress, Percentage, SpraySummary};
use crate::domain::SprayStatus;
use crate::ui::widgets::charts::render_reason_chart;
use crate::ui::widgets::gauge::render_coverage_gauge;
use crate::ui::widgets::legend::{key_span, render_legend, to_color};
use crate::ui::widgets::tables::scroll_offset;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render_target_area(app: &App, f: &mut Frame<'_>, area: Rect) {
    let Some(panel) = &app.target_panel else {
        f.render_widget(
            Paragraph::new("No target area selected").alignment(Alignment::Center),
            area,
        );
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(10)])
        .split(area);
    render_date_picker(app, f, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[0]);

    let sprayed = panel
        .summary
        .as_ref()
        .map_or(Percentage::ZERO, |summary| summary.sprayed_percentage);
    let color = to_color(app.config.thresholds.color_for(sprayed.as_f64()));
    render_coverage_gauge(f, left[0], sprayed, color, &sprayed_ratio(panel));
    render_stats(panel, f, left[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Min(4),
            Constraint::Length(8),
        ])
        .split(columns[1]);

    render_reason_chart(f, right[0], panel.summary.as_ref());
    render_buffers(app, panel, f, right[1]);
    render_legend(f, right[2], &app.config.thresholds, app.config.scheme);
}

/// `(sprayed/visited)` under the gauge.
fn sprayed_ratio(panel: &TargetAreaPanel) -> String {
    let sprayed = panel.summary.as_ref().map_or(0, |summary| summary.sprayed);
    let visited = panel
        .detail
        .as_ref()
        .map(|detail| detail.row.visited_total)
        .filter(|visited| *visited > 0)
        .or_else(|| {
            panel
                .summary
                .as_ref()
                .map(|summary| summary.sprayed + summary.not_sprayed)
        })
        .unwrap_or(0);
    format!("({sprayed}/{visited})")
}

fn render_date_picker(app: &App, f: &mut Frame<'_>, area: Rect) {
    let date = app
        .selection
        .spray_date
        .clone()
        .unwrap_or_else(|| "All dates".to_string());
    let position = app
        .selection
        .spray_date
        .as_ref()
        .and_then(|date| app.spray_dates.iter().position(|d| d == date))
        .map_or_else(String::new, |index| {
            format!("  (day {} of {})", index + 1, app.spray_dates.len())
        });

    let line = TextLine::from(vec![
        key_span("←"),
        Span::raw(" As of: "),
        Span::styled(
            date,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(position, Style::default().fg(Color::Gray)),
        Span::raw(" "),
        key_span("→"),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn stat_line(label: &str, value: String) -> TextLine<'static> {
    TextLine::from(vec![
        Span::styled(format!("{label:<16}"), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
    ])
}

fn render_stats(panel: &TargetAreaPanel, f: &mut Frame<'_>, area: Rect) {
    let mut lines = Vec::new();

    if let Some(row) = panel.row() {
        lines.push(stat_line("Structures", row.stats.structures.to_string()));
        lines.push(stat_line(
            "Visited",
            format!("{} ({})", row.stats.visited_total, row.visited),
        ));
        lines.push(stat_line(
            "Not visited",
            format!("{} ({})", row.stats.not_visited, row.not_visited),
        ));
    }

    lines.push(stat_line(
        "Households",
        format!(
            "{} ({} structures)",
            panel.households, panel.household_structures
        ),
    ));

    if let Some(summary) = &panel.summary {
        lines.extend(summary_lines(summary));
    }

    if let Some(progress) = &panel.progress {
        lines.extend(progress_lines(progress));
    }

    if let Some(bounds) = panel.detail.as_ref().and_then(|detail| detail.bounds) {
        lines.push(stat_line(
            "Bounds",
            format!(
                "{:.4}, {:.4} to {:.4}, {:.4}",
                bounds[0], bounds[1], bounds[2], bounds[3]
            ),
        ));
    }

    let block = Block::default()
        .title(format!("Target Area {}", panel.target_id))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn summary_lines(summary: &SpraySummary) -> Vec<TextLine<'static>> {
    vec![
        stat_line(SprayStatus::Sprayed.label(), summary.sprayed.to_string()),
        stat_line(SprayStatus::NotSprayed.label(), summary.not_sprayed.to_string()),
        stat_line(
            SprayStatus::NotSprayable.label(),
            summary.not_sprayable.to_string(),
        ),
        stat_line("Refused", summary.refused_percentage.to_string()),
        stat_line("Other reasons", summary.other_percentage.to_string()),
    ]
}

fn progress_lines(progress: &DailyProgress) -> Vec<TextLine<'static>> {
    let per_day = progress
        .per_day
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(" / ");
    vec![
        stat_line("Per day", per_day),
        stat_line(
            &format!("By day {}", progress.day),
            format!(
                "{} ({} of structures)",
                progress.cumulative,
                progress.rate_percentage()
            ),
        ),
    ]
}

fn render_buffers(app: &App, panel: &TargetAreaPanel, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(format!("Buffers ({})", panel.buffers.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if panel.buffers.is_empty() {
        f.render_widget(
            Paragraph::new("No buffer areas")
                .block(block)
                .alignment(Alignment::Center),
            area,
        );
        return;
    }

    let max_visible_rows = area.height.saturating_sub(2) as usize;
    let offset = scroll_offset(panel.buffers.len(), max_visible_rows, app.selected_index);

    let lines: Vec<TextLine<'_>> = panel
        .buffers
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .map(|(index, buffer)| {
            // The upstream fill wins; otherwise bucket the percentage.
            let fill = buffer.fill_color.unwrap_or_else(|| {
                app.config
                    .thresholds
                    .color_for(buffer.percentage_sprayed.as_f64())
            });
            let style = if index == app.selected_index {
                Style::default()
                    .bg(Color::Rgb(0, 0, 238))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            TextLine::from(vec![
                Span::styled("██ ", Style::default().fg(to_color(fill))),
                Span::styled(buffer.caption(), style),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}
