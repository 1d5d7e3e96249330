use crate::coverage::{CoverageRow, ThresholdTable};
use crate::ui::widgets::legend::to_color;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

pub const fn scroll_offset(
    total_rows: usize,
    max_visible_rows: usize,
    selected_index: usize,
) -> usize {
    if total_rows <= max_visible_rows {
        return 0;
    }

    if selected_index >= max_visible_rows {
        return selected_index.saturating_sub(max_visible_rows) + 1;
    }

    0
}

const HEADERS: [&str; 9] = [
    "Area",
    "Structures",
    "Visited",
    "Sprayed",
    "Not Sprayed",
    "Refused",
    "Other",
    "Not Visited",
    "Coverage",
];

fn coverage_cells(row: &CoverageRow, thresholds: &ThresholdTable) -> Row<'static> {
    let coverage_color = to_color(thresholds.color_for(row.coverage.as_f64()));
    Row::new(vec![
        Cell::from(row.label.clone()),
        Cell::from(row.stats.structures.to_string()),
        Cell::from(format!("{} ({})", row.visited, row.stats.visited_total)),
        Cell::from(format!("{} ({})", row.sprayed, row.stats.visited_sprayed)),
        Cell::from(row.not_sprayed.to_string()),
        Cell::from(row.refused.to_string()),
        Cell::from(row.other.to_string()),
        Cell::from(row.not_visited.to_string()),
        Cell::from(format!("■ {}", row.coverage)).style(Style::default().fg(coverage_color)),
    ])
}

pub struct CoverageTable<'a> {
    pub title: String,
    pub rows: &'a [&'a CoverageRow],
    pub total: Option<&'a CoverageRow>,
    pub selected: usize,
    pub thresholds: &'a ThresholdTable,
}

/// Coverage rows with the highlighted row kept in view and the roll-up
/// pinned underneath.
pub fn render_coverage_table(f: &mut Frame<'_>, area: Rect, table: &CoverageTable<'_>) {
    let block = Block::default()
        .title(table.title.clone())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if table.rows.is_empty() {
        let paragraph = Paragraph::new("No target areas loaded")
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(HEADERS.iter().map(|title| Cell::from(*title))).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    // Borders, header and footer
    let max_visible_rows = area.height.saturating_sub(5) as usize;
    let total_rows = table.rows.len();
    let offset = scroll_offset(total_rows, max_visible_rows, table.selected);

    let rows = table
        .rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .map(|(index, row)| {
            let cells = coverage_cells(row, table.thresholds);
            if index == table.selected {
                cells.style(
                    Style::default()
                        .bg(Color::Rgb(0, 0, 238))
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                cells
            }
        });

    let widths = [
        Constraint::Min(14),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(11),
        Constraint::Length(8),
        Constraint::Length(6),
        Constraint::Length(11),
        Constraint::Length(10),
    ];

    let mut widget = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);

    if let Some(total) = table.total {
        widget = widget.footer(
            coverage_cells(total, table.thresholds).style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        );
    }

    f.render_widget(widget, area);
}
