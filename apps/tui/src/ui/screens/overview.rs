use crate::app::App;
use crate::ui::widgets::tables::{render_coverage_table, CoverageTable};
use ratatui::layout::Rect;
use ratatui::Frame;

pub fn render_overview(app: &App, f: &mut Frame<'_>, area: Rect) {
    let rows: Vec<_> = app.overview_rows.iter().collect();
    let table = CoverageTable {
        title: format!("All Districts ({})", rows.len()),
        rows: &rows,
        total: app.grand_total.as_ref(),
        selected: app.selected_index,
        thresholds: &app.config.thresholds,
    };
    render_coverage_table(f, area, &table);
}
