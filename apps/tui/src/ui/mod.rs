// Terminal rendering for the spray coverage dashboard

pub mod screens;
pub mod widgets;

use crate::app::state::AppScreen;
use crate::app::App;
use crate::ui::widgets::legend::key_span;
use crate::ui::widgets::popup::render_help;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, BRAILLE_SIX};

pub fn ui(app: &App, f: &mut Frame<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(app, f, chunks[0]);

    match app.screen {
        AppScreen::Overview => screens::overview::render_overview(app, f, chunks[1]),
        AppScreen::District => screens::district::render_district(app, f, chunks[1]),
        AppScreen::TargetArea => screens::target_area::render_target_area(app, f, chunks[1]),
    }

    render_status_bar(app, f, chunks[2]);

    if app.show_help {
        render_help(f, f.area());
    }
}

fn render_header(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title = match app.screen {
        AppScreen::Overview => "All Districts",
        AppScreen::District => "District",
        AppScreen::TargetArea => "Target Area",
    };

    let line = TextLine::from(vec![
        Span::styled(
            app.current_route().to_fragment(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   scheme: {}", app.config.scheme.label()),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!(
                "   {} districts, {} target areas",
                app.districts.len(),
                app.target_area_count()
            ),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let block = Block::default()
        .title(format!("Spray Coverage: {title}"))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_status_bar(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(14), Constraint::Min(10)])
        .split(area);

    if app.is_loading() {
        let throbber = Throbber::default()
            .label("Loading")
            .style(Style::default().fg(Color::Cyan))
            .throbber_set(BRAILLE_SIX);
        let mut state = app.throbber.clone();
        f.render_stateful_widget(throbber, chunks[0], &mut state);
    }

    let message = if app.status_message.is_empty() {
        TextLine::from(vec![
            key_span("F1"),
            Span::styled(": Help  ", Style::default().fg(Color::Gray)),
            key_span("Esc"),
            Span::styled(": Back  ", Style::default().fg(Color::Gray)),
            key_span("q"),
            Span::styled(": Quit", Style::default().fg(Color::Gray)),
        ])
    } else {
        let color = if app.last_error.is_some() {
            Color::LightRed
        } else {
            Color::Yellow
        };
        TextLine::from(Span::styled(
            app.status_message.clone(),
            Style::default().fg(color),
        ))
    };
    f.render_widget(Paragraph::new(message), chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn rendered(app: &App) -> String {
        let Ok(mut terminal) = Terminal::new(TestBackend::new(120, 40)) else {
            return String::new();
        };
        if terminal.draw(|f| ui(app, f)).is_err() {
            return String::new();
        }
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn district_screen_shows_route_and_empty_table() {
        let app = App::new(DashboardConfig::default());
        let screen = rendered(&app);
        assert!(screen.contains("#!Chienge"));
        assert!(screen.contains("No target areas loaded"));
    }

    #[test]
    fn target_area_screen_renders_panels() {
        let config = DashboardConfig {
            initial_fragment: Some("#!Chienge/1203".to_string()),
            ..DashboardConfig::default()
        };
        let mut app = App::new(config);
        let screen = rendered(&app);
        assert!(screen.contains("Target Area 1203"));
        assert!(screen.contains("Legend"));
        assert!(screen.contains("No buffer areas"));

        app.show_help = true;
        assert!(rendered(&app).contains("Help & Keyboard Shortcuts"));
    }

    #[test]
    fn not_visited_shows_count_and_share() {
        use crate::api::{TargetAreaDetail, TargetAreaRow};
        use crate::app::{FetchPayload, FetchRequest, FetchResponse};

        let config = DashboardConfig {
            initial_fragment: Some("#!Chienge/1203".to_string()),
            ..DashboardConfig::default()
        };
        let mut app = App::new(config);
        app.apply(FetchResponse {
            request: FetchRequest::TargetArea("1203".to_string()),
            payload: Ok(FetchPayload::TargetArea(Some(TargetAreaDetail {
                row: TargetAreaRow {
                    targetid: "1203".to_string(),
                    structures: 200,
                    visited_total: 150,
                    visited_sprayed: 120,
                    not_visited: 50,
                    ..TargetAreaRow::default()
                },
                bounds: None,
            }))),
        });

        let screen = rendered(&app);
        assert!(screen.contains("Not visited"));
        assert!(screen.contains("50 (25%)"));
        assert!(screen.contains("150 (75%)"));
    }
}
