use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

mod district;
mod help;
mod overview;
mod target_area;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    // Typed characters belong to the filter while it is open.
    if app.filtering {
        district::handle_filter_input(app, key);
        return;
    }

    if handle_global_input(app, key) {
        return;
    }

    match app.screen {
        AppScreen::Overview => overview::handle_overview_input(app, key),
        AppScreen::District => district::handle_district_input(app, key),
        AppScreen::TargetArea => target_area::handle_target_area_input(app, key),
    }
}

fn handle_global_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('s') => app.cycle_scheme(),
        KeyCode::Esc if app.screen == AppScreen::District && !app.filter.is_empty() => {
            app.set_filter(String::new());
        }
        KeyCode::Esc => app.back(),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::actions::{FetchPayload, FetchRequest, FetchResponse};
    use crate::api::TargetAreaRow;
    use crate::config::DashboardConfig;
    use crate::domain::ThresholdScheme;
    use pretty_assertions::assert_eq;

    fn district_app() -> App {
        let mut app = App::new(DashboardConfig::default());
        let rows = ["1203", "1204", "88"]
            .into_iter()
            .map(|target| TargetAreaRow {
                targetid: target.to_string(),
                structures: 10,
                ..TargetAreaRow::default()
            })
            .collect();
        app.apply(FetchResponse {
            request: FetchRequest::District("Chienge".to_string()),
            payload: Ok(FetchPayload::District(rows)),
        });
        app
    }

    #[test]
    fn quit_and_scheme_keys_work_everywhere() {
        let mut app = district_app();
        dispatch_input(&mut app, KeyCode::Char('s'));
        assert_eq!(app.config.scheme, ThresholdScheme::Legacy);
        dispatch_input(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn help_swallows_keys_until_closed() {
        let mut app = district_app();
        dispatch_input(&mut app, KeyCode::F(1));
        assert!(app.show_help);
        dispatch_input(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        dispatch_input(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }

    #[test]
    fn filter_then_open_target_area() {
        let mut app = district_app();
        app.take_requests();
        for key in [
            KeyCode::Char('/'),
            KeyCode::Char('8'),
            KeyCode::Char('8'),
            KeyCode::Enter,
        ] {
            dispatch_input(&mut app, key);
        }
        assert!(!app.filtering);
        assert_eq!(app.filter, "88");

        dispatch_input(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, AppScreen::TargetArea);
        assert_eq!(app.selection.target_area.as_deref(), Some("88"));
        assert!(app
            .take_requests()
            .contains(&FetchRequest::Households("88".to_string())));
    }

    #[test]
    fn escape_clears_filter_before_leaving() {
        let mut app = district_app();
        dispatch_input(&mut app, KeyCode::Char('/'));
        dispatch_input(&mut app, KeyCode::Char('x'));
        dispatch_input(&mut app, KeyCode::Esc);
        assert!(app.filter.is_empty());
        assert_eq!(app.screen, AppScreen::District);

        dispatch_input(&mut app, KeyCode::Char('/'));
        dispatch_input(&mut app, KeyCode::Char('1'));
        dispatch_input(&mut app, KeyCode::Enter);
        dispatch_input(&mut app, KeyCode::Esc);
        assert!(app.filter.is_empty());
        assert_eq!(app.screen, AppScreen::District);

        dispatch_input(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, AppScreen::Overview);
    }
}
