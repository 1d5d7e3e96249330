use crate::app::input::helpers::move_selection;
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_district_input(app: &mut App, key: KeyCode) {
    let total_rows = app.row_count();
    if move_selection(&mut app.selected_index, total_rows, key) {
        return;
    }

    match key {
        KeyCode::Enter => {
            if total_rows > 0 {
                app.open_selected();
            }
        }
        KeyCode::Char('/') => {
            app.filtering = true;
        }
        _ => {}
    }
}

pub fn handle_filter_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => {
            app.filtering = false;
            app.set_filter(String::new());
        }
        KeyCode::Enter => {
            app.filtering = false;
        }
        KeyCode::Backspace => {
            let mut filter = app.filter.clone();
            filter.pop();
            app.set_filter(filter);
        }
        KeyCode::Char(ch) => {
            let mut filter = app.filter.clone();
            filter.push(ch);
            app.set_filter(filter);
        }
        KeyCode::Up | KeyCode::Down => {
            let total_rows = app.row_count();
            move_selection(&mut app.selected_index, total_rows, key);
        }
        _ => {}
    }
}
