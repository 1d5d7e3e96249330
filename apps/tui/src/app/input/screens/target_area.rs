use crate::app::input::helpers::move_selection;
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_target_area_input(app: &mut App, key: KeyCode) {
    let total_rows = app.row_count();
    if move_selection(&mut app.selected_index, total_rows, key) {
        return;
    }

    match key {
        KeyCode::Left => app.cycle_spray_date(false),
        KeyCode::Right => app.cycle_spray_date(true),
        KeyCode::Char('a') => app.set_spray_date(None),
        _ => {}
    }
}
