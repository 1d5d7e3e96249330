use crate::app::input::helpers::move_selection;
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_overview_input(app: &mut App, key: KeyCode) {
    let total_rows = app.row_count();
    if move_selection(&mut app.selected_index, total_rows, key) {
        return;
    }

    if key == KeyCode::Enter && total_rows > 0 {
        app.open_selected();
    }
}
