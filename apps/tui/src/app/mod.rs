// App module for spray-dashboard
// Handles dashboard state, fetch dispatch and key input

pub mod actions;
pub mod input;
pub mod state;

pub use actions::{AppActions, FetchPayload, FetchRequest, FetchResponse};
pub use input::handle_input;
pub use state::{App, AppScreen, Selection, TargetAreaPanel};
