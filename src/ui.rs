//! Ratatui front-end. `app` holds the state machine and drawing code, `forms`
//! the modal input state, `terminal` the raw-mode event loop.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
