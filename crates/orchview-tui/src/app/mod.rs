//! Application state and actions

mod action;
mod state;

pub use action::Action;
pub use state::{AppState, LogView, NO_LOGS_NOTICE, Notice, NoticeKind, UiState, ViewState};
