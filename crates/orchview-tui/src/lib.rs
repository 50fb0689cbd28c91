//! TUI components for orchview
//!
//! This crate provides the terminal log viewer: state management,
//! keybindings, event handling and rendering.

pub mod app;
pub mod config;
pub mod tui;
pub mod ui;

pub use app::{Action, AppState, LogView, NO_LOGS_NOTICE, Notice, NoticeKind, UiState, ViewState};
pub use config::{KeyBinding, KeyBindings, KeyContext};
pub use tui::{Event, EventHandler, Tui};
pub use ui::components::{HelpOverlay, StatusBar, viewer_hints};
pub use ui::screens::LogViewerScreen;
pub use ui::{Layout, Theme};
