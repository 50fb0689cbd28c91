use ratatui::style::{Color, Modifier, Style};

use orchview_types::{JobState, LogLevel};

use crate::app::NoticeKind;

/// Color theme for the application
pub struct Theme;

impl Theme {
    // Base colors
    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;

    // Accent colors
    pub const PRIMARY: Color = Color::Cyan;
    pub const HIGHLIGHT: Color = Color::Yellow;

    // Status colors
    pub const SUCCESS: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;

    // Border styles
    pub fn border() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    // Text styles
    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn text_highlight() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Search match inside a message
    pub fn match_highlight() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    // Severity
    pub fn level(level: LogLevel) -> Style {
        Style::default()
            .fg(level.color())
            .add_modifier(Modifier::BOLD)
    }

    pub fn job_state(state: &JobState) -> Style {
        Style::default()
            .fg(state.color())
            .add_modifier(Modifier::BOLD)
    }

    // Status bar
    pub fn status_bar() -> Style {
        Style::default().fg(Self::FG_DIM).bg(Color::DarkGray)
    }

    pub fn status_bar_key() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    // Notices
    pub fn notice(kind: NoticeKind) -> Style {
        match kind {
            NoticeKind::Info => Style::default().fg(Self::SUCCESS),
            NoticeKind::Warning => Style::default()
                .fg(Self::WARNING)
                .add_modifier(Modifier::BOLD),
            NoticeKind::Error => Self::error(),
        }
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }
}
