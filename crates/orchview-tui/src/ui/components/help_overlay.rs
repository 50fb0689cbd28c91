use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::ui::Layout;

/// Help overlay showing keybindings
pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render(frame: &mut Frame) {
        let popup_area = Layout::popup(frame.area(), 50, 36);

        // Clear the background
        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            Line::from(Span::styled(
                "Keybindings",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Self::section("Pages"),
            Self::key_line("n/→", "Next page"),
            Self::key_line("p/←", "Previous page"),
            Self::key_line("z", "Cycle page size"),
            Self::key_line("m", "Load more (folder view)"),
            Line::from(""),
            Self::section("Scrolling"),
            Self::key_line("j/k", "Scroll down/up"),
            Self::key_line("^d/^u", "Scroll half a screen"),
            Self::key_line("g/G", "Top/bottom of page"),
            Line::from(""),
            Self::section("Filters"),
            Self::key_line("l/L", "Cycle level forward/back"),
            Self::key_line("Tab", "Switch job/folder view"),
            Self::key_line("/", "Search messages"),
            Self::key_line("x", "Clear search"),
            Self::key_line("i", "Toggle case sensitivity"),
            Line::from(""),
            Self::section("Actions"),
            Self::key_line("r", "Refresh"),
            Self::key_line("s", "Toggle stats bar"),
            Self::key_line("1", "Export as text"),
            Self::key_line("2", "Export as CSV"),
            Self::key_line("3", "Export as Excel"),
            Self::key_line("?", "Toggle this help"),
            Self::key_line("Esc", "Dismiss"),
            Self::key_line("q", "Quit"),
        ];

        let help_widget = Paragraph::new(help_text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(Span::styled(
                    " Help ",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        );

        frame.render_widget(help_widget, popup_area);
    }

    fn section(title: &str) -> Line<'_> {
        Line::from(Span::styled(title, Style::default().fg(Color::Yellow)))
    }

    fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("  {:>8}", key), Style::default().fg(Color::Green)),
            Span::styled(format!("  {}", desc), Style::default().fg(Color::White)),
        ])
    }
}
