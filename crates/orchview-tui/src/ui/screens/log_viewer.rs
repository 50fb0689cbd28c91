use chrono::Local;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use orchview_logs::{LevelCounts, LogFilter, Page};
use orchview_types::{LevelSelection, LogLevel, LogRecord};

use crate::app::{AppState, LogView};
use crate::ui::components::{HelpOverlay, StatusBar, viewer_hints};
use crate::ui::{Layout, Theme};

/// Log viewer screen
pub struct LogViewerScreen;

/// Cut `s` to at most `max_width` columns, marking the cut with "..."
fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(3);
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

impl LogViewerScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let filtered = state.filtered_records();
        let page = state.view().page.paginate(&filtered);

        // Determine if we need the filter bar
        let show_filter_bar = state.ui_state.search_active
            || state.ui_state.active_filter.is_some()
            || state.ui_state.filter_error.is_some();

        let areas = Layout::viewer(
            frame.area(),
            state.ui_state.stats_visible,
            show_filter_bar,
            state.ui_state.notice.is_some(),
        );

        Self::render_header(frame, areas.header, state);
        if let Some(area) = areas.stats {
            Self::render_stats_bar(frame, area, &state.level_counts());
        }
        if let Some(area) = areas.filter {
            Self::render_filter_bar(frame, area, state);
        }
        Self::render_logs(frame, areas.logs, state, &page);
        if let Some(area) = areas.notice {
            Self::render_notice(frame, area, state);
        }

        frame.render_widget(
            StatusBar::new()
                .hints(viewer_hints())
                .right(Self::position_text(&page)),
            areas.status,
        );

        if state.ui_state.help_visible {
            HelpOverlay::render(frame);
        }
    }

    /// "Page 2 of 4 · 26-50 of 87"
    fn position_text(page: &Page<'_, LogRecord>) -> String {
        let range = page.range();
        if range.is_empty() {
            format!("{} · 0 of {}", page.label(), page.total_items)
        } else {
            format!(
                "{} · {}-{} of {}",
                page.label(),
                range.start + 1,
                range.end,
                page.total_items
            )
        }
    }

    fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
        let mut spans = vec![
            Span::styled("orchview", Theme::title()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(state.folder.path().to_string(), Theme::text()),
        ];

        if let Some(key) = &state.job_key {
            spans.push(Span::styled(" │ ", Theme::text_dim()));
            match &state.job {
                Some(job) => {
                    spans.push(Span::styled(job.release_name.clone(), Theme::text_highlight()));
                    spans.push(Span::styled(" ", Theme::text()));
                    spans.push(Span::styled(job.state.to_string(), Theme::job_state(&job.state)));
                }
                None => spans.push(Span::styled(key.clone(), Theme::text_highlight())),
            }
        }

        spans.push(Span::styled(" │ ", Theme::text_dim()));
        spans.push(Span::styled(
            format!("{} view", state.current_view.label()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

        spans.push(Span::styled(" │ ", Theme::text_dim()));
        spans.push(Span::styled("Level: ", Theme::text_dim()));
        let level_style = match state.ui_state.level {
            LevelSelection::All => Theme::text(),
            LevelSelection::Only(level) => Theme::level(level),
        };
        spans.push(Span::styled(state.ui_state.level.label(), level_style));

        spans.push(Span::styled(" │ ", Theme::text_dim()));
        spans.push(Span::styled(
            format!("{}/page", state.view().page.page_size.get()),
            Theme::text(),
        ));

        if state.ui_state.loading {
            spans.push(Span::styled(" │ ", Theme::text_dim()));
            spans.push(Span::styled("loading…", Theme::text_highlight()));
        }

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

        frame.render_widget(header, area);
    }

    fn render_filter_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let mut spans = vec![];

        // Prompt
        if state.ui_state.search_active {
            spans.push(Span::styled(
                " /",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(" Filter: ", Theme::text_dim()));
        }

        // Input or current filter pattern
        let pattern = if state.ui_state.search_active {
            state.ui_state.search_input.as_str()
        } else {
            state
                .ui_state
                .active_filter
                .as_ref()
                .map_or("", |f| f.pattern())
        };
        spans.push(Span::styled(pattern.to_string(), Theme::text_highlight()));

        if state.ui_state.search_active {
            spans.push(Span::styled(
                "█",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::SLOW_BLINK),
            ));
        }

        if let Some(err) = &state.ui_state.filter_error {
            spans.push(Span::styled(" ", Theme::text()));
            spans.push(Span::styled(format!("⚠ {}", err), Theme::error()));
        }

        spans.push(Span::styled("  ", Theme::text()));
        let case_text = if state.ui_state.filter_case_insensitive {
            "[i] case-insensitive"
        } else {
            "[i] case-sensitive"
        };
        spans.push(Span::styled(case_text, Theme::text_dim()));

        if state.ui_state.search_active {
            spans.push(Span::styled("  [Enter] Apply  [Esc] Cancel", Theme::text_dim()));
        } else {
            spans.push(Span::styled("  [x] Clear  [/] Edit", Theme::text_dim()));
        }

        let border_style = if state.ui_state.filter_error.is_some() {
            Style::default().fg(Color::Red)
        } else if state.ui_state.search_active {
            Theme::border_focused()
        } else {
            Theme::border()
        };

        let filter_bar = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(Span::styled(" Search ", Theme::title())),
        );

        frame.render_widget(filter_bar, area);
    }

    fn render_logs(
        frame: &mut Frame,
        area: Rect,
        state: &mut AppState,
        page: &Page<'_, LogRecord>,
    ) {
        // 2 for borders
        let inner_width = area.width.saturating_sub(2) as usize;
        let inner_height = area.height.saturating_sub(2) as usize;
        let filter = state.log_filter();

        let lines: Vec<Line> = page
            .items
            .iter()
            .enumerate()
            .flat_map(|(i, record)| {
                Self::format_record_lines(record, page.offset + i + 1, &filter, inner_width)
            })
            .collect();

        let total_lines = lines.len();
        let scroll = state.clamp_scroll(total_lines, inner_height);
        let visible: Vec<Line> = lines.into_iter().skip(scroll).take(inner_height).collect();

        let mut title = if filter.is_empty() {
            format!(" Logs ({}) ", page.total_items)
        } else {
            format!(" Logs ({} matching) ", page.total_items)
        };
        if state.current_view == LogView::Folder {
            let window = &state.folder_window;
            let more = if window.exhausted {
                "all loaded"
            } else {
                "[m] more"
            };
            title.push_str(&format!("· {} fetched, {} ", window.loaded, more));
        }

        let logs_widget = Paragraph::new(visible).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title(Span::styled(title, Theme::title())),
        );

        frame.render_widget(logs_widget, area);

        if total_lines > inner_height {
            let max_scroll = total_lines - inner_height;
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("▲"))
                .end_symbol(Some("▼"));
            let mut scrollbar_state = ScrollbarState::default()
                .content_length(max_scroll)
                .position(scroll);

            frame.render_stateful_widget(
                scrollbar,
                area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }
    }

    fn render_stats_bar(frame: &mut Frame, area: Rect, counts: &LevelCounts) {
        let mut spans = vec![Span::styled(" ", Theme::text())];

        for level in LogLevel::ALL {
            let count = counts.get(level);
            // Rare levels only when present
            if count == 0 && matches!(level, LogLevel::Fatal | LogLevel::Trace | LogLevel::Verbose) {
                continue;
            }
            spans.push(Span::styled(format!("{}:", level.short()), Theme::level(level)));
            spans.push(Span::styled(format!("{} ", count), Theme::text()));
        }

        spans.push(Span::styled("│ ", Theme::text_dim()));
        spans.push(Span::styled("Total:", Theme::text_dim()));
        spans.push(Span::styled(format!("{}", counts.total()), Theme::text()));

        let stats_widget = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title(Span::styled(" Stats ", Theme::title())),
        );

        frame.render_widget(stats_widget, area);
    }

    fn render_notice(frame: &mut Frame, area: Rect, state: &AppState) {
        let Some(notice) = &state.ui_state.notice else {
            return;
        };
        let line = Line::from(vec![
            Span::styled(format!(" {}", notice.text), Theme::notice(notice.kind)),
            Span::styled("  [Esc] dismiss", Theme::text_dim()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    /// One line per message line; continuation lines are indented under the message
    fn format_record_lines(
        record: &LogRecord,
        number: usize,
        filter: &LogFilter,
        available_width: usize,
    ) -> Vec<Line<'static>> {
        let timestamp = record
            .parsed_timestamp()
            .map(|ts| ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| record.timestamp.clone());

        let prefix_spans = vec![
            Span::styled(format!("{:>5} ", number), Theme::text_dim()),
            Span::styled(timestamp, Theme::text_dim()),
            Span::styled(format!(" {:>3}", record.level.short()), Theme::level(record.level)),
            Span::styled(" │ ", Theme::text_dim()),
        ];
        let prefix_width: usize = prefix_spans.iter().map(|s| s.content.width()).sum();
        let message_width = available_width.saturating_sub(prefix_width);
        let message_style = Style::default().fg(record.level.color());

        record
            .message
            .split('\n')
            .enumerate()
            .map(|(i, text)| {
                let mut spans = if i == 0 {
                    prefix_spans.clone()
                } else {
                    vec![Span::raw(" ".repeat(prefix_width))]
                };
                let shown = truncate_to_width(text.trim_end_matches('\r'), message_width);
                spans.extend(Self::highlight(&shown, filter, message_style));
                Line::from(spans)
            })
            .collect()
    }

    /// Split `text` into spans with pattern matches highlighted
    fn highlight(text: &str, filter: &LogFilter, base_style: Style) -> Vec<Span<'static>> {
        let mut spans = Vec::new();
        let mut last_end = 0;
        for (start, end) in filter.find_matches(text) {
            if start > last_end {
                spans.push(Span::styled(text[last_end..start].to_string(), base_style));
            }
            if end > start {
                spans.push(Span::styled(text[start..end].to_string(), Theme::match_highlight()));
            }
            last_end = end;
        }
        if last_end < text.len() || spans.is_empty() {
            spans.push(Span::styled(text[last_end..].to_string(), base_style));
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    use super::*;
    use orchview_logs::PageSize;
    use orchview_types::Folder;

    fn screen_text(buf: &Buffer) -> String {
        let area = buf.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render(state: &mut AppState) -> String {
        render_sized(state, 120, 20)
    }

    fn render_sized(state: &mut AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| LogViewerScreen::render(frame, state))
            .unwrap();
        screen_text(terminal.backend().buffer())
    }

    fn state_with(n: usize) -> AppState {
        let mut state = AppState::new(
            Folder::new(1, "Finance".to_string()),
            Some("j1".to_string()),
            PageSize::Ten,
            50,
        );
        state.set_job_records(
            (0..n)
                .map(|i| LogRecord::new("j1", LogLevel::Info, "not-a-date", format!("message {i}")))
                .collect(),
        );
        state
    }

    #[test]
    fn test_renders_current_page_and_position() {
        let mut state = state_with(23);
        state.next_page();
        let text = render(&mut state);

        assert!(text.contains("message 10"));
        assert!(text.contains("message 19"));
        assert!(!text.contains("message 9 "));
        assert!(text.contains("Page 2 of 3 · 11-20 of 23"));
        assert!(text.contains("Job view"));
    }

    #[test]
    fn test_long_page_scrolls_to_every_record() {
        let mut state = state_with(25);
        state.cycle_page_size();
        assert_eq!(state.view().page.page_size, PageSize::TwentyFive);

        let text = render_sized(&mut state, 120, 24);
        assert!(text.contains("message 0 "));
        assert!(!text.contains("message 24"));

        state.scroll_to_bottom();
        let text = render_sized(&mut state, 120, 24);
        assert!(text.contains("message 24"));
        assert!(!text.contains("message 0 "));
        // Clamped so the last record sits on the bottom row
        let max_scroll = state.view().scroll;
        assert!(max_scroll > 0 && max_scroll < 25);

        state.scroll_up(1);
        let text = render_sized(&mut state, 120, 24);
        assert!(!text.contains("message 24"));
        assert_eq!(state.view().scroll, max_scroll - 1);
    }

    #[test]
    fn test_empty_result_shows_notice() {
        let mut state = state_with(3);
        state.cycle_level(true);
        let text = render(&mut state);
        assert!(text.contains("No logs found for the selected filters."));
        assert!(text.contains("Page 1 of 1 · 0 of 0"));
    }

    #[test]
    fn test_multiline_message_is_indented() {
        let record = LogRecord::new("j1", LogLevel::Error, "raw-ts", "first\nsecond");
        let lines = LogViewerScreen::format_record_lines(&record, 1, &LogFilter::new(), 80);
        assert_eq!(lines.len(), 2);
        let second: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(second.trim_start().starts_with("second"));
        assert!(second.starts_with("     "));
    }

    #[test]
    fn test_matches_are_highlighted() {
        let filter = LogFilter::new().with_pattern("item", true).unwrap();
        let spans = LogViewerScreen::highlight("Queue Item added", &filter, Style::default());
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].content, "Item");
        assert_eq!(spans[1].style, Theme::match_highlight());
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("a long message", 8), "a lon...");
    }
}
