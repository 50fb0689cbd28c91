use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// Areas of the log viewer screen, top to bottom
pub struct ViewerAreas {
    pub header: Rect,
    pub stats: Option<Rect>,
    pub filter: Option<Rect>,
    pub logs: Rect,
    pub notice: Option<Rect>,
    pub status: Rect,
}

/// Layout helper for consistent screen layouts
pub struct Layout;

impl Layout {
    /// Split the screen into header, optional bars, log list and status bar
    pub fn viewer(area: Rect, stats: bool, filter: bool, notice: bool) -> ViewerAreas {
        let mut constraints = vec![Constraint::Length(3)]; // Header
        if stats {
            constraints.push(Constraint::Length(3));
        }
        if filter {
            constraints.push(Constraint::Length(3));
        }
        constraints.push(Constraint::Min(1)); // Logs
        if notice {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Length(1)); // Status bar

        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut next = chunks.iter().copied();
        let mut take = || next.next().unwrap_or_default();

        let header = take();
        let stats = stats.then(&mut take);
        let filter = filter.then(&mut take);
        let logs = take();
        let notice = notice.then(&mut take);
        let status = take();

        ViewerAreas {
            header,
            stats,
            filter,
            logs,
            notice,
            status,
        }
    }

    /// Centered popup of at most `width` x `height`
    pub fn popup(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width.saturating_sub(4));
        let height = height.min(area.height.saturating_sub(4));
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        Rect::new(x, y, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_areas_stack_in_order() {
        let areas = Layout::viewer(Rect::new(0, 0, 80, 30), true, false, true);
        assert_eq!(areas.header.height, 3);
        assert_eq!(areas.stats.map(|r| r.y), Some(3));
        assert!(areas.filter.is_none());
        assert_eq!(areas.logs.y, 6);
        assert_eq!(areas.notice.map(|r| r.y), Some(28));
        assert_eq!(areas.status.y, 29);
    }

    #[test]
    fn test_popup_is_centered() {
        let popup = Layout::popup(Rect::new(0, 0, 100, 40), 50, 20);
        assert_eq!(popup, Rect::new(25, 10, 50, 20));
    }
}
