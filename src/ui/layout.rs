use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Vertical split of the round screen. The footer grows to fit the wrapped
/// key hints.
pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub hold: Rect,
    pub message: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect, footer_lines: u16) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(footer_lines.max(1)),
            ])
            .split(area);

        Self {
            header: vertical[0],
            main: vertical[1],
            hold: vertical[2],
            message: vertical[3],
            footer: vertical[4],
        }
    }
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = "  ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 56;
    const MIN_POPUP_HEIGHT: u16 = 16;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_wrap_at_width() {
        let lines = pack_hint_lines(&["[Esc] Quit", "[Ctrl+R] Letter", "[Enter] Hold"], 30);
        assert_eq!(lines, vec!["  [Esc] Quit  [Ctrl+R] Letter", "  [Enter] Hold"]);
    }

    #[test]
    fn test_hints_empty_input() {
        assert!(pack_hint_lines(&[], 40).is_empty());
        assert!(pack_hint_lines(&["[q] Quit"], 0).is_empty());
    }

    #[test]
    fn test_centered_rect_respects_bounds() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered_rect(50, 50, area);
        assert_eq!(rect, Rect::new(0, 0, 40, 10));

        let area = Rect::new(0, 0, 200, 60);
        let rect = centered_rect(50, 50, area);
        assert_eq!(rect, Rect::new(50, 15, 100, 30));
    }

    #[test]
    fn test_layout_stacks_regions() {
        let layout = AppLayout::new(Rect::new(0, 0, 80, 30), 2);
        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.hold.height, 3);
        assert_eq!(layout.message.height, 1);
        assert_eq!(layout.footer.height, 2);
        assert_eq!(layout.main.height, 30 - 3 - 3 - 1 - 2);
    }
}
