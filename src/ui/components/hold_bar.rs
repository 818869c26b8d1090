use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use basta::session::hold::HoldStatus;

use crate::ui::theme::Theme;

/// Fills left to right while the stop key is held.
pub struct HoldBar<'a> {
    progress: Option<f64>,
    locked: bool,
    theme: &'a Theme,
}

impl<'a> HoldBar<'a> {
    pub fn new(hold: &HoldStatus, locked: bool, theme: &'a Theme) -> Self {
        let progress = match hold {
            HoldStatus::Holding { progress, .. } => Some((progress / 100.0).clamp(0.0, 1.0)),
            HoldStatus::Idle => None,
        };
        Self {
            progress,
            locked,
            theme,
        }
    }
}

impl Widget for HoldBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = if self.locked { " Stopped " } else { " Basta! " };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(match self.progress {
                Some(_) => colors.border_focused(),
                None => colors.border(),
            }));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let ratio = self.progress.unwrap_or(0.0);
        let filled_width = (ratio * inner.width as f64) as u16;
        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(colors.bar_filled())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label = match self.progress {
            Some(ratio) => format!("{:.0}%", ratio * 100.0),
            None if self.locked => "Round locked".to_string(),
            None => "Hold Enter to stop the round".to_string(),
        };
        let label_x = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        buf.set_string(
            label_x,
            inner.y,
            &label,
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basta::session::round::RoundId;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_idle_shows_prompt() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 40, 3);
        let mut buf = Buffer::empty(area);
        HoldBar::new(&HoldStatus::Idle, false, &theme).render(area, &mut buf);
        assert!(row(&buf, 1).contains("Hold Enter"));
    }

    #[test]
    fn test_holding_shows_percentage() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 40, 3);
        let mut buf = Buffer::empty(area);
        let hold = HoldStatus::Holding {
            round: RoundId(0),
            progress: 50.0,
        };
        HoldBar::new(&hold, false, &theme).render(area, &mut buf);
        assert!(row(&buf, 1).contains("50%"));
    }
}
