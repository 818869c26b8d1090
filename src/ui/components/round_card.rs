use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use basta::engine::categories::CategorySet;
use basta::session::round::{Round, RoundState};

use crate::ui::theme::Theme;

const LABEL_WIDTH: usize = 18;

/// The round on screen: a letter row followed by one row per answer cell.
/// Row 0 is the letter, row `i + 1` is cell `i`.
pub struct RoundCard<'a> {
    round: &'a Round,
    categories: &'a CategorySet,
    position: usize,
    total: usize,
    selected: usize,
    theme: &'a Theme,
}

impl<'a> RoundCard<'a> {
    pub fn new(
        round: &'a Round,
        categories: &'a CategorySet,
        position: usize,
        total: usize,
        selected: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            round,
            categories,
            position,
            total,
            selected,
            theme,
        }
    }

    fn letter_line(&self) -> Line<'static> {
        let colors = &self.theme.colors;
        let letter = match self.round.letter() {
            Some(ch) => ch.to_string(),
            None => "_".to_string(),
        };
        let marker = if self.selected == 0 { " > " } else { "   " };
        Line::from(vec![
            Span::styled(marker, Style::default().fg(colors.accent())),
            Span::styled(
                format!("{:<LABEL_WIDTH$}", "Letra"),
                Style::default().fg(colors.fg()),
            ),
            Span::styled(
                letter,
                Style::default()
                    .fg(colors.letter())
                    .add_modifier(Modifier::BOLD),
            ),
        ])
    }

    fn cell_line(&self, index: usize) -> Line<'static> {
        let colors = &self.theme.colors;
        let label = self.categories.get(index).unwrap_or("(removed)");
        let label: String = label.chars().take(LABEL_WIDTH - 1).collect();
        let answer = self.round.answer(index).unwrap_or_default();
        let status = self.round.status_at(index).unwrap_or_default();
        let rated = self
            .round
            .has_selected_status()
            .get(index)
            .copied()
            .unwrap_or(false);
        let is_selected = self.selected == index + 1;

        let marker = if is_selected { " > " } else { "   " };
        let tag = if rated || self.round.is_locked() {
            format!("[{} +{}]", status.as_str(), status.points())
        } else {
            format!("[{}]", status.as_str())
        };
        let answer_style = if is_selected {
            Style::default().fg(colors.fg()).bg(colors.selected_bg())
        } else {
            Style::default().fg(colors.fg())
        };

        Line::from(vec![
            Span::styled(marker, Style::default().fg(colors.accent())),
            Span::styled(
                format!("{label:<LABEL_WIDTH$}"),
                Style::default().fg(colors.text_pending()),
            ),
            Span::styled(format!("{answer:<24}"), answer_style),
            Span::raw(" "),
            Span::styled(tag, Style::default().fg(colors.status(status))),
        ])
    }
}

impl Widget for RoundCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let state = match self.round.state() {
            RoundState::Unlettered => "no letter",
            RoundState::Open => "open",
            RoundState::Locked => "locked",
        };
        let block = Block::bordered()
            .title(format!(
                " Round {} of {} ({state}) ",
                self.position + 1,
                self.total
            ))
            .border_style(Style::default().fg(if self.round.is_locked() {
                colors.accent_dim()
            } else {
                colors.accent()
            }))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }

        let mut lines = vec![self.letter_line()];
        lines.extend((0..self.round.category_count()).map(|i| self.cell_line(i)));

        // Keep the selected row in view.
        let visible = inner.height as usize;
        let offset = self.selected.saturating_sub(visible.saturating_sub(1));
        let lines: Vec<Line> = lines.into_iter().skip(offset).take(visible).collect();
        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basta::engine::scoring::AnswerStatus;
    use basta::session::round::RoundId;

    fn render_to_string(card: RoundCard, width: u16, height: u16) -> Vec<String> {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        card.render(area, &mut buf);
        (0..height)
            .map(|y| (0..width).map(|x| buf[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn test_renders_letter_and_cells() {
        let theme = Theme::default();
        let categories = CategorySet::new(["Nombre", "Animal"]).unwrap();
        let mut round = Round::new(RoundId(0), 2);
        round.set_letter('g').unwrap();
        round.set_answer(1, "Gato").unwrap();
        round.select_status(1, AnswerStatus::Unique).unwrap();

        let rows = render_to_string(RoundCard::new(&round, &categories, 0, 1, 2, &theme), 70, 6);
        assert!(rows[0].contains("Round 1 of 1 (open)"));
        assert!(rows[1].contains('G'));
        assert!(rows[2].contains("Nombre"));
        assert!(rows[3].contains("Gato"));
        assert!(rows[3].contains("[unique +20]"));
        assert!(rows[3].contains(" > "));
    }

    #[test]
    fn test_cells_beyond_current_categories_are_labelled() {
        let theme = Theme::default();
        let categories = CategorySet::new(["Nombre"]).unwrap();
        let round = Round::new(RoundId(0), 2);
        let rows = render_to_string(RoundCard::new(&round, &categories, 0, 1, 0, &theme), 70, 6);
        assert!(rows[3].contains("(removed)"));
    }
}
