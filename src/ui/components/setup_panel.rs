use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use basta::engine::categories::CategorySet;

use crate::ui::theme::Theme;

/// Category editor and round target. Changes apply to rounds created afterwards.
pub struct SetupPanel<'a> {
    categories: &'a CategorySet,
    selected: usize,
    input: &'a str,
    target_rounds: u32,
    finish_enabled: bool,
    theme: &'a Theme,
}

impl<'a> SetupPanel<'a> {
    pub fn new(
        categories: &'a CategorySet,
        selected: usize,
        input: &'a str,
        target_rounds: u32,
        finish_enabled: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            categories,
            selected,
            input,
            target_rounds,
            finish_enabled,
            theme,
        }
    }
}

impl Widget for SetupPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Setup ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(3),
                Constraint::Length(2),
                Constraint::Length(2),
            ])
            .split(inner);

        let target = if self.finish_enabled {
            format!("{}", self.target_rounds)
        } else {
            "open-ended".to_string()
        };
        Paragraph::new(Line::from(vec![
            Span::styled("  Rounds per game: ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("< {target} >"),
                Style::default()
                    .fg(colors.letter())
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
        .render(layout[0], buf);

        let visible = layout[1].height as usize;
        let offset = self.selected.saturating_sub(visible.saturating_sub(1));
        let lines: Vec<Line> = self
            .categories
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(i, label)| {
                let is_selected = i == self.selected;
                let style = if is_selected {
                    Style::default()
                        .fg(colors.accent())
                        .bg(colors.selected_bg())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };
                let marker = if is_selected { " > " } else { "   " };
                Line::from(Span::styled(format!("{marker}{}. {label}", i + 1), style))
            })
            .collect();
        Paragraph::new(lines).render(layout[1], buf);

        Paragraph::new(Line::from(vec![
            Span::styled("  New category: ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{}_", self.input),
                Style::default().fg(colors.accent()),
            ),
        ]))
        .render(layout[2], buf);

        Paragraph::new(Line::from(Span::styled(
            "  [Enter] Add  [Del] Remove  [PgUp/PgDn] Rounds  [Esc] Back",
            Style::default().fg(colors.text_pending()),
        )))
        .render(layout[3], buf);
    }
}
