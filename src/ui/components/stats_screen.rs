use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use basta::engine::scoring::AnswerStatus;
use basta::engine::stats::{GameStats, RoundHighlight};

use crate::ui::theme::Theme;

pub struct StatsScreen<'a> {
    pub stats: &'a GameStats,
    pub theme: &'a Theme,
}

impl<'a> StatsScreen<'a> {
    pub fn new(stats: &'a GameStats, theme: &'a Theme) -> Self {
        Self { stats, theme }
    }

    fn highlight_text(highlight: &RoundHighlight) -> String {
        let letter = highlight
            .letter
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "Round {} ({letter}): {} pts",
            highlight.round, highlight.points
        )
    }
}

impl Widget for StatsScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let stats = self.stats;

        let block = Block::bordered()
            .title(" Game Over ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(6),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        let title = Paragraph::new(Line::from(Span::styled(
            format!("{} points", stats.total_points),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        let eff_color = if stats.effectiveness_percent >= 70 {
            colors.success()
        } else if stats.effectiveness_percent >= 40 {
            colors.warning()
        } else {
            colors.error()
        };
        let label = Style::default().fg(colors.fg());
        let value = Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD);
        let summary = vec![
            Line::from(vec![
                Span::styled("  Rounds:        ", label),
                Span::styled(stats.total_rounds.to_string(), value),
            ]),
            Line::from(vec![
                Span::styled("  Average:       ", label),
                Span::styled(format!("{} pts", stats.average_points), value),
            ]),
            Line::from(vec![
                Span::styled("  Best:          ", label),
                Span::styled(Self::highlight_text(&stats.best_round), value),
            ]),
            Line::from(vec![
                Span::styled("  Worst:         ", label),
                Span::styled(Self::highlight_text(&stats.worst_round), value),
            ]),
            Line::from(vec![
                Span::styled("  Effectiveness: ", label),
                Span::styled(
                    format!("{}%", stats.effectiveness_percent),
                    Style::default().fg(eff_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({}/{} hits)", stats.tally.hits(), stats.tally.total()),
                    Style::default().fg(colors.text_pending()),
                ),
            ]),
            Line::from(
                AnswerStatus::ALL
                    .iter()
                    .map(|s| {
                        Span::styled(
                            format!("  {} {}", s.as_str(), stats.tally.count(*s)),
                            Style::default().fg(colors.status(*s)),
                        )
                    })
                    .collect::<Vec<_>>(),
            ),
        ];
        Paragraph::new(summary).render(layout[1], buf);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(layout[2]);

        let mut category_lines = vec![Line::from(Span::styled(
            "  Category            correct unique",
            Style::default().fg(colors.text_pending()),
        ))];
        for stat in &stats.category_stats {
            let name: String = stat.category.chars().take(18).collect();
            category_lines.push(Line::from(vec![
                Span::styled(format!("  {name:<18}"), label),
                Span::styled(
                    format!("{:>8}", format!("{}/{}", stat.correct, stat.total)),
                    Style::default().fg(colors.status(AnswerStatus::Correct)),
                ),
                Span::styled(
                    format!("{:>7}", stat.unique),
                    Style::default().fg(colors.status(AnswerStatus::Unique)),
                ),
            ]));
        }
        Paragraph::new(category_lines).render(columns[0], buf);

        let mut letter_lines = vec![Line::from(Span::styled(
            "Letter  pts",
            Style::default().fg(colors.text_pending()),
        ))];
        for stat in &stats.letter_stats {
            let letter = stat.letter.unwrap_or('-');
            letter_lines.push(Line::from(vec![
                Span::styled(
                    format!("  {letter}   "),
                    Style::default().fg(colors.letter()),
                ),
                Span::styled(format!("{:>4}", stat.points), label),
            ]));
        }
        Paragraph::new(letter_lines).render(columns[1], buf);

        let help = Paragraph::new(Line::from(vec![
            Span::styled("  [r/Enter] Play again  ", Style::default().fg(colors.accent())),
            Span::styled("[q/Esc] Quit", Style::default().fg(colors.accent())),
        ]));
        help.render(layout[3], buf);
    }
}
