use serde::{Deserialize, Serialize};

use crate::engine::categories::CategorySet;
use crate::engine::scoring::AnswerStatus;
use crate::session::ledger::RoundLedger;

/// A single round singled out on the end screen. `round` is the 1-based
/// ledger position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundHighlight {
    pub round: usize,
    pub letter: Option<char>,
    pub points: u32,
}

impl Default for RoundHighlight {
    fn default() -> Self {
        Self {
            round: 1,
            letter: None,
            points: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: String,
    pub correct: usize,
    pub unique: usize,
    pub total: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterStat {
    pub letter: Option<char>,
    pub points: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTally {
    pub incorrect: usize,
    pub repeated: usize,
    pub correct: usize,
    pub unique: usize,
}

impl StatusTally {
    pub fn record(&mut self, status: AnswerStatus) {
        match status {
            AnswerStatus::Incorrect => self.incorrect += 1,
            AnswerStatus::Repeated => self.repeated += 1,
            AnswerStatus::Correct => self.correct += 1,
            AnswerStatus::Unique => self.unique += 1,
        }
    }

    pub fn count(&self, status: AnswerStatus) -> usize {
        match status {
            AnswerStatus::Incorrect => self.incorrect,
            AnswerStatus::Repeated => self.repeated,
            AnswerStatus::Correct => self.correct,
            AnswerStatus::Unique => self.unique,
        }
    }

    pub fn hits(&self) -> usize {
        self.correct + self.unique
    }

    pub fn total(&self) -> usize {
        self.incorrect + self.repeated + self.correct + self.unique
    }

    /// Share of rated cells that were correct or unique, rounded half-up.
    /// Zero when nothing was rated.
    pub fn effectiveness_percent(&self) -> u32 {
        rounded_ratio(self.hits() as u64 * 100, self.total() as u64)
    }
}

/// End-of-game summary computed from locked rounds only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub total_points: u32,
    pub total_rounds: usize,
    pub average_points: u32,
    pub best_round: RoundHighlight,
    pub worst_round: RoundHighlight,
    pub category_stats: Vec<CategoryStat>,
    pub letter_stats: Vec<LetterStat>,
    pub tally: StatusTally,
    pub effectiveness_percent: u32,
}

impl GameStats {
    pub fn compute(ledger: &RoundLedger, categories: &CategorySet) -> Self {
        let mut total_points = 0u32;
        let mut total_rounds = 0usize;
        let mut best: Option<RoundHighlight> = None;
        let mut worst: Option<RoundHighlight> = None;
        let mut letter_stats = Vec::new();
        let mut tally = StatusTally::default();
        let mut category_stats: Vec<CategoryStat> = categories
            .iter()
            .map(|label| CategoryStat {
                category: label.to_string(),
                correct: 0,
                unique: 0,
                total: 0,
            })
            .collect();

        for (position, round) in ledger.locked_rounds() {
            let points = round.points();
            total_points += points;
            total_rounds += 1;

            let highlight = RoundHighlight {
                round: position + 1,
                letter: round.letter(),
                points,
            };
            // Strict comparisons keep the first occurrence on ties.
            if best.as_ref().is_none_or(|b| points > b.points) {
                best = Some(highlight.clone());
            }
            if worst.as_ref().is_none_or(|w| points < w.points) {
                worst = Some(highlight);
            }

            letter_stats.push(LetterStat {
                letter: round.letter(),
                points,
            });

            for (index, &status) in round.status().iter().enumerate() {
                tally.record(status);
                if let Some(stat) = category_stats.get_mut(index) {
                    stat.total += 1;
                    match status {
                        AnswerStatus::Correct => stat.correct += 1,
                        AnswerStatus::Unique => stat.unique += 1,
                        _ => {}
                    }
                }
            }
        }

        let best_round = best.unwrap_or_default();
        let worst_round = worst.unwrap_or_else(|| best_round.clone());

        Self {
            total_points,
            total_rounds,
            average_points: rounded_ratio(total_points as u64, total_rounds as u64),
            best_round,
            worst_round,
            category_stats,
            letter_stats,
            effectiveness_percent: tally.effectiveness_percent(),
            tally,
        }
    }
}

fn rounded_ratio(numerator: u64, denominator: u64) -> u32 {
    if denominator == 0 {
        return 0;
    }
    (numerator as f64 / denominator as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(ledger: &mut RoundLedger, letter: char, statuses: &[AnswerStatus]) {
        let round = ledger.create_round(statuses.len());
        round.set_letter(letter).unwrap();
        for (i, &status) in statuses.iter().enumerate() {
            round.set_answer(i, format!("{letter}palabra")).unwrap();
            round.select_status(i, status).unwrap();
        }
        round.lock().unwrap();
    }

    fn two_categories() -> CategorySet {
        CategorySet::new(["Nombre", "Animal"]).unwrap()
    }

    #[test]
    fn test_empty_ledger_is_neutral() {
        let stats = GameStats::compute(&RoundLedger::new(), &two_categories());
        assert_eq!(stats.total_rounds, 0);
        assert_eq!(stats.total_points, 0);
        assert_eq!(stats.average_points, 0);
        assert_eq!(stats.effectiveness_percent, 0);
        assert_eq!(stats.best_round, RoundHighlight::default());
        assert_eq!(stats.worst_round, stats.best_round);
        assert_eq!(stats.category_stats.len(), 2);
        assert!(stats.letter_stats.is_empty());
    }

    #[test]
    fn test_best_worst_and_average() {
        let mut ledger = RoundLedger::new();
        play(&mut ledger, 'B', &[AnswerStatus::Unique, AnswerStatus::Correct]);
        play(&mut ledger, 'C', &[AnswerStatus::Incorrect, AnswerStatus::Incorrect]);
        let stats = GameStats::compute(&ledger, &two_categories());

        assert_eq!(stats.total_points, 30);
        assert_eq!(stats.total_rounds, 2);
        assert_eq!(stats.average_points, 15);
        assert_eq!(
            stats.best_round,
            RoundHighlight { round: 1, letter: Some('B'), points: 30 }
        );
        assert_eq!(
            stats.worst_round,
            RoundHighlight { round: 2, letter: Some('C'), points: 0 }
        );
    }

    #[test]
    fn test_ties_keep_first_occurrence() {
        let mut ledger = RoundLedger::new();
        play(&mut ledger, 'A', &[AnswerStatus::Correct]);
        play(&mut ledger, 'E', &[AnswerStatus::Correct]);
        let stats = GameStats::compute(&ledger, &CategorySet::new(["Animal"]).unwrap());
        assert_eq!(stats.best_round.round, 1);
        assert_eq!(stats.worst_round.round, 1);
    }

    #[test]
    fn test_unlocked_rounds_are_ignored() {
        let mut ledger = RoundLedger::new();
        ledger.create_round(2);
        play(&mut ledger, 'M', &[AnswerStatus::Repeated, AnswerStatus::Unique]);
        let stats = GameStats::compute(&ledger, &two_categories());
        assert_eq!(stats.total_rounds, 1);
        assert_eq!(stats.best_round.round, 2);
        assert_eq!(
            stats.letter_stats,
            vec![LetterStat { letter: Some('M'), points: 25 }]
        );
    }

    #[test]
    fn test_category_stats_align_by_index() {
        let mut ledger = RoundLedger::new();
        play(&mut ledger, 'P', &[AnswerStatus::Correct, AnswerStatus::Unique]);
        let stats = GameStats::compute(&ledger, &two_categories());
        assert_eq!(stats.category_stats[0].correct, 1);
        assert_eq!(stats.category_stats[0].unique, 0);
        assert_eq!(stats.category_stats[1].correct, 0);
        assert_eq!(stats.category_stats[1].unique, 1);
        assert_eq!(stats.category_stats[1].total, 1);
    }

    #[test]
    fn test_rounds_with_fewer_cells_than_categories() {
        let mut ledger = RoundLedger::new();
        play(&mut ledger, 'S', &[AnswerStatus::Unique]);
        let stats = GameStats::compute(&ledger, &two_categories());
        assert_eq!(stats.category_stats[0].total, 1);
        assert_eq!(stats.category_stats[1].total, 0);
        assert_eq!(stats.tally.total(), 1);
    }

    #[test]
    fn test_tally_and_effectiveness() {
        let mut ledger = RoundLedger::new();
        play(
            &mut ledger,
            'T',
            &[AnswerStatus::Correct, AnswerStatus::Unique, AnswerStatus::Repeated],
        );
        let stats = GameStats::compute(
            &ledger,
            &CategorySet::new(["Nombre", "Animal", "Color"]).unwrap(),
        );
        assert_eq!(stats.tally.count(AnswerStatus::Correct), 1);
        assert_eq!(stats.tally.count(AnswerStatus::Unique), 1);
        assert_eq!(stats.tally.count(AnswerStatus::Repeated), 1);
        assert_eq!(stats.tally.count(AnswerStatus::Incorrect), 0);
        // 2 of 3 -> 66.67 -> 67
        assert_eq!(stats.effectiveness_percent, 67);
    }

    #[test]
    fn test_average_rounds_half_up() {
        let mut ledger = RoundLedger::new();
        play(&mut ledger, 'A', &[AnswerStatus::Repeated]);
        play(&mut ledger, 'B', &[AnswerStatus::Correct]);
        let stats = GameStats::compute(&ledger, &CategorySet::new(["Animal"]).unwrap());
        // 15 / 2 = 7.5 -> 8
        assert_eq!(stats.average_points, 8);
    }
}
