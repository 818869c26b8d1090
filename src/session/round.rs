use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::scoring::{self, AnswerStatus};
use crate::error::{GameError, GameResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoundId(pub u64);

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Round#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    /// No letter chosen yet.
    Unlettered,
    /// Letter chosen, answers editable.
    Open,
    /// Letter and answers frozen, points valid.
    Locked,
}

/// One letter played across every category.
///
/// `answers`, `status` and `has_selected_status` are sized to the category
/// count at creation and keep that length for the life of the round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Round {
    id: RoundId,
    created_at: DateTime<Utc>,
    letter: Option<char>,
    answers: Vec<String>,
    status: Vec<AnswerStatus>,
    has_selected_status: Vec<bool>,
    locked: bool,
    points: u32,
}

impl Round {
    pub fn new(id: RoundId, category_count: usize) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            letter: None,
            answers: vec![String::new(); category_count],
            status: vec![AnswerStatus::default(); category_count],
            has_selected_status: vec![false; category_count],
            locked: false,
            points: 0,
        }
    }

    pub fn id(&self) -> RoundId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn letter(&self) -> Option<char> {
        self.letter
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(index).map(String::as_str)
    }

    pub fn status(&self) -> &[AnswerStatus] {
        &self.status
    }

    pub fn status_at(&self, index: usize) -> Option<AnswerStatus> {
        self.status.get(index).copied()
    }

    pub fn has_selected_status(&self) -> &[bool] {
        &self.has_selected_status
    }

    pub fn category_count(&self) -> usize {
        self.answers.len()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Zero until the round is locked.
    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn state(&self) -> RoundState {
        if self.locked {
            RoundState::Locked
        } else if self.letter.is_some() {
            RoundState::Open
        } else {
            RoundState::Unlettered
        }
    }

    /// Number of cells rated explicitly at least once.
    pub fn rated_count(&self) -> usize {
        self.has_selected_status.iter().filter(|&&s| s).count()
    }

    /// Sets the round letter (uppercased) and overwrites placeholder answers
    /// with its lowercase form.
    pub fn set_letter(&mut self, ch: char) -> GameResult<()> {
        if self.locked {
            return Err(GameError::InvalidState("round is locked"));
        }
        if !ch.is_alphabetic() {
            return Err(GameError::InvalidLetter(ch));
        }
        let upper = ch.to_uppercase().next().unwrap_or(ch);
        let fill: String = upper.to_lowercase().collect();
        for answer in self.answers.iter_mut() {
            if scoring::is_placeholder(answer) {
                answer.clone_from(&fill);
            }
        }
        self.letter = Some(upper);
        Ok(())
    }

    /// Returns the round to `Unlettered`, blanking placeholder answers.
    pub fn clear_letter(&mut self) -> GameResult<()> {
        if self.locked {
            return Err(GameError::InvalidState("round is locked"));
        }
        for answer in self.answers.iter_mut() {
            if scoring::is_placeholder(answer) {
                answer.clear();
            }
        }
        self.letter = None;
        Ok(())
    }

    pub fn set_answer(&mut self, index: usize, text: impl Into<String>) -> GameResult<()> {
        self.check_index(index)?;
        if self.locked {
            return Err(GameError::InvalidState("round is locked"));
        }
        self.answers[index] = text.into();
        Ok(())
    }

    /// Advances the rating of one cell. Placeholder answers always drop to
    /// `Incorrect`. Allowed after locking so ratings can be corrected.
    pub fn cycle_status(&mut self, index: usize) -> GameResult<AnswerStatus> {
        self.check_index(index)?;
        let next = if scoring::is_placeholder(&self.answers[index]) {
            AnswerStatus::Incorrect
        } else {
            self.status[index].next()
        };
        self.status[index] = next;
        self.recompute_points();
        Ok(next)
    }

    pub fn select_status(&mut self, index: usize, status: AnswerStatus) -> GameResult<()> {
        self.check_index(index)?;
        self.status[index] = status;
        self.has_selected_status[index] = true;
        self.recompute_points();
        Ok(())
    }

    /// Freezes the letter and answers and computes points. Locking an
    /// already locked round only recomputes.
    pub fn lock(&mut self) -> GameResult<u32> {
        if self.letter.is_none() {
            return Err(GameError::InvalidState("round has no letter"));
        }
        if !self.locked {
            info!(round = %self.id, "round locked");
        }
        self.locked = true;
        self.recompute_points();
        Ok(self.points)
    }

    /// Re-opens a locked round for edits. Points drop to zero until it is locked again.
    pub fn unlock(&mut self) -> GameResult<()> {
        if !self.locked {
            return Err(GameError::InvalidState("round is not locked"));
        }
        info!(round = %self.id, "round unlocked");
        self.locked = false;
        self.recompute_points();
        Ok(())
    }

    fn recompute_points(&mut self) {
        self.points = if self.locked {
            scoring::round_points(&self.status)
        } else {
            0
        };
    }

    fn check_index(&self, index: usize) -> GameResult<()> {
        if index >= self.answers.len() {
            return Err(GameError::OutOfRange {
                index,
                len: self.answers.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lettered(count: usize, letter: char) -> Round {
        let mut round = Round::new(RoundId(1), count);
        round.set_letter(letter).unwrap();
        round
    }

    #[test]
    fn test_new_round_is_unlettered_and_sized() {
        let round = Round::new(RoundId(1), 3);
        assert_eq!(round.state(), RoundState::Unlettered);
        assert_eq!(round.answers().len(), 3);
        assert_eq!(round.status().len(), 3);
        assert_eq!(round.has_selected_status().len(), 3);
        assert_eq!(round.points(), 0);
        assert!(round.status().iter().all(|s| *s == AnswerStatus::Incorrect));
    }

    #[test]
    fn test_set_letter_uppercases_and_fills_placeholders() {
        let mut round = Round::new(RoundId(1), 3);
        round.set_answer(1, "x").unwrap();
        round.set_answer(2, "Mesa").unwrap();
        round.set_letter('m').unwrap();
        assert_eq!(round.letter(), Some('M'));
        assert_eq!(round.state(), RoundState::Open);
        assert_eq!(round.answers(), &["m", "m", "Mesa"]);
    }

    #[test]
    fn test_changing_letter_refills_only_placeholders() {
        let mut round = lettered(2, 'b');
        round.set_answer(1, "Búho").unwrap();
        round.set_letter('C').unwrap();
        assert_eq!(round.answers(), &["c", "Búho"]);
    }

    #[test]
    fn test_clear_letter_blanks_placeholders() {
        let mut round = lettered(2, 'b');
        round.set_answer(1, "Beatriz").unwrap();
        round.clear_letter().unwrap();
        assert_eq!(round.state(), RoundState::Unlettered);
        assert_eq!(round.answers(), &["", "Beatriz"]);
    }

    #[test]
    fn test_non_letter_rejected() {
        let mut round = Round::new(RoundId(1), 1);
        assert_eq!(round.set_letter('3'), Err(GameError::InvalidLetter('3')));
        assert_eq!(round.letter(), None);
    }

    #[test]
    fn test_set_answer_out_of_range() {
        let mut round = Round::new(RoundId(1), 2);
        assert_eq!(
            round.set_answer(2, "Perro"),
            Err(GameError::OutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_locked_round_rejects_edits_without_mutation() {
        let mut round = lettered(2, 'b');
        round.set_answer(0, "Beatriz").unwrap();
        round.lock().unwrap();
        let before = round.clone();

        assert!(matches!(round.set_letter('C'), Err(GameError::InvalidState(_))));
        assert!(matches!(round.clear_letter(), Err(GameError::InvalidState(_))));
        assert!(matches!(round.set_answer(0, "Bruno"), Err(GameError::InvalidState(_))));
        assert_eq!(round, before);
    }

    #[test]
    fn test_cycle_on_placeholder_forces_incorrect() {
        let mut round = lettered(1, 'b');
        round.select_status(0, AnswerStatus::Unique).unwrap();
        assert_eq!(round.cycle_status(0), Ok(AnswerStatus::Incorrect));
        assert_eq!(round.cycle_status(0), Ok(AnswerStatus::Incorrect));
    }

    #[test]
    fn test_cycle_on_real_answer_advances() {
        let mut round = lettered(1, 'b');
        round.set_answer(0, "Burro").unwrap();
        assert_eq!(round.cycle_status(0), Ok(AnswerStatus::Repeated));
        assert_eq!(round.cycle_status(0), Ok(AnswerStatus::Correct));
        assert_eq!(round.cycle_status(0), Ok(AnswerStatus::Unique));
        assert_eq!(round.cycle_status(0), Ok(AnswerStatus::Incorrect));
    }

    #[test]
    fn test_points_stay_zero_while_open() {
        let mut round = lettered(1, 'b');
        round.set_answer(0, "Burro").unwrap();
        round.select_status(0, AnswerStatus::Unique).unwrap();
        assert_eq!(round.points(), 0);
    }

    #[test]
    fn test_select_after_lock_scores_immediately() {
        let mut round = Round::new(RoundId(1), 2);
        round.set_letter('B').unwrap();
        round.set_answer(0, "Beatriz").unwrap();
        round.set_answer(1, "Búho").unwrap();
        assert_eq!(round.lock(), Ok(0));

        round.select_status(0, AnswerStatus::Unique).unwrap();
        round.select_status(1, AnswerStatus::Correct).unwrap();
        assert_eq!(round.points(), 30);
        assert_eq!(round.has_selected_status(), &[true, true]);
        assert_eq!(round.rated_count(), 2);
    }

    #[test]
    fn test_lock_twice_is_idempotent() {
        let mut round = lettered(2, 'b');
        round.set_answer(0, "Burro").unwrap();
        round.select_status(0, AnswerStatus::Correct).unwrap();
        let first = round.lock().unwrap();
        let second = round.lock().unwrap();
        assert_eq!(first, 10);
        assert_eq!(first, second);
    }

    #[test]
    fn test_lock_requires_letter() {
        let mut round = Round::new(RoundId(1), 1);
        assert!(matches!(round.lock(), Err(GameError::InvalidState(_))));
        assert!(!round.is_locked());
    }

    #[test]
    fn test_unlock_resets_points_and_keeps_ratings() {
        let mut round = lettered(1, 'b');
        round.set_answer(0, "Burro").unwrap();
        round.lock().unwrap();
        round.select_status(0, AnswerStatus::Unique).unwrap();
        assert_eq!(round.points(), 20);

        round.unlock().unwrap();
        assert_eq!(round.state(), RoundState::Open);
        assert_eq!(round.points(), 0);
        assert_eq!(round.status_at(0), Some(AnswerStatus::Unique));

        assert_eq!(round.lock(), Ok(20));
    }

    #[test]
    fn test_unlock_open_round_rejected() {
        let mut round = lettered(1, 'b');
        assert!(matches!(round.unlock(), Err(GameError::InvalidState(_))));
    }
}
