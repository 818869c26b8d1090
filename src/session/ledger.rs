use serde::{Deserialize, Serialize};
use tracing::info;

use crate::session::round::{Round, RoundId};

/// Append-only sequence of rounds plus the cursor of the round on screen.
///
/// The running total is never stored; `total_points` sums the rounds on
/// every call so it cannot drift.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundLedger {
    rounds: Vec<Round>,
    cursor: usize,
    next_id: u64,
}

impl RoundLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an unlettered round and moves the cursor onto it.
    pub fn create_round(&mut self, category_count: usize) -> &mut Round {
        let id = RoundId(self.next_id);
        self.next_id += 1;
        let index = self.rounds.len();
        self.rounds.push(Round::new(id, category_count));
        self.cursor = index;
        info!(round = %id, position = index + 1, category_count, "round created");
        &mut self.rounds[index]
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn get(&self, index: usize) -> Option<&Round> {
        self.rounds.get(index)
    }

    pub fn current(&self) -> Option<&Round> {
        self.rounds.get(self.cursor)
    }

    pub fn current_mut(&mut self) -> Option<&mut Round> {
        self.rounds.get_mut(self.cursor)
    }

    pub fn find_mut(&mut self, id: RoundId) -> Option<&mut Round> {
        self.rounds.iter_mut().find(|r| r.id() == id)
    }

    /// Moves the cursor to `index`. An index past the last round leaves the
    /// cursor where it is. Returns whether it moved.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.rounds.len() {
            return false;
        }
        let moved = index != self.cursor;
        self.cursor = index;
        moved
    }

    pub fn previous_round(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.go_to(self.cursor - 1)
    }

    pub fn next_round(&mut self) -> bool {
        self.go_to(self.cursor + 1)
    }

    pub fn total_points(&self) -> u32 {
        self.rounds.iter().map(Round::points).sum()
    }

    pub fn locked_count(&self) -> usize {
        self.rounds.iter().filter(|r| r.is_locked()).count()
    }

    /// Locked rounds paired with their ledger position (0-based).
    pub fn locked_rounds(&self) -> impl Iterator<Item = (usize, &Round)> {
        self.rounds.iter().enumerate().filter(|(_, r)| r.is_locked())
    }

    /// Discards every round. Ids keep counting so they stay unique for the session.
    pub fn reset(&mut self) {
        self.rounds.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scoring::AnswerStatus;

    fn locked_round(ledger: &mut RoundLedger, status: AnswerStatus) {
        let round = ledger.create_round(1);
        round.set_letter('a').unwrap();
        round.set_answer(0, "Arbol").unwrap();
        round.select_status(0, status).unwrap();
        round.lock().unwrap();
    }

    #[test]
    fn test_empty_ledger() {
        let mut ledger = RoundLedger::new();
        assert!(ledger.current().is_none());
        assert_eq!(ledger.total_points(), 0);
        assert!(!ledger.next_round());
        assert!(!ledger.previous_round());
        assert!(!ledger.go_to(3));
        assert_eq!(ledger.cursor(), 0);
    }

    #[test]
    fn test_create_moves_cursor_to_new_round() {
        let mut ledger = RoundLedger::new();
        ledger.create_round(3);
        ledger.create_round(3);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.cursor(), 1);
        assert_eq!(ledger.current().map(|r| r.id()), Some(RoundId(1)));
    }

    #[test]
    fn test_navigation_clamps_at_edges() {
        let mut ledger = RoundLedger::new();
        for _ in 0..3 {
            ledger.create_round(1);
        }
        assert!(!ledger.next_round());
        assert_eq!(ledger.cursor(), 2);
        assert!(ledger.previous_round());
        assert!(ledger.previous_round());
        assert!(!ledger.previous_round());
        assert_eq!(ledger.cursor(), 0);
        assert!(ledger.go_to(2));
        assert_eq!(ledger.cursor(), 2);
    }

    #[test]
    fn test_go_to_past_end_is_a_no_op() {
        let mut ledger = RoundLedger::new();
        for _ in 0..3 {
            ledger.create_round(1);
        }
        ledger.go_to(1);
        assert!(!ledger.go_to(10));
        assert_eq!(ledger.cursor(), 1);
        assert!(!ledger.go_to(3));
        assert_eq!(ledger.cursor(), 1);
    }

    #[test]
    fn test_total_tracks_locked_points() {
        let mut ledger = RoundLedger::new();
        locked_round(&mut ledger, AnswerStatus::Unique);
        locked_round(&mut ledger, AnswerStatus::Repeated);
        ledger.create_round(1);
        assert_eq!(ledger.total_points(), 25);
        assert_eq!(ledger.locked_count(), 2);

        if let Some(round) = ledger.get(0).map(|r| r.id()) {
            ledger.find_mut(round).unwrap().unlock().unwrap();
        }
        assert_eq!(ledger.total_points(), 5);
    }

    #[test]
    fn test_reset_keeps_ids_unique() {
        let mut ledger = RoundLedger::new();
        let first = ledger.create_round(1).id();
        ledger.reset();
        assert!(ledger.is_empty());
        assert_eq!(ledger.cursor(), 0);
        assert_eq!(ledger.total_points(), 0);
        let second = ledger.create_round(1).id();
        assert_ne!(first, second);
    }

    #[test]
    fn test_locked_rounds_report_ledger_position() {
        let mut ledger = RoundLedger::new();
        ledger.create_round(1);
        locked_round(&mut ledger, AnswerStatus::Correct);
        let positions: Vec<usize> = ledger.locked_rounds().map(|(i, _)| i).collect();
        assert_eq!(positions, vec![1]);
    }
}
