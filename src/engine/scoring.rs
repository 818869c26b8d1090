use serde::{Deserialize, Serialize};

/// Rating given to a single answer cell.
///
/// Cycling order is `Incorrect -> Repeated -> Correct -> Unique -> Incorrect`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    #[default]
    Incorrect,
    Repeated,
    Correct,
    Unique,
}

impl AnswerStatus {
    pub const ALL: [AnswerStatus; 4] = [
        AnswerStatus::Incorrect,
        AnswerStatus::Repeated,
        AnswerStatus::Correct,
        AnswerStatus::Unique,
    ];

    pub fn points(self) -> u32 {
        match self {
            AnswerStatus::Incorrect => 0,
            AnswerStatus::Repeated => 5,
            AnswerStatus::Correct => 10,
            AnswerStatus::Unique => 20,
        }
    }

    pub fn next(self) -> Self {
        match self {
            AnswerStatus::Incorrect => AnswerStatus::Repeated,
            AnswerStatus::Repeated => AnswerStatus::Correct,
            AnswerStatus::Correct => AnswerStatus::Unique,
            AnswerStatus::Unique => AnswerStatus::Incorrect,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnswerStatus::Incorrect => "incorrect",
            AnswerStatus::Repeated => "repeated",
            AnswerStatus::Correct => "correct",
            AnswerStatus::Unique => "unique",
        }
    }

    /// Correct and unique answers both count as hits for effectiveness.
    pub fn is_hit(self) -> bool {
        matches!(self, AnswerStatus::Correct | AnswerStatus::Unique)
    }
}

/// Sum of the point values of every cell. Reads ratings only, never answer text.
pub fn round_points(status: &[AnswerStatus]) -> u32 {
    status.iter().map(|s| s.points()).sum()
}

/// Blank or single-character answers are placeholders rather than real words.
pub fn is_placeholder(answer: &str) -> bool {
    answer.trim().is_empty() || answer.chars().count() == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_table() {
        let points: Vec<u32> = AnswerStatus::ALL.iter().map(|s| s.points()).collect();
        assert_eq!(points, vec![0, 5, 10, 20]);
    }

    #[test]
    fn test_cycle_visits_every_status_and_wraps() {
        let mut status = AnswerStatus::Incorrect;
        let mut seen = Vec::new();
        for _ in 0..4 {
            status = status.next();
            seen.push(status);
        }
        assert_eq!(
            seen,
            vec![
                AnswerStatus::Repeated,
                AnswerStatus::Correct,
                AnswerStatus::Unique,
                AnswerStatus::Incorrect,
            ]
        );
    }

    #[test]
    fn test_round_points_is_stable() {
        let status = [AnswerStatus::Unique, AnswerStatus::Correct, AnswerStatus::Repeated];
        assert_eq!(round_points(&status), 35);
        assert_eq!(round_points(&status), round_points(&status));
        assert_eq!(round_points(&[]), 0);
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(is_placeholder(""));
        assert!(is_placeholder("   "));
        assert!(is_placeholder("b"));
        assert!(is_placeholder("ñ"));
        assert!(!is_placeholder("bo"));
        assert!(!is_placeholder("Búho"));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&AnswerStatus::Unique).unwrap();
        assert_eq!(json, "\"unique\"");
    }
}
