use thiserror::Error;

/// Rejections raised by the round engine.
///
/// Every operation that returns one of these has left the game state exactly
/// as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("category index {index} is out of range (0..{len})")]
    OutOfRange { index: usize, len: usize },

    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("at least one category is required")]
    Underflow,

    #[error("'{0}' is not a letter")]
    InvalidLetter(char),

    #[error("category '{0}' is blank or already present")]
    InvalidCategory(String),
}

pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_value() {
        let err = GameError::OutOfRange { index: 9, len: 8 };
        assert_eq!(err.to_string(), "category index 9 is out of range (0..8)");
        assert_eq!(GameError::InvalidLetter('7').to_string(), "'7' is not a letter");
        assert!(GameError::InvalidState("round is locked").to_string().contains("locked"));
    }
}
