pub mod game;
pub mod hold;
pub mod ledger;
pub mod round;

pub use game::{Game, GameState, Intent, NextStep};
pub use round::{Round, RoundId};
