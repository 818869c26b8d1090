pub mod categories;
pub mod letters;
pub mod scoring;
pub mod stats;

pub use categories::CategorySet;
pub use scoring::AnswerStatus;
pub use stats::GameStats;
