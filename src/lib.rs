// Game rules and state live in the library so the terminal front end in
// main.rs, the integration tests and the benchmarks all drive the same code.

pub mod config;
pub mod engine;
pub mod error;
pub mod session;

pub use error::{GameError, GameResult};
