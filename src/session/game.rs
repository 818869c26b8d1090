//! Game controller.
//!
//! [`Game`] owns the whole [`GameState`] aggregate and is the only thing that
//! mutates it. A front end renders `Game::state()` and feeds user input back
//! through [`Game::dispatch`], calling [`Game::tick`] on its timer so a pending
//! hold can complete.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{Config, MAX_TARGET_ROUNDS, MIN_TARGET_ROUNDS};
use crate::engine::categories::CategorySet;
use crate::engine::letters::LetterGenerator;
use crate::engine::scoring::AnswerStatus;
use crate::engine::stats::GameStats;
use crate::error::{GameError, GameResult};
use crate::session::hold::{Clock, HoldGate, HoldStatus, HoldTick, SystemClock};
use crate::session::ledger::RoundLedger;
use crate::session::round::{Round, RoundId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub categories: CategorySet,
    pub ledger: RoundLedger,
    pub target_rounds: u32,
    /// Whether the end-of-game statistics screen is offered at all.
    pub finish_enabled: bool,
    pub finished: bool,
    pub hold: HoldStatus,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    RandomLetter,
    SetLetter(char),
    ClearLetter,
    SetAnswer { category: usize, text: String },
    CycleStatus(usize),
    SelectStatus(usize, AnswerStatus),
    NewRound,
    PreviousRound,
    NextRound,
    GoToRound(usize),
    BeginHold,
    CancelHold,
    Unlock,
    AddCategory(String),
    RemoveCategory(usize),
    SetTargetRounds(u32),
    Finish,
    Restart,
}

/// What the front end should offer after the current round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextStep {
    NewRound,
    Finish,
}

pub struct Game<C: Clock = SystemClock> {
    state: GameState,
    letters: LetterGenerator,
    gate: HoldGate,
    clock: C,
}

impl Game<SystemClock> {
    pub fn from_config(config: &Config) -> GameResult<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Game<C> {
    pub fn with_clock(config: &Config, clock: C) -> GameResult<Self> {
        let categories = CategorySet::new(&config.categories)?;
        let letters = match config.seed {
            Some(seed) => LetterGenerator::seeded(seed),
            None => LetterGenerator::from_entropy(),
        };
        Ok(Self {
            state: GameState {
                categories,
                ledger: RoundLedger::new(),
                target_rounds: config.target_rounds.clamp(MIN_TARGET_ROUNDS, MAX_TARGET_ROUNDS),
                finish_enabled: config.finish_screen,
                finished: false,
                hold: HoldStatus::Idle,
            },
            letters,
            gate: HoldGate::new(config.hold_duration(), config.hold_tick()),
            clock,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.state.ledger.current()
    }

    pub fn total_points(&self) -> u32 {
        self.state.ledger.total_points()
    }

    pub fn stats(&self) -> GameStats {
        GameStats::compute(&self.state.ledger, &self.state.categories)
    }

    pub fn next_step(&self) -> NextStep {
        let locked = self.state.ledger.locked_count();
        if self.state.finish_enabled && locked >= self.state.target_rounds as usize {
            NextStep::Finish
        } else {
            NextStep::NewRound
        }
    }

    pub fn dispatch(&mut self, intent: Intent) -> GameResult<()> {
        debug!(?intent, "dispatch");
        match intent {
            Intent::RandomLetter => {
                let letter = self.letters.next_letter();
                self.round_mut()?.set_letter(letter)
            }
            Intent::SetLetter(ch) => self.round_mut()?.set_letter(ch),
            Intent::ClearLetter => self.round_mut()?.clear_letter(),
            Intent::SetAnswer { category, text } => self.round_mut()?.set_answer(category, text),
            Intent::CycleStatus(category) => self.round_mut()?.cycle_status(category).map(|_| ()),
            Intent::SelectStatus(category, status) => {
                self.round_mut()?.select_status(category, status)
            }
            Intent::Unlock => self.round_mut()?.unlock(),
            Intent::NewRound => self.new_round(),
            Intent::PreviousRound => {
                if self.state.ledger.previous_round() {
                    self.cancel_hold();
                }
                Ok(())
            }
            Intent::NextRound => {
                if self.state.ledger.next_round() {
                    self.cancel_hold();
                }
                Ok(())
            }
            Intent::GoToRound(index) => {
                if self.state.ledger.go_to(index) {
                    self.cancel_hold();
                }
                Ok(())
            }
            Intent::BeginHold => self.begin_hold(),
            Intent::CancelHold => {
                self.cancel_hold();
                Ok(())
            }
            Intent::AddCategory(label) => self.state.categories.add(&label).map(|_| ()),
            Intent::RemoveCategory(index) => self.state.categories.remove(index).map(|_| ()),
            Intent::SetTargetRounds(target) => {
                self.state.target_rounds = target.clamp(MIN_TARGET_ROUNDS, MAX_TARGET_ROUNDS);
                Ok(())
            }
            Intent::Finish => self.finish(),
            Intent::Restart => {
                self.cancel_hold();
                self.state.ledger.reset();
                self.state.finished = false;
                info!("game restarted");
                Ok(())
            }
        }
    }

    /// Current time on the game's clock.
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Whether a pending hold would complete on a tick at `now`.
    pub fn hold_due_at(&self, now: Instant) -> bool {
        self.gate.is_due(now)
    }

    /// Advances the hold gate. Returns the id of the round locked by a
    /// completed hold, if any.
    pub fn tick(&mut self) -> Option<RoundId> {
        self.tick_at(self.clock.now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Option<RoundId> {
        match self.gate.tick(now) {
            HoldTick::Idle => {
                self.state.hold = HoldStatus::Idle;
                None
            }
            HoldTick::Holding(_) => {
                self.state.hold = self.gate.status(now);
                None
            }
            HoldTick::Fired(id) => {
                self.state.hold = HoldStatus::Idle;
                let round = self.state.ledger.find_mut(id)?;
                match round.lock() {
                    Ok(points) => {
                        info!(round = %id, points, "hold confirmed");
                        Some(id)
                    }
                    Err(err) => {
                        warn!(round = %id, %err, "hold completed but lock was refused");
                        None
                    }
                }
            }
        }
    }

    fn round_mut(&mut self) -> GameResult<&mut Round> {
        if self.state.finished {
            return Err(GameError::InvalidState("game is finished"));
        }
        self.state
            .ledger
            .current_mut()
            .ok_or(GameError::InvalidState("no round in progress"))
    }

    fn new_round(&mut self) -> GameResult<()> {
        if self.state.finished {
            return Err(GameError::InvalidState("game is finished"));
        }
        self.cancel_hold();
        self.state.ledger.create_round(self.state.categories.len());
        Ok(())
    }

    fn begin_hold(&mut self) -> GameResult<()> {
        let round = self.round_mut()?;
        if round.is_locked() {
            return Err(GameError::InvalidState("round is already locked"));
        }
        if round.letter().is_none() {
            return Err(GameError::InvalidState("choose a letter before stopping"));
        }
        let id = round.id();
        let now = self.clock.now();
        self.gate.begin(id, now);
        self.state.hold = self.gate.status(now);
        Ok(())
    }

    fn cancel_hold(&mut self) {
        self.gate.cancel();
        self.state.hold = HoldStatus::Idle;
    }

    fn finish(&mut self) -> GameResult<()> {
        if !self.state.finish_enabled {
            return Err(GameError::InvalidState("end screen is disabled"));
        }
        self.cancel_hold();
        self.state.finished = true;
        info!(
            rounds = self.state.ledger.locked_count(),
            points = self.total_points(),
            "game finished"
        );
        Ok(())
    }
}
