use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use basta::config::Config;
use basta::engine::scoring::AnswerStatus;
use basta::engine::stats::GameStats;
use basta::error::GameResult;
use basta::session::game::{Game, Intent, NextStep};
use basta::session::hold::{Clock, HoldStatus, SystemClock};

use crate::ui::theme::Theme;

/// Without release events a held key shows up as a press, a pause for the
/// terminal's autorepeat delay (660 ms on a stock X11 setup), then a stream of
/// repeats. Until the first repeat the key counts as held for this long.
pub const FIRST_REPEAT_GRACE: Duration = Duration::from_millis(1000);

/// Once repeats are flowing, a gap longer than this means the key was released.
pub const REPEAT_GRACE: Duration = Duration::from_millis(250);

/// Repeats seen before a hold may complete when release events are missing.
/// A lone tap produces none, so it can never lock a round.
const CONFIRMING_REPEATS: u32 = 2;

#[derive(Clone, Copy, Debug)]
struct HeldKey {
    last_seen: Instant,
    repeats: u32,
}

impl HeldKey {
    fn grace(&self) -> Duration {
        if self.repeats == 0 {
            FIRST_REPEAT_GRACE
        } else {
            REPEAT_GRACE
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Round,
    Setup,
    Stats,
}

pub struct App<C: Clock = SystemClock> {
    pub screen: AppScreen,
    pub game: Game<C>,
    pub config: Config,
    pub config_path: PathBuf,
    pub theme: Theme,
    /// Row on the round screen: 0 is the letter, `i + 1` is category `i`.
    pub selected: usize,
    pub setup_selected: usize,
    pub setup_input: String,
    pub message: Option<String>,
    pub final_stats: Option<GameStats>,
    pub keyboard_enhanced: bool,
    pub should_quit: bool,
    held: Option<HeldKey>,
    /// Set once a hold completes so a key still held down does not start another.
    hold_spent: bool,
}

impl App<SystemClock> {
    pub fn new(config: Config, theme: Theme) -> anyhow::Result<Self> {
        Self::with_clock(config, theme, SystemClock)
    }
}

impl<C: Clock> App<C> {
    /// Opens on the setup screen. The first round is created when setup closes,
    /// so categories are settled before any answers are typed.
    pub fn with_clock(config: Config, theme: Theme, clock: C) -> anyhow::Result<Self> {
        let game = Game::with_clock(&config, clock)?;
        Ok(Self {
            screen: AppScreen::Setup,
            game,
            config,
            config_path: Config::config_path(),
            theme,
            selected: 0,
            setup_selected: 0,
            setup_input: String::new(),
            message: None,
            final_stats: None,
            keyboard_enhanced: false,
            should_quit: false,
            held: None,
            hold_spent: false,
        })
    }

    /// Applies an intent, turning a rejection into a status-line message.
    pub fn apply(&mut self, intent: Intent) -> bool {
        let result: GameResult<()> = self.game.dispatch(intent);
        match result {
            Ok(()) => {
                self.message = None;
                true
            }
            Err(err) => {
                debug!(%err, "intent rejected");
                self.message = Some(err.to_string());
                false
            }
        }
    }

    pub fn row_count(&self) -> usize {
        1 + self.game.current_round().map_or(0, |r| r.category_count())
    }

    pub fn selected_category(&self) -> Option<usize> {
        self.selected.checked_sub(1)
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        self.selected = (self.selected + 1).min(self.row_count() - 1);
    }

    pub fn type_char(&mut self, ch: char) {
        match self.selected_category() {
            None => {
                self.apply(Intent::SetLetter(ch));
            }
            Some(category) => {
                let mut text = self.current_answer(category);
                text.push(ch);
                self.apply(Intent::SetAnswer { category, text });
            }
        }
    }

    pub fn backspace(&mut self) {
        match self.selected_category() {
            None => {
                self.apply(Intent::ClearLetter);
            }
            Some(category) => {
                let mut text = self.current_answer(category);
                if text.pop().is_some() {
                    self.apply(Intent::SetAnswer { category, text });
                }
            }
        }
    }

    pub fn select_status(&mut self, status: AnswerStatus) {
        if let Some(category) = self.selected_category() {
            self.apply(Intent::SelectStatus(category, status));
        }
    }

    pub fn cycle_status(&mut self) {
        if let Some(category) = self.selected_category() {
            self.apply(Intent::CycleStatus(category));
        }
    }

    pub fn previous_round(&mut self) {
        self.release_hold();
        self.apply(Intent::PreviousRound);
        self.clamp_selection();
    }

    pub fn next_round(&mut self) {
        self.release_hold();
        self.apply(Intent::NextRound);
        self.clamp_selection();
    }

    /// Starts another round, or ends the game once the target is reached.
    pub fn advance(&mut self) {
        self.release_hold();
        match self.game.next_step() {
            NextStep::NewRound => {
                if self.apply(Intent::NewRound) {
                    self.selected = 0;
                }
            }
            NextStep::Finish => {
                if self.apply(Intent::Finish) {
                    self.final_stats = Some(self.game.stats());
                    self.screen = AppScreen::Stats;
                }
            }
        }
    }

    /// Clears the ledger and goes back to setup for the next game.
    pub fn restart(&mut self) {
        self.release_hold();
        self.apply(Intent::Restart);
        self.final_stats = None;
        self.selected = 0;
        self.open_setup();
    }

    /// Stop key went down, or repeated.
    pub fn press_hold(&mut self) {
        let now = self.game.now();
        if !self.keyboard_enhanced {
            self.held = Some(match self.held {
                Some(key) => HeldKey {
                    last_seen: now,
                    repeats: key.repeats + 1,
                },
                None => HeldKey {
                    last_seen: now,
                    repeats: 0,
                },
            });
        }
        if !self.hold_spent && self.game.state().hold == HoldStatus::Idle {
            self.apply(Intent::BeginHold);
        }
    }

    pub fn release_hold(&mut self) {
        self.held = None;
        self.hold_spent = false;
        let _ = self.game.dispatch(Intent::CancelHold);
    }

    pub fn on_tick(&mut self) {
        let now = self.game.now();
        if !self.keyboard_enhanced {
            if let Some(key) = self.held {
                if now.saturating_duration_since(key.last_seen) > key.grace() {
                    debug!(repeats = key.repeats, "stop key went quiet");
                    self.release_hold();
                }
            }
        }
        if !self.hold_confirmed() && self.game.hold_due_at(now) {
            return;
        }
        if self.game.tick_at(now).is_some() {
            self.hold_spent = true;
        }
    }

    /// Release events prove the key is still down. Without them only a run of
    /// repeats does.
    fn hold_confirmed(&self) -> bool {
        self.keyboard_enhanced
            || self
                .held
                .is_some_and(|key| key.repeats >= CONFIRMING_REPEATS)
    }

    /// Category edits would misalign answers already typed, so setup only
    /// opens while the ledger is empty.
    pub fn open_setup(&mut self) {
        if !self.game.state().ledger.is_empty() {
            self.message = Some("Setup is available before the first round or after a restart".into());
            return;
        }
        self.release_hold();
        self.setup_selected = 0;
        self.setup_input.clear();
        self.screen = AppScreen::Setup;
    }

    fn setup_editable(&mut self) -> bool {
        if self.screen == AppScreen::Setup && self.game.state().ledger.is_empty() {
            return true;
        }
        self.message = Some("Categories are fixed once a round exists".into());
        false
    }

    pub fn setup_add(&mut self) {
        if !self.setup_editable() {
            return;
        }
        let label = std::mem::take(&mut self.setup_input);
        if self.apply(Intent::AddCategory(label)) {
            self.setup_selected = self.game.state().categories.len() - 1;
        }
    }

    pub fn setup_remove(&mut self) {
        if !self.setup_editable() {
            return;
        }
        if self.apply(Intent::RemoveCategory(self.setup_selected)) {
            let len = self.game.state().categories.len();
            self.setup_selected = self.setup_selected.min(len - 1);
        }
    }

    pub fn setup_move(&mut self, down: bool) {
        let len = self.game.state().categories.len();
        self.setup_selected = if down {
            (self.setup_selected + 1).min(len - 1)
        } else {
            self.setup_selected.saturating_sub(1)
        };
    }

    pub fn adjust_target(&mut self, delta: i32) {
        let target = self.game.state().target_rounds.saturating_add_signed(delta);
        self.apply(Intent::SetTargetRounds(target));
    }

    /// Leaves setup, writes the edited categories and target back to the
    /// config file, and starts the first round if there is none yet.
    pub fn close_setup(&mut self) {
        let state = self.game.state();
        self.config.categories = state.categories.labels().to_vec();
        self.config.target_rounds = state.target_rounds;
        let saved = self.config.save_to(&self.config_path);
        if self.game.state().ledger.is_empty() {
            self.apply(Intent::NewRound);
            self.selected = 0;
        }
        if let Err(err) = saved {
            warn!(%err, "could not save config");
            self.message = Some(format!("Config not saved: {err}"));
        }
        self.clamp_selection();
        self.screen = AppScreen::Round;
    }

    fn current_answer(&self, category: usize) -> String {
        self.game
            .current_round()
            .and_then(|r| r.answer(category))
            .unwrap_or_default()
            .to_string()
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.row_count() - 1);
    }
}
