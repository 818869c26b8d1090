//! Hold-to-confirm gesture guarding the lock action.
//!
//! The gate is driven by explicit timestamps: `begin` records when the press
//! started and every `tick` compares the current time against the configured
//! duration. Nothing here reads the wall clock, so callers inject time through
//! a [`Clock`].

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::session::round::RoundId;

pub const HOLD_DURATION: Duration = Duration::from_millis(600);
pub const HOLD_TICK: Duration = Duration::from_millis(20);

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Observable gate state for rendering. Progress is a percentage in `0..=100`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum HoldStatus {
    #[default]
    Idle,
    Holding { round: RoundId, progress: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HoldTick {
    Idle,
    Holding(f64),
    /// The hold completed; the guarded round should be locked now.
    Fired(RoundId),
}

#[derive(Clone, Copy, Debug)]
struct PendingHold {
    round: RoundId,
    started_at: Instant,
}

#[derive(Clone, Debug)]
pub struct HoldGate {
    duration: Duration,
    tick: Duration,
    step: f64,
    pending: Option<PendingHold>,
}

impl HoldGate {
    pub fn new(duration: Duration, tick: Duration) -> Self {
        let tick = tick.max(Duration::from_millis(1));
        let duration = duration.max(tick);
        let ticks = (duration.as_millis() / tick.as_millis()).max(1);
        Self {
            duration,
            tick,
            step: 100.0 / ticks as f64,
            pending: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick
    }

    /// Percentage added per elapsed tick interval.
    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn is_holding(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts a hold for `round`. A call while a hold is already pending is
    /// ignored and returns `false`; the original start time is kept.
    pub fn begin(&mut self, round: RoundId, now: Instant) -> bool {
        if self.pending.is_some() {
            return false;
        }
        debug!(%round, "hold started");
        self.pending = Some(PendingHold {
            round,
            started_at: now,
        });
        true
    }

    /// Drops the pending hold. After this returns nothing from that attempt can fire.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(hold) => {
                debug!(round = %hold.round, "hold cancelled");
                true
            }
            None => false,
        }
    }

    pub fn progress(&self, now: Instant) -> f64 {
        match self.pending {
            Some(hold) => self.progress_since(hold.started_at, now),
            None => 0.0,
        }
    }

    pub fn status(&self, now: Instant) -> HoldStatus {
        match self.pending {
            Some(hold) => HoldStatus::Holding {
                round: hold.round,
                progress: self.progress_since(hold.started_at, now),
            },
            None => HoldStatus::Idle,
        }
    }

    /// Whether a pending hold has run its full duration at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        self.pending
            .is_some_and(|hold| now.saturating_duration_since(hold.started_at) >= self.duration)
    }

    /// Advances the gate to `now`. Fires at most once per `begin`, then
    /// returns to idle.
    pub fn tick(&mut self, now: Instant) -> HoldTick {
        let Some(hold) = self.pending else {
            return HoldTick::Idle;
        };
        if self.is_due(now) {
            self.pending = None;
            debug!(round = %hold.round, "hold completed");
            return HoldTick::Fired(hold.round);
        }
        HoldTick::Holding(self.progress_since(hold.started_at, now))
    }

    fn progress_since(&self, started_at: Instant, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(started_at);
        let ticks = elapsed.as_millis() / self.tick.as_millis();
        (ticks as f64 * self.step).min(100.0)
    }
}

impl Default for HoldGate {
    fn default() -> Self {
        Self::new(HOLD_DURATION, HOLD_TICK)
    }
}
