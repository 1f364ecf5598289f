#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Settle-delay system that defers win and loss transitions.
//!
//! The world locks input and records a pending transition whenever a level
//! is won or a life is lost. This system watches for those events, arms a
//! single cancellable one-shot timer, and emits [`Command::Settle`] once the
//! host has advanced simulated time past the configured delay.

use std::time::Duration;

use ls20_core::{Command, Event};
use serde::Deserialize;
use tracing::debug;

/// Delays applied between a resolution event and the transition it defers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SettleDelays {
    /// Milliseconds between a win and the next level starting.
    pub level_won_ms: u64,
    /// Milliseconds between a life loss and input resuming.
    pub life_lost_ms: u64,
    /// Milliseconds between a game over and the session restarting.
    pub game_over_ms: u64,
}

impl SettleDelays {
    /// Creates delays from explicit millisecond values.
    #[must_use]
    pub const fn new(level_won_ms: u64, life_lost_ms: u64, game_over_ms: u64) -> Self {
        Self {
            level_won_ms,
            life_lost_ms,
            game_over_ms,
        }
    }

    /// Delay configured for the provided reason.
    #[must_use]
    pub const fn delay_for(&self, reason: SettleReason) -> Duration {
        let millis = match reason {
            SettleReason::LevelWon => self.level_won_ms,
            SettleReason::LifeLost => self.life_lost_ms,
            SettleReason::GameOver => self.game_over_ms,
        };
        Duration::from_millis(millis)
    }
}

impl Default for SettleDelays {
    fn default() -> Self {
        Self::new(800, 500, 1000)
    }
}

/// Resolution that armed the settle timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SettleReason {
    /// A goal was reached.
    LevelWon,
    /// A life was lost with lives to spare.
    LifeLost,
    /// The last life was lost.
    GameOver,
}

impl SettleReason {
    fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::LevelWon { .. } => Some(Self::LevelWon),
            Event::LifeLost { .. } => Some(Self::LifeLost),
            Event::GameOver => Some(Self::GameOver),
            _ => None,
        }
    }
}

/// Armed timer as observed by hosts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingSettle {
    /// Resolution that armed the timer.
    pub reason: SettleReason,
    /// Simulated time left before the settle command is emitted.
    pub remaining: Duration,
}

/// Pure system that turns resolution events into delayed settle commands.
#[derive(Debug, Default)]
pub struct Settle {
    delays: SettleDelays,
    armed: Option<PendingSettle>,
}

impl Settle {
    /// Creates a settle system using the supplied delays.
    #[must_use]
    pub fn new(delays: SettleDelays) -> Self {
        Self {
            delays,
            armed: None,
        }
    }

    /// Consumes the world's events for a frame and the time that frame lasted.
    ///
    /// Resolution events arm the timer, events that make a transition moot
    /// cancel it, and `dt` only counts against a timer armed on an earlier
    /// frame. At most one [`Command::Settle`] is emitted per call.
    pub fn handle(&mut self, events: &[Event], dt: Duration, out: &mut Vec<Command>) {
        let mut armed_this_frame = false;
        for event in events {
            if let Some(reason) = SettleReason::from_event(event) {
                let remaining = self.delays.delay_for(reason);
                debug!(?reason, ?remaining, "settle timer armed");
                self.armed = Some(PendingSettle { reason, remaining });
                armed_this_frame = true;
            } else if cancels_pending(event) {
                self.armed = None;
                armed_this_frame = false;
            }
        }

        if armed_this_frame {
            return;
        }

        let Some(pending) = self.armed.as_mut() else {
            return;
        };
        pending.remaining = pending.remaining.saturating_sub(dt);
        if pending.remaining.is_zero() {
            debug!(reason = ?pending.reason, "settle timer expired");
            self.armed = None;
            out.push(Command::Settle);
        }
    }

    /// Disarms the timer without emitting a command.
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    /// Timer currently armed, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<PendingSettle> {
        self.armed
    }

    /// Delays used when arming timers.
    #[must_use]
    pub const fn delays(&self) -> SettleDelays {
        self.delays
    }
}

fn cancels_pending(event: &Event) -> bool {
    matches!(
        event,
        Event::LevelStarted { .. }
            | Event::SessionRestarted
            | Event::PlayResumed
            | Event::SessionComplete { .. }
            | Event::Abandoned
    )
}
