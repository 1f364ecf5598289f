//! Audible feedback cues attached to world events.

use ls20_core::{Event, MoveRejection};
use serde::Serialize;

/// Tone a host plays in response to an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct Cue {
    /// Tone frequency in hertz.
    pub(crate) frequency_hz: u32,
    /// Tone length in milliseconds.
    pub(crate) duration_ms: u32,
}

impl Cue {
    const fn new(frequency_hz: u32, duration_ms: u32) -> Self {
        Self {
            frequency_hz,
            duration_ms,
        }
    }
}

const MOVE_ACCEPTED: Cue = Cue::new(300, 50);
const MOVE_BLOCKED: Cue = Cue::new(150, 100);
const LIFE_LOST: Cue = Cue::new(200, 300);
const GAME_OVER: Cue = Cue::new(200, 500);
const LEVEL_WON: Cue = Cue::new(600, 300);
const MENU: Cue = Cue::new(440, 100);

/// Cue for `event`, or `None` when the event stays silent.
pub(crate) fn cue_for(event: &Event) -> Option<Cue> {
    match event {
        Event::MoveAccepted { .. } => Some(MOVE_ACCEPTED),
        Event::MoveRejected {
            reason: MoveRejection::Blocked,
            ..
        } => Some(MOVE_BLOCKED),
        Event::LifeLost { .. } => Some(LIFE_LOST),
        Event::GameOver => Some(GAME_OVER),
        Event::LevelWon { .. } => Some(LEVEL_WON),
        Event::Abandoned => Some(MENU),
        _ => None,
    }
}
