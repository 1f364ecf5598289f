//! Host loop pairing the world with the settle system.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use ls20_core::{Command, Event};
use ls20_system_settle::Settle;
use ls20_world::{self as world, World};

use crate::{config::GameConfig, script::Input};

/// Frames simulated beyond the longest settle delay before draining gives up.
const DRAIN_SLACK_FRAMES: u32 = 2;

/// Single-threaded session advancing one input per fixed-length frame.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    settle: Settle,
    frame: Duration,
}

impl Session {
    /// Builds a session that starts on the first level of `config`.
    pub(crate) fn new(config: GameConfig, frame: Duration) -> Result<Self> {
        if frame.is_zero() {
            bail!("frame duration must be positive");
        }
        let world = World::new(config.levels, config.rules)
            .context("game config cannot be played")?;
        Ok(Self {
            world,
            settle: Settle::new(config.settle),
            frame,
        })
    }

    /// Jumps to `index`, failing when the level set has no such level.
    pub(crate) fn start(&mut self, index: usize) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::StartLevel { index }, &mut events);
        if let Some(Event::LevelStartRejected { index, reason }) = events
            .iter()
            .find(|event| matches!(event, Event::LevelStartRejected { .. }))
        {
            bail!("cannot start level {index}: {reason:?}");
        }
        self.settle.handle(&events, Duration::ZERO, &mut Vec::new());
        Ok(events)
    }

    /// Applies `input`, advances the settle system by one frame and returns
    /// every event produced along the way.
    pub(crate) fn frame(&mut self, input: Input) -> Vec<Event> {
        let mut events = Vec::new();
        match input {
            Input::Press(direction) => world::apply(
                &mut self.world,
                Command::AttemptMove { direction },
                &mut events,
            ),
            Input::Escape => world::apply(&mut self.world, Command::Abandon, &mut events),
            Input::Idle => {}
        }

        let mut commands = Vec::new();
        self.settle.handle(&events, self.frame, &mut commands);
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        events
    }

    /// Reports whether a deferred transition is still counting down.
    pub(crate) fn is_settling(&self) -> bool {
        self.settle.pending().is_some()
    }

    /// Upper bound on idle frames needed for any armed timer to expire.
    pub(crate) fn drain_limit(&self) -> u32 {
        let delays = self.settle.delays();
        let longest = delays
            .level_won_ms
            .max(delays.life_lost_ms)
            .max(delays.game_over_ms);
        let frame_ms = self.frame.as_millis().max(1);
        let frames = u128::from(longest).div_ceil(frame_ms);
        u32::try_from(frames)
            .unwrap_or(u32::MAX)
            .saturating_add(DRAIN_SLACK_FRAMES)
    }

    /// Read-only access for queries.
    pub(crate) fn world(&self) -> &World {
        &self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ls20_core::{CellCoord, CellRectSize, Direction, GameStatus, Level, Rules};
    use ls20_system_settle::SettleDelays;
    use ls20_world::{query, LevelSet};

    fn config() -> GameConfig {
        let first = Level::new("first", CellRectSize::new(3, 1), CellCoord::new(0, 0))
            .with_goals(vec![CellCoord::new(2, 0)]);
        let second = Level::new("second", CellRectSize::new(3, 1), CellCoord::new(0, 0))
            .with_goals(vec![CellCoord::new(2, 0)]);
        GameConfig {
            levels: LevelSet::new(vec![first, second]).expect("levels are valid"),
            rules: Rules::new(2, 5),
            settle: SettleDelays::new(250, 100, 300),
        }
    }

    fn session() -> Session {
        Session::new(config(), Duration::from_millis(100)).expect("session")
    }

    #[test]
    fn zero_frame_duration_is_rejected() {
        assert!(Session::new(config(), Duration::ZERO).is_err());
    }

    #[test]
    fn start_rejects_unknown_level() {
        let mut session = session();
        let error = session.start(7).expect_err("only two levels");
        assert!(error.to_string().contains("cannot start level 7"));
    }

    #[test]
    fn start_jumps_to_requested_level() {
        let mut session = session();
        let events = session.start(1).expect("level exists");
        assert!(matches!(events.as_slice(), [Event::LevelStarted { index: 1, .. }]));
        assert_eq!(query::snapshot(session.world()).level_index, 1);
    }

    #[test]
    fn win_settles_within_drain_limit() {
        let mut session = session();
        let _ = session.frame(Input::Press(Direction::East));
        let events = session.frame(Input::Press(Direction::East));
        assert!(events.iter().any(|event| matches!(event, Event::LevelWon { .. })));
        assert!(session.is_settling());

        let limit = session.drain_limit();
        assert_eq!(limit, 5);
        let mut frames = 0;
        let mut advanced = false;
        while session.is_settling() && frames < limit {
            advanced |= session
                .frame(Input::Idle)
                .iter()
                .any(|event| matches!(event, Event::LevelStarted { index: 1, .. }));
            frames += 1;
        }
        assert!(advanced);
        assert_eq!(frames, 3);
        assert_eq!(query::snapshot(session.world()).status, GameStatus::InProgress);
    }

    #[test]
    fn escape_abandons_and_disarms() {
        let mut session = session();
        let _ = session.frame(Input::Press(Direction::East));
        let _ = session.frame(Input::Press(Direction::East));
        let events = session.frame(Input::Escape);
        assert_eq!(events, vec![Event::Abandoned]);
        assert!(!session.is_settling());
    }
}
