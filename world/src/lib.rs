#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative puzzle state management for LS20.
//!
//! The [`World`] owns the level set, the player position, the remaining
//! lives and move budget, and the input lock. It changes only through
//! [`apply`], which evaluates one [`Command`] to completion and reports the
//! outcome as [`Event`] values. Settle delays are not measured here: a win or
//! loss records a pending transition and locks input, and the transition runs
//! when the host submits [`Command::Settle`].

mod collision;
mod levels;
mod navigation;

use ls20_core::{
    CellCoord, Command, Direction, Event, GameStatus, Level, MoveRejection, Rules, StartRejection,
    WELCOME_BANNER,
};
use tracing::{debug, info};

pub use levels::{ConfigError, LevelError, LevelSet};

/// Deferred state change executed by [`Command::Settle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Transition {
    AdvanceLevel,
    RestartSession,
    ResumePlay,
}

/// Represents the authoritative LS20 puzzle state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    levels: LevelSet,
    rules: Rules,
    level_index: usize,
    player: CellCoord,
    lives_remaining: u32,
    moves_remaining: u32,
    accepting_input: bool,
    status: GameStatus,
    pending: Option<Transition>,
}

impl World {
    /// Creates a world that is already playing the first level of `levels`.
    pub fn new(levels: LevelSet, rules: Rules) -> Result<Self, ConfigError> {
        if rules.max_lives == 0 {
            return Err(ConfigError::ZeroLives);
        }
        if rules.max_moves == 0 {
            return Err(ConfigError::ZeroMoves);
        }
        Ok(Self::first_level(levels, rules))
    }

    fn first_level(levels: LevelSet, rules: Rules) -> Self {
        let spawn = levels.first().spawn();
        Self {
            banner: WELCOME_BANNER,
            levels,
            rules,
            level_index: 0,
            player: spawn,
            lives_remaining: rules.max_lives,
            moves_remaining: rules.max_moves,
            accepting_input: true,
            status: GameStatus::InProgress,
            pending: None,
        }
    }

    fn current_level(&self) -> Option<&Level> {
        self.levels.get(self.level_index)
    }

    fn start_level(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let Some(spawn) = self.levels.get(index).map(Level::spawn) else {
            out_events.push(Event::LevelStartRejected {
                index,
                reason: StartRejection::InvalidLevelIndex,
            });
            return;
        };

        self.level_index = index;
        self.player = spawn;
        self.lives_remaining = self.rules.max_lives;
        self.moves_remaining = self.rules.max_moves;
        self.accepting_input = true;
        self.status = GameStatus::InProgress;
        self.pending = None;

        info!(level = index, "level started");
        out_events.push(Event::LevelStarted {
            index,
            spawn,
            lives_remaining: self.lives_remaining,
            moves_remaining: self.moves_remaining,
        });
    }

    fn attempt_move(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if !self.accepting_input {
            out_events.push(Event::MoveRejected {
                direction,
                reason: MoveRejection::Busy,
            });
            return;
        }

        let Some(level) = self.current_level() else {
            out_events.push(Event::MoveRejected {
                direction,
                reason: MoveRejection::Busy,
            });
            return;
        };

        let from = self.player;
        let Some(to) = step_target(level, from, direction)
            .filter(|candidate| collision::can_occupy(level, *candidate))
        else {
            out_events.push(Event::MoveRejected {
                direction,
                reason: MoveRejection::Blocked,
            });
            return;
        };
        let reached_goal = level.goal_at(to);
        let cost = level.move_cost();

        self.player = to;
        self.moves_remaining = self.moves_remaining.saturating_sub(cost);
        debug!(
            column = to.column(),
            row = to.row(),
            moves_remaining = self.moves_remaining,
            "move accepted"
        );
        out_events.push(Event::MoveAccepted {
            direction,
            from,
            to,
            moves_remaining: self.moves_remaining,
        });

        if let Some(goal) = reached_goal {
            self.resolve_win(goal, out_events);
        } else if self.moves_remaining == 0 {
            self.resolve_life_loss(out_events);
        }
    }

    fn resolve_win(&mut self, goal: CellCoord, out_events: &mut Vec<Event>) {
        self.accepting_input = false;
        self.status = GameStatus::LevelWon;
        self.pending = Some(Transition::AdvanceLevel);

        info!(level = self.level_index, "level won");
        out_events.push(Event::LevelWon {
            index: self.level_index,
            goal,
        });
    }

    fn resolve_life_loss(&mut self, out_events: &mut Vec<Event>) {
        self.lives_remaining = self.lives_remaining.saturating_sub(1);
        self.accepting_input = false;

        if self.lives_remaining == 0 {
            self.status = GameStatus::GameOver;
            self.pending = Some(Transition::RestartSession);
            info!(level = self.level_index, "game over");
            out_events.push(Event::GameOver);
            return;
        }

        let spawn = self
            .current_level()
            .map_or(self.player, Level::spawn);
        self.player = spawn;
        self.moves_remaining = self.rules.max_moves;
        self.status = GameStatus::LifeLost;
        self.pending = Some(Transition::ResumePlay);

        debug!(lives_remaining = self.lives_remaining, "life lost");
        out_events.push(Event::LifeLost {
            lives_remaining: self.lives_remaining,
            spawn,
        });
    }

    fn settle(&mut self, out_events: &mut Vec<Event>) {
        let Some(transition) = self.pending.take() else {
            return;
        };

        match transition {
            Transition::AdvanceLevel => {
                let next = self.level_index.saturating_add(1);
                if next < self.levels.len() {
                    self.start_level(next, out_events);
                } else {
                    self.level_index = self.levels.len();
                    self.accepting_input = false;
                    self.status = GameStatus::SessionComplete;
                    info!(levels = self.levels.len(), "session complete");
                    out_events.push(Event::SessionComplete {
                        levels_cleared: self.levels.len(),
                    });
                }
            }
            Transition::RestartSession => {
                out_events.push(Event::SessionRestarted);
                self.start_level(0, out_events);
            }
            Transition::ResumePlay => {
                self.accepting_input = true;
                self.status = GameStatus::InProgress;
                out_events.push(Event::PlayResumed);
            }
        }
    }

    fn abandon(&mut self, out_events: &mut Vec<Event>) {
        self.accepting_input = false;
        self.pending = None;
        self.status = GameStatus::Abandoned;
        info!(level = self.level_index, "puzzle abandoned");
        out_events.push(Event::Abandoned);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::first_level(LevelSet::builtin(), Rules::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartLevel { index } => world.start_level(index, out_events),
        Command::AttemptMove { direction } => world.attempt_move(direction, out_events),
        Command::Settle => world.settle(out_events),
        Command::Abandon => world.abandon(out_events),
    }
}

fn step_target(level: &Level, from: CellCoord, direction: Direction) -> Option<CellCoord> {
    let step = i32::try_from(level.move_step()).ok()?;
    let (column, row) = direction.unit();
    from.offset(column.checked_mul(step)?, row.checked_mul(step)?)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use ls20_core::{CellCoord, GameSnapshot, Level, Rules};

    use super::{
        collision,
        navigation::{affordable_steps, NavigationField},
        LevelSet, World,
    };

    /// Retrieves the welcome banner that hosts may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the level set.
    #[must_use]
    pub fn levels(world: &World) -> &LevelSet {
        &world.levels
    }

    /// Provides read-only access to the engine-wide rules.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }

    /// Level currently being played; `None` once the session is complete.
    #[must_use]
    pub fn current_level(world: &World) -> Option<&Level> {
        world.current_level()
    }

    /// Captures a read-only snapshot of the game state.
    #[must_use]
    pub fn snapshot(world: &World) -> GameSnapshot {
        GameSnapshot {
            level_index: world.level_index,
            level_count: world.levels.len(),
            player: world.player,
            lives_remaining: world.lives_remaining,
            max_lives: world.rules.max_lives,
            moves_remaining: world.moves_remaining,
            max_moves: world.rules.max_moves,
            accepting_input: world.accepting_input,
            status: world.status,
        }
    }

    /// Reports whether the player's footprint may occupy `candidate` on the current level.
    #[must_use]
    pub fn can_move_to(world: &World, candidate: CellCoord) -> bool {
        world
            .current_level()
            .is_some_and(|level| collision::can_occupy(level, candidate))
    }

    /// Reports whether a settle command would currently change the world.
    #[must_use]
    pub fn has_pending_transition(world: &World) -> bool {
        world.pending.is_some()
    }

    /// Fewest moves between the player and the nearest goal of the current level.
    ///
    /// Only goals reachable with the moves left in the current life count.
    /// Returns `None` when the level has no goals, when none is within reach,
    /// or when the search gives up on a very open level.
    #[must_use]
    pub fn moves_to_nearest_goal(world: &World) -> Option<u32> {
        let level = world.current_level()?;
        let steps = affordable_steps(world.moves_remaining, level.move_cost());
        NavigationField::explore(level, world.player, steps).nearest(level.goals())
    }
}
