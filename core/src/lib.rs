#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the LS20 puzzle engine.
//!
//! This crate defines the message surface that connects hosts, the
//! authoritative world, and pure systems. Hosts submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that systems and
//! presentation layers react to. Systems consume event streams and respond
//! exclusively with new command batches.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "LS20: reach a goal before your moves run out.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Resets the session state and begins the level at the provided index.
    StartLevel {
        /// Zero-based index into the level set.
        index: usize,
    },
    /// Requests that the player step once in the specified direction.
    AttemptMove {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Executes the transition deferred by the last win or loss resolution.
    Settle,
    /// Escape signal: abandons the puzzle and hands control back to the host menu.
    Abandon,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Announces that a level became active with a fully reset state.
    LevelStarted {
        /// Index of the level that started.
        index: usize,
        /// Cell the player occupies after the reset.
        spawn: CellCoord,
        /// Lives available for the level.
        lives_remaining: u32,
        /// Move budget available for the current life.
        moves_remaining: u32,
    },
    /// Reports that a level start request was rejected.
    LevelStartRejected {
        /// Index provided in the request.
        index: usize,
        /// Specific reason the request failed.
        reason: StartRejection,
    },
    /// Confirms that the player moved between two cells.
    MoveAccepted {
        /// Direction of the accepted step.
        direction: Direction,
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after moving.
        to: CellCoord,
        /// Move budget left after paying for the step.
        moves_remaining: u32,
    },
    /// Reports that a move request was rejected without touching any state.
    MoveRejected {
        /// Direction of the rejected step.
        direction: Direction,
        /// Specific reason the move failed.
        reason: MoveRejection,
    },
    /// The move budget ran out and the player lost a life; position and budget are reset.
    LifeLost {
        /// Lives left after the loss.
        lives_remaining: u32,
        /// Cell the player was returned to.
        spawn: CellCoord,
    },
    /// The last life was lost; the session restarts once the settle delay elapses.
    GameOver,
    /// The player reached a goal cell.
    LevelWon {
        /// Index of the level that was won.
        index: usize,
        /// Goal cell the player landed on.
        goal: CellCoord,
    },
    /// Every level of the set has been won.
    SessionComplete {
        /// Number of levels cleared during the session.
        levels_cleared: usize,
    },
    /// The session was reset to the first level after a game over.
    SessionRestarted,
    /// Input is accepted again after a life loss.
    PlayResumed,
    /// The escape signal was received and the puzzle stopped accepting input.
    Abandoned,
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All directions in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Unit step expressed as `(column, row)` deltas.
    #[must_use]
    pub const fn unit(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Reasons a move request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// A win or loss transition holds the input lock.
    Busy,
    /// The destination leaves the playable region, touches a blocked cell or overlaps a wall.
    Blocked,
}

/// Reasons a level start request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StartRejection {
    /// The index lies outside the level set.
    InvalidLevelIndex,
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the cell displaced by the provided deltas, or `None` when the
    /// result would leave the non-negative quadrant.
    #[must_use]
    pub const fn offset(self, columns: i32, rows: i32) -> Option<Self> {
        let Some(column) = self.column.checked_add_signed(columns) else {
            return None;
        };
        let Some(row) = self.row.checked_add_signed(rows) else {
            return None;
        };
        Some(Self { column, row })
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    size: CellRectSize,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: CellRectSize) -> Self {
        Self { origin, size }
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> CellRectSize {
        self.size
    }

    /// Reports whether the rectangle covers the provided cell.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        let column = cell.column() as u64;
        let row = cell.row() as u64;
        let left = self.origin.column() as u64;
        let top = self.origin.row() as u64;
        column >= left
            && column < left + self.size.width() as u64
            && row >= top
            && row < top + self.size.height() as u64
    }

    /// Axis-aligned overlap test. Rectangles that merely share an edge do not overlap.
    #[must_use]
    pub const fn overlaps(&self, other: &CellRect) -> bool {
        let (ax, ay) = (self.origin.column() as u64, self.origin.row() as u64);
        let (aw, ah) = (self.size.width() as u64, self.size.height() as u64);
        let (bx, by) = (other.origin.column() as u64, other.origin.row() as u64);
        let (bw, bh) = (other.size.width() as u64, other.size.height() as u64);
        ax < bx + bw && ax + aw > bx && ay < by + bh && ay + ah > by
    }
}

/// Size of a [`CellRect`] measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRectSize {
    width: u32,
    height: u32,
}

impl CellRectSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether either dimension is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Static description of a single puzzle level.
///
/// Every level variant is expressed through the same schema: grid bounds
/// shrunk by an optional border margin, an explicit blocked-cell list, wall
/// rectangles, goal cells, the player's footprint and the step size applied
/// per move. Levels are immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    name: String,
    grid: CellRectSize,
    spawn: CellCoord,
    walls: Vec<CellRect>,
    goals: Vec<CellCoord>,
    border: u32,
    blocked: Vec<CellCoord>,
    footprint: CellRectSize,
    move_step: u32,
    move_cost: u32,
}

impl Level {
    /// Creates an open level with a 1×1 footprint, unit steps and no obstacles.
    #[must_use]
    pub fn new(name: impl Into<String>, grid: CellRectSize, spawn: CellCoord) -> Self {
        Self {
            name: name.into(),
            grid,
            spawn,
            walls: Vec::new(),
            goals: Vec::new(),
            border: 0,
            blocked: Vec::new(),
            footprint: CellRectSize::new(1, 1),
            move_step: 1,
            move_cost: 1,
        }
    }

    /// Replaces the wall rectangles.
    #[must_use]
    pub fn with_walls(mut self, walls: Vec<CellRect>) -> Self {
        self.walls = walls;
        self
    }

    /// Replaces the goal cells.
    #[must_use]
    pub fn with_goals(mut self, goals: Vec<CellCoord>) -> Self {
        self.goals = goals;
        self
    }

    /// Sets the margin removed from every edge of the grid.
    #[must_use]
    pub fn with_border(mut self, border: u32) -> Self {
        self.border = border;
        self
    }

    /// Replaces the individually blocked cells.
    #[must_use]
    pub fn with_blocked(mut self, blocked: Vec<CellCoord>) -> Self {
        self.blocked = blocked;
        self
    }

    /// Sets the size of the area the player occupies.
    #[must_use]
    pub fn with_footprint(mut self, footprint: CellRectSize) -> Self {
        self.footprint = footprint;
        self
    }

    /// Sets the distance in cells covered by a single move.
    #[must_use]
    pub fn with_move_step(mut self, move_step: u32) -> Self {
        self.move_step = move_step;
        self
    }

    /// Sets the budget consumed by a single accepted move.
    #[must_use]
    pub fn with_move_cost(mut self, move_cost: u32) -> Self {
        self.move_cost = move_cost;
        self
    }

    /// Display name of the level.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Grid dimensions in cells.
    #[must_use]
    pub const fn grid(&self) -> CellRectSize {
        self.grid
    }

    /// Cell the player occupies when the level or a life starts.
    #[must_use]
    pub const fn spawn(&self) -> CellCoord {
        self.spawn
    }

    /// Wall rectangles in declaration order.
    #[must_use]
    pub fn walls(&self) -> &[CellRect] {
        &self.walls
    }

    /// Goal cells; empty when the level declares none.
    #[must_use]
    pub fn goals(&self) -> &[CellCoord] {
        &self.goals
    }

    /// Margin removed from every edge of the grid.
    #[must_use]
    pub const fn border(&self) -> u32 {
        self.border
    }

    /// Individually blocked cells.
    #[must_use]
    pub fn blocked(&self) -> &[CellCoord] {
        &self.blocked
    }

    /// Size of the area the player occupies.
    #[must_use]
    pub const fn footprint(&self) -> CellRectSize {
        self.footprint
    }

    /// Distance in cells covered by a single move.
    #[must_use]
    pub const fn move_step(&self) -> u32 {
        self.move_step
    }

    /// Budget consumed by a single accepted move.
    #[must_use]
    pub const fn move_cost(&self) -> u32 {
        self.move_cost
    }

    /// Reports whether the level declares at least one goal.
    #[must_use]
    pub fn is_winnable(&self) -> bool {
        !self.goals.is_empty()
    }

    /// Returns the goal located at the provided cell, if any.
    #[must_use]
    pub fn goal_at(&self, cell: CellCoord) -> Option<CellCoord> {
        self.goals.iter().copied().find(|goal| *goal == cell)
    }
}

/// Engine-wide limits applied to every level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Lives granted when a level starts.
    pub max_lives: u32,
    /// Move budget granted per life.
    pub max_moves: u32,
}

impl Rules {
    /// Lives granted per level unless configured otherwise.
    pub const DEFAULT_MAX_LIVES: u32 = 3;
    /// Moves granted per life unless configured otherwise.
    pub const DEFAULT_MAX_MOVES: u32 = 22;

    /// Creates rules with explicit limits.
    #[must_use]
    pub const fn new(max_lives: u32, max_moves: u32) -> Self {
        Self {
            max_lives,
            max_moves,
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_LIVES, Self::DEFAULT_MAX_MOVES)
    }
}

/// Coarse phase of the puzzle exposed to presentation layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Input is accepted and the current level is being played.
    InProgress,
    /// A life was lost; input resumes after the settle delay.
    LifeLost,
    /// All lives were lost; the session restarts after the settle delay.
    GameOver,
    /// A goal was reached; the next level starts after the settle delay.
    LevelWon,
    /// Every level has been won; the engine idles until restarted.
    SessionComplete,
    /// The escape signal stopped the puzzle; the engine idles until restarted.
    Abandoned,
}

/// Immutable representation of the game state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Index of the active level; equals `level_count` once the session is complete.
    pub level_index: usize,
    /// Number of levels in the set.
    pub level_count: usize,
    /// Cell occupied by the player's footprint origin.
    pub player: CellCoord,
    /// Lives left on the current level.
    pub lives_remaining: u32,
    /// Lives granted per level.
    pub max_lives: u32,
    /// Moves left for the current life.
    pub moves_remaining: u32,
    /// Moves granted per life.
    pub max_moves: u32,
    /// Indicates whether move commands are currently evaluated.
    pub accepting_input: bool,
    /// Coarse phase of the puzzle.
    pub status: GameStatus,
}

impl GameSnapshot {
    /// Number of moves spent during the current life.
    #[must_use]
    pub const fn moves_used(&self) -> u32 {
        self.max_moves.saturating_sub(self.moves_remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, CellRect, CellRectSize, Command, Direction, Event, MoveRejection};
    use serde::{de::DeserializeOwned, Serialize};

    fn rect(column: u32, row: u32, width: u32, height: u32) -> CellRect {
        CellRect::from_origin_and_size(
            CellCoord::new(column, row),
            CellRectSize::new(width, height),
        )
    }

    #[test]
    fn offset_rejects_underflow() {
        let origin = CellCoord::new(0, 3);
        assert_eq!(origin.offset(-1, 0), None);
        assert_eq!(origin.offset(0, -3), Some(CellCoord::new(0, 0)));
        assert_eq!(origin.offset(8, 1), Some(CellCoord::new(8, 4)));
    }

    #[test]
    fn unit_steps_are_cardinal() {
        for direction in Direction::ALL {
            let (column, row) = direction.unit();
            assert_eq!(column.abs() + row.abs(), 1, "{direction:?}");
        }
    }

    #[test]
    fn overlap_requires_shared_area() {
        let wall = rect(3, 4, 10, 14);
        assert!(wall.overlaps(&rect(12, 17, 1, 1)));
        assert!(!wall.overlaps(&rect(13, 4, 1, 1)));
        assert!(!wall.overlaps(&rect(2, 4, 1, 2)));
        assert!(wall.overlaps(&rect(2, 3, 2, 2)));
    }

    #[test]
    fn contains_is_half_open() {
        let wall = rect(16, 16, 8, 16);
        assert!(wall.contains(CellCoord::new(16, 16)));
        assert!(wall.contains(CellCoord::new(23, 31)));
        assert!(!wall.contains(CellCoord::new(24, 16)));
        assert!(!wall.contains(CellCoord::new(16, 32)));
    }

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn commands_and_events_round_trip_through_bincode() {
        assert_round_trip(&Command::AttemptMove {
            direction: Direction::West,
        });
        assert_round_trip(&Event::MoveRejected {
            direction: Direction::North,
            reason: MoveRejection::Blocked,
        });
        assert_round_trip(&Event::MoveAccepted {
            direction: Direction::East,
            from: CellCoord::new(0, 18),
            to: CellCoord::new(1, 18),
            moves_remaining: 21,
        });
    }
}
