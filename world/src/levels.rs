//! Validated level sets and the levels bundled with the engine.

use ls20_core::{CellCoord, CellRect, CellRectSize, Level, Rules};
use thiserror::Error;
use tracing::warn;

use crate::{
    collision,
    navigation::{affordable_steps, NavigationField},
};

/// Reasons a single level description is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The grid has no cells.
    #[error("grid must have at least one column and one row")]
    EmptyGrid,
    /// The player footprint has no cells.
    #[error("player footprint must be at least one cell wide and tall")]
    EmptyFootprint,
    /// Moves would never displace the player.
    #[error("move step must be at least one cell")]
    ZeroMoveStep,
    /// Moves would never consume budget.
    #[error("move cost must be at least one")]
    ZeroMoveCost,
    /// The border leaves no room for the footprint.
    #[error("border of {border} cells leaves no room for the player footprint")]
    BorderTooWide {
        /// Margin requested by the level.
        border: u32,
    },
    /// The spawn cell fails the collision check.
    #[error(
        "spawn ({}, {}) is outside the playable region or inside an obstacle",
        .spawn.column(),
        .spawn.row()
    )]
    SpawnBlocked {
        /// Offending spawn cell.
        spawn: CellCoord,
    },
    /// A goal cell fails the collision check, so it can never be reached.
    #[error(
        "goal ({}, {}) is outside the playable region or inside an obstacle",
        .goal.column(),
        .goal.row()
    )]
    GoalBlocked {
        /// Offending goal cell.
        goal: CellCoord,
    },
}

/// Reasons an engine configuration is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The level set contains no levels.
    #[error("level set must contain at least one level")]
    EmptyLevelSet,
    /// A level failed validation.
    #[error("level {index} ({name}) is invalid: {source}")]
    InvalidLevel {
        /// Position of the level within the set.
        index: usize,
        /// Display name of the level.
        name: String,
        /// Specific validation failure.
        #[source]
        source: LevelError,
    },
    /// Levels could never be attempted.
    #[error("max_lives must be at least one")]
    ZeroLives,
    /// Lives would be lost before any move.
    #[error("max_moves must be at least one")]
    ZeroMoves,
}

/// Ordered, validated sequence of levels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelSet {
    levels: Vec<Level>,
}

impl LevelSet {
    /// Validates the provided levels and wraps them into a set.
    pub fn new(levels: Vec<Level>) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::EmptyLevelSet);
        }

        for (index, level) in levels.iter().enumerate() {
            validate_level(level).map_err(|source| ConfigError::InvalidLevel {
                index,
                name: level.name().to_owned(),
                source,
            })?;
            if !level.is_winnable() {
                warn!(index, name = level.name(), "level declares no goals and cannot be won");
            }
        }

        Ok(Self { levels })
    }

    /// Level set bundled with the engine.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            levels: builtin_levels(),
        }
    }

    /// Number of levels in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always `false`; validation rejects empty sets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level played first; every set holds at least one level.
    #[must_use]
    pub fn first(&self) -> &Level {
        &self.levels[0]
    }

    /// Level stored at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    /// Iterator over the levels in play order.
    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }

    /// Reports levels where no goal is reachable from spawn within a single life's budget.
    ///
    /// Such levels load fine but can only be lost, so hosts may want to warn
    /// authors. Goalless levels are never reported, and neither are levels
    /// whose search gives up before covering the budget.
    #[must_use]
    pub fn beyond_budget(&self, rules: &Rules) -> Vec<usize> {
        self.levels
            .iter()
            .enumerate()
            .filter(|(_, level)| level.is_winnable())
            .filter(|(_, level)| {
                let steps = affordable_steps(rules.max_moves, level.move_cost());
                let field = NavigationField::explore(level, level.spawn(), steps);
                field.is_complete() && field.nearest(level.goals()).is_none()
            })
            .map(|(index, _)| index)
            .collect()
    }
}

fn validate_level(level: &Level) -> Result<(), LevelError> {
    if level.grid().is_empty() {
        return Err(LevelError::EmptyGrid);
    }
    if level.footprint().is_empty() {
        return Err(LevelError::EmptyFootprint);
    }
    if level.move_step() == 0 {
        return Err(LevelError::ZeroMoveStep);
    }
    if level.move_cost() == 0 {
        return Err(LevelError::ZeroMoveCost);
    }

    let border = u64::from(level.border()) * 2;
    let grid = level.grid();
    let footprint = level.footprint();
    if border + u64::from(footprint.width()) > u64::from(grid.width())
        || border + u64::from(footprint.height()) > u64::from(grid.height())
    {
        return Err(LevelError::BorderTooWide {
            border: level.border(),
        });
    }

    if !collision::can_occupy(level, level.spawn()) {
        return Err(LevelError::SpawnBlocked {
            spawn: level.spawn(),
        });
    }

    if let Some(goal) = level
        .goals()
        .iter()
        .copied()
        .find(|goal| !collision::can_occupy(level, *goal))
    {
        return Err(LevelError::GoalBlocked { goal });
    }

    Ok(())
}

fn rect(column: u32, row: u32, width: u32, height: u32) -> CellRect {
    CellRect::from_origin_and_size(CellCoord::new(column, row), CellRectSize::new(width, height))
}

/// Levels bundled with the engine, in play order.
///
/// The first level is a 64×64 field with a two-cell-tall player that must
/// thread between three overlapping walls. The second uses an 8×8 block that
/// moves eight cells at a time inside a bordered arena; each blocked corner
/// cell seals off one corner position of that eight-cell lattice.
pub(crate) fn builtin_levels() -> Vec<Level> {
    vec![
        Level::new("ls20-1", CellRectSize::new(64, 64), CellCoord::new(0, 18))
            .with_footprint(CellRectSize::new(1, 2))
            .with_walls(vec![
                rect(3, 4, 10, 14),
                rect(10, 12, 7, 7),
                rect(10, 10, 4, 8),
            ])
            .with_goals(vec![
                CellCoord::new(2, 4),
                CellCoord::new(17, 16),
                CellCoord::new(14, 2),
            ]),
        Level::new("ls20-2", CellRectSize::new(64, 64), CellCoord::new(40, 48))
            .with_footprint(CellRectSize::new(8, 8))
            .with_move_step(8)
            .with_border(4)
            .with_walls(vec![rect(16, 16, 8, 16)])
            .with_blocked(vec![
                CellCoord::new(8, 8),
                CellCoord::new(55, 8),
                CellCoord::new(8, 55),
                CellCoord::new(55, 55),
                CellCoord::new(24, 48),
            ])
            .with_goals(vec![CellCoord::new(48, 16)]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_levels_pass_validation() {
        let set = LevelSet::new(builtin_levels()).expect("builtin levels are valid");
        assert_eq!(set, LevelSet::builtin());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn builtin_goals_fit_in_the_default_budget() {
        assert!(LevelSet::builtin().beyond_budget(&Rules::default()).is_empty());
    }

    #[test]
    fn tight_budget_is_reported() {
        let unreachable = LevelSet::builtin().beyond_budget(&Rules::new(3, 10));
        assert_eq!(unreachable, vec![0]);
    }

    #[test]
    fn coarse_builtin_corners_are_sealed() {
        let levels = builtin_levels();
        let coarse = &levels[1];
        for corner in [(8, 8), (48, 8), (8, 48), (48, 48)] {
            let corner = CellCoord::new(corner.0, corner.1);
            assert!(!collision::can_occupy(coarse, corner), "{corner:?}");
        }
        assert!(collision::can_occupy(coarse, CellCoord::new(16, 8)));

        let field = NavigationField::explore(coarse, coarse.spawn(), u32::MAX);
        assert!(field.is_complete());
        assert_eq!(field.nearest(coarse.goals()), Some(5));
    }

    #[test]
    fn huge_grid_budget_check_stays_bounded() {
        let level = Level::new(
            "vast",
            CellRectSize::new(2_000_000, 2_000_000),
            CellCoord::new(0, 0),
        )
        .with_goals(vec![CellCoord::new(5, 0)]);
        let set = LevelSet::new(vec![level]).expect("large grids are valid");
        assert!(set.beyond_budget(&Rules::default()).is_empty());
    }

    #[test]
    fn distant_goal_on_huge_grid_is_reported() {
        let level = Level::new(
            "vast",
            CellRectSize::new(2_000_000, 2_000_000),
            CellCoord::new(0, 0),
        )
        .with_goals(vec![CellCoord::new(1_000, 0)]);
        let set = LevelSet::new(vec![level]).expect("large grids are valid");
        assert_eq!(set.beyond_budget(&Rules::default()), vec![0]);
    }

    #[test]
    fn empty_set_is_rejected() {
        assert_eq!(LevelSet::new(Vec::new()), Err(ConfigError::EmptyLevelSet));
    }

    #[test]
    fn spawn_inside_wall_is_rejected() {
        let level = Level::new("bad", CellRectSize::new(20, 20), CellCoord::new(5, 5))
            .with_walls(vec![rect(3, 4, 10, 14)]);
        let error = LevelSet::new(vec![level]).expect_err("spawn is inside a wall");
        assert_eq!(
            error,
            ConfigError::InvalidLevel {
                index: 0,
                name: "bad".to_owned(),
                source: LevelError::SpawnBlocked {
                    spawn: CellCoord::new(5, 5),
                },
            }
        );
    }

    #[test]
    fn goal_inside_wall_is_rejected() {
        let level = Level::new("hidden", CellRectSize::new(20, 20), CellCoord::new(0, 0))
            .with_walls(vec![rect(3, 4, 10, 14)])
            .with_goals(vec![CellCoord::new(7, 4)]);
        let error = LevelSet::new(vec![level]).expect_err("goal is inside a wall");
        assert!(matches!(
            error,
            ConfigError::InvalidLevel {
                source: LevelError::GoalBlocked { .. },
                ..
            }
        ));
    }

    #[test]
    fn oversized_border_is_rejected() {
        let level = Level::new("tiny", CellRectSize::new(10, 10), CellCoord::new(4, 4))
            .with_border(5);
        let error = LevelSet::new(vec![level]).expect_err("border swallows the grid");
        assert!(error.to_string().contains("border of 5 cells"));
    }

    #[test]
    fn goalless_level_is_accepted_but_not_winnable() {
        let level = Level::new("endless", CellRectSize::new(8, 8), CellCoord::new(0, 0));
        let set = LevelSet::new(vec![level]).expect("goalless levels load");
        assert!(set.get(0).is_some_and(|level| !level.is_winnable()));
        assert!(set.beyond_budget(&Rules::default()).is_empty());
    }
}
