//! TOML game configuration: rules, settle delays and an optional level set.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use ls20_core::{CellCoord, CellRect, CellRectSize, Level, Rules};
use ls20_system_settle::SettleDelays;
use ls20_world::LevelSet;
use serde::Deserialize;
use tracing::{info, warn};

/// Fully validated configuration consumed by the session.
#[derive(Debug)]
pub(crate) struct GameConfig {
    pub(crate) levels: LevelSet,
    pub(crate) rules: Rules,
    pub(crate) settle: SettleDelays,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            levels: LevelSet::builtin(),
            rules: Rules::default(),
            settle: SettleDelays::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(default)]
    rules: Rules,
    #[serde(default)]
    settle: SettleDelays,
    #[serde(default)]
    levels: Vec<LevelManifest>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LevelManifest {
    name: Option<String>,
    columns: u32,
    rows: u32,
    spawn: [u32; 2],
    #[serde(default = "unit_footprint")]
    footprint: [u32; 2],
    #[serde(default)]
    walls: Vec<[u32; 4]>,
    #[serde(default)]
    goals: Vec<[u32; 2]>,
    #[serde(default)]
    border: u32,
    #[serde(default)]
    blocked: Vec<[u32; 2]>,
    #[serde(default = "one")]
    move_step: u32,
    #[serde(default = "one")]
    move_cost: u32,
}

fn unit_footprint() -> [u32; 2] {
    [1, 1]
}

fn one() -> u32 {
    1
}

impl LevelManifest {
    fn into_level(self, index: usize) -> Level {
        let name = self
            .name
            .unwrap_or_else(|| format!("level-{}", index + 1));
        let cell = |[column, row]: [u32; 2]| CellCoord::new(column, row);

        Level::new(
            name,
            CellRectSize::new(self.columns, self.rows),
            cell(self.spawn),
        )
        .with_footprint(CellRectSize::new(self.footprint[0], self.footprint[1]))
        .with_walls(
            self.walls
                .into_iter()
                .map(|[column, row, width, height]| {
                    CellRect::from_origin_and_size(
                        CellCoord::new(column, row),
                        CellRectSize::new(width, height),
                    )
                })
                .collect(),
        )
        .with_goals(self.goals.into_iter().map(cell).collect())
        .with_border(self.border)
        .with_blocked(self.blocked.into_iter().map(cell).collect())
        .with_move_step(self.move_step)
        .with_move_cost(self.move_cost)
    }
}

/// Loads the configuration at `path`, or the defaults when no path is given.
pub(crate) fn load(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read game config at {}", path.display()))?;
    let config = parse(&contents)
        .with_context(|| format!("invalid game config at {}", path.display()))?;
    info!(path = %path.display(), levels = config.levels.len(), "game config loaded");
    Ok(config)
}

/// Parses and validates TOML configuration contents.
pub(crate) fn parse(contents: &str) -> Result<GameConfig> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse game config toml contents")?;

    let levels = if manifest.levels.is_empty() {
        LevelSet::builtin()
    } else {
        let levels = manifest
            .levels
            .into_iter()
            .enumerate()
            .map(|(index, level)| level.into_level(index))
            .collect();
        LevelSet::new(levels).context("level set failed validation")?
    };

    for index in levels.beyond_budget(&manifest.rules) {
        warn!(
            level = index,
            max_moves = manifest.rules.max_moves,
            "no goal is reachable within a single move budget"
        );
    }

    Ok(GameConfig {
        levels,
        rules: manifest.rules,
        settle: manifest.settle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse("").expect("empty config is valid");
        assert_eq!(config.levels, LevelSet::builtin());
        assert_eq!(config.rules, Rules::default());
        assert_eq!(config.settle, SettleDelays::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = parse(
            r#"
            [rules]
            max_moves = 30

            [settle]
            life_lost_ms = 50
            "#,
        )
        .expect("partial config is valid");
        assert_eq!(config.rules, Rules::new(3, 30));
        assert_eq!(config.settle, SettleDelays::new(800, 50, 1000));
    }

    #[test]
    fn levels_are_converted_with_schema_defaults() {
        let config = parse(
            r#"
            [[levels]]
            name = "ls20-1"
            columns = 64
            rows = 64
            spawn = [0, 18]
            footprint = [1, 2]
            walls = [[3, 4, 10, 14], [10, 12, 7, 7]]
            goals = [[2, 4]]

            [[levels]]
            columns = 64
            rows = 64
            spawn = [40, 48]
            footprint = [8, 8]
            move_step = 8
            border = 4
            blocked = [[24, 48]]
            "#,
        )
        .expect("levels are valid");

        assert_eq!(config.levels.len(), 2);
        let first = config.levels.get(0).expect("first level");
        assert_eq!(first.name(), "ls20-1");
        assert_eq!(first.walls().len(), 2);
        assert_eq!(first.move_cost(), 1);
        let second = config.levels.get(1).expect("second level");
        assert_eq!(second.name(), "level-2");
        assert_eq!(second.move_step(), 8);
        assert_eq!(second.blocked(), &[CellCoord::new(24, 48)]);
        assert!(!second.is_winnable());
    }

    #[test]
    fn invalid_level_reports_context() {
        let error = parse(
            r#"
            [[levels]]
            columns = 10
            rows = 10
            spawn = [4, 4]
            walls = [[3, 3, 3, 3]]
            "#,
        )
        .expect_err("spawn inside wall");
        let message = format!("{error:#}");
        assert!(message.contains("level set failed validation"), "{message}");
        assert!(message.contains("spawn (4, 4)"), "{message}");
    }

    #[test]
    fn huge_grid_level_loads() {
        let config = parse(
            r#"
            [[levels]]
            columns = 2000000
            rows = 2000000
            spawn = [0, 0]
            goals = [[5, 0]]
            "#,
        )
        .expect("grid size is not limited");
        assert_eq!(config.levels.len(), 1);
        assert!(config.levels.beyond_budget(&config.rules).is_empty());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = parse("[rule]\nmax_lives = 3\n").expect_err("typo in section name");
        assert!(format!("{error:#}").contains("failed to parse game config toml contents"));
    }
}
