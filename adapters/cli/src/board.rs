//! Plain-text rendering of the active level.

use ls20_core::{CellCoord, CellRect, GameSnapshot, GameStatus, Level};

const FREE: char = '.';
const WALL: char = '#';
const OUT_OF_BOUNDS: char = 'x';
const GOAL: char = 'G';
const PLAYER: char = '@';

/// Largest grid drawn cell by cell; bigger grids only get the status line.
const MAX_RENDERED_CELLS: u64 = 1 << 16;

/// Renders the level grid with the player footprint overlaid, followed by a status line.
pub(crate) fn render(level: &Level, snapshot: &GameSnapshot) -> String {
    let grid = level.grid();
    if u64::from(grid.width()) * u64::from(grid.height()) > MAX_RENDERED_CELLS {
        return format!(
            "({}x{} grid too large to draw)\n{}\n",
            grid.width(),
            grid.height(),
            status_line(level, snapshot)
        );
    }

    let player = CellRect::from_origin_and_size(snapshot.player, level.footprint());
    let mut output = String::new();
    for row in 0..grid.height() {
        for column in 0..grid.width() {
            let cell = CellCoord::new(column, row);
            output.push(glyph(level, player, cell));
        }
        output.push('\n');
    }
    output.push_str(&status_line(level, snapshot));
    output.push('\n');
    output
}

fn glyph(level: &Level, player: CellRect, cell: CellCoord) -> char {
    if player.contains(cell) {
        PLAYER
    } else if level.goals().contains(&cell) {
        GOAL
    } else if level.walls().iter().any(|wall| wall.contains(cell)) {
        WALL
    } else if level.blocked().contains(&cell) || in_border(level, cell) {
        OUT_OF_BOUNDS
    } else {
        FREE
    }
}

fn in_border(level: &Level, cell: CellCoord) -> bool {
    let border = level.border();
    let grid = level.grid();
    cell.column() < border
        || cell.row() < border
        || cell.column() >= grid.width().saturating_sub(border)
        || cell.row() >= grid.height().saturating_sub(border)
}

/// One-line summary of level, lives, moves and phase.
pub(crate) fn status_line(level: &Level, snapshot: &GameSnapshot) -> String {
    let phase = match snapshot.status {
        GameStatus::InProgress => "",
        GameStatus::LifeLost => " - life lost",
        GameStatus::GameOver => " - game over",
        GameStatus::LevelWon => " - level won",
        GameStatus::SessionComplete => " - session complete",
        GameStatus::Abandoned => " - abandoned",
    };
    format!(
        "{} [{}/{}] lives {}/{} moves {}/{} at ({}, {}){phase}",
        level.name(),
        snapshot.level_index + 1,
        snapshot.level_count,
        snapshot.lives_remaining,
        snapshot.max_lives,
        snapshot.moves_remaining,
        snapshot.max_moves,
        snapshot.player.column(),
        snapshot.player.row(),
    )
}
