//! Footprint placement predicate shared by move validation and level loading.

use ls20_core::{CellCoord, CellRect, Level};

/// Rectangle occupied by the player's footprint when anchored at `origin`.
pub(crate) fn footprint_at(level: &Level, origin: CellCoord) -> CellRect {
    CellRect::from_origin_and_size(origin, level.footprint())
}

/// Reports whether the player's footprint may occupy `origin`.
///
/// The footprint must lie inside the grid shrunk by the level border, must
/// not contain any blocked cell and must not overlap any wall rectangle.
pub(crate) fn can_occupy(level: &Level, origin: CellCoord) -> bool {
    if !inside_playable_region(level, origin) {
        return false;
    }

    let footprint = footprint_at(level, origin);
    if level.blocked().iter().any(|cell| footprint.contains(*cell)) {
        return false;
    }

    !level.walls().iter().any(|wall| footprint.overlaps(wall))
}

fn inside_playable_region(level: &Level, origin: CellCoord) -> bool {
    let border = u64::from(level.border());
    let grid = level.grid();
    let footprint = level.footprint();

    let left = u64::from(origin.column());
    let top = u64::from(origin.row());
    let right = left + u64::from(footprint.width());
    let bottom = top + u64::from(footprint.height());

    left >= border
        && top >= border
        && right + border <= u64::from(grid.width())
        && bottom + border <= u64::from(grid.height())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ls20_core::CellRectSize;

    fn wall(column: u32, row: u32, width: u32, height: u32) -> CellRect {
        CellRect::from_origin_and_size(
            CellCoord::new(column, row),
            CellRectSize::new(width, height),
        )
    }

    #[test]
    fn full_grid_is_playable_without_border() {
        let level = Level::new("open", CellRectSize::new(4, 3), CellCoord::new(0, 0));
        assert!(can_occupy(&level, CellCoord::new(0, 0)));
        assert!(can_occupy(&level, CellCoord::new(3, 2)));
        assert!(!can_occupy(&level, CellCoord::new(4, 2)));
        assert!(!can_occupy(&level, CellCoord::new(3, 3)));
    }

    #[test]
    fn tall_footprint_cannot_use_last_row() {
        let level = Level::new("tall", CellRectSize::new(64, 64), CellCoord::new(0, 18))
            .with_footprint(CellRectSize::new(1, 2));
        assert!(can_occupy(&level, CellCoord::new(0, 62)));
        assert!(!can_occupy(&level, CellCoord::new(0, 63)));
    }

    #[test]
    fn border_shrinks_every_edge() {
        let level = Level::new("bordered", CellRectSize::new(10, 10), CellCoord::new(2, 2))
            .with_border(2);
        assert!(!can_occupy(&level, CellCoord::new(1, 5)));
        assert!(!can_occupy(&level, CellCoord::new(5, 1)));
        assert!(can_occupy(&level, CellCoord::new(7, 7)));
        assert!(!can_occupy(&level, CellCoord::new(8, 7)));
        assert!(!can_occupy(&level, CellCoord::new(7, 8)));
    }

    #[test]
    fn blocked_cells_reject_any_covering_footprint() {
        let level = Level::new("corners", CellRectSize::new(64, 64), CellCoord::new(40, 48))
            .with_footprint(CellRectSize::new(8, 8))
            .with_blocked(vec![CellCoord::new(24, 48)]);
        assert!(can_occupy(&level, CellCoord::new(32, 48)));
        assert!(!can_occupy(&level, CellCoord::new(24, 48)));
        assert!(!can_occupy(&level, CellCoord::new(17, 41)));
        assert!(can_occupy(&level, CellCoord::new(16, 48)));
    }

    #[test]
    fn walls_reject_overlapping_footprints_only() {
        let level = Level::new("walls", CellRectSize::new(64, 64), CellCoord::new(0, 18))
            .with_footprint(CellRectSize::new(1, 2))
            .with_walls(vec![wall(3, 4, 10, 14)]);
        assert!(can_occupy(&level, CellCoord::new(3, 18)));
        assert!(!can_occupy(&level, CellCoord::new(3, 17)));
        assert!(can_occupy(&level, CellCoord::new(3, 2)));
        assert!(!can_occupy(&level, CellCoord::new(3, 3)));
        assert!(can_occupy(&level, CellCoord::new(13, 10)));
    }
}
