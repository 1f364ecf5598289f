//! Breadth-first reachability over the positions a level's footprint can occupy.

use std::collections::{HashMap, VecDeque};

use ls20_core::{CellCoord, Direction, Level};

use crate::collision;

/// Most positions a single search records before giving up.
pub(crate) const MAX_VISITED_POSITIONS: usize = 1 << 16;

/// Sparse move counts seeded from a single origin.
///
/// Only positions on the level's step lattice through the seed are ever
/// recorded, so memory follows the explored area rather than the grid size.
/// The search stops expanding at `max_steps` and gives up once
/// [`MAX_VISITED_POSITIONS`] positions are known; a field that gave up is
/// not [complete](Self::is_complete).
#[derive(Clone, Debug)]
pub(crate) struct NavigationField {
    distances: HashMap<CellCoord, u32>,
    complete: bool,
}

impl NavigationField {
    /// Explores up to `max_steps` moves from `seed` using the level's collision predicate.
    pub(crate) fn explore(level: &Level, seed: CellCoord, max_steps: u32) -> Self {
        let mut field = Self {
            distances: HashMap::new(),
            complete: true,
        };

        if !collision::can_occupy(level, seed) {
            return field;
        }
        let Ok(step) = i32::try_from(level.move_step()) else {
            return field;
        };
        let offsets = Direction::ALL.map(|direction| {
            let (column, row) = direction.unit();
            (column * step, row * step)
        });

        let mut queue = VecDeque::new();
        let _ = field.distances.insert(seed, 0);
        queue.push_back((seed, 0_u32));

        while let Some((cell, distance)) = queue.pop_front() {
            if distance >= max_steps {
                continue;
            }
            for (columns, rows) in offsets {
                let Some(next) = cell.offset(columns, rows) else {
                    continue;
                };
                if field.distances.contains_key(&next) || !collision::can_occupy(level, next) {
                    continue;
                }
                if field.distances.len() >= MAX_VISITED_POSITIONS {
                    field.complete = false;
                    return field;
                }
                let _ = field.distances.insert(next, distance + 1);
                queue.push_back((next, distance + 1));
            }
        }

        field
    }

    /// Number of moves needed to reach `cell`, if the search reached it.
    pub(crate) fn distance(&self, cell: CellCoord) -> Option<u32> {
        self.distances.get(&cell).copied()
    }

    /// Fewest moves needed to reach any of the provided cells.
    pub(crate) fn nearest(&self, cells: &[CellCoord]) -> Option<u32> {
        cells.iter().filter_map(|cell| self.distance(*cell)).min()
    }

    /// Reports whether every position within the step limit was explored.
    pub(crate) fn is_complete(&self) -> bool {
        self.complete
    }
}

/// Number of moves a budget pays for; the move that exhausts it still counts.
pub(crate) fn affordable_steps(budget: u32, move_cost: u32) -> u32 {
    budget.div_ceil(move_cost.max(1))
}
