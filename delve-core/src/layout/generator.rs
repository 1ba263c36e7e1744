//! Randomized recursive-growth layout generation.
//!
//! The algorithm grows a tree of cells outward from a start coordinate on
//! the sparse grid. Cells on an odd sub-grid axis elongate into corridors;
//! even cells branch in up to three random cardinal directions, with the
//! branch budget tapering off as the cell count approaches the configured
//! target. Doors, locked doors, and key placements are rolled per edge.
//!
//! Everything here is deterministic per seed: the RNG is a seeded ChaCha
//! stream and all collection iteration that feeds a random choice is sorted
//! first.

use std::collections::HashSet;

use rand::Rng;
use rand::RngCore;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::LayoutConfig;
use crate::types::{Coordinate, Direction};

use super::{Cell, Connection, Key, Layout};

/// Randomized layout generator with an explicit per-run locked-door budget.
///
/// Holds all mutable generation state as instance fields — a fresh budget is
/// taken from the config at the top of every [`LayoutGenerator::generate`]
/// call, so one generator can be reused across levels without state leaking
/// between runs.
pub struct LayoutGenerator {
    config: LayoutConfig,
    rng: ChaCha8Rng,
    locked_budget: u32,
}

impl LayoutGenerator {
    /// Create a generator for the given tuning and seed.
    #[must_use]
    pub fn new(config: LayoutConfig, seed: u64) -> Self {
        let locked_budget = config.max_locked_doors;
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            locked_budget,
        }
    }

    /// Grow a layout rooted at `start`.
    ///
    /// The returned layout always contains the start cell, is connected (the
    /// parent pointers form a tree rooted at `start`), and has exactly one
    /// exit cell whenever more than one cell exists.
    pub fn generate(&mut self, start: Coordinate) -> Layout {
        self.locked_budget = self.config.max_locked_doors;

        let mut layout = Layout::new(start);
        let mut unvisited = vec![start];

        while let Some(coord) = unvisited.pop() {
            let branches = self.branches_to_add(layout.len());
            if branches == 0 {
                continue;
            }
            // Odd sub-grid axes force corridor elongation: the cell extends
            // in the same direction it was entered from, one child at most.
            if coord.x % 2 != 0 || coord.y % 2 != 0 {
                self.continue_corridor(&mut layout, coord, &mut unvisited);
            } else {
                self.branch_out(&mut layout, coord, branches, &mut unvisited);
            }
        }

        self.set_exit(&mut layout);
        debug!(
            cells = layout.len(),
            connections = layout.connections.len(),
            keys = layout.keys.len(),
            "layout generated"
        );
        layout
    }

    /// How many child branches the next cell gets. Growth is fast below the
    /// room target and tapers to nothing past twice the target.
    #[allow(clippy::cast_precision_loss)]
    fn branches_to_add(&mut self, cell_count: usize) -> usize {
        let min = self.config.min_rooms as f64;
        let count = cell_count as f64;

        let max = if count < min * self.config.branch_taper_mid {
            3
        } else if count < min * self.config.branch_taper_late {
            2
        } else if count < min * self.config.branch_taper_stop {
            1
        } else {
            0
        };
        if max == 0 {
            0
        } else {
            self.rng.gen_range(1..=max)
        }
    }

    /// Branch into up to `openings` distinct random cardinal directions,
    /// skipping occupied coordinates. All directions occupied is tolerated:
    /// the branch is skipped, not an error.
    fn branch_out(
        &mut self,
        layout: &mut Layout,
        coord: Coordinate,
        openings: usize,
        unvisited: &mut Vec<Coordinate>,
    ) {
        let mut dirs = Direction::CARDINALS_XY;
        dirs.shuffle(&mut self.rng);

        let mut created = 0;
        for dir in dirs {
            if created == openings {
                break;
            }
            let next = coord + dir.as_coordinate();
            if layout.cells.contains_key(&next) {
                continue;
            }
            self.spawn_cell(layout, coord, next, true, unvisited);
            created += 1;
        }

        if created == 0 {
            debug!(%coord, wanted = openings, "all directions occupied, branch skipped");
        }
    }

    /// Extend a corridor cell in the direction it was entered from.
    fn continue_corridor(
        &mut self,
        layout: &mut Layout,
        coord: Coordinate,
        unvisited: &mut Vec<Coordinate>,
    ) {
        let Some(parent) = layout.cells.get(&coord).and_then(|c| c.parent) else {
            return;
        };
        let next = coord + (coord - parent);
        if layout.cells.contains_key(&next) {
            debug!(%coord, "corridor blocked, branch ends");
            return;
        }
        // A door into this cell means no door out: never two doors in a row
        // along a continued corridor.
        let door_in = layout
            .connection_between(parent, coord)
            .is_some_and(|c| c.door);
        self.spawn_cell(layout, coord, next, !door_in, unvisited);
    }

    /// Create a cell at `coord` attached to `parent`, roll its room/corridor
    /// and door/lock dice, and push it onto the growth stack.
    fn spawn_cell(
        &mut self,
        layout: &mut Layout,
        parent: Coordinate,
        coord: Coordinate,
        allow_door: bool,
        unvisited: &mut Vec<Coordinate>,
    ) {
        let mut cell = Cell::new(coord, Some(parent));
        cell.visited = true;
        cell.is_room = self.rng.gen_bool(self.config.room_chance);
        cell.is_corridor = !cell.is_room;
        layout.cells.insert(coord, cell);

        if let Some(parent_cell) = layout.cells.get_mut(&parent) {
            parent_cell.leaf = false;
        }

        let mut connection = Connection::open(parent, coord);
        if allow_door && self.rng.gen_bool(self.config.door_chance) {
            connection.door = true;
            if self.locked_budget > 0 && self.rng.gen_bool(self.config.locked_chance) {
                connection.locked = true;
                connection.key_code = Some(Uuid::from_u64_pair(
                    self.rng.next_u64(),
                    self.rng.next_u64(),
                ));
            }
        }

        let locked = connection.locked;
        layout.add_connection(connection.clone());
        unvisited.push(coord);

        if locked {
            self.place_key(layout, &connection);
        }
    }

    /// Place the key for a freshly locked door, or unlock the door again if
    /// no legal spot exists (fail-open, not fatal).
    ///
    /// Candidates are gathered by walking every leaf's parent chain back to
    /// the start; the collected list is cleared whenever the walk passes the
    /// door's far-side coordinate, so nothing beyond the door ever qualifies.
    fn place_key(&mut self, layout: &mut Layout, door: &Connection) {
        let far_side = door.other;

        let mut seen = HashSet::new();
        let mut candidates: Vec<Coordinate> = Vec::new();
        for leaf in layout.leaves() {
            let mut collected: Vec<Coordinate> = Vec::new();
            for coord in layout.parent_chain(leaf.coord) {
                if coord == far_side {
                    collected.clear();
                } else {
                    collected.push(coord);
                }
            }
            for coord in collected {
                if seen.insert(coord) {
                    candidates.push(coord);
                }
            }
        }
        candidates.sort_unstable();

        match (candidates.choose(&mut self.rng), door.key_code) {
            (Some(&coord), Some(code)) => {
                layout.keys.push(Key {
                    coord,
                    code,
                    door: door.clone(),
                });
                self.locked_budget -= 1;
            }
            _ => {
                warn!(
                    door = %door.other,
                    "no legal key placement, door left unlocked"
                );
                if let Some(conn) = layout
                    .connections
                    .iter_mut()
                    .find(|c| c.joins(door.coord, door.other))
                {
                    conn.locked = false;
                    conn.key_code = None;
                }
            }
        }
    }

    /// Select the single exit cell: prefer leaves far from the start, then
    /// any leaf, then any cell at all — always excluding the start itself.
    fn set_exit(&mut self, layout: &mut Layout) {
        let start = layout.start;
        let min_distance = self.config.exit_min_distance;

        let leaves: Vec<Coordinate> = layout
            .leaves()
            .iter()
            .filter(|c| c.coord != start)
            .map(|c| c.coord)
            .collect();
        let far: Vec<Coordinate> = leaves
            .iter()
            .copied()
            .filter(|c| c.manhattan(start) > min_distance)
            .collect();

        let mut pick = far.choose(&mut self.rng).copied();
        if pick.is_none() {
            pick = leaves.choose(&mut self.rng).copied();
        }
        if pick.is_none() {
            let mut others: Vec<Coordinate> = layout
                .cells
                .keys()
                .copied()
                .filter(|&c| c != start)
                .collect();
            others.sort_unstable();
            pick = others.choose(&mut self.rng).copied();
        }

        if let Some(coord) = pick {
            if let Some(cell) = layout.cells.get_mut(&coord) {
                cell.is_exit = true;
                layout.exit = Some(coord);
            }
        } else {
            debug!("single-cell layout, no exit set");
        }
    }
}
