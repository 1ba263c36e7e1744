//! The abstract generated graph: cells, connections, keys.
//!
//! A [`Layout`] is what the growth algorithm hands to the dungeon
//! orchestrator: a map of grid positions to generation metadata, the edges
//! between them, and any key placements. It is ephemeral — layouts are never
//! persisted, only the materialized zone graph is.

pub mod generator;

pub use generator::LayoutGenerator;

use std::collections::HashMap;

use uuid::Uuid;

use crate::types::Coordinate;

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// One grid position's generation-time metadata.
///
/// Exactly one cell exists per coordinate in a layout. `parent` forms a tree
/// rooted at the start coordinate: every non-root cell has exactly one
/// parent, set at creation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Grid position of this cell.
    pub coord: Coordinate,
    /// Parent coordinate in the growth tree; `None` only for the start cell.
    pub parent: Option<Coordinate>,
    /// Whether the growth walk has touched this cell.
    pub visited: bool,
    /// Rolled as a room (as opposed to a corridor).
    pub is_room: bool,
    /// Rolled as a corridor.
    pub is_corridor: bool,
    /// Entrance of this level.
    pub is_entrance: bool,
    /// Exit of this level; set exactly once per generation run.
    pub is_exit: bool,
    /// Entrance of the whole dungeon (depth 0 start).
    pub is_dungeon_entrance: bool,
    /// True iff this cell received zero child branches during growth.
    pub leaf: bool,
}

impl Cell {
    /// Create a fresh, unflagged cell. New cells start as leaves; the
    /// generator clears the flag on the parent when a child is attached.
    #[must_use]
    pub fn new(coord: Coordinate, parent: Option<Coordinate>) -> Self {
        Self {
            coord,
            parent,
            visited: false,
            is_room: false,
            is_corridor: false,
            is_entrance: false,
            is_exit: false,
            is_dungeon_entrance: false,
            leaf: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Connection & Key
// ---------------------------------------------------------------------------

/// An undirected edge between two adjacent cells — an open passage or a door.
///
/// `coord` is the parent side, `other` the child side of the growth edge.
/// At most one connection exists per unordered coordinate pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Parent-side endpoint.
    pub coord: Coordinate,
    /// Child-side endpoint.
    pub other: Coordinate,
    /// Whether this edge is a door rather than an open passage.
    pub door: bool,
    /// Whether the door is locked.
    pub locked: bool,
    /// Opaque key code a matching key must carry; set iff `locked`.
    pub key_code: Option<Uuid>,
}

impl Connection {
    /// An open passage between two cells.
    #[must_use]
    pub fn open(coord: Coordinate, other: Coordinate) -> Self {
        Self {
            coord,
            other,
            door: false,
            locked: false,
            key_code: None,
        }
    }

    /// Whether this connection joins the given unordered pair.
    #[must_use]
    pub fn joins(&self, a: Coordinate, b: Coordinate) -> bool {
        (self.coord == a && self.other == b) || (self.coord == b && self.other == a)
    }
}

/// A key placed somewhere in the graph, opening one locked door.
///
/// The placement invariant: the key's coordinate is never on the far (child)
/// side of its own door, so a player always passes the key's position before
/// the door can block them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    /// Where the key lies.
    pub coord: Coordinate,
    /// Code matching the door's `key_code`.
    pub code: Uuid,
    /// The locked door this key opens.
    pub door: Connection,
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// The generated graph for one dungeon level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    /// Every cell, keyed by coordinate. Never empty after construction.
    pub cells: HashMap<Coordinate, Cell>,
    /// Edges between adjacent cells; at most one per unordered pair.
    pub connections: Vec<Connection>,
    /// Keys placed for locked doors.
    pub keys: Vec<Key>,
    /// Root of the growth tree.
    pub start: Coordinate,
    /// The selected exit cell; set exactly once, never the start.
    pub exit: Option<Coordinate>,
}

impl Layout {
    /// Create a layout containing only the start cell, flagged as a room
    /// and entrance.
    #[must_use]
    pub fn new(start: Coordinate) -> Self {
        let mut cell = Cell::new(start, None);
        cell.visited = true;
        cell.is_room = true;
        cell.is_entrance = true;

        let mut cells = HashMap::new();
        cells.insert(start, cell);
        Self {
            cells,
            connections: Vec::new(),
            keys: Vec::new(),
            start,
            exit: None,
        }
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the layout has no cells. Always false for a constructed layout.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Leaf cells, sorted by coordinate for deterministic iteration.
    #[must_use]
    pub fn leaves(&self) -> Vec<&Cell> {
        let mut leaves: Vec<&Cell> = self.cells.values().filter(|c| c.leaf).collect();
        leaves.sort_by_key(|c| c.coord);
        leaves
    }

    /// The parent chain from `from` back to (and including) the start.
    ///
    /// Returns an empty vec if `from` is not in the layout. Chain length is
    /// bounded by the cell count, so a corrupt parent pointer cannot loop.
    #[must_use]
    pub fn parent_chain(&self, from: Coordinate) -> Vec<Coordinate> {
        let mut chain = Vec::new();
        let mut cursor = self.cells.get(&from);
        while let Some(cell) = cursor {
            chain.push(cell.coord);
            if chain.len() > self.cells.len() {
                break;
            }
            cursor = cell.parent.and_then(|p| self.cells.get(&p));
        }
        chain
    }

    /// The connection joining an unordered pair, if any.
    #[must_use]
    pub fn connection_between(&self, a: Coordinate, b: Coordinate) -> Option<&Connection> {
        self.connections.iter().find(|c| c.joins(a, b))
    }

    /// Insert a connection unless the pair is already joined in either
    /// orientation. Returns false on the duplicate no-op.
    pub fn add_connection(&mut self, connection: Connection) -> bool {
        if self
            .connection_between(connection.coord, connection.other)
            .is_some()
        {
            return false;
        }
        self.connections.push(connection);
        true
    }
}
