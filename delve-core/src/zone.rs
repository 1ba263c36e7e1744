//! Zones and the concrete locations inside them.
//!
//! A [`Zone`] is a spatially-bounded region of world-space: a center, an xy
//! radius, a z radius, and the set of materialized [`Location`]s that live
//! inside it, together with the level/mood/race/item metadata the populators
//! consult. Zones link to their six cardinal neighbors lazily, by name;
//! symmetry is not required at generation time.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DelveError, Result};
use crate::types::{Coordinate, Direction};

// ---------------------------------------------------------------------------
// Locations and exits
// ---------------------------------------------------------------------------

/// Lock state carried by a door-type exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorState {
    /// Whether the door is currently locked.
    pub locked: bool,
    /// Key code required to unlock, if any.
    pub key_code: Option<Uuid>,
}

/// A directed link from one location to another.
///
/// Exits are stored keyed by *target location name*; an undirected passage
/// is represented by one exit on each side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    /// Travel direction as seen from the owning location.
    pub direction: Direction,
    /// Name of the location this exit leads to.
    pub target: String,
    /// Present iff this exit is a door rather than an open passage.
    pub door: Option<DoorState>,
}

/// A fixed object materialized into a location during generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Fixture {
    /// A key opening the locked door with the matching code.
    Key {
        /// Code matching a door's `key_code`.
        code: Uuid,
    },
    /// A gold-bearing container.
    GoldCache {
        /// Flavor name of the container.
        name: String,
        /// Gold value inside.
        gold: u32,
    },
}

/// A concrete, playable room materialized from a layout cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Unique name within the owning zone.
    pub name: String,
    /// Narrative description (possibly a stub if the backend degraded).
    pub description: String,
    /// Grid coordinate this location was materialized at.
    pub coord: Coordinate,
    /// Outgoing exits, keyed by target location name.
    pub exits: HashMap<String, Exit>,
    /// Keys and containers placed here during generation.
    pub fixtures: Vec<Fixture>,
}

impl Location {
    /// Create a location with no exits or fixtures yet.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, coord: Coordinate) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            coord,
            exits: HashMap::new(),
            fixtures: Vec::new(),
        }
    }

    /// The exit leaving in the given direction, if any.
    #[must_use]
    pub fn exit_towards(&self, direction: Direction) -> Option<&Exit> {
        self.exits.values().find(|e| e.direction == direction)
    }
}

// ---------------------------------------------------------------------------
// Zone
// ---------------------------------------------------------------------------

/// A named region of world-space owning a set of locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Unique zone name within the world.
    pub name: String,
    /// Center of the zone's bounding box.
    pub center: Coordinate,
    /// Horizontal radius (x and y).
    pub size: u32,
    /// Vertical radius (z).
    pub size_z: u32,
    /// Difficulty level; scales spawned content and loot.
    pub level: u32,
    /// Friendliness: negative is hostile, positive is welcoming.
    pub mood: i32,
    /// Mob races eligible to spawn here, by catalogue name.
    pub races: Vec<String>,
    /// Items eligible to spawn here, by catalogue name.
    pub items: Vec<String>,
    locations: HashMap<String, Location>,
    neighbors: HashMap<Direction, String>,
}

impl Zone {
    /// Create an empty zone.
    #[must_use]
    pub fn new(name: impl Into<String>, center: Coordinate, size: u32, size_z: u32) -> Self {
        Self {
            name: name.into(),
            center,
            size,
            size_z,
            level: 1,
            mood: 0,
            races: Vec::new(),
            items: Vec::new(),
            locations: HashMap::new(),
            neighbors: HashMap::new(),
        }
    }

    /// Insert a location. Returns false (idempotent no-op) if a location of
    /// that name already exists.
    pub fn add_location(&mut self, location: Location) -> bool {
        if self.locations.contains_key(&location.name) {
            return false;
        }
        self.locations.insert(location.name.clone(), location);
        true
    }

    /// Look up a location by name.
    #[must_use]
    pub fn get_location(&self, name: &str) -> Option<&Location> {
        self.locations.get(name)
    }

    /// Mutable lookup by name.
    pub fn get_location_mut(&mut self, name: &str) -> Option<&mut Location> {
        self.locations.get_mut(name)
    }

    /// Look up a location that callers expect to exist.
    ///
    /// # Errors
    /// Returns `DelveError::LocationNotFound` if no location has that name.
    pub fn require_location(&self, name: &str) -> Result<&Location> {
        self.get_location(name)
            .ok_or_else(|| DelveError::LocationNotFound(name.to_string()))
    }

    /// The location materialized at a grid coordinate, if any.
    #[must_use]
    pub fn location_at(&self, coord: Coordinate) -> Option<&Location> {
        self.locations.values().find(|l| l.coord == coord)
    }

    /// Iterate all locations (unspecified order).
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    /// Number of materialized locations.
    #[must_use]
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Whether the zone has no locations yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Whether `coord` sits on (or beyond) the zone boundary along the given
    /// direction: along any axis where the direction is non-zero, the
    /// absolute offset from the center reaches the zone radius. Movement in
    /// that direction should cross into (or generate) a neighboring zone.
    #[must_use]
    pub fn on_edge(&self, coord: Coordinate, direction: Direction) -> bool {
        let delta = coord - self.center;
        let unit = direction.as_coordinate();

        (unit.x != 0 && delta.x.unsigned_abs() >= self.size)
            || (unit.y != 0 && delta.y.unsigned_abs() >= self.size)
            || (unit.z != 0 && delta.z.unsigned_abs() >= self.size_z)
    }

    /// Whether the coordinate lies within the zone's bounding box.
    #[must_use]
    pub fn contains(&self, coord: Coordinate) -> bool {
        let delta = coord - self.center;
        delta.x.unsigned_abs() <= self.size
            && delta.y.unsigned_abs() <= self.size
            && delta.z.unsigned_abs() <= self.size_z
    }

    /// The name of the neighboring zone in the given direction, if linked.
    #[must_use]
    pub fn neighbor(&self, direction: Direction) -> Option<&str> {
        self.neighbors.get(&direction).map(String::as_str)
    }

    /// Link a neighboring zone by name. Links are one-way; callers wanting
    /// symmetry set both sides.
    pub fn set_neighbor(&mut self, direction: Direction, zone_name: impl Into<String>) {
        self.neighbors.insert(direction, zone_name.into());
    }
}
