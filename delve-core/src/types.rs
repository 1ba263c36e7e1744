//! Core spatial types shared across the engine.
//!
//! [`Coordinate`] is the value type the whole world graph is keyed on: it is
//! `Copy`, hashable, ordered, and does component-wise arithmetic. Distance is
//! Manhattan distance — the growth algorithm only ever moves along axes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

// ---------------------------------------------------------------------------
// Coordinate
// ---------------------------------------------------------------------------

/// A position on the sparse 3D integer grid.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coordinate {
    /// West–east axis.
    pub x: i32,
    /// South–north axis.
    pub y: i32,
    /// Down–up axis (dungeon depth levels stack along z).
    pub z: i32,
}

impl Coordinate {
    /// The origin, `(0, 0, 0)`.
    pub const ORIGIN: Self = Self { x: 0, y: 0, z: 0 };

    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Manhattan distance to another coordinate.
    #[must_use]
    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) + self.z.abs_diff(other.z)
    }
}

impl Add for Coordinate {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Coordinate {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<i32> for Coordinate {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Coordinate {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// One of the six cardinal unit directions.
///
/// Layout growth only uses the four horizontal directions
/// ([`Direction::CARDINALS_XY`]); `Up`/`Down` exist for zone-to-zone travel
/// between depth levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards positive y.
    North,
    /// Towards positive x.
    East,
    /// Towards negative y.
    South,
    /// Towards negative x.
    West,
    /// Towards positive z.
    Up,
    /// Towards negative z.
    Down,
}

impl Direction {
    /// The four horizontal directions, in the order the generator probes them.
    pub const CARDINALS_XY: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// All six directions.
    pub const ALL: [Self; 6] = [
        Self::North,
        Self::East,
        Self::South,
        Self::West,
        Self::Up,
        Self::Down,
    ];

    /// The unit vector for this direction.
    #[must_use]
    pub const fn as_coordinate(self) -> Coordinate {
        match self {
            Self::North => Coordinate::new(0, 1, 0),
            Self::East => Coordinate::new(1, 0, 0),
            Self::South => Coordinate::new(0, -1, 0),
            Self::West => Coordinate::new(-1, 0, 0),
            Self::Up => Coordinate::new(0, 0, 1),
            Self::Down => Coordinate::new(0, 0, -1),
        }
    }

    /// Map a unit vector back to a direction. Returns `None` for anything
    /// that is not one of the six cardinal unit vectors.
    #[must_use]
    pub fn from_coordinate(coord: Coordinate) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_coordinate() == coord)
    }

    /// The opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Lowercase name as used in exit text ("north", "up", ...).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
