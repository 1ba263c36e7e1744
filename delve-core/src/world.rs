//! The story-scoped world context.
//!
//! A [`World`] owns every zone generated for one story/session — there is no
//! process-wide global state; anything that needs the world gets it passed
//! in. Only the materialized zone graph and the [`DungeonConfig`] round-trip
//! through JSON; generation graphs (cells, connections, keys) are ephemeral
//! and regenerated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::DungeonConfig;
use crate::error::{DelveError, Result};
use crate::types::{Coordinate, Direction};
use crate::zone::Zone;

/// Save-format version; bumped on breaking layout changes.
const SAVE_VERSION: u32 = 1;

/// The world: a dungeon config plus every zone generated for this story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// The dungeon's identity and content lists.
    pub config: DungeonConfig,
    zones: Vec<Zone>,
}

/// On-disk envelope around a saved world.
#[derive(Debug, Serialize, Deserialize)]
struct SaveFile {
    version: u32,
    saved_at: DateTime<Utc>,
    world: World,
}

impl World {
    /// Create an empty world for the given dungeon config.
    #[must_use]
    pub fn new(config: DungeonConfig) -> Self {
        Self {
            config,
            zones: Vec::new(),
        }
    }

    /// Insert a zone. Returns false (no-op) if a zone of that name already
    /// exists; callers must check the boolean.
    pub fn add_zone(&mut self, zone: Zone) -> bool {
        if self.zones.iter().any(|z| z.name == zone.name) {
            return false;
        }
        debug!(zone = %zone.name, "zone added to world");
        self.zones.push(zone);
        true
    }

    /// Look up a zone by name.
    #[must_use]
    pub fn get_zone(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.name == name)
    }

    /// Mutable lookup by name.
    pub fn get_zone_mut(&mut self, name: &str) -> Option<&mut Zone> {
        self.zones.iter_mut().find(|z| z.name == name)
    }

    /// Look up a zone that callers expect to exist.
    ///
    /// # Errors
    /// Returns `DelveError::ZoneNotFound` if no zone has that name.
    pub fn require_zone(&self, name: &str) -> Result<&Zone> {
        self.get_zone(name)
            .ok_or_else(|| DelveError::ZoneNotFound(name.to_string()))
    }

    /// The first zone whose bounding box contains the coordinate.
    #[must_use]
    pub fn zone_at(&self, coord: Coordinate) -> Option<&Zone> {
        self.zones.iter().find(|z| z.contains(coord))
    }

    /// Resolve a zone's neighbor link to the actual zone.
    #[must_use]
    pub fn neighbor_of(&self, zone: &Zone, direction: Direction) -> Option<&Zone> {
        zone.neighbor(direction).and_then(|name| self.get_zone(name))
    }

    /// All zones, in insertion (generation) order.
    #[must_use]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Serialize the world to a JSON save string.
    ///
    /// # Errors
    /// Returns `DelveError::Save` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        let save = SaveFile {
            version: SAVE_VERSION,
            saved_at: Utc::now(),
            world: self.clone(),
        };
        serde_json::to_string_pretty(&save).map_err(|e| DelveError::Save(e.to_string()))
    }

    /// Restore a world from a JSON save string.
    ///
    /// # Errors
    /// Returns `DelveError::Save` on malformed JSON or a version mismatch.
    pub fn from_json(json: &str) -> Result<Self> {
        let save: SaveFile =
            serde_json::from_str(json).map_err(|e| DelveError::Save(e.to_string()))?;
        if save.version != SAVE_VERSION {
            return Err(DelveError::Save(format!(
                "unsupported save version {} (expected {SAVE_VERSION})",
                save.version
            )));
        }
        Ok(save.world)
    }

    /// Save the world to a file.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), zones = self.zones.len(), "world saved");
        Ok(())
    }

    /// Load a world from a file.
    ///
    /// # Errors
    /// Returns an error if the read or deserialization fails.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let world = Self::from_json(&content)?;
        info!(path = %path.display(), zones = world.zones.len(), "world loaded");
        Ok(world)
    }
}
