//! Configuration for the Delve engine.
//!
//! Maps directly to `delve.toml`. Every tuned constant in the generator lives
//! here as a named field with a serde default; the probability and threshold
//! values are empirically tuned and carried as-is rather than re-derived.

use serde::{Deserialize, Serialize};

/// Top-level Delve configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DelveConfig {
    /// Layout growth tuning.
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Dungeon identity and content lists.
    #[serde(default)]
    pub dungeon: DungeonConfig,
    /// Description batching and retry policy.
    #[serde(default)]
    pub describe: DescribeConfig,
    /// Loot scatter tuning.
    #[serde(default)]
    pub loot: LootConfig,
}

impl DelveConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `DelveError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::DelveError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Tuning for the randomized layout growth algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Target cell count; branching tapers off as the layout approaches it.
    #[serde(default = "default_min_rooms")]
    pub min_rooms: usize,
    /// Probability that a new cell is a room rather than a corridor.
    #[serde(default = "default_room_chance")]
    pub room_chance: f64,
    /// Probability that the edge to a new cell's parent is a door.
    #[serde(default = "default_door_chance")]
    pub door_chance: f64,
    /// Probability that a door is locked (subject to the global budget).
    #[serde(default = "default_locked_chance")]
    pub locked_chance: f64,
    /// Hard cap on locked doors per generation run.
    #[serde(default = "default_max_locked_doors")]
    pub max_locked_doors: u32,
    /// Minimum Manhattan distance from the start for a preferred exit cell.
    #[serde(default = "default_exit_min_distance")]
    pub exit_min_distance: u32,
    /// Cell count (× `min_rooms`) above which at most two branches are added.
    #[serde(default = "default_taper_mid")]
    pub branch_taper_mid: f64,
    /// Cell count (× `min_rooms`) above which at most one branch is added.
    #[serde(default = "default_taper_late")]
    pub branch_taper_late: f64,
    /// Cell count (× `min_rooms`) at which growth stops entirely.
    #[serde(default = "default_taper_stop")]
    pub branch_taper_stop: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_rooms: 10,
            room_chance: 0.33,
            door_chance: 0.25,
            locked_chance: 0.15,
            max_locked_doors: 1,
            exit_min_distance: 5,
            branch_taper_mid: 1.0,
            branch_taper_late: 1.5,
            branch_taper_stop: 2.0,
        }
    }
}

/// Dungeon identity and the content lists the populators draw from.
///
/// This is the only part of a generated dungeon that round-trips through
/// JSON saves; layouts themselves are ephemeral and regenerated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DungeonConfig {
    /// Display name of the dungeon.
    #[serde(default = "default_dungeon_name")]
    pub name: String,
    /// Flavor description handed to the narrative backend.
    #[serde(default)]
    pub description: String,
    /// Mob races eligible to spawn, by catalogue name.
    #[serde(default)]
    pub races: Vec<String>,
    /// Items eligible to spawn, by catalogue name.
    #[serde(default)]
    pub items: Vec<String>,
    /// Deepest level the dungeon generates.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            name: "The Delve".to_string(),
            description: String::new(),
            races: Vec::new(),
            items: Vec::new(),
            max_depth: 10,
        }
    }
}

/// Batching and retry policy for the description collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeConfig {
    /// How many room stubs go into one backend request.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Attempts per batch before falling back to stub descriptions.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for DescribeConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            max_retries: 3,
        }
    }
}

/// Gold scatter tuning for levels below the entrance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootConfig {
    /// Upper bound on gold-bearing containers per level (roll is 0..=max).
    #[serde(default = "default_max_gold_piles")]
    pub max_gold_piles: u32,
    /// Base gold value; the actual amount scales with the zone's level.
    #[serde(default = "default_base_gold")]
    pub base_gold: u32,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            max_gold_piles: 5,
            base_gold: 50,
        }
    }
}

// ---------------------------------------------------------------------------
// serde default helpers
// ---------------------------------------------------------------------------

fn default_min_rooms() -> usize {
    10
}
fn default_room_chance() -> f64 {
    0.33
}
fn default_door_chance() -> f64 {
    0.25
}
fn default_locked_chance() -> f64 {
    0.15
}
fn default_max_locked_doors() -> u32 {
    1
}
fn default_exit_min_distance() -> u32 {
    5
}
fn default_taper_mid() -> f64 {
    1.0
}
fn default_taper_late() -> f64 {
    1.5
}
fn default_taper_stop() -> f64 {
    2.0
}
fn default_dungeon_name() -> String {
    "The Delve".to_string()
}
fn default_max_depth() -> u32 {
    10
}
fn default_batch_size() -> usize {
    10
}
fn default_max_retries() -> u32 {
    3
}
fn default_max_gold_piles() -> u32 {
    5
}
fn default_base_gold() -> u32 {
    50
}
