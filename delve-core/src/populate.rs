//! The mob/item population collaborator boundary.
//!
//! Population runs after a level is materialized: a [`Populator`] consumes
//! the zone's race/item lists plus the generated layout and returns spawner
//! bindings for specific locations. The default [`CataloguePopulator`] binds
//! one mob spawner and one item spawner to every leaf location, drawing
//! templates from a name-keyed catalogue.

use std::collections::HashMap;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::layout::Layout;
use crate::zone::Zone;

// ---------------------------------------------------------------------------
// Spawners
// ---------------------------------------------------------------------------

/// What a spawner produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnerKind {
    /// Spawns mobs.
    Mob,
    /// Spawns items.
    Item,
}

/// A content spawner bound to a specific location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    /// Mob or item spawner.
    pub kind: SpawnerKind,
    /// Catalogue name of what gets spawned.
    pub name: String,
    /// Name of the location this spawner is bound to.
    pub location: String,
    /// Maximum simultaneously active spawns.
    pub max_active: u32,
    /// Chance per spawn tick that a new spawn appears.
    pub spawn_chance: f64,
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// A spawnable mob archetype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobTemplate {
    /// Catalogue name.
    pub name: String,
    /// Base level.
    pub level: u32,
    /// Attacks on sight.
    pub aggressive: bool,
}

/// A spawnable item archetype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTemplate {
    /// Catalogue name.
    pub name: String,
    /// Base gold value.
    pub value: u32,
}

/// Name-keyed lookup of spawnable content.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    mobs: HashMap<String, MobTemplate>,
    items: HashMap<String, ItemTemplate>,
}

impl Catalogue {
    /// Create an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mob template under its own name.
    pub fn add_mob(&mut self, template: MobTemplate) {
        self.mobs.insert(template.name.clone(), template);
    }

    /// Register an item template under its own name.
    pub fn add_item(&mut self, template: ItemTemplate) {
        self.items.insert(template.name.clone(), template);
    }

    /// Look up a mob template.
    #[must_use]
    pub fn mob(&self, name: &str) -> Option<&MobTemplate> {
        self.mobs.get(name)
    }

    /// Look up an item template.
    #[must_use]
    pub fn item(&self, name: &str) -> Option<&ItemTemplate> {
        self.items.get(name)
    }
}

// ---------------------------------------------------------------------------
// Populator
// ---------------------------------------------------------------------------

/// A swappable source of content spawners for a freshly generated level.
pub trait Populator {
    /// Produce spawners for the given zone and layout. An empty vec is a
    /// valid answer (nothing eligible to spawn).
    fn populate(&mut self, zone: &Zone, layout: &Layout) -> Vec<Spawner>;
}

/// Default populator: one mob and one item spawner per leaf location, chosen
/// from the zone's race/item lists via the catalogue.
pub struct CataloguePopulator {
    catalogue: Catalogue,
    rng: ChaCha8Rng,
}

impl CataloguePopulator {
    /// Create a populator over the given catalogue, seeded for
    /// reproducible choices.
    #[must_use]
    pub fn new(catalogue: Catalogue, seed: u64) -> Self {
        Self {
            catalogue,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Populator for CataloguePopulator {
    fn populate(&mut self, zone: &Zone, layout: &Layout) -> Vec<Spawner> {
        // Zone lists name content; only catalogued entries are spawnable.
        let races: Vec<&MobTemplate> = zone
            .races
            .iter()
            .filter_map(|name| self.catalogue.mob(name))
            .collect();
        let items: Vec<&ItemTemplate> = zone
            .items
            .iter()
            .filter_map(|name| self.catalogue.item(name))
            .collect();

        if races.is_empty() && items.is_empty() {
            debug!(zone = %zone.name, "nothing catalogued to spawn");
            return Vec::new();
        }

        let mut spawners = Vec::new();
        for leaf in layout.leaves() {
            let Some(location) = zone.location_at(leaf.coord) else {
                warn!(coord = %leaf.coord, "leaf cell has no materialized location");
                continue;
            };

            if let Some(mob) = races.choose(&mut self.rng) {
                spawners.push(Spawner {
                    kind: SpawnerKind::Mob,
                    name: mob.name.clone(),
                    location: location.name.clone(),
                    max_active: 1 + zone.level / 3,
                    spawn_chance: 0.5,
                });
            }
            if let Some(item) = items.choose(&mut self.rng) {
                spawners.push(Spawner {
                    kind: SpawnerKind::Item,
                    name: item.name.clone(),
                    location: location.name.clone(),
                    max_active: 1,
                    spawn_chance: 0.3,
                });
            }
        }
        spawners
    }
}
