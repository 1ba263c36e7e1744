//! The dungeon orchestrator.
//!
//! [`Dungeon`] turns successive layouts into playable zones: it runs the
//! layout generator per depth level, requests narrative text in batches,
//! materializes a [`Location`] per cell, wires exits and doors from the
//! layout's connections, binds content spawners to leaf locations, and
//! scatters gold below the entrance level.
//!
//! The describer and populator are injected at construction; the orchestrator
//! never talks to a backend directly, and a degraded backend only ever costs
//! narrative quality — connectivity is guaranteed locally.

use std::collections::HashMap;

use rand::Rng;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::config::DelveConfig;
use crate::describe::{
    DescribeRequest, Describer, RoomDescription, RoomStub, ZoneInfo, fallback_descriptions,
    fallback_for,
};
use crate::layout::{Cell, Layout, LayoutGenerator};
use crate::populate::{Populator, Spawner};
use crate::types::{Coordinate, Direction};
use crate::world::World;
use crate::zone::{DoorState, Exit, Fixture, Location, Zone};

/// Flavor names for scattered gold containers.
const CONTAINER_NAMES: [&str; 4] = ["dusty urn", "rotting crate", "small chest", "burial jar"];

/// Orchestrates generation of one dungeon, level by level.
pub struct Dungeon {
    config: DelveConfig,
    seed: u64,
    describer: Box<dyn Describer>,
    populator: Box<dyn Populator>,
    /// Names of generated level zones, in depth order.
    levels: Vec<String>,
    /// All spawners registered across generated levels.
    spawners: Vec<Spawner>,
    /// Zone and location name of the dungeon entrance, once materialized.
    entrance: Option<(String, String)>,
    current_depth: u32,
    /// Denormalized coordinate → location-name cache used during connection
    /// resolution. Not authoritative: every successful zone insertion updates
    /// it in the same step, and it is extended on every `generate_level`.
    grid: HashMap<Coordinate, String>,
    rng: ChaCha8Rng,
}

impl Dungeon {
    /// Create a dungeon orchestrator with injected collaborators.
    #[must_use]
    pub fn new(
        config: DelveConfig,
        seed: u64,
        describer: Box<dyn Describer>,
        populator: Box<dyn Populator>,
    ) -> Self {
        Self {
            config,
            seed,
            describer,
            populator,
            levels: Vec::new(),
            spawners: Vec::new(),
            entrance: None,
            current_depth: 0,
            grid: HashMap::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generate one depth level into `zone`.
    ///
    /// Idempotent by design: a zone that already has locations is left
    /// untouched and `true` is returned, so repeated entry into a
    /// partially-built dungeon never regenerates content.
    pub fn generate_level(&mut self, zone: &mut Zone, depth: u32) -> bool {
        if !zone.is_empty() {
            debug!(zone = %zone.name, "zone already populated, skipping generation");
            return true;
        }

        let level_seed = self
            .seed
            .wrapping_add(u64::from(depth).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        let mut generator = LayoutGenerator::new(self.config.layout.clone(), level_seed);
        let start = Coordinate::new(0, 0, i32::try_from(depth).unwrap_or(i32::MAX));
        let mut layout = generator.generate(start);

        if depth == 0 {
            if let Some(cell) = layout.cells.get_mut(&layout.start) {
                cell.is_dungeon_entrance = true;
            }
        }

        self.build_level(zone, &layout, depth)
    }

    /// Materialize an already-generated layout into `zone`: describe,
    /// create locations, wire connections, place keys, populate, loot.
    ///
    /// Exposed separately from [`Dungeon::generate_level`] so callers (and
    /// tests) can drive materialization from a hand-built layout.
    pub fn build_level(&mut self, zone: &mut Zone, layout: &Layout, depth: u32) -> bool {
        // Start cell first so the dungeon entrance is the zone's first
        // materialized location; the rest sorted for determinism.
        let mut ordered: Vec<&Cell> = layout.cells.values().collect();
        ordered.sort_by_key(|c| (c.coord != layout.start, c.coord));

        let stubs: Vec<RoomStub> = ordered
            .iter()
            .enumerate()
            .map(|(index, cell)| RoomStub {
                index,
                name: Some(Self::stub_name(cell).to_string()),
                description: None,
            })
            .collect();
        let descriptions = self.describe_all(&stubs, zone, depth);

        let mut first_name = None;
        for (cell, desc) in ordered.iter().zip(&descriptions) {
            let name = Self::unique_name(zone, &desc.name);
            let location = Location::new(name.clone(), desc.description.clone(), cell.coord);
            if zone.add_location(location) {
                // Cache stays in lockstep with every zone insertion, or
                // connection resolution would silently miss locations.
                self.grid.insert(cell.coord, name.clone());
            }
            first_name.get_or_insert(name);
        }

        self.connect_locations(zone, layout);
        self.place_keys(zone, layout);

        let mut spawners = self.populator.populate(zone, layout);
        debug!(zone = %zone.name, spawners = spawners.len(), "level populated");
        self.spawners.append(&mut spawners);

        if depth > 0 {
            self.scatter_gold(zone);
        }

        if self.entrance.is_none() {
            if let Some(name) = first_name {
                self.entrance = Some((zone.name.clone(), name));
            }
        }
        self.levels.push(zone.name.clone());
        self.current_depth = self.current_depth.max(depth);

        info!(
            zone = %zone.name,
            depth,
            locations = zone.location_count(),
            "dungeon level generated"
        );
        true
    }

    /// The first location of the first generated zone, or `None` if nothing
    /// has been generated yet.
    #[must_use]
    pub fn get_entrance_location<'w>(&self, world: &'w World) -> Option<&'w Location> {
        let (zone_name, location_name) = self.entrance.as_ref()?;
        world.get_zone(zone_name)?.get_location(location_name)
    }

    /// Names of generated level zones, in depth order.
    #[must_use]
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// All spawners registered across generated levels.
    #[must_use]
    pub fn spawners(&self) -> &[Spawner] {
        &self.spawners
    }

    /// Deepest level generated so far.
    #[must_use]
    pub fn current_depth(&self) -> u32 {
        self.current_depth
    }

    // -----------------------------------------------------------------------
    // Description batching
    // -----------------------------------------------------------------------

    fn describe_all(&mut self, stubs: &[RoomStub], zone: &Zone, depth: u32) -> Vec<RoomDescription> {
        let batch_size = self.config.describe.batch_size.max(1);
        let mut all = Vec::with_capacity(stubs.len());
        for chunk in stubs.chunks(batch_size) {
            all.extend(self.describe_batch(chunk, zone, depth));
        }
        all
    }

    /// One batch against the backend: bounded retries, then stub fallback.
    /// Never fails — narrative degradation must not block generation.
    fn describe_batch(
        &mut self,
        stubs: &[RoomStub],
        zone: &Zone,
        depth: u32,
    ) -> Vec<RoomDescription> {
        let request = DescribeRequest {
            stubs: stubs.to_vec(),
            zone: ZoneInfo {
                name: zone.name.clone(),
                mood: zone.mood,
                level: zone.level,
            },
            depth,
            max_depth: self.config.dungeon.max_depth,
        };

        for attempt in 1..=self.config.describe.max_retries {
            match self.describer.describe(&request) {
                Ok(batch) => return Self::reconcile(stubs, batch),
                Err(e) => warn!(attempt, error = %e, "description batch failed"),
            }
        }
        warn!(rooms = stubs.len(), "description retries exhausted, using stub text");
        fallback_descriptions(stubs)
    }

    /// Align a backend answer with the requested stubs: match by index,
    /// fall back per missing or blank entry, ignore extras.
    fn reconcile(stubs: &[RoomStub], mut batch: Vec<RoomDescription>) -> Vec<RoomDescription> {
        if batch.len() != stubs.len() {
            warn!(
                expected = stubs.len(),
                got = batch.len(),
                "description count mismatch, reconciling by index"
            );
        }
        stubs
            .iter()
            .map(|stub| match batch.iter().position(|d| d.index == stub.index) {
                Some(pos) => {
                    let mut desc = batch.swap_remove(pos);
                    if desc.name.trim().is_empty() || desc.description.trim().is_empty() {
                        let fallback = fallback_for(stub);
                        if desc.name.trim().is_empty() {
                            desc.name = fallback.name;
                        }
                        if desc.description.trim().is_empty() {
                            desc.description = fallback.description;
                        }
                    }
                    desc
                }
                None => fallback_for(stub),
            })
            .collect()
    }

    fn stub_name(cell: &Cell) -> &'static str {
        if cell.is_dungeon_entrance || cell.is_entrance {
            "Entrance"
        } else if cell.is_exit {
            "Descent"
        } else if cell.is_room {
            "Room"
        } else {
            "Hallway"
        }
    }

    /// Disambiguate a location name within the zone: `Name`, `Name(1)`, ...
    fn unique_name(zone: &Zone, base: &str) -> String {
        if zone.get_location(base).is_none() {
            return base.to_string();
        }
        let mut suffix = 1;
        loop {
            let candidate = format!("{base}({suffix})");
            if zone.get_location(&candidate).is_none() {
                return candidate;
            }
            suffix += 1;
        }
    }

    // -----------------------------------------------------------------------
    // Connection resolution
    // -----------------------------------------------------------------------

    /// Wire exits between materialized locations from the layout's
    /// connections. A pair already connected in either direction is skipped,
    /// so no two locations ever hold more than one exit at each other.
    fn connect_locations(&self, zone: &mut Zone, layout: &Layout) {
        for conn in &layout.connections {
            let (Some(from_name), Some(to_name)) =
                (self.grid.get(&conn.coord), self.grid.get(&conn.other))
            else {
                warn!(
                    from = %conn.coord,
                    to = %conn.other,
                    "connection endpoint missing from location grid"
                );
                continue;
            };

            let already_wired = zone
                .get_location(from_name)
                .is_some_and(|l| l.exits.contains_key(to_name.as_str()))
                || zone
                    .get_location(to_name)
                    .is_some_and(|l| l.exits.contains_key(from_name.as_str()));
            if already_wired {
                continue;
            }

            let Some(direction) = Direction::from_coordinate(conn.other - conn.coord) else {
                warn!(from = %conn.coord, to = %conn.other, "connection is not axis-adjacent");
                continue;
            };
            let door = conn.door.then(|| DoorState {
                locked: conn.locked,
                key_code: conn.key_code,
            });

            if let Some(from) = zone.get_location_mut(from_name) {
                from.exits.insert(
                    to_name.clone(),
                    Exit {
                        direction,
                        target: to_name.clone(),
                        door: door.clone(),
                    },
                );
            }
            if let Some(to) = zone.get_location_mut(to_name) {
                to.exits.insert(
                    from_name.clone(),
                    Exit {
                        direction: direction.opposite(),
                        target: from_name.clone(),
                        door,
                    },
                );
            }
        }
    }

    /// Drop key fixtures into the locations the layout placed them at.
    fn place_keys(&self, zone: &mut Zone, layout: &Layout) {
        for key in &layout.keys {
            let Some(name) = self.grid.get(&key.coord) else {
                warn!(coord = %key.coord, "key coordinate missing from location grid");
                continue;
            };
            if let Some(location) = zone.get_location_mut(name) {
                location.fixtures.push(Fixture::Key { code: key.code });
            }
        }
    }

    // -----------------------------------------------------------------------
    // Loot
    // -----------------------------------------------------------------------

    /// Scatter 0..=max gold-bearing containers at random locations, value
    /// scaled by the zone's level.
    fn scatter_gold(&mut self, zone: &mut Zone) {
        let piles = self.rng.gen_range(0..=self.config.loot.max_gold_piles);
        if piles == 0 {
            return;
        }

        let mut names: Vec<String> = zone.locations().map(|l| l.name.clone()).collect();
        names.sort_unstable();

        for _ in 0..piles {
            let Some(name) = names.choose(&mut self.rng) else {
                return;
            };
            let gold = self.rng.gen_range(1..=self.config.loot.base_gold) * zone.level.max(1);
            let container = CONTAINER_NAMES
                .choose(&mut self.rng)
                .copied()
                .unwrap_or("dusty urn");
            if let Some(location) = zone.get_location_mut(name) {
                location.fixtures.push(Fixture::GoldCache {
                    name: container.to_string(),
                    gold,
                });
            }
        }
        debug!(zone = %zone.name, piles, "gold scattered");
    }
}
