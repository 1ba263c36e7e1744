//! # Delve Core Library
//!
//! Deterministic dungeon generation engine for an LLM-narrated MUD.
//!
//! The pipeline, leaves first:
//!
//! - [`types::Coordinate`] — the sparse 3D integer grid everything is keyed on
//! - [`layout`] — the abstract generated graph: cells, connections, keys
//! - [`layout::LayoutGenerator`] — randomized recursive growth producing a
//!   [`layout::Layout`] from a seed
//! - [`zone::Zone`] — a spatially-bounded set of concrete [`zone::Location`]s
//! - [`world::World`] — story-scoped registry of zones, JSON save/load
//! - [`dungeon::Dungeon`] — orchestrator that turns successive layouts into
//!   playable, connected, populated zones per depth level
//!
//! Narrative text comes from a swappable [`describe::Describer`] collaborator;
//! mob and item spawners come from a swappable [`populate::Populator`]. Both
//! have offline implementations so generation is fully testable without
//! network I/O, and a degraded backend always yields a smaller but still
//! valid, fully-connected dungeon.
//!
//! ## Determinism Contract
//!
//! Given the same seed and configuration, [`layout::LayoutGenerator::generate`]
//! produces an identical [`layout::Layout`], and [`dungeon::Dungeon`] produces
//! an identical world graph (modulo narrative text from the backend).

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod describe;
pub mod dungeon;
pub mod error;
pub mod layout;
pub mod populate;
pub mod types;
pub mod world;
pub mod zone;

pub use config::{DelveConfig, DungeonConfig, LayoutConfig};
pub use describe::{DescribeError, DescribeRequest, Describer, RoomDescription, RoomStub};
pub use dungeon::Dungeon;
pub use error::DelveError;
pub use layout::{Cell, Connection, Key, Layout, LayoutGenerator};
pub use populate::{Populator, Spawner};
pub use types::{Coordinate, Direction};
pub use world::World;
pub use zone::{Location, Zone};
