//! The description collaborator boundary.
//!
//! Narrative text generation is an external, unreliable service: it may be
//! slow, return fewer rooms than asked, or garble the batch entirely. The
//! core only depends on the [`Describer`] trait; the retry-and-fallback
//! policy lives in the dungeon driver, and [`fallback_descriptions`] makes a
//! degraded backend invisible to connectivity — the dungeon is always fully
//! built and playable even when every batch fails.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A room awaiting description, as sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomStub {
    /// Position of the room within the batch.
    pub index: usize,
    /// Suggested name ("Entrance", "Room", "Hallway"); the backend may
    /// override it.
    pub name: Option<String>,
    /// Pre-existing description to preserve or enrich, if any.
    pub description: Option<String>,
}

/// The canonical described room every accepted backend shape normalizes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDescription {
    /// Batch index this description answers.
    pub index: usize,
    /// Final room name.
    pub name: String,
    /// Final room description.
    pub description: String,
}

/// Zone metadata forwarded so the backend can match tone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneInfo {
    /// Zone name.
    pub name: String,
    /// Friendliness (negative is hostile).
    pub mood: i32,
    /// Difficulty level.
    pub level: u32,
}

/// One batch request to the description backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescribeRequest {
    /// The rooms to describe.
    pub stubs: Vec<RoomStub>,
    /// Tone metadata for the owning zone.
    pub zone: ZoneInfo,
    /// Depth of the level being described.
    pub depth: u32,
    /// Deepest level the dungeon will reach (for pacing the tone).
    pub max_depth: u32,
}

/// Why a batch could not be described.
#[derive(Error, Debug)]
pub enum DescribeError {
    /// The backend itself failed (network, provider, timeout).
    #[error("description backend failure: {0}")]
    Backend(String),
    /// The backend answered, but the batch shape was unusable.
    #[error("invalid description batch: {0}")]
    InvalidBatch(String),
}

/// A swappable source of room descriptions.
///
/// Implementations may return partial results; the dungeon driver reconciles
/// them against the requested stubs. Returning `Err` marks the whole batch
/// invalid and eligible for retry.
pub trait Describer {
    /// Describe one batch of rooms.
    ///
    /// # Errors
    /// Returns a [`DescribeError`] when the batch should be retried.
    fn describe(
        &mut self,
        request: &DescribeRequest,
    ) -> Result<Vec<RoomDescription>, DescribeError>;
}

/// Offline describer returning plain stub text. Used as the fallback when
/// the real backend is degraded, and directly in tests and benches.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubDescriber;

impl Describer for StubDescriber {
    fn describe(
        &mut self,
        request: &DescribeRequest,
    ) -> Result<Vec<RoomDescription>, DescribeError> {
        Ok(fallback_descriptions(&request.stubs))
    }
}

/// Generic descriptions for a batch of stubs, used when the backend has
/// exhausted its retries. Names fall back to "Room"; descriptions to a
/// featureless line derived from the name.
#[must_use]
pub fn fallback_descriptions(stubs: &[RoomStub]) -> Vec<RoomDescription> {
    stubs.iter().map(fallback_for).collect()
}

/// The generic description for a single stub.
#[must_use]
pub fn fallback_for(stub: &RoomStub) -> RoomDescription {
    let name = stub.name.clone().unwrap_or_else(|| "Room".to_string());
    let description = stub.description.clone().unwrap_or_else(|| {
        format!("There is nothing remarkable about this {}.", name.to_lowercase())
    });
    RoomDescription {
        index: stub.index,
        name,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_covers_every_stub_in_order() {
        let stubs = vec![
            RoomStub {
                index: 0,
                name: Some("Entrance".to_string()),
                description: None,
            },
            RoomStub {
                index: 1,
                name: None,
                description: None,
            },
            RoomStub {
                index: 2,
                name: Some("Hallway".to_string()),
                description: Some("A draft blows through.".to_string()),
            },
        ];

        let descs = fallback_descriptions(&stubs);
        assert_eq!(descs.len(), 3);
        assert_eq!(descs[0].name, "Entrance");
        assert_eq!(descs[1].name, "Room");
        assert_eq!(descs[2].description, "A draft blows through.");
        assert!(descs[0].description.contains("entrance"));
    }

    #[test]
    fn stub_describer_answers_every_request() {
        let request = DescribeRequest {
            stubs: vec![RoomStub {
                index: 0,
                name: Some("Room".to_string()),
                description: None,
            }],
            zone: ZoneInfo {
                name: "crypt".to_string(),
                mood: -2,
                level: 3,
            },
            depth: 1,
            max_depth: 10,
        };

        let descs = StubDescriber.describe(&request).expect("stub never fails");
        assert_eq!(descs.len(), 1);
        assert_eq!(descs[0].index, 0);
    }
}
