//! Tolerant parsing of room-description batches.
//!
//! Models rarely honor an output contract exactly, so the parser accepts
//! every shape observed in practice and normalizes all of them to the core's
//! `RoomDescription`:
//!
//! - a bare JSON array of room objects
//! - the array wrapped as `{"rooms": [...]}` or `{"locations": [...]}`
//! - `"index"` as an integer or a numeric string; missing indices fall back
//!   to array position
//! - `"title"` for `"name"`, `"desc"` or `"text"` for `"description"`
//! - the whole payload wrapped in a markdown code fence
//!
//! Anything else is rejected and the caller retries or falls back.

use serde::Deserialize;

use delve_core::describe::RoomDescription;

use crate::error::LlmError;

/// A room object as a model actually emits it.
#[derive(Debug, Deserialize)]
struct RawRoom {
    #[serde(default)]
    index: Option<RawIndex>,
    #[serde(default, alias = "title")]
    name: Option<String>,
    #[serde(default, alias = "desc", alias = "text")]
    description: Option<String>,
}

/// Batch indices arrive as numbers or numeric strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawIndex {
    Num(u64),
    Text(String),
}

impl RawIndex {
    fn resolve(&self) -> Option<usize> {
        match self {
            Self::Num(n) => usize::try_from(*n).ok(),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Every accepted top-level batch shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BatchShape {
    Bare(Vec<RawRoom>),
    Rooms { rooms: Vec<RawRoom> },
    Locations { locations: Vec<RawRoom> },
}

impl BatchShape {
    fn into_rooms(self) -> Vec<RawRoom> {
        match self {
            Self::Bare(rooms) | Self::Rooms { rooms } | Self::Locations { locations: rooms } => {
                rooms
            }
        }
    }
}

/// Parse a raw model answer into normalized room descriptions.
///
/// # Errors
/// Returns `LlmError::ParseError` if the text is not JSON at all, and
/// `LlmError::ShapeRejected` if it is JSON but matches no accepted shape or
/// contains no rooms.
pub fn parse_batch(text: &str) -> Result<Vec<RoomDescription>, LlmError> {
    let stripped = strip_code_fence(text);

    let value: serde_json::Value = serde_json::from_str(stripped)
        .map_err(|e| LlmError::ParseError(format!("{e} — raw text: '{}'", truncate(text, 200))))?;
    let shape: BatchShape = serde_json::from_value(value)
        .map_err(|e| LlmError::ShapeRejected(e.to_string()))?;

    let rooms = shape.into_rooms();
    if rooms.is_empty() {
        return Err(LlmError::ShapeRejected("batch contains no rooms".into()));
    }

    Ok(rooms
        .into_iter()
        .enumerate()
        .map(|(pos, raw)| RoomDescription {
            index: raw.index.as_ref().and_then(RawIndex::resolve).unwrap_or(pos),
            name: raw.name.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
        })
        .collect())
}

/// Strip a surrounding markdown code fence, with or without a language tag.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag line, then the closing fence.
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end().trim_end_matches("```").trim()
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
