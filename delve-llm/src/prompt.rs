//! Prompt templates for room description batches.
//!
//! The built-in templates live here as constants; a custom template can be
//! loaded from a TOML file instead, so narration can be re-tuned without
//! recompiling.

use serde::Deserialize;

use delve_core::describe::DescribeRequest;

use crate::error::LlmError;

/// System prompt for room-batch description.
pub const ROOM_BATCH_SYSTEM: &str = r#"You are the narrator of a text-based dungeon crawl.
You write terse, atmospheric room names and descriptions.

RULES:
- Names are 1-4 words, evocative, no articles ("Flooded Gallery", not "The Flooded Gallery").
- Descriptions are 1-3 sentences, second person, present tense.
- Never mention game mechanics, stats, or the existence of a map.
- Rooms marked "Entrance" are the way in; rooms marked "Descent" lead deeper.
- Your response must be valid JSON: an array of objects, one per requested room,
  each with integer "index", string "name", and string "description"."#;

/// User prompt for room-batch description.
pub const ROOM_BATCH_USER: &str = r#"The dungeon region is "{zone_name}", difficulty level {level}.
The mood here is {mood_word}. This batch is on depth {depth} of {max_depth}; {depth_word}.

Describe these rooms:
{stubs_json}

Return a JSON array with one entry per room, keeping each room's "index"."#;

/// Replace `{key}` placeholders with the corresponding values.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

/// Wording for the zone's mood scalar.
#[must_use]
pub fn mood_word(mood: i32) -> &'static str {
    match mood {
        i32::MIN..=-6 => "murderously hostile",
        -5..=-2 => "menacing and unwelcoming",
        -1..=1 => "still and indifferent",
        2..=5 => "strangely peaceful",
        _ => "warm and inviting",
    }
}

/// Pacing wording for how deep this level sits in the dungeon.
#[must_use]
pub fn depth_word(depth: u32, max_depth: u32) -> &'static str {
    if depth == 0 {
        "this is the surface threshold, still touched by daylight"
    } else if depth.saturating_mul(2) < max_depth {
        "the surface is a memory, but the worst is further down"
    } else {
        "this is close to the dungeon's black heart"
    }
}

/// Render the full `(system, user)` prompt pair for a batch request.
///
/// # Errors
/// Returns `LlmError::ConfigError` if the stubs cannot be serialized, which
/// only happens on an empty or internally inconsistent request.
pub fn render_batch(
    template: &PromptTemplate,
    request: &DescribeRequest,
) -> Result<(String, String), LlmError> {
    let stubs_json = serde_json::to_string_pretty(&request.stubs)
        .map_err(|e| LlmError::ConfigError(format!("unserializable stubs: {e}")))?;
    let level = request.zone.level.to_string();
    let depth = request.depth.to_string();
    let max_depth = request.max_depth.to_string();

    let vars: &[(&str, &str)] = &[
        ("zone_name", &request.zone.name),
        ("level", &level),
        ("mood_word", mood_word(request.zone.mood)),
        ("depth", &depth),
        ("max_depth", &max_depth),
        ("depth_word", depth_word(request.depth, request.max_depth)),
        ("stubs_json", &stubs_json),
    ];
    Ok((
        render_template(&template.system, vars),
        render_template(&template.user, vars),
    ))
}

// ---------------------------------------------------------------------------
// Loadable templates
// ---------------------------------------------------------------------------

/// TOML file wrapper: `[prompt]` section.
#[derive(Debug, Deserialize)]
struct TomlPromptFile {
    prompt: TomlPromptData,
}

#[derive(Debug, Deserialize)]
struct TomlPromptData {
    version: String,
    system: String,
    user: String,
}

/// A ready-to-render prompt template.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// Template version string ("builtin" for the compiled-in default).
    pub version: String,
    /// System prompt with `{key}` placeholders.
    pub system: String,
    /// User prompt with `{key}` placeholders.
    pub user: String,
}

impl PromptTemplate {
    /// The compiled-in room-batch template.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            version: "builtin".to_string(),
            system: ROOM_BATCH_SYSTEM.to_string(),
            user: ROOM_BATCH_USER.to_string(),
        }
    }

    /// Load a template from a TOML file with a `[prompt]` section holding
    /// `version`, `system`, and `user` keys.
    ///
    /// # Errors
    /// Returns `LlmError::ConfigError` if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, LlmError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LlmError::ConfigError(format!("failed to read {}: {e}", path.display())))?;
        let parsed: TomlPromptFile = toml::from_str(&content)
            .map_err(|e| LlmError::ConfigError(format!("failed to parse {}: {e}", path.display())))?;
        Ok(Self {
            version: parsed.prompt.version,
            system: parsed.prompt.system,
            user: parsed.prompt.user,
        })
    }
}
