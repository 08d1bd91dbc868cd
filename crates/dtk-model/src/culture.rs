//! Culture identifiers and their fallback edges.

use serde::{Deserialize, Serialize};

/// One supported culture and the culture to consult when it lacks a handler.
///
/// Culture ids follow the ISO pattern: `"en"`, `"en-US"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CultureIdFallback {
    pub culture_id: String,
    #[serde(default)]
    pub fallback_culture_id: Option<String>,
}

impl CultureIdFallback {
    pub fn new(culture_id: impl Into<String>, fallback_culture_id: Option<&str>) -> Self {
        Self {
            culture_id: culture_id.into(),
            fallback_culture_id: fallback_culture_id.map(str::to_string),
        }
    }

    /// The language part of this culture id.
    pub fn language_code(&self) -> &str {
        culture_language_code(&self.culture_id)
    }
}

/// Returns the text before the first `-`, or the whole id when there is none.
///
/// An id that starts with `-` is returned unchanged.
pub fn culture_language_code(culture_id: &str) -> &str {
    match culture_id.find('-') {
        Some(0) | None => culture_id,
        Some(pos) => &culture_id[..pos],
    }
}
