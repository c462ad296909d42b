//! Level records and their JSON format.
//!
//! ```json
//! { "id": "level1", "name": "First Bite", "description": "optional",
//!   "grid": [["1","1"], "10"] }
//! ```
//!
//! Each grid row is either an array of one-character strings or a single
//! string; all rows share one length. Levels serialize rows as strings.

use serde::{Deserialize, Serialize};

use crate::error::LevelError;
use crate::grid::Grid;

/// An immutable puzzle level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub grid: Grid,
}

impl Level {
    pub fn new(id: impl Into<String>, name: impl Into<String>, grid: Grid) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            grid,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Parses and validates a level from JSON text.
    pub fn from_json(text: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
