//! Level catalogs: where the engine gets levels from by id.

use std::path::Path;

use rustc_hash::FxHashMap;

use crate::error::LevelError;
use crate::level::Level;
use crate::persistence;

/// Levels shipped with the crate, in play order.
const BUILTIN_LEVELS: [&str; 3] = [
    include_str!("../levels/level1.json"),
    include_str!("../levels/level2.json"),
    include_str!("../levels/level3.json"),
];

/// Anything that can materialize a level record from its id.
pub trait LevelSource {
    fn fetch(&self, id: &str) -> Result<Level, LevelError>;
}

/// An ordered in-memory collection of levels keyed by id.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    order: Vec<String>,
    levels: FxHashMap<String, Level>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog of built-in levels.
    pub fn builtin() -> Result<Self, LevelError> {
        let mut catalog = Self::new();
        for json in BUILTIN_LEVELS {
            catalog.insert(Level::from_json(json)?);
        }
        Ok(catalog)
    }

    /// Loads every level file in a directory.
    pub fn from_dir(dir: &Path) -> Result<Self, LevelError> {
        let mut catalog = Self::new();
        for level in persistence::load_dir(dir)? {
            catalog.insert(level);
        }
        log::info!("loaded {} levels from {}", catalog.len(), dir.display());
        Ok(catalog)
    }

    /// Adds a level at the end of the play order, or replaces the level
    /// with the same id in place.
    pub fn insert(&mut self, level: Level) {
        if !self.levels.contains_key(&level.id) {
            self.order.push(level.id.clone());
        }
        self.levels.insert(level.id.clone(), level);
    }

    pub fn get(&self, id: &str) -> Option<&Level> {
        self.levels.get(id)
    }

    /// Level ids in play order.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// Levels in play order.
    pub fn levels(&self) -> impl Iterator<Item = &Level> + '_ {
        self.order.iter().filter_map(|id| self.levels.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The id after `id` in play order, if any.
    pub fn next_id(&self, id: &str) -> Option<&str> {
        let position = self.order.iter().position(|candidate| candidate == id)?;
        self.order.get(position + 1).map(String::as_str)
    }

    /// The id before `id` in play order, if any.
    pub fn prev_id(&self, id: &str) -> Option<&str> {
        let position = self.order.iter().position(|candidate| candidate == id)?;
        position
            .checked_sub(1)
            .and_then(|previous| self.order.get(previous))
            .map(String::as_str)
    }
}

impl LevelSource for Catalog {
    fn fetch(&self, id: &str) -> Result<Level, LevelError> {
        self.get(id)
            .cloned()
            .ok_or_else(|| LevelError::UnknownLevel(id.to_string()))
    }
}
