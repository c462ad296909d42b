//! File I/O for level JSON files.
//!
//! A level directory holds one `<id>.json` file per level. Files are read
//! in file-name order so catalog order is stable across platforms.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LevelError;
use crate::level::Level;

const LEVEL_EXTENSION: &str = "json";

fn io_error(path: &Path, source: std::io::Error) -> LevelError {
    LevelError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Loads and validates a single level file.
pub fn load(path: &Path) -> Result<Level, LevelError> {
    let text = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    let level = Level::from_json(&text)?;
    log::debug!("loaded level {:?} from {}", level.id, path.display());
    Ok(level)
}

/// Writes a level as pretty-printed JSON.
pub fn save(level: &Level, path: &Path) -> Result<(), LevelError> {
    let json = level.to_json()?;
    fs::write(path, json + "\n").map_err(|e| io_error(path, e))
}

/// Loads every `*.json` level in a directory, sorted by file name.
pub fn load_dir(dir: &Path) -> Result<Vec<Level>, LevelError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| io_error(dir, e))?
        .map(|entry| entry.map(|e| e.path()).map_err(|e| io_error(dir, e)))
        .collect::<Result<_, _>>()?;
    paths.retain(|path| path.extension().is_some_and(|ext| ext == LEVEL_EXTENSION));
    paths.sort();

    paths.iter().map(|path| load(path)).collect()
}
