//! Level files, tile metadata and save data on disk
//!
//! Layout:
//! - `{levels_dir}/level{n}.json`: JSON array of rows of tile codes
//! - save file: JSON `{ "level", "checkpoint", "player_loc" }`
//! - tile metadata: JSON object keyed by tile code
//!
//! Every write goes through a temp file and a rename.

mod atomic;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::level::{GridError, TileGrid, TileTable};
use crate::sim::state::{LevelSet, SaveData};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid level grid: {0}")]
    Grid(#[from] GridError),
}

impl PersistenceError {
    /// True when the file simply does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistenceError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Path of level `n` inside `dir`
pub fn level_path(dir: &Path, level: usize) -> PathBuf {
    dir.join(format!("level{level}.json"))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PersistenceError> {
    let text = fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let text = serde_json::to_string(value).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    atomic::write_text_atomic(path, &text).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read one level grid. Ragged or empty grids are rejected.
pub fn load_level_grid(dir: &Path, level: usize) -> Result<TileGrid, PersistenceError> {
    let rows: Vec<Vec<i32>> = read_json(&level_path(dir, level))?;
    Ok(TileGrid::from_rows(rows)?)
}

pub fn save_level_grid(dir: &Path, level: usize, grid: &TileGrid) -> Result<(), PersistenceError> {
    let path = level_path(dir, level);
    write_json(&path, &grid.to_rows())?;
    log::info!("Saved level {} to {}", level, path.display());
    Ok(())
}

/// Load levels `0..count` in order. Level ids index the set, so loading
/// stops at the first missing file; any other failure is an error.
pub fn load_levels(dir: &Path, count: usize) -> Result<LevelSet, PersistenceError> {
    let mut grids = Vec::with_capacity(count);
    for level in 0..count {
        match load_level_grid(dir, level) {
            Ok(grid) => grids.push(grid),
            Err(e) if e.is_not_found() => {
                log::info!("No file for level {}, loaded {} levels", level, grids.len());
                break;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(LevelSet::new(grids))
}

/// Read save data; a missing file yields `None`
pub fn load_save_data(path: &Path) -> Result<Option<SaveData>, PersistenceError> {
    match read_json(path) {
        Ok(save) => Ok(Some(save)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn save_save_data(path: &Path, save: &SaveData) -> Result<(), PersistenceError> {
    write_json(path, save)?;
    log::debug!("Saved progress to {}", path.display());
    Ok(())
}

/// Tile metadata from `path`, or the built-in table when no path is given
/// or the file cannot be used
pub fn load_tile_table(path: Option<&Path>) -> TileTable {
    let Some(path) = path else {
        return TileTable::default();
    };
    match read_json(path) {
        Ok(table) => table,
        Err(e) => {
            log::warn!("{}; using built-in tile table", e);
            TileTable::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::TileInfo;
    use glam::Vec2;

    fn grid() -> TileGrid {
        TileGrid::from_rows(vec![vec![-1, 3, -1], vec![0, 0, 9]]).unwrap()
    }

    #[test]
    fn test_level_file_is_array_of_rows() {
        let dir = tempfile::tempdir().unwrap();
        save_level_grid(dir.path(), 2, &grid()).unwrap();
        let text = fs::read_to_string(dir.path().join("level2.json")).unwrap();
        assert_eq!(text, "[[-1,3,-1],[0,0,9]]");
        assert_eq!(load_level_grid(dir.path(), 2).unwrap(), grid());
    }

    #[test]
    fn test_ragged_level_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(level_path(dir.path(), 0), "[[0,0],[0]]").unwrap();
        let err = load_level_grid(dir.path(), 0).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::Grid(GridError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            })
        ));
        assert!(err.to_string().contains("row 1 has 1 cells"));
    }

    #[test]
    fn test_load_levels_stops_at_gap() {
        let dir = tempfile::tempdir().unwrap();
        save_level_grid(dir.path(), 0, &grid()).unwrap();
        save_level_grid(dir.path(), 1, &grid()).unwrap();
        save_level_grid(dir.path(), 3, &grid()).unwrap();
        let levels = load_levels(dir.path(), 7).unwrap();
        assert_eq!(levels.len(), 2);

        fs::write(level_path(dir.path(), 2), "not json").unwrap();
        assert!(load_levels(dir.path(), 7).is_err());
    }

    #[test]
    fn test_save_data_roundtrip_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save_data.json");
        assert_eq!(load_save_data(&path).unwrap(), None);

        let mut save = SaveData::new(Vec2::new(48.0, 96.0));
        save.level = 3;
        save.checkpoint = Some(Vec2::new(240.0, 96.0));
        save_save_data(&path, &save).unwrap();
        assert_eq!(load_save_data(&path).unwrap(), Some(save));
    }

    #[test]
    fn test_save_without_checkpoint_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        fs::write(&path, r#"{"level":1,"player_loc":[10.0,20.0]}"#).unwrap();
        let save = load_save_data(&path).unwrap().unwrap();
        assert_eq!(save.level, 1);
        assert_eq!(save.checkpoint, None);
        assert_eq!(save.player_loc, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_tile_table_file_and_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiles.json");
        fs::write(
            &path,
            r#"{"0": {"collision": true}, "4": {"color": 6}, "9": {"death": true}}"#,
        )
        .unwrap();
        let table = load_tile_table(Some(&path));
        assert_eq!(
            table.get(4),
            Some(&TileInfo {
                collision: false,
                death: false,
                color: Some(6)
            })
        );
        assert_eq!(table.get(1), None);

        assert_eq!(load_tile_table(None), TileTable::default());
        let missing = dir.path().join("missing.json");
        assert_eq!(load_tile_table(Some(&missing)), TileTable::default());
    }
}
