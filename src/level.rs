//! Tile grid and tile metadata
//!
//! A level is a rectangular grid of small integer codes. The metadata table
//! decides how each populated code is routed when a level is built.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised when a grid is constructed from untrusted rows
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no rows or no columns")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Fixed-size rectangular grid of tile codes (row-major)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i32>>", into = "Vec<Vec<i32>>")]
pub struct TileGrid {
    cols: usize,
    rows: usize,
    cells: Vec<i32>,
}

impl TileGrid {
    /// Create a grid filled with empty tiles, at least one cell each way
    pub fn empty(cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            cells: vec![EMPTY_TILE; cols * rows],
        }
    }

    /// Build a grid from rows, rejecting ragged input
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Result<Self, GridError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if cols == 0 {
            return Err(GridError::Empty);
        }
        let mut cells = Vec::with_capacity(cols * rows.len());
        for (row, cells_in_row) in rows.iter().enumerate() {
            if cells_in_row.len() != cols {
                return Err(GridError::Ragged {
                    row,
                    expected: cols,
                    found: cells_in_row.len(),
                });
            }
            cells.extend_from_slice(cells_in_row);
        }
        Ok(Self {
            cols,
            rows: rows.len(),
            cells,
        })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Tile code at (col, row), `None` when out of range
    pub fn get(&self, col: usize, row: usize) -> Option<i32> {
        if col < self.cols && row < self.rows {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Overwrite a cell; returns false when out of range
    pub fn set(&mut self, col: usize, row: usize, code: i32) -> bool {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = code;
            true
        } else {
            false
        }
    }

    /// Iterate populated cells (code >= 0) as (col, row, code), row by row
    pub fn populated(&self) -> impl Iterator<Item = (usize, usize, i32)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, code)| **code >= 0)
            .map(|(i, code)| (i % self.cols, i / self.cols, *code))
    }

    /// World size in pixels for a given tile size
    pub fn world_size(&self, tile_size: i32) -> (i32, i32) {
        (self.cols as i32 * tile_size, self.rows as i32 * tile_size)
    }

    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        self.cells.chunks(self.cols).map(<[i32]>::to_vec).collect()
    }
}

impl TryFrom<Vec<Vec<i32>>> for TileGrid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<i32>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<TileGrid> for Vec<Vec<i32>> {
    fn from(grid: TileGrid) -> Self {
        grid.to_rows()
    }
}

/// Per-code tile metadata
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileInfo {
    /// Blocks movement
    #[serde(default)]
    pub collision: bool,
    /// Kills the player on overlap
    #[serde(default)]
    pub death: bool,
    /// Orb color index (orb codes only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<usize>,
}

/// How a populated cell becomes a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileRoute {
    Orb { color: usize },
    Solid,
    Checkpoint,
    Hazard,
    /// Unknown or decorative code: no body
    Ignored,
}

/// Tile metadata keyed by code (JSON shape: `{"0": {"collision": true}, ...}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileTable {
    entries: BTreeMap<i32, TileInfo>,
}

impl Default for TileTable {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            GROUND_TILE,
            TileInfo {
                collision: true,
                ..Default::default()
            },
        );
        for code in 1..=7 {
            entries.insert(
                code,
                TileInfo {
                    color: Some((code - 1) as usize),
                    ..Default::default()
                },
            );
        }
        entries.insert(CHECKPOINT_TILE, TileInfo::default());
        entries.insert(
            SPIKE_TILE,
            TileInfo {
                death: true,
                ..Default::default()
            },
        );
        Self { entries }
    }
}

impl TileTable {
    pub fn get(&self, code: i32) -> Option<&TileInfo> {
        self.entries.get(&code)
    }

    pub fn insert(&mut self, code: i32, info: TileInfo) {
        self.entries.insert(code, info);
    }

    /// Route a populated tile code. Orb codes win over metadata flags, then
    /// collision, then the checkpoint code, then deadly tiles.
    pub fn route(&self, code: i32) -> TileRoute {
        let Some(info) = self.get(code) else {
            return TileRoute::Ignored;
        };
        if (1..=7).contains(&code) {
            return TileRoute::Orb {
                color: info.color.unwrap_or((code - 1) as usize),
            };
        }
        if info.collision {
            TileRoute::Solid
        } else if code == CHECKPOINT_TILE {
            TileRoute::Checkpoint
        } else if info.death {
            TileRoute::Hazard
        } else {
            TileRoute::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_grid_has_at_least_one_cell() {
        let grid = TileGrid::empty(0, 5);
        assert_eq!((grid.cols(), grid.rows()), (1, 5));
        assert_eq!(grid.to_rows(), vec![vec![EMPTY_TILE]; 5]);
        assert_eq!(TileGrid::empty(3, 0).to_rows(), vec![vec![EMPTY_TILE; 3]]);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = TileGrid::from_rows(vec![vec![0, 0], vec![0]]).unwrap_err();
        assert_eq!(
            err,
            GridError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            }
        );
        assert_eq!(TileGrid::from_rows(vec![]).unwrap_err(), GridError::Empty);
    }

    #[test]
    fn test_get_out_of_range() {
        let grid = TileGrid::from_rows(vec![vec![0, -1, 9]]).unwrap();
        assert_eq!(grid.get(2, 0), Some(9));
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.get(0, 1), None);
    }

    #[test]
    fn test_populated_skips_empty() {
        let grid = TileGrid::from_rows(vec![vec![0, -1], vec![-1, 8]]).unwrap();
        let cells: Vec<_> = grid.populated().collect();
        assert_eq!(cells, vec![(0, 0, 0), (1, 1, 8)]);
    }

    #[test]
    fn test_default_routing() {
        let table = TileTable::default();
        assert_eq!(table.route(0), TileRoute::Solid);
        assert_eq!(table.route(1), TileRoute::Orb { color: 0 });
        assert_eq!(table.route(7), TileRoute::Orb { color: 6 });
        assert_eq!(table.route(8), TileRoute::Checkpoint);
        assert_eq!(table.route(9), TileRoute::Hazard);
        assert_eq!(table.route(42), TileRoute::Ignored);
    }

    #[test]
    fn test_table_json_shape() {
        let json = r#"{"0": {"collision": true}, "3": {"color": 5}, "9": {"death": true}}"#;
        let table: TileTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.route(0), TileRoute::Solid);
        assert_eq!(table.route(3), TileRoute::Orb { color: 5 });
        assert_eq!(table.route(9), TileRoute::Hazard);
        // Missing from the table: ignored rather than an error
        assert_eq!(table.route(8), TileRoute::Ignored);
    }

    #[test]
    fn test_grid_json_is_rows() {
        let grid = TileGrid::from_rows(vec![vec![0, 1], vec![-1, 9]]).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, "[[0,1],[-1,9]]");
        let back: TileGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
        assert!(serde_json::from_str::<TileGrid>("[[0,1],[2]]").is_err());
    }
}
