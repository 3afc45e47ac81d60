//! Screen/grid configuration and derived physics tuning
//!
//! Persisted as JSON next to the game. Everything that scales with the
//! window (tile size, camera dead zone, movement constants) is derived here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Play area size in pixels
    pub screen_width: i32,
    pub screen_height: i32,
    /// Grid dimensions in cells
    pub max_rows: usize,
    pub max_cols: usize,
    /// Simulation ticks per second
    pub fps: u32,
    /// Directory holding `level{n}.json`
    pub levels_dir: PathBuf,
    /// Save data file
    pub save_path: PathBuf,
    /// Optional tile metadata file (built-in table when absent)
    pub tile_data_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: 1280,
            screen_height: 768,
            max_rows: MAX_ROWS,
            max_cols: MAX_COLS,
            fps: FPS,
            levels_dir: PathBuf::from("levels"),
            save_path: PathBuf::from("save_data.json"),
            tile_data_path: None,
        }
    }
}

impl Settings {
    /// 16 tiles fit vertically on screen
    pub fn tile_size(&self) -> i32 {
        (self.screen_height / 16).max(1)
    }

    /// Camera dead zone (width, height)
    pub fn scroll_clamp(&self) -> (i32, i32) {
        (self.screen_width / 4, self.screen_height / 3)
    }

    /// Number of simulation ticks in `secs` seconds
    pub fn ticks_for_secs(&self, secs: u64) -> u64 {
        u64::from(self.fps) * secs
    }

    pub fn tuning(&self) -> Tuning {
        Tuning::from_tile_size(self.tile_size())
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Bad settings file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}

/// Movement constants, all scaled from the tile size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub tile_size: i32,
    /// Horizontal acceleration per tick while a direction is held
    pub speed: f32,
    pub max_speed: f32,
    /// Horizontal deceleration per tick when released
    pub friction: f32,
    /// Initial upward acceleration of a jump
    pub jump_height: f32,
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub max_jump_count: i32,
}

impl Tuning {
    pub fn from_tile_size(tile_size: i32) -> Self {
        Self {
            tile_size,
            speed: (tile_size / 32) as f32,
            max_speed: (tile_size / 6) as f32,
            friction: (tile_size / 16) as f32,
            jump_height: (tile_size / 6) as f32,
            gravity: (tile_size / 12) as f32,
            terminal_velocity: (tile_size / 2) as f32,
            max_jump_count: MAX_JUMP_COUNT,
        }
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Settings::default().tuning()
    }
}
