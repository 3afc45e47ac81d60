//! Level editor model
//!
//! Holds the grid being edited, the selected level and tile, and the view
//! scroll. Input handling and drawing belong to the host; this only maps
//! viewport positions to cells and reads/writes level files.

use std::path::Path;

use crate::Rgb;
use crate::consts::*;
use crate::level::TileGrid;
use crate::palette::{self, RAINBOW};
use crate::persistence::{self, PersistenceError};
use crate::settings::Settings;

/// Pixels scrolled per tick at speed 1
const SCROLL_STEP: i32 = 5;

/// Scroll keys held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

#[derive(Debug, Clone)]
pub struct LevelEditor {
    grid: TileGrid,
    /// Level that save/load target
    level: usize,
    /// Level whose file was last loaded (drives the background)
    level_loaded: usize,
    current_tile: i32,
    scroll: (i32, i32),
    scroll_speed: i32,
    viewport: (i32, i32),
    tile_size: i32,
}

impl LevelEditor {
    /// Blank grid sized from settings, view at the bottom-left corner
    pub fn new(settings: &Settings) -> Self {
        let mut editor = Self {
            grid: TileGrid::empty(settings.max_cols, settings.max_rows),
            level: 0,
            level_loaded: 0,
            current_tile: GROUND_TILE,
            scroll: (0, 0),
            scroll_speed: 1,
            viewport: (settings.screen_width, settings.screen_height),
            tile_size: settings.tile_size(),
        };
        editor.scroll.1 = editor.max_scroll().1;
        editor
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn level_loaded(&self) -> usize {
        self.level_loaded
    }

    pub fn current_tile(&self) -> i32 {
        self.current_tile
    }

    pub fn scroll(&self) -> (i32, i32) {
        self.scroll
    }

    pub fn scroll_speed(&self) -> i32 {
        self.scroll_speed
    }

    /// Background color of the loaded level
    pub fn background(&self) -> Rgb {
        palette::pick(&RAINBOW, self.level_loaded)
    }

    pub fn level_up(&mut self) {
        if self.level + 1 < MAX_LEVELS {
            self.level += 1;
        }
    }

    pub fn level_down(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    /// Pick the tile to paint; codes outside the palette are refused
    pub fn select_tile(&mut self, code: i32) -> bool {
        if (0..TILE_TYPES).contains(&code) {
            self.current_tile = code;
            true
        } else {
            false
        }
    }

    pub fn boost_pressed(&mut self) {
        self.scroll_speed *= 2;
    }

    pub fn boost_released(&mut self) {
        self.scroll_speed = (self.scroll_speed / 2).max(1);
    }

    fn max_scroll(&self) -> (i32, i32) {
        let (world_w, world_h) = self.grid.world_size(self.tile_size);
        (
            (world_w - self.viewport.0).max(0),
            (world_h - self.viewport.1).max(0),
        )
    }

    /// Move the view one tick's worth, kept inside the world
    pub fn update_scroll(&mut self, input: ScrollInput) {
        let step = SCROLL_STEP * self.scroll_speed;
        let (max_x, max_y) = self.max_scroll();
        let (mut x, mut y) = self.scroll;
        if input.left {
            x -= step;
        }
        if input.right {
            x += step;
        }
        if input.up {
            y -= step;
        }
        if input.down {
            y += step;
        }
        self.scroll = (x.clamp(0, max_x), y.clamp(0, max_y));
    }

    /// Grid cell under a viewport position, `None` outside the viewport or grid
    pub fn cell_at(&self, pos: (i32, i32)) -> Option<(usize, usize)> {
        let (px, py) = pos;
        if px < 0 || py < 0 || px >= self.viewport.0 || py >= self.viewport.1 {
            return None;
        }
        let col = (px + self.scroll.0) / self.tile_size;
        let row = (py + self.scroll.1) / self.tile_size;
        let (col, row) = (col as usize, row as usize);
        (col < self.grid.cols() && row < self.grid.rows()).then_some((col, row))
    }

    /// Paint the selected tile; returns true when a cell changed
    pub fn paint(&mut self, pos: (i32, i32)) -> bool {
        self.write_cell(pos, self.current_tile)
    }

    /// Clear a cell; returns true when a cell changed
    pub fn erase(&mut self, pos: (i32, i32)) -> bool {
        self.write_cell(pos, EMPTY_TILE)
    }

    fn write_cell(&mut self, pos: (i32, i32), code: i32) -> bool {
        let Some((col, row)) = self.cell_at(pos) else {
            return false;
        };
        if self.grid.get(col, row) == Some(code) {
            return false;
        }
        self.grid.set(col, row, code)
    }

    /// Write the grid to the selected level's file
    pub fn save(&self, dir: &Path) -> Result<(), PersistenceError> {
        persistence::save_level_grid(dir, self.level, &self.grid)
    }

    /// Replace the grid with the selected level's file
    pub fn load(&mut self, dir: &Path) -> Result<(), PersistenceError> {
        self.grid = persistence::load_level_grid(dir, self.level)?;
        self.level_loaded = self.level;
        let (max_x, max_y) = self.max_scroll();
        self.scroll = (self.scroll.0.min(max_x), self.scroll.1.min(max_y));
        log::info!("Editing level {}", self.level);
        Ok(())
    }
}
