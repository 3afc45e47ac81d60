//! Run context: current level, its bodies, save data, player and camera
//!
//! Everything the tick mutates lives here. Bodies are rebuilt from the grid
//! on every level load; nothing keeps identity across levels.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, Bounds, Sprite};
use super::camera::Camera;
use super::entities::{Checkpoint, Entity, Orb, SpecialTile};
use super::player::Player;
use super::rect::Rect;
use crate::Rgb;
use crate::consts::*;
use crate::level::{TileGrid, TileRoute, TileTable};
use crate::palette::{self, DARK_RAINBOW, LIGHT_RAINBOW};
use crate::settings::{Settings, Tuning};

/// Persistent progress: where to respawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    /// Level the player is in (or the last checkpoint's level)
    pub level: usize,
    /// Last activated checkpoint position
    #[serde(default)]
    pub checkpoint: Option<Vec2>,
    /// Spawn location used when no checkpoint was reached
    pub player_loc: Vec2,
}

impl SaveData {
    pub fn new(player_loc: Vec2) -> Self {
        Self {
            level: 0,
            checkpoint: None,
            player_loc,
        }
    }
}

/// The fixed set of levels, indexed by level id / orb color
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelSet {
    grids: Vec<TileGrid>,
}

impl LevelSet {
    pub fn new(grids: Vec<TileGrid>) -> Self {
        Self { grids }
    }

    pub fn get(&self, level: usize) -> Option<&TileGrid> {
        self.grids.get(level)
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }
}

/// Screen geometry the run needs from the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub tuning: Tuning,
    pub screen: (i32, i32),
    pub dead_zone: (i32, i32),
}

impl From<&Settings> for RunConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            tuning: settings.tuning(),
            screen: (settings.screen_width, settings.screen_height),
            dead_zone: settings.scroll_clamp(),
        }
    }
}

/// Image to draw for one draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawSprite {
    Floor { tint: Rgb },
    Spike { tint: Rgb },
    /// Plain tile image by code
    Tile(i32),
    Checkpoint { tint: Rgb },
    Orb { color: usize, frame: u32 },
    Player,
}

/// A sprite at a screen position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawCall {
    pub sprite: DrawSprite,
    pub pos: Vec2,
}

/// Everything a run mutates
#[derive(Debug, Clone)]
pub struct RunState {
    pub config: RunConfig,
    pub tiles: TileTable,
    pub levels: LevelSet,
    /// Current level id
    pub level: usize,
    pub grid: TileGrid,
    /// Collidable terrain
    pub solids: Vec<Rect>,
    pub entities: Vec<Entity>,
    pub specials: Vec<SpecialTile>,
    pub save: SaveData,
    pub player: Player,
    pub camera: Camera,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl RunState {
    /// Start a run in the save's level at the save's spawn location.
    /// Returns `None` when the save points at a level that does not exist.
    pub fn new(config: RunConfig, tiles: TileTable, levels: LevelSet, save: SaveData) -> Option<Self> {
        let grid = levels.get(save.level)?.clone();
        let tile = config.tuning.tile_size;
        let camera = Camera::new(config.screen, config.dead_zone, grid.world_size(tile));
        let player = Player::new(save.player_loc.x, save.player_loc.y, config.tuning);
        let mut state = Self {
            config,
            tiles,
            levels,
            level: save.level,
            grid,
            solids: Vec::new(),
            entities: Vec::new(),
            specials: Vec::new(),
            save,
            player,
            camera,
            time_ticks: 0,
        };
        state.build_room();
        log::info!(
            "Run started in level {} ({} solids, {} entities, {} specials)",
            state.level,
            state.solids.len(),
            state.entities.len(),
            state.specials.len()
        );
        Some(state)
    }

    pub fn tile_size(&self) -> i32 {
        self.config.tuning.tile_size
    }

    pub fn bounds(&self) -> Bounds {
        let (width, height) = self.grid.world_size(self.tile_size());
        Bounds { width, height }
    }

    /// Save-data read hook
    pub fn save_data(&self) -> &SaveData {
        &self.save
    }

    /// Save-data write hook
    pub fn set_save_data(&mut self, save: SaveData) {
        self.save = save;
    }

    /// Switch to `level` and rebuild every body list from its grid.
    /// Unknown levels are ignored and return false.
    pub fn load_level(&mut self, level: usize) -> bool {
        let Some(grid) = self.levels.get(level) else {
            log::warn!("Level {} does not exist, staying in {}", level, self.level);
            return false;
        };
        self.grid = grid.clone();
        self.level = level;
        self.camera.world = self.grid.world_size(self.tile_size());
        self.build_room();
        log::info!(
            "Loaded level {} ({} solids, {} entities, {} specials)",
            level,
            self.solids.len(),
            self.entities.len(),
            self.specials.len()
        );
        true
    }

    /// Route each populated cell into exactly one of solids/entities/specials
    fn build_room(&mut self) {
        let t = self.tile_size();
        let tuning = self.config.tuning;
        self.solids.clear();
        self.entities.clear();
        self.specials.clear();

        for (col, row, code) in self.grid.populated() {
            let x = col as i32 * t;
            let y = row as i32 * t;
            match self.tiles.route(code) {
                TileRoute::Orb { color } => {
                    let orb = Orb::new(x as f32, y as f32, t, color, &tuning);
                    self.entities.push(Entity::Orb(orb));
                }
                TileRoute::Solid => self.solids.push(Rect::new(x, y, t, t)),
                TileRoute::Checkpoint => {
                    let checkpoint = Checkpoint::new(x as f32, y as f32, t, self.level);
                    self.specials.push(SpecialTile::Checkpoint(checkpoint));
                }
                TileRoute::Hazard => {
                    let spike = Body::new(Sprite::Spike, x as f32, y as f32, t, t).deadly();
                    self.specials.push(SpecialTile::Hazard(spike));
                }
                TileRoute::Ignored => {}
            }
        }
    }

    /// Respawn after touching a hazard. The save's level is reloaded only
    /// when it differs from the current one; then the player moves to the
    /// checkpoint, or to the spawn location when none was reached.
    pub fn goto_last_checkpoint(&mut self) -> Vec2 {
        if self.level != self.save.level {
            self.load_level(self.save.level);
        }
        let target = self.save.checkpoint.unwrap_or(self.save.player_loc);
        self.player.set_pos(Some(target.x), Some(target.y));
        log::info!(
            "Respawned in level {} at ({}, {})",
            self.level,
            target.x,
            target.y
        );
        target
    }

    /// Background color of the current level
    pub fn background(&self) -> Rgb {
        palette::pick(&LIGHT_RAINBOW, self.level)
    }

    /// Draw calls in screen space: tiles, checkpoints, orbs, then the player.
    /// Codes without tile metadata are not drawn.
    pub fn draw_list(&self) -> Vec<DrawCall> {
        let t = self.tile_size();
        let tint = self.terrain_tint();
        let mut calls = Vec::new();

        for (col, row, code) in self.grid.populated() {
            let sprite = match code {
                GROUND_TILE => DrawSprite::Floor { tint },
                SPIKE_TILE => DrawSprite::Spike { tint },
                1..=CHECKPOINT_TILE => continue,
                _ if self.tiles.get(code).is_some() => DrawSprite::Tile(code),
                _ => continue,
            };
            let world = Vec2::new((col as i32 * t) as f32, (row as i32 * t) as f32);
            calls.push(DrawCall {
                sprite,
                pos: self.camera.to_screen(world),
            });
        }

        for special in &self.specials {
            if let SpecialTile::Checkpoint(checkpoint) = special {
                calls.push(self.draw_body(&checkpoint.body, 0));
            }
        }
        for entity in &self.entities {
            calls.push(self.draw_body(entity.body(), entity.frame()));
        }
        calls.push(self.draw_body(self.player.body(), 0));
        calls
    }

    /// Ground and spike tint of the current level
    fn terrain_tint(&self) -> Rgb {
        palette::pick(&DARK_RAINBOW, self.level)
    }

    fn draw_body(&self, body: &Body, frame: u32) -> DrawCall {
        let sprite = match body.sprite {
            Sprite::Player => DrawSprite::Player,
            Sprite::Orb { color } => DrawSprite::Orb { color, frame },
            Sprite::Checkpoint { tint } => DrawSprite::Checkpoint { tint },
            Sprite::Spike => DrawSprite::Spike {
                tint: self.terrain_tint(),
            },
            Sprite::Tile(GROUND_TILE) => DrawSprite::Floor {
                tint: self.terrain_tint(),
            },
            Sprite::Tile(code) => DrawSprite::Tile(code),
        };
        let corner = Vec2::new(body.rect.x as f32, body.rect.y as f32);
        DrawCall {
            sprite,
            pos: self.camera.to_screen(corner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: i32 = 48;

    fn config() -> RunConfig {
        RunConfig {
            tuning: Tuning::from_tile_size(T),
            screen: (16 * T, 8 * T),
            dead_zone: (4 * T, 2 * T),
        }
    }

    fn grid(rows: &[&[i32]]) -> TileGrid {
        TileGrid::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn test_build_routes_each_cell_once() {
        let levels = LevelSet::new(vec![grid(&[
            &[0, 1, 8, 9, -1, 42],
            &[0, 0, 0, 0, 0, 0],
        ])]);
        let state =
            RunState::new(config(), TileTable::default(), levels, SaveData::new(Vec2::ZERO)).unwrap();
        assert_eq!(state.solids.len(), 7);
        assert_eq!(state.entities.len(), 1);
        assert_eq!(state.specials.len(), 2);
        assert!(matches!(state.specials[0], SpecialTile::Checkpoint(ref c) if c.level == 0));
        assert!(matches!(state.specials[1], SpecialTile::Hazard(ref b) if b.deadly));
        assert_eq!(state.solids[0], Rect::new(0, 0, T, T));
    }

    #[test]
    fn test_missing_start_level() {
        let save = SaveData {
            level: 3,
            ..SaveData::new(Vec2::ZERO)
        };
        assert!(RunState::new(config(), TileTable::default(), LevelSet::default(), save).is_none());
    }

    #[test]
    fn test_load_level_rebuilds_and_retags() {
        let levels = LevelSet::new(vec![grid(&[&[8, -1]]), grid(&[&[-1, 8]])]);
        let mut state =
            RunState::new(config(), TileTable::default(), levels, SaveData::new(Vec2::ZERO)).unwrap();
        assert!(state.load_level(1));
        assert_eq!(state.level, 1);
        assert_eq!(state.specials.len(), 1);
        let SpecialTile::Checkpoint(ref checkpoint) = state.specials[0] else {
            panic!("expected checkpoint");
        };
        assert_eq!(checkpoint.level, 1);
        assert_eq!(checkpoint.position(), Vec2::new(T as f32, 0.0));
        assert!(!state.load_level(5));
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_draw_list_order_and_tints() {
        let levels = LevelSet::new(vec![grid(&[&[0, 2, 8, 9, 5]])]);
        let mut state =
            RunState::new(config(), TileTable::default(), levels, SaveData::new(Vec2::ZERO)).unwrap();
        state.camera.scroll = Vec2::ZERO;
        let sprites: Vec<_> = state.draw_list().into_iter().map(|c| c.sprite).collect();
        let tint = DARK_RAINBOW[0];
        assert_eq!(
            sprites,
            vec![
                DrawSprite::Floor { tint },
                DrawSprite::Spike { tint },
                DrawSprite::Checkpoint {
                    tint: palette::WHITE
                },
                DrawSprite::Orb { color: 1, frame: 0 },
                DrawSprite::Orb { color: 4, frame: 0 },
                DrawSprite::Player,
            ]
        );
        assert_eq!(state.background(), LIGHT_RAINBOW[0]);
    }

    #[test]
    fn test_unknown_codes_are_not_drawn() {
        let levels = LevelSet::new(vec![grid(&[&[42, -1, 12]])]);
        let mut tiles = TileTable::default();
        tiles.insert(
            12,
            crate::level::TileInfo {
                collision: true,
                ..Default::default()
            },
        );
        let state = RunState::new(config(), tiles, levels, SaveData::new(Vec2::ZERO)).unwrap();
        let sprites: Vec<_> = state.draw_list().into_iter().map(|c| c.sprite).collect();
        assert_eq!(sprites, vec![DrawSprite::Tile(12), DrawSprite::Player]);
        assert_eq!(state.solids, vec![Rect::new(2 * T, 0, T, T)]);
    }

    #[test]
    fn test_activated_checkpoint_draws_tinted() {
        let levels = LevelSet::new(vec![grid(&[&[-1], &[-1]]), grid(&[&[8], &[-1]])]);
        let mut state =
            RunState::new(config(), TileTable::default(), levels, SaveData::new(Vec2::ZERO)).unwrap();
        assert!(state.load_level(1));
        let SpecialTile::Checkpoint(checkpoint) = &mut state.specials[0] else {
            panic!("expected checkpoint");
        };
        checkpoint.set_active(&mut state.save);
        let calls = state.draw_list();
        assert_eq!(
            calls[0].sprite,
            DrawSprite::Checkpoint {
                tint: palette::RAINBOW[1]
            }
        );
    }
}
