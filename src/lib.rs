//! Hue Hop - A rainbow tile platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collision, bodies, player, level/checkpoint state)
//! - `level`: Tile grid and tile metadata
//! - `editor`: Level editing model (painting, level selection, scrolling)
//! - `persistence`: Level files and save data on disk
//! - `settings`: Screen/grid configuration and derived tuning

pub mod editor;
pub mod level;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use level::{TileGrid, TileInfo, TileTable};
pub use settings::{Settings, Tuning};

/// Game configuration constants
pub mod consts {
    /// Target frame rate (one simulation tick per frame)
    pub const FPS: u32 = 60;

    /// Default grid dimensions in cells
    pub const MAX_ROWS: usize = 150;
    pub const MAX_COLS: usize = 150;

    /// Number of tile codes the editor can paint (0..=9)
    pub const TILE_TYPES: i32 = 10;
    /// Number of levels (one per rainbow color)
    pub const MAX_LEVELS: usize = 7;

    /// Tile codes with special routing
    pub const EMPTY_TILE: i32 = -1;
    pub const GROUND_TILE: i32 = 0;
    pub const CHECKPOINT_TILE: i32 = 8;
    pub const SPIKE_TILE: i32 = 9;

    /// Frames a held jump keeps pushing upward
    pub const MAX_JUMP_COUNT: i32 = 10;

    /// Orb sprite sheet animation
    pub const ORB_FRAMES: u32 = 4;
    pub const ORB_FRAME_LEN: u32 = 8;
}

/// 8-bit RGB color
pub type Rgb = (u8, u8, u8);

/// Level palettes, indexed by level / orb color
pub mod palette {
    use super::Rgb;

    pub const WHITE: Rgb = (255, 255, 255);

    pub const RAINBOW: [Rgb; 7] = [
        (225, 0, 0),
        (255, 128, 0),
        (225, 225, 0),
        (0, 225, 0),
        (0, 0, 255),
        (128, 0, 255),
        (255, 0, 255),
    ];

    /// Tints for ground and spikes
    pub const DARK_RAINBOW: [Rgb; 7] = [
        (128, 0, 0),
        (128, 64, 0),
        (128, 128, 0),
        (0, 128, 0),
        (0, 0, 128),
        (64, 0, 128),
        (128, 0, 128),
    ];

    /// Level backgrounds
    pub const LIGHT_RAINBOW: [Rgb; 7] = [
        (255, 128, 128),
        (255, 178, 128),
        (255, 255, 128),
        (128, 255, 128),
        (128, 128, 255),
        (178, 128, 255),
        (255, 128, 255),
    ];

    /// Look up a palette entry, wrapping out-of-range indices
    #[inline]
    pub fn pick(colors: &[Rgb; 7], index: usize) -> Rgb {
        colors[index % colors.len()]
    }
}

/// Floor division for the integer-valued physics quantities (rounds toward -inf)
#[inline]
pub fn floor_div(a: i32, b: i32) -> i32 {
    a.div_euclid(b)
}
