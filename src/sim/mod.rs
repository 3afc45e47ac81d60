//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (grid row-major, list order for overlaps)
//! - No rendering or platform dependencies

pub mod body;
pub mod camera;
pub mod collision;
pub mod demo;
pub mod entities;
pub mod player;
pub mod rect;
pub mod state;
pub mod tick;

pub use body::{Animation, Body, Bounds, Kinematic, Sprite};
pub use camera::Camera;
pub use collision::{
    Collisions, HasRect, Resolved, Side, collision_test, resolve_axis_move, resolve_move,
};
pub use demo::{DemoLevel, generate_demo_level};
pub use entities::{Checkpoint, Entity, Orb, SpecialTile};
pub use player::{Controls, JumpState, Player};
pub use rect::Rect;
pub use state::{DrawCall, DrawSprite, LevelSet, RunConfig, RunState, SaveData};
pub use tick::{RunEvent, TickInput, tick};
