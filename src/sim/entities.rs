//! Non-solid bodies the player overlaps: orbs, checkpoints, hazards

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Animation, Body, Bounds, Kinematic, Sprite};
use super::collision::HasRect;
use super::rect::Rect;
use super::state::SaveData;
use crate::Rgb;
use crate::consts::{ORB_FRAME_LEN, ORB_FRAMES};
use crate::palette::{self, RAINBOW, WHITE};
use crate::settings::Tuning;

/// Collectible orb; touching it switches to the level of its color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Orb {
    pub kinematic: Kinematic,
    /// Index into the rainbow, 0-6
    pub color_index: usize,
}

impl Orb {
    pub fn new(x: f32, y: f32, size: i32, color_index: usize, tuning: &Tuning) -> Self {
        let body = Body::new(
            Sprite::Orb {
                color: color_index,
            },
            x,
            y,
            size,
            size,
        );
        Self {
            kinematic: Kinematic::new(body, tuning)
                .without_gravity()
                .with_animation(Animation::new(ORB_FRAMES, ORB_FRAME_LEN)),
            color_index,
        }
    }

    pub fn color(&self) -> Rgb {
        palette::pick(&RAINBOW, self.color_index)
    }
}

/// Moving/animated entities of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    Orb(Orb),
}

impl Entity {
    pub fn update(&mut self, solids: &[Rect], bounds: Bounds) {
        match self {
            Entity::Orb(orb) => {
                orb.kinematic.update(solids, bounds);
            }
        }
    }

    pub fn body(&self) -> &Body {
        match self {
            Entity::Orb(orb) => &orb.kinematic.body,
        }
    }

    pub fn frame(&self) -> u32 {
        match self {
            Entity::Orb(orb) => orb.kinematic.animation.map_or(0, |a| a.frame),
        }
    }
}

impl HasRect for Entity {
    fn rect(&self) -> Rect {
        self.body().rect
    }
}

/// Respawn point, owned by the level it was built in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub body: Body,
    pub level: usize,
    pub active: bool,
}

impl Checkpoint {
    pub fn new(x: f32, y: f32, size: i32, level: usize) -> Self {
        Self {
            body: Body::new(Sprite::Checkpoint { tint: WHITE }, x, y, size, size),
            level,
            active: false,
        }
    }

    /// Record this checkpoint in the save data, activating it if needed.
    /// Repeated calls write the same values.
    pub fn set_active(&mut self, save: &mut SaveData) {
        if !self.active {
            self.activate();
        }
        save.checkpoint = Some(self.body.pos);
        save.level = self.level;
    }

    fn activate(&mut self) {
        self.active = true;
        self.body.sprite = Sprite::Checkpoint {
            tint: palette::pick(&RAINBOW, self.level),
        };
    }

    pub fn tint(&self) -> Rgb {
        match self.body.sprite {
            Sprite::Checkpoint { tint } => tint,
            _ => WHITE,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.body.pos
    }
}

/// Non-solid tiles checked after movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpecialTile {
    Checkpoint(Checkpoint),
    /// Deadly tile (spikes)
    Hazard(Body),
}

impl SpecialTile {
    pub fn body(&self) -> &Body {
        match self {
            SpecialTile::Checkpoint(checkpoint) => &checkpoint.body,
            SpecialTile::Hazard(body) => body,
        }
    }

    pub fn is_deadly(&self) -> bool {
        match self {
            SpecialTile::Checkpoint(checkpoint) => checkpoint.body.deadly,
            SpecialTile::Hazard(body) => body.deadly,
        }
    }
}

impl HasRect for SpecialTile {
    fn rect(&self) -> Rect {
        self.body().rect
    }
}
