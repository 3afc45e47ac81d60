//! Player controller: horizontal acceleration/friction and the held-jump
//! state machine on top of a kinematic body

use serde::{Deserialize, Serialize};

use super::body::{Body, Bounds, Kinematic, Sprite};
use super::collision::{Collisions, collision_test};
use super::entities::{Entity, SpecialTile};
use super::rect::Rect;
use crate::floor_div;
use crate::settings::Tuning;

/// Keys held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Where the player is in a jump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpState {
    pub jumping: bool,
    /// Ticks of upward push left while the key stays held
    pub count: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub kinematic: Kinematic,
    pub jump: JumpState,
    pub tuning: Tuning,
}

impl Player {
    pub fn new(x: f32, y: f32, tuning: Tuning) -> Self {
        let size = tuning.tile_size;
        Self {
            kinematic: Kinematic::new(Body::new(Sprite::Player, x, y, size, size), &tuning),
            jump: JumpState {
                jumping: false,
                count: tuning.max_jump_count,
            },
            tuning,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.kinematic.rect()
    }

    pub fn body(&self) -> &Body {
        &self.kinematic.body
    }

    pub fn set_pos(&mut self, x: Option<f32>, y: Option<f32>) {
        self.kinematic.set_pos(x, y);
    }

    /// One simulation tick
    pub fn update(&mut self, controls: Controls, solids: &[Rect], bounds: Bounds) -> Collisions {
        let t = self.tuning;
        let on_ground = self.kinematic.on_ground(solids);

        // Bonk head, end jump
        if self.kinematic.on_ceiling(solids) {
            self.kinematic.vel.y = 0.0;
            self.jump.jumping = false;
        }

        // Horizontal acceleration
        let vel = &mut self.kinematic.vel;
        if controls.left {
            vel.x = (-t.max_speed).max(vel.x - t.speed);
        }
        if controls.right {
            vel.x = t.max_speed.min(vel.x + t.speed);
        }

        // Horizontal deceleration
        if vel.x < 0.0 && !controls.left {
            vel.x = 0.0_f32.min(vel.x + t.friction);
        }
        if vel.x > 0.0 && !controls.right {
            vel.x = 0.0_f32.max(vel.x - t.friction);
        }

        // Vertical: grounded means no fall this tick, only a jump start moves
        if on_ground {
            self.kinematic.vel.y = 0.0;
            if !self.jump.jumping && controls.jump {
                self.jump.count = t.max_jump_count;
                self.jump.jumping = true;
                self.kinematic.acc_y = -t.jump_height;
                self.kinematic.integrate_vertical();
            }
        } else {
            self.kinematic.acc_y = self.kinematic.gravity;
            if self.jump.jumping {
                if controls.jump {
                    if self.jump.count > 0 {
                        self.jump.count -= 1;
                        self.kinematic.acc_y = floor_div(-self.jump.count, 4) as f32;
                    } else {
                        self.jump.jumping = false;
                    }
                } else {
                    self.jump.jumping = false;
                }
            }
            self.kinematic.integrate_vertical();
        }

        let collisions = self
            .kinematic
            .body
            .move_and_collide(self.kinematic.vel, solids);
        self.kinematic.keep_in_bounds(bounds);
        collisions
    }

    /// Color of the first orb overlapping the player, in list order
    pub fn check_orbs(&self, entities: &[Entity]) -> Option<usize> {
        let rect = self.rect();
        collision_test(&rect, entities).find_map(|entity| match entity {
            Entity::Orb(orb) => Some(orb.color_index),
        })
    }

    /// Index of the first special tile overlapping the player, in list order
    pub fn check_special_tiles(&self, specials: &[SpecialTile]) -> Option<usize> {
        let rect = self.rect();
        specials
            .iter()
            .position(|special| special.body().rect.overlaps(&rect))
    }
}
