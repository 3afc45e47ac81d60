//! Dead-zone camera
//!
//! The view only scrolls once the tracked position leaves a rectangle centred
//! on the screen, then it is clamped so it never shows past the world edges.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Top-left of the view in world pixels
    pub scroll: Vec2,
    pub screen: (i32, i32),
    /// Dead zone (width, height)
    pub dead_zone: (i32, i32),
    pub world: (i32, i32),
}

impl Camera {
    pub fn new(screen: (i32, i32), dead_zone: (i32, i32), world: (i32, i32)) -> Self {
        let mut camera = Self {
            scroll: Vec2::ZERO,
            screen,
            dead_zone,
            world,
        };
        camera.reset();
        camera
    }

    /// Start position: left edge, bottom of the world
    pub fn reset(&mut self) {
        self.scroll = Vec2::new(0.0, (self.world.1 - self.screen.1) as f32);
    }

    /// Scroll so `target` sits inside the dead zone, then clamp to the world
    pub fn follow(&mut self, target: Vec2) {
        let (sw, sh) = self.screen;
        let (cw, ch) = self.dead_zone;

        let right = self.scroll.x + (sw / 2 + cw / 2) as f32;
        let left = self.scroll.x + (sw / 2 - cw / 2) as f32;
        if target.x > right {
            self.scroll.x += target.x - right;
        } else if target.x < left {
            self.scroll.x -= left - target.x;
        }

        let bottom = self.scroll.y + (sh / 2 + ch / 2) as f32;
        let top = self.scroll.y + (sh / 2 - ch / 2) as f32;
        if target.y > bottom {
            self.scroll.y += target.y - bottom;
        } else if target.y < top {
            self.scroll.y -= top - target.y;
        }

        // Lower clamp first: a world smaller than the screen ends up negative
        if self.scroll.x < 0.0 {
            self.scroll.x = 0.0;
        }
        if self.scroll.y < 0.0 {
            self.scroll.y = 0.0;
        }
        let max_x = (self.world.0 - sw) as f32;
        let max_y = (self.world.1 - sh) as f32;
        if self.scroll.x > max_x {
            self.scroll.x = max_x;
        }
        if self.scroll.y > max_y {
            self.scroll.y = max_y;
        }
    }

    /// World position to screen position
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world - self.scroll
    }
}
