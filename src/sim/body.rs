//! Bodies: static rectangles, gravity-driven kinematic bodies, animation
//!
//! Capabilities are composed rather than inherited: a `Body` is a position
//! with a rectangle, a `Kinematic` adds velocity, optional gravity and an
//! optional animation loop, and the player wraps a `Kinematic` with input.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Collisions, HasRect, any_overlap, resolve_move};
use super::rect::Rect;
use crate::Rgb;
use crate::settings::Tuning;

/// What a collaborator should draw for a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sprite {
    Player,
    Orb { color: usize },
    /// White until activated, then the level's rainbow color
    Checkpoint { tint: Rgb },
    Spike,
    /// Plain tile image by code
    Tile(i32),
}

/// World extent in pixels; bodies are clamped into `[0, width] × [0, height]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

/// A positioned rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Real position; `rect` corner is its floor
    pub pos: Vec2,
    pub rect: Rect,
    pub sprite: Sprite,
    pub deadly: bool,
}

impl Body {
    pub fn new(sprite: Sprite, x: f32, y: f32, w: i32, h: i32) -> Self {
        let pos = Vec2::new(x, y);
        Self {
            pos,
            rect: Rect::at(pos, w, h),
            sprite,
            deadly: false,
        }
    }

    pub fn deadly(mut self) -> Self {
        self.deadly = true;
        self
    }

    /// Teleport on one or both axes, keeping the rectangle in sync
    pub fn set_pos(&mut self, x: Option<f32>, y: Option<f32>) {
        if let Some(x) = x {
            self.pos.x = x;
            self.rect.x = x.floor() as i32;
        }
        if let Some(y) = y {
            self.pos.y = y;
            self.rect.y = y.floor() as i32;
        }
    }

    /// Move by `delta`, resolving against `solids`
    pub fn move_and_collide(&mut self, delta: Vec2, solids: &[Rect]) -> Collisions {
        let resolved = resolve_move(self.pos, self.rect.w, self.rect.h, delta, solids);
        self.pos = resolved.pos;
        self.rect = resolved.rect;
        resolved.collisions
    }
}

impl HasRect for Body {
    fn rect(&self) -> Rect {
        self.rect
    }
}

/// Sprite-sheet frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animation {
    /// Highest frame index reached before wrapping to 0
    pub len: u32,
    /// Ticks each frame is held
    pub frame_len: u32,
    pub frame: u32,
    pub frame_time: u32,
}

impl Animation {
    pub fn new(len: u32, frame_len: u32) -> Self {
        Self {
            len,
            frame_len,
            frame: 0,
            frame_time: frame_len,
        }
    }

    /// Advance one tick. The loop visits frames `0..=len`.
    pub fn tick(&mut self) {
        if self.frame_time == 0 {
            self.frame_time = self.frame_len;
            if self.frame < self.len {
                self.frame += 1;
            } else {
                self.frame = 0;
            }
        } else {
            self.frame_time -= 1;
        }
    }
}

/// A body that moves under its own velocity and (optionally) gravity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kinematic {
    pub body: Body,
    pub vel: Vec2,
    /// Vertical acceleration applied this tick
    pub acc_y: f32,
    /// Downward acceleration when airborne; 0 disables movement entirely
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub animation: Option<Animation>,
}

impl Kinematic {
    pub fn new(body: Body, tuning: &Tuning) -> Self {
        Self {
            body,
            vel: Vec2::ZERO,
            acc_y: 0.0,
            gravity: tuning.gravity,
            terminal_velocity: tuning.terminal_velocity,
            animation: None,
        }
    }

    pub fn without_gravity(mut self) -> Self {
        self.gravity = 0.0;
        self
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.body.rect
    }

    /// Standing on something: a solid one pixel below
    pub fn on_ground(&self, solids: &[Rect]) -> bool {
        any_overlap(&self.body.rect.offset(0, 1), solids)
    }

    /// Touching a ceiling: a solid one pixel above
    pub fn on_ceiling(&self, solids: &[Rect]) -> bool {
        any_overlap(&self.body.rect.offset(0, -1), solids)
    }

    /// Vertical velocity after adding acceleration, capped at terminal velocity.
    /// The cap is a plain `min`, so it never limits upward speed.
    pub fn integrate_vertical(&mut self) {
        self.vel.y = self.terminal_velocity.min(self.vel.y + self.acc_y);
    }

    /// Teleport; zeroes velocity on each axis that is set
    pub fn set_pos(&mut self, x: Option<f32>, y: Option<f32>) {
        self.body.set_pos(x, y);
        if x.is_some() {
            self.vel.x = 0.0;
        }
        if y.is_some() {
            self.vel.y = 0.0;
        }
    }

    /// Force the rectangle back inside the world. Not a collision: no flags.
    pub fn keep_in_bounds(&mut self, bounds: Bounds) {
        let rect = self.body.rect;
        if rect.left() < 0 {
            self.set_pos(Some(0.0), None);
        } else if rect.right() > bounds.width {
            self.set_pos(Some((bounds.width - rect.w) as f32), None);
        }
        if rect.top() < 0 {
            self.set_pos(None, Some(0.0));
        } else if rect.bottom() > bounds.height {
            self.set_pos(None, Some((bounds.height - rect.h) as f32));
        }
    }

    /// One simulation tick for a non-player body
    pub fn update(&mut self, solids: &[Rect], bounds: Bounds) -> Collisions {
        let mut collisions = Collisions::default();
        if self.gravity != 0.0 {
            if self.on_ground(solids) {
                self.vel.y = 0.0;
            } else {
                self.acc_y = self.gravity;
                self.integrate_vertical();
            }
            collisions = self.body.move_and_collide(self.vel, solids);
        }

        self.keep_in_bounds(bounds);

        if let Some(animation) = self.animation.as_mut() {
            animation.tick();
        }
        collisions
    }
}

impl HasRect for Kinematic {
    fn rect(&self) -> Rect {
        self.body.rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const T: i32 = 48;

    fn tuning() -> Tuning {
        Tuning::from_tile_size(T)
    }

    fn bounds() -> Bounds {
        Bounds {
            width: 10 * T,
            height: 10 * T,
        }
    }

    fn falling(x: f32, y: f32) -> Kinematic {
        Kinematic::new(Body::new(Sprite::Tile(0), x, y, T, T), &tuning())
    }

    #[test]
    fn test_gravity_accumulates_to_terminal_velocity() {
        let mut body = falling(0.0, 0.0);
        let mut last = 0.0;
        for _ in 0..20 {
            body.update(&[], bounds());
            assert!(body.vel.y >= last);
            last = body.vel.y;
        }
        assert_eq!(body.vel.y, tuning().terminal_velocity);
    }

    #[test]
    fn test_grounded_resets_vertical_velocity() {
        let floor = Rect::new(0, 2 * T, 4 * T, T);
        let mut body = falling(0.0, T as f32);
        body.vel.y = 12.0;
        body.acc_y = tuning().gravity;
        body.update(&[floor], bounds());
        assert_eq!(body.vel.y, 0.0);
        assert_eq!(body.rect().bottom(), floor.top());
    }

    #[test]
    fn test_lands_flush_on_floor() {
        let floor = Rect::new(0, 5 * T, 4 * T, T);
        let mut body = falling(0.0, 0.0);
        let mut landed = false;
        for _ in 0..60 {
            let hit = body.update(&[floor], bounds());
            landed |= hit.bottom;
        }
        assert!(landed);
        assert_eq!(body.rect().bottom(), floor.top());
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_zero_gravity_body_does_not_move() {
        let mut orb = falling(T as f32, T as f32).without_gravity();
        orb.vel = Vec2::new(5.0, 5.0);
        orb.update(&[], bounds());
        assert_eq!(orb.body.pos, Vec2::new(T as f32, T as f32));
    }

    #[test]
    fn test_bounds_clamp_sets_no_flags() {
        let mut body = falling(-10.0, 0.0);
        body.vel.x = -5.0;
        let hit = body.update(&[], bounds());
        assert_eq!(body.rect().left(), 0);
        assert_eq!(body.vel.x, 0.0);
        assert!(!hit.any());
    }

    #[test]
    fn test_set_pos_keeps_rect_in_sync() {
        let mut body = falling(0.0, 0.0);
        body.vel = Vec2::new(3.0, 4.0);
        body.set_pos(Some(12.5), None);
        assert_eq!(body.body.rect.x, 12);
        assert_eq!(body.vel, Vec2::new(0.0, 4.0));
    }

    #[test]
    fn test_animation_cycles_len_plus_one_frames() {
        let mut anim = Animation::new(2, 1);
        let mut frames = Vec::new();
        for _ in 0..8 {
            anim.tick();
            frames.push(anim.frame);
        }
        // frame_time counts 1 -> 0, then a frame advance, per two ticks
        assert_eq!(frames, vec![0, 1, 1, 2, 2, 0, 0, 1]);
    }

    proptest! {
        #[test]
        fn prop_clamp_converges_on_every_edge(dx in -40i32..=40, dy in -40i32..=40, ticks in 30usize..60) {
            let mut body = falling(4.0 * T as f32, 4.0 * T as f32).without_gravity();
            for _ in 0..ticks {
                body.body.move_and_collide(Vec2::new(dx as f32, dy as f32), &[]);
                body.keep_in_bounds(bounds());
                let r = body.rect();
                prop_assert!(r.left() >= 0 && r.top() >= 0);
                prop_assert!(r.right() <= bounds().width && r.bottom() <= bounds().height);
            }
            let r = body.rect();
            if dx <= -8 { prop_assert_eq!(r.left(), 0); }
            if dx >= 8 { prop_assert_eq!(r.right(), bounds().width); }
            if dy <= -8 { prop_assert_eq!(r.top(), 0); }
            if dy >= 8 { prop_assert_eq!(r.bottom(), bounds().height); }
        }
    }
}
