//! Axis-separated collision against static solid rectangles
//!
//! Movement is resolved as two 1-D sweeps: the full horizontal delta first,
//! then the full vertical delta against the horizontally-updated rectangle.
//! This is not a swept test. A body moving diagonally into a corner can catch
//! on the edge of a tile it would have slid past, and when several solids
//! overlap on one axis every one of them snaps the body in list order, so the
//! last overlap decides the final position. Both behaviors are load-bearing
//! for how movement feels and are kept as-is.

use glam::Vec2;

use super::rect::Rect;

/// Anything with a collision rectangle
pub trait HasRect {
    fn rect(&self) -> Rect;
}

impl HasRect for Rect {
    fn rect(&self) -> Rect {
        *self
    }
}

/// Items whose rectangle overlaps `rect`, in list order
pub fn collision_test<'a, T: HasRect>(
    rect: &'a Rect,
    items: &'a [T],
) -> impl Iterator<Item = &'a T> + 'a {
    items.iter().filter(move |item| item.rect().overlaps(rect))
}

/// True if `rect` overlaps any item
pub fn any_overlap<T: HasRect>(rect: &Rect, items: &[T]) -> bool {
    collision_test(rect, items).next().is_some()
}

/// Side of the moving body that hit something
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// A single solid the body was snapped against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub solid: Rect,
    /// `None` when the body overlapped the solid without moving on that axis
    pub side: Option<Side>,
}

/// Which sides collided during one move
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collisions {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
    /// Every overlap processed, horizontal pass first
    pub contacts: Vec<Contact>,
}

impl Collisions {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }

    fn mark(&mut self, solid: Rect, side: Option<Side>) {
        match side {
            Some(Side::Left) => self.left = true,
            Some(Side::Right) => self.right = true,
            Some(Side::Top) => self.top = true,
            Some(Side::Bottom) => self.bottom = true,
            None => {}
        }
        self.contacts.push(Contact { solid, side });
    }
}

/// Result of resolving one move
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// Real position after the move
    pub pos: Vec2,
    /// Collision rectangle after the move (corner = floor of `pos` unless snapped)
    pub rect: Rect,
    pub collisions: Collisions,
}

/// Move a `w`×`h` body at `pos` by `delta`, resolving against `solids`
pub fn resolve_move(pos: Vec2, w: i32, h: i32, delta: Vec2, solids: &[Rect]) -> Resolved {
    let mut pos = pos;
    let mut rect = Rect::at(pos, w, h);
    let mut collisions = Collisions::default();

    // Horizontal sweep
    pos.x += delta.x;
    rect.x = pos.x.floor() as i32;
    let hits: Vec<Rect> = collision_test(&rect, solids).copied().collect();
    for solid in hits {
        let side = if delta.x > 0.0 {
            rect.set_right(solid.left());
            Some(Side::Right)
        } else if delta.x < 0.0 {
            rect.set_left(solid.right());
            Some(Side::Left)
        } else {
            None
        };
        collisions.mark(solid, side);
        pos.x = rect.x as f32;
    }

    // Vertical sweep
    pos.y += delta.y;
    rect.y = pos.y.floor() as i32;
    let hits: Vec<Rect> = collision_test(&rect, solids).copied().collect();
    for solid in hits {
        let side = if delta.y > 0.0 {
            rect.set_bottom(solid.top());
            Some(Side::Bottom)
        } else if delta.y < 0.0 {
            rect.set_top(solid.bottom());
            Some(Side::Top)
        } else {
            None
        };
        collisions.mark(solid, side);
        pos.y = rect.y as f32;
    }

    Resolved {
        pos,
        rect,
        collisions,
    }
}

/// Rectangle-only form of [`resolve_move`] for callers without a real
/// position: the rectangle corner is taken as the position
pub fn resolve_axis_move(rect: Rect, delta: Vec2, solids: &[Rect]) -> (Rect, Collisions) {
    let pos = Vec2::new(rect.x as f32, rect.y as f32);
    let resolved = resolve_move(pos, rect.w, rect.h, delta, solids);
    (resolved.rect, resolved.collisions)
}
