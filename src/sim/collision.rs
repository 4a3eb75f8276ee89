//! Collision detection between the collector and falling entities
//!
//! Everything in the arena is an axis-aligned box, origin top-left, y down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Square of side `side` at `pos`
    pub fn square(pos: Vec2, side: f32) -> Self {
        Self::new(pos, Vec2::splat(side))
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Area covered while moving down by `travel` to the current position
    pub fn swept_down(&self, travel: f32) -> Rect {
        let travel = travel.max(0.0);
        Rect::new(
            Vec2::new(self.pos.x, self.pos.y - travel),
            Vec2::new(self.size.x, self.size.y + travel),
        )
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.right() > other.left()
            && self.left() < other.right()
            && self.bottom() > other.top()
            && self.top() < other.bottom()
    }
}

/// Whether a falling entity has dropped past the bottom edge of the arena
pub fn below_arena(rect: &Rect, arena_height: f32) -> bool {
    rect.top() > arena_height
}
