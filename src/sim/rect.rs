//! Axis-aligned hitboxes and directional overlap primitives
//!
//! The overhang functions report how far rectangle A penetrates rectangle B
//! from one side. They are the basis of minimal-translation collision
//! correction: the resolver pushes the entity back out by exactly the
//! returned depth.
//!
//! The probe-point and critical-depth guards reject overlap signals from
//! objects that merely brush a corner or are already deeply interpenetrating
//! (teleport/spawn cases), which would otherwise cause spurious snapping.

use serde::{Deserialize, Serialize};

/// An object's collision geometry: integer world-space pixels.
///
/// Distinct from the (possibly larger) render rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hitbox {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Hitbox {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Check if a point lies inside the rectangle (edges inclusive)
    pub const fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }

    /// Horizontal center of the rectangle
    pub const fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub const fn right(&self) -> i32 {
        self.x + self.w
    }
}

/// Overlap-or-touching test between two rectangles.
///
/// Deliberately inclusive: boxes sharing an edge still count, so an entity
/// resting exactly on top of a block keeps colliding with it every frame.
pub const fn aabb(a: &Hitbox, b: &Hitbox) -> bool {
    a.x + a.w >= b.x && a.x <= b.x + b.w && a.y + a.h >= b.y && a.y <= b.y + b.h
}

/// Penetration of A's top edge into B from below.
///
/// Nonzero only when A's top is below B's top and a probe point `probe`
/// pixels above A's top-center falls inside B.
pub const fn overhang_up(a: &Hitbox, b: &Hitbox, probe: i32) -> i32 {
    if a.y > b.y && b.contains(a.center_x(), a.y - probe) {
        b.y + b.h - a.y
    } else {
        0
    }
}

/// Penetration of A's bottom edge into B from above.
///
/// Nonzero only when A's bottom is above B's bottom, the boxes overlap, the
/// penetration is at most `critical` pixels, and a probe point `probe`
/// pixels below A's bottom-center falls inside B. Deeper overlap is a
/// teleport/spawn artifact and is suppressed.
pub const fn overhang_down(a: &Hitbox, b: &Hitbox, probe: i32, critical: i32) -> i32 {
    if a.bottom() < b.bottom()
        && aabb(a, b)
        && a.bottom() - b.y <= critical
        && b.contains(a.center_x(), a.bottom() + probe)
    {
        a.bottom() - b.y + 1
    } else {
        0
    }
}

/// Penetration of A's right edge into B from the left. No probe guard.
pub const fn overhang_right(a: &Hitbox, b: &Hitbox) -> i32 {
    if a.right() < b.right() && aabb(a, b) {
        a.right() - b.x + 1
    } else {
        0
    }
}

/// Penetration of A's left edge into B from the right. No probe guard.
pub const fn overhang_left(a: &Hitbox, b: &Hitbox) -> i32 {
    if a.x > b.x && aabb(a, b) {
        b.x + b.w - a.x
    } else {
        0
    }
}

/// Did the player land on an enemy's head, as opposed to running into it?
///
/// True when the player's bottom is above the enemy's bottom, the boxes
/// overlap, and vertical penetration is within `critical` pixels.
pub const fn jumped_on_head(player: &Hitbox, enemy: &Hitbox, critical: i32) -> bool {
    player.bottom() < enemy.bottom() && aabb(player, enemy) && player.bottom() - enemy.y <= critical
}
