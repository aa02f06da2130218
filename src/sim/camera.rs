//! The visible world window
//!
//! An explicit value threaded through update calls - there is no global
//! screen rectangle. The simulation reads it to bound grid scans and to run
//! the death-by-offscreen check, and writes its x offset when following the
//! player.

use serde::{Deserialize, Serialize};

use crate::sim::rect::Hitbox;

/// World-space rectangle of what is currently on screen
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Camera {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Camera {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Center the window on the player, clamped to the level bounds
    pub fn follow(&mut self, player: &Hitbox, level_width: i32) {
        let target = player.x + player.w / 2 - self.w / 2;
        self.x = target.clamp(0, (level_width - self.w).max(0));
    }

    /// World hitbox to screen-space destination rectangle
    pub const fn to_screen(&self, hitbox: &Hitbox) -> Hitbox {
        Hitbox::new(hitbox.x - self.x, hitbox.y - self.y, hitbox.w, hitbox.h)
    }

    /// Entity has fully left the window, with `tolerance` pixels of slack
    pub const fn fully_outside(&self, hitbox: &Hitbox, tolerance: i32) -> bool {
        hitbox.right() < self.x - tolerance
            || hitbox.x > self.x + self.w + tolerance
            || hitbox.bottom() < self.y - tolerance
            || hitbox.y > self.y + self.h + tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{SCREEN_H, SCREEN_W};

    #[test]
    fn test_follow_clamps_to_level() {
        let mut cam = Camera::new(0, 0, SCREEN_W, SCREEN_H);
        let level_width = 1920;

        // Player near the left edge: camera pinned at zero
        cam.follow(&Hitbox::new(10, 400, 28, 30), level_width);
        assert_eq!(cam.x, 0);

        // Player mid-level: centered
        cam.follow(&Hitbox::new(960, 400, 28, 30), level_width);
        assert_eq!(cam.x, 960 + 14 - SCREEN_W / 2);

        // Player at the right edge: camera pinned at the end
        cam.follow(&Hitbox::new(1900, 400, 28, 30), level_width);
        assert_eq!(cam.x, level_width - SCREEN_W);
    }

    #[test]
    fn test_to_screen_subtracts_offset() {
        let cam = Camera::new(500, 0, SCREEN_W, SCREEN_H);
        let dest = cam.to_screen(&Hitbox::new(600, 100, 32, 32));
        assert_eq!(dest, Hitbox::new(100, 100, 32, 32));
    }

    #[test]
    fn test_fully_outside() {
        let cam = Camera::new(0, 0, SCREEN_W, SCREEN_H);
        // Straddling the edge is still inside
        assert!(!cam.fully_outside(&Hitbox::new(-20, 100, 28, 30), 16));
        // Fell below the window
        assert!(cam.fully_outside(&Hitbox::new(100, SCREEN_H + 20, 28, 30), 16));
        // Left behind off the west edge
        assert!(cam.fully_outside(&Hitbox::new(-100, 100, 28, 30), 16));
    }
}
