//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (player, then enemies by layout order)
//! - No rendering or platform dependencies

pub mod block;
pub mod body;
pub mod camera;
pub mod collide;
pub mod element;
pub mod entity;
pub mod grid;
pub mod rect;
pub mod state;
pub mod tick;

pub use block::{Block, BlockKind, MysteryPayload};
pub use body::RigidBody;
pub use camera::Camera;
pub use collide::limit_entity;
pub use element::{ElementKind, LevelElement};
pub use entity::{Enemy, EnemyKind, EntityCore, Player};
pub use grid::Grid;
pub use rect::{Hitbox, aabb, jumped_on_head, overhang_down, overhang_left, overhang_right, overhang_up};
pub use state::{GameEvent, GamePhase, Level, LevelBuilder};
pub use tick::{TickInput, tick};

use thiserror::Error;

/// Invariant violations the simulation can surface.
///
/// These are "should never happen" programmer errors; they terminate the
/// enclosing update cycle rather than being patched over mid-frame.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("grid index ({row}, {col}) out of bounds for {rows}x{cols} grid")]
    GridOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}
