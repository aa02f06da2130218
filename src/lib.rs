//! Pounce - a Cat Mario style side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `tuning`: Data-driven physics and gameplay constants
//!
//! Rendering, audio playback, input polling, and level-file parsing are
//! external collaborators: the simulation produces screen-space rectangles
//! and a [`sim::GameEvent`] queue for them to consume, and never calls back
//! into them.

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Target simulation rate
    pub const FPS: u32 = 60;
    /// Fixed simulation timestep in milliseconds. Physics is never scaled
    /// by measured wall-clock delta; slow frames slow the simulation down.
    pub const SIM_DT: f32 = 1000.0 / FPS as f32;

    /// Visible window dimensions in world pixels
    pub const SCREEN_W: i32 = 800;
    pub const SCREEN_H: i32 = 600;

    /// Side length of one grid cell in world pixels
    pub const CELL_SIZE: i32 = 32;

    /// Player hitbox dimensions
    pub const PLAYER_W: i32 = 28;
    pub const PLAYER_H: i32 = 30;

    /// Enemy hitbox dimensions
    pub const ENEMY_W: i32 = 28;
    pub const ENEMY_H: i32 = 28;

    /// Ticks a death / level-load crossfade stays on screen
    pub const FADE_TICKS: u32 = 90;
}
