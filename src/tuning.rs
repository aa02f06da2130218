//! Data-driven physics and gameplay constants
//!
//! The collision probe offsets and the critical-depth cutoff were tuned by
//! feel; they live here instead of `consts` so a level pack can override
//! them from JSON without a rebuild.

use serde::{Deserialize, Serialize};

/// Physics and gameplay tuning values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration added to every rigid body (pre-scale)
    pub gravity: f32,
    /// Global scale factor applied to acceleration
    pub scale: f32,
    /// Componentwise velocity clamp, pixels per millisecond
    pub max_axis_speed: f32,

    /// Offset of the overhang probe point, pixels past the tested edge.
    /// Rejects objects that merely brush a corner.
    pub probe_offset: i32,
    /// Maximum vertical penetration treated as a real landing; deeper
    /// overlap is a spawn/teleport artifact and is suppressed.
    pub critical_depth: i32,

    /// Horizontal force applied while a run input is held
    pub run_force: f32,
    /// Upward force applied while the jump timer is live
    pub jump_force: f32,
    /// Ticks the jump force keeps being re-issued after takeoff. Kept low
    /// enough that a full jump's fall speed stays inside `critical_depth`.
    pub jump_hold_ticks: u32,
    /// Patrol speed of enemies, pixels per millisecond
    pub enemy_speed: f32,
    /// Scripted end-flag slide speed, pixels per millisecond
    pub slide_speed: f32,
    /// Upward velocity granted to the player after a stomp
    pub stomp_bounce: f32,
    /// Constant leftward speed of an activated laser
    pub laser_speed: f32,
    /// Upward launch velocity of an activated fish
    pub fish_launch_speed: f32,

    /// Pixels past the camera edge before an entity counts as offscreen
    pub offscreen_tolerance: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 2.0,
            scale: 0.001,
            max_axis_speed: 1.5,
            probe_offset: 5,
            critical_depth: 20,
            run_force: 3.0,
            jump_force: 14.0,
            jump_hold_ticks: 4,
            enemy_speed: 0.2,
            slide_speed: 0.3,
            stomp_bounce: -0.6,
            laser_speed: 0.5,
            fish_launch_speed: 1.2,
            offscreen_tolerance: 16,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
