//! Semi-implicit Euler rigid body integrator
//!
//! One body per entity. Forces are overwritten, not accumulated: a caller
//! that wants a force to persist must re-issue it every frame. The
//! `displacement` vector is likewise overwritten each update; it is the
//! per-frame position delta (`velocity * dt`) that the owning entity adds
//! to its integer hitbox, never an absolute position.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Per-entity physics state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBody {
    mass: f32,
    force: Vec2,
    velocity: Vec2,
    acceleration: Vec2,
    displacement: Vec2,
}

impl RigidBody {
    /// Create a body. Mass must be positive; it divides the applied force.
    pub fn new(mass: f32) -> Self {
        debug_assert!(mass > 0.0);
        Self {
            mass,
            force: Vec2::ZERO,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            displacement: Vec2::ZERO,
        }
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    /// The position delta produced by the last `update` call
    pub fn displacement(&self) -> Vec2 {
        self.displacement
    }

    /// Overwrite the net applied force
    pub fn apply_force(&mut self, force: Vec2) {
        self.force = force;
    }

    /// Overwrite the horizontal force component
    pub fn apply_force_x(&mut self, fx: f32) {
        self.force.x = fx;
    }

    /// Overwrite the vertical force component
    pub fn apply_force_y(&mut self, fy: f32) {
        self.force.y = fy;
    }

    /// Zero the net force
    pub fn remove_forces(&mut self) {
        self.force = Vec2::ZERO;
    }

    /// Overwrite the horizontal velocity (collision response)
    pub fn set_velocity_x(&mut self, vx: f32) {
        self.velocity.x = vx;
    }

    /// Overwrite the vertical velocity (collision response)
    pub fn set_velocity_y(&mut self, vy: f32) {
        self.velocity.y = vy;
    }

    /// Advance by one fixed timestep.
    ///
    /// Recomputes acceleration from the currently-set force plus gravity,
    /// integrates velocity, clamps it componentwise, and overwrites the
    /// displacement with `velocity * dt`.
    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        self.acceleration = Vec2::new(
            self.force.x / self.mass,
            tuning.gravity + self.force.y / self.mass,
        ) * tuning.scale;

        self.velocity += self.acceleration * dt;
        self.velocity = self.velocity.clamp(
            Vec2::splat(-tuning.max_axis_speed),
            Vec2::splat(tuning.max_axis_speed),
        );

        self.displacement = self.velocity * dt;
    }

    /// Zero force, acceleration, velocity, and displacement
    pub fn reset(&mut self) {
        self.force = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
        self.velocity = Vec2::ZERO;
        self.displacement = Vec2::ZERO;
    }
}
