//! Entities: the player and the enemy roster
//!
//! The shared physics/collision state lives in [`EntityCore`]; the player
//! and each enemy kind are thin records around it. Enemy behavior differs
//! only in how a touch is answered, which the orchestration layer matches
//! on [`EnemyKind`] exhaustively - there is no "unknown entity" path.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ENEMY_H, ENEMY_W, PLAYER_H, PLAYER_W};
use crate::sim::body::RigidBody;
use crate::sim::rect::Hitbox;
use crate::tuning::Tuning;

/// Physics and collision state shared by every moving entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityCore {
    /// Authoritative collision geometry
    pub hitbox: Hitbox,
    /// Last frame's committed hitbox; recovery rolls back to this
    pub prev: Hitbox,
    /// Screen-space render rectangle, refreshed once per frame
    pub dest: Hitbox,
    /// Reset target
    pub spawn: Hitbox,
    pub body: RigidBody,
    /// Soft-delete: logically dead/hidden, storage retained by the owner
    pub removed: bool,
    /// Ambiguous horizontal penetration this frame; roll the axis back
    pub recover_x: bool,
    /// Ambiguous vertical penetration this frame; roll the axis back
    pub recover_y: bool,
    /// Latched when any collision correction was applied this session
    pub has_collided: bool,
    /// Standing on an obstacle as of the last resolution pass
    pub grounded: bool,
}

impl EntityCore {
    pub fn new(spawn: Hitbox, mass: f32) -> Self {
        Self {
            hitbox: spawn,
            prev: spawn,
            dest: spawn,
            spawn,
            body: RigidBody::new(mass),
            removed: false,
            recover_x: false,
            recover_y: false,
            has_collided: false,
            grounded: false,
        }
    }

    /// Integrate one timestep and move the hitbox by the resulting delta
    pub fn integrate(&mut self, dt: f32, tuning: &Tuning) {
        self.body.update(dt, tuning);
        let delta = self.body.displacement();
        self.hitbox.x += delta.x as i32;
        self.hitbox.y += delta.y as i32;
    }

    /// Roll ambiguous axes back to the previous frame's position.
    ///
    /// Idempotent: a second application without an intervening integration
    /// step leaves the hitbox unchanged.
    pub fn recover(&mut self) {
        if self.recover_x {
            self.hitbox.x = self.prev.x;
            self.recover_x = false;
        }
        if self.recover_y {
            self.hitbox.y = self.prev.y;
            self.recover_y = false;
        }
    }

    /// Record the now-final hitbox for next frame's recovery pass
    pub fn snapshot(&mut self) {
        self.prev = self.hitbox;
    }

    /// Back to spawn state without reallocation
    pub fn reset(&mut self) {
        self.hitbox = self.spawn;
        self.prev = self.spawn;
        self.dest = self.spawn;
        self.body.reset();
        self.removed = false;
        self.recover_x = false;
        self.recover_y = false;
        self.has_collided = false;
        self.grounded = false;
    }
}

/// Player input relevant to movement, already polled by the platform layer
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// The controllable character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub core: EntityCore,
    /// Ticks of jump force still to be re-issued
    pub jump_ticks: u32,
    /// Power-up state; absorbs one enemy hit
    pub giga: bool,
    /// Scripted end-flag slide: input is ignored until the House is reached
    pub flag_run: bool,
    /// Lifetime death counter; survives level resets
    pub deaths: u32,
}

impl Player {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            core: EntityCore::new(Hitbox::new(x, y, PLAYER_W, PLAYER_H), 1.0),
            jump_ticks: 0,
            giga: false,
            flag_run: false,
            deaths: 0,
        }
    }

    /// Translate input into this frame's forces.
    ///
    /// Forces are overwritten each frame by design, so everything here is
    /// re-issued unconditionally.
    pub fn control(&mut self, input: &MoveInput, tuning: &Tuning) {
        if self.flag_run {
            // End-flag slide: ignore input, walk right at the slide speed
            self.core.body.apply_force_x(0.0);
            self.core.body.set_velocity_x(tuning.slide_speed);
            return;
        }

        if input.right && !input.left {
            self.core.body.apply_force_x(tuning.run_force);
        } else if input.left && !input.right {
            self.core.body.apply_force_x(-tuning.run_force);
        } else {
            self.core.body.apply_force_x(0.0);
            self.core.body.set_velocity_x(0.0);
        }

        if input.jump && self.core.grounded {
            self.jump_ticks = tuning.jump_hold_ticks;
        }
        if !input.jump {
            // Releasing the button cuts the jump short
            self.jump_ticks = 0;
        }
        if self.jump_ticks > 0 {
            self.core.body.apply_force_y(-tuning.jump_force);
            self.jump_ticks -= 1;
        } else {
            self.core.body.apply_force_y(0.0);
        }
    }

    /// Mark the player dead and bump the lifetime counter
    pub fn die(&mut self) {
        if !self.core.removed {
            self.core.removed = true;
            self.deaths += 1;
        }
    }

    /// Respawn at the (possibly checkpoint-moved) spawn point.
    ///
    /// Keeps the death counter; drops power-up and scripted movement.
    pub fn reset(&mut self) {
        self.core.reset();
        self.jump_ticks = 0;
        self.giga = false;
        self.flag_run = false;
    }
}

/// Closed set of enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Walks, dies to a stomp, kills on a side touch
    Common,
    /// As Common, with its own animation set
    Soldier,
    /// Takes several stomps before going down
    King { hp: u8 },
    /// Looks like a power-up; kills on any touch, stomp included
    RedMushroom,
    /// The real power-up: grants giga on touch
    PurpleMushroom,
}

/// An enemy, persistent (from the layout) or transient (block-spawned)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub core: EntityCore,
    pub kind: EnemyKind,
    /// Inert and invisible until the player's x crosses this threshold
    pub activation_x: i32,
    pub activated: bool,
    /// Patrol direction: -1 walks left, 1 walks right
    pub dir: i32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, x: i32, y: i32, activation_x: i32) -> Self {
        Self {
            core: EntityCore::new(Hitbox::new(x, y, ENEMY_W, ENEMY_H), 1.0),
            kind,
            activation_x,
            activated: false,
            dir: -1,
        }
    }

    /// Activate once the player has come close enough
    pub fn maybe_activate(&mut self, player_x: i32) {
        if !self.activated && player_x >= self.activation_x {
            self.activated = true;
            log::debug!("enemy {:?} activated at x={}", self.kind, self.activation_x);
        }
    }

    /// Re-issue the patrol velocity for this frame
    pub fn patrol(&mut self, tuning: &Tuning) {
        self.core
            .body
            .set_velocity_x(self.dir as f32 * tuning.enemy_speed);
        self.core.body.apply_force(Vec2::ZERO);
    }

    /// Walked into a wall or another enemy: turn around
    pub fn reverse(&mut self) {
        self.dir = -self.dir;
    }

    /// Answer a stomp. Returns true if the enemy is defeated by it.
    ///
    /// RedMushroom is the troll case: the stomp does not help the player,
    /// and the caller kills the player instead.
    pub fn stomped(&mut self) -> bool {
        match self.kind {
            EnemyKind::Common | EnemyKind::Soldier | EnemyKind::PurpleMushroom => {
                self.core.removed = true;
                true
            }
            EnemyKind::King { ref mut hp } => {
                *hp = hp.saturating_sub(1);
                if *hp == 0 {
                    self.core.removed = true;
                    true
                } else {
                    false
                }
            }
            EnemyKind::RedMushroom => false,
        }
    }

    /// Back to spawn: deactivated, facing left, full health
    pub fn reset(&mut self) {
        self.core.reset();
        self.activated = false;
        self.dir = -1;
        if let EnemyKind::King { ref mut hp } = self.kind {
            *hp = KING_HP;
        }
    }
}

/// Stomps a King takes before going down
pub const KING_HP: u8 = 3;
