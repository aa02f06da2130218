//! Environmental and scripted level elements
//!
//! Everything that is neither terrain nor an entity: hazards that trigger
//! on touch, auto-moving obstacles gated on an activation threshold, pure
//! limiters, and the checkpoint/end-of-level flags.

use serde::{Deserialize, Serialize};

use crate::sim::body::RigidBody;
use crate::sim::collide::limit_entity;
use crate::sim::entity::{EntityCore, Player};
use crate::sim::rect::{Hitbox, aabb};
use crate::sim::state::GameEvent;
use crate::tuning::Tuning;

/// Closed set of element variants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ElementKind {
    /// Kills the player on touch, then stays as a triggered hazard sprite
    Cloud { triggered: bool },
    /// Launches upward when activated and arcs under gravity; lethal
    Fish { body: RigidBody },
    /// Moves left at constant speed once activated; lethal
    Laser,
    /// Pure limiter
    Tube,
    /// Limiter; completes the level when touched during the end-flag slide
    House,
    /// One-shot: moves the player's respawn point
    CheckpointFlag { used: bool },
    /// Locks the player into the scripted slide toward the House
    EndFlag,
}

/// One level element, owned by the level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelElement {
    pub hitbox: Hitbox,
    /// Screen-space render rectangle
    pub dest: Hitbox,
    /// Reset target
    pub spawn: Hitbox,
    pub kind: ElementKind,
    /// For Fish/Laser: inert until the player's x crosses this
    pub activation_x: Option<i32>,
    pub activated: bool,
    pub removed: bool,
    /// One-shot flag for the render collaborator
    pub play_animation: bool,
}

impl LevelElement {
    pub fn new(kind: ElementKind, hitbox: Hitbox) -> Self {
        Self {
            hitbox,
            dest: hitbox,
            spawn: hitbox,
            kind,
            activation_x: None,
            activated: false,
            removed: false,
            play_animation: false,
        }
    }

    pub fn with_activation(mut self, x: i32) -> Self {
        self.activation_x = Some(x);
        self
    }

    pub fn fish(hitbox: Hitbox, activation_x: i32) -> Self {
        Self::new(ElementKind::Fish { body: RigidBody::new(1.0) }, hitbox).with_activation(activation_x)
    }

    pub fn laser(hitbox: Hitbox, activation_x: i32) -> Self {
        Self::new(ElementKind::Laser, hitbox).with_activation(activation_x)
    }

    /// Activate a threshold-gated element; the fish gets its launch impulse
    pub fn maybe_activate(&mut self, player_x: i32, tuning: &Tuning) {
        if self.activated {
            return;
        }
        let Some(threshold) = self.activation_x else {
            return;
        };
        if player_x >= threshold {
            self.activated = true;
            if let ElementKind::Fish { ref mut body } = self.kind {
                body.set_velocity_y(-tuning.fish_launch_speed);
            }
            log::debug!("element activated at x={threshold}");
        }
    }

    /// Per-frame motion for the auto-moving variants
    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        if self.removed || !self.activated {
            return;
        }
        match self.kind {
            ElementKind::Fish { ref mut body } => {
                body.update(dt, tuning);
                let delta = body.displacement();
                self.hitbox.x += delta.x as i32;
                self.hitbox.y += delta.y as i32;
            }
            ElementKind::Laser => {
                self.hitbox.x -= (tuning.laser_speed * dt) as i32;
            }
            _ => {}
        }
    }

    /// Whether touching this element is lethal to the player right now
    fn lethal(&self) -> bool {
        match self.kind {
            ElementKind::Cloud { .. } => true,
            ElementKind::Fish { .. } | ElementKind::Laser => self.activated,
            _ => false,
        }
    }

    /// Answer the player touching this element
    pub fn touched_by_player(
        &mut self,
        player: &mut Player,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) {
        if self.removed || !aabb(&player.core.hitbox, &self.hitbox) {
            return;
        }

        if self.lethal() {
            if let ElementKind::Cloud { ref mut triggered } = self.kind {
                if !*triggered {
                    *triggered = true;
                    self.play_animation = true;
                }
            }
            player.die();
            return;
        }

        match self.kind {
            ElementKind::Tube => limit_entity(&mut player.core, &self.hitbox, tuning),
            ElementKind::House => {
                if player.flag_run {
                    events.push(GameEvent::LevelCleared);
                } else {
                    limit_entity(&mut player.core, &self.hitbox, tuning);
                }
            }
            ElementKind::CheckpointFlag { ref mut used } => {
                if !*used {
                    *used = true;
                    self.play_animation = true;
                    player.core.spawn.x = self.hitbox.x;
                    player.core.spawn.y = self.hitbox.y + self.hitbox.h - player.core.spawn.h;
                    events.push(GameEvent::CheckpointReached);
                    log::info!("checkpoint moved spawn to x={}", self.hitbox.x);
                }
            }
            ElementKind::EndFlag => {
                if !player.flag_run {
                    player.flag_run = true;
                    events.push(GameEvent::FlagReached);
                }
            }
            _ => {}
        }
    }

    /// Answer an enemy touching this element: only the limiters care
    pub fn touched_by_enemy(&mut self, ent: &mut EntityCore, tuning: &Tuning) {
        if self.removed || !aabb(&ent.hitbox, &self.hitbox) {
            return;
        }
        if matches!(self.kind, ElementKind::Tube | ElementKind::House) {
            limit_entity(ent, &self.hitbox, tuning);
        }
    }

    /// Read and clear the animation flag
    pub fn take_animation(&mut self) -> bool {
        std::mem::take(&mut self.play_animation)
    }

    /// Back to layout state. A used checkpoint stays used: the respawn
    /// point it granted survives death resets.
    pub fn reset(&mut self) {
        self.hitbox = self.spawn;
        self.dest = self.spawn;
        self.activated = false;
        self.removed = false;
        self.play_animation = false;
        match self.kind {
            ElementKind::Cloud { ref mut triggered } => *triggered = false,
            ElementKind::Fish { ref mut body } => body.reset(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_on(el: &LevelElement) -> Player {
        Player::new(el.hitbox.x + 2, el.hitbox.y - 10)
    }

    #[test]
    fn test_cloud_kills_and_triggers_once() {
        let tuning = Tuning::default();
        let mut events = Vec::new();
        let mut cloud = LevelElement::new(
            ElementKind::Cloud { triggered: false },
            Hitbox::new(100, 100, 32, 24),
        );
        let mut player = player_on(&cloud);

        cloud.touched_by_player(&mut player, &tuning, &mut events);
        assert!(player.core.removed);
        assert!(matches!(cloud.kind, ElementKind::Cloud { triggered: true }));
        assert!(cloud.take_animation());
    }

    #[test]
    fn test_fish_inert_until_activation() {
        let tuning = Tuning::default();
        let mut fish = LevelElement::fish(Hitbox::new(500, 400, 24, 24), 300);
        let start = fish.hitbox;

        fish.update(16.0, &tuning);
        assert_eq!(fish.hitbox, start, "not activated, must not move");

        fish.maybe_activate(299, &tuning);
        assert!(!fish.activated);
        fish.maybe_activate(300, &tuning);
        assert!(fish.activated);

        fish.update(16.0, &tuning);
        assert!(fish.hitbox.y < start.y, "launched upward");
    }

    #[test]
    fn test_laser_moves_left_once_active() {
        let tuning = Tuning::default();
        let mut laser = LevelElement::laser(Hitbox::new(900, 200, 48, 8), 600);
        laser.maybe_activate(700, &tuning);
        let x0 = laser.hitbox.x;
        laser.update(16.0, &tuning);
        assert!(laser.hitbox.x < x0);
    }

    #[test]
    fn test_checkpoint_one_shot() {
        let tuning = Tuning::default();
        let mut events = Vec::new();
        let mut flag = LevelElement::new(
            ElementKind::CheckpointFlag { used: false },
            Hitbox::new(600, 400, 16, 64),
        );
        let mut player = player_on(&flag);
        let original_spawn = player.core.spawn;

        flag.touched_by_player(&mut player, &tuning, &mut events);
        assert_ne!(player.core.spawn, original_spawn);
        assert_eq!(player.core.spawn.x, 600);
        assert_eq!(events, vec![GameEvent::CheckpointReached]);

        // Second touch changes nothing
        flag.touched_by_player(&mut player, &tuning, &mut events);
        assert_eq!(events.len(), 1);

        // The granted respawn point survives a reset
        flag.reset();
        assert!(matches!(flag.kind, ElementKind::CheckpointFlag { used: true }));
    }

    #[test]
    fn test_end_flag_locks_slide_and_house_completes() {
        let tuning = Tuning::default();
        let mut events = Vec::new();
        let mut flag = LevelElement::new(ElementKind::EndFlag, Hitbox::new(800, 300, 8, 128));
        let mut house = LevelElement::new(ElementKind::House, Hitbox::new(900, 350, 96, 96));
        let mut player = player_on(&flag);

        flag.touched_by_player(&mut player, &tuning, &mut events);
        assert!(player.flag_run);
        assert_eq!(events, vec![GameEvent::FlagReached]);

        player.core.hitbox.x = 890;
        player.core.hitbox.y = 360;
        house.touched_by_player(&mut player, &tuning, &mut events);
        assert!(events.contains(&GameEvent::LevelCleared));
    }

    #[test]
    fn test_house_limits_without_flag() {
        let tuning = Tuning::default();
        let mut events = Vec::new();
        let mut house = LevelElement::new(ElementKind::House, Hitbox::new(900, 350, 96, 96));
        let mut player = Player::new(880, 360);
        player.core.body.set_velocity_x(1.0);

        house.touched_by_player(&mut player, &tuning, &mut events);
        assert!(events.is_empty());
        assert_eq!(player.core.body.velocity().x, 0.0, "limited like a wall");
    }
}
