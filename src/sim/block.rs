//! Static terrain blocks
//!
//! Blocks never move. Their `touched_by` either limits the entity like
//! plain geometry, or mutates block state (reveal, break, spawn) when hit
//! from below, raising events for the audio/render collaborators.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::ENEMY_H;
use crate::sim::collide::limit_entity;
use crate::sim::entity::{Enemy, EnemyKind, EntityCore, KING_HP};
use crate::sim::rect::{Hitbox, overhang_up};
use crate::sim::state::GameEvent;
use crate::tuning::Tuning;

/// Closed set of block variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockKind {
    /// Immovable limiter
    #[default]
    Solid,
    /// Invisible until bumped from below; then reveals and yields a coin
    Hidden,
    /// Breaks and disappears when bumped from below
    Brick,
    /// Yields its payload on the first bump from below, then goes inert
    Mystery,
}

/// What a Mystery block holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MysteryPayload {
    #[default]
    Coin,
    /// A transient enemy of a randomly chosen kind
    Enemy,
}

/// One terrain block, owned by the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub hitbox: Hitbox,
    /// Screen-space render rectangle
    pub dest: Hitbox,
    pub kind: BlockKind,
    pub payload: MysteryPayload,
    /// Soft-delete; the grid cell keeps its storage until a reset
    pub removed: bool,
    /// Hidden block has been bumped into visibility
    pub revealed: bool,
    /// Mystery block has yielded its payload
    pub spent: bool,
    /// One-shot flag for the render collaborator's bump/break animation
    pub play_animation: bool,
}

impl Block {
    pub fn new(kind: BlockKind, hitbox: Hitbox) -> Self {
        Self {
            hitbox,
            dest: hitbox,
            kind,
            payload: MysteryPayload::default(),
            removed: false,
            revealed: false,
            spent: false,
            play_animation: false,
        }
    }

    pub fn with_payload(mut self, payload: MysteryPayload) -> Self {
        self.payload = payload;
        self
    }

    /// Whether this block currently acts as collision geometry
    pub fn is_solid(&self) -> bool {
        if self.removed {
            return false;
        }
        match self.kind {
            BlockKind::Hidden => self.revealed,
            _ => true,
        }
    }

    /// Read and clear the animation flag (polled by the render layer)
    pub fn take_animation(&mut self) -> bool {
        std::mem::take(&mut self.play_animation)
    }

    /// Answer a touching entity.
    ///
    /// `spawned` receives transient enemies produced by Mystery blocks.
    pub fn touched_by(
        &mut self,
        ent: &mut EntityCore,
        tuning: &Tuning,
        rng: &mut Pcg32,
        events: &mut Vec<GameEvent>,
        spawned: &mut Vec<Enemy>,
    ) {
        // A bump from below needs upward motion and a real top-edge overhang
        let rising = ent.body.velocity().y < 0.0;
        let bumped = rising && overhang_up(&ent.hitbox, &self.hitbox, tuning.probe_offset) > 0;

        match self.kind {
            BlockKind::Solid => limit_entity(ent, &self.hitbox, tuning),

            BlockKind::Hidden => {
                if self.revealed {
                    limit_entity(ent, &self.hitbox, tuning);
                } else if bumped {
                    self.revealed = true;
                    self.play_animation = true;
                    events.push(GameEvent::BlockBump);
                    events.push(GameEvent::Coin);
                    limit_entity(ent, &self.hitbox, tuning);
                }
            }

            BlockKind::Brick => {
                limit_entity(ent, &self.hitbox, tuning);
                if bumped && !self.removed {
                    self.removed = true;
                    self.play_animation = true;
                    events.push(GameEvent::BrickBroken);
                }
            }

            BlockKind::Mystery => {
                if bumped && !self.spent {
                    self.spent = true;
                    self.play_animation = true;
                    events.push(GameEvent::BlockBump);
                    match self.payload {
                        MysteryPayload::Coin => events.push(GameEvent::Coin),
                        MysteryPayload::Enemy => {
                            let kind = random_enemy_kind(rng);
                            let mut enemy = Enemy::new(
                                kind,
                                self.hitbox.x,
                                self.hitbox.y - ENEMY_H - 1,
                                self.hitbox.x,
                            );
                            enemy.activated = true;
                            log::debug!("mystery block spawned {kind:?}");
                            events.push(GameEvent::EnemySpawned);
                            spawned.push(enemy);
                        }
                    }
                }
                limit_entity(ent, &self.hitbox, tuning);
            }
        }
    }

    /// Back to layout state; soft-deleted storage comes back to life
    pub fn reset(&mut self) {
        self.removed = false;
        self.revealed = false;
        self.spent = false;
        self.play_animation = false;
        self.dest = self.hitbox;
    }
}

fn random_enemy_kind(rng: &mut Pcg32) -> EnemyKind {
    match rng.random_range(0..5) {
        0 => EnemyKind::Common,
        1 => EnemyKind::Soldier,
        2 => EnemyKind::King { hp: KING_HP },
        3 => EnemyKind::RedMushroom,
        _ => EnemyKind::PurpleMushroom,
    }
}
