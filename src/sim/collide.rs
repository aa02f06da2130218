//! Entity-vs-obstacle penetration resolution
//!
//! Order matters: the vertical axis is resolved before the horizontal one,
//! and the horizontal pass only runs when the entity's vertical band
//! genuinely overlaps the obstacle's - otherwise a corner graze left over
//! after the vertical correction would get snapped sideways.
//!
//! An entity over-penetrating on both sides of an axis is never corrected
//! immediately. The frame's hitbox is left as physics computed it and a
//! rollback flag is set; the orchestration layer later restores that axis
//! from the previous frame's snapshot. Freezing beats teleporting wrong.

use crate::sim::entity::EntityCore;
use crate::sim::rect::{Hitbox, overhang_down, overhang_left, overhang_right, overhang_up};
use crate::tuning::Tuning;

/// Resolve one entity against one piece of immovable geometry.
///
/// Mutates the entity's hitbox, velocity, and recovery/ground flags.
pub fn limit_entity(ent: &mut EntityCore, obstacle: &Hitbox, tuning: &Tuning) {
    let up = overhang_up(&ent.hitbox, obstacle, tuning.probe_offset);
    let down = overhang_down(
        &ent.hitbox,
        obstacle,
        tuning.probe_offset,
        tuning.critical_depth,
    );

    if up > 0 && down > 0 {
        // Engulfed: ambiguous, roll the axis back at end of frame
        ent.recover_y = true;
        ent.has_collided = true;
        log::trace!("vertical double overhang, flagging recovery");
    } else if up > 0 {
        // Blocked going up: bumped the obstacle from below
        ent.hitbox.y += up;
        ent.body.set_velocity_y(0.0);
        ent.has_collided = true;
        log::trace!("corrected down by {up}");
    } else if down > 0 {
        // Standing on the obstacle: push out and cancel this frame's
        // gravity. The cancel holds only until the owner re-issues its
        // forces, so resting contact re-detects every other tick; the
        // one-pixel sink is corrected before the frame commits.
        ent.hitbox.y -= down;
        ent.body.set_velocity_y(0.0);
        ent.body.apply_force_y(-tuning.gravity * ent.body.mass());
        ent.grounded = true;
        ent.has_collided = true;
        log::trace!("corrected up by {down}");
    }

    // Horizontal pass, gated on genuine vertical band overlap at y+1
    if ent.hitbox.y + 1 < obstacle.y + obstacle.h && ent.hitbox.y + ent.hitbox.h > obstacle.y + 1 {
        let right = overhang_right(&ent.hitbox, obstacle);
        let left = overhang_left(&ent.hitbox, obstacle);

        if right > 0 && left > 0 {
            ent.recover_x = true;
            ent.has_collided = true;
            log::trace!("horizontal double overhang, flagging recovery");
        } else if right > 0 {
            ent.hitbox.x -= right;
            ent.body.set_velocity_x(0.0);
            ent.has_collided = true;
            log::trace!("corrected left by {right}");
        } else if left > 0 {
            ent.hitbox.x += left;
            ent.body.set_velocity_x(0.0);
            ent.has_collided = true;
            log::trace!("corrected right by {left}");
        }
    }
}
