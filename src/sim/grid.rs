//! Dense spatial index for static terrain
//!
//! Row-major array of optional blocks. Levels are much wider than the
//! screen, so every scan - collision checks, dest-rect refresh, render
//! queries - is restricted to the camera-visible column range, giving an
//! O(visible area) cost per frame instead of O(level area).

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::CELL_SIZE;
use crate::sim::SimError;
use crate::sim::block::Block;
use crate::sim::camera::Camera;
use crate::sim::entity::{Enemy, EntityCore};
use crate::sim::rect::{Hitbox, aabb};
use crate::sim::state::GameEvent;
use crate::tuning::Tuning;

/// Owns every block in the level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Block>>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Level width in world pixels
    pub fn width_px(&self) -> i32 {
        self.cols as i32 * CELL_SIZE
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, SimError> {
        if row >= self.rows || col >= self.cols {
            return Err(SimError::GridOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<&Option<Block>, SimError> {
        let i = self.index(row, col)?;
        Ok(&self.cells[i])
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut Option<Block>, SimError> {
        let i = self.index(row, col)?;
        Ok(&mut self.cells[i])
    }

    /// Place a block in a cell, deriving its hitbox from the cell position
    pub fn place(&mut self, row: usize, col: usize, mut block: Block) -> Result<(), SimError> {
        let hitbox = Hitbox::new(
            col as i32 * CELL_SIZE,
            row as i32 * CELL_SIZE,
            CELL_SIZE,
            CELL_SIZE,
        );
        block.hitbox = hitbox;
        block.dest = hitbox;
        let i = self.index(row, col)?;
        self.cells[i] = Some(block);
        Ok(())
    }

    /// Column range currently visible on screen, clamped to grid bounds
    pub fn visible_cols(&self, camera: &Camera) -> std::ops::Range<usize> {
        let first = (camera.x / CELL_SIZE).max(0) as usize;
        let last = (((camera.x + camera.w) / CELL_SIZE + 1).max(0) as usize).min(self.cols);
        first.min(self.cols)..last
    }

    /// Run `touched_by` on every visible, live block overlapping the entity
    pub fn check_collision(
        &mut self,
        ent: &mut EntityCore,
        camera: &Camera,
        tuning: &Tuning,
        rng: &mut Pcg32,
        events: &mut Vec<GameEvent>,
        spawned: &mut Vec<Enemy>,
    ) -> Result<(), SimError> {
        let cols = self.visible_cols(camera);
        for row in 0..self.rows {
            for col in cols.clone() {
                let i = self.index(row, col)?;
                if let Some(block) = self.cells[i].as_mut() {
                    if !block.removed && aabb(&ent.hitbox, &block.hitbox) {
                        block.touched_by(ent, tuning, rng, events, spawned);
                    }
                }
            }
        }
        Ok(())
    }

    /// Refresh render-destination rectangles for the visible blocks
    pub fn refresh_dest(&mut self, camera: &Camera) {
        let cols = self.visible_cols(camera);
        for row in 0..self.rows {
            for col in cols.clone() {
                let i = row * self.cols + col;
                if let Some(block) = self.cells[i].as_mut() {
                    block.dest = camera.to_screen(&block.hitbox);
                }
            }
        }
    }

    /// Restore every block to its layout state in place
    pub fn reset(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            cell.reset();
        }
    }
}
