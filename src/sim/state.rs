//! Level state and scene phases
//!
//! Everything the per-frame orchestration mutates lives here. The level is
//! fully populated by the (external) level loader before the first tick;
//! [`LevelBuilder`] is the in-process stand-in used by tests and the demo
//! binary.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{SCREEN_H, SCREEN_W};
use crate::sim::block::Block;
use crate::sim::camera::Camera;
use crate::sim::element::LevelElement;
use crate::sim::entity::{Enemy, Player};
use crate::sim::grid::Grid;
use crate::sim::SimError;

/// Current scene, driven by events and the crossfade timer.
///
/// Physics only integrates in `Playing`; everything else freezes the
/// entity graph in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title card, waiting for confirm
    Title,
    /// Level select / menu, waiting for confirm
    Menu,
    /// Active gameplay
    Playing,
    /// Paused mid-level
    Paused,
    /// Death card; the level resets when the fade runs out
    Death,
    /// Level-complete crossfade back to the menu
    Loading,
}

/// Simulation events for the audio/scene collaborators to drain.
///
/// The physics core raises these instead of calling into audio or
/// rendering; a polling step outside the core consumes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Coin,
    BlockBump,
    BrickBroken,
    EnemySpawned,
    Stomp,
    PowerUp,
    PlayerDied,
    CheckpointReached,
    FlagReached,
    LevelCleared,
}

/// One loaded level plus the player and the camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub player: Player,
    /// Enemies from the static layout; reset in place
    pub enemies: Vec<Enemy>,
    /// Block-spawned enemies; cleared wholesale on reset
    pub transient: Vec<Enemy>,
    pub grid: Grid,
    pub elements: Vec<LevelElement>,
    pub camera: Camera,
    pub phase: GamePhase,
    /// Drained by the collaborators after each tick
    pub events: Vec<GameEvent>,
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
    pub time_ticks: u64,
    /// Ticks left on the current death/loading crossfade
    pub fade_ticks: u32,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

impl Level {
    /// Drain the event queue (for the audio/scene polling step)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Level width in world pixels
    pub fn width_px(&self) -> i32 {
        self.grid.width_px()
    }

    /// Restore the level to spawn state without reallocation.
    ///
    /// The player respawns at the (possibly checkpoint-moved) spawn point;
    /// layout enemies, blocks, and elements reset in place; transient
    /// enemies are destroyed wholesale. The RNG is reseeded so a fresh run
    /// from the same seed replays identically.
    pub fn reset(&mut self) {
        self.player.reset();
        for enemy in &mut self.enemies {
            enemy.reset();
        }
        self.transient.clear();
        self.grid.reset();
        for element in &mut self.elements {
            element.reset();
        }
        self.camera = Camera::new(0, 0, SCREEN_W, SCREEN_H);
        self.camera.follow(&self.player.core.hitbox, self.width_px());
        self.events.clear();
        self.rng = Pcg32::seed_from_u64(self.seed);
        log::info!("level reset (deaths so far: {})", self.player.deaths);
    }
}

/// Builds a fully-populated level the way the external loader would
pub struct LevelBuilder {
    rows: usize,
    cols: usize,
    seed: u64,
    player_spawn: (i32, i32),
    blocks: Vec<(usize, usize, Block)>,
    enemies: Vec<Enemy>,
    elements: Vec<LevelElement>,
}

impl LevelBuilder {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            seed: 0,
            player_spawn: (64, 64),
            blocks: Vec::new(),
            enemies: Vec::new(),
            elements: Vec::new(),
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn player_at(mut self, x: i32, y: i32) -> Self {
        self.player_spawn = (x, y);
        self
    }

    pub fn block(mut self, row: usize, col: usize, block: Block) -> Self {
        self.blocks.push((row, col, block));
        self
    }

    pub fn enemy(mut self, enemy: Enemy) -> Self {
        self.enemies.push(enemy);
        self
    }

    pub fn element(mut self, element: LevelElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Assemble the level, starting at the title card
    pub fn build(self) -> Result<Level, SimError> {
        let mut grid = Grid::new(self.rows, self.cols);
        for (row, col, block) in self.blocks {
            grid.place(row, col, block)?;
        }

        let player = Player::new(self.player_spawn.0, self.player_spawn.1);
        let mut camera = Camera::new(0, 0, SCREEN_W, SCREEN_H);
        camera.follow(&player.core.hitbox, grid.width_px());

        Ok(Level {
            player,
            enemies: self.enemies,
            transient: Vec::new(),
            grid,
            elements: self.elements,
            camera,
            phase: GamePhase::Title,
            events: Vec::new(),
            seed: self.seed,
            rng: Pcg32::seed_from_u64(self.seed),
            time_ticks: 0,
            fade_ticks: 0,
        })
    }
}
