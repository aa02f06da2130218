//! Headless demo runner
//!
//! Builds a small level and drives it with a scripted input sequence at the
//! fixed simulation rate, logging the events the core raises. Useful for
//! eyeballing physics changes without a render frontend.

use clap::Parser;

use pounce::consts::{CELL_SIZE, SIM_DT};
use pounce::sim::{
    Block, BlockKind, ElementKind, Enemy, EnemyKind, GamePhase, Hitbox, Level, LevelBuilder,
    LevelElement, MysteryPayload, SimError, TickInput, tick,
};
use pounce::Tuning;

#[derive(Parser, Debug)]
#[command(name = "pounce", about = "Headless platformer simulation demo")]
struct Args {
    /// RNG seed for mystery-block payloads
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of simulation ticks to run
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Path to a JSON tuning override file
    #[arg(long)]
    tuning: Option<std::path::PathBuf>,
}

fn demo_level(seed: u64) -> Result<Level, SimError> {
    let mut builder = LevelBuilder::new(16, 120)
        .seed(seed)
        .player_at(64, 448);

    // Floor with a pit around columns 40..43
    for col in 0..120 {
        if (40..43).contains(&col) {
            continue;
        }
        builder = builder.block(15, col, Block::new(BlockKind::Solid, Hitbox::default()));
    }

    // A row of bumpable blocks over the early stretch
    builder = builder
        .block(11, 8, Block::new(BlockKind::Brick, Hitbox::default()))
        .block(11, 9, Block::new(BlockKind::Mystery, Hitbox::default()))
        .block(
            11,
            10,
            Block::new(BlockKind::Mystery, Hitbox::default())
                .with_payload(MysteryPayload::Enemy),
        )
        .block(11, 11, Block::new(BlockKind::Hidden, Hitbox::default()));

    // Patrolling enemies, gated on the player's approach
    builder = builder
        .enemy(Enemy::new(EnemyKind::Common, 20 * CELL_SIZE, 450, 10 * CELL_SIZE))
        .enemy(Enemy::new(EnemyKind::Soldier, 50 * CELL_SIZE, 450, 35 * CELL_SIZE))
        .enemy(Enemy::new(
            EnemyKind::King { hp: 3 },
            80 * CELL_SIZE,
            450,
            65 * CELL_SIZE,
        ));

    // Hazards, a checkpoint, and the end-of-level furniture
    builder = builder
        .element(LevelElement::new(
            ElementKind::Tube,
            Hitbox::new(30 * CELL_SIZE, 13 * CELL_SIZE, 2 * CELL_SIZE, 2 * CELL_SIZE),
        ))
        .element(LevelElement::fish(
            Hitbox::new(41 * CELL_SIZE, 17 * CELL_SIZE, 24, 24),
            38 * CELL_SIZE,
        ))
        .element(LevelElement::laser(
            Hitbox::new(75 * CELL_SIZE, 13 * CELL_SIZE, 48, 8),
            60 * CELL_SIZE,
        ))
        .element(LevelElement::new(
            ElementKind::CheckpointFlag { used: false },
            Hitbox::new(60 * CELL_SIZE, 11 * CELL_SIZE, 16, 4 * CELL_SIZE),
        ))
        .element(LevelElement::new(
            ElementKind::EndFlag,
            Hitbox::new(110 * CELL_SIZE, 11 * CELL_SIZE, 8, 4 * CELL_SIZE),
        ))
        .element(LevelElement::new(
            ElementKind::House,
            Hitbox::new(114 * CELL_SIZE, 12 * CELL_SIZE, 3 * CELL_SIZE, 3 * CELL_SIZE),
        ));

    builder.build()
}

/// Scripted input: confirm through the menus, then run right and hop
fn scripted_input(tick_no: u64, phase: GamePhase) -> TickInput {
    match phase {
        GamePhase::Title | GamePhase::Menu => TickInput {
            confirm: true,
            ..Default::default()
        },
        GamePhase::Playing => TickInput {
            right: true,
            jump: tick_no % 90 < 12,
            ..Default::default()
        },
        _ => TickInput::default(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let tuning = match &args.tuning {
        Some(path) => Tuning::from_json_str(&std::fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };

    let mut level = demo_level(args.seed)?;
    log::info!(
        "demo level: {} px wide, seed {}",
        level.width_px(),
        args.seed
    );

    let mut cleared = false;
    for tick_no in 0..args.ticks {
        let input = scripted_input(tick_no, level.phase);
        tick(&mut level, &input, SIM_DT, &tuning)?;

        for event in level.drain_events() {
            log::info!("tick {tick_no}: {event:?}");
        }
        if level.phase == GamePhase::Loading {
            cleared = true;
        }
    }

    println!(
        "ran {} ticks: player at ({}, {}), deaths {}, cleared: {}",
        args.ticks,
        level.player.core.hitbox.x,
        level.player.core.hitbox.y,
        level.player.deaths,
        cleared
    );
    Ok(())
}
