use std::collections::BTreeSet;

use anyhow::{Result, bail};
use clap::Parser;
use delve_core::{
    Direction, Game, GenerationConfig, MAX_LEVEL, NullRenderer, SpawnConfig, TileKind,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    turns: u32,
    /// Number of consecutive seeds to run, starting at --seed
    #[arg(short, long, default_value_t = 1)]
    runs: u64,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn check_invariants(game: &Game) -> Result<()> {
    let map = game.map();
    let mut occupied = BTreeSet::new();
    for entity in map.entities.values().filter(|entity| entity.alive) {
        let tile = map.tile_at(entity.pos);
        if !tile.is_walkable() {
            bail!("Invariant failed: {} inside {tile:?} at {:?}", entity.name, entity.pos);
        }
        if !occupied.insert(entity.pos) {
            bail!("Invariant failed: two living entities on {:?}", entity.pos);
        }
        if entity.life <= 0 || entity.life > entity.max_life {
            bail!("Invariant failed: {} has life {}/{}", entity.name, entity.life, entity.max_life);
        }
    }
    if map.tile_at(map.start) == TileKind::Wall {
        bail!("Invariant failed: start position is a wall");
    }
    Ok(())
}

fn run(seed: u64, turns: u32) -> Result<()> {
    let generation = GenerationConfig::default().with_seed(seed);
    let mut game = Game::start(generation, SpawnConfig::default())?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut renderer = NullRenderer;

    for _ in 0..turns {
        let direction = choose(&mut rng, &Direction::ALL);
        let report = game.execute_turn(direction, &mut renderer)?;
        check_invariants(&game)?;

        if let Some(outcome) = report.outcome {
            println!(
                "seed {seed}: {outcome:?} on level {} after {} turns",
                game.level_number(),
                game.current_turn()
            );
            return Ok(());
        }
        if report.reached_stairs && game.level_number() < MAX_LEVEL {
            game.change_level(game.level_number() + 1, &mut renderer)?;
            check_invariants(&game)?;
        }
        if game.current_turn() % 100 == 0 {
            game.map_mut().reap_dead();
        }
    }

    println!("seed {seed}: alive on level {} after {turns} turns", game.level_number());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!(
        "Starting fuzz harness on {} seed(s) from {} for max {} turns...",
        args.runs, args.seed, args.turns
    );
    for seed in args.seed..args.seed + args.runs {
        run(seed, args.turns)?;
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}
