use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use delve_core::persist::{LevelSnapshot, restore, snapshot};
use delve_core::{
    Direction, Game, InputJournal, LevelGenerator, MAX_LEVEL, Pos, ReplayResult, replay_to_end,
};
use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

mod ascii;
mod config;
mod logger;

use ascii::{AsciiRenderer, draw_map, status_line};
use config::{FileConfig, Overrides};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log to stderr: -v for debug, -vv for trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build one level and print it
    Generate {
        #[command(flatten)]
        level: LevelArgs,
        /// Print a JSON summary instead of the map
        #[arg(long)]
        json: bool,
    },
    /// Play a run from keys (hjklyubn, '.' to wait, '>' on stairs, 'q' to quit)
    Play {
        #[command(flatten)]
        level: LevelArgs,
        /// Keys to apply; read from stdin when absent
        #[arg(short, long)]
        moves: Option<String>,
        /// Write the input journal here when the session ends
        #[arg(long)]
        journal: Option<PathBuf>,
        /// Write a level snapshot here when the session ends
        #[arg(long)]
        save: Option<PathBuf>,
        /// Only print messages, not the map after every turn
        #[arg(short, long)]
        quiet: bool,
    },
    /// Replay a journal and print the final state hash
    Replay {
        #[arg(short, long)]
        journal: PathBuf,
    },
    /// Restore a saved snapshot and print it
    Inspect {
        #[arg(short, long)]
        snapshot: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct LevelArgs {
    /// TOML file with [generation] and [spawn] tables
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    seed: Option<u64>,
    #[arg(short, long)]
    level: Option<u32>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
}

impl LevelArgs {
    fn resolve(&self) -> Result<FileConfig> {
        FileConfig::load(self.config.as_deref())?.apply(Overrides {
            seed: self.seed,
            level: self.level,
            width: self.width,
            height: self.height,
        })
    }
}

#[derive(Serialize)]
struct LevelSummary {
    seed: u64,
    level_number: u32,
    difficulty: String,
    rooms: usize,
    hallways: usize,
    enemies: usize,
    items: usize,
    traps: usize,
    start: Pos,
    stairs: Option<Pos>,
    fingerprint: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.verbose);

    match args.command {
        Command::Generate { level, json } => generate(&level, json),
        Command::Play { level, moves, journal, save, quiet } => {
            play(&level, moves.as_deref(), journal.as_deref(), save.as_deref(), quiet)
        }
        Command::Replay { journal } => replay(&journal),
        Command::Inspect { snapshot, config } => inspect(&snapshot, config.as_deref()),
    }
}

fn generate(args: &LevelArgs, json: bool) -> Result<()> {
    let settings = args.resolve()?;
    let level_number = settings.generation.level_number;
    let generator = LevelGenerator::new(settings.generation, settings.spawn);
    let level = generator
        .generate(level_number)
        .with_context(|| format!("failed to generate level {level_number}"))?;
    let map = &level.map;

    let summary = LevelSummary {
        seed: generator.config().seed,
        level_number,
        difficulty: format!("{:?}", level.difficulty),
        rooms: map.rooms.len(),
        hallways: map.hallways.len(),
        enemies: map.entities.len(),
        items: map.items.len(),
        traps: map.traps.len(),
        start: map.start,
        stairs: map.stairs,
        fingerprint: format!("{:016x}", xxh3_64(&map.canonical_bytes())),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", draw_map(map));
        println!(
            "seed {} level {} ({}): {} rooms, {} enemies, {} items, {} traps, fingerprint {}",
            summary.seed,
            summary.level_number,
            summary.difficulty,
            summary.rooms,
            summary.enemies,
            summary.items,
            summary.traps,
            summary.fingerprint
        );
    }
    Ok(())
}

fn play(
    args: &LevelArgs,
    moves: Option<&str>,
    journal_path: Option<&Path>,
    save_path: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let settings = args.resolve()?;
    let mut game = Game::start(settings.generation.clone(), settings.spawn.clone())
        .context("failed to start a run")?;
    let mut journal = InputJournal::new(settings.generation, settings.spawn);
    let mut renderer = AsciiRenderer { show_map: !quiet };
    renderer.show_game(&game)?;

    match moves {
        Some(keys) => {
            apply_keys(&mut game, &mut journal, &mut renderer, keys)?;
        }
        None => {
            for line in io::stdin().lock().lines() {
                let line = line.context("failed to read keys from stdin")?;
                if !apply_keys(&mut game, &mut journal, &mut renderer, &line)? {
                    break;
                }
            }
        }
    }

    match game.outcome() {
        Some(outcome) => println!("Run over after {} turns: {outcome:?}", game.current_turn()),
        None => println!("Stopped on level {} after {} turns.", game.level_number(), game.current_turn()),
    }
    println!("{}", status_line(game.player()?));

    if let Some(path) = journal_path {
        let text = journal.to_json().context("failed to serialize journal")?;
        fs::write(path, text)
            .with_context(|| format!("failed to write journal to {}", path.display()))?;
    }
    if let Some(path) = save_path {
        let text = snapshot(&game)?.to_json().context("failed to serialize snapshot")?;
        fs::write(path, text)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
    }
    Ok(())
}

/// Applies keys until they run out, the run ends or `q` is pressed.
/// Returns whether more input should be read.
fn apply_keys(
    game: &mut Game,
    journal: &mut InputJournal,
    renderer: &mut AsciiRenderer,
    keys: &str,
) -> Result<bool> {
    for key in keys.chars() {
        if game.is_finished() {
            return Ok(false);
        }
        match key {
            'q' => return Ok(false),
            '>' => descend(game, journal, renderer)?,
            key if key.is_whitespace() => {}
            key => match Direction::from_key(key) {
                Some(direction) => {
                    game.execute_turn(direction, renderer)?;
                    journal.append_move(direction);
                }
                None => log::warn!("ignoring unknown key {key:?}"),
            },
        }
    }
    Ok(!game.is_finished())
}

fn descend(game: &mut Game, journal: &mut InputJournal, renderer: &mut AsciiRenderer) -> Result<()> {
    let on_stairs = game.map().stairs == Some(game.player()?.pos);
    if !on_stairs {
        println!("There are no stairs here.");
        return Ok(());
    }
    if game.level_number() >= MAX_LEVEL {
        println!("The stairs lead nowhere deeper.");
        return Ok(());
    }
    let next = game.level_number() + 1;
    game.change_level(next, renderer)?;
    journal.append_level_change(next);
    Ok(())
}

fn replay(path: &Path) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read journal file {}", path.display()))?;
    let journal = InputJournal::from_json(&text).context("failed to deserialize journal JSON")?;

    let result: ReplayResult = replay_to_end(&journal).context("replay failed")?;

    println!("Replay complete.");
    println!("Final Turn: {}", result.final_turn);
    println!("Final Level: {}", result.final_level);
    println!("Outcome: {:?}", result.final_outcome);
    println!("Snapshot Hash: {}", result.final_snapshot_hash);
    Ok(())
}

fn inspect(path: &Path, config: Option<&Path>) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot file {}", path.display()))?;
    let saved = LevelSnapshot::from_json(&text).context("failed to deserialize snapshot JSON")?;
    let settings = FileConfig::load(config)?;
    let game = restore(&settings.generation, &settings.spawn, &saved)
        .context("snapshot does not fit its regenerated level")?;

    print!("{}", draw_map(game.map()));
    println!("{}", status_line(game.player()?));
    println!(
        "seed {} level {} turn {} snapshot hash {}",
        game.seed(),
        game.level_number(),
        game.current_turn(),
        game.snapshot_hash()
    );
    Ok(())
}
