//! Polyomino Packing Puzzle
//!
//! Splits a level grid into polyomino pieces and lets you pack them back
//! onto the board from the terminal. Also lists, inspects and generates
//! levels.

mod play;
mod visualization;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flexi_logger::{AdaptiveFormat, Logger};
use rand::rngs::StdRng;
use rand::SeedableRng;

use puzzle2d::generator::generate_level;
use puzzle2d::persistence;
use puzzle2d::tray::TrayMetrics;
use puzzle2d::{Catalog, Engine, EngineConfig};

/// Packs polyomino pieces back onto their board.
#[derive(Parser)]
#[command(name = "puzzle2d")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter such as `debug` or `puzzle2d::snap=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Directory of level JSON files to use instead of the built-in levels.
    #[arg(long, global = true)]
    levels: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List available levels.
    List,
    /// Print a level's grid.
    Show { level: String },
    /// Print the pieces extracted from a level.
    Pieces {
        level: String,
        /// Seed for the initial orientations.
        #[arg(long)]
        seed: Option<u64>,
        /// Print piece snapshots as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Generate a random level.
    Generate {
        #[arg(long, default_value_t = 8)]
        width: usize,
        #[arg(long, default_value_t = 6)]
        height: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "generated")]
        id: String,
        #[arg(long, default_value = "Generated Level")]
        name: String,
        /// Write the level here instead of printing it.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Play a level, reading commands from stdin.
    Play {
        level: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
        /// Edge length of one board cell in pixels.
        #[arg(long, default_value_t = 60.0)]
        cell_size: f64,
        /// Tray width in pixels.
        #[arg(long, default_value_t = 600.0)]
        tray_width: f64,
        /// Gap around tray pieces in pixels.
        #[arg(long, default_value_t = 10.0)]
        margin: f64,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let logger = match &cli.log_level {
        Some(filter) => Logger::try_with_str(filter)?,
        None => Logger::try_with_env_or_str("info")?,
    };
    let _logger = logger
        .log_to_stderr()
        .adaptive_format_for_stderr(AdaptiveFormat::Default)
        .start()?;

    let catalog = match &cli.levels {
        Some(dir) => Catalog::from_dir(dir)
            .with_context(|| format!("failed to load levels from {}", dir.display()))?,
        None => Catalog::builtin().context("built-in levels are malformed")?,
    };

    match cli.command {
        Some(Command::List) => run_list(&catalog),
        Some(Command::Show { level }) => run_show(&catalog, &level)?,
        Some(Command::Pieces { level, seed, json }) => run_pieces(&catalog, &level, seed, json)?,
        Some(Command::Generate {
            width,
            height,
            seed,
            id,
            name,
            out,
        }) => run_generate(width, height, seed, &id, &name, out)?,
        Some(Command::Play {
            level,
            seed,
            cell_size,
            tray_width,
            margin,
        }) => {
            let metrics = TrayMetrics {
                width: tray_width,
                cell_size,
                margin,
            };
            run_play(&catalog, level, seed, metrics)?;
        }
        None => run_play(&catalog, None, None, TrayMetrics::default())?,
    }

    Ok(())
}

fn new_engine(config: EngineConfig, seed: Option<u64>) -> Engine {
    match seed {
        Some(seed) => Engine::with_seed(config, seed),
        None => Engine::new(config),
    }
}

/// Prints one line per level in play order.
fn run_list(catalog: &Catalog) {
    for level in catalog.levels() {
        println!(
            "{:<10} {}x{}  {}",
            level.id,
            level.grid.cols(),
            level.grid.rows(),
            level.name
        );
    }
}

fn run_show(catalog: &Catalog, id: &str) -> Result<()> {
    let level = catalog
        .get(id)
        .with_context(|| format!("no level named {id:?}"))?;
    println!("{} ({})", level.name, level.id);
    if let Some(description) = &level.description {
        println!("{description}");
    }
    print!("{}", level.grid);
    Ok(())
}

fn run_pieces(catalog: &Catalog, id: &str, seed: Option<u64>, json: bool) -> Result<()> {
    let mut engine = new_engine(EngineConfig::default(), seed);
    engine.load_level_by_id(catalog, id)?;
    let pieces = engine.pieces();

    if json {
        println!("{}", serde_json::to_string_pretty(&pieces)?);
    } else {
        print!("{}", visualization::render_tray(&pieces));
    }
    Ok(())
}

fn run_generate(
    width: usize,
    height: usize,
    seed: Option<u64>,
    id: &str,
    name: &str,
    out: Option<PathBuf>,
) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let level = generate_level(id, name, width, height, &mut rng)?;

    match out {
        Some(path) => {
            persistence::save(&level, &path)?;
            log::info!("wrote {}", path.display());
        }
        None => println!("{}", level.to_json()?),
    }
    Ok(())
}

fn run_play(
    catalog: &Catalog,
    level: Option<String>,
    seed: Option<u64>,
    metrics: TrayMetrics,
) -> Result<()> {
    let id = match level {
        Some(id) => id,
        None => catalog
            .ids()
            .first()
            .cloned()
            .context("no levels available")?,
    };

    let mut engine = new_engine(EngineConfig { tray: metrics }, seed);
    engine.load_level_by_id(catalog, &id)?;
    play::run(&mut engine, catalog, io::stdin().lock(), io::stdout().lock())
}
