mod activation;
mod app;
mod config;
mod food;
mod game;
mod input;
mod overlay;
mod page;
mod ports;
mod render;
mod snake;
mod store;
mod term;
mod timer;

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{Config, WriteLogger};

use crate::config::GameConfig;
use crate::ports::ScoreStore;
use crate::store::{FileScoreStore, MemoryScoreStore};

pub type TermInt = u16;
pub type Coords = (u16, u16);

#[derive(Parser)]
#[command(name = "hidden_snake")]
#[command(version, about = "A profile page with a snake hiding in it")]
struct Cli {
    /// YAML file with game settings
    #[arg(long, default_value = "snake.yaml")]
    config: PathBuf,

    /// File the best score is kept in
    #[arg(long, default_value = ".snake_scores.yaml")]
    scores: PathBuf,

    /// Keep the best score in memory only
    #[arg(long)]
    no_persist: bool,

    /// Override the tick interval in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Fixed seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "snake.log")]
    log_file: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal belongs to the page, so logs go to a file.
    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create {}", cli.log_file.display()))?;
    WriteLogger::init(cli.log_level, Config::default(), log_file)
        .context("Failed to initialize logger")?;

    let mut config = GameConfig::load(&cli.config)?;
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_interval_ms = tick_ms;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.validate()?;

    let store: Box<dyn ScoreStore> = if cli.no_persist {
        Box::new(MemoryScoreStore::new())
    } else {
        Box::new(FileScoreStore::open(&cli.scores))
    };

    info!("Page up, tick every {} ms", config.tick_interval_ms);
    app::App::new(config, store)?.run()
}
