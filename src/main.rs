use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;

use snake::app::SnakeApp;
use snake::config::{load_config, GameConfig};
use snake::record::{JsonRecordFile, MemoryRecordStore, RecordStore, DEFAULT_RECORD_FILE};
use snake::render;
use snake::term::TermManager;
use snake::Game;

#[derive(Parser)]
#[command(name = "snake")]
#[command(version, about = "Snake on a wrap-around board, with poison and stones")]
struct Cli {
    /// JSON file with a game configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board width in cells
    #[arg(long)]
    width: Option<u16>,

    /// Board height in cells
    #[arg(long)]
    height: Option<u16>,

    /// Size the board to fill the terminal
    #[arg(long, conflicts_with_all = ["width", "height"])]
    fit: bool,

    #[arg(long)]
    apples: Option<usize>,

    #[arg(long)]
    poisons: Option<usize>,

    #[arg(long)]
    stones: Option<usize>,

    /// Starting speed in ticks per second
    #[arg(long)]
    speed: Option<u32>,

    #[arg(long)]
    min_speed: Option<u32>,

    #[arg(long)]
    max_speed: Option<u32>,

    /// Seed for a reproducible board
    #[arg(long)]
    seed: Option<u64>,

    /// Where the best length is kept
    #[arg(long, default_value = DEFAULT_RECORD_FILE)]
    record_file: PathBuf,

    /// Read the record but never write it back
    #[arg(long)]
    no_save: bool,

    #[arg(long, default_value = "snake.log")]
    log_file: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        let mut config = self.config.as_deref().map(load_config).unwrap_or_default();

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(apples) = self.apples {
            config.apples = apples;
        }
        if let Some(poisons) = self.poisons {
            config.poisons = poisons;
        }
        if let Some(stones) = self.stones {
            config.stones = stones;
        }
        if let Some(speed) = self.speed {
            config.start_speed = speed;
        }
        if let Some(min_speed) = self.min_speed {
            config.min_speed = min_speed;
        }
        if let Some(max_speed) = self.max_speed {
            config.max_speed = max_speed;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config
    }

    fn record_store(&self) -> Box<dyn RecordStore> {
        let file = JsonRecordFile::new(&self.record_file);
        if self.no_save {
            Box::new(MemoryRecordStore::new(file.load_record()))
        } else {
            Box::new(file)
        }
    }
}

// The terminal belongs to the game, so logs go to a file
fn init_logging(path: &Path, verbose: bool) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file {}", path.display()))?;
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file, cli.verbose)?;

    let term = TermManager::new()?;
    let mut config = cli.game_config();
    if cli.fit {
        let grid = render::fit_grid(term.size())?;
        config.grid_width = grid.width();
        config.grid_height = grid.height();
    }
    tracing::info!(?config, "starting");

    let game = Game::new(config, cli.record_store())?;
    let mut app = SnakeApp::new(game, term)?;
    app.run()
}
