use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snake_arcade::ResourceError;
use snake_arcade::audio::{AudioSink, BellAudio, SilentAudio};
use snake_arcade::game::{BonusExpiry, GameConfig, GameEngine};
use snake_arcade::highscore::{DEFAULT_HIGH_SCORE_FILE, HighScoreStore};
use snake_arcade::modes::{HeadlessMode, HumanMode};
use snake_arcade::session::Session;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_arcade")]
#[command(version, about = "Classic Snake with timed bonus food")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// TOML file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Playfield width in pixels, wall included
    #[arg(long)]
    width: Option<i32>,

    /// Playfield height in pixels, wall included
    #[arg(long)]
    height: Option<i32>,

    /// Grid cell size in pixels
    #[arg(long)]
    cell_size: Option<i32>,

    /// Milliseconds between simulation steps
    #[arg(long)]
    tick_ms: Option<u64>,

    /// What happens to an uneaten bonus food
    #[arg(long)]
    bonus_expiry: Option<ExpiryArg>,

    /// File holding the high score
    #[arg(long, default_value = DEFAULT_HIGH_SCORE_FILE)]
    high_score_file: PathBuf,

    /// Log file (the terminal is busy drawing the game)
    #[arg(long, default_value = "snake_arcade.log")]
    log_file: PathBuf,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Disable the terminal bell
    #[arg(long)]
    mute: bool,

    /// Rounds to play in headless mode
    #[arg(long, default_value = "10")]
    rounds: u32,

    /// Tick limit per round in headless mode
    #[arg(long, default_value = "5000")]
    max_ticks: u32,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
    /// Let the autopilot play without a terminal
    Headless,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExpiryArg {
    Clear,
    Respawn,
}

impl From<ExpiryArg> for BonusExpiry {
    fn from(arg: ExpiryArg) -> Self {
        match arg {
            ExpiryArg::Clear => BonusExpiry::Clear,
            ExpiryArg::Respawn => BonusExpiry::Respawn,
        }
    }
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied
    fn game_config(&self) -> Result<GameConfig, ResourceError> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.screen_width = width;
        }
        if let Some(height) = self.height {
            config.screen_height = height;
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if let Some(expiry) = self.bonus_expiry {
            config.bonus_expiry = expiry.into();
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_logging(path: &Path) -> Result<(), ResourceError> {
    let file = File::create(path).map_err(|source| ResourceError::LogFile {
        path: path.to_path_buf(),
        source,
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_file).context("Failed to set up logging")?;

    let config = cli.game_config().context("Failed to load game configuration")?;
    tracing::info!(?config, "starting snake_arcade");

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    };
    let store = HighScoreStore::new(&cli.high_score_file);

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Human => {
            let audio: Box<dyn AudioSink> = if cli.mute {
                Box::new(SilentAudio)
            } else {
                Box::new(BellAudio::new(std::io::stderr()))
            };
            let session = Session::with_engine(engine, store, audio);
            let mut human_mode = HumanMode::new(session);
            human_mode.run().await?;
        }
        Mode::Headless => {
            let session = Session::with_engine(engine, store, Box::new(SilentAudio));
            let mut headless_mode = HeadlessMode::new(session, cli.rounds, cli.max_ticks);
            let report = headless_mode.run();

            println!(
                "rounds: {} | ticks: {} | best: {} | high score: {}",
                report.rounds_played,
                report.total_ticks,
                report.best_score(),
                report.high_score
            );
            println!("scores: {:?}", report.scores);
            println!("{}", headless_mode.session().metrics().format_summary());
        }
    }

    Ok(())
}
