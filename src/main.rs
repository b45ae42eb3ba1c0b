use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{error, info};
use simplelog::{Config, LevelFilter, WriteLogger};
use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use term_arcade::console::{self, Console, InterruptSender, InterruptibleInput};
use term_arcade::game::GameConfig;
use term_arcade::launcher::{run_launcher, ProcessRunner};
use term_arcade::modes::SnakeMode;
use term_arcade::scoreboard::{Scoreboard, DEFAULT_SCORES_FILE};

#[derive(Parser)]
#[command(name = "term_arcade")]
#[command(version, about = "A collection of terminal games")]
struct Cli {
    /// Game to run; the launcher lets the player pick one
    #[arg(long, value_enum, default_value = "launcher")]
    game: Game,

    /// Snake grid width
    #[arg(long, default_value = "40")]
    width: usize,

    /// Snake grid height
    #[arg(long, default_value = "30")]
    height: usize,

    /// Where snake best scores are kept
    #[arg(long, default_value = DEFAULT_SCORES_FILE)]
    scores_file: PathBuf,

    /// Log file; the terminal itself belongs to the games
    #[arg(long, default_value = "term_arcade.log")]
    log_file: PathBuf,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Clone, Copy, ValueEnum)]
enum Game {
    /// Text menu that starts the other games
    Launcher,
    /// Snake with difficulties, modes and levels
    Snake,
    /// Guess the number
    Guess,
    /// Rock paper scissors
    Rps,
}

fn init_logging(path: &Path, level: LevelFilter) -> Result<()> {
    // Append so the launcher and the games it spawns share one log
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    WriteLogger::init(level, Config::default(), file).context("Failed to initialize logger")
}

/// Arguments every spawned game inherits from the launcher
fn forwarded_args(cli: &Cli) -> Vec<OsString> {
    vec![
        "--width".into(),
        cli.width.to_string().into(),
        "--height".into(),
        cli.height.to_string().into(),
        "--scores-file".into(),
        cli.scores_file.clone().into_os_string(),
        "--log-file".into(),
        cli.log_file.clone().into_os_string(),
        "--log-level".into(),
        cli.log_level.to_string().into(),
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file, cli.log_level)?;

    let result = run(&cli).await;
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

async fn run(cli: &Cli) -> Result<()> {
    match cli.game {
        Game::Launcher => {
            info!("starting launcher");
            let runner = ProcessRunner::current(forwarded_args(cli))?;
            run_line_game(move |prompt, interrupts| {
                run_launcher(prompt, &mut runner.with_interrupts(interrupts))
            })
            .await?;
        }
        Game::Snake => {
            // Create game configuration from CLI arguments
            let config = GameConfig::new(cli.width, cli.height);
            config.validate()?;

            info!("starting snake on a {}x{} grid", cli.width, cli.height);
            let mut snake = SnakeMode::new(config, Scoreboard::load(&cli.scores_file));
            snake.run().await?;
        }
        Game::Guess => {
            info!("starting number guessing");
            run_line_game(|prompt, _| {
                console::guess::run(prompt, &mut rand::thread_rng()).map(|_| ())
            })
            .await?;
        }
        Game::Rps => {
            info!("starting rock paper scissors");
            run_line_game(|prompt, _| {
                console::rps::run(prompt, &mut rand::thread_rng()).map(|_| ())
            })
            .await?;
        }
    }

    Ok(())
}

/// Run a blocking line-based game off the runtime, with Ctrl+C read as end of input
async fn run_line_game<F>(game: F) -> Result<()>
where
    F: FnOnce(&mut Console<InterruptibleInput, Stdout>, InterruptSender) -> Result<()>
        + Send
        + 'static,
{
    let (interrupts, input) = console::input::stdin()?;
    tokio::spawn(console::input::forward_ctrl_c(interrupts.clone()));

    tokio::task::spawn_blocking(move || game(&mut Console::new(input, io::stdout()), interrupts))
        .await
        .context("Console game thread failed")?
}
