//! Text menu that runs each game as its own child process
//!
//! Children are the current executable re-invoked with `--game <name>`, so
//! a crashing or failing game never takes the menu down with it.

use anyhow::{bail, Context, Result};
use log::{info, warn};
use std::ffi::OsString;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::Command;

use crate::console::{Console, InterruptSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameChoice {
    Snake,
    Guess,
    RockPaperScissors,
}

impl GameChoice {
    /// Value passed to `--game` when spawning the child
    pub fn cli_name(&self) -> &'static str {
        match self {
            GameChoice::Snake => "snake",
            GameChoice::Guess => "guess",
            GameChoice::RockPaperScissors => "rps",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameChoice::Snake => "Snake Game",
            GameChoice::Guess => "Guess the Number",
            GameChoice::RockPaperScissors => "Rock Paper Scissors",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Play(GameChoice),
    Exit,
}

pub fn parse_menu_choice(input: &str) -> Option<MenuChoice> {
    match input.trim() {
        "1" => Some(MenuChoice::Play(GameChoice::Snake)),
        "2" => Some(MenuChoice::Play(GameChoice::Guess)),
        "3" => Some(MenuChoice::Play(GameChoice::RockPaperScissors)),
        "4" => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// Runs one game to completion
pub trait GameRunner {
    fn run(&mut self, game: GameChoice) -> Result<()>;
}

/// Spawns the game as a child process and waits for it
pub struct ProcessRunner {
    exe: PathBuf,
    /// Arguments forwarded to every child, e.g. grid size and log file
    forward_args: Vec<OsString>,
    /// Console interrupts, held back while a child runs
    interrupts: Option<InterruptSender>,
}

impl ProcessRunner {
    pub fn new(exe: PathBuf, forward_args: Vec<OsString>) -> Self {
        Self {
            exe,
            forward_args,
            interrupts: None,
        }
    }

    /// Leave Ctrl+C to the child while it runs, so the menu survives it
    pub fn with_interrupts(mut self, interrupts: InterruptSender) -> Self {
        self.interrupts = Some(interrupts);
        self
    }

    /// Runner that re-invokes the running binary
    pub fn current(forward_args: Vec<OsString>) -> Result<Self> {
        let exe = std::env::current_exe().context("Failed to locate current executable")?;
        Ok(Self::new(exe, forward_args))
    }
}

impl GameRunner for ProcessRunner {
    fn run(&mut self, game: GameChoice) -> Result<()> {
        info!("spawning {:?} --game {}", self.exe, game.cli_name());
        let _held = self.interrupts.as_ref().map(InterruptSender::suspend);
        let status = match Command::new(&self.exe)
            .args(&self.forward_args)
            .arg("--game")
            .arg(game.cli_name())
            .status()
        {
            Ok(status) => status,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                bail!("game executable not found: {}", self.exe.display())
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to start {}", game.title()))
            }
        };

        if !status.success() {
            bail!("{} exited with {}", game.title(), status);
        }
        Ok(())
    }
}

const BANNER: &[&str] = &[
    "Welcome to the Terminal Game Collection!",
    "==================================================",
    "",
    "Available Games:",
    "1. Snake Game (Advanced Edition)",
    "   - Multiple difficulty levels (Easy, Normal, Hard)",
    "   - 4 Game modes (Classic, Walls, Obstacles, Extreme)",
    "   - Level progression system",
    "   - High score tracking",
    "   - Pause/Resume functionality",
    "",
    "2. Guess the Number",
    "   - Classic number guessing game",
    "   - Statistics tracking",
    "   - Multiple rounds",
    "",
    "3. Rock Paper Scissors",
    "   - Play against computer",
    "   - Score tracking",
    "   - Multiple rounds",
    "",
    "4. Exit",
    "",
];

const SNAKE_CONTROLS: &[&str] = &[
    "Controls:",
    "- Arrow keys or WASD to move",
    "- SPACE to pause",
    "- R to restart",
    "- ESC to return to menu",
];

/// Menu loop. Returns after the player exits or input ends.
pub fn run_launcher<R: BufRead, W: Write, G: GameRunner>(
    console: &mut Console<R, W>,
    runner: &mut G,
) -> Result<()> {
    for line in BANNER {
        console.say(line)?;
    }

    loop {
        let Some(line) = console.read_line("Select a game (1-4): ")? else {
            console.say("")?;
            break;
        };

        match parse_menu_choice(&line) {
            Some(MenuChoice::Play(game)) => {
                console.say("")?;
                console.say(format!("Starting {}...", game.title()))?;
                if game == GameChoice::Snake {
                    for line in SNAKE_CONTROLS {
                        console.say(line)?;
                    }
                }
                if let Err(e) = runner.run(game) {
                    warn!("{:#}", e);
                    console.say(format!("Error running game: {:#}", e))?;
                }
            }
            Some(MenuChoice::Exit) => break,
            None => console.say("Invalid choice! Please enter 1, 2, 3, or 4.")?,
        }
    }

    console.say("Thanks for playing!")?;
    Ok(())
}
