//! Rock Paper Scissors against a uniformly random opponent

use anyhow::{anyhow, Result};
use log::info;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use super::prompt::Console;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&Choice::Rock)
    }

    /// The choice this one defeats
    pub fn beats(&self) -> Choice {
        match self {
            Choice::Rock => Choice::Scissors,
            Choice::Paper => Choice::Rock,
            Choice::Scissors => Choice::Paper,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Choice::Rock => "Rock",
            Choice::Paper => "Paper",
            Choice::Scissors => "Scissors",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Choice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "rock" | "r" => Ok(Choice::Rock),
            "paper" | "p" => Ok(Choice::Paper),
            "scissors" | "s" => Ok(Choice::Scissors),
            other => Err(anyhow!("unrecognized choice {:?}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundResult {
    Player,
    Computer,
    Tie,
}

pub fn determine_winner(player: Choice, computer: Choice) -> RoundResult {
    if player == computer {
        RoundResult::Tie
    } else if player.beats() == computer {
        RoundResult::Player
    } else {
        RoundResult::Computer
    }
}

/// Running score across rounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub player: u32,
    pub computer: u32,
    pub ties: u32,
}

impl Tally {
    pub fn record(&mut self, result: RoundResult) {
        match result {
            RoundResult::Player => self.player += 1,
            RoundResult::Computer => self.computer += 1,
            RoundResult::Tie => self.ties += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.player + self.computer + self.ties
    }

    /// Who won more rounds overall
    pub fn overall(&self) -> RoundResult {
        match self.player.cmp(&self.computer) {
            std::cmp::Ordering::Greater => RoundResult::Player,
            std::cmp::Ordering::Less => RoundResult::Computer,
            std::cmp::Ordering::Equal => RoundResult::Tie,
        }
    }
}

fn read_choice<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<Option<Choice>> {
    loop {
        let Some(line) = console.read_line("Choose rock, paper, or scissors (or r/p/s): ")? else {
            return Ok(None);
        };
        match line.parse() {
            Ok(choice) => return Ok(Some(choice)),
            Err(_) => console.say("Invalid choice! Please enter rock, paper, scissors, or r/p/s")?,
        }
    }
}

/// Play one round; `None` means input ended before a choice was made
pub fn play_round<R: BufRead, W: Write, G: Rng + ?Sized>(
    console: &mut Console<R, W>,
    rng: &mut G,
) -> Result<Option<RoundResult>> {
    let Some(player) = read_choice(console)? else {
        return Ok(None);
    };
    let computer = Choice::random(rng);

    console.say("")?;
    console.say(format!("You chose: {}", player))?;
    console.say(format!("Computer chose: {}", computer))?;

    let result = determine_winner(player, computer);
    match result {
        RoundResult::Tie => console.say("It's a tie!")?,
        RoundResult::Player => console.say("You win this round!")?,
        RoundResult::Computer => console.say("Computer wins this round!")?,
    }
    Ok(Some(result))
}

/// Rounds until the player stops, then the final results
pub fn run<R: BufRead, W: Write, G: Rng + ?Sized>(
    console: &mut Console<R, W>,
    rng: &mut G,
) -> Result<Tally> {
    console.say("Welcome to Rock, Paper, Scissors!")?;
    console.say("=".repeat(40))?;
    console.say("Rules:")?;
    console.say("Rock crushes Scissors")?;
    console.say("Paper covers Rock")?;
    console.say("Scissors cut Paper")?;
    console.say("=".repeat(40))?;

    let mut tally = Tally::default();
    loop {
        console.say("")?;
        console.say(format!(
            "Score - You: {} | Computer: {} | Ties: {}",
            tally.player, tally.computer, tally.ties
        ))?;
        console.say("-".repeat(40))?;

        let Some(result) = play_round(console, rng)? else {
            break;
        };
        tally.record(result);

        if console.ask_yes_no("\nPlay another round? (y/n): ")? != Some(true) {
            break;
        }
    }

    info!(
        "rps finished: player={} computer={} ties={}",
        tally.player, tally.computer, tally.ties
    );

    console.say("")?;
    console.say("=".repeat(40))?;
    console.say("FINAL RESULTS")?;
    console.say(format!("Your wins: {}", tally.player))?;
    console.say(format!("Computer wins: {}", tally.computer))?;
    console.say(format!("Ties: {}", tally.ties))?;
    if tally.total() > 0 {
        match tally.overall() {
            RoundResult::Player => console.say("You are the overall winner!")?,
            RoundResult::Computer => console.say("Computer is the overall winner!")?,
            RoundResult::Tie => console.say("It's an overall tie!")?,
        }
    }
    console.say("Thanks for playing!")?;
    Ok(tally)
}
