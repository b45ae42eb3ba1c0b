//! Guess the Number: find a secret in 1..=100 within seven attempts

use anyhow::Result;
use log::info;
use rand::Rng;
use std::io::{BufRead, Write};

use super::prompt::Console;

pub const SECRET_RANGE: std::ops::RangeInclusive<i64> = 1..=100;
pub const MAX_ATTEMPTS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    TooLow,
    TooHigh,
    Correct { attempts: u32 },
}

/// One round against a fixed secret
#[derive(Debug, Clone)]
pub struct GuessGame {
    secret: i64,
    attempts: u32,
    max_attempts: u32,
}

impl GuessGame {
    pub fn new(secret: i64, max_attempts: u32) -> Self {
        Self {
            secret,
            attempts: 0,
            max_attempts,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.gen_range(SECRET_RANGE), MAX_ATTEMPTS)
    }

    /// Score one guess. Every guess counts as an attempt.
    pub fn guess(&mut self, value: i64) -> GuessOutcome {
        self.attempts += 1;
        match value.cmp(&self.secret) {
            std::cmp::Ordering::Less => GuessOutcome::TooLow,
            std::cmp::Ordering::Greater => GuessOutcome::TooHigh,
            std::cmp::Ordering::Equal => GuessOutcome::Correct {
                attempts: self.attempts,
            },
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn attempts_left(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts)
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts_left() == 0
    }

    pub fn secret(&self) -> i64 {
        self.secret
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GuessStats {
    pub played: u32,
    pub won: u32,
}

impl GuessStats {
    pub fn record(&mut self, won: bool) {
        self.played += 1;
        if won {
            self.won += 1;
        }
    }

    /// Percentage of rounds won
    pub fn win_rate(&self) -> f64 {
        if self.played == 0 {
            return 0.0;
        }
        f64::from(self.won) / f64::from(self.played) * 100.0
    }
}

/// Play one round; `None` means input ended mid-round
pub fn play_round<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    game: &mut GuessGame,
) -> Result<Option<bool>> {
    console.say("I'm thinking of a number between 1 and 100.")?;
    console.say("Can you guess what it is?")?;
    console.say("")?;

    while !game.is_exhausted() {
        let prompt = format!(
            "Attempt {}/{} - Enter your guess: ",
            game.attempts() + 1,
            game.max_attempts()
        );
        let Some(line) = console.read_line(&prompt)? else {
            return Ok(None);
        };
        let Ok(value) = line.parse::<i64>() else {
            console.say("Please enter a valid number!")?;
            console.say("")?;
            continue;
        };

        match game.guess(value) {
            GuessOutcome::Correct { attempts } => {
                console.say(format!("Congratulations! You guessed it in {} attempts!", attempts))?;
                console.say(format!("The number was {}", game.secret()))?;
                return Ok(Some(true));
            }
            GuessOutcome::TooLow => console.say("Too low! Try a higher number.")?,
            GuessOutcome::TooHigh => console.say("Too high! Try a lower number.")?,
        }

        if !game.is_exhausted() {
            console.say(format!("You have {} attempts left.", game.attempts_left()))?;
        }
        console.say("")?;
    }

    console.say(format!(
        "Game Over! You've used all {} attempts.",
        game.attempts()
    ))?;
    console.say(format!("The number was {}", game.secret()))?;
    Ok(Some(false))
}

/// Rounds until the player declines another one
pub fn run<R: BufRead, W: Write, G: Rng + ?Sized>(
    console: &mut Console<R, W>,
    rng: &mut G,
) -> Result<GuessStats> {
    let mut stats = GuessStats::default();
    console.say("Welcome to the Number Guessing Game!")?;
    console.say("=".repeat(40))?;

    loop {
        let mut game = GuessGame::random(rng);
        let Some(won) = play_round(console, &mut game)? else {
            break;
        };
        stats.record(won);
        info!("guess round finished: won={} attempts={}", won, game.attempts());

        console.say("")?;
        console.say("=".repeat(40))?;
        console.say("GAME STATISTICS")?;
        console.say(format!("Games played: {}", stats.played))?;
        console.say(format!("Games won: {}", stats.won))?;
        console.say(format!("Win rate: {:.1}%", stats.win_rate()))?;
        console.say("=".repeat(40))?;

        if console.ask_yes_no("Would you like to play again? (y/n): ")? != Some(true) {
            break;
        }
    }

    console.say("")?;
    console.say("Thanks for playing!")?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::prompt::tests::{scripted, transcript};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_guess_outcomes() {
        let mut game = GuessGame::new(50, MAX_ATTEMPTS);
        assert_eq!(game.guess(25), GuessOutcome::TooLow);
        assert_eq!(game.guess(75), GuessOutcome::TooHigh);
        assert_eq!(game.guess(50), GuessOutcome::Correct { attempts: 3 });
    }

    #[test]
    fn test_attempts_run_out() {
        let mut game = GuessGame::new(50, 2);
        game.guess(1);
        assert!(!game.is_exhausted());
        game.guess(2);
        assert!(game.is_exhausted());
        assert_eq!(game.attempts_left(), 0);
    }

    #[test]
    fn test_random_secret_in_range() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let game = GuessGame::random(&mut rng);
            assert!(SECRET_RANGE.contains(&game.secret()));
        }
    }

    #[test]
    fn test_round_transcript() {
        let mut console = scripted("25\n75\n50\n");
        let mut game = GuessGame::new(50, MAX_ATTEMPTS);

        let won = play_round(&mut console, &mut game).unwrap();

        assert_eq!(won, Some(true));
        let out = transcript(console);
        let low = out.find("Too low").unwrap();
        let high = out.find("Too high").unwrap();
        let win = out.find("You guessed it in 3 attempts").unwrap();
        assert!(low < high && high < win);
    }

    #[test]
    fn test_invalid_input_costs_nothing() {
        let mut console = scripted("fifty\n50\n");
        let mut game = GuessGame::new(50, MAX_ATTEMPTS);

        assert_eq!(play_round(&mut console, &mut game).unwrap(), Some(true));
        assert_eq!(game.attempts(), 1);
        assert!(transcript(console).contains("Please enter a valid number!"));
    }

    #[test]
    fn test_losing_round() {
        let mut console = scripted("1\n2\n3\n4\n5\n6\n7\n");
        let mut game = GuessGame::new(99, MAX_ATTEMPTS);

        assert_eq!(play_round(&mut console, &mut game).unwrap(), Some(false));
        let out = transcript(console);
        assert!(out.contains("You've used all 7 attempts"));
        assert!(out.contains("The number was 99"));
    }

    #[test]
    fn test_run_tracks_stats() {
        let secret = GuessGame::random(&mut StdRng::seed_from_u64(3)).secret();
        let input = format!("{}\nn\n", secret);
        let mut console = scripted(&input);

        let stats = run(&mut console, &mut StdRng::seed_from_u64(3)).unwrap();

        assert_eq!(stats, GuessStats { played: 1, won: 1 });
        let out = transcript(console);
        assert!(out.contains("Win rate: 100.0%"));
        assert!(out.contains("Thanks for playing!"));
    }

    #[test]
    fn test_run_eof_says_goodbye() {
        let mut console = scripted("");
        let stats = run(&mut console, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(stats.played, 0);
        assert!(transcript(console).contains("Thanks for playing!"));
    }

    #[test]
    fn test_win_rate() {
        let mut stats = GuessStats::default();
        assert_eq!(stats.win_rate(), 0.0);
        stats.record(true);
        stats.record(false);
        stats.record(false);
        stats.record(true);
        assert_eq!(stats.win_rate(), 50.0);
    }
}
