//! Best scores per (difficulty, mode), persisted as a flat JSON object
//!
//! The file maps `"<Difficulty>_<Mode>"` to the best score, for example
//! `{"Normal_Classic": 150}`. Persistence is best effort: a missing or
//! malformed file loads as empty and a failed write is only logged.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::game::{Difficulty, Mode};

pub const DEFAULT_SCORES_FILE: &str = "high_scores.json";

#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    /// Backing file; `None` keeps everything in memory
    path: Option<PathBuf>,
    scores: HashMap<String, u32>,
}

impl Scoreboard {
    /// Load the scoreboard stored at `path`, starting empty on any failure
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let scores = match read_scores(&path) {
            Ok(scores) => {
                debug!("loaded {} best scores from {:?}", scores.len(), path);
                scores
            }
            Err(e) => {
                warn!("starting with empty scoreboard: {:#}", e);
                HashMap::new()
            }
        };

        Self {
            path: Some(path),
            scores,
        }
    }

    /// Scoreboard that is never written anywhere
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn key(difficulty: Difficulty, mode: Mode) -> String {
        format!("{}_{}", difficulty.name(), mode.name())
    }

    pub fn get_best(&self, difficulty: Difficulty, mode: Mode) -> u32 {
        self.scores
            .get(&Self::key(difficulty, mode))
            .copied()
            .unwrap_or(0)
    }

    /// Record a finished session's score.
    ///
    /// Returns true when `score` beats the stored best. Only then is the
    /// mapping updated and the whole file rewritten.
    pub fn record_score(&mut self, difficulty: Difficulty, mode: Mode, score: u32) -> bool {
        if score <= self.get_best(difficulty, mode) {
            return false;
        }

        let key = Self::key(difficulty, mode);
        info!("new best for {}: {}", key, score);
        self.scores.insert(key, score);

        if let Err(e) = self.save() {
            warn!("could not save scoreboard: {:#}", e);
        }
        true
    }

    pub fn scores(&self) -> &HashMap<String, u32> {
        &self.scores
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json =
            serde_json::to_string_pretty(&self.scores).context("Failed to serialize scores")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write scores to {:?}", path))?;
        Ok(())
    }
}

/// Read the scores file, keeping every entry that holds a whole,
/// non-negative score. Older files store scores as floats such as `45.0`.
fn read_scores(path: &Path) -> Result<HashMap<String, u32>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scores from {:?}", path))?;
    let entries: serde_json::Map<String, Value> =
        serde_json::from_str(&json).with_context(|| format!("Malformed scores file {:?}", path))?;

    let mut scores = HashMap::with_capacity(entries.len());
    for (key, value) in entries {
        match score_from_json(&value) {
            Some(score) => {
                scores.insert(key, score);
            }
            None => warn!("skipping scoreboard entry {}: {} is not a valid score", key, value),
        }
    }
    Ok(scores)
}

fn score_from_json(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    let f = value.as_f64()?;
    if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) {
        Some(f as u32)
    } else {
        None
    }
}
