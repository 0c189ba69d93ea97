//! Highscore persistence
//!
//! Features:
//! - Versioned JSON envelope
//! - Write to a temp file, then rename over the save
//! - A missing save file loads as an empty board

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::highscores::HighScores;

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("highscore store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("highscore file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported highscore format version {found}")]
    Format { found: u32 },
}

/// Somewhere highscores survive between runs
pub trait HighScoreStore {
    fn load(&mut self) -> Result<HighScores, StoreError>;
    fn save(&mut self, scores: &HighScores) -> Result<(), StoreError>;
}

/// Keeps the board in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: HighScores,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed saves
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> Result<HighScores, StoreError> {
        Ok(self.scores.clone())
    }

    fn save(&mut self, scores: &HighScores) -> Result<(), StoreError> {
        self.scores = scores.clone();
        self.saves += 1;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    scores: HighScores,
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&mut self) -> Result<HighScores, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("no highscores at {}, starting fresh", self.path.display());
                return Ok(HighScores::new());
            }
            Err(err) => return Err(err.into()),
        };
        let envelope: Envelope = serde_json::from_str(&json)?;
        if envelope.version != SAVE_VERSION {
            return Err(StoreError::Format {
                found: envelope.version,
            });
        }
        let mut scores = envelope.scores;
        scores.normalize();
        log::info!("loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    fn save(&mut self, scores: &HighScores) -> Result<(), StoreError> {
        let envelope = Envelope {
            version: SAVE_VERSION,
            scores: scores.clone(),
        };
        let json = serde_json::to_string_pretty(&envelope)?;
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;
        log::info!("high scores saved ({} entries)", scores.entries.len());
        Ok(())
    }
}
