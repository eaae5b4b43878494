//! Persisted high score
//!
//! A single integer in a plain text file. Read once when a session starts
//! and rewritten only when a round beats it. I/O problems never stop the
//! game: a missing or unreadable file counts as zero and failed writes are
//! logged and dropped.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::HighScoreError;

/// Default file name, relative to the working directory
pub const DEFAULT_HIGH_SCORE_FILE: &str = "highscore.txt";

#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored score. A file that does not exist yet is `Ok(0)`.
    pub fn try_load(&self) -> Result<u32, HighScoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(HighScoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        contents
            .trim()
            .parse::<u32>()
            .map_err(|_| HighScoreError::Parse {
                path: self.path.clone(),
                contents: contents.trim().to_string(),
            })
    }

    /// Read the stored score, falling back to zero on any error
    pub fn load(&self) -> u32 {
        match self.try_load() {
            Ok(score) => {
                info!(score, path = %self.path.display(), "loaded high score");
                score
            }
            Err(err) => {
                warn!(error = %err, "could not read high score, starting from 0");
                0
            }
        }
    }

    /// Overwrite the stored score
    pub fn try_save(&self, score: u32) -> Result<(), HighScoreError> {
        fs::write(&self.path, score.to_string()).map_err(|source| HighScoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrite the stored score, logging and ignoring failures
    pub fn save(&self, score: u32) {
        match self.try_save(score) {
            Ok(()) => info!(score, path = %self.path.display(), "saved high score"),
            Err(err) => warn!(error = %err, "could not save high score"),
        }
    }

    /// Persist `score` if it beats `current`. Returns the new best score.
    pub fn record(&self, current: u32, score: u32) -> u32 {
        if score > current {
            self.save(score);
            score
        } else {
            current
        }
    }
}

impl Default for HighScoreStore {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_SCORE_FILE)
    }
}
