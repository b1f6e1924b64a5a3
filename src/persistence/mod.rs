//! Leaderboard persistence
//!
//! Features:
//! - Pretty JSON file holding the `HighScores` board
//! - Atomic replace (write tmp, then rename over the old file)
//! - Missing file reads as an empty board
//!
//! Failures are reported as `PersistenceError` and never reach the
//! simulation; the caller logs them and carries on.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::highscores::{HighScoreEntry, HighScores, LeaderboardStore, SubmitOutcome};

/// Leaderboard read/write failures
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("player name must not be empty")]
    EmptyName,
    #[error("leaderboard I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("leaderboard file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Leaderboard stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    capacity: usize,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity: capacity.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Current board; a missing file is an empty board
    pub fn read(&self) -> Result<HighScores, PersistenceError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(HighScores::new(self.capacity));
            }
            Err(e) => return Err(self.io_error(e)),
        };
        let mut scores: HighScores =
            serde_json::from_str(&json).map_err(|source| PersistenceError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        scores.normalize(self.capacity);
        Ok(scores)
    }

    /// Replace the file contents with `scores`
    pub fn write_atomic(&self, scores: &HighScores) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(scores)
            .map_err(|e| self.io_error(io::Error::other(e)))?;

        fs::write(&tmp_path, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }
}

impl LeaderboardStore for JsonFileStore {
    fn list(&self) -> Result<Vec<HighScoreEntry>, PersistenceError> {
        Ok(self.read()?.entries)
    }

    fn submit(&mut self, name: &str, score: u32) -> Result<SubmitOutcome, PersistenceError> {
        let mut scores = self.read()?;
        let outcome = scores.submit(name, score)?;
        if outcome != SubmitOutcome::Rejected {
            self.write_atomic(&scores)?;
            log::info!(
                "High scores saved ({} entries) to {}",
                scores.len(),
                self.path.display()
            );
        }
        Ok(outcome)
    }
}
