//! Game settings
//!
//! Persisted as JSON next to the leaderboard. Every field has a default, so
//! a partial file only overrides what it names.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Timing;

/// Patrol pace presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Relaxed,
    #[default]
    Normal,
    Frantic,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Relaxed => "Relaxed",
            Difficulty::Normal => "Normal",
            Difficulty::Frantic => "Frantic",
        }
    }

    /// Time between patrol steps for this preset
    pub fn patrol_period_ms(&self) -> u64 {
        match self {
            Difficulty::Relaxed => 600,
            Difficulty::Normal => PATROL_PERIOD_MS,
            Difficulty::Frantic => 250,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Patrol pace preset
    pub difficulty: Difficulty,
    /// Overrides the preset's patrol period when set
    pub patrol_period_ms: Option<u64>,
    pub collision_period_ms: u64,
    pub display_period_ms: u64,

    /// Health at the start of a fresh game (1..=3)
    pub starting_health: u8,

    // === Leaderboard ===
    pub leaderboard_capacity: usize,
    pub leaderboard_path: PathBuf,

    // === Layouts ===
    /// Directory holding `map1.txt`..`map10.txt`; built-in layouts when unset
    pub maps_dir: Option<PathBuf>,
    /// Fixed run seed; wall clock when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            patrol_period_ms: None,
            collision_period_ms: COLLISION_PERIOD_MS,
            display_period_ms: DISPLAY_PERIOD_MS,

            starting_health: STARTING_HEALTH,

            leaderboard_capacity: LEADERBOARD_CAPACITY,
            leaderboard_path: PathBuf::from("highscores.json"),

            maps_dir: None,
            seed: None,
        }
    }
}

impl Settings {
    /// Effective cadence periods (each at least 1 ms)
    pub fn timing(&self) -> Timing {
        Timing {
            patrol_period_ms: self
                .patrol_period_ms
                .unwrap_or_else(|| self.difficulty.patrol_period_ms())
                .max(1),
            collision_period_ms: self.collision_period_ms.max(1),
            display_period_ms: self.display_period_ms.max(1),
        }
    }

    /// Starting health clamped to the playable range
    pub fn effective_starting_health(&self) -> u8 {
        self.starting_health.clamp(1, STARTING_HEALTH)
    }

    pub fn effective_leaderboard_capacity(&self) -> usize {
        self.leaderboard_capacity.max(1)
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_reference_cadences() {
        let timing = Settings::default().timing();
        assert_eq!(timing, Timing::default());
        assert_eq!(timing.patrol_period_ms, 400);
        assert_eq!(timing.collision_period_ms, 10);
    }

    #[test]
    fn test_preset_and_override() {
        let mut settings = Settings {
            difficulty: Difficulty::Frantic,
            ..Settings::default()
        };
        assert_eq!(settings.timing().patrol_period_ms, 250);
        settings.patrol_period_ms = Some(0);
        assert_eq!(settings.timing().patrol_period_ms, 1);
    }

    #[test]
    fn test_difficulty_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "difficulty": "Relaxed" }"#).unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.difficulty, Difficulty::Relaxed);
        assert_eq!(settings.difficulty.as_str(), "Relaxed");
        assert_eq!(settings.timing().patrol_period_ms, 600);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "starting_health": 9, "seed": 7 }"#).unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.effective_starting_health(), 3);
        assert_eq!(settings.leaderboard_capacity, 10);
    }

    #[test]
    fn test_bad_or_missing_file_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(Settings::load(&path), Settings::default());

        fs::write(&path, "[1, 2").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_written_settings_load_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            difficulty: Difficulty::Frantic,
            maps_dir: Some(PathBuf::from("maps")),
            ..Settings::default()
        };
        fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();
        assert_eq!(Settings::load(&path), settings);
    }
}
