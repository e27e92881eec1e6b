use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

const FILE_NAME: &str = "starstrike.toml";

/// User settings. Every field is optional in the file.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub tick_rate_ms: u64,
    /// Fixed RNG seed for reproducible runs, random when absent.
    pub seed: Option<u64>,
    pub starting_lives: u32,
    pub collision_samples: usize,
    pub alpha_threshold: u8,
    pub powerup_drop_chance: f32,
    pub pause_blur_radius: usize,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16,
            seed: None,
            starting_lives: 3,
            collision_samples: 10,
            alpha_threshold: 128,
            powerup_drop_chance: 0.12,
            pause_blur_radius: 2,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Stored next to the executable, like the score file.
    pub fn default_path() -> PathBuf {
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return dir.join(FILE_NAME);
            }
        }
        PathBuf::from(FILE_NAME)
    }

    /// A missing file is not an error and yields the defaults.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Config::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config: Config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.tick_rate_ms = self.tick_rate_ms.clamp(5, 200);
        self.starting_lives = self.starting_lives.clamp(1, 9);
        self.collision_samples = self.collision_samples.clamp(1, 256);
        if !self.powerup_drop_chance.is_finite() {
            self.powerup_drop_chance = Config::default().powerup_drop_chance;
        }
        self.powerup_drop_chance = self.powerup_drop_chance.clamp(0.0, 1.0);
        self.pause_blur_radius = self.pause_blur_radius.min(8);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, "seed = 42\nstarting_lives = 5\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.starting_lives, 5);
        assert_eq!(config.tick_rate_ms, 16);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(
            &path,
            "tick_rate_ms = 1\nstarting_lives = 0\ncollision_samples = 0\npowerup_drop_chance = 3.5\n",
        )
        .unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.tick_rate_ms, 5);
        assert_eq!(config.starting_lives, 1);
        assert_eq!(config.collision_samples, 1);
        assert_eq!(config.powerup_drop_chance, 1.0);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, "starting_lives = \"lots\"").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
