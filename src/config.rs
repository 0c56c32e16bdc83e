//! Game settings.
//!
//! Every field has a default, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! width = 1024.0
//! height = 768.0
//! seed = 7
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Playfield width in pixels.
    pub width: f32,
    /// Playfield height in pixels.
    pub height: f32,
    /// Target duration of one tick in milliseconds (≈ one display refresh).
    pub frame_ms: u64,
    /// Decorative stars in the background.
    pub star_count: usize,
    pub starting_lives: u32,
    /// Per-tick probability of spawning an enemy at level 1.
    pub base_spawn_rate: f32,
    /// Spawn probability added per level gained.
    pub spawn_rate_step: f32,
    /// Score needed for each level.
    pub level_score_step: u32,
    /// Fixed RNG seed for reproducible sessions.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            frame_ms: 16,
            star_count: 100,
            starting_lives: 5,
            base_spawn_rate: 0.005,
            spawn_rate_step: 0.003,
            level_score_step: 2000,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse settings from TOML text and validate them.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // The player (40×30) must fit inside the playfield.
        if !(self.width.is_finite() && self.width >= 40.0) {
            return Err(ConfigError::Invalid(format!(
                "width must be at least 40, got {}",
                self.width
            )));
        }
        if !(self.height.is_finite() && self.height >= 50.0) {
            return Err(ConfigError::Invalid(format!(
                "height must be at least 50, got {}",
                self.height
            )));
        }
        if self.frame_ms == 0 {
            return Err(ConfigError::Invalid("frame_ms must be positive".into()));
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::Invalid("starting_lives must be positive".into()));
        }
        for (name, rate) in [
            ("base_spawn_rate", self.base_spawn_rate),
            ("spawn_rate_step", self.spawn_rate_step),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within [0, 1], got {rate}"
                )));
            }
        }
        if self.level_score_step == 0 {
            return Err(ConfigError::Invalid("level_score_step must be positive".into()));
        }
        Ok(())
    }
}
