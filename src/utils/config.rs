//! Game configuration, read from TOML with defaults for every field.
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::utils::constants::game_constants::{
    FEEDBACK_CLEAR_MS, ROUND_ADVANCE_MS, ROUND_TIME, TICK_INTERVAL_MS, WRONG_CLICK_PENALTY,
};
use crate::utils::constants::storage_constants::HIGH_SCORE_KEY;
use crate::utils::errors::{BoneGameError, BoneGameResult};

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub game: GameOptions,
    pub storage: StorageConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    pub tick_interval_ms: u64,
    pub round_time: u32,
    pub wrong_click_penalty: u32,
    pub feedback_clear_ms: u64,
    pub round_advance_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            round_time: ROUND_TIME,
            wrong_click_penalty: WRONG_CLICK_PENALTY,
            feedback_clear_ms: FEEDBACK_CLEAR_MS,
            round_advance_ms: ROUND_ADVANCE_MS,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GameOptions {
    // Fixed seed for a reproducible draw order. Random when absent.
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub high_score_key: String,
    pub path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            high_score_key: HIGH_SCORE_KEY.to_string(),
            path: None,
        }
    }
}

/// Timing and scoring rules the controller runs with.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSettings {
    pub tick_interval: Duration,
    pub round_time: u32,
    pub wrong_click_penalty: u32,
    pub feedback_clear_delay: Duration,
    pub round_advance_delay: Duration,
    pub seed: Option<u64>,
    pub high_score_key: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameConfig::default().settings()
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> BoneGameResult<Self> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> BoneGameResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Loads the config for this platform, falling back to defaults on any failure.
    pub fn load_or_default() -> Self {
        match Self::locate() {
            Some(path) => match Self::from_file(&path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Using default config, {} is unusable: {e}", path.display());
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn locate() -> Option<PathBuf> {
        use crate::utils::constants::storage_constants::{CONFIG_ENV_VAR, CONFIG_FILE_NAME};

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        let local = PathBuf::from(CONFIG_FILE_NAME);
        local.exists().then_some(local)
    }

    #[cfg(target_arch = "wasm32")]
    fn locate() -> Option<PathBuf> {
        None
    }

    pub fn validate(&self) -> BoneGameResult<()> {
        let timing = &self.timing;
        if timing.tick_interval_ms == 0 {
            return Err(BoneGameError::InvalidConfig("tick_interval_ms must be positive".into()));
        }
        if timing.round_time == 0 {
            return Err(BoneGameError::InvalidConfig("round_time must be positive".into()));
        }
        if timing.wrong_click_penalty > timing.round_time {
            return Err(BoneGameError::InvalidConfig(
                "wrong_click_penalty cannot exceed round_time".into(),
            ));
        }
        if self.storage.high_score_key.trim().is_empty() {
            return Err(BoneGameError::InvalidConfig("high_score_key is empty".into()));
        }
        Ok(())
    }

    pub fn settings(&self) -> GameSettings {
        GameSettings {
            tick_interval: Duration::from_millis(self.timing.tick_interval_ms),
            round_time: self.timing.round_time,
            wrong_click_penalty: self.timing.wrong_click_penalty,
            feedback_clear_delay: Duration::from_millis(self.timing.feedback_clear_ms),
            round_advance_delay: Duration::from_millis(self.timing.round_advance_ms),
            seed: self.game.seed,
            high_score_key: self.storage.high_score_key.clone(),
        }
    }
}
