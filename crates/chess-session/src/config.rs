//! Session configuration loaded from `session.toml`.
//!
//! Every field has a default, so a missing file or a partial file both work.

use chess_core::Piece;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A value parsed but makes no sense.
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Piece a human pawn promotes to when a two-click move reaches the last row.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PromotionChoice {
    #[default]
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl PromotionChoice {
    pub fn piece(self) -> Piece {
        match self {
            PromotionChoice::Queen => Piece::Queen,
            PromotionChoice::Rook => Piece::Rook,
            PromotionChoice::Bishop => Piece::Bishop,
            PromotionChoice::Knight => Piece::Knight,
        }
    }
}

/// AI settings, the `[ai]` table.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct AiConfig {
    /// Search depth in plies. Defaults to 2.
    #[serde(default = "default_depth")]
    pub depth: u8,
    /// Run the search on a worker thread instead of inside the tick.
    #[serde(default = "default_true")]
    pub background: bool,
    /// Play a random legal move when the search returns nothing.
    #[serde(default = "default_true")]
    pub random_fallback: bool,
    /// Seed for the fallback RNG. Random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_depth() -> u8 {
    2
}

fn default_true() -> bool {
    true
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig {
            depth: default_depth(),
            background: true,
            random_fallback: true,
            seed: None,
        }
    }
}

/// Top-level session configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Animation frames per square travelled. Defaults to 10.
    #[serde(default = "default_frames_per_square")]
    pub frames_per_square: u32,
    /// Ticks per second outside animations. Defaults to 15.
    #[serde(default = "default_logic_fps")]
    pub logic_fps: u32,
    /// Ticks per second while a move is animating. Defaults to 60.
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// The single save slot. Defaults to `saves/session.json`.
    #[serde(default = "default_save_path")]
    pub save_path: PathBuf,
    #[serde(default)]
    pub promotion: PromotionChoice,
    #[serde(default)]
    pub ai: AiConfig,
}

fn default_frames_per_square() -> u32 {
    10
}

fn default_logic_fps() -> u32 {
    15
}

fn default_animation_fps() -> u32 {
    60
}

fn default_save_path() -> PathBuf {
    PathBuf::from("saves/session.json")
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            frames_per_square: default_frames_per_square(),
            logic_fps: default_logic_fps(),
            animation_fps: default_animation_fps(),
            save_path: default_save_path(),
            promotion: PromotionChoice::default(),
            ai: AiConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Loads the configuration at `path`, or defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// [`ConfigError::ParseError`] if it is not valid TOML and
    /// [`ConfigError::Invalid`] for zero frame rates.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parses and validates a configuration document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the default configuration file path.
    pub fn config_path() -> PathBuf {
        PathBuf::from("session.toml")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("logic_fps", self.logic_fps),
            ("animation_fps", self.animation_fps),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}
