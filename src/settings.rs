//! Game settings and rule tuning
//!
//! Loaded from a JSON file for headless runs; every field has a default so a
//! partial file only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Gameplay rules shared by every level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Detection radius against an unstealthed player
    pub normal_radius: f32,
    /// Detection radius against a moving, stealthed player (must be smaller)
    pub stealth_radius: f32,
    /// Radius within which a facing prey witnesses a capture
    pub witness_radius: f32,
    /// Panic timer length in seconds
    pub alarm_duration_secs: f32,

    pub player_move_speed: f32,
    pub player_sneak_speed: f32,
    pub player_jump_speed: f32,

    /// Last level tier; winning it completes the game
    pub max_level: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            normal_radius: NORMAL_RADIUS,
            stealth_radius: STEALTH_RADIUS,
            witness_radius: WITNESS_RADIUS,
            alarm_duration_secs: ALARM_DURATION_SECS,

            player_move_speed: PLAYER_MOVE_SPEED,
            player_sneak_speed: PLAYER_SNEAK_SPEED,
            player_jump_speed: PLAYER_JUMP_SPEED,

            max_level: MAX_LEVEL,
        }
    }
}

impl Rules {
    /// Panic timer length in whole simulation ticks (at least one)
    pub fn alarm_duration_ticks(&self) -> u32 {
        ((self.alarm_duration_secs * TICKS_PER_SEC as f32).round() as u32).max(1)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.stealth_radius >= 0.0 && self.stealth_radius < self.normal_radius) {
            return Err(SettingsError::Invalid(format!(
                "stealth_radius ({}) must be in [0, normal_radius ({}))",
                self.stealth_radius, self.normal_radius
            )));
        }
        if !(self.witness_radius >= 0.0) {
            return Err(SettingsError::Invalid(format!(
                "witness_radius ({}) must not be negative",
                self.witness_radius
            )));
        }
        if !(self.alarm_duration_secs > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "alarm_duration_secs ({}) must be positive",
                self.alarm_duration_secs
            )));
        }
        if self.max_level == 0 {
            return Err(SettingsError::Invalid("max_level must be at least 1".into()));
        }
        Ok(())
    }
}

/// Top-level session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed for prey behavior
    pub seed: u64,
    /// Level a fresh session starts on (1-based)
    pub start_level: u32,
    pub rules: Rules,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            start_level: 1,
            rules: Rules::default(),
        }
    }
}

impl Settings {
    /// Create settings with a specific seed and default rules
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.rules.validate()?;
        if self.start_level == 0 || self.start_level > self.rules.max_level {
            return Err(SettingsError::Invalid(format!(
                "start_level ({}) must be in 1..={}",
                self.start_level, self.rules.max_level
            )));
        }
        Ok(())
    }
}
