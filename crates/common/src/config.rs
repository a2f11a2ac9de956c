//! Game configuration.
//!
//! Every section falls back to its defaults, so an empty YAML document is a
//! valid configuration.

use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_4;
use std::path::{Path, PathBuf};

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Ground-plane physics constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Vertical acceleration in m/s².
    pub gravity: f32,
    /// Y of the ground plane.
    pub ground_level: f32,
    /// Height from wheel bottom to the top of the deck.
    pub skateboard_height: f32,
    /// Extra clearance below the rig origin for the wheels.
    pub wheel_offset: f32,
    /// Upward velocity set by a jump.
    pub jump_velocity: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -9.81,
            ground_level: 0.0,
            skateboard_height: 0.15,
            wheel_offset: 0.2,
            jump_velocity: 5.0,
        }
    }
}

/// Player control tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Scale applied to movement displacements (units per second of input).
    pub move_force: f32,
    /// Truck turn rate in radians per second.
    pub turn_speed: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            move_force: 10.0,
            turn_speed: FRAC_PI_4,
        }
    }
}

/// Day/night cycle timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayNightConfig {
    /// Real seconds for one full cycle.
    pub cycle_seconds: f32,
    /// Initial time of day in [0, 1).
    pub start_time: f32,
}

impl Default for DayNightConfig {
    fn default() -> Self {
        Self {
            cycle_seconds: 60.0,
            start_time: 0.0,
        }
    }
}

/// Star field generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    pub count: usize,
    pub radius: f32,
    pub seed: u64,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            count: 2000,
            radius: 450.0,
            seed: 0x5eed,
        }
    }
}

/// Texture asset location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub texture_dir: PathBuf,
    /// Skip texture loading entirely (headless runs).
    pub load_textures: bool,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            texture_dir: PathBuf::from("assets/textures"),
            load_textures: true,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub controls: ControlConfig,
    pub day_night: DayNightConfig,
    pub stars: StarConfig,
    pub assets: AssetConfig,
}

impl GameConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&data)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cycle = self.day_night.cycle_seconds;
        if cycle.is_nan() || cycle <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "day_night.cycle_seconds must be positive, got {}",
                self.day_night.cycle_seconds
            )));
        }
        if !(0.0..1.0).contains(&self.day_night.start_time) {
            return Err(ConfigError::Invalid(format!(
                "day_night.start_time must be in [0, 1), got {}",
                self.day_night.start_time
            )));
        }
        if self.physics.gravity >= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "physics.gravity must be negative, got {}",
                self.physics.gravity
            )));
        }
        if self.stars.radius <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "stars.radius must be positive, got {}",
                self.stars.radius
            )));
        }
        Ok(())
    }
}
