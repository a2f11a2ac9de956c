//! Shared types and utilities for the skatepark crates.
//!
//! # Invariants
//! - Rotations stored on a [`Transform`] are unit quaternions.
//! - Configuration defaults reproduce the demo's built-in constants.

pub mod config;
pub mod math;
pub mod types;

pub use config::{
    AssetConfig, ConfigError, ControlConfig, DayNightConfig, GameConfig, PhysicsConfig, StarConfig,
};
pub use types::{MaterialSlot, Transform};
