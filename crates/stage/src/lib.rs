//! Stage: the playable scene and its per-frame update.
//!
//! # Invariants
//! - Finished texture loads are applied at the start of a frame, never mid-update.
//! - The character light always matches the current time of day after an update.
//! - The stage is the only writer of its scene graph; renderers read it.

pub mod environment;
pub mod labels;
pub mod stage;

pub use environment::{AxesHelper, CelestialBody, Environment};
pub use labels::{WORLD_LABELS, WorldLabel};
pub use stage::{FrameStats, Stage};
