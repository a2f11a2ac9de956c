//! Day/night cycle and sky content.
//!
//! # Invariants
//! - Time of day is always in [0, 1) and advances monotonically, wrapping.
//! - Every derived intensity is a pure function of the time of day.
//! - Star placement is a pure function of [`StarConfig`](skatepark_common::StarConfig).

pub mod color;
pub mod cycle;
pub mod phase;
pub mod stars;

pub use color::{horizon_color, sky_color};
pub use cycle::{sun_position, DayNightCycle, Lighting, CELESTIAL_RADIUS, STAR_ROTATION_SPEED};
pub use phase::{Phase, PhaseRamps, Ramp, PHASE_SPAN};
pub use stars::{
    constellation_segments, constellation_stars, Constellation, Star, StarField, CONSTELLATIONS,
    CONSTELLATION_STAR_SIZE,
};
