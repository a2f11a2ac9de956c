//! CPU model of the sky dome shading.
//!
//! The GPU sky shader evaluates the same gradients per fragment; this copy
//! backs the clear colour, the CLI table dump and the tests.

use crate::phase::Phase;
use glam::Vec3;
use skatepark_common::math::smoothstep;

pub const DAY_TOP: Vec3 = Vec3::new(0.1, 0.3, 0.9);
pub const DAY_BOTTOM: Vec3 = Vec3::new(0.5, 0.6, 1.0);
pub const NIGHT_TOP: Vec3 = Vec3::new(0.0, 0.0, 0.1);
pub const NIGHT_BOTTOM: Vec3 = Vec3::new(0.05, 0.05, 0.15);
pub const SUNSET_TOP: Vec3 = Vec3::new(0.1, 0.15, 0.4);
pub const SUNSET_MIDDLE: Vec3 = Vec3::new(0.95, 0.33, 0.15);
pub const SUNSET_BOTTOM: Vec3 = Vec3::new(0.95, 0.6, 0.4);
/// Height where the sunset band peaks.
const SUNSET_BAND: f32 = 0.3;

/// `h` is |direction.y| of a unit view direction.
pub fn day_color(h: f32) -> Vec3 {
    DAY_BOTTOM.lerp(DAY_TOP, h)
}

pub fn night_color(h: f32) -> Vec3 {
    NIGHT_BOTTOM.lerp(NIGHT_TOP, h)
}

pub fn sunset_color(h: f32) -> Vec3 {
    if h > SUNSET_BAND {
        SUNSET_MIDDLE.lerp(SUNSET_TOP, (h - SUNSET_BAND) / (1.0 - SUNSET_BAND))
    } else {
        SUNSET_BOTTOM.lerp(SUNSET_MIDDLE, h / SUNSET_BAND)
    }
}

/// Sky colour seen along a view direction with vertical component `dir_y`.
pub fn sky_color(dir_y: f32, time: f32) -> Vec3 {
    let h = dir_y.abs().min(1.0);
    let time = time.rem_euclid(1.0);
    let phase = Phase::at(time);
    let t = smoothstep(0.0, 1.0, phase.progress(time));
    let (day, night, sunset) = (day_color(h), night_color(h), sunset_color(h));
    match phase {
        Phase::Sunrise => sunset.lerp(day, t),
        Phase::MorningToNoon => day,
        Phase::AfternoonToSunset => day.lerp(sunset, t),
        Phase::Moonrise => sunset.lerp(night, t),
        Phase::EveningToMidnight => night,
        Phase::LateNightToDawn => night.lerp(sunset, t),
    }
}

/// Horizon colour, used to clear the frame behind the sky dome.
pub fn horizon_color(time: f32) -> Vec3 {
    sky_color(0.0, time)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn gradients_hit_their_endpoints() {
        assert!(close(day_color(0.0), DAY_BOTTOM));
        assert!(close(day_color(1.0), DAY_TOP));
        assert!(close(night_color(1.0), NIGHT_TOP));
        assert!(close(sunset_color(0.0), SUNSET_BOTTOM));
        assert!(close(sunset_color(0.3), SUNSET_MIDDLE));
        assert!(close(sunset_color(1.0), SUNSET_TOP));
    }

    #[test]
    fn sky_is_symmetric_about_horizon() {
        assert!(close(sky_color(0.6, 0.1), sky_color(-0.6, 0.1)));
    }

    #[test]
    fn steady_phases() {
        assert!(close(sky_color(0.5, 0.25), day_color(0.5)));
        assert!(close(sky_color(0.5, 0.75), night_color(0.5)));
    }

    #[test]
    fn transitions_start_from_previous_palette() {
        assert!(close(sky_color(0.2, 0.0), sunset_color(0.2)));
        assert!(close(sky_color(0.2, 0.5), sunset_color(0.2)));
        assert!(close(sky_color(0.2, 0.833), night_color(0.2)));
    }

    #[test]
    fn horizon_at_noon_is_light_blue() {
        assert!(close(horizon_color(0.25), DAY_BOTTOM));
    }
}
