use crate::phase::Phase;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use skatepark_common::DayNightConfig;
use std::f32::consts::TAU;

/// Distance of the sun and moon from the origin.
pub const CELESTIAL_RADIUS: f32 = 100.0;
/// Star layer yaw rate in radians per second of elapsed time.
pub const STAR_ROTATION_SPEED: f32 = 0.02;

/// Everything the scene derives from the time of day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lighting {
    pub time: f32,
    pub phase: Phase,
    pub sun: f32,
    pub sun_glow: f32,
    pub moon: f32,
    pub moon_glow: f32,
    pub stars: f32,
    pub constellation_stars: f32,
    pub constellation_lines: f32,
    pub character_light: f32,
    pub sun_position: Vec3,
    pub moon_position: Vec3,
}

impl Lighting {
    /// Sample the phase table at `time`, wrapped into [0, 1).
    pub fn at(time: f32) -> Self {
        let time = time.rem_euclid(1.0);
        let phase = Phase::at(time);
        let t = phase.progress(time);
        let ramps = phase.ramps();
        let sun = ramps.sun.at(t);
        let moon = ramps.moon.at(t);
        let stars = ramps.stars.at(t);
        Self {
            time,
            phase,
            sun,
            sun_glow: sun * 0.3,
            moon,
            moon_glow: moon * 0.3,
            stars,
            constellation_stars: (stars * 1.2).min(1.0),
            constellation_lines: stars * 0.3,
            character_light: ramps.light.at(t),
            sun_position: sun_position(time),
            moon_position: -sun_position(time),
        }
    }
}

/// Sun on a circle in the XY plane; the moon is diametrically opposite.
pub fn sun_position(time: f32) -> Vec3 {
    let angle = time * TAU;
    Vec3::new(angle.cos(), angle.sin(), 0.0) * CELESTIAL_RADIUS
}

/// Wrapping time of day advanced at a fixed real-time rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayNightCycle {
    time: f32,
    cycle_seconds: f32,
    elapsed: f32,
}

impl Default for DayNightCycle {
    fn default() -> Self {
        Self::new(&DayNightConfig::default())
    }
}

impl DayNightCycle {
    pub fn new(config: &DayNightConfig) -> Self {
        Self {
            time: config.start_time.rem_euclid(1.0),
            cycle_seconds: config.cycle_seconds,
            elapsed: 0.0,
        }
    }

    /// Time of day in [0, 1).
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Real seconds since the cycle was created.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn cycle_seconds(&self) -> f32 {
        self.cycle_seconds
    }

    pub fn phase(&self) -> Phase {
        Phase::at(self.time)
    }

    /// Yaw of the star layers.
    pub fn star_rotation(&self) -> f32 {
        self.elapsed * STAR_ROTATION_SPEED
    }

    /// Advance by `dt` real seconds. Negative steps are ignored.
    pub fn advance(&mut self, dt: f32) -> Lighting {
        let dt = dt.max(0.0);
        let before = self.phase();
        self.elapsed += dt;
        self.time = (self.time + dt / self.cycle_seconds).rem_euclid(1.0);
        let after = self.phase();
        if before != after {
            tracing::debug!(time = self.time, phase = %after, "day/night phase changed");
        }
        self.lighting()
    }

    pub fn lighting(&self) -> Lighting {
        Lighting::at(self.time)
    }

    /// Jump to a time of day.
    pub fn set_time(&mut self, time: f32) {
        self.time = time.rem_euclid(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn wraps_after_exactly_one_cycle() {
        let mut cycle = DayNightCycle::new(&DayNightConfig {
            cycle_seconds: 60.0,
            start_time: 0.25,
        });
        cycle.advance(60.0);
        assert_eq!(cycle.time(), 0.25);
        assert_eq!(cycle.elapsed(), 60.0);
    }

    #[test]
    fn advances_at_cycle_rate() {
        let mut cycle = DayNightCycle::default();
        cycle.advance(15.0);
        assert!(close(cycle.time(), 0.25));
        assert_eq!(cycle.phase(), Phase::MorningToNoon);
        cycle.advance(-5.0);
        assert!(close(cycle.time(), 0.25));
    }

    #[test]
    fn time_stays_in_unit_interval() {
        let mut cycle = DayNightCycle::default();
        for _ in 0..10_000 {
            cycle.advance(0.37);
            assert!((0.0..1.0).contains(&cycle.time()));
        }
    }

    #[test]
    fn sunrise_starts_dim() {
        let l = Lighting::at(0.0);
        assert_eq!(l.phase, Phase::Sunrise);
        assert!(close(l.sun, 0.01));
        assert!(close(l.moon, 0.5));
        assert!(close(l.stars, 0.5));
        assert!(close(l.character_light, 0.5));
        assert!(close(l.sun_position.x, 100.0));
    }

    #[test]
    fn midnight_holds() {
        let l = Lighting::at(0.75);
        assert_eq!(l.phase, Phase::EveningToMidnight);
        assert_eq!(l.sun, 0.0);
        assert!(close(l.stars, 0.8));
        assert!(close(l.character_light, 0.7));
        assert!(l.moon > 0.5 && l.moon < 1.0);
    }

    #[test]
    fn derived_opacities() {
        let l = Lighting::at(0.75);
        assert!(close(l.moon_glow, l.moon * 0.3));
        assert!(close(l.constellation_lines, 0.24));
        // 0.8 * 1.2 stays under the clamp.
        assert!(close(l.constellation_stars, 0.96));
        let noon = Lighting::at(0.3);
        assert!(close(noon.sun_glow, noon.sun * 0.3));
        assert_eq!(noon.constellation_stars, 0.0);
    }

    #[test]
    fn moon_opposes_sun() {
        for t in [0.0, 0.1, 0.45, 0.8] {
            let l = Lighting::at(t);
            assert!((l.sun_position + l.moon_position).length() < 1e-4);
            assert!((l.sun_position.length() - CELESTIAL_RADIUS).abs() < 1e-3);
        }
        assert!(close(Lighting::at(0.25).sun_position.y, 100.0));
    }

    #[test]
    fn stars_rotate_with_elapsed_time() {
        let mut cycle = DayNightCycle::default();
        cycle.advance(10.0);
        assert!(close(cycle.star_rotation(), 0.2));
    }
}
