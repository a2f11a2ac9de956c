use serde::{Deserialize, Serialize};
use skatepark_common::math::lerp;
use std::fmt;

/// Start and end value of one intensity across a phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    pub start: f32,
    pub end: f32,
}

impl Ramp {
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    pub const fn hold(value: f32) -> Self {
        Self::new(value, value)
    }

    pub fn at(self, t: f32) -> f32 {
        lerp(self.start, self.end, t)
    }
}

/// Intensity ramps of one phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseRamps {
    pub sun: Ramp,
    pub moon: Ramp,
    pub stars: Ramp,
    pub light: Ramp,
}

/// Segment of the day/night cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    Sunrise,
    MorningToNoon,
    AfternoonToSunset,
    Moonrise,
    EveningToMidnight,
    LateNightToDawn,
}

const BOUNDS: [f32; 7] = [0.0, 0.167, 0.333, 0.5, 0.667, 0.833, 1.0];

/// Shared progress divisor. Phases narrower than this stop short of 1.0.
pub const PHASE_SPAN: f32 = 0.167;

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Sunrise,
        Phase::MorningToNoon,
        Phase::AfternoonToSunset,
        Phase::Moonrise,
        Phase::EveningToMidnight,
        Phase::LateNightToDawn,
    ];

    fn index(self) -> usize {
        match self {
            Phase::Sunrise => 0,
            Phase::MorningToNoon => 1,
            Phase::AfternoonToSunset => 2,
            Phase::Moonrise => 3,
            Phase::EveningToMidnight => 4,
            Phase::LateNightToDawn => 5,
        }
    }

    /// Phase containing `time`, which is wrapped into [0, 1) first.
    pub fn at(time: f32) -> Phase {
        let time = time.rem_euclid(1.0);
        Phase::ALL
            .into_iter()
            .find(|p| time < p.end())
            .unwrap_or(Phase::LateNightToDawn)
    }

    pub fn start(self) -> f32 {
        BOUNDS[self.index()]
    }

    pub fn end(self) -> f32 {
        BOUNDS[self.index() + 1]
    }

    /// Progress through this phase in [0, 1], measured in units of [`PHASE_SPAN`].
    pub fn progress(self, time: f32) -> f32 {
        ((time - self.start()) / PHASE_SPAN).clamp(0.0, 1.0)
    }

    pub fn ramps(self) -> PhaseRamps {
        match self {
            Phase::Sunrise => PhaseRamps {
                sun: Ramp::new(0.01, 0.5),
                moon: Ramp::new(0.5, 0.0),
                stars: Ramp::new(0.5, 0.0),
                light: Ramp::new(0.5, 0.0),
            },
            Phase::MorningToNoon => PhaseRamps {
                sun: Ramp::new(0.5, 1.0),
                moon: Ramp::hold(0.0),
                stars: Ramp::hold(0.0),
                light: Ramp::hold(0.0),
            },
            Phase::AfternoonToSunset => PhaseRamps {
                sun: Ramp::new(1.0, 0.01),
                moon: Ramp::new(0.0, 0.01),
                stars: Ramp::hold(0.0),
                light: Ramp::new(0.0, 0.3),
            },
            Phase::Moonrise => PhaseRamps {
                sun: Ramp::hold(0.0),
                moon: Ramp::new(0.01, 0.5),
                stars: Ramp::new(0.0, 0.8),
                light: Ramp::new(0.3, 0.7),
            },
            Phase::EveningToMidnight => PhaseRamps {
                sun: Ramp::hold(0.0),
                moon: Ramp::new(0.5, 1.0),
                stars: Ramp::hold(0.8),
                light: Ramp::hold(0.7),
            },
            Phase::LateNightToDawn => PhaseRamps {
                sun: Ramp::new(0.0, 0.01),
                moon: Ramp::new(1.0, 0.5),
                stars: Ramp::new(0.8, 0.5),
                light: Ramp::new(0.7, 0.5),
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Sunrise => "sunrise",
            Phase::MorningToNoon => "morning to noon",
            Phase::AfternoonToSunset => "afternoon to sunset",
            Phase::Moonrise => "moonrise",
            Phase::EveningToMidnight => "evening to midnight",
            Phase::LateNightToDawn => "late night to dawn",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_tile_the_unit_interval() {
        let mut previous_end = 0.0;
        for phase in Phase::ALL {
            assert_eq!(phase.start(), previous_end);
            assert!(phase.end() > phase.start());
            previous_end = phase.end();
        }
        assert_eq!(previous_end, 1.0);
    }

    #[test]
    fn lookup_by_time() {
        assert_eq!(Phase::at(0.0), Phase::Sunrise);
        assert_eq!(Phase::at(0.1669), Phase::Sunrise);
        assert_eq!(Phase::at(0.167), Phase::MorningToNoon);
        assert_eq!(Phase::at(0.4), Phase::AfternoonToSunset);
        assert_eq!(Phase::at(0.5), Phase::Moonrise);
        assert_eq!(Phase::at(0.7), Phase::EveningToMidnight);
        assert_eq!(Phase::at(0.9999), Phase::LateNightToDawn);
        assert_eq!(Phase::at(1.25), Phase::MorningToNoon);
    }

    #[test]
    fn progress_spans_each_phase() {
        for phase in Phase::ALL {
            assert_eq!(phase.progress(phase.start()), 0.0);
            let expected = (phase.end() - phase.start()) / PHASE_SPAN;
            assert!((phase.progress(phase.end()) - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn narrow_phases_stop_short_of_full_progress() {
        let end = Phase::MorningToNoon.progress(Phase::MorningToNoon.end());
        assert!((end - 0.166 / 0.167).abs() < 1e-4);
        assert!(end < 1.0);
        assert!((Phase::Sunrise.progress(0.167) - 1.0).abs() < 1e-6);
        assert!((Phase::Moonrise.progress(0.5835) - 0.5).abs() < 1e-4);
        assert_eq!(Phase::LateNightToDawn.progress(1.5), 1.0);
    }

    #[test]
    fn ramps_join_where_the_table_is_continuous() {
        let sunrise = Phase::Sunrise.ramps();
        let morning = Phase::MorningToNoon.ramps();
        assert_eq!(sunrise.sun.end, morning.sun.start);
        let dawn = Phase::LateNightToDawn.ramps();
        assert_eq!(dawn.light.end, sunrise.light.start);
        assert_eq!(dawn.stars.end, sunrise.stars.start);
    }
}
