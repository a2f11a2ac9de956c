use glam::Vec3;
use serde::{Deserialize, Serialize};
use skatepark_common::StarConfig;
use skatepark_common::math::SplitMix;
use std::f32::consts::TAU;

/// Point size of constellation stars.
pub const CONSTELLATION_STAR_SIZE: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub position: Vec3,
    /// 3.0 for bright, 2.0 for medium, 1.0 for regular stars.
    pub size: f32,
}

/// Background stars scattered uniformly over a sphere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarField {
    pub radius: f32,
    pub stars: Vec<Star>,
}

impl StarField {
    /// Deterministic for a given seed.
    pub fn generate(config: &StarConfig) -> Self {
        let mut rng = SplitMix::new(config.seed);
        let stars = (0..config.count)
            .map(|_| {
                let theta = rng.next_f32() * TAU;
                let phi = (rng.next_f32() * 2.0 - 1.0).acos();
                let position = Vec3::new(
                    phi.sin() * theta.cos(),
                    phi.sin() * theta.sin(),
                    phi.cos(),
                ) * config.radius;
                let roll = rng.next_f32();
                let size = if roll > 0.99 {
                    3.0
                } else if roll > 0.95 {
                    2.0
                } else {
                    1.0
                };
                Star { position, size }
            })
            .collect();
        tracing::debug!(count = config.count, seed = config.seed, "star field generated");
        Self {
            radius: config.radius,
            stars,
        }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.stars.iter().map(|s| s.position)
    }
}

/// A named polyline of sky points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constellation {
    pub name: &'static str,
    pub points: &'static [[f32; 3]],
}

pub const CONSTELLATIONS: [Constellation; 3] = [
    Constellation {
        name: "Orion",
        points: &[
            [0.0, 200.0, -350.0],
            [20.0, 220.0, -350.0],
            [40.0, 240.0, -350.0],
            [0.0, 260.0, -350.0],
            [-20.0, 280.0, -350.0],
            [40.0, 260.0, -350.0],
            [60.0, 280.0, -350.0],
            [-40.0, 260.0, -350.0],
            [-60.0, 280.0, -350.0],
            [0.0, 180.0, -350.0],
            [-20.0, 160.0, -350.0],
            [20.0, 160.0, -350.0],
            [40.0, 140.0, -350.0],
        ],
    },
    Constellation {
        name: "Big Dipper",
        points: &[
            [200.0, 300.0, -300.0],
            [220.0, 310.0, -300.0],
            [240.0, 315.0, -300.0],
            [260.0, 320.0, -300.0],
            [270.0, 340.0, -300.0],
            [260.0, 360.0, -300.0],
            [240.0, 370.0, -300.0],
        ],
    },
    Constellation {
        name: "Cassiopeia",
        points: &[
            [-200.0, 350.0, -250.0],
            [-180.0, 370.0, -250.0],
            [-160.0, 350.0, -250.0],
            [-140.0, 370.0, -250.0],
            [-120.0, 350.0, -250.0],
        ],
    },
];

impl Constellation {
    pub fn stars(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.points.iter().map(|p| Vec3::from_array(*p))
    }

    /// Consecutive point pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.points
            .windows(2)
            .map(|w| (Vec3::from_array(w[0]), Vec3::from_array(w[1])))
    }
}

/// Every constellation star.
pub fn constellation_stars() -> Vec<Vec3> {
    CONSTELLATIONS.iter().flat_map(|c| c.stars()).collect()
}

/// Every constellation line segment.
pub fn constellation_segments() -> Vec<(Vec3, Vec3)> {
    CONSTELLATIONS.iter().flat_map(|c| c.segments()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stars_lie_on_the_sphere() {
        let field = StarField::generate(&StarConfig::default());
        assert_eq!(field.len(), 2000);
        for p in field.positions() {
            assert!((p.length() - 450.0).abs() < 0.05);
        }
    }

    #[test]
    fn same_seed_same_sky() {
        let config = StarConfig {
            count: 50,
            ..StarConfig::default()
        };
        assert_eq!(StarField::generate(&config), StarField::generate(&config));
        let other = StarField::generate(&StarConfig { seed: 1, ..config });
        assert_ne!(StarField::generate(&StarConfig { count: 50, ..StarConfig::default() }), other);
    }

    #[test]
    fn size_classes_are_mostly_regular() {
        let field = StarField::generate(&StarConfig::default());
        let regular = field.stars.iter().filter(|s| s.size == 1.0).count();
        let bright = field.stars.iter().filter(|s| s.size == 3.0).count();
        assert!(regular > 1800, "regular = {regular}");
        assert!(bright < 60, "bright = {bright}");
        assert!(field.stars.iter().all(|s| [1.0, 2.0, 3.0].contains(&s.size)));
    }

    #[test]
    fn empty_field() {
        let field = StarField::generate(&StarConfig {
            count: 0,
            ..StarConfig::default()
        });
        assert!(field.is_empty());
    }

    #[test]
    fn constellation_counts() {
        assert_eq!(constellation_stars().len(), 13 + 7 + 5);
        assert_eq!(constellation_segments().len(), 12 + 6 + 4);
        let orion = CONSTELLATIONS[0];
        let (a, b) = orion.segments().next().unwrap();
        assert_eq!(a, Vec3::new(0.0, 200.0, -350.0));
        assert_eq!(b, Vec3::new(20.0, 220.0, -350.0));
    }
}
