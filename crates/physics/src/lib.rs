//! Minimal ground-plane physics for the skater.
//!
//! Only the vertical axis is integrated. Horizontal motion is a direct
//! displacement with no acceleration, friction or restitution.
//!
//! # Invariants
//! - While grounded, `velocity.y == 0` and the body sits exactly at
//!   `ground_level + ground_offset()`.
//! - State is only cleared by [`Physics::reset`].

use glam::Vec3;
use serde::{Deserialize, Serialize};
use skatepark_common::PhysicsConfig;

/// Vertical velocity and ground contact of one body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Physics {
    config: PhysicsConfig,
    velocity: Vec3,
    grounded: bool,
}

impl Default for Physics {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl Physics {
    /// Start at rest and airborne; the first update settles the body.
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            velocity: Vec3::ZERO,
            grounded: false,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Height of the body origin above the wheel contact point.
    pub fn ground_offset(&self) -> f32 {
        self.config.skateboard_height + self.config.wheel_offset
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Integrate gravity (semi-implicit Euler) and clamp to the ground.
    pub fn update(&mut self, dt: f32, position: &mut Vec3) {
        if !self.grounded {
            self.velocity.y += self.config.gravity * dt;
            position.y += self.velocity.y * dt;
        }

        let wheel_bottom = position.y - self.ground_offset();
        if wheel_bottom <= self.config.ground_level {
            if !self.grounded {
                tracing::debug!(
                    impact_velocity = self.velocity.y,
                    "landed on ground"
                );
            }
            position.y = self.config.ground_level + self.ground_offset();
            self.velocity.y = 0.0;
            self.grounded = true;
        } else {
            self.grounded = false;
        }
    }

    /// Launch upward with the configured impulse, grounded or not.
    pub fn jump(&mut self) {
        self.velocity.y = self.config.jump_velocity;
        self.grounded = false;
        tracing::debug!(velocity = self.velocity.y, "jump");
    }

    /// Displace `position` horizontally by `direction * force`.
    pub fn move_by(&self, position: &mut Vec3, direction: Vec3, force: f32) {
        position.x += direction.x * force;
        position.z += direction.z * force;
    }

    pub fn reset(&mut self) {
        self.velocity = Vec3::ZERO;
        self.grounded = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn ungrounded_update_is_semi_implicit() {
        let mut physics = Physics::default();
        let mut pos = Vec3::new(0.0, 3.2, 0.0);
        physics.update(DT, &mut pos);
        let v = -9.81 * DT;
        assert!((physics.velocity().y - v).abs() < 1e-6);
        assert!((pos.y - (3.2 + v * DT)).abs() < 1e-6);
        assert!(!physics.is_grounded());
    }

    #[test]
    fn ground_clamp_from_any_velocity() {
        for start_v in [0.0, -1.0, -50.0, 3.0] {
            let mut physics = Physics::default();
            physics.velocity.y = start_v;
            let mut pos = Vec3::new(0.0, 0.1, 0.0);
            physics.update(DT, &mut pos);
            let wheel_bottom = pos.y - physics.ground_offset();
            assert_eq!(wheel_bottom, 0.0);
            assert_eq!(physics.velocity().y, 0.0);
            assert!(physics.is_grounded());
        }
    }

    #[test]
    fn falling_body_settles() {
        let mut physics = Physics::default();
        let mut pos = Vec3::new(0.0, 3.2, 0.0);
        let mut frames = 0;
        while !physics.is_grounded() {
            physics.update(DT, &mut pos);
            frames += 1;
            assert!(frames < 1000);
        }
        assert_eq!(pos.y, physics.ground_offset());
    }

    #[test]
    fn jump_leaves_and_returns_to_ground() {
        let mut physics = Physics::default();
        let mut pos = Vec3::ZERO;
        physics.update(DT, &mut pos);
        assert!(physics.is_grounded());

        physics.jump();
        assert!(!physics.is_grounded());
        assert!(physics.velocity().y > 0.0);

        let mut frames = 0;
        let mut peak = pos.y;
        loop {
            physics.update(DT, &mut pos);
            peak = peak.max(pos.y);
            frames += 1;
            if physics.is_grounded() {
                break;
            }
            assert!(frames < 1000);
        }
        assert!(peak > physics.ground_offset() + 1.0);
        assert_eq!(physics.velocity().y, 0.0);
    }

    #[test]
    fn jump_is_not_guarded_in_air() {
        let mut physics = Physics::default();
        physics.jump();
        physics.velocity.y = -2.0;
        physics.jump();
        assert_eq!(physics.velocity().y, 5.0);
    }

    #[test]
    fn move_ignores_vertical_component() {
        let physics = Physics::default();
        let mut pos = Vec3::new(1.0, 2.0, 3.0);
        physics.move_by(&mut pos, Vec3::new(0.5, 9.0, -0.25), 10.0);
        assert_eq!(pos, Vec3::new(6.0, 2.0, 0.5));
    }

    #[test]
    fn reset_clears_state() {
        let mut physics = Physics::default();
        let mut pos = Vec3::ZERO;
        physics.update(DT, &mut pos);
        physics.jump();
        physics.reset();
        assert_eq!(physics.velocity(), Vec3::ZERO);
        assert!(!physics.is_grounded());
    }

    #[test]
    fn custom_ground_level() {
        let mut physics = Physics::new(PhysicsConfig {
            ground_level: 2.0,
            ..PhysicsConfig::default()
        });
        let mut pos = Vec3::ZERO;
        physics.update(DT, &mut pos);
        assert!(physics.is_grounded());
        assert!((pos.y - 2.35).abs() < 1e-6);
    }
}
