use crate::action::Action;
use crate::key::{Control, ControlState, Key, KeyBindings};
use glam::Vec3;
use skatepark_common::ControlConfig;

/// Turns held controls into per-frame [`Action`]s.
#[derive(Debug, Clone)]
pub struct PlayerController {
    bindings: KeyBindings,
    controls: ControlState,
    turn_speed: f32,
    move_direction: Vec3,
    is_moving: bool,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(KeyBindings::default(), &ControlConfig::default())
    }
}

impl PlayerController {
    pub fn new(bindings: KeyBindings, config: &ControlConfig) -> Self {
        Self {
            bindings,
            controls: ControlState::default(),
            turn_speed: config.turn_speed,
            move_direction: Vec3::ZERO,
            is_moving: false,
        }
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    /// Apply a key edge. Returns false for keys with no binding.
    pub fn handle_key(&mut self, key: Key, pressed: bool) -> bool {
        match self.bindings.control(key) {
            Some(control) => {
                if self.controls.is_held(control) != pressed {
                    tracing::trace!(%key, ?control, pressed, "control edge");
                }
                self.controls.set(control, pressed);
                true
            }
            None => false,
        }
    }

    /// Apply a key edge by browser key code. Unknown codes are ignored.
    pub fn handle_code(&mut self, code: &str, pressed: bool) -> bool {
        code.parse::<Key>()
            .map(|key| self.handle_key(key, pressed))
            .unwrap_or(false)
    }

    /// Drop every held control, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.controls = ControlState::default();
    }

    /// Sample held controls for one frame.
    ///
    /// `heading` is the character yaw the movement is rotated into.
    pub fn update(&mut self, dt: f32, heading: f32) -> Vec<Action> {
        let mut actions = Vec::new();
        self.move_direction = Vec3::ZERO;
        self.is_moving = false;

        if self.controls.forward {
            self.move_direction.z -= 1.0;
            self.is_moving = true;
        }
        if self.controls.backward {
            self.move_direction.z += 1.0;
            self.is_moving = true;
        }
        if self.controls.left {
            actions.push(Action::Turn(-self.turn_speed * dt));
        }
        if self.controls.right {
            actions.push(Action::Turn(self.turn_speed * dt));
        }

        if self.is_moving {
            // Opposing keys cancel to zero, which normalizes to zero.
            let dir = self.move_direction.normalize_or_zero();
            self.move_direction = dir;
            let (sin, cos) = heading.sin_cos();
            let rotated = Vec3::new(dir.x * cos - dir.z * sin, 0.0, dir.x * sin + dir.z * cos);
            actions.push(Action::Move(rotated * dt));
        }

        if self.controls.jump {
            actions.push(Action::Jump);
        }
        if self.controls.ollie {
            actions.push(Action::Ollie);
        }
        actions
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    /// Unrotated, normalized movement direction from the last update.
    pub fn movement_direction(&self) -> Vec3 {
        self.move_direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    const DT: f32 = 0.1;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn idle_produces_nothing() {
        let mut c = PlayerController::default();
        assert!(c.update(DT, 0.0).is_empty());
        assert!(!c.is_moving());
    }

    #[test]
    fn forward_is_negative_z_scaled_by_dt() {
        let mut c = PlayerController::default();
        c.handle_key(Key::KeyW, true);
        let actions = c.update(DT, 0.0);
        assert_eq!(actions.len(), 1);
        let Action::Move(v) = actions[0] else {
            panic!("expected move, got {:?}", actions[0]);
        };
        assert!(approx(v, Vec3::new(0.0, 0.0, -0.1)));
        assert!(c.is_moving());
        assert_eq!(c.movement_direction(), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn movement_rotates_into_heading() {
        let mut c = PlayerController::default();
        c.handle_key(Key::ArrowUp, true);
        let actions = c.update(1.0, 3.0 * FRAC_PI_2);
        let Action::Move(v) = actions[0] else {
            panic!("expected move");
        };
        // (0, 0, -1) at heading 3π/2: x = -(-1)·sin = -1, z = -cos = 0.
        assert!(approx(v, Vec3::new(-1.0, 0.0, 0.0)));
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut c = PlayerController::default();
        c.handle_key(Key::KeyW, true);
        c.handle_key(Key::KeyS, true);
        let actions = c.update(DT, 0.0);
        assert_eq!(actions, vec![Action::Move(Vec3::ZERO)]);
    }

    #[test]
    fn turning_is_signed_rate_times_dt() {
        let mut c = PlayerController::default();
        c.handle_key(Key::KeyA, true);
        let actions = c.update(DT, 0.0);
        assert_eq!(actions, vec![Action::Turn(-FRAC_PI_4 * DT)]);

        c.handle_key(Key::KeyA, false);
        c.handle_key(Key::ArrowRight, true);
        assert_eq!(c.update(DT, 0.0), vec![Action::Turn(FRAC_PI_4 * DT)]);
    }

    #[test]
    fn held_jump_repeats_every_frame() {
        let mut c = PlayerController::default();
        c.handle_key(Key::Space, true);
        for _ in 0..3 {
            assert_eq!(c.update(DT, 0.0), vec![Action::Jump]);
        }
        c.handle_key(Key::Space, false);
        assert!(c.update(DT, 0.0).is_empty());
    }

    #[test]
    fn ollie_is_reported() {
        let mut c = PlayerController::default();
        c.handle_code("KeyE", true);
        assert_eq!(c.update(DT, 0.0), vec![Action::Ollie]);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut c = PlayerController::default();
        assert!(!c.handle_code("KeyZ", true));
        let bindings = KeyBindings::from_pairs([(Key::KeyW, Control::Forward)]);
        let mut only_w = PlayerController::new(bindings, &ControlConfig::default());
        assert!(!only_w.handle_key(Key::Space, true));
        assert_eq!(only_w.controls(), &ControlState::default());
    }

    #[test]
    fn release_all_clears() {
        let mut c = PlayerController::default();
        c.handle_key(Key::KeyD, true);
        c.handle_key(Key::Space, true);
        c.release_all();
        assert!(c.update(DT, 0.0).is_empty());
    }
}
