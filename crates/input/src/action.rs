use glam::Vec3;

/// A high-level action produced by the player controller.
///
/// The stage consumes actions, never raw key events.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Horizontal displacement direction for this frame, already scaled by dt.
    Move(Vec3),
    /// Signed truck turn input; negative is left.
    Turn(f32),
    /// Jump. Issued every frame while the key is held.
    Jump,
    /// Ollie trick. Consumers treat it as a no-op.
    Ollie,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_move_is_constructible() {
        let a = Action::Move(Vec3::new(1.0, 0.0, 0.0));
        assert!(matches!(a, Action::Move(_)));
    }

    #[test]
    fn action_turn_carries_sign() {
        let Action::Turn(amount) = Action::Turn(-0.5) else {
            panic!("expected turn");
        };
        assert!(amount < 0.0);
    }
}
