use serde::{Deserialize, Serialize};
use std::fmt;

/// Trick animations. None has any motion yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trick {
    Ollie,
}

impl Trick {
    /// Advance the trick by `dt`. Tricks are placeholders and leave the pose untouched.
    pub fn update(self, _dt: f32) {}
}

/// Which animation drives the rig each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationState {
    #[default]
    Idle,
    Trick(Trick),
}

impl fmt::Display for AnimationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimationState::Idle => write!(f, "idle"),
            AnimationState::Trick(Trick::Ollie) => write!(f, "ollie"),
        }
    }
}
