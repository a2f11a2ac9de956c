//! Keyboard input mapped to character actions.
//!
//! # Invariants
//! - Control state changes only on key edges; unbound keys are ignored.
//! - The stage consumes [`Action`]s, never raw key events.
//! - Held controls repeat their action every frame.

pub mod action;
pub mod controller;
pub mod key;

pub use action::Action;
pub use controller::PlayerController;
pub use key::{Control, ControlState, Key, KeyBindings, UnknownKey};
