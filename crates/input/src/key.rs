use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Physical keys the demo reacts to, named by their browser key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    KeyE,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
}

impl Key {
    pub const ALL: [Key; 10] = [
        Key::KeyW,
        Key::KeyA,
        Key::KeyS,
        Key::KeyD,
        Key::KeyE,
        Key::ArrowUp,
        Key::ArrowDown,
        Key::ArrowLeft,
        Key::ArrowRight,
        Key::Space,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Key::KeyW => "KeyW",
            Key::KeyA => "KeyA",
            Key::KeyS => "KeyS",
            Key::KeyD => "KeyD",
            Key::KeyE => "KeyE",
            Key::ArrowUp => "ArrowUp",
            Key::ArrowDown => "ArrowDown",
            Key::ArrowLeft => "ArrowLeft",
            Key::ArrowRight => "ArrowRight",
            Key::Space => "Space",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown key code: {0}")]
pub struct UnknownKey(pub String);

impl FromStr for Key {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::ALL
            .into_iter()
            .find(|k| k.code() == s)
            .ok_or_else(|| UnknownKey(s.to_string()))
    }
}

/// Logical controls a key can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Control {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
    Ollie,
}

/// Key to control mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    map: BTreeMap<Key, Control>,
}

impl Default for KeyBindings {
    /// WASD and arrows for movement, Space to jump, E for an ollie.
    fn default() -> Self {
        Self::from_pairs([
            (Key::KeyW, Control::Forward),
            (Key::ArrowUp, Control::Forward),
            (Key::KeyS, Control::Backward),
            (Key::ArrowDown, Control::Backward),
            (Key::KeyA, Control::Left),
            (Key::ArrowLeft, Control::Left),
            (Key::KeyD, Control::Right),
            (Key::ArrowRight, Control::Right),
            (Key::Space, Control::Jump),
            (Key::KeyE, Control::Ollie),
        ])
    }
}

impl KeyBindings {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Key, Control)>) -> Self {
        Self {
            map: pairs.into_iter().collect(),
        }
    }

    pub fn control(&self, key: Key) -> Option<Control> {
        self.map.get(&key).copied()
    }

    /// Keys bound to `control`, in key order.
    pub fn keys_for(&self, control: Control) -> impl Iterator<Item = Key> + '_ {
        self.map
            .iter()
            .filter(move |(_, c)| **c == control)
            .map(|(k, _)| *k)
    }
}

/// Held state of every control, driven by key edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub ollie: bool,
}

impl ControlState {
    pub fn set(&mut self, control: Control, held: bool) {
        let slot = match control {
            Control::Forward => &mut self.forward,
            Control::Backward => &mut self.backward,
            Control::Left => &mut self.left,
            Control::Right => &mut self.right,
            Control::Jump => &mut self.jump,
            Control::Ollie => &mut self.ollie,
        };
        *slot = held;
    }

    pub fn is_held(&self, control: Control) -> bool {
        match control {
            Control::Forward => self.forward,
            Control::Backward => self.backward,
            Control::Left => self.left,
            Control::Right => self.right,
            Control::Jump => self.jump,
            Control::Ollie => self.ollie,
        }
    }
}
