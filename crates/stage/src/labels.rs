use glam::Vec3;
use serde::Serialize;

/// Text anchored at a world position, drawn facing the camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorldLabel {
    pub text: &'static str,
    pub position: Vec3,
    pub color: u32,
    /// Glyph height in world units.
    pub size: f32,
}

const fn label(text: &'static str, position: [f32; 3], color: u32, size: f32) -> WorldLabel {
    WorldLabel {
        text,
        position: Vec3::from_array(position),
        color,
        size,
    }
}

/// Axis names next to the axes helper and the four reference corners.
pub const WORLD_LABELS: [WorldLabel; 7] = [
    label("X", [5.5, 1.75, 0.0], 0xff0000, 0.5),
    label("Y", [-0.25, 7.5, 0.0], 0x00ff00, 0.5),
    label("Z", [-0.25, 1.75, 5.5], 0x0000ff, 0.5),
    label("A", [-10.0, 0.1, -10.0], 0xff0000, 1.0),
    label("B", [10.0, 0.1, -10.0], 0x0000ff, 1.0),
    label("C", [10.0, 0.1, 10.0], 0xffff00, 1.0),
    label("D", [-10.0, 0.1, 10.0], 0xff00ff, 1.0),
];
