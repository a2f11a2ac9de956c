use crate::graph::NodeId;
use crate::material::hex_color;
use serde::{Deserialize, Serialize};

/// Shadow map parameters for a shadow-casting light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowSettings {
    pub map_size: u32,
    pub near: f32,
    pub far: f32,
}

impl ShadowSettings {
    pub fn new(map_size: u32, near: f32, far: f32) -> Self {
        Self {
            map_size,
            near,
            far,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LightKind {
    Ambient,
    Directional,
    /// `distance` of zero means unlimited range.
    Point { distance: f32 },
    Spot {
        angle: f32,
        penumbra: f32,
        distance: f32,
        target: Option<NodeId>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub kind: LightKind,
    pub color: [f32; 3],
    pub intensity: f32,
    pub shadow: Option<ShadowSettings>,
}

impl Light {
    pub fn ambient(color: u32, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color: hex_color(color),
            intensity,
            shadow: None,
        }
    }

    pub fn directional(color: u32, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional,
            ..Self::ambient(color, intensity)
        }
    }

    pub fn point(color: u32, intensity: f32, distance: f32) -> Self {
        Self {
            kind: LightKind::Point { distance },
            ..Self::ambient(color, intensity)
        }
    }

    pub fn spot(color: u32, intensity: f32, angle: f32, penumbra: f32, distance: f32) -> Self {
        Self {
            kind: LightKind::Spot {
                angle,
                penumbra,
                distance,
                target: None,
            },
            ..Self::ambient(color, intensity)
        }
    }

    /// Aim a spot light at a node. No effect on other kinds.
    pub fn aimed_at(mut self, node: NodeId) -> Self {
        if let LightKind::Spot { target, .. } = &mut self.kind {
            *target = Some(node);
        }
        self
    }

    pub fn with_shadow(mut self, shadow: ShadowSettings) -> Self {
        self.shadow = Some(shadow);
        self
    }

    pub fn casts_shadow(&self) -> bool {
        self.shadow.is_some()
    }

    /// Range of influence, `None` when unbounded.
    pub fn range(&self) -> Option<f32> {
        match self.kind {
            LightKind::Point { distance } | LightKind::Spot { distance, .. } if distance > 0.0 => {
                Some(distance)
            }
            _ => None,
        }
    }
}
