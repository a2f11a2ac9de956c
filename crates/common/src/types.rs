use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Identity transform translated to `position`.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Transform with XYZ Euler angles (radians), applied X first.
    pub fn from_position_euler(position: Vec3, euler: Vec3) -> Self {
        Self {
            position,
            rotation: euler_to_quat(euler),
            ..Self::default()
        }
    }

    /// Replace the rotation with XYZ Euler angles.
    pub fn set_euler(&mut self, euler: Vec3) {
        self.rotation = euler_to_quat(euler);
    }

    /// Recover XYZ Euler angles from the stored rotation.
    pub fn euler(&self) -> Vec3 {
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }

    /// Local-to-parent matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Quaternion for intrinsic XYZ Euler angles, the order scene nodes use.
pub fn euler_to_quat(euler: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z)
}

/// Named material slot that a surface image can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialSlot {
    Head,
    Torso,
    Arms,
    Legs,
    Feet,
    Cross,
    Deck,
    Metal,
    Wheels,
    Ground,
}

impl MaterialSlot {
    pub const ALL: [MaterialSlot; 10] = [
        MaterialSlot::Head,
        MaterialSlot::Torso,
        MaterialSlot::Arms,
        MaterialSlot::Legs,
        MaterialSlot::Feet,
        MaterialSlot::Cross,
        MaterialSlot::Deck,
        MaterialSlot::Metal,
        MaterialSlot::Wheels,
        MaterialSlot::Ground,
    ];

    /// Look up a slot by its lowercase name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Torso => "torso",
            Self::Arms => "arms",
            Self::Legs => "legs",
            Self::Feet => "feet",
            Self::Cross => "cross",
            Self::Deck => "deck",
            Self::Metal => "metal",
            Self::Wheels => "wheels",
            Self::Ground => "ground",
        }
    }

    /// Slots owned by the character's own material set.
    pub fn is_character(self) -> bool {
        matches!(
            self,
            Self::Head | Self::Torso | Self::Arms | Self::Legs | Self::Feet | Self::Cross
        )
    }

    /// Slots owned by the skateboard.
    pub fn is_skateboard(self) -> bool {
        matches!(self, Self::Deck | Self::Metal | Self::Wheels)
    }
}

impl fmt::Display for MaterialSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn euler_roundtrip_single_axis() {
        let t = Transform::from_position_euler(Vec3::ZERO, Vec3::new(0.0, 0.0, FRAC_PI_2));
        let e = t.euler();
        assert!((e.z - FRAC_PI_2).abs() < 1e-5);
        assert!(e.x.abs() < 1e-5);
    }

    #[test]
    fn matrix_translates_origin() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let p = t.matrix().transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn slot_names_parse() {
        for slot in MaterialSlot::ALL {
            assert_eq!(MaterialSlot::from_name(slot.name()), Some(slot));
        }
        assert_eq!(MaterialSlot::from_name("cape"), None);
        assert_eq!(MaterialSlot::from_name("Head"), None);
    }

    #[test]
    fn slot_ownership_is_disjoint() {
        for slot in MaterialSlot::ALL {
            assert!(!(slot.is_character() && slot.is_skateboard()));
        }
        assert!(!MaterialSlot::Ground.is_character());
        assert!(!MaterialSlot::Ground.is_skateboard());
    }
}
