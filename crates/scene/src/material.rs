use glam::Vec2;
use serde::{Deserialize, Serialize};
use skatepark_common::MaterialSlot;

/// Index of a material in the scene's material table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialHandle(pub u32);

/// Content-addressed identifier of a decoded texture image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureId(pub u64);

/// Texture addressing outside [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WrapMode {
    Repeat,
    #[default]
    ClampToEdge,
}

/// How a texture is laid over a surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sampling {
    pub wrap: WrapMode,
    pub repeat: Vec2,
    /// UV rotation in radians about `center`.
    pub rotation: f32,
    pub center: Vec2,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            wrap: WrapMode::ClampToEdge,
            repeat: Vec2::ONE,
            rotation: 0.0,
            center: Vec2::ZERO,
        }
    }
}

impl Sampling {
    pub fn repeat(x: f32, y: f32) -> Self {
        Self {
            wrap: WrapMode::Repeat,
            repeat: Vec2::new(x, y),
            ..Self::default()
        }
    }

    pub fn clamp() -> Self {
        Self::default()
    }

    /// Apply repeat and rotation to a mesh UV.
    pub fn transform_uv(&self, uv: Vec2) -> Vec2 {
        let (s, c) = self.rotation.sin_cos();
        let p = uv - self.center;
        let rotated = Vec2::new(c * p.x - s * p.y, s * p.x + c * p.y) + self.center;
        rotated * self.repeat
    }
}

/// A texture bound to a material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureBinding {
    pub texture: TextureId,
    pub sampling: Sampling,
}

/// Surface description shared by every mesh that references it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Slot a surface image can be bound through, if any.
    pub slot: Option<MaterialSlot>,
    pub base_color: [f32; 3],
    pub opacity: f32,
    pub transparent: bool,
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
    pub roughness: f32,
    pub metalness: f32,
    /// Ignore scene lighting.
    pub unlit: bool,
    pub double_sided: bool,
    pub texture: Option<TextureBinding>,
    /// Incremented on every mutation through the setters below.
    pub version: u32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".into(),
            slot: None,
            base_color: [1.0, 1.0, 1.0],
            opacity: 1.0,
            transparent: false,
            emissive: [0.0, 0.0, 0.0],
            emissive_intensity: 1.0,
            roughness: 1.0,
            metalness: 0.0,
            unlit: false,
            double_sided: false,
            texture: None,
            version: 0,
        }
    }
}

impl Material {
    /// Lit material with a flat color.
    pub fn standard(name: impl Into<String>, color: u32) -> Self {
        Self {
            name: name.into(),
            base_color: hex_color(color),
            ..Self::default()
        }
    }

    /// Unlit material with a flat color.
    pub fn basic(name: impl Into<String>, color: u32) -> Self {
        Self {
            unlit: true,
            ..Self::standard(name, color)
        }
    }

    pub fn with_slot(mut self, slot: MaterialSlot) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn with_emissive(mut self, color: u32, intensity: f32) -> Self {
        self.emissive = hex_color(color);
        self.emissive_intensity = intensity;
        self
    }

    pub fn with_surface(mut self, roughness: f32, metalness: f32) -> Self {
        self.roughness = roughness;
        self.metalness = metalness;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.transparent = true;
        self.opacity = opacity;
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }

    /// Bind a surface image, replacing any previous one.
    pub fn set_texture(&mut self, binding: TextureBinding) {
        self.texture = Some(binding);
        self.version = self.version.wrapping_add(1);
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        if self.opacity != opacity {
            self.opacity = opacity;
            self.version = self.version.wrapping_add(1);
        }
    }
}

/// Convert a `0xRRGGBB` literal to linear-agnostic float RGB.
pub fn hex_color(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn hex_color_channels() {
        assert_eq!(hex_color(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(hex_color(0x00ff00), [0.0, 1.0, 0.0]);
        assert_eq!(hex_color(0x0000ff), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn set_texture_bumps_version() {
        let mut m = Material::standard("torso", 0xffffff);
        let before = m.version;
        m.set_texture(TextureBinding {
            texture: TextureId(9),
            sampling: Sampling::repeat(1.0, 1.0),
        });
        assert_eq!(m.version, before + 1);
        assert_eq!(m.texture.unwrap().texture, TextureId(9));
    }

    #[test]
    fn unchanged_opacity_keeps_version() {
        let mut m = Material::basic("sun", 0xffdd00).with_opacity(1.0);
        m.set_opacity(1.0);
        assert_eq!(m.version, 0);
        m.set_opacity(0.5);
        assert_eq!(m.version, 1);
    }

    #[test]
    fn sampling_rotation_about_center() {
        let s = Sampling {
            rotation: FRAC_PI_2,
            center: Vec2::splat(0.5),
            ..Sampling::repeat(1.0, 1.0)
        };
        let uv = s.transform_uv(Vec2::new(1.0, 0.5));
        assert!((uv - Vec2::new(0.5, 1.0)).length() < 1e-5);
    }

    #[test]
    fn sampling_repeat_scales() {
        let s = Sampling::repeat(10.0, 100.0);
        assert_eq!(s.transform_uv(Vec2::ONE), Vec2::new(10.0, 100.0));
    }
}
