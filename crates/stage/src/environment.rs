use glam::Vec3;
use serde::{Deserialize, Serialize};
use skatepark_common::{MaterialSlot, Transform};
use skatepark_scene::{
    Light, Material, MaterialHandle, MeshData, MeshInstance, NodeId, SceneGraph, TextureBinding,
};
use skatepark_sky::Lighting;
use std::f32::consts::FRAC_PI_2;

pub const GROUND_WIDTH: f32 = 100.0;
pub const GROUND_LENGTH: f32 = 1000.0;
pub const AXES_LENGTH: f32 = 5.0;
pub const AXES_HEIGHT: f32 = 2.0;

const SUN_RADIUS: f32 = 15.0;
const SUN_GLOW_RADIUS: f32 = 21.0;
const MOON_RADIUS: f32 = 5.0;
const MOON_GLOW_RADIUS: f32 = 7.0;
const SPHERE_SEGMENTS: u32 = 32;

/// Axis gizmo drawn as three coloured line segments from `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxesHelper {
    pub origin: Vec3,
    pub length: f32,
}

impl AxesHelper {
    /// (start, end, colour) for X red, Y green, Z blue.
    pub fn segments(&self) -> [(Vec3, Vec3, u32); 3] {
        [
            (self.origin, self.origin + Vec3::X * self.length, 0xff0000),
            (self.origin, self.origin + Vec3::Y * self.length, 0x00ff00),
            (self.origin, self.origin + Vec3::Z * self.length, 0x0000ff),
        ]
    }
}

/// A sphere with a larger translucent halo parented to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CelestialBody {
    pub node: NodeId,
    pub glow: NodeId,
    pub material: MaterialHandle,
    pub glow_material: MaterialHandle,
}

impl CelestialBody {
    fn build(
        scene: &mut SceneGraph,
        name: &str,
        radius: f32,
        color: u32,
        glow_radius: f32,
        glow_color: u32,
        glow_opacity: f32,
    ) -> Self {
        let mesh = scene.add_mesh_data(MeshData::sphere(name, radius, SPHERE_SEGMENTS, SPHERE_SEGMENTS));
        let material = scene.add_material(Material::basic(name, color).with_opacity(1.0));
        let root = scene.root();
        let node = scene.add_mesh(
            root,
            name,
            Transform::default(),
            MeshInstance::new(mesh, material),
        );

        let glow_name = format!("{name}_glow");
        let glow_mesh = scene.add_mesh_data(MeshData::sphere(
            &glow_name,
            glow_radius,
            SPHERE_SEGMENTS,
            SPHERE_SEGMENTS,
        ));
        let glow_material =
            scene.add_material(Material::basic(glow_name.as_str(), glow_color).with_opacity(glow_opacity));
        let glow = scene.add_mesh(
            node,
            &glow_name,
            Transform::default(),
            MeshInstance::new(glow_mesh, glow_material),
        );
        Self {
            node,
            glow,
            material,
            glow_material,
        }
    }

    fn apply(&self, scene: &mut SceneGraph, position: Vec3, opacity: f32, glow_opacity: f32) {
        scene.set_position(self.node, position);
        if let Some(m) = scene.material_mut(self.material) {
            m.set_opacity(opacity);
        }
        if let Some(m) = scene.material_mut(self.glow_material) {
            m.set_opacity(glow_opacity);
        }
    }
}

/// Everything in the scene that is not the character.
#[derive(Debug, Clone)]
pub struct Environment {
    pub ground: NodeId,
    pub ground_material: MaterialHandle,
    pub ambient: NodeId,
    pub directional: NodeId,
    pub sun: CelestialBody,
    pub moon: CelestialBody,
    pub axes: AxesHelper,
}

impl Environment {
    pub fn build(scene: &mut SceneGraph) -> Self {
        let root = scene.root();

        let ground_mesh = scene.add_mesh_data(MeshData::plane("ground", GROUND_WIDTH, GROUND_LENGTH));
        let ground_material = scene.add_material(
            Material::basic("ground", 0xffffff)
                .with_slot(MaterialSlot::Ground)
                .double_sided(),
        );
        let ground = scene.add_mesh(
            root,
            "ground",
            Transform::from_position_euler(Vec3::ZERO, Vec3::new(-FRAC_PI_2, 0.0, 0.0)),
            MeshInstance::new(ground_mesh, ground_material),
        );

        let ambient = scene.add_light(root, "ambient", Transform::default(), Light::ambient(0xffffff, 0.5));
        let directional = scene.add_light(
            root,
            "directional",
            Transform::from_position(Vec3::new(0.0, 50.0, 0.0)),
            Light::directional(0xffffff, 1.0),
        );

        let sun = CelestialBody::build(scene, "sun", SUN_RADIUS, 0xffdd00, SUN_GLOW_RADIUS, 0xffee88, 0.3);
        let moon = CelestialBody::build(scene, "moon", MOON_RADIUS, 0xeeeeee, MOON_GLOW_RADIUS, 0x8888ff, 0.3);

        tracing::debug!(nodes = scene.node_count(), "environment built");
        Self {
            ground,
            ground_material,
            ambient,
            directional,
            sun,
            moon,
            axes: AxesHelper {
                origin: Vec3::new(0.0, AXES_HEIGHT, 0.0),
                length: AXES_LENGTH,
            },
        }
    }

    /// Move the sun and moon and set their opacities.
    pub fn apply_lighting(&self, scene: &mut SceneGraph, lighting: &Lighting) {
        self.sun
            .apply(scene, lighting.sun_position, lighting.sun, lighting.sun_glow);
        self.moon
            .apply(scene, lighting.moon_position, lighting.moon, lighting.moon_glow);
    }

    pub fn set_ground_texture(&self, scene: &mut SceneGraph, binding: TextureBinding) -> bool {
        match scene.material_mut(self.ground_material) {
            Some(material) => {
                material.set_texture(binding);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skatepark_scene::{LightKind, Sampling, TextureId};

    #[test]
    fn ground_lies_flat() {
        let mut scene = SceneGraph::new();
        let env = Environment::build(&mut scene);
        let world = scene.world_matrix(env.ground).unwrap();
        let normal = world.transform_vector3(Vec3::Z);
        assert!((normal - Vec3::Y).length() < 1e-5);
        let material = scene.material(env.ground_material).unwrap();
        assert!(material.unlit);
        assert_eq!(material.slot, Some(MaterialSlot::Ground));
    }

    #[test]
    fn scene_lights() {
        let mut scene = SceneGraph::new();
        let env = Environment::build(&mut scene);
        let ambient = scene.light(env.ambient).unwrap();
        assert_eq!(ambient.kind, LightKind::Ambient);
        assert_eq!(ambient.intensity, 0.5);
        assert_eq!(
            scene.world_position(env.directional).unwrap(),
            Vec3::new(0.0, 50.0, 0.0)
        );
    }

    #[test]
    fn glow_follows_its_body() {
        let mut scene = SceneGraph::new();
        let env = Environment::build(&mut scene);
        let lighting = Lighting::at(0.25);
        env.apply_lighting(&mut scene, &lighting);
        let sun = scene.world_position(env.sun.node).unwrap();
        let glow = scene.world_position(env.sun.glow).unwrap();
        assert!((sun - lighting.sun_position).length() < 1e-4);
        assert!((sun - glow).length() < 1e-4);
        let moon = scene.world_position(env.moon.node).unwrap();
        assert!((moon + sun).length() < 1e-3);
    }

    #[test]
    fn opacities_follow_lighting() {
        let mut scene = SceneGraph::new();
        let env = Environment::build(&mut scene);
        let lighting = Lighting::at(0.75);
        env.apply_lighting(&mut scene, &lighting);
        assert_eq!(scene.material(env.sun.material).unwrap().opacity, 0.0);
        assert_eq!(scene.material(env.moon.material).unwrap().opacity, lighting.moon);
        assert_eq!(
            scene.material(env.moon.glow_material).unwrap().opacity,
            lighting.moon_glow
        );
    }

    #[test]
    fn ground_texture_binds() {
        let mut scene = SceneGraph::new();
        let env = Environment::build(&mut scene);
        let binding = TextureBinding {
            texture: TextureId(3),
            sampling: Sampling::repeat(10.0, 100.0),
        };
        assert!(env.set_ground_texture(&mut scene, binding));
        assert_eq!(scene.material(env.ground_material).unwrap().texture, Some(binding));
    }

    #[test]
    fn axes_segments() {
        let axes = AxesHelper {
            origin: Vec3::new(0.0, 2.0, 0.0),
            length: 5.0,
        };
        let [x, y, _] = axes.segments();
        assert_eq!(x.1, Vec3::new(5.0, 2.0, 0.0));
        assert_eq!(y.1, Vec3::new(0.0, 7.0, 0.0));
        assert_eq!(x.2, 0xff0000);
    }
}
