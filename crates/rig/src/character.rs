use crate::animation::AnimationState;
use crate::joint::{JointId, Side, Skeleton};
use crate::pose::{IdlePose, PoseTarget};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use skatepark_board::Skateboard;
use skatepark_common::{GameConfig, MaterialSlot, Transform};
use skatepark_physics::Physics;
use skatepark_scene::{
    Light, Material, MaterialHandle, MeshData, MeshHandle, MeshInstance, NodeId, SceneGraph,
    ShadowSettings, TextureBinding,
};
use std::f32::consts::{FRAC_PI_3, FRAC_PI_4, FRAC_PI_8};

/// Height the character is dropped from.
pub const SPAWN_HEIGHT: f32 = 3.2;
/// Yaw of the character root. Turning does not change it.
pub const HEADING: f32 = 3.0 * std::f32::consts::FRAC_PI_2;
const BOARD_OFFSET: f32 = -0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterMaterials {
    pub head: MaterialHandle,
    pub torso: MaterialHandle,
    pub arms: MaterialHandle,
    pub legs: MaterialHandle,
    pub feet: MaterialHandle,
    pub cross: MaterialHandle,
    pub hat: MaterialHandle,
}

impl CharacterMaterials {
    fn for_slot(&self, slot: MaterialSlot) -> Option<MaterialHandle> {
        match slot {
            MaterialSlot::Head => Some(self.head),
            MaterialSlot::Torso => Some(self.torso),
            MaterialSlot::Arms => Some(self.arms),
            MaterialSlot::Legs => Some(self.legs),
            MaterialSlot::Feet => Some(self.feet),
            MaterialSlot::Cross => Some(self.cross),
            _ => None,
        }
    }
}

/// Mesh nodes of the body. Paired limbs are `[left, right]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyParts {
    pub head: NodeId,
    pub torso: NodeId,
    pub upper_arms: [NodeId; 2],
    pub lower_arms: [NodeId; 2],
    pub upper_legs: [NodeId; 2],
    pub lower_legs: [NodeId; 2],
    pub feet: [NodeId; 2],
    pub cross: NodeId,
    pub hat: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterLights {
    pub head_corners: [NodeId; 4],
    pub hat_glow: NodeId,
    pub hat_corners: [NodeId; 4],
    pub hat_spot: NodeId,
    pub torso_spot: NodeId,
    /// Warm fill light driven by the time of day.
    pub character: NodeId,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterState {
    pub is_jumping: bool,
    pub is_turning: bool,
    /// Wheel spin rate for the current frame, reset after each update.
    pub speed: f32,
    pub animation: AnimationState,
    pub animation_time: f32,
}

/// The skater: joint tree, body meshes, light fixtures, board and physics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    root: NodeId,
    skeleton: Skeleton,
    parts: BodyParts,
    lights: CharacterLights,
    materials: CharacterMaterials,
    skateboard: Skateboard,
    physics: Physics,
    move_force: f32,
    state: CharacterState,
}

fn corners(half: f32) -> [(f32, f32); 4] {
    [(half, half), (-half, half), (-half, -half), (half, -half)]
}

fn shadow(far: f32) -> ShadowSettings {
    ShadowSettings::new(512, 0.1, far)
}

impl Character {
    /// Build the character under `parent`.
    pub fn build(scene: &mut SceneGraph, parent: NodeId, config: &GameConfig) -> Self {
        let materials = CharacterMaterials {
            head: scene.add_material(Material::standard("head", 0xffffff).with_slot(MaterialSlot::Head)),
            torso: scene.add_material(
                Material::standard("torso", 0xffffff)
                    .with_slot(MaterialSlot::Torso)
                    .with_emissive(0xff69b4, 0.1),
            ),
            arms: scene.add_material(Material::standard("arms", 0xffffff).with_slot(MaterialSlot::Arms)),
            legs: scene.add_material(Material::standard("legs", 0xffffff).with_slot(MaterialSlot::Legs)),
            feet: scene.add_material(Material::standard("feet", 0xffffff).with_slot(MaterialSlot::Feet)),
            cross: scene.add_material(
                Material::standard("cross", 0xffff00)
                    .with_slot(MaterialSlot::Cross)
                    .with_emissive(0xffff00, 0.5),
            ),
            hat: scene.add_material(
                Material::standard("gold", 0xffd700)
                    .with_surface(0.2, 0.8)
                    .with_emissive(0xffd700, 0.2),
            ),
        };

        let root = scene.add_group(
            parent,
            "character",
            Transform::from_position_euler(
                Vec3::new(0.0, SPAWN_HEIGHT, 0.0),
                Vec3::new(0.0, HEADING, 0.0),
            ),
        );

        let skateboard = Skateboard::build(
            scene,
            root,
            Transform::from_position(Vec3::new(0.0, BOARD_OFFSET, 0.0)),
        );

        let skeleton = Skeleton::from_fn(|joint, built| {
            let parent = Skeleton::parent_in(joint, built).unwrap_or(root);
            scene.add_group(
                parent,
                joint.name(),
                Transform::from_position_euler(joint.rest_position(), joint.rest_euler()),
            )
        });

        let mut boxes = BoxCache::default();
        let spine = skeleton.node(JointId::Spine);

        let head = boxes.part(scene, spine, "head", [1.0, 1.0, 1.0], 2.5, materials.head);
        let torso = boxes.part(scene, spine, "torso", [1.0, 1.5, 0.5], 1.5, materials.torso);

        let mut limbs = |joint: fn(Side) -> JointId,
                         name: &str,
                         size: [f32; 3],
                         drop: f32,
                         material: MaterialHandle| {
            [Side::Left, Side::Right].map(|side| {
                let label = format!("{}_{name}", side_name(side));
                boxes.part(scene, skeleton.node(joint(side)), &label, size, -drop, material)
            })
        };
        let upper_arms = limbs(JointId::Shoulder, "upper_arm", [0.3, 0.6, 0.3], 0.3, materials.arms);
        let lower_arms = limbs(JointId::Elbow, "lower_arm", [0.25, 0.6, 0.25], 0.3, materials.arms);
        let upper_legs = limbs(JointId::Hip, "upper_leg", [0.35, 0.7, 0.35], 0.35, materials.legs);
        let lower_legs = limbs(JointId::Knee, "lower_leg", [0.3, 0.7, 0.3], 0.35, materials.legs);

        let rest = IdlePose::at(0.0);
        let foot_mesh = boxes.mesh(scene, [0.35, 0.25, 0.45]);
        let feet = [Side::Left, Side::Right].map(|side| {
            let i = side_index(side);
            scene.add_mesh(
                root,
                &format!("{}_foot", side_name(side)),
                Transform::from_position_euler(rest.feet[i].position, rest.feet[i].euler),
                MeshInstance::new(foot_mesh, materials.feet).with_shadows(),
            )
        });

        let cross = scene.add_group(head, "cross", Transform::from_position(Vec3::new(0.0, 0.65, 0.0)));
        boxes.part(scene, cross, "cross_vertical", [0.1, 0.4, 0.1], 0.15, materials.cross);
        boxes.part(scene, cross, "cross_bar", [0.3, 0.1, 0.1], 0.25, materials.cross);

        let hat_mesh = scene.add_mesh_data(MeshData::cone("pyramid_hat", 1.0, 0.2, 4));
        let hat = scene.add_mesh(
            head,
            "pyramid_hat",
            Transform::from_position_euler(Vec3::new(0.0, 0.55, 0.0), Vec3::new(0.0, FRAC_PI_4, 0.0)),
            MeshInstance::new(hat_mesh, materials.hat).with_shadows(),
        );

        let head_corners = corners(0.5).map(|(x, z)| {
            scene.add_light(
                head,
                "head_corner_light",
                Transform::from_position(Vec3::new(x, -0.5, z)),
                Light::point(0x00ffff, 0.5, 4.0).with_shadow(shadow(5.0)),
            )
        });
        let hat_glow = scene.add_light(
            hat,
            "hat_light",
            Transform::from_position(Vec3::new(0.0, -0.05, 0.0)),
            Light::point(0xffff00, 1.0, 5.0).with_shadow(shadow(6.0)),
        );
        let hat_corners = corners(0.7).map(|(x, z)| {
            scene.add_light(
                hat,
                "hat_corner_light",
                Transform::from_position(Vec3::new(x, -0.1, z)),
                Light::point(0x00ff00, 0.5, 4.0).with_shadow(shadow(5.0)),
            )
        });
        let hat_spot = scene.add_light(
            hat,
            "hat_spot_light",
            Transform::from_position(Vec3::new(0.0, -0.2, 0.0)),
            Light::spot(0x00ff00, 1.0, FRAC_PI_3, 0.5, 4.0)
                .aimed_at(hat)
                .with_shadow(shadow(5.0)),
        );
        let torso_spot = scene.add_light(
            torso,
            "torso_spot_light",
            Transform::from_position(Vec3::new(0.0, -0.75, 0.0)),
            Light::spot(0xff0000, 2.0, FRAC_PI_4, 0.5, 4.0)
                .aimed_at(skateboard.root())
                .with_shadow(shadow(5.0)),
        );
        let character_light = scene.add_light(
            root,
            "character_light",
            Transform::from_position(Vec3::new(0.0, 1.5, 0.0)),
            Light::point(0xffffaa, 0.0, 5.0).with_shadow(ShadowSettings::new(512, 0.5, 500.0)),
        );

        tracing::info!(nodes = scene.node_count(), "character built");

        Self {
            root,
            skeleton,
            parts: BodyParts {
                head,
                torso,
                upper_arms,
                lower_arms,
                upper_legs,
                lower_legs,
                feet,
                cross,
                hat,
            },
            lights: CharacterLights {
                head_corners,
                hat_glow,
                hat_corners,
                hat_spot,
                torso_spot,
                character: character_light,
            },
            materials,
            skateboard,
            physics: Physics::new(config.physics.clone()),
            move_force: config.controls.move_force,
            state: CharacterState::default(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn parts(&self) -> &BodyParts {
        &self.parts
    }

    pub fn lights(&self) -> &CharacterLights {
        &self.lights
    }

    pub fn materials(&self) -> &CharacterMaterials {
        &self.materials
    }

    pub fn skateboard(&self) -> &Skateboard {
        &self.skateboard
    }

    pub fn physics(&self) -> &Physics {
        &self.physics
    }

    pub fn state(&self) -> &CharacterState {
        &self.state
    }

    pub fn heading(&self) -> f32 {
        HEADING
    }

    pub fn position(&self, scene: &SceneGraph) -> Vec3 {
        scene
            .transform(self.root)
            .map(|t| t.position)
            .unwrap_or_default()
    }

    pub fn set_animation(&mut self, animation: AnimationState) {
        if self.state.animation != animation {
            tracing::debug!(from = %self.state.animation, to = %animation, "animation changed");
            self.state.animation = animation;
        }
    }

    /// Advance physics, animation and the board by one frame.
    pub fn update(&mut self, scene: &mut SceneGraph, dt: f32) {
        let mut position = self.position(scene);
        self.physics.update(dt, &mut position);
        scene.set_position(self.root, position);

        let grounded = self.physics.is_grounded();
        if grounded {
            self.state.is_jumping = false;
        }

        self.state.animation_time += dt;
        match self.state.animation {
            AnimationState::Idle => {
                if grounded {
                    self.apply_idle(scene);
                    // The idle clock runs at double rate while grounded.
                    self.state.animation_time += dt;
                }
            }
            AnimationState::Trick(trick) => trick.update(dt),
        }

        self.skateboard.update(scene, dt, self.state.speed);
        self.state.speed = 0.0;
        self.state.is_turning = false;
    }

    fn apply_idle(&self, scene: &mut SceneGraph) {
        let pose = IdlePose::at(self.state.animation_time);
        let apply = |scene: &mut SceneGraph, node: NodeId, target: PoseTarget| {
            scene.set_position(node, target.position);
            scene.set_euler(node, target.euler);
        };
        for (joint, node) in self.skeleton.iter() {
            apply(scene, node, pose.joint(joint));
        }
        for (node, target) in self.parts.feet.into_iter().zip(pose.feet) {
            apply(scene, node, target);
        }
        scene.set_euler(self.parts.head, Vec3::new(pose.head_pitch, 0.0, 0.0));
    }

    /// Yaw the trucks by `direction * π/8`.
    pub fn turn(&mut self, scene: &mut SceneGraph, direction: f32) {
        self.state.is_turning = true;
        self.skateboard.turn(scene, direction * FRAC_PI_8);
    }

    pub fn jump(&mut self) {
        self.physics.jump();
        self.state.is_jumping = true;
    }

    /// Slide along `direction` (Y ignored) with the configured force.
    pub fn move_by(&mut self, scene: &mut SceneGraph, direction: Vec3) {
        let mut position = self.position(scene);
        self.physics.move_by(&mut position, direction, self.move_force);
        scene.set_position(self.root, position);
        self.state.speed = self.move_force;
    }

    /// Bind a surface image by slot name. Unknown names change nothing.
    pub fn set_texture_named(
        &mut self,
        scene: &mut SceneGraph,
        name: &str,
        binding: TextureBinding,
    ) -> bool {
        match MaterialSlot::from_name(name) {
            Some(slot) => self.set_texture(scene, slot, binding),
            None => {
                tracing::debug!(name, "ignoring texture for unknown slot");
                false
            }
        }
    }

    /// Bind a surface image to a character or board slot.
    ///
    /// Returns false, without touching any material, for other slots.
    pub fn set_texture(
        &mut self,
        scene: &mut SceneGraph,
        slot: MaterialSlot,
        binding: TextureBinding,
    ) -> bool {
        if slot.is_skateboard() {
            return self.skateboard.set_texture(scene, slot, binding);
        }
        let Some(handle) = self.materials.for_slot(slot) else {
            return false;
        };
        match scene.material_mut(handle) {
            Some(material) => {
                material.set_texture(binding);
                tracing::debug!(slot = %slot, "character texture bound");
                true
            }
            None => false,
        }
    }

    pub fn set_light_intensity(&self, scene: &mut SceneGraph, intensity: f32) {
        if let Some(light) = scene.light_mut(self.lights.character) {
            light.intensity = intensity;
        }
    }
}

fn side_name(side: Side) -> &'static str {
    match side {
        Side::Left => "left",
        Side::Right => "right",
    }
}

fn side_index(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Right => 1,
    }
}

/// Shares one box mesh between parts of equal size.
#[derive(Default)]
struct BoxCache {
    meshes: Vec<([f32; 3], MeshHandle)>,
}

impl BoxCache {
    fn mesh(&mut self, scene: &mut SceneGraph, size: [f32; 3]) -> MeshHandle {
        if let Some((_, handle)) = self.meshes.iter().find(|(s, _)| *s == size) {
            return *handle;
        }
        let [w, h, d] = size;
        let handle = scene.add_mesh_data(MeshData::cuboid("box", w, h, d, [1, 1, 1]));
        self.meshes.push((size, handle));
        handle
    }

    /// Box mesh node hung `y` along its parent's Y axis.
    fn part(
        &mut self,
        scene: &mut SceneGraph,
        parent: NodeId,
        name: &str,
        size: [f32; 3],
        y: f32,
        material: MaterialHandle,
    ) -> NodeId {
        let mesh = self.mesh(scene, size);
        scene.add_mesh(
            parent,
            name,
            Transform::from_position(Vec3::new(0.0, y, 0.0)),
            MeshInstance::new(mesh, material).with_shadows(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Trick;
    use glam::Quat;
    use skatepark_scene::{LightKind, Sampling, TextureId};

    const DT: f32 = 1.0 / 60.0;

    fn character() -> (SceneGraph, Character) {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let character = Character::build(&mut scene, root, &GameConfig::default());
        (scene, character)
    }

    /// `q` and `-q` are the same rotation.
    fn same_rotation(a: Quat, b: Quat) -> bool {
        a.dot(b).abs() > 1.0 - 1e-6
    }

    fn settle(scene: &mut SceneGraph, character: &mut Character) {
        for _ in 0..1000 {
            character.update(scene, DT);
            if character.physics().is_grounded() {
                return;
            }
        }
        panic!("character never landed");
    }

    fn binding(id: u64) -> TextureBinding {
        TextureBinding {
            texture: TextureId(id),
            sampling: Sampling::clamp(),
        }
    }

    fn versions(scene: &SceneGraph) -> Vec<u32> {
        scene.materials().map(|(_, m)| m.version).collect()
    }

    #[test]
    fn joint_tree_matches_hierarchy() {
        let (scene, character) = character();
        let skeleton = character.skeleton();
        for (joint, node) in skeleton.iter() {
            let parent = scene.get(node).unwrap().parent.unwrap();
            let expected = joint.parent().map_or(character.root(), |p| skeleton.node(p));
            assert_eq!(parent, expected, "{}", joint.name());
        }
    }

    #[test]
    fn spawns_above_ground_facing_heading() {
        let (scene, character) = character();
        let t = scene.transform(character.root()).unwrap();
        assert_eq!(t.position, Vec3::new(0.0, 3.2, 0.0));
        assert!(same_rotation(t.rotation, Quat::from_rotation_y(HEADING)));
        let board = scene.transform(character.skateboard().root()).unwrap();
        assert_eq!(board.position.y, -0.15);
    }

    #[test]
    fn lights_are_attached() {
        let (scene, character) = character();
        let lights = character.lights();
        let torso = scene.light(lights.torso_spot).unwrap();
        assert!(matches!(
            torso.kind,
            LightKind::Spot { target: Some(t), .. } if t == character.skateboard().root()
        ));
        assert_eq!(scene.light(lights.character).unwrap().intensity, 0.0);
        assert_eq!(scene.get(lights.hat_glow).unwrap().parent, Some(character.parts().hat));
        // 4 head + 1 hat + 4 hat corners + hat spot + torso spot + character + underglow
        let world = scene.world_matrices();
        assert_eq!(scene.lights(&world).count(), 13);
    }

    #[test]
    fn lands_at_ground_offset() {
        let (mut scene, mut character) = character();
        settle(&mut scene, &mut character);
        let offset = character.physics().ground_offset();
        assert_eq!(character.position(&scene).y, offset);
        assert_eq!(character.physics().velocity().y, 0.0);
    }

    #[test]
    fn animation_time_doubles_while_grounded_idle() {
        let (mut scene, mut character) = character();
        character.update(&mut scene, 0.25);
        assert!(!character.physics().is_grounded());
        assert_eq!(character.state().animation_time, 0.25);

        settle(&mut scene, &mut character);
        let t0 = character.state().animation_time;
        character.update(&mut scene, 0.25);
        character.update(&mut scene, 0.25);
        assert!((character.state().animation_time - (t0 + 1.0)).abs() < 1e-5);
    }

    #[test]
    fn trick_time_advances_once_per_update() {
        let (mut scene, mut character) = character();
        settle(&mut scene, &mut character);
        character.set_animation(AnimationState::Trick(Trick::Ollie));
        let t0 = character.state().animation_time;
        character.update(&mut scene, 0.25);
        assert!((character.state().animation_time - (t0 + 0.25)).abs() < 1e-6);
    }

    #[test]
    fn idle_pose_waits_for_ground() {
        let (mut scene, mut character) = character();
        let knee = character.skeleton().node(JointId::Knee(Side::Left));
        let before = *scene.transform(knee).unwrap();
        character.update(&mut scene, 0.5);
        assert!(!character.physics().is_grounded());
        assert_eq!(*scene.transform(knee).unwrap(), before);

        settle(&mut scene, &mut character);
        let t0 = character.state().animation_time;
        character.update(&mut scene, DT);
        // Sampled between the two increments.
        let expected = IdlePose::at(t0 + DT).joint(JointId::Knee(Side::Left));
        let actual = scene.transform(knee).unwrap();
        assert!((actual.position - expected.position).length() < 1e-6);
    }

    #[test]
    fn trick_state_leaves_pose_alone() {
        let (mut scene, mut character) = character();
        settle(&mut scene, &mut character);
        character.set_animation(AnimationState::Trick(Trick::Ollie));
        let spine = character.skeleton().node(JointId::Spine);
        let before = *scene.transform(spine).unwrap();
        character.update(&mut scene, 0.3);
        assert_eq!(*scene.transform(spine).unwrap(), before);
    }

    #[test]
    fn jump_then_land() {
        let (mut scene, mut character) = character();
        settle(&mut scene, &mut character);
        character.jump();
        assert!(character.state().is_jumping);
        character.update(&mut scene, DT);
        assert!(!character.physics().is_grounded());
        assert!(character.position(&scene).y > 0.35);
        settle(&mut scene, &mut character);
        assert!(!character.state().is_jumping);
    }

    #[test]
    fn turn_yaws_trucks_by_eighth_pi() {
        let (mut scene, mut character) = character();
        character.turn(&mut scene, 1.0);
        assert!(character.state().is_turning);
        let front = character.skateboard().front_truck().hanger;
        let back = character.skateboard().back_truck().hanger;
        let rot = |id| scene.transform(id).unwrap().rotation;
        assert!(same_rotation(rot(front), Quat::from_rotation_y(FRAC_PI_8)));
        assert!(same_rotation(rot(back), Quat::from_rotation_y(-FRAC_PI_8)));
        character.update(&mut scene, DT);
        assert!(!character.state().is_turning);
    }

    #[test]
    fn move_slides_and_spins_wheels() {
        let (mut scene, mut character) = character();
        character.move_by(&mut scene, Vec3::new(0.1, 5.0, 0.0));
        let p = character.position(&scene);
        assert!((p.x - 1.0).abs() < 1e-6);
        assert_eq!(p.y, 3.2);
        assert_eq!(character.state().speed, 10.0);
        character.update(&mut scene, 0.1);
        assert!((character.skateboard().state().wheel_rotation - 1.0).abs() < 1e-6);
        assert_eq!(character.state().speed, 0.0);
    }

    #[test]
    fn textures_route_by_slot() {
        let (mut scene, mut character) = character();
        assert!(character.set_texture(&mut scene, MaterialSlot::Head, binding(1)));
        let head = scene.material(character.materials().head).unwrap();
        assert_eq!(head.texture, Some(binding(1)));

        assert!(character.set_texture(&mut scene, MaterialSlot::Deck, binding(2)));
        let deck = scene
            .material(character.skateboard().materials().deck)
            .unwrap();
        assert_eq!(deck.texture, Some(binding(2)));
    }

    #[test]
    fn unknown_slot_is_noop() {
        let (mut scene, mut character) = character();
        let before = versions(&scene);
        assert!(!character.set_texture_named(&mut scene, "cape", binding(3)));
        assert!(!character.set_texture(&mut scene, MaterialSlot::Ground, binding(3)));
        assert_eq!(versions(&scene), before);
    }

    #[test]
    fn light_intensity_is_applied() {
        let (mut scene, character) = character();
        character.set_light_intensity(&mut scene, 0.7);
        assert_eq!(scene.light(character.lights().character).unwrap().intensity, 0.7);
    }
}
