//! Procedural skateboard assembled into a scene graph.
//!
//! The board owns only [`NodeId`]s and [`MaterialHandle`]s; all transforms live
//! in the [`SceneGraph`] passed to each operation.
//!
//! # Invariants
//! - Wheel roll is always `π/2 + wheel_rotation`.
//! - Front truck yaw is `+truck_angle`, back truck yaw is `-truck_angle`.

pub mod deck;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use skatepark_common::{MaterialSlot, Transform};
use skatepark_scene::{
    Light, Material, MaterialHandle, MeshData, MeshInstance, NodeId, SceneGraph, ShadowSettings,
    TextureBinding,
};
use std::f32::consts::FRAC_PI_2;

pub use deck::{concave_offset, deck_mesh, kick_offset};

const TRUCK_X: f32 = 0.7;
const WHEEL_Y: f32 = -0.05;
const WHEEL_Z: f32 = 0.22;
const WHEEL_RADIUS: f32 = 0.08;
const WHEEL_WIDTH: f32 = 0.06;

/// Scalar state re-applied to the wheel and truck transforms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    pub wheel_rotation: f32,
    pub truck_angle: f32,
}

/// Node ids of one truck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Truck {
    pub baseplate: NodeId,
    pub hanger: NodeId,
    pub axle: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardMaterials {
    pub deck: MaterialHandle,
    pub metal: MaterialHandle,
    pub wheels: MaterialHandle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skateboard {
    root: NodeId,
    deck: NodeId,
    front: Truck,
    back: Truck,
    /// Front-left, front-right, back-left, back-right.
    wheels: [NodeId; 4],
    underglow: NodeId,
    materials: BoardMaterials,
    state: BoardState,
}

impl Skateboard {
    /// Build the board under `parent` with its group at `transform`.
    pub fn build(scene: &mut SceneGraph, parent: NodeId, transform: Transform) -> Self {
        let materials = BoardMaterials {
            deck: scene.add_material(
                Material::standard("deck", 0xd4b885)
                    .with_slot(MaterialSlot::Deck)
                    .with_surface(0.7, 0.0),
            ),
            metal: scene.add_material(
                Material::standard("metal", 0x888888)
                    .with_slot(MaterialSlot::Metal)
                    .with_surface(0.3, 0.8),
            ),
            wheels: scene.add_material(
                Material::standard("wheels", 0xf0f0f0)
                    .with_slot(MaterialSlot::Wheels)
                    .with_surface(0.5, 0.1),
            ),
        };

        let root = scene.add_group(parent, "skateboard", transform);

        let deck_mesh = scene.add_mesh_data(deck_mesh());
        let deck = scene.add_mesh(
            root,
            "deck",
            Transform::from_position_euler(Vec3::new(0.0, 0.1, 0.0), Vec3::new(0.0, FRAC_PI_2, 0.0)),
            MeshInstance::new(deck_mesh, materials.deck).with_shadows(),
        );

        let baseplate_mesh = scene.add_mesh_data(MeshData::cuboid("baseplate", 0.25, 0.05, 0.15, [1, 1, 1]));
        let hanger_mesh = scene.add_mesh_data(MeshData::cuboid("hanger", 0.15, 0.12, 0.4, [1, 1, 1]));
        let axle_mesh = scene.add_mesh_data(MeshData::cylinder("axle", 0.02, 0.02, 0.5, 8));
        let truck = |scene: &mut SceneGraph, name: &str, x: f32| {
            let metal = MeshInstance::new(baseplate_mesh, materials.metal);
            Truck {
                baseplate: scene.add_mesh(
                    root,
                    &format!("{name}_baseplate"),
                    Transform::from_position(Vec3::new(x, 0.08, 0.0)),
                    metal,
                ),
                hanger: scene.add_mesh(
                    root,
                    &format!("{name}_hanger"),
                    Transform::from_position(Vec3::new(x, 0.0, 0.0)),
                    MeshInstance { mesh: hanger_mesh, ..metal },
                ),
                axle: scene.add_mesh(
                    root,
                    &format!("{name}_axle"),
                    Transform::from_position_euler(Vec3::new(x, 0.0, 0.0), Vec3::new(0.0, 0.0, FRAC_PI_2)),
                    MeshInstance { mesh: axle_mesh, ..metal },
                ),
            }
        };
        let front = truck(scene, "front", TRUCK_X);
        let back = truck(scene, "back", -TRUCK_X);

        let wheel_mesh = scene.add_mesh_data(MeshData::cylinder(
            "wheel",
            WHEEL_RADIUS,
            WHEEL_RADIUS,
            WHEEL_WIDTH,
            16,
        ));
        let wheels = [
            ("wheel_front_left", TRUCK_X, WHEEL_Z),
            ("wheel_front_right", TRUCK_X, -WHEEL_Z),
            ("wheel_back_left", -TRUCK_X, WHEEL_Z),
            ("wheel_back_right", -TRUCK_X, -WHEEL_Z),
        ]
        .map(|(name, x, z)| {
            scene.add_mesh(
                root,
                name,
                Transform::from_position_euler(Vec3::new(x, WHEEL_Y, z), Vec3::new(0.0, 0.0, FRAC_PI_2)),
                MeshInstance::new(wheel_mesh, materials.wheels),
            )
        });

        let underglow = scene.add_light(
            root,
            "underglow",
            Transform::from_position(Vec3::new(0.0, -0.2, 0.0)),
            Light::point(0x0066ff, 2.0, 3.0).with_shadow(ShadowSettings::new(512, 0.1, 4.0)),
        );

        tracing::debug!(nodes = scene.node_count(), "skateboard built");

        Self {
            root,
            deck,
            front,
            back,
            wheels,
            underglow,
            materials,
            state: BoardState::default(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn deck(&self) -> NodeId {
        self.deck
    }

    pub fn front_truck(&self) -> Truck {
        self.front
    }

    pub fn back_truck(&self) -> Truck {
        self.back
    }

    pub fn wheels(&self) -> [NodeId; 4] {
        self.wheels
    }

    pub fn underglow(&self) -> NodeId {
        self.underglow
    }

    pub fn materials(&self) -> BoardMaterials {
        self.materials
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    /// Spin the wheels by `speed * dt`.
    pub fn update(&mut self, scene: &mut SceneGraph, dt: f32, speed: f32) {
        self.state.wheel_rotation += speed * dt;
        let roll = FRAC_PI_2 + self.state.wheel_rotation;
        for wheel in self.wheels {
            scene.set_euler(wheel, Vec3::new(0.0, 0.0, roll));
        }
    }

    /// Yaw the trucks symmetrically. Cosmetic only.
    pub fn turn(&mut self, scene: &mut SceneGraph, angle: f32) {
        self.state.truck_angle = angle;
        for (truck, yaw) in [(self.front, angle), (self.back, -angle)] {
            scene.set_euler(truck.hanger, Vec3::new(0.0, yaw, 0.0));
            scene.set_euler(truck.axle, Vec3::new(0.0, yaw, FRAC_PI_2));
        }
    }

    /// Bind a surface image to the deck, metal or wheel material.
    ///
    /// Returns false, without touching any material, for other slots.
    pub fn set_texture(
        &self,
        scene: &mut SceneGraph,
        slot: MaterialSlot,
        binding: TextureBinding,
    ) -> bool {
        let handle = match slot {
            MaterialSlot::Deck => self.materials.deck,
            MaterialSlot::Metal => self.materials.metal,
            MaterialSlot::Wheels => self.materials.wheels,
            _ => return false,
        };
        match scene.material_mut(handle) {
            Some(material) => {
                material.set_texture(binding);
                tracing::debug!(slot = %slot, "skateboard texture bound");
                true
            }
            None => false,
        }
    }
}
