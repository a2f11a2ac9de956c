//! Jointed skater rig.
//!
//! The joint tree is built once into a [`SceneGraph`] and addressed by
//! [`NodeId`] afterwards; nothing holds live references into the graph.
//!
//! # Invariants
//! - Nine joints, each with a fixed parent (see [`JointId::parent`]).
//! - Every body part has exactly one parent node.
//! - The idle pose is a pure function of accumulated animation time and is
//!   only applied while the character is grounded.
//! - Trick states are placeholders; updating them does not move the rig.
//!
//! [`SceneGraph`]: skatepark_scene::SceneGraph
//! [`NodeId`]: skatepark_scene::NodeId

pub mod animation;
pub mod character;
pub mod joint;
pub mod pose;

pub use animation::{AnimationState, Trick};
pub use character::{BodyParts, Character, CharacterLights, CharacterMaterials, CharacterState};
pub use joint::{JointId, Side, Skeleton};
pub use pose::{IdlePose, PoseTarget};
