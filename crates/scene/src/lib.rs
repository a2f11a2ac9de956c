//! Scene graph: an arena of transform nodes with attached meshes and lights.
//!
//! Nodes reference each other by [`NodeId`] index, never by pointer. A node's
//! parent is always inserted before it, so a single forward pass over the
//! arena resolves world transforms.
//!
//! # Invariants
//! - The graph is a tree rooted at [`SceneGraph::root`]; nodes are never removed.
//! - `parent.index() < child.index()` for every edge.
//! - Material mutations bump [`Material::version`] so renderers can refresh.

mod graph;
mod light;
mod material;
mod mesh;

pub use graph::{MeshInstance, Node, NodeId, NodeKind, SceneGraph};
pub use light::{Light, LightKind, ShadowSettings};
pub use material::{
    hex_color, Material, MaterialHandle, Sampling, TextureBinding, TextureId, WrapMode,
};
pub use mesh::{MeshData, MeshHandle};
