use crate::light::Light;
use crate::material::{Material, MaterialHandle};
use crate::mesh::{MeshData, MeshHandle};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use skatepark_common::Transform;

/// Index of a node in the scene arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A mesh drawn at a node's world transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshInstance {
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl MeshInstance {
    pub fn new(mesh: MeshHandle, material: MaterialHandle) -> Self {
        Self {
            mesh,
            material,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    pub fn with_shadows(mut self) -> Self {
        self.cast_shadow = true;
        self.receive_shadow = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Group,
    Mesh(MeshInstance),
    Light(Light),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub transform: Transform,
    pub visible: bool,
    pub kind: NodeKind,
}

/// Arena of scene nodes plus the mesh and material tables they reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    meshes: Vec<MeshData>,
    materials: Vec<Material>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph holding only the root group.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                name: "scene".into(),
                parent: None,
                children: Vec::new(),
                transform: Transform::default(),
                visible: true,
                kind: NodeKind::Group,
            }],
            meshes: Vec::new(),
            materials: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    fn insert(
        &mut self,
        parent: NodeId,
        name: &str,
        transform: Transform,
        kind: NodeKind,
    ) -> NodeId {
        // A dangling parent falls back to the root so the tree stays connected.
        let parent = if parent.index() < self.nodes.len() {
            parent
        } else {
            tracing::warn!(?parent, name, "unknown parent, attaching to root");
            self.root()
        };
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            name: name.into(),
            parent: Some(parent),
            children: Vec::new(),
            transform,
            visible: true,
            kind,
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    pub fn add_group(&mut self, parent: NodeId, name: &str, transform: Transform) -> NodeId {
        self.insert(parent, name, transform, NodeKind::Group)
    }

    pub fn add_mesh(
        &mut self,
        parent: NodeId,
        name: &str,
        transform: Transform,
        instance: MeshInstance,
    ) -> NodeId {
        self.insert(parent, name, transform, NodeKind::Mesh(instance))
    }

    pub fn add_light(
        &mut self,
        parent: NodeId,
        name: &str,
        transform: Transform,
        light: Light,
    ) -> NodeId {
        self.insert(parent, name, transform, NodeKind::Light(light))
    }

    pub fn add_mesh_data(&mut self, mesh: MeshData) -> MeshHandle {
        let handle = MeshHandle(self.meshes.len() as u32);
        self.meshes.push(mesh);
        handle
    }

    pub fn add_material(&mut self, material: Material) -> MaterialHandle {
        let handle = MaterialHandle(self.materials.len() as u32);
        self.materials.push(material);
        handle
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn transform(&self, id: NodeId) -> Option<&Transform> {
        self.get(id).map(|n| &n.transform)
    }

    /// Replace a node's local transform. Returns false for unknown ids.
    pub fn set_transform(&mut self, id: NodeId, transform: Transform) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.transform = transform;
                true
            }
            None => false,
        }
    }

    pub fn set_position(&mut self, id: NodeId, position: Vec3) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.transform.position = position;
                true
            }
            None => false,
        }
    }

    /// Replace a node's rotation with XYZ Euler angles.
    pub fn set_euler(&mut self, id: NodeId, euler: Vec3) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.transform.set_euler(euler);
                true
            }
            None => false,
        }
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn light(&self, id: NodeId) -> Option<&Light> {
        match &self.get(id)?.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn light_mut(&mut self, id: NodeId) -> Option<&mut Light> {
        match &mut self.get_mut(id)?.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn mesh_instance(&self, id: NodeId) -> Option<&MeshInstance> {
        match &self.get(id)?.kind {
            NodeKind::Mesh(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&MeshData> {
        self.meshes.get(handle.0 as usize)
    }

    pub fn meshes(&self) -> impl Iterator<Item = (MeshHandle, &MeshData)> {
        self.meshes
            .iter()
            .enumerate()
            .map(|(i, m)| (MeshHandle(i as u32), m))
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle.0 as usize)
    }

    pub fn material_mut(&mut self, handle: MaterialHandle) -> Option<&mut Material> {
        self.materials.get_mut(handle.0 as usize)
    }

    pub fn materials(&self) -> impl Iterator<Item = (MaterialHandle, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(i, m)| (MaterialHandle(i as u32), m))
    }

    /// First node with the given name, in insertion order.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .map(|i| NodeId(i as u32))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    /// World matrix of every node, indexed like the arena.
    pub fn world_matrices(&self) -> Vec<Mat4> {
        let mut world: Vec<Mat4> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let local = node.transform.matrix();
            let matrix = match node.parent {
                Some(parent) => world[parent.index()] * local,
                None => local,
            };
            world.push(matrix);
        }
        world
    }

    /// Effective visibility of every node: hidden ancestors hide descendants.
    pub fn world_visibility(&self) -> Vec<bool> {
        let mut visible: Vec<bool> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let parent_visible = node.parent.is_none_or(|p| visible[p.index()]);
            visible.push(parent_visible && node.visible);
        }
        visible
    }

    /// World matrix of one node, walking its ancestor chain.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.get(id)?;
        let mut matrix = node.transform.matrix();
        while let Some(parent) = node.parent {
            node = self.get(parent)?;
            matrix = node.transform.matrix() * matrix;
        }
        Some(matrix)
    }

    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world_matrix(id)
            .map(|m| m.transform_point3(Vec3::ZERO))
    }

    /// Light nodes with their world matrices.
    pub fn lights<'a>(
        &'a self,
        world: &'a [Mat4],
    ) -> impl Iterator<Item = (NodeId, &'a Light, Mat4)> + 'a {
        self.iter().filter_map(move |(id, node)| match &node.kind {
            NodeKind::Light(light) => Some((id, light, world[id.index()])),
            _ => None,
        })
    }

    /// Mesh nodes with their world matrices.
    pub fn mesh_nodes<'a>(
        &'a self,
        world: &'a [Mat4],
    ) -> impl Iterator<Item = (NodeId, &'a MeshInstance, Mat4)> + 'a {
        self.iter().filter_map(move |(id, node)| match &node.kind {
            NodeKind::Mesh(instance) => Some((id, instance, world[id.index()])),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn new_graph_has_root() {
        let g = SceneGraph::new();
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.get(g.root()).unwrap().name, "scene");
        assert!(g.get(g.root()).unwrap().parent.is_none());
    }

    #[test]
    fn children_are_linked_both_ways() {
        let mut g = SceneGraph::new();
        let root = g.root();
        let a = g.add_group(root, "a", Transform::default());
        let b = g.add_group(a, "b", Transform::default());
        assert_eq!(g.get(b).unwrap().parent, Some(a));
        assert_eq!(g.get(a).unwrap().children, vec![b]);
        assert!(a.index() < b.index());
    }

    #[test]
    fn unknown_parent_attaches_to_root() {
        let mut g = SceneGraph::new();
        let id = g.add_group(NodeId(99), "orphan", Transform::default());
        assert_eq!(g.get(id).unwrap().parent, Some(g.root()));
    }

    #[test]
    fn world_matrix_composes_parents() {
        let mut g = SceneGraph::new();
        let root = g.root();
        let parent = g.add_group(
            root,
            "parent",
            Transform {
                position: Vec3::new(1.0, 0.0, 0.0),
                rotation: Quat::from_rotation_y(FRAC_PI_2),
                scale: Vec3::ONE,
            },
        );
        let child = g.add_group(parent, "child", Transform::from_position(Vec3::new(0.0, 0.0, 1.0)));
        // +Z rotated a quarter turn about Y lands on +X.
        let p = g.world_position(child).unwrap();
        assert!(approx(p, Vec3::new(2.0, 0.0, 0.0)));

        let all = g.world_matrices();
        let q = all[child.index()].transform_point3(Vec3::ZERO);
        assert!(approx(p, q));
    }

    #[test]
    fn setters_report_unknown_ids() {
        let mut g = SceneGraph::new();
        assert!(!g.set_position(NodeId(5), Vec3::ONE));
        assert!(!g.set_euler(NodeId(5), Vec3::ONE));
        assert!(g.set_position(g.root(), Vec3::ONE));
        assert_eq!(g.transform(g.root()).unwrap().position, Vec3::ONE);
    }

    #[test]
    fn hidden_parent_hides_children() {
        let mut g = SceneGraph::new();
        let root = g.root();
        let a = g.add_group(root, "a", Transform::default());
        let b = g.add_group(a, "b", Transform::default());
        g.set_visible(a, false);
        let vis = g.world_visibility();
        assert!(vis[root.index()]);
        assert!(!vis[a.index()]);
        assert!(!vis[b.index()]);
    }

    #[test]
    fn lights_and_meshes_are_enumerated() {
        let mut g = SceneGraph::new();
        let root = g.root();
        let mesh = g.add_mesh_data(MeshData::cuboid("box", 1.0, 1.0, 1.0, [1, 1, 1]));
        let material = g.add_material(Material::standard("box", 0xffffff));
        g.add_mesh(root, "box", Transform::default(), MeshInstance::new(mesh, material));
        g.add_light(root, "sun", Transform::default(), Light::directional(0xffffff, 1.0));
        let world = g.world_matrices();
        assert_eq!(g.lights(&world).count(), 1);
        assert_eq!(g.mesh_nodes(&world).count(), 1);
        assert_eq!(g.find_by_name("sun").map(|id| id.index()), Some(2));
        assert!(g.light(NodeId(2)).is_some());
        assert!(g.light(NodeId(1)).is_none());
    }
}
