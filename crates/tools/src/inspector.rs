use glam::Vec3;
use serde::Serialize;
use skatepark_rig::AnimationState;
use skatepark_scene::{NodeId, NodeKind};
use skatepark_sky::Phase;
use skatepark_stage::Stage;

/// Read-only queries against the stage for debugging and the inspector panel.
pub struct StageInspector;

impl StageInspector {
    /// Produce a summary of the stage.
    pub fn summary(stage: &Stage) -> StageSummary {
        let scene = stage.scene();
        let character = stage.character();
        let lighting = stage.lighting();
        StageSummary {
            frame: stage.stats().frame,
            time_of_day: lighting.time,
            phase: lighting.phase,
            character_position: stage.character_position(),
            velocity: character.physics().velocity(),
            grounded: character.physics().is_grounded(),
            animation: character.state().animation,
            node_count: scene.node_count(),
            mesh_count: scene.mesh_count(),
            material_count: scene.material_count(),
            texture_count: stage.textures().len(),
            pending_textures: stage.pending_textures(),
        }
    }

    /// Details of one scene node.
    pub fn inspect_node(stage: &Stage, id: NodeId) -> Option<NodeInfo> {
        let scene = stage.scene();
        let node = scene.get(id)?;
        let kind = match node.kind {
            NodeKind::Group => "group",
            NodeKind::Mesh(_) => "mesh",
            NodeKind::Light(_) => "light",
        };
        Some(NodeInfo {
            id,
            name: node.name.clone(),
            kind,
            local_position: node.transform.position,
            world_position: scene.world_position(id)?,
            children: node.children.len(),
            visible: node.visible,
        })
    }

    /// Find a node by name and inspect it.
    pub fn find(stage: &Stage, name: &str) -> Option<NodeInfo> {
        Self::inspect_node(stage, stage.scene().find_by_name(name)?)
    }
}

/// Snapshot of the stage for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct StageSummary {
    pub frame: u64,
    pub time_of_day: f32,
    pub phase: Phase,
    pub character_position: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
    pub animation: AnimationState,
    pub node_count: usize,
    pub mesh_count: usize,
    pub material_count: usize,
    pub texture_count: usize,
    pub pending_textures: usize,
}

impl std::fmt::Display for StageSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = self.character_position;
        write!(
            f,
            "Stage: frame={} time={:.3} ({}) pos=({:.2}, {:.2}, {:.2}) grounded={} animation={} nodes={} textures={}",
            self.frame,
            self.time_of_day,
            self.phase,
            p.x,
            p.y,
            p.z,
            self.grounded,
            self.animation,
            self.node_count,
            self.texture_count,
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeInfo {
    pub id: NodeId,
    pub name: String,
    pub kind: &'static str,
    pub local_position: Vec3,
    pub world_position: Vec3,
    pub children: usize,
    pub visible: bool,
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let w = self.world_position;
        write!(
            f,
            "Node #{} '{}' ({}) world=({:.2}, {:.2}, {:.2}) children={}",
            self.id.0, self.name, self.kind, w.x, w.y, w.z, self.children
        )
    }
}
