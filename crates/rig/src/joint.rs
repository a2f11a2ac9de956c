use glam::Vec3;
use serde::{Deserialize, Serialize};
use skatepark_scene::NodeId;

/// Rest positions of the skater's joints, relative to their parent.
pub const SPINE_REST: Vec3 = Vec3::new(0.0, 0.6, 0.0);
pub const SHOULDER_REST: Vec3 = Vec3::new(0.65, 1.95, 0.0);
pub const ELBOW_REST: Vec3 = Vec3::new(0.0, -0.6, 0.0);
pub const HIP_REST: Vec3 = Vec3::new(0.35, 0.95, 0.0);
pub const KNEE_REST: Vec3 = Vec3::new(0.0, -0.7, 0.0);

/// Arms roll slightly inward at rest.
pub const SHOULDER_REST_ROLL: f32 = 0.2;
pub const KNEE_REST_BEND: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// +1 for left, -1 for right. Left limbs sit on +X.
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JointId {
    Spine,
    Shoulder(Side),
    Elbow(Side),
    Hip(Side),
    Knee(Side),
}

impl JointId {
    /// Parent-before-child order.
    pub const ALL: [JointId; 9] = [
        JointId::Spine,
        JointId::Shoulder(Side::Left),
        JointId::Shoulder(Side::Right),
        JointId::Elbow(Side::Left),
        JointId::Elbow(Side::Right),
        JointId::Hip(Side::Left),
        JointId::Hip(Side::Right),
        JointId::Knee(Side::Left),
        JointId::Knee(Side::Right),
    ];

    /// `None` means the character's root group.
    pub fn parent(self) -> Option<JointId> {
        match self {
            JointId::Spine => None,
            JointId::Shoulder(_) | JointId::Hip(_) => Some(JointId::Spine),
            JointId::Elbow(side) => Some(JointId::Shoulder(side)),
            JointId::Knee(side) => Some(JointId::Hip(side)),
        }
    }

    pub fn rest_position(self) -> Vec3 {
        match self {
            JointId::Spine => SPINE_REST,
            JointId::Shoulder(side) => SHOULDER_REST * Vec3::new(side.sign(), 1.0, 1.0),
            JointId::Elbow(_) => ELBOW_REST,
            JointId::Hip(side) => HIP_REST * Vec3::new(side.sign(), 1.0, 1.0),
            JointId::Knee(_) => KNEE_REST,
        }
    }

    /// Rest rotation as XYZ Euler angles.
    pub fn rest_euler(self) -> Vec3 {
        match self {
            JointId::Shoulder(side) => Vec3::new(0.0, 0.0, SHOULDER_REST_ROLL * side.sign()),
            JointId::Knee(_) => Vec3::new(KNEE_REST_BEND, 0.0, 0.0),
            _ => Vec3::ZERO,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            JointId::Spine => "spine",
            JointId::Shoulder(Side::Left) => "left_shoulder",
            JointId::Shoulder(Side::Right) => "right_shoulder",
            JointId::Elbow(Side::Left) => "left_elbow",
            JointId::Elbow(Side::Right) => "right_elbow",
            JointId::Hip(Side::Left) => "left_hip",
            JointId::Hip(Side::Right) => "right_hip",
            JointId::Knee(Side::Left) => "left_knee",
            JointId::Knee(Side::Right) => "right_knee",
        }
    }

    fn slot(self) -> usize {
        match self {
            JointId::Spine => 0,
            JointId::Shoulder(Side::Left) => 1,
            JointId::Shoulder(Side::Right) => 2,
            JointId::Elbow(Side::Left) => 3,
            JointId::Elbow(Side::Right) => 4,
            JointId::Hip(Side::Left) => 5,
            JointId::Hip(Side::Right) => 6,
            JointId::Knee(Side::Left) => 7,
            JointId::Knee(Side::Right) => 8,
        }
    }
}

/// Scene node of every joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skeleton {
    nodes: [NodeId; 9],
}

impl Skeleton {
    /// Build from a lookup that creates or finds each joint's node, in
    /// [`JointId::ALL`] order.
    pub fn from_fn(mut node: impl FnMut(JointId, &[NodeId]) -> NodeId) -> Self {
        let mut nodes = Vec::with_capacity(JointId::ALL.len());
        for joint in JointId::ALL {
            let id = node(joint, &nodes);
            nodes.push(id);
        }
        let mut array = [NodeId(0); 9];
        array.copy_from_slice(&nodes);
        Self { nodes: array }
    }

    pub fn node(&self, joint: JointId) -> NodeId {
        self.nodes[joint.slot()]
    }

    /// Node of `joint`'s parent joint, if already built in `built`.
    pub fn parent_in(joint: JointId, built: &[NodeId]) -> Option<NodeId> {
        joint.parent().and_then(|p| built.get(p.slot()).copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointId, NodeId)> + '_ {
        JointId::ALL.into_iter().map(|j| (j, self.node(j)))
    }
}
