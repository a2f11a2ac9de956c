//! Idle stance as a pure function of animation time.

use crate::joint::{JointId, KNEE_REST_BEND, KNEE_REST, SHOULDER_REST_ROLL, Side};
use glam::Vec3;
use serde::{Deserialize, Serialize};

const SWAY_FREQUENCY: f32 = 2.0;
const SWAY_AMPLITUDE: f32 = 0.05;
const SQUAT_FREQUENCY: f32 = 1.2;
const SQUAT_AMPLITUDE: f32 = 0.15;
const KNEE_SPREAD: f32 = 0.15;
const HIP_ROLL: f32 = 0.2;
const HIP_TILT: f32 = -0.1;
const HIP_TILT_GAIN: f32 = 0.3;
const SPINE_BOB: f32 = 0.1;
const FOOT_HEIGHT: f32 = 0.25;
const FOOT_SPREAD: f32 = 0.35;
const FOOT_FORWARD: f32 = 0.08;
const FOOT_SWIVEL: f32 = 0.1;
const HEAD_FREQUENCY: f32 = 1.5;
const HEAD_AMPLITUDE: f32 = 0.03;

/// Local transform targets for one joint or part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseTarget {
    pub position: Vec3,
    pub euler: Vec3,
}

/// Full idle pose at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdlePose {
    pub shoulders: [PoseTarget; 2],
    pub hips: [PoseTarget; 2],
    pub knees: [PoseTarget; 2],
    pub spine: PoseTarget,
    /// Feet are parented to the character root, not the legs.
    pub feet: [PoseTarget; 2],
    pub head_pitch: f32,
}

impl IdlePose {
    pub fn at(t: f32) -> Self {
        let sway = (t * SWAY_FREQUENCY).sin() * SWAY_AMPLITUDE;
        let squat = (t * SQUAT_FREQUENCY).sin() * SQUAT_AMPLITUDE;
        let spread = KNEE_SPREAD * squat.abs();
        let hip_roll = HIP_ROLL * squat.abs();
        let hip_pitch = HIP_TILT + squat * HIP_TILT_GAIN;
        let swivel = t.sin() * FOOT_SWIVEL;

        let side = |s: Side| {
            let k = s.sign();
            let shoulder = PoseTarget {
                position: JointId::Shoulder(s).rest_position(),
                euler: Vec3::new(sway * k, 0.0, SHOULDER_REST_ROLL * k),
            };
            let hip = PoseTarget {
                position: JointId::Hip(s).rest_position(),
                euler: Vec3::new(hip_pitch, 0.0, -hip_roll * k),
            };
            let knee = PoseTarget {
                position: Vec3::new(spread * k, KNEE_REST.y, 0.0),
                euler: Vec3::new(KNEE_REST_BEND + squat, 0.0, 0.0),
            };
            let foot = PoseTarget {
                position: Vec3::new(FOOT_SPREAD * k, FOOT_HEIGHT / 2.0, FOOT_FORWARD),
                euler: Vec3::new(0.0, swivel * k, 0.0),
            };
            (shoulder, hip, knee, foot)
        };
        let (ls, lh, lk, lf) = side(Side::Left);
        let (rs, rh, rk, rf) = side(Side::Right);

        Self {
            shoulders: [ls, rs],
            hips: [lh, rh],
            knees: [lk, rk],
            spine: PoseTarget {
                position: Vec3::new(0.0, 0.6 - (t * SQUAT_FREQUENCY).sin() * SPINE_BOB, 0.0),
                euler: Vec3::ZERO,
            },
            feet: [lf, rf],
            head_pitch: (t * HEAD_FREQUENCY).sin() * HEAD_AMPLITUDE,
        }
    }

    /// Target for a joint node.
    pub fn joint(&self, joint: JointId) -> PoseTarget {
        let i = |s: Side| match s {
            Side::Left => 0,
            Side::Right => 1,
        };
        match joint {
            JointId::Spine => self.spine,
            JointId::Shoulder(s) => self.shoulders[i(s)],
            JointId::Hip(s) => self.hips[i(s)],
            JointId::Knee(s) => self.knees[i(s)],
            JointId::Elbow(_) => PoseTarget {
                position: joint.rest_position(),
                euler: joint.rest_euler(),
            },
        }
    }
}
