// src/mediapipe_bridge.rs - Boundary to the external pose-estimation model
use anyhow::Result;

use crate::frame::RawFrame;
use crate::joint::Joint;

/// One landmark as reported by the model. Coordinates are in the model's
/// units (metres for world landmarks, 0..1 for image landmarks, y pointing
/// down in both); `visibility` is in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self { x, y, z, visibility }
    }
}

/// Model output for one detected person, one landmark per [`Joint`] in index
/// order. A short vector means the trailing landmarks were not reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoseLandmarks {
    /// Hip-centred 3D landmarks.
    pub world: Vec<Landmark>,
    /// Normalized image-space landmarks, for drawing on the frame.
    pub image: Vec<Landmark>,
}

impl PoseLandmarks {
    pub fn world_landmark(&self, joint: Joint) -> Option<&Landmark> {
        self.world.get(joint.index())
    }

    pub fn image_landmark(&self, joint: Joint) -> Option<&Landmark> {
        self.image.get(joint.index())
    }
}

/// 2D connections the model draws between its image landmarks.
pub const POSE_CONNECTIONS: [(Joint, Joint); 35] = [
    (Joint::Nose, Joint::LeftEyeInner),
    (Joint::LeftEyeInner, Joint::LeftEye),
    (Joint::LeftEye, Joint::LeftEyeOuter),
    (Joint::LeftEyeOuter, Joint::LeftEar),
    (Joint::Nose, Joint::RightEyeInner),
    (Joint::RightEyeInner, Joint::RightEye),
    (Joint::RightEye, Joint::RightEyeOuter),
    (Joint::RightEyeOuter, Joint::RightEar),
    (Joint::MouthLeft, Joint::MouthRight),
    (Joint::LeftShoulder, Joint::RightShoulder),
    (Joint::LeftShoulder, Joint::LeftElbow),
    (Joint::LeftElbow, Joint::LeftWrist),
    (Joint::LeftWrist, Joint::LeftPinky),
    (Joint::LeftWrist, Joint::LeftIndex),
    (Joint::LeftWrist, Joint::LeftThumb),
    (Joint::LeftPinky, Joint::LeftIndex),
    (Joint::RightShoulder, Joint::RightElbow),
    (Joint::RightElbow, Joint::RightWrist),
    (Joint::RightWrist, Joint::RightPinky),
    (Joint::RightWrist, Joint::RightIndex),
    (Joint::RightWrist, Joint::RightThumb),
    (Joint::RightPinky, Joint::RightIndex),
    (Joint::LeftShoulder, Joint::LeftHip),
    (Joint::RightShoulder, Joint::RightHip),
    (Joint::LeftHip, Joint::RightHip),
    (Joint::LeftHip, Joint::LeftKnee),
    (Joint::RightHip, Joint::RightKnee),
    (Joint::LeftKnee, Joint::LeftAnkle),
    (Joint::RightKnee, Joint::RightAnkle),
    (Joint::LeftAnkle, Joint::LeftHeel),
    (Joint::RightAnkle, Joint::RightHeel),
    (Joint::LeftHeel, Joint::LeftFootIndex),
    (Joint::RightHeel, Joint::RightFootIndex),
    (Joint::LeftAnkle, Joint::LeftFootIndex),
    (Joint::RightAnkle, Joint::RightFootIndex),
];

/// The pose-estimation model as seen by the extractor. `Ok(None)` means no
/// person was found in the frame; `Err` is a model failure.
pub trait PoseModel {
    fn process(&mut self, frame: &RawFrame) -> Result<Option<PoseLandmarks>>;

    fn name(&self) -> &str {
        "pose model"
    }
}

impl<M: PoseModel + ?Sized> PoseModel for Box<M> {
    fn process(&mut self, frame: &RawFrame) -> Result<Option<PoseLandmarks>> {
        (**self).process(frame)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

// Standing figure in world coordinates (metres, hip-centred, y down).
const REST_POSE: [[f32; 3]; Joint::COUNT] = [
    [0.00, -0.62, -0.10], // nose
    [0.02, -0.65, -0.09],
    [0.03, -0.65, -0.09],
    [0.04, -0.65, -0.09],
    [-0.02, -0.65, -0.09],
    [-0.03, -0.65, -0.09],
    [-0.04, -0.65, -0.09],
    [0.08, -0.63, -0.02],
    [-0.08, -0.63, -0.02],
    [0.02, -0.58, -0.08],
    [-0.02, -0.58, -0.08],
    [0.18, -0.45, 0.00], // shoulders
    [-0.18, -0.45, 0.00],
    [0.22, -0.20, 0.02], // elbows
    [-0.22, -0.20, 0.02],
    [0.24, 0.02, -0.02], // wrists
    [-0.24, 0.02, -0.02],
    [0.25, 0.08, -0.03],
    [-0.25, 0.08, -0.03],
    [0.24, 0.09, -0.05],
    [-0.24, 0.09, -0.05],
    [0.22, 0.06, -0.05],
    [-0.22, 0.06, -0.05],
    [0.10, 0.00, 0.00], // hips
    [-0.10, 0.00, 0.00],
    [0.11, 0.40, 0.01], // knees
    [-0.11, 0.40, 0.01],
    [0.12, 0.80, 0.04], // ankles
    [-0.12, 0.80, 0.04],
    [0.12, 0.84, 0.08],
    [-0.12, 0.84, 0.08],
    [0.13, 0.86, -0.06],
    [-0.13, 0.86, -0.06],
];

/// Deterministic stand-in for the real model: an idle figure whose arms sway
/// over time. Hands drop below the visibility cut-off part of the cycle so
/// occlusion handling is visible without a camera.
pub struct SimulatedPoseModel {
    sim_time: f64,
    time_step: f64,
}

impl SimulatedPoseModel {
    pub fn new() -> Self {
        Self {
            sim_time: 0.0,
            time_step: 0.033,
        }
    }

    fn landmarks_at(t: f64) -> PoseLandmarks {
        let sway = (t.sin() * 0.12) as f32;
        let fade = (0.75 + 0.2 * (t * 0.5).cos()) as f32;

        let mut world = Vec::with_capacity(Joint::COUNT);
        let mut image = Vec::with_capacity(Joint::COUNT);
        for joint in Joint::ALL {
            let [mut x, y, mut z] = REST_POSE[joint.index()];
            let mut visibility = 0.98;
            match joint {
                Joint::LeftElbow | Joint::RightElbow => z -= sway * 0.5,
                Joint::LeftWrist
                | Joint::RightWrist
                | Joint::LeftPinky
                | Joint::RightPinky
                | Joint::LeftIndex
                | Joint::RightIndex
                | Joint::LeftThumb
                | Joint::RightThumb => {
                    z -= sway;
                    x += if joint.index() % 2 == 1 { sway * 0.3 } else { -sway * 0.3 };
                    if joint.index() > Joint::RightWrist.index() {
                        visibility = fade;
                    }
                }
                _ => {}
            }
            world.push(Landmark::new(x, y, z, visibility));
            image.push(Landmark::new(0.5 + x * 0.45, 0.5 + y * 0.45, z, visibility));
        }
        PoseLandmarks { world, image }
    }
}

impl Default for SimulatedPoseModel {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseModel for SimulatedPoseModel {
    fn process(&mut self, _frame: &RawFrame) -> Result<Option<PoseLandmarks>> {
        let landmarks = Self::landmarks_at(self.sim_time);
        self.sim_time += self.time_step;
        Ok(Some(landmarks))
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
