// src/joint.rs - Landmark enumeration and the per-frame joint map
use nalgebra::Vector3;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ViewerError;

/// Body landmarks reported by the pose model, in the model's index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(usize)]
pub enum Joint {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl Joint {
    pub const COUNT: usize = 33;

    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::Nose,
        Joint::LeftEyeInner,
        Joint::LeftEye,
        Joint::LeftEyeOuter,
        Joint::RightEyeInner,
        Joint::RightEye,
        Joint::RightEyeOuter,
        Joint::LeftEar,
        Joint::RightEar,
        Joint::MouthLeft,
        Joint::MouthRight,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftPinky,
        Joint::RightPinky,
        Joint::LeftIndex,
        Joint::RightIndex,
        Joint::LeftThumb,
        Joint::RightThumb,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
        Joint::LeftHeel,
        Joint::RightHeel,
        Joint::LeftFootIndex,
        Joint::RightFootIndex,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical upper-snake name, e.g. `LEFT_SHOULDER`.
    pub fn name(self) -> &'static str {
        match self {
            Joint::Nose => "NOSE",
            Joint::LeftEyeInner => "LEFT_EYE_INNER",
            Joint::LeftEye => "LEFT_EYE",
            Joint::LeftEyeOuter => "LEFT_EYE_OUTER",
            Joint::RightEyeInner => "RIGHT_EYE_INNER",
            Joint::RightEye => "RIGHT_EYE",
            Joint::RightEyeOuter => "RIGHT_EYE_OUTER",
            Joint::LeftEar => "LEFT_EAR",
            Joint::RightEar => "RIGHT_EAR",
            Joint::MouthLeft => "MOUTH_LEFT",
            Joint::MouthRight => "MOUTH_RIGHT",
            Joint::LeftShoulder => "LEFT_SHOULDER",
            Joint::RightShoulder => "RIGHT_SHOULDER",
            Joint::LeftElbow => "LEFT_ELBOW",
            Joint::RightElbow => "RIGHT_ELBOW",
            Joint::LeftWrist => "LEFT_WRIST",
            Joint::RightWrist => "RIGHT_WRIST",
            Joint::LeftPinky => "LEFT_PINKY",
            Joint::RightPinky => "RIGHT_PINKY",
            Joint::LeftIndex => "LEFT_INDEX",
            Joint::RightIndex => "RIGHT_INDEX",
            Joint::LeftThumb => "LEFT_THUMB",
            Joint::RightThumb => "RIGHT_THUMB",
            Joint::LeftHip => "LEFT_HIP",
            Joint::RightHip => "RIGHT_HIP",
            Joint::LeftKnee => "LEFT_KNEE",
            Joint::RightKnee => "RIGHT_KNEE",
            Joint::LeftAnkle => "LEFT_ANKLE",
            Joint::RightAnkle => "RIGHT_ANKLE",
            Joint::LeftHeel => "LEFT_HEEL",
            Joint::RightHeel => "RIGHT_HEEL",
            Joint::LeftFootIndex => "LEFT_FOOT_INDEX",
            Joint::RightFootIndex => "RIGHT_FOOT_INDEX",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Joint {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|joint| joint.name() == s)
            .ok_or_else(|| ViewerError::UnknownJoint(s.to_string()))
    }
}

impl Serialize for Joint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Joint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Joints detected in one frame, keyed by landmark. A missing key means the
/// joint was not detected, never that it sits at the origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameJointMap {
    positions: HashMap<Joint, Vector3<f32>>,
}

impl FrameJointMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, joint: Joint, position: Vector3<f32>) {
        self.positions.insert(joint, position);
    }

    pub fn get(&self, joint: Joint) -> Option<&Vector3<f32>> {
        self.positions.get(&joint)
    }

    pub fn contains(&self, joint: Joint) -> bool {
        self.positions.contains_key(&joint)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterates in landmark order so draw output is reproducible.
    pub fn iter(&self) -> impl Iterator<Item = (Joint, &Vector3<f32>)> {
        Joint::ALL
            .iter()
            .filter_map(move |joint| self.positions.get(joint).map(|p| (*joint, p)))
    }

    /// Translates every joint so `anchor` sits at the origin. Returns the map
    /// unchanged when the anchor was not detected.
    pub fn recentered(mut self, anchor: Joint) -> Self {
        let Some(origin) = self.positions.get(&anchor).copied() else {
            return self;
        };
        for position in self.positions.values_mut() {
            *position -= origin;
        }
        self
    }
}

impl FromIterator<(Joint, Vector3<f32>)> for FrameJointMap {
    fn from_iter<I: IntoIterator<Item = (Joint, Vector3<f32>)>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}
