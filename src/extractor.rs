// src/extractor.rs - Raw frame -> confidence-filtered 3D joint map
use anyhow::{Context, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::annotate;
use crate::frame::RawFrame;
use crate::joint::{FrameJointMap, Joint};
use crate::mediapipe_bridge::{PoseLandmarks, PoseModel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Joints are kept only when visibility is strictly above this.
    pub visibility_threshold: f32,
    /// Uniform scale from model units to scene units.
    pub display_scale: f32,
    /// Translate each frame so this joint sits at the origin.
    pub recenter_on: Option<Joint>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: 0.7,
            display_scale: 2.0,
            recenter_on: None,
        }
    }
}

/// Output of one extraction: the joint map for the renderer and the frame
/// with the model's 2D keypoints drawn on it for the operator.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub joints: FrameJointMap,
    pub annotated: RawFrame,
}

pub struct PoseExtractor<M: PoseModel> {
    model: M,
    config: ExtractorConfig,
}

impl<M: PoseModel> PoseExtractor<M> {
    pub fn new(model: M, config: ExtractorConfig) -> Self {
        Self { model, config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Runs the model on `frame`. Nothing carries over between calls; a frame
    /// with no person yields an empty map and an untouched copy of the frame.
    pub fn extract(&mut self, frame: &RawFrame) -> Result<Extraction> {
        let detection = self
            .model
            .process(frame)
            .with_context(|| format!("{} failed on {}x{} frame", self.model.name(), frame.width(), frame.height()))?;

        let Some(landmarks) = detection else {
            return Ok(Extraction {
                joints: FrameJointMap::new(),
                annotated: frame.clone(),
            });
        };

        let mut joints = filter_landmarks(&landmarks, &self.config);
        if let Some(anchor) = self.config.recenter_on {
            joints = joints.recentered(anchor);
        }
        let annotated = annotate::draw_landmarks(frame, &landmarks);

        Ok(Extraction { joints, annotated })
    }
}

/// Keeps every world landmark whose visibility is strictly above the
/// threshold, flipping y from the model's top-down axis to bottom-up and
/// scaling uniformly.
pub fn filter_landmarks(landmarks: &PoseLandmarks, config: &ExtractorConfig) -> FrameJointMap {
    let scale = config.display_scale;
    Joint::ALL
        .iter()
        .filter_map(|&joint| {
            let lm = landmarks.world_landmark(joint)?;
            (lm.visibility > config.visibility_threshold)
                .then(|| (joint, Vector3::new(lm.x * scale, -lm.y * scale, lm.z * scale)))
        })
        .collect()
}
