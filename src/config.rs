// src/config.rs - Viewer settings persisted as JSON in the platform config dir
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, ViewerError};
use crate::extractor::ExtractorConfig;
use crate::hierarchy::{HierarchyEntry, JointHierarchy};
use crate::orbit::DEFAULT_ROTATION_STEP_DEG;

const CONFIG_FILE: &str = "config.json";

/// Which bone layout the renderer draws. The named presets are picked
/// explicitly; there is no implicit default beyond this config value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HierarchyChoice {
    Preset(HierarchyPreset),
    Custom(Vec<HierarchyEntry>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyPreset {
    PoseLandmarks,
    Nuitrack,
}

impl HierarchyChoice {
    pub fn build(&self) -> JointHierarchy {
        match self {
            HierarchyChoice::Preset(HierarchyPreset::PoseLandmarks) => JointHierarchy::pose_landmarks(),
            HierarchyChoice::Preset(HierarchyPreset::Nuitrack) => JointHierarchy::nuitrack(),
            HierarchyChoice::Custom(entries) => JointHierarchy::from_entries(entries.clone()),
        }
    }
}

impl Default for HierarchyChoice {
    fn default() -> Self {
        HierarchyChoice::Preset(HierarchyPreset::PoseLandmarks)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Capture device opened at startup.
    pub camera_index: u32,
    /// Period of the acquire -> extract -> draw tick.
    pub tick_interval_ms: u64,
    /// Mirror the camera image horizontally.
    pub mirror_feed: bool,
    pub extractor: ExtractorConfig,
    /// Degrees added per rotate action.
    pub orbit_step_deg: f32,
    pub hierarchy: HierarchyChoice,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            tick_interval_ms: 33,
            mirror_feed: true,
            extractor: ExtractorConfig::default(),
            orbit_step_deg: DEFAULT_ROTATION_STEP_DEG,
            hierarchy: HierarchyChoice::default(),
        }
    }
}

impl ViewerConfig {
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "PoseSkeletonViewer", "pose_skeleton_viewer")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Reads `path`; a missing file gives the defaults, a malformed one is an
    /// error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: ViewerConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads from the platform config directory, falling back to defaults
    /// when no such directory can be resolved.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_or_default(path),
            None => Ok(Self::default()),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(ViewerError::Config("tick_interval_ms must be positive".to_string()));
        }
        let threshold = self.extractor.visibility_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ViewerError::Config(format!(
                "visibility_threshold {threshold} is outside [0, 1]"
            )));
        }
        if !self.extractor.display_scale.is_finite() || !self.orbit_step_deg.is_finite() {
            return Err(ViewerError::Config("scale and orbit step must be finite".to_string()));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::JointRef;
    use crate::joint::Joint;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("pose_skeleton_viewer_{}_{}", std::process::id(), name))
            .join(CONFIG_FILE)
    }

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_millis(33));
        assert_eq!(config.extractor.visibility_threshold, 0.7);
        assert_eq!(config.extractor.display_scale, 2.0);
        assert_eq!(config.orbit_step_deg, 4.0);
        assert_eq!(config.hierarchy.build(), JointHierarchy::pose_landmarks());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = ViewerConfig::load_or_default(temp_path("missing")).unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let json = r#"{ "camera_index": 2, "hierarchy": "nuitrack", "extractor": { "recenter_on": "LEFT_HIP" } }"#;
        let config: ViewerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.camera_index, 2);
        assert_eq!(config.hierarchy, HierarchyChoice::Preset(HierarchyPreset::Nuitrack));
        assert_eq!(config.extractor.recenter_on, Some(Joint::LeftHip));
        assert_eq!(config.extractor.visibility_threshold, 0.7);
        assert_eq!(config.tick_interval_ms, 33);
    }

    #[test]
    fn test_custom_hierarchy() {
        let json = r#"{ "hierarchy": [ { "parent": "Neck", "children": ["NOSE"] } ] }"#;
        let config: ViewerConfig = serde_json::from_str(json).unwrap();
        let h = config.hierarchy.build();
        let (parent, children) = h.iter().next().unwrap();
        assert_eq!(parent, &JointRef::Unmodeled("Neck".to_string()));
        assert_eq!(children, &[JointRef::Known(Joint::Nose)]);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let config = ViewerConfig {
            camera_index: 1,
            mirror_feed: false,
            ..ViewerConfig::default()
        };
        config.save(&path).unwrap();
        let loaded = ViewerConfig::load_or_default(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = temp_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        assert!(ViewerConfig::load_or_default(&path).is_err());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_rejects_zero_interval() {
        let config = ViewerConfig {
            tick_interval_ms: 0,
            ..ViewerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
