// src/hierarchy.rs - Parent -> children bone adjacency
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::joint::{FrameJointMap, Joint};
use nalgebra::Vector3;

/// A joint as named by a hierarchy. Names outside the landmark enumeration are
/// kept so hierarchies authored for other trackers load unchanged; they never
/// match a detected joint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JointRef {
    Known(Joint),
    Unmodeled(String),
}

impl JointRef {
    pub fn parse(name: &str) -> Self {
        match name.parse::<Joint>() {
            Ok(joint) => JointRef::Known(joint),
            Err(_) => JointRef::Unmodeled(name.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            JointRef::Known(joint) => joint.name(),
            JointRef::Unmodeled(name) => name,
        }
    }

    pub fn joint(&self) -> Option<Joint> {
        match self {
            JointRef::Known(joint) => Some(*joint),
            JointRef::Unmodeled(_) => None,
        }
    }

    pub fn lookup<'a>(&self, map: &'a FrameJointMap) -> Option<&'a Vector3<f32>> {
        self.joint().and_then(|joint| map.get(joint))
    }
}

impl From<Joint> for JointRef {
    fn from(joint: Joint) -> Self {
        JointRef::Known(joint)
    }
}

impl Serialize for JointRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for JointRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(JointRef::parse(&name))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyEntry {
    pub parent: JointRef,
    pub children: Vec<JointRef>,
}

/// Which joint pairs are connected by a rendered bone. Order is the caller's;
/// duplicate edges are kept. Built once and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct JointHierarchy {
    entries: Vec<HierarchyEntry>,
}

impl JointHierarchy {
    pub fn new<P, C, I>(entries: I) -> Self
    where
        P: Into<JointRef>,
        C: Into<JointRef>,
        I: IntoIterator<Item = (P, Vec<C>)>,
    {
        let entries = entries
            .into_iter()
            .map(|(parent, children)| HierarchyEntry {
                parent: parent.into(),
                children: children.into_iter().map(Into::into).collect(),
            })
            .collect();
        Self { entries }
    }

    pub fn from_names<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [&'a str])>,
    {
        let entries = entries
            .into_iter()
            .map(|(parent, children)| HierarchyEntry {
                parent: JointRef::parse(parent),
                children: children.iter().map(|c| JointRef::parse(c)).collect(),
            })
            .collect();
        Self { entries }
    }

    pub fn from_entries(entries: Vec<HierarchyEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[HierarchyEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&JointRef, &[JointRef])> {
        self.entries
            .iter()
            .map(|entry| (&entry.parent, entry.children.as_slice()))
    }

    /// Number of (parent, child) edges, duplicates included.
    pub fn edge_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.children.len()).sum()
    }

    /// The full-body landmark graph: torso, arms with hand fans, legs with
    /// heel/foot triangles.
    pub fn pose_landmarks() -> Self {
        use Joint::*;
        Self::new([
            (RightHip, vec![RightShoulder, LeftHip, RightKnee]),
            (RightKnee, vec![RightAnkle]),
            (RightAnkle, vec![RightFootIndex, RightHeel]),
            (RightFootIndex, vec![RightHeel]),
            (LeftHip, vec![LeftShoulder, LeftKnee]),
            (LeftKnee, vec![LeftAnkle]),
            (LeftAnkle, vec![LeftHeel, LeftFootIndex]),
            (LeftFootIndex, vec![LeftHeel]),
            (RightShoulder, vec![RightElbow, LeftShoulder]),
            (RightElbow, vec![RightWrist]),
            (RightWrist, vec![RightThumb, RightIndex, RightPinky]),
            (RightIndex, vec![RightPinky]),
            (LeftShoulder, vec![LeftElbow]),
            (LeftElbow, vec![LeftWrist]),
            (LeftWrist, vec![LeftThumb, LeftIndex, LeftPinky]),
            (LeftIndex, vec![LeftPinky]),
        ])
    }

    /// Collar/torso/waist layout used by depth-sensor skeleton trackers. None of
    /// its names are pose landmarks, so against a landmark map it draws nothing.
    pub fn nuitrack() -> Self {
        Self::from_names([
            ("Neck", &["Head"][..]),
            ("LeftCollar", &["Neck", "LeftShoulder", "RightShoulder"][..]),
            ("Torso", &["LeftCollar"][..]),
            ("Waist", &["Torso", "LeftHip", "RightHip"][..]),
            ("LeftShoulder", &["LeftElbow"][..]),
            ("RightShoulder", &["RightElbow"][..]),
            ("LeftElbow", &["LeftWrist"][..]),
            ("RightElbow", &["RightWrist"][..]),
            ("LeftWrist", &["LeftHand"][..]),
            ("RightWrist", &["RightHand"][..]),
            ("LeftHip", &["LeftKnee"][..]),
            ("RightHip", &["RightKnee"][..]),
            ("LeftKnee", &["LeftAnkle"][..]),
            ("RightKnee", &["RightAnkle"][..]),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_keeps_caller_order() {
        let h = JointHierarchy::new([
            (Joint::RightHip, vec![Joint::RightKnee]),
            (Joint::Nose, vec![Joint::LeftEye]),
        ]);
        let parents: Vec<&str> = h.iter().map(|(p, _)| p.name()).collect();
        assert_eq!(parents, vec!["RIGHT_HIP", "NOSE"]);
    }

    #[test]
    fn test_duplicate_edges_are_kept() {
        let h = JointHierarchy::new([
            (Joint::LeftHip, vec![Joint::LeftKnee, Joint::LeftKnee]),
            (Joint::LeftHip, vec![Joint::LeftKnee]),
        ]);
        assert_eq!(h.edge_count(), 3);
    }

    #[test]
    fn test_unknown_names_are_tolerated() {
        let h = JointHierarchy::from_names([("Neck", &["Head", "NOSE"][..])]);
        let (parent, children) = h.iter().next().unwrap();
        assert_eq!(parent, &JointRef::Unmodeled("Neck".to_string()));
        assert_eq!(children[1], JointRef::Known(Joint::Nose));
    }

    #[test]
    fn test_unmodeled_ref_never_matches() {
        let map: FrameJointMap = [(Joint::Nose, Vector3::zeros())].into_iter().collect();
        assert!(JointRef::Unmodeled("NOSE ".to_string()).lookup(&map).is_none());
        assert!(JointRef::Known(Joint::Nose).lookup(&map).is_some());
    }

    #[test]
    fn test_nuitrack_has_no_landmark_parents() {
        let h = JointHierarchy::nuitrack();
        assert_eq!(h.entries().len(), 14);
        assert!(h.iter().all(|(p, _)| p.joint().is_none()));
    }

    #[test]
    fn test_pose_landmarks_edge_count() {
        assert_eq!(JointHierarchy::pose_landmarks().edge_count(), 26);
    }

    #[test]
    fn test_entry_json_shape() {
        let json = r#"[{"parent":"LEFT_HIP","children":["LEFT_KNEE","Pelvis"]}]"#;
        let entries: Vec<HierarchyEntry> = serde_json::from_str(json).unwrap();
        let h = JointHierarchy::from_entries(entries);
        assert_eq!(h.entries()[0].parent, JointRef::Known(Joint::LeftHip));
        assert_eq!(h.entries()[0].children[1], JointRef::Unmodeled("Pelvis".to_string()));
        let back = serde_json::to_string(h.entries()).unwrap();
        assert_eq!(back, json);
    }
}
