//! Canonical SMPL-X joint schema.
//!
//! The schema is the single source of truth for array layout: group order is
//! body -> hand -> jaw -> eye, each group internally ordered as declared here.
//! Neither the codec nor the extractor ever re-derives order from a rig's own
//! bone ordering.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::source::PoseSource;

/// Root joint carrying global orientation and translation.
pub const ROOT_JOINT: &str = "pelvis";

/// Body joints in layout order (root excluded).
pub const BODY_JOINTS: [&str; 21] = [
    "left_hip",
    "right_hip",
    "spine1",
    "left_knee",
    "right_knee",
    "spine2",
    "left_ankle",
    "right_ankle",
    "spine3",
    "left_foot",
    "right_foot",
    "neck",
    "left_collar",
    "right_collar",
    "head",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
];

/// Hand joints in layout order, left hand then right.
pub const HAND_JOINTS: [&str; 30] = [
    "left_index1",
    "left_index2",
    "left_index3",
    "left_middle1",
    "left_middle2",
    "left_middle3",
    "left_pinky1",
    "left_pinky2",
    "left_pinky3",
    "left_ring1",
    "left_ring2",
    "left_ring3",
    "left_thumb1",
    "left_thumb2",
    "left_thumb3",
    "right_index1",
    "right_index2",
    "right_index3",
    "right_middle1",
    "right_middle2",
    "right_middle3",
    "right_pinky1",
    "right_pinky2",
    "right_pinky3",
    "right_ring1",
    "right_ring2",
    "right_ring3",
    "right_thumb1",
    "right_thumb2",
    "right_thumb3",
];

/// Face joints. The jaw group and the eye group both reference these three
/// joints, matching the AMASS files the source convention produces (pose_jaw
/// and pose_eye carry the same nine scalars).
pub const FACE_JOINTS: [&str; 3] = ["jaw", "left_eye_smplhf", "right_eye_smplhf"];

/// Joint group within the pose vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JointGroup {
    Root,
    Body,
    Hand,
    Jaw,
    Eye,
}

impl JointGroup {
    /// Canonical joint names of this group, in layout order.
    pub fn joint_names(&self) -> &'static [&'static str] {
        match self {
            JointGroup::Root => &[ROOT_JOINT],
            JointGroup::Body => &BODY_JOINTS,
            JointGroup::Hand => &HAND_JOINTS,
            JointGroup::Jaw | JointGroup::Eye => &FACE_JOINTS,
        }
    }

    /// Number of joints in this group.
    #[inline]
    pub fn joint_count(&self) -> usize {
        self.joint_names().len()
    }

    /// Scalar width of this group in a flattened pose row (joints x 3).
    #[inline]
    pub fn scalar_width(&self) -> usize {
        self.joint_count() * 3
    }
}

/// The non-root groups in fixed concatenation order.
pub const POSE_GROUPS: [JointGroup; 4] = [
    JointGroup::Body,
    JointGroup::Hand,
    JointGroup::Jaw,
    JointGroup::Eye,
];

/// One slot in the pose vector: a canonical name and its fixed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointSlot {
    pub name: &'static str,
    pub group: JointGroup,
    pub index: usize,
}

/// All non-root slots in layout order (body, hand, jaw, eye).
pub fn slots() -> impl Iterator<Item = JointSlot> {
    POSE_GROUPS.iter().flat_map(|group| {
        group
            .joint_names()
            .iter()
            .enumerate()
            .map(|(index, name)| JointSlot {
                name,
                group: *group,
                index,
            })
    })
}

/// Outcome of matching the schema against a rig.
///
/// Resolution never fails: absent joints are collected as a diagnostic and
/// their slots stay zero-filled through every frame of an export.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaResolution {
    present: HashSet<&'static str>,
    /// Distinct canonical names absent from the rig, in schema order.
    pub missing: Vec<String>,
}

impl SchemaResolution {
    /// Whether the root joint resolved.
    #[inline]
    pub fn has_root(&self) -> bool {
        self.present.contains(ROOT_JOINT)
    }

    /// Bone name backing a slot, if the rig has it. Exact-name convention,
    /// so the bone identifier is the canonical name itself.
    #[inline]
    pub fn bone_for(&self, slot: &JointSlot) -> Option<&'static str> {
        self.present.contains(slot.name).then_some(slot.name)
    }

    /// All resolved bone names (root included), in schema order.
    pub fn resolved_bones(&self) -> Vec<&'static str> {
        distinct_joint_names()
            .filter(|name| self.present.contains(name))
            .collect()
    }
}

/// Every distinct canonical name once, root first, then schema order.
fn distinct_joint_names() -> impl Iterator<Item = &'static str> {
    std::iter::once(ROOT_JOINT)
        .chain(BODY_JOINTS)
        .chain(HAND_JOINTS)
        .chain(FACE_JOINTS)
}

/// Match every canonical joint against the rig by exact name.
pub fn resolve<S: PoseSource>(source: &S) -> SchemaResolution {
    let mut present = HashSet::new();
    let mut missing = Vec::new();
    for name in distinct_joint_names() {
        if source.has_bone(name) {
            present.insert(name);
        } else {
            missing.push(name.to_string());
        }
    }
    SchemaResolution { present, missing }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{UnitQuaternion, Vector3};

    struct StubRig(Vec<String>);

    impl PoseSource for StubRig {
        fn bones(&self) -> Vec<String> {
            self.0.clone()
        }
        fn local_rotation(&self, bone: &str, _frame: i32) -> Option<UnitQuaternion<f32>> {
            self.has_bone(bone).then(UnitQuaternion::identity)
        }
        fn world_translation(&self, bone: &str, _frame: i32) -> Option<Vector3<f32>> {
            self.has_bone(bone).then(Vector3::zeros)
        }
        fn keyframes(&self, _bone: &str) -> Vec<i32> {
            Vec::new()
        }
        fn current_frame(&self) -> i32 {
            0
        }
    }

    #[test]
    fn test_group_widths() {
        assert_eq!(JointGroup::Body.scalar_width(), 63);
        assert_eq!(JointGroup::Hand.scalar_width(), 90);
        assert_eq!(JointGroup::Jaw.scalar_width(), 9);
        assert_eq!(JointGroup::Eye.scalar_width(), 9);
    }

    #[test]
    fn test_slot_order() {
        let all: Vec<JointSlot> = slots().collect();
        assert_eq!(all.len(), 21 + 30 + 3 + 3);
        assert_eq!(all[0].name, "left_hip");
        assert_eq!(all[20].name, "right_wrist");
        assert_eq!(all[21].name, "left_index1");
        assert_eq!(all[51].name, "jaw");
        assert_eq!(all[54].name, "jaw");
        assert_eq!(all[54].group, JointGroup::Eye);
    }

    #[test]
    fn test_resolve_reports_distinct_missing() {
        let rig = StubRig(vec!["pelvis".into(), "left_hip".into()]);
        let resolution = resolve(&rig);
        assert!(resolution.has_root());
        // 55 distinct canonical joints, two present.
        assert_eq!(resolution.missing.len(), 53);
        assert!(resolution.missing.iter().all(|n| n != "pelvis"));
        // Face joints appear once even though two groups reference them.
        let jaws = resolution.missing.iter().filter(|n| *n == "jaw").count();
        assert_eq!(jaws, 1);
    }

    #[test]
    fn test_resolved_bones_in_schema_order() {
        let rig = StubRig(vec![
            "right_wrist".into(),
            "pelvis".into(),
            "left_hip".into(),
        ]);
        let resolution = resolve(&rig);
        assert_eq!(
            resolution.resolved_bones(),
            vec!["pelvis", "left_hip", "right_wrist"]
        );
    }
}
