//! Test fixture: an in-memory rig backing the `PoseSource` trait.
#![allow(dead_code)]

use std::collections::HashMap;

use nalgebra::{UnitQuaternion, Vector3};
use smplx_anim_core::PoseSource;

/// One bone's authored animation. Frames without a stored rotation evaluate
/// to identity, mimicking a host that always evaluates the full rig.
#[derive(Debug, Default, Clone)]
pub struct RigBone {
    pub keyframes: Vec<i32>,
    pub rotations: HashMap<i32, UnitQuaternion<f32>>,
    pub translations: HashMap<i32, Vector3<f32>>,
}

impl RigBone {
    pub fn keyed(frames: &[i32]) -> Self {
        Self {
            keyframes: frames.to_vec(),
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, frame: i32, rotation: UnitQuaternion<f32>) -> Self {
        self.rotations.insert(frame, rotation);
        self
    }

    pub fn with_translation(mut self, frame: i32, translation: Vector3<f32>) -> Self {
        self.translations.insert(frame, translation);
        self
    }
}

#[derive(Debug, Default)]
pub struct RigSource {
    bones: HashMap<String, RigBone>,
    pub current: i32,
}

impl RigSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bone(mut self, name: &str, bone: RigBone) -> Self {
        self.bones.insert(name.to_string(), bone);
        self
    }
}

impl PoseSource for RigSource {
    fn bones(&self) -> Vec<String> {
        self.bones.keys().cloned().collect()
    }

    fn local_rotation(&self, bone: &str, frame: i32) -> Option<UnitQuaternion<f32>> {
        let bone = self.bones.get(bone)?;
        Some(
            bone.rotations
                .get(&frame)
                .copied()
                .unwrap_or_else(UnitQuaternion::identity),
        )
    }

    fn world_translation(&self, bone: &str, frame: i32) -> Option<Vector3<f32>> {
        let bone = self.bones.get(bone)?;
        Some(
            bone.translations
                .get(&frame)
                .copied()
                .unwrap_or_else(Vector3::zeros),
        )
    }

    fn keyframes(&self, bone: &str) -> Vec<i32> {
        self.bones
            .get(bone)
            .map(|b| b.keyframes.clone())
            .unwrap_or_default()
    }

    fn current_frame(&self) -> i32 {
        self.current
    }
}
