//! Host abstraction for a live armature pose.
//!
//! Anything that can answer rotation-at-frame and keyframe-enumeration queries
//! can back an export: a DCC scene graph, an offline skeleton library, or a
//! hand-rolled keyframe interpolator. The core never reaches for ambient
//! state; it always takes a `PoseSource` reference explicitly.

use nalgebra::{UnitQuaternion, Vector3};

/// Read-only view of a posed skeleton over a frame timeline.
///
/// Frames are the host's native integer frames. Rotations are local-space,
/// measured against the bone's rest pose. Implementations are expected to
/// evaluate the full rig at the requested frame (constraints and parent
/// motion included), not merely look up authored keys.
pub trait PoseSource {
    /// All bone names present in the rig.
    fn bones(&self) -> Vec<String>;

    /// Whether a bone with this exact name exists.
    fn has_bone(&self, name: &str) -> bool {
        self.bones().iter().any(|b| b == name)
    }

    /// Local rotation of a bone at a frame, relative to its rest pose.
    /// Returns `None` for unknown bones.
    fn local_rotation(&self, bone: &str, frame: i32) -> Option<UnitQuaternion<f32>>;

    /// World-space position of a bone at a frame (meters).
    /// Returns `None` for unknown bones.
    fn world_translation(&self, bone: &str, frame: i32) -> Option<Vector3<f32>>;

    /// All frames at which this bone has an explicit keyframe, rotation and
    /// location channels combined. Order and duplicates do not matter.
    fn keyframes(&self, bone: &str) -> Vec<i32>;

    /// The host's current evaluation frame.
    fn current_frame(&self) -> i32;
}
