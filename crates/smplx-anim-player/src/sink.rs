//! Skeleton sink driven during playback.

use nalgebra::{UnitQuaternion, Vector3};

/// Receiver for one applied frame of pose data.
///
/// The mirror image of the export-side pose source: anything that can accept
/// a local rotation per joint and a world translation for the root can be
/// driven — a scene graph, a debug recorder, a retarget bridge.
pub trait PoseSink {
    /// Set a joint's local rotation. Joints arrive in schema order and each
    /// distinct joint is applied once per frame.
    fn set_local_rotation(&mut self, joint: &str, rotation: UnitQuaternion<f32>);

    /// Set the root joint's world translation (meters).
    fn set_root_translation(&mut self, translation: Vector3<f32>);
}
