//! Quaternion to axis-angle conversion with temporal continuity.
//!
//! Axis-angle is two-to-one: q and -q encode the same rotation, and an angle
//! can be reported as theta or theta - 2*pi. Left to a library's default
//! branch choice, a slowly varying rotation passing through pi produces a
//! near-2*pi jump in the exported curve. The extractor instead remembers the
//! previous frame's vector per joint and picks whichever branch lands closer.

use nalgebra::{Unit, UnitQuaternion, Vector3};

/// Below this sine-of-half-angle the rotation is treated as identity and maps
/// to the exact zero vector.
const IDENTITY_EPS: f32 = 1.0e-6;

/// Convert a local rotation to an axis-angle vector.
///
/// Without a previous vector the principal branch is chosen (angle in
/// `(0, pi]`). With one, the principal branch competes with the wrapped
/// branch (`angle - 2*pi` along the same axis) and the Euclidean-closest
/// wins, keeping consecutive frames continuous.
pub fn extract(rotation: &UnitQuaternion<f32>, previous: Option<Vector3<f32>>) -> Vector3<f32> {
    let coords = rotation.quaternion().coords;
    let mut w = coords.w;
    let mut v = coords.xyz();
    if w < 0.0 {
        w = -w;
        v = -v;
    }

    let sin_half = v.norm();
    if sin_half <= IDENTITY_EPS {
        return Vector3::zeros();
    }

    // atan2 keeps the angle stable where acos(w) loses precision near w = 1.
    let angle = 2.0 * sin_half.atan2(w);
    let axis = v / sin_half;
    let principal = axis * angle;

    let Some(prev) = previous else {
        return principal;
    };
    let wrapped = axis * (angle - std::f32::consts::TAU);
    if (principal - prev).norm_squared() <= (wrapped - prev).norm_squared() {
        principal
    } else {
        wrapped
    }
}

/// Inverse of [`extract`]: axis-angle vector back to a unit quaternion.
/// The zero vector maps to the identity rotation.
pub fn to_quaternion(axis_angle: &Vector3<f32>) -> UnitQuaternion<f32> {
    let angle = axis_angle.norm();
    if angle <= IDENTITY_EPS {
        return UnitQuaternion::identity();
    }
    UnitQuaternion::from_axis_angle(&Unit::new_normalize(*axis_angle), angle)
}
