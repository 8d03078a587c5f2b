//! Pose-parameter data model (AMASS / SMPL-X convention).

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::ClipError;
use crate::schema::JointGroup;

/// Shape-parameter vector length, constant for a whole clip.
pub const BETAS_LEN: usize = 16;

/// Constant surface-model identifier carried in every container.
pub const SURFACE_MODEL_TYPE: &str = "smplx";

/// Subject gender in the AMASS convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Neutral,
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Neutral => "neutral",
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "neutral" => Some(Gender::Neutral),
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Width convention for the full `poses` concatenation.
///
/// The source convention documents two irreconcilable totals: files in the
/// wild carry 162 columns (body + hand + face written once) while the sum of
/// the four documented group widths is 171 (face written under both jaw and
/// eye). Neither is guessed; the clip records which one it uses and the codec
/// validates against it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PosesLayout {
    /// body + hand + face once: 63 + 90 + 9 = 162 columns.
    #[default]
    Compact,
    /// body + hand + jaw + eye: 63 + 90 + 9 + 9 = 171 columns.
    Grouped,
}

impl PosesLayout {
    /// Column count of a `poses` row under this layout.
    #[inline]
    pub fn width(&self) -> usize {
        match self {
            PosesLayout::Compact => 162,
            PosesLayout::Grouped => 171,
        }
    }

    /// Recognize a layout from a `poses` width read back from a container.
    pub fn from_width(width: usize) -> Option<Self> {
        match width {
            162 => Some(PosesLayout::Compact),
            171 => Some(PosesLayout::Grouped),
            _ => None,
        }
    }
}

/// One sampled frame: root orientation/translation plus the four grouped
/// joint rotation lists, all axis-angle.
///
/// Group lengths are invariant (21/30/3/3). A joint missing from the rig is
/// present-but-zero, never omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSample {
    /// Source frame index this sample was evaluated at.
    pub frame: i32,
    pub root_orient: Vector3<f32>,
    /// Root world translation (meters); carries no sign ambiguity and is
    /// never continuity-corrected.
    pub trans: Vector3<f32>,
    pub body: Vec<Vector3<f32>>,
    pub hand: Vec<Vector3<f32>>,
    pub jaw: Vec<Vector3<f32>>,
    pub eye: Vec<Vector3<f32>>,
}

impl FrameSample {
    /// An all-identity sample at the given frame.
    pub fn zeroed(frame: i32) -> Self {
        Self {
            frame,
            root_orient: Vector3::zeros(),
            trans: Vector3::zeros(),
            body: vec![Vector3::zeros(); JointGroup::Body.joint_count()],
            hand: vec![Vector3::zeros(); JointGroup::Hand.joint_count()],
            jaw: vec![Vector3::zeros(); JointGroup::Jaw.joint_count()],
            eye: vec![Vector3::zeros(); JointGroup::Eye.joint_count()],
        }
    }

    /// Rotation list of a non-root group.
    pub fn group(&self, group: JointGroup) -> &[Vector3<f32>] {
        match group {
            JointGroup::Root => std::slice::from_ref(&self.root_orient),
            JointGroup::Body => &self.body,
            JointGroup::Hand => &self.hand,
            JointGroup::Jaw => &self.jaw,
            JointGroup::Eye => &self.eye,
        }
    }

    /// Mutable rotation list of a non-root group.
    pub(crate) fn group_mut(&mut self, group: JointGroup) -> &mut [Vector3<f32>] {
        match group {
            JointGroup::Root => std::slice::from_mut(&mut self.root_orient),
            JointGroup::Body => &mut self.body,
            JointGroup::Hand => &mut self.hand,
            JointGroup::Jaw => &mut self.jaw,
            JointGroup::Eye => &mut self.eye,
        }
    }

    /// Check the invariant group lengths.
    pub fn validate(&self) -> Result<(), ClipError> {
        for group in crate::schema::POSE_GROUPS {
            let actual = self.group(group).len();
            if actual != group.joint_count() {
                return Err(ClipError::ShapeMismatch {
                    name: format!("{group:?}").to_lowercase(),
                    expected: format!("({})", group.joint_count()),
                    actual: format!("({actual})"),
                });
            }
        }
        Ok(())
    }

    /// Flatten the full pose row under a layout.
    pub fn poses_row(&self, layout: PosesLayout) -> Vec<f32> {
        let mut row = Vec::with_capacity(layout.width());
        for v in self.body.iter().chain(&self.hand).chain(&self.jaw) {
            row.extend_from_slice(v.as_slice());
        }
        if layout == PosesLayout::Grouped {
            for v in &self.eye {
                row.extend_from_slice(v.as_slice());
            }
        }
        row
    }
}

/// A complete assembled animation, immutable once handed to the codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub gender: Gender,
    pub surface_model_type: String,
    /// Frames per second, always positive and finite.
    pub frame_rate: f32,
    /// Shape parameters, length [`BETAS_LEN`].
    pub betas: Vec<f32>,
    pub layout: PosesLayout,
    /// Samples in increasing frame order, never empty.
    pub frames: Vec<FrameSample>,
}

impl AnimationClip {
    /// Create an empty clip shell; frames are pushed by the assembler.
    pub fn new(
        gender: Gender,
        frame_rate: f32,
        betas: Vec<f32>,
        layout: PosesLayout,
    ) -> Result<Self, ClipError> {
        if frame_rate <= 0.0 || !frame_rate.is_finite() {
            return Err(ClipError::InvalidFrameRate { rate: frame_rate });
        }
        if betas.len() != BETAS_LEN {
            return Err(ClipError::ShapeMismatch {
                name: "betas".into(),
                expected: format!("({BETAS_LEN})"),
                actual: format!("({})", betas.len()),
            });
        }
        Ok(Self {
            gender,
            surface_model_type: SURFACE_MODEL_TYPE.to_string(),
            frame_rate,
            betas,
            layout,
            frames: Vec::new(),
        })
    }

    /// Number of frame samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Source frame index of the first sample.
    pub fn start_frame(&self) -> Option<i32> {
        self.frames.first().map(|f| f.frame)
    }

    /// Clip duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.frames.len() as f64 / self.frame_rate as f64
    }

    /// Validate the whole-clip invariants (N >= 1, group lengths per frame).
    pub fn validate(&self) -> Result<(), ClipError> {
        if self.frames.is_empty() {
            return Err(ClipError::ShapeMismatch {
                name: "frames".into(),
                expected: "(>= 1)".into(),
                actual: "(0)".into(),
            });
        }
        for frame in &self.frames {
            frame.validate()?;
        }
        Ok(())
    }
}
