//! Frame loop: drives the scanner and extractor across the detected range and
//! builds the full per-frame pose vectors.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::clip::{AnimationClip, FrameSample, Gender, PosesLayout};
use crate::error::ClipError;
use crate::range::{scan_frame_range, FrameRange};
use crate::rotation;
use crate::schema::{self, JointSlot, ROOT_JOINT};
use crate::source::PoseSource;

/// Settings for a single export run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Mocap frame rate recorded in the container (fps).
    pub frame_rate: f32,
    pub gender: Gender,
    /// Shape parameters, length 16.
    pub betas: Vec<f32>,
    /// Explicit range override. When set it wins over the keyframe scan and
    /// is not re-validated against it.
    pub range: Option<FrameRange>,
    pub layout: PosesLayout,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            gender: Gender::Neutral,
            betas: vec![0.0; crate::clip::BETAS_LEN],
            range: None,
            layout: PosesLayout::default(),
        }
    }
}

/// Non-fatal conditions recovered during assembly, surfaced alongside the
/// successful result.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExportWarning {
    /// Canonical joints absent from the rig; their slots are zero in every
    /// frame.
    #[error("joints not found in pose source: {}", names.join(", "))]
    MissingJoints { names: Vec<String> },

    /// No keyframes anywhere; a single synthetic frame was sampled at the
    /// source's current evaluation frame.
    #[error("no keyframes found; sampled a single frame at {frame}")]
    NoKeyframes { frame: i32 },
}

/// A finished assembly: the clip plus any warnings collected along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub clip: AnimationClip,
    pub warnings: Vec<ExportWarning>,
}

/// Assemble a clip from a pose source, sampling every integer frame in the
/// effective range.
pub fn assemble<S: PoseSource>(source: &S, settings: &ExportSettings) -> Result<Export, ClipError> {
    assemble_with_progress(source, settings, |_, _| true)
}

/// [`assemble`] with a cooperative progress callback.
///
/// The callback receives `(frames_done, frames_total)` at each frame boundary
/// (never mid-frame). Returning `false` aborts with [`ClipError::Cancelled`]
/// and produces nothing.
pub fn assemble_with_progress<S, P>(
    source: &S,
    settings: &ExportSettings,
    mut progress: P,
) -> Result<Export, ClipError>
where
    S: PoseSource,
    P: FnMut(usize, usize) -> bool,
{
    let mut clip = AnimationClip::new(
        settings.gender,
        settings.frame_rate,
        settings.betas.clone(),
        settings.layout,
    )?;
    let mut warnings = Vec::new();

    let resolution = schema::resolve(source);
    if !resolution.missing.is_empty() {
        warn!(
            "{} canonical joints missing from rig, slots stay zero",
            resolution.missing.len()
        );
        warnings.push(ExportWarning::MissingJoints {
            names: resolution.missing.clone(),
        });
    }

    let range = match settings.range {
        Some(range) => range,
        None => match scan_frame_range(source, resolution.resolved_bones()) {
            Some(range) => range,
            None => {
                let frame = source.current_frame();
                warnings.push(ExportWarning::NoKeyframes { frame });
                FrameRange::single(frame)
            }
        },
    };
    let total = range.len();
    debug!(
        "assembling frames {}..={} ({} samples)",
        range.start(),
        range.end(),
        total
    );

    let slots: Vec<JointSlot> = schema::slots().collect();
    // Continuity memory is tracked per joint slot, never shared.
    let mut previous: Vec<Option<nalgebra::Vector3<f32>>> = vec![None; slots.len()];
    let mut previous_root: Option<nalgebra::Vector3<f32>> = None;
    let root_resolved = resolution.has_root();

    clip.frames.reserve(total);
    for (done, frame) in range.frames().enumerate() {
        if !progress(done, total) {
            return Err(ClipError::Cancelled);
        }
        if done % 50 == 0 {
            debug!("sampling frame {frame} ({done}/{total})");
        }

        let mut sample = FrameSample::zeroed(frame);
        if root_resolved {
            if let Some(q) = source.local_rotation(ROOT_JOINT, frame) {
                sample.root_orient = rotation::extract(&q, previous_root);
                previous_root = Some(sample.root_orient);
            }
            if let Some(t) = source.world_translation(ROOT_JOINT, frame) {
                sample.trans = t;
            }
        }

        for (i, slot) in slots.iter().enumerate() {
            let Some(bone) = resolution.bone_for(slot) else {
                continue;
            };
            let Some(q) = source.local_rotation(bone, frame) else {
                continue;
            };
            let v = rotation::extract(&q, previous[i]);
            previous[i] = Some(v);
            sample.group_mut(slot.group)[slot.index] = v;
        }

        clip.frames.push(sample);
    }
    progress(total, total);

    debug_assert_eq!(clip.len(), total);
    Ok(Export { clip, warnings })
}
