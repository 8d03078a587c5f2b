//! Animated frame-range discovery.

use serde::{Deserialize, Serialize};

use crate::error::ClipError;
use crate::source::PoseSource;

/// Inclusive integer frame range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    start: i32,
    end: i32,
}

impl FrameRange {
    /// Create a range; `start > end` is rejected before any sampling happens.
    pub fn new(start: i32, end: i32) -> Result<Self, ClipError> {
        if start > end {
            return Err(ClipError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Single-frame range.
    #[inline]
    pub fn single(frame: i32) -> Self {
        Self {
            start: frame,
            end: frame,
        }
    }

    #[inline]
    pub fn start(&self) -> i32 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> i32 {
        self.end
    }

    /// Number of samples: end - start + 1, always >= 1.
    #[inline]
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Frames in increasing order.
    pub fn frames(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }
}

/// Find the true animated extent across the given bones.
///
/// Takes the union of every bone's keyframe frames (rotation and location
/// channels combined) and returns its min/max. Host timeline or playback
/// bounds are deliberately ignored: keys outside them still count. Returns
/// `None` when no bone has any keyframe; the caller decides the fallback
/// (typically a single frame at the source's current evaluation frame).
pub fn scan_frame_range<'a, S, I>(source: &S, bones: I) -> Option<FrameRange>
where
    S: PoseSource,
    I: IntoIterator<Item = &'a str>,
{
    let mut bounds: Option<(i32, i32)> = None;
    for bone in bones {
        for frame in source.keyframes(bone) {
            bounds = Some(match bounds {
                None => (frame, frame),
                Some((min, max)) => (min.min(frame), max.max(frame)),
            });
        }
    }
    bounds.map(|(start, end)| FrameRange { start, end })
}
