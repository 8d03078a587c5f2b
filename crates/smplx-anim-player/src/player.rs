//! Stateful clip player.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use smplx_anim_core::schema::{JointGroup, ROOT_JOINT};
use smplx_anim_core::{container, rotation, AnimationClip, FrameSample, Result};

use crate::sink::PoseSink;

/// Current playback state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// What happens when the cursor passes the last frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopMode {
    /// Hold the last frame and stop.
    #[default]
    Once,
    /// Wrap back to the first frame.
    Loop,
}

/// Plays an [`AnimationClip`] into a [`PoseSink`] at the clip's frame rate.
#[derive(Debug, Clone)]
pub struct ClipPlayer {
    clip: AnimationClip,
    state: PlaybackState,
    loop_mode: LoopMode,
    /// Seconds into the clip, in [0, duration).
    cursor: f64,
}

impl ClipPlayer {
    /// Wrap a clip in a player. The clip is validated up front (N >= 1,
    /// invariant group lengths) so the cursor math below never sees an
    /// empty timeline.
    pub fn new(clip: AnimationClip) -> Result<Self> {
        clip.validate()?;
        Ok(Self {
            clip,
            state: PlaybackState::Stopped,
            loop_mode: LoopMode::Once,
            cursor: 0.0,
        })
    }

    /// Load a container file and wrap it in a player.
    pub fn from_file(path: &Path) -> Result<Self> {
        let clip = container::read_clip(path)?;
        info!(
            "loaded {} frames at {} fps from {}",
            clip.len(),
            clip.frame_rate,
            path.display()
        );
        Self::new(clip)
    }

    #[inline]
    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    #[inline]
    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.loop_mode = mode;
    }

    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Stop and rewind to the first frame.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.cursor = 0.0;
    }

    /// Index of the frame under the cursor.
    pub fn current_frame(&self) -> usize {
        let frame = (self.cursor * self.clip.frame_rate as f64).floor() as usize;
        frame.min(self.clip.len().saturating_sub(1))
    }

    /// Advance the cursor by `dt` seconds and return the new frame index.
    /// Only moves while playing. In `Once` mode the player holds the last
    /// frame and stops; in `Loop` mode the cursor wraps.
    pub fn advance(&mut self, dt: f64) -> usize {
        if self.state != PlaybackState::Playing || dt <= 0.0 {
            return self.current_frame();
        }
        let duration = self.clip.duration_seconds();
        self.cursor += dt;
        if self.cursor >= duration {
            match self.loop_mode {
                LoopMode::Loop => {
                    self.cursor %= duration;
                }
                LoopMode::Once => {
                    self.cursor = duration;
                    self.state = PlaybackState::Stopped;
                    return self.clip.len() - 1;
                }
            }
        }
        self.current_frame()
    }

    /// Push the current frame through the sink.
    pub fn apply<S: PoseSink>(&self, sink: &mut S) {
        self.apply_frame(self.current_frame(), sink);
    }

    /// Push a specific frame through the sink: root translation, root
    /// rotation, then body, hand, and face joints in schema order. The eye
    /// group mirrors the jaw group, so the face joints are applied once.
    pub fn apply_frame<S: PoseSink>(&self, index: usize, sink: &mut S) {
        let Some(sample) = self.clip.frames.get(index) else {
            return;
        };
        sink.set_root_translation(sample.trans);
        sink.set_local_rotation(ROOT_JOINT, rotation::to_quaternion(&sample.root_orient));
        for group in [JointGroup::Body, JointGroup::Hand, JointGroup::Jaw] {
            apply_group(sample, group, sink);
        }
    }
}

fn apply_group<S: PoseSink>(sample: &FrameSample, group: JointGroup, sink: &mut S) {
    for (name, axis_angle) in group.joint_names().iter().zip(sample.group(group)) {
        sink.set_local_rotation(name, rotation::to_quaternion(axis_angle));
    }
}
