//! SMPL-X Animation Player
//!
//! Companion read path for `smplx-anim-core`: loads a pose container and
//! drives a skeleton through the [`PoseSink`] trait frame by frame.

pub mod player;
pub mod sink;

pub use player::{ClipPlayer, LoopMode, PlaybackState};
pub use sink::PoseSink;

pub use smplx_anim_core::{AnimationClip, ClipError, Result};
