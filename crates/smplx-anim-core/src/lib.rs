//! SMPL-X Animation Core
//!
//! Host-agnostic conversion of skeletal animation into the SMPL-X
//! pose-parameter representation of the AMASS convention, plus a named-array
//! binary container for persisting it. The host (a DCC scene graph, an
//! offline animation library) plugs in through the [`PoseSource`] trait; the
//! playback side lives in the companion `smplx-anim-player` crate.

pub mod assemble;
pub mod clip;
pub mod container;
pub mod error;
pub mod range;
pub mod rotation;
pub mod schema;
pub mod source;

// Re-export common types for convenience
pub use assemble::{assemble, assemble_with_progress, Export, ExportSettings, ExportWarning};
pub use clip::{AnimationClip, FrameSample, Gender, PosesLayout, BETAS_LEN, SURFACE_MODEL_TYPE};
pub use container::{read_clip, write_clip, Archive, Entry};
pub use error::ClipError;
pub use range::{scan_frame_range, FrameRange};
pub use schema::{JointGroup, JointSlot, SchemaResolution, ROOT_JOINT};
pub use source::PoseSource;

/// Crate-wide result type
pub type Result<T> = core::result::Result<T, ClipError>;
