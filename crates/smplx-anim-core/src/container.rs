//! Named-array binary container.
//!
//! On disk: an 8-byte magic, a little-endian u16 format version, then a
//! bincode payload of ordered `(name, entry)` pairs. Entries are text
//! scalars, f32 scalars, or f32 arrays with an explicit shape. All numeric
//! data is 32-bit float.
//!
//! A clip maps to the entries of the AMASS convention: `gender`,
//! `surface_model_type`, `mocap_frame_rate`, `betas` (16), `root_orient`
//! (Nx3), `trans` (Nx3), `poses` (NxP with P per [`PosesLayout`]),
//! `pose_body` (Nx63), `pose_hand` (Nx90), `pose_jaw` (Nx9), `pose_eye`
//! (Nx9). Reads validate every shape and never silently reshape.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::info;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::clip::{AnimationClip, FrameSample, Gender, PosesLayout, BETAS_LEN};
use crate::error::ClipError;
use crate::schema::JointGroup;

/// File magic, first 8 bytes of every container.
pub const MAGIC: &[u8; 8] = b"SMPLXANM";

/// Current format version.
pub const VERSION: u16 = 1;

/// One named value inside a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entry {
    Text(String),
    Scalar(f32),
    Array { shape: Vec<usize>, data: Vec<f32> },
}

impl Entry {
    fn kind(&self) -> &'static str {
        match self {
            Entry::Text(_) => "text",
            Entry::Scalar(_) => "scalar",
            Entry::Array { .. } => "array",
        }
    }
}

/// An ordered set of named entries; the serializable unit of the format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Archive {
    entries: Vec<(String, Entry)>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry, keeping first-insertion order.
    pub fn insert(&mut self, name: impl Into<String>, entry: Entry) {
        let name = name.into();
        if let Some(existing) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = entry;
        } else {
            self.entries.push((name, entry));
        }
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find_map(|(n, e)| (n == name).then_some(e))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    fn require(&self, name: &str) -> Result<&Entry, ClipError> {
        self.get(name).ok_or_else(|| ClipError::MissingEntry {
            name: name.to_string(),
        })
    }

    fn text(&self, name: &str) -> Result<&str, ClipError> {
        match self.require(name)? {
            Entry::Text(s) => Ok(s),
            other => Err(wrong_kind(name, "text", other)),
        }
    }

    fn scalar(&self, name: &str) -> Result<f32, ClipError> {
        match self.require(name)? {
            Entry::Scalar(v) => Ok(*v),
            other => Err(wrong_kind(name, "scalar", other)),
        }
    }

    fn array(&self, name: &str) -> Result<(&[usize], &[f32]), ClipError> {
        match self.require(name)? {
            Entry::Array { shape, data } => Ok((shape, data)),
            other => Err(wrong_kind(name, "array", other)),
        }
    }

    /// A 2-D array validated to exactly `rows x cols`.
    fn matrix(&self, name: &str, rows: usize, cols: usize) -> Result<&[f32], ClipError> {
        let (shape, data) = self.array(name)?;
        if shape != [rows, cols] {
            return Err(ClipError::ShapeMismatch {
                name: name.to_string(),
                expected: format!("({rows}x{cols})"),
                actual: shape_string(shape),
            });
        }
        Ok(data)
    }

    /// Check that every array's element count matches its declared shape.
    fn validate_sizes(&self) -> Result<(), ClipError> {
        for (name, entry) in &self.entries {
            if let Entry::Array { shape, data } = entry {
                let expected: usize = shape.iter().product();
                if data.len() != expected {
                    return Err(ClipError::InvalidEntry {
                        name: name.clone(),
                        reason: format!(
                            "declared shape {} holds {expected} elements, found {}",
                            shape_string(shape),
                            data.len()
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

fn wrong_kind(name: &str, expected: &str, actual: &Entry) -> ClipError {
    ClipError::InvalidEntry {
        name: name.to_string(),
        reason: format!("expected a {expected} entry, found {}", actual.kind()),
    }
}

fn shape_string(shape: &[usize]) -> String {
    let dims: Vec<String> = shape.iter().map(|d| d.to_string()).collect();
    format!("({})", dims.join("x"))
}

/// Write a raw archive. The data goes to a sibling temporary file first and
/// is renamed into place only on full success, so a failed write leaves no
/// partial container behind.
pub fn write_archive(path: &Path, archive: &Archive) -> Result<(), ClipError> {
    let tmp = temp_sibling(path);
    let result = (|| -> Result<(), ClipError> {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;
        bincode::serialize_into(&mut writer, archive)?;
        writer.flush()?;
        Ok(())
    })();
    if let Err(err) = result {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

/// Read a raw archive, checking magic, version, and per-entry shape/size
/// consistency.
pub fn read_archive(path: &Path) -> Result<Archive, ClipError> {
    let mut reader = BufReader::new(File::open(path)?);

    let mut magic = [0u8; 8];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(ClipError::UnsupportedContainer {
            reason: "bad magic".to_string(),
        });
    }
    let mut version = [0u8; 2];
    reader.read_exact(&mut version)?;
    let version = u16::from_le_bytes(version);
    if version != VERSION {
        return Err(ClipError::UnsupportedContainer {
            reason: format!("unknown format version {version}"),
        });
    }

    let archive: Archive = bincode::deserialize_from(&mut reader)?;
    archive.validate_sizes()?;
    Ok(archive)
}

/// Build the named-array form of a clip.
pub fn archive_from_clip(clip: &AnimationClip) -> Result<Archive, ClipError> {
    clip.validate()?;
    let n = clip.len();

    let mut archive = Archive::new();
    archive.insert("gender", Entry::Text(clip.gender.as_str().to_string()));
    archive.insert(
        "surface_model_type",
        Entry::Text(clip.surface_model_type.clone()),
    );
    archive.insert("mocap_frame_rate", Entry::Scalar(clip.frame_rate));
    archive.insert(
        "betas",
        Entry::Array {
            shape: vec![BETAS_LEN],
            data: clip.betas.clone(),
        },
    );

    let mut root_orient = Vec::with_capacity(n * 3);
    let mut trans = Vec::with_capacity(n * 3);
    let mut poses = Vec::with_capacity(n * clip.layout.width());
    for frame in &clip.frames {
        root_orient.extend_from_slice(frame.root_orient.as_slice());
        trans.extend_from_slice(frame.trans.as_slice());
        poses.extend(frame.poses_row(clip.layout));
    }
    archive.insert(
        "root_orient",
        Entry::Array {
            shape: vec![n, 3],
            data: root_orient,
        },
    );
    archive.insert(
        "trans",
        Entry::Array {
            shape: vec![n, 3],
            data: trans,
        },
    );
    archive.insert(
        "poses",
        Entry::Array {
            shape: vec![n, clip.layout.width()],
            data: poses,
        },
    );

    for (name, group) in [
        ("pose_body", JointGroup::Body),
        ("pose_hand", JointGroup::Hand),
        ("pose_jaw", JointGroup::Jaw),
        ("pose_eye", JointGroup::Eye),
    ] {
        let mut data = Vec::with_capacity(n * group.scalar_width());
        for frame in &clip.frames {
            for v in frame.group(group) {
                data.extend_from_slice(v.as_slice());
            }
        }
        archive.insert(
            name,
            Entry::Array {
                shape: vec![n, group.scalar_width()],
                data,
            },
        );
    }

    Ok(archive)
}

/// Reconstruct a clip, hard-failing on any shape disagreement.
///
/// Source frame indices are not part of the on-disk convention, so read-back
/// samples are renumbered from zero.
pub fn clip_from_archive(archive: &Archive) -> Result<AnimationClip, ClipError> {
    archive.validate_sizes()?;

    let gender_str = archive.text("gender")?;
    let gender = Gender::parse(gender_str).ok_or_else(|| ClipError::InvalidEntry {
        name: "gender".to_string(),
        reason: format!("unknown gender '{gender_str}'"),
    })?;
    let surface_model_type = archive.text("surface_model_type")?.to_string();
    let frame_rate = archive.scalar("mocap_frame_rate")?;
    if frame_rate <= 0.0 || !frame_rate.is_finite() {
        return Err(ClipError::InvalidFrameRate { rate: frame_rate });
    }

    let (betas_shape, betas) = archive.array("betas")?;
    if betas_shape != [BETAS_LEN] {
        return Err(ClipError::ShapeMismatch {
            name: "betas".to_string(),
            expected: format!("({BETAS_LEN})"),
            actual: shape_string(betas_shape),
        });
    }

    // root_orient fixes the leading dimension; every per-frame array must
    // agree with it.
    let (root_shape, _) = archive.array("root_orient")?;
    let n = match root_shape {
        [n, 3] => *n,
        _ => {
            return Err(ClipError::ShapeMismatch {
                name: "root_orient".to_string(),
                expected: "(Nx3)".to_string(),
                actual: shape_string(root_shape),
            })
        }
    };

    let (poses_shape, _) = archive.array("poses")?;
    let layout = match poses_shape {
        [rows, width] if *rows == n => {
            PosesLayout::from_width(*width).ok_or_else(|| ClipError::ShapeMismatch {
                name: "poses".to_string(),
                expected: "(Nx162) or (Nx171)".to_string(),
                actual: shape_string(poses_shape),
            })?
        }
        _ => {
            return Err(ClipError::ShapeMismatch {
                name: "poses".to_string(),
                expected: format!("({n}xP)"),
                actual: shape_string(poses_shape),
            })
        }
    };

    let root_orient = archive.matrix("root_orient", n, 3)?;
    let trans = archive.matrix("trans", n, 3)?;
    let body = archive.matrix("pose_body", n, JointGroup::Body.scalar_width())?;
    let hand = archive.matrix("pose_hand", n, JointGroup::Hand.scalar_width())?;
    let jaw = archive.matrix("pose_jaw", n, JointGroup::Jaw.scalar_width())?;
    let eye = archive.matrix("pose_eye", n, JointGroup::Eye.scalar_width())?;

    let mut clip = AnimationClip::new(gender, frame_rate, betas.to_vec(), layout)?;
    clip.surface_model_type = surface_model_type;
    clip.frames.reserve(n);
    for i in 0..n {
        let mut sample = FrameSample::zeroed(i as i32);
        sample.root_orient = vector_at(root_orient, i);
        sample.trans = vector_at(trans, i);
        fill_group(&mut sample.body, body, i);
        fill_group(&mut sample.hand, hand, i);
        fill_group(&mut sample.jaw, jaw, i);
        fill_group(&mut sample.eye, eye, i);
        clip.frames.push(sample);
    }
    clip.validate()?;
    Ok(clip)
}

fn vector_at(data: &[f32], row: usize) -> Vector3<f32> {
    let base = row * 3;
    Vector3::new(data[base], data[base + 1], data[base + 2])
}

fn fill_group(target: &mut [Vector3<f32>], data: &[f32], row: usize) {
    let width = target.len() * 3;
    let base = row * width;
    for (j, v) in target.iter_mut().enumerate() {
        *v = Vector3::new(
            data[base + j * 3],
            data[base + j * 3 + 1],
            data[base + j * 3 + 2],
        );
    }
}

/// Serialize a clip to a container file.
pub fn write_clip(path: &Path, clip: &AnimationClip) -> Result<(), ClipError> {
    let archive = archive_from_clip(clip)?;
    write_archive(path, &archive)?;
    info!(
        "wrote {} frames ({} poses columns) to {}",
        clip.len(),
        clip.layout.width(),
        path.display()
    );
    Ok(())
}

/// Read and validate a container file back into a clip.
pub fn read_clip(path: &Path) -> Result<AnimationClip, ClipError> {
    let archive = read_archive(path)?;
    clip_from_archive(&archive)
}
