//! Skeleton text format
//!
//! One joint per line:
//!
//! ```text
//! # index  x     y     z     parent
//! 0        0.0   0.0   0.0   -1
//! 1        0.0   0.5   0.0   0
//! ```
//!
//! Each position is stored as the joint's local offset, applied before the
//! parent link is made; the joint ends up at `parent_world + parent_rotation *
//! position`. `parent` is the index of an earlier joint or `-1` for the root.
//! `index` is expected to be the running joint count; a mismatch is logged and
//! otherwise ignored, joints are numbered by line order. Lines with any field
//! count other than five are rejected.

use std::path::Path;

use glam::Vec3;
use log::{debug, warn};

use crate::assets::content_lines;
use crate::errors::{Result, RigError};
use crate::scene::Skeleton;
use crate::settings::SkeletonSettings;

pub fn load_skeleton(path: impl AsRef<Path>) -> Result<Skeleton> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let skeleton = parse_skeleton(&text)?;
    debug!("loaded {} joints from {}", skeleton.len(), path.display());
    Ok(skeleton)
}

pub fn parse_skeleton(text: &str) -> Result<Skeleton> {
    parse_skeleton_with_settings(text, SkeletonSettings::default())
}

pub fn parse_skeleton_with_settings(text: &str, settings: SkeletonSettings) -> Result<Skeleton> {
    let mut skeleton = Skeleton::with_settings(settings);

    for (line, content) in content_lines(text) {
        let fields: Vec<&str> = content.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(RigError::Parse {
                line,
                message: format!("expected 'index x y z parent', got {} fields", fields.len()),
            });
        }

        let index: i64 = parse_field(line, "index", fields[0])?;
        let position = Vec3::new(
            parse_field(line, "x", fields[1])?,
            parse_field(line, "y", fields[2])?,
            parse_field(line, "z", fields[3])?,
        );
        let parent_index: i64 = parse_field(line, "parent", fields[4])?;

        let parent = match parent_index {
            -1 => None,
            p => {
                let parent = usize::try_from(p)
                    .ok()
                    .and_then(|p| skeleton.joint_id(p))
                    .ok_or_else(|| RigError::Parse {
                        line,
                        message: format!(
                            "parent {p} does not name one of the {} joints read so far",
                            skeleton.len()
                        ),
                    })?;
                Some(parent)
            }
        };

        let expected = skeleton.len();
        if usize::try_from(index).ok() != Some(expected) {
            warn!("line {line}: joint index {index} does not match position {expected}");
        }

        skeleton
            .add_joint(format!("joint_{expected}"), position, parent)
            .map_err(|err| RigError::Parse {
                line,
                message: err.to_string(),
            })?;
    }

    Ok(skeleton)
}

fn parse_field<T: std::str::FromStr>(line: usize, name: &str, field: &str) -> Result<T> {
    field.parse().map_err(|_| RigError::Parse {
        line,
        message: format!("{name} '{field}' is not a number"),
    })
}
