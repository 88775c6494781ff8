//! Key frame text format
//!
//! One orientation per line as `w x y z`, in joint order. Comment and blank
//! lines follow the skeleton format rules. Orientations are normalized on read.

use std::path::Path;

use crate::animation::KeyFrame;
use crate::assets::content_lines;
use crate::errors::{Result, RigError};
use crate::math::Quaternion;

pub fn load_key_frame(path: impl AsRef<Path>) -> Result<KeyFrame> {
    let text = std::fs::read_to_string(path)?;
    parse_key_frame(&text)
}

pub fn parse_key_frame(text: &str) -> Result<KeyFrame> {
    content_lines(text)
        .map(|(line, content)| {
            let q: Quaternion = content.parse().map_err(|err: RigError| RigError::Parse {
                line,
                message: err.to_string(),
            })?;
            q.try_normalized().ok_or_else(|| RigError::Parse {
                line,
                message: "zero-length orientation".to_string(),
            })
        })
        .collect()
}

#[must_use]
pub fn write_key_frame(frame: &KeyFrame) -> String {
    frame.iter().map(|q| format!("{q}\n")).collect()
}
