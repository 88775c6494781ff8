//! Text loaders
//!
//! Readers for the plain-text skeleton and key frame descriptions. Both
//! formats are line based, skip blank lines, and treat lines starting with
//! `#` as comments.

pub mod pose_file;
pub mod skeleton_file;

pub use pose_file::{load_key_frame, parse_key_frame, write_key_frame};
pub use skeleton_file::{load_skeleton, parse_skeleton, parse_skeleton_with_settings};

/// Non-empty, non-comment lines with their 1-based line numbers.
pub(crate) fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}
