//! Splits a story into per-panel prompts.
//!
//! This is a best-effort heuristic: a story that does not come back as
//! exactly four non-empty lines is reused whole for every panel.

use crate::constants::PANEL_COUNT;

/// Returns the four panel prompts for `story`.
pub fn split_panels(story: &str) -> [String; PANEL_COUNT] {
    let lines: Vec<&str> = story.split('\n').filter(|line| !line.is_empty()).collect();
    match <[&str; PANEL_COUNT]>::try_from(lines) {
        Ok(lines) => lines.map(str::to_string),
        Err(_) => std::array::from_fn(|_| story.to_string()),
    }
}
