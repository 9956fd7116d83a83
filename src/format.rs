//! Display helpers for file names and compiler output.

use crate::ast::CompileSuccess;

const SHORTEN_LIMIT: usize = 21;
const SHORTEN_KEEP: usize = 10;

/// Collapse long strings to `head ... tail`, keeping 10 characters on each side.
pub fn shorten(s: &str) -> String {
    let len = s.chars().count();
    if len < SHORTEN_LIMIT {
        return s.to_string();
    }
    let head: String = s.chars().take(SHORTEN_KEEP).collect();
    let tail: String = s.chars().skip(len - SHORTEN_KEEP).collect();
    format!("{} ... {}", head, tail)
}

/// Message shown in the compiler output pane after a successful build.
pub fn build_summary(success: &CompileSuccess) -> String {
    format!(
        "Build successful:\n    {} filetype declarations\n    {} stage declarations\n    {} pipeline declarations",
        success.filetype_count(),
        success.stage_count(),
        success.pipeline_count()
    )
}
