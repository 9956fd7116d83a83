//! Source locations embedded in compiler diagnostics.

use std::sync::LazyLock;

use regex::Regex;

static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"on line (\d+):").expect("line pattern is a valid regex")
});

/// Extract the 1-based line number from a message containing `on line <n>:`.
///
/// Returns `None` when there is no match or the number does not fit a `u32`.
pub fn parse_error_location(message: &str) -> Option<u32> {
    let caps = LINE_PATTERN.captures(message)?;
    caps.get(1)?.as_str().parse().ok()
}
