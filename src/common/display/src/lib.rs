//! Display utilities for fedplan.
//!
//! Renders plan trees for explain output and analysis records.

mod tree;

pub use tree::{DisplayTree, TreeNode};

/// Format a value for display with optional truncation.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Indent a multi-line string.
pub fn indent(s: &str, prefix: &str) -> String {
    s.lines()
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("a long criteria text", 10), "a long ...");
    }

    #[test]
    fn test_indent() {
        assert_eq!(indent("a\nb", "  "), "  a\n  b");
    }
}
