//! Fenced code block tracking for the line scanner.
//!
//! `#` lines inside a fenced block are code, not headings.

/// Fence state carried across lines.
///
/// An opening fence is three or more backticks or tildes indented by at most
/// three spaces. The block closes on a line of the same character that is at
/// least as long and carries nothing but whitespace after it.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<Fence>,
}

#[derive(Debug, Clone, Copy)]
struct Fence {
    ch: char,
    len: usize,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feed one line. Returns `true` if the line belongs to a fenced block,
    /// including the opening and closing fence lines themselves.
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let line = line.trim_end_matches(['\n', '\r']);

        match self.open {
            Some(fence) => {
                if closes(line, fence) {
                    self.open = None;
                }
                true
            }
            None => {
                self.open = opens(line);
                self.open.is_some()
            }
        }
    }
}

/// Leading spaces allowed before a fence marker.
const MAX_FENCE_INDENT: usize = 3;

fn strip_indent(line: &str) -> Option<&str> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    (indent <= MAX_FENCE_INDENT).then(|| &line[indent..])
}

fn run_length(s: &str, ch: char) -> usize {
    s.chars().take_while(|&c| c == ch).count()
}

fn opens(line: &str) -> Option<Fence> {
    let rest = strip_indent(line)?;
    let ch = rest.chars().next().filter(|&c| c == '`' || c == '~')?;
    let len = run_length(rest, ch);
    if len < 3 {
        return None;
    }
    // Backtick info strings may not contain backticks (```a``` is inline code).
    if ch == '`' && rest[len..].contains('`') {
        return None;
    }
    Some(Fence { ch, len })
}

fn closes(line: &str, fence: Fence) -> bool {
    let Some(rest) = strip_indent(line) else {
        return false;
    };
    let len = run_length(rest, fence.ch);
    len >= fence.len && rest[len..].trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines_are_not_code() {
        let mut tracker = FenceTracker::new();
        assert!(!tracker.update("# Heading\n"));
        assert!(!tracker.update("text\n"));
    }

    #[test]
    fn test_backtick_fence_covers_body_and_markers() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.update("```bash\n"));
        assert!(tracker.update("# not a heading\n"));
        assert!(tracker.update("```\n"));
        assert!(!tracker.update("# Heading\n"));
    }

    #[test]
    fn test_tilde_fence_ignores_backtick_close() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.update("~~~"));
        assert!(tracker.update("```"));
        assert!(tracker.update("# still code"));
        assert!(tracker.update("~~~~"));
        assert!(!tracker.update("after"));
    }

    #[test]
    fn test_shorter_close_does_not_end_block() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.update("````"));
        assert!(tracker.update("```"));
        assert!(tracker.update("# code"));
        assert!(tracker.update("````"));
        assert!(!tracker.update("# Heading"));
    }

    #[test]
    fn test_closing_fence_with_info_does_not_close() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.update("```"));
        assert!(tracker.update("```rust"));
        assert!(tracker.update("```\r\n"));
        assert!(!tracker.update("text"));
    }

    #[test]
    fn test_inline_triple_backticks_are_not_a_fence() {
        let mut tracker = FenceTracker::new();
        assert!(!tracker.update("```inline```"));
        assert!(!tracker.update("# Heading"));
    }

    #[test]
    fn test_deeply_indented_marker_is_not_a_fence() {
        let mut tracker = FenceTracker::new();
        assert!(!tracker.update("    ```"));
        assert!(tracker.update("   ```"));
        assert!(tracker.update("  ```"));
        assert!(!tracker.update("text"));
    }

    #[test]
    fn test_two_backticks_are_not_a_fence() {
        let mut tracker = FenceTracker::new();
        assert!(!tracker.update("``code``"));
    }
}
