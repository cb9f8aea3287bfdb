//! Bare entity ID linkification.

use std::ops::Range;
use std::sync::LazyLock;

use mdembed_entity::entity_url;
use regex::Regex;

use crate::protected::{ProtectedRanges, Scope};

static ISSUE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z][A-Z0-9]+-(?:A-)?[0-9]+").unwrap());

static ISSUE_ID_ANY_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[A-Z][A-Z0-9]+-(?:A-)?[0-9]+").unwrap());

pub(crate) fn id_pattern(case_insensitive: bool) -> &'static Regex {
    if case_insensitive {
        &ISSUE_ID_ANY_CASE
    } else {
        &ISSUE_ID
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Whether the ID at `span` stands alone and is not link text or a link target.
fn is_bare(content: &str, span: &Range<usize>) -> bool {
    let before = &content[..span.start];
    let after = &content[span.end..];

    let glued_before = before
        .chars()
        .next_back()
        .is_some_and(|c| is_word_char(c) || c == '[')
        || before.ends_with("](");
    let glued_after = after
        .chars()
        .next()
        .is_some_and(|c| is_word_char(c) || c == ']' || c == ')');

    !glued_before && !glued_after
}

/// Rewrite bare IDs matched by `pattern` as `[ID]({base_url}/{kind}/{ID})`.
pub(crate) fn linkify(content: &str, pattern: &Regex, base_url: &str) -> String {
    let protected = ProtectedRanges::scan(content, Scope::CodeAndMarkup);
    let mut out = String::with_capacity(content.len());
    let mut copied = 0;
    let mut pos = 0;
    let mut linked = 0usize;

    while let Some(m) = pattern.find_at(content, pos) {
        let span = m.range();

        if let Some(end) = protected.overlap_end(&span) {
            pos = end;
            continue;
        }
        if !is_bare(content, &span) {
            pos = span.start + content[span.start..].chars().next().map_or(1, char::len_utf8);
            continue;
        }

        let id = m.as_str();
        out.push_str(&content[copied..span.start]);
        out.push('[');
        out.push_str(id);
        out.push_str("](");
        out.push_str(&entity_url(id, base_url));
        out.push(')');
        copied = span.end;
        pos = span.end;
        linked += 1;
    }

    out.push_str(&content[copied..]);
    tracing::trace!(linked, "Linked entity IDs");
    out
}

/// Convert bare entity IDs (`PROJECT-123`, `PROJECT-A-123`) into relative links.
///
/// IDs inside code spans, code blocks, existing links and HTML tags are left
/// alone, so running this on its own output changes nothing.
///
/// # Examples
///
/// ```
/// use mdembed_transform::convert_issue_ids_to_links;
///
/// let linked = convert_issue_ids_to_links("Fix DEMO-1");
/// assert_eq!(linked, "Fix [DEMO-1](/issue/DEMO-1)");
/// assert_eq!(convert_issue_ids_to_links(&linked), linked);
/// ```
#[must_use]
pub fn convert_issue_ids_to_links(content: &str) -> String {
    linkify(content, id_pattern(false), "")
}
