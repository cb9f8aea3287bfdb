//! ATX heading scanner and section lookup.
//!
//! Sections are flat: a `##` heading under a `#` heading produces two
//! independent entries, and the level is metadata only. Hierarchy matters only
//! when [`get_section_content`] decides where a section ends.

use std::sync::LazyLock;

use regex::Regex;

use crate::fence::FenceTracker;
use crate::plain::remove_markdown;

static HEADING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})[ \t]+(.+)$").unwrap());

/// One heading-delimited region of a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    /// Heading text with inline Markdown stripped.
    pub title: String,
    /// Heading text as written, without the `#` markers.
    pub heading: String,
    /// Number of leading `#` characters (1-6).
    pub level: u8,
    /// Document text from this heading up to the next heading, trimmed.
    pub content: String,
    /// Byte offset of the heading line.
    pub start_pos: usize,
    /// Byte offset where the next heading starts, or the document length.
    pub end_pos: usize,
}

impl Section {
    fn open(level: u8, heading: &str, start_pos: usize, doc_len: usize) -> Self {
        Self {
            title: remove_markdown(strip_closing_sequence(heading)).trim().to_owned(),
            heading: heading.to_owned(),
            level,
            content: String::new(),
            start_pos,
            end_pos: doc_len,
        }
    }

    fn close(&mut self, markdown: &str, end_pos: usize) {
        self.end_pos = end_pos;
        self.content = markdown[self.start_pos..end_pos].trim().to_owned();
    }

    /// Whether `title` names this section, by stripped title or verbatim heading.
    #[must_use]
    pub fn matches_title(&self, title: &str) -> bool {
        self.title == title || self.heading == title
    }
}

/// Parse a single line as an ATX heading, returning level and trimmed text.
fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let caps = HEADING_PATTERN.captures(line)?;
    let level = u8::try_from(caps.get(1)?.as_str().len()).ok()?;
    Some((level, caps.get(2)?.as_str().trim()))
}

/// Drop an optional closing `#` run (`## Title ##` -> `Title`).
///
/// The run only counts when whitespace separates it from the text.
fn strip_closing_sequence(heading: &str) -> &str {
    let without_hashes = heading.trim_end_matches('#');
    if without_hashes.len() == heading.len() {
        return heading;
    }
    if without_hashes.is_empty() {
        return "";
    }
    if without_hashes.ends_with([' ', '\t']) {
        without_hashes.trim_end()
    } else {
        heading
    }
}

/// Split a Markdown document into sections keyed by ATX headings.
///
/// Text before the first heading is not part of any section. Headings inside
/// fenced code blocks are ignored.
///
/// # Examples
///
/// ```
/// use mdembed_sections::parse_sections;
///
/// let sections = parse_sections("# A\nbody1\n## B\nbody2");
/// assert_eq!(sections.len(), 2);
/// assert_eq!(sections[0].content, "# A\nbody1");
/// assert_eq!(sections[1].level, 2);
/// ```
#[must_use]
pub fn parse_sections(markdown: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut fence = FenceTracker::new();
    let mut offset = 0;

    for line in markdown.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        if fence.update(line) {
            continue;
        }

        let Some((level, heading)) = parse_heading(line.trim_end_matches(['\n', '\r'])) else {
            continue;
        };

        if let Some(previous) = sections.last_mut() {
            previous.close(markdown, line_start);
        }
        sections.push(Section::open(level, heading, line_start, markdown.len()));
    }

    if let Some(last) = sections.last_mut() {
        last.close(markdown, markdown.len());
    }

    sections
}

/// Index of the first section named `title` (see [`Section::matches_title`]).
#[must_use]
pub fn find_section(sections: &[Section], title: &str) -> Option<usize> {
    sections.iter().position(|s| s.matches_title(title))
}

/// Extract the body of the section named `section_title`.
///
/// The section runs until the next heading of the same or a higher level, so
/// deeper subsections are included. The heading line itself is removed.
///
/// - Empty `markdown` returns an empty string.
/// - Empty or whitespace-only `section_title` returns the whole document.
/// - An unknown title returns an empty string.
///
/// # Examples
///
/// ```
/// use mdembed_sections::get_section_content;
///
/// let doc = "# A\nbody1\n## B\nbody2\n# C\nbody3";
/// assert_eq!(get_section_content(doc, "A"), "body1\n## B\nbody2");
/// assert_eq!(get_section_content(doc, "Nonexistent"), "");
/// ```
#[must_use]
pub fn get_section_content(markdown: &str, section_title: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }
    if section_title.trim().is_empty() {
        return markdown.to_owned();
    }

    let sections = parse_sections(markdown);
    let Some(index) = find_section(&sections, section_title) else {
        return String::new();
    };
    let target = &sections[index];

    let end = sections[index + 1..]
        .iter()
        .find(|s| s.level <= target.level)
        .map_or(markdown.len(), |s| s.start_pos);

    let full = markdown[target.start_pos..end].trim();
    let body = full.split_once('\n').map_or("", |(_, rest)| rest);
    body.trim().to_owned()
}
