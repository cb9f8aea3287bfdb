//! Byte ranges that rewrite passes must leave untouched.
//!
//! Ranges come from the `pulldown-cmark` offset iterator, so code spans,
//! fenced and indented code blocks, links and HTML tags are located the way a
//! renderer would see them. Rewrites never touch the source text inside them.

use std::ops::Range;
use std::sync::LazyLock;

use pulldown_cmark::{Event, Options, Parser, Tag};
use regex::Regex;

/// A single HTML tag or comment, possibly spanning lines.
static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|<[^>]*>").unwrap());

/// Which constructs a pass treats as off limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    /// Inline code spans and code blocks.
    Code,
    /// Code plus links, images and HTML tags. Text between the tags of an
    /// HTML block stays rewritable.
    CodeAndMarkup,
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Sorted, non-overlapping protected ranges of one document.
#[derive(Debug, Default)]
pub(crate) struct ProtectedRanges {
    ranges: Vec<Range<usize>>,
}

impl ProtectedRanges {
    pub(crate) fn scan(text: &str, scope: Scope) -> Self {
        let mut protected = Self::default();
        let markup = scope == Scope::CodeAndMarkup;

        for (event, range) in Parser::new_ext(text, parser_options()).into_offset_iter() {
            match event {
                Event::Start(Tag::CodeBlock(_)) | Event::Code(_) => protected.push(range),
                Event::Start(Tag::Link { .. } | Tag::Image { .. }) | Event::InlineHtml(_)
                    if markup =>
                {
                    protected.push(range);
                }
                Event::Start(Tag::HtmlBlock) if markup => {
                    for tag in HTML_TAG.find_iter(&text[range.clone()]) {
                        protected.push(range.start + tag.start()..range.start + tag.end());
                    }
                }
                _ => {}
            }
        }

        protected
    }

    /// Add a range. Events arrive in document order, so starts never decrease.
    fn push(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        match self.ranges.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => self.ranges.push(range),
        }
    }

    /// End of the first protected range overlapping `span`, if any.
    pub(crate) fn overlap_end(&self, span: &Range<usize>) -> Option<usize> {
        let idx = self.ranges.partition_point(|r| r.end <= span.start);
        self.ranges
            .get(idx)
            .filter(|r| r.start < span.end)
            .map(|r| r.end)
    }

    #[cfg(test)]
    fn as_slice(&self) -> &[Range<usize>] {
        &self.ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inline_code_is_protected() {
        let text = "see `DEMO-1` here";
        let ranges = ProtectedRanges::scan(text, Scope::Code);

        assert_eq!(ranges.as_slice(), &[4..12]);
        assert_eq!(&text[4..12], "`DEMO-1`");
    }

    #[test]
    fn test_fenced_block_is_protected() {
        let text = "before\n\n```\nDEMO-1\n```\n\nafter";
        let ranges = ProtectedRanges::scan(text, Scope::Code);

        assert_eq!(ranges.as_slice().len(), 1);
        let block = &text[ranges.as_slice()[0].clone()];
        assert!(block.starts_with("```"));
        assert!(block.contains("DEMO-1"));
        assert!(!block.contains("after"));
    }

    #[test]
    fn test_links_only_protected_with_markup_scope() {
        let text = "[DEMO-1](/issue/DEMO-1) and text";

        assert!(ProtectedRanges::scan(text, Scope::Code).as_slice().is_empty());
        assert_eq!(
            ProtectedRanges::scan(text, Scope::CodeAndMarkup).as_slice(),
            &[0..23]
        );
    }

    #[test]
    fn test_inline_html_protected_with_markup_scope() {
        let text = r#"a <img src="/f" alt="DEMO-1" /> b"#;
        let ranges = ProtectedRanges::scan(text, Scope::CodeAndMarkup);

        assert_eq!(ranges.as_slice().len(), 1);
        assert!(text[ranges.as_slice()[0].clone()].starts_with("<img"));
    }

    #[test]
    fn test_nested_code_in_link_is_merged() {
        let text = "[`x`](/y) z";
        let ranges = ProtectedRanges::scan(text, Scope::CodeAndMarkup);

        assert_eq!(ranges.as_slice(), &[0..9]);
    }

    #[test]
    fn test_overlap_end() {
        let ranges = ProtectedRanges::scan("ab `cd` ef `gh`", Scope::Code);

        assert_eq!(ranges.overlap_end(&(0..2)), None);
        assert_eq!(ranges.overlap_end(&(2..4)), Some(7));
        assert_eq!(ranges.overlap_end(&(7..10)), None);
        assert_eq!(ranges.overlap_end(&(9..12)), Some(15));
    }

    #[test]
    fn test_html_block_protects_tags_only() {
        let text = "<div>\nsee DEMO-5\n</div>";
        let ranges = ProtectedRanges::scan(text, Scope::CodeAndMarkup);

        assert_eq!(ranges.as_slice(), &[0..5, 17..23]);
        assert_eq!(ranges.overlap_end(&(10..16)), None);
    }

    #[test]
    fn test_html_block_comment_spanning_lines() {
        let text = "<!-- DEMO-1\nDEMO-2 -->\nafter";
        let ranges = ProtectedRanges::scan(text, Scope::CodeAndMarkup);

        assert_eq!(ranges.as_slice(), &[0..22]);
    }

    #[test]
    fn test_html_block_ignored_with_code_scope() {
        assert!(
            ProtectedRanges::scan("<div>\nDEMO-5\n</div>", Scope::Code)
                .as_slice()
                .is_empty()
        );
    }
}
