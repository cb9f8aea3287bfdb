//! Markdown to plain text for titles and summaries.
//!
//! This is a best-effort linear sequence of substitutions, not a renderer.
//! Body content should go through a real Markdown renderer instead.

use std::sync::LazyLock;

use regex::{Captures, Regex};

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($re).unwrap());
    };
}

pattern!(AUTOLINK, r"<((?:https?://|mailto:)[^>\s]+)>");
pattern!(HTML_TAG, r"<[^>]*>");
pattern!(IMAGE, r"!\[.*?\]\(.*?\)");
pattern!(LINK, r"\[([^\]]+)\]\((.*?)\)");
pattern!(CODE_TRIPLE, r"(?s)```(.*?)```");
pattern!(CODE_DOUBLE, r"(?s)``(.*?)``");
pattern!(CODE_SINGLE, r"(?s)`(.*?)`");
pattern!(ATX_MARKER, r"(?m)^[ \t]{0,3}#{1,6}[ \t]+");
pattern!(SETEXT_EQUALS, r"(?m)^(.*)\n[ \t]*={2,}[ \t]*$");
pattern!(SETEXT_DASHES, r"(?m)^(.*)\n[ \t]*-{2,}[ \t]*$");
pattern!(BLOCKQUOTE, r"(?m)^[ \t]{0,3}>[ \t]?");
pattern!(LIST_MARKER, r"(?m)^[ \t]{0,3}(?:[*+-]|[0-9]+\.)[ \t]+");
pattern!(STRONG_EM_STARS, r"\*{3}([^*]+)\*{3}");
pattern!(STRONG_EM_UNDERSCORES, r"___([^_]+)___");
pattern!(BOLD_STARS, r"\*\*([^*]+)\*\*");
pattern!(BOLD_UNDERSCORES, r"__([^_]+)__");
pattern!(ITALIC_STAR, r"\*([^*]+)\*");
pattern!(ITALIC_UNDERSCORE, r"_([^_]+)_");
pattern!(STRIKETHROUGH, r"~~([^~]+)~~");
pattern!(ESCAPED_PUNCT, r"\\([\\`*_{}\[\]()#+\-.!>~|])");
pattern!(BLANK_RUNS, r"\n{2,}");

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replace matches of `re` with capture group 1, but only where the match is
/// not glued to a word character on either side.
///
/// Keeps `snake_case_words` intact while still unwrapping `_emphasis_`.
fn unwrap_at_word_boundary(text: &str, re: &Regex) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(caps) = re.captures_at(text, pos) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let before = text[..whole.start()].chars().next_back();
        let after = text[whole.end()..].chars().next();

        if before.is_some_and(is_word_char) || after.is_some_and(is_word_char) {
            pos = whole.start() + text[whole.start()..].chars().next().map_or(1, char::len_utf8);
            continue;
        }

        out.push_str(&text[copied..whole.start()]);
        out.push_str(inner.as_str());
        copied = whole.end();
        pos = whole.end();
    }

    out.push_str(&text[copied..]);
    out
}

fn group1(caps: &Captures<'_>) -> String {
    caps.get(1).map_or_else(String::new, |m| m.as_str().to_owned())
}

/// Strip Markdown syntax, keeping readable text.
///
/// Autolinks are unwrapped before HTML tags are removed so `<https://..>`
/// survives as its URL. Emphasis is unwrapped after HTML removal so literal
/// tags never turn into emphasis markers.
///
/// # Examples
///
/// ```
/// use mdembed_sections::remove_markdown;
///
/// assert_eq!(remove_markdown("## **Fix** [login](/issue/DEMO-1)"), "Fix login");
/// assert_eq!(remove_markdown("keep snake_case_words"), "keep snake_case_words");
/// ```
#[must_use]
pub fn remove_markdown(md: &str) -> String {
    let text = AUTOLINK.replace_all(md, group1);
    let text = HTML_TAG.replace_all(&text, "");
    let text = IMAGE.replace_all(&text, "");
    let text = LINK.replace_all(&text, group1);
    let text = CODE_TRIPLE.replace_all(&text, group1);
    let text = CODE_DOUBLE.replace_all(&text, group1);
    let text = CODE_SINGLE.replace_all(&text, group1);
    let text = ATX_MARKER.replace_all(&text, "");
    let text = SETEXT_EQUALS.replace_all(&text, group1);
    let text = SETEXT_DASHES.replace_all(&text, group1);
    let text = BLOCKQUOTE.replace_all(&text, "");
    let text = LIST_MARKER.replace_all(&text, "");
    let text = STRONG_EM_STARS.replace_all(&text, group1);
    let text = unwrap_at_word_boundary(&text, &STRONG_EM_UNDERSCORES);
    let text = BOLD_STARS.replace_all(&text, group1);
    let text = unwrap_at_word_boundary(&text, &BOLD_UNDERSCORES);
    let text = ITALIC_STAR.replace_all(&text, group1);
    let text = unwrap_at_word_boundary(&text, &ITALIC_UNDERSCORE);
    let text = STRIKETHROUGH.replace_all(&text, group1);
    let text = ESCAPED_PUNCT.replace_all(&text, group1);
    let text = BLANK_RUNS.replace_all(&text, "\n");
    text.trim().to_owned()
}
