//! Attachment image resolution.
//!
//! Tracker Markdown extends image syntax with an attribute block:
//! `![alt](name.png){width=100px height=50px}`. Each image outside code is
//! replaced with a literal `<img>` tag whose `src` is resolved against the
//! entity's attachments.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::error::TransformError;
use crate::protected::{ProtectedRanges, Scope};

/// Attachment display name to URL.
pub type Attachments = BTreeMap<String, String>;

static IMAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[(.*?)\]\((.*?)\)(?:\{([^}]*)\})?").unwrap());

/// Requested image dimensions from the `{...}` attribute block.
#[derive(Debug, Default, PartialEq, Eq)]
struct ImageSize {
    width: Option<String>,
    height: Option<String>,
}

impl ImageSize {
    /// Parse `width=..`/`height=..` from a space-separated attribute list.
    ///
    /// Unknown attributes are ignored. A bare number gets a `px` unit.
    fn parse(attrs: &str) -> Self {
        let mut size = Self::default();
        for attr in attrs.split_whitespace() {
            if let Some(value) = attr.strip_prefix("width=") {
                size.width = size.width.or_else(|| css_length(value));
            } else if let Some(value) = attr.strip_prefix("height=") {
                size.height = size.height.or_else(|| css_length(value));
            }
        }
        size
    }

    fn style(&self) -> String {
        let mut style = String::new();
        if let Some(width) = &self.width {
            style.push_str("width: ");
            style.push_str(width);
            style.push(';');
        }
        if let Some(height) = &self.height {
            style.push_str("height: ");
            style.push_str(height);
            style.push(';');
        }
        style
    }
}

fn css_length(value: &str) -> Option<String> {
    let value = value.trim_matches(['"', '\'']);
    if value.is_empty() {
        return None;
    }
    if value.bytes().all(|b| b.is_ascii_digit()) {
        Some(format!("{value}px"))
    } else {
        Some(value.to_owned())
    }
}

/// Link destination of an image: `<a b.png>` or the text before any title.
fn destination(raw: &str) -> &str {
    let raw = raw.trim();
    if let Some(inner) = raw.strip_prefix('<')
        && let Some(end) = inner.find('>')
    {
        return &inner[..end];
    }
    raw.split_whitespace().next().unwrap_or(raw)
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Find the attachment an image refers to.
///
/// Tries the exact name, then the percent-decoded name, then the first
/// attachment (in name order) whose basename equals the basename of `src`.
fn lookup<'a>(src: &str, attachments: &'a Attachments) -> Option<(&'a String, &'a String)> {
    if let Some(entry) = attachments.get_key_value(src) {
        return Some(entry);
    }

    let decoded = percent_decode_str(src).decode_utf8_lossy();
    if decoded != src
        && let Some(entry) = attachments.get_key_value(decoded.as_ref())
    {
        return Some(entry);
    }

    let file_name = basename(&decoded);
    if file_name.is_empty() {
        return None;
    }
    attachments
        .iter()
        .find(|(name, _)| basename(name) == file_name)
}

fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Give a scheme-less URL exactly one leading slash.
fn normalize_url(url: &str) -> String {
    if has_scheme(url) {
        url.to_owned()
    } else {
        format!("/{}", url.trim_start_matches('/'))
    }
}

/// Resolve an image source against the attachments.
///
/// Returns `Ok(None)` when no attachment matches.
pub(crate) fn resolve_attachment(
    src: &str,
    attachments: &Attachments,
) -> Result<Option<String>, TransformError> {
    let Some((name, url)) = lookup(src, attachments) else {
        return Ok(None);
    };
    if url.trim().is_empty() {
        return Err(TransformError::EmptyAttachmentUrl(name.clone()));
    }
    Ok(Some(normalize_url(url.trim())))
}

fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

fn img_tag(src: &str, alt: &str, size: &ImageSize) -> String {
    format!(
        r#"<img src="{}" alt="{}" style="{}" loading="lazy" />"#,
        escape_attr(src),
        escape_attr(alt),
        escape_attr(&size.style())
    )
}

pub(crate) fn try_process_images(
    content: &str,
    attachments: &Attachments,
) -> Result<String, TransformError> {
    let protected = ProtectedRanges::scan(content, Scope::Code);
    let mut out = String::with_capacity(content.len());
    let mut copied = 0;

    for caps in IMAGE_PATTERN.captures_iter(content) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if protected.overlap_end(&whole.range()).is_some() {
            continue;
        }

        let alt = caps.get(1).map_or("", |m| m.as_str());
        let src = destination(caps.get(2).map_or("", |m| m.as_str()));
        let size = caps
            .get(3)
            .map(|m| ImageSize::parse(m.as_str()))
            .unwrap_or_default();
        let resolved = resolve_attachment(src, attachments)?;

        out.push_str(&content[copied..whole.start()]);
        out.push_str(&img_tag(resolved.as_deref().unwrap_or(src), alt, &size));
        copied = whole.end();
    }

    out.push_str(&content[copied..]);
    Ok(out)
}

/// Replace image syntax with `<img>` tags, resolving attachment names.
///
/// Images inside code spans and code blocks are left alone. If anything goes
/// wrong the original content is returned unchanged, so a broken image never
/// blocks the rest of the document.
///
/// # Examples
///
/// ```
/// use mdembed_transform::{Attachments, process_image_attributes};
///
/// let attachments = Attachments::from([("photo.png".to_owned(), "/files/1".to_owned())]);
/// assert_eq!(
///     process_image_attributes("![x](photo.png){width=100px}", &attachments),
///     r#"<img src="/files/1" alt="x" style="width: 100px;" loading="lazy" />"#
/// );
/// ```
#[must_use]
pub fn process_image_attributes(content: &str, attachments: &Attachments) -> String {
    match try_process_images(content, attachments) {
        Ok(processed) => processed,
        Err(e) => {
            tracing::warn!(error = %e, "Image processing failed, keeping original content");
            content.to_owned()
        }
    }
}
