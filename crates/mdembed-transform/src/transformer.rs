//! Two-pass content transformer.

use crate::images::{Attachments, process_image_attributes};
use crate::links::{id_pattern, linkify};

/// Configured image-then-link rewrite pipeline.
///
/// Images are always resolved first: the entity-link pass skips HTML tags, so
/// the `<img>` tags emitted by the image pass are never rewritten.
///
/// # Example
///
/// ```
/// use mdembed_transform::{Attachments, ContentTransformer};
///
/// let transformer = ContentTransformer::new().with_base_url("https://tracker.example.com/");
/// assert_eq!(
///     transformer.transform("See DEMO-7", &Attachments::new()),
///     "See [DEMO-7](https://tracker.example.com/issue/DEMO-7)"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTransformer {
    base_url: String,
    case_insensitive_ids: bool,
}

impl ContentTransformer {
    /// Transformer with site-relative links and uppercase-only IDs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix entity links with `base_url` (trailing slashes are dropped).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    /// Also link lowercase IDs such as `demo-12`.
    #[must_use]
    pub fn with_case_insensitive_ids(mut self, enabled: bool) -> Self {
        self.case_insensitive_ids = enabled;
        self
    }

    /// Base URL used for entity links.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve attachment images, then link bare entity IDs.
    #[must_use]
    pub fn transform(&self, content: &str, attachments: &Attachments) -> String {
        let with_images = process_image_attributes(content, attachments);
        self.convert_issue_ids_to_links(&with_images)
    }

    /// Link bare entity IDs using this transformer's options.
    #[must_use]
    pub fn convert_issue_ids_to_links(&self, content: &str) -> String {
        linkify(content, id_pattern(self.case_insensitive_ids), &self.base_url)
    }
}

/// Transform content with default options.
///
/// See [`ContentTransformer::transform`].
#[must_use]
pub fn transform_content(content: &str, attachments: &Attachments) -> String {
    ContentTransformer::new().transform(content, attachments)
}
