//! Entity ID newtype and shape-based helpers.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

static ENTITY_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[A-Z]+[A-Z0-9]*-(?:A-)?[0-9]+$").unwrap());

/// Kind of tracker entity an ID points to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Issue (`PROJECT-123`).
    Issue,
    /// Knowledge base article (`PROJECT-A-123`).
    Article,
}

impl EntityKind {
    /// URL path segment for this kind (`"issue"` or `"article"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::Article => "article",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check whether a string has the shape of an entity ID.
///
/// Accepts one or more letters, optional alphanumerics, a dash, an optional
/// `A-` article marker and digits. Matching is case-insensitive.
#[must_use]
pub fn is_valid_entity_id(id: &str) -> bool {
    ENTITY_ID_PATTERN.is_match(id)
}

/// Classify an ID as issue or article by its dash-delimited segments.
///
/// A non-empty third segment (the number after the `A` marker) means article.
#[must_use]
pub fn entity_type_by_id(id: &str) -> EntityKind {
    match id.split('-').nth(2) {
        Some(segment) if !segment.is_empty() => EntityKind::Article,
        _ => EntityKind::Issue,
    }
}

/// Build the URL of an entity: `{base_url}/{kind}/{id}`.
///
/// Pass an empty `base_url` for a site-relative link.
#[must_use]
pub fn entity_url(id: &str, base_url: &str) -> String {
    format!("{base_url}/{}/{id}", entity_type_by_id(id))
}

/// Error returned when parsing an [`EntityId`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum EntityIdError {
    /// Input was empty or whitespace.
    #[error("entity ID is empty")]
    Empty,
    /// Input does not look like `PROJECT-123` or `PROJECT-A-123`.
    #[error("invalid entity ID '{0}'")]
    Malformed(String),
}

/// A validated entity ID.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntityId(String);

impl EntityId {
    /// The ID as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this ID addresses an issue or an article.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        entity_type_by_id(&self.0)
    }

    /// URL of this entity relative to `base_url`.
    #[must_use]
    pub fn url(&self, base_url: &str) -> String {
        entity_url(&self.0, base_url)
    }
}

impl FromStr for EntityId {
    type Err = EntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EntityIdError::Empty);
        }
        if !is_valid_entity_id(trimmed) {
            return Err(EntityIdError::Malformed(trimmed.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
