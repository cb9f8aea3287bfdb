//! Entity content and the tracker wire records it is built from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Custom field type whose text value becomes embeddable content.
const TEXT_FIELD_TYPE: &str = "TextIssueCustomField";

/// Raw Markdown of an issue or article plus what is needed to render it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityContent {
    /// Entity summary (issue summary or article title).
    pub summary: String,
    /// Issue description or article body.
    pub content: String,
    /// Text custom fields by name. Always empty for articles.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    /// Attachment display name to URL.
    #[serde(default)]
    pub attachments: BTreeMap<String, String>,
}

/// Content tagged with the kind of entity it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    /// Issue description, text fields and attachments.
    Issue(EntityContent),
    /// Article body and attachments.
    Article(EntityContent),
}

impl Entity {
    /// Content regardless of kind.
    #[must_use]
    pub fn content(&self) -> &EntityContent {
        match self {
            Self::Issue(content) | Self::Article(content) => content,
        }
    }

    /// Consume into content.
    #[must_use]
    pub fn into_content(self) -> EntityContent {
        match self {
            Self::Issue(content) | Self::Article(content) => content,
        }
    }
}

/// Attachment as returned by the tracker API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AttachmentRecord {
    /// Display name.
    pub name: Option<String>,
    /// Download URL, usually site-relative.
    pub url: Option<String>,
}

/// Custom field as returned by the tracker API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CustomFieldRecord {
    /// Field type discriminator (`$type` on the wire).
    #[serde(rename = "$type", default)]
    pub field_type: String,
    /// Field name.
    pub name: Option<String>,
    /// Field value. Its shape depends on the field type (object, array or
    /// `null`); text fields carry `{"text": ".."}`.
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Issue as returned by the tracker API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    /// Issue summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Issue description in Markdown.
    #[serde(default)]
    pub description: Option<String>,
    /// Issue attachments.
    #[serde(default)]
    pub attachments: Vec<AttachmentRecord>,
    /// Issue custom fields.
    #[serde(default)]
    pub custom_fields: Vec<CustomFieldRecord>,
}

/// Article as returned by the tracker API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ArticleRecord {
    /// Article title.
    #[serde(default)]
    pub summary: Option<String>,
    /// Article body in Markdown.
    #[serde(default)]
    pub content: Option<String>,
    /// Article attachments.
    #[serde(default)]
    pub attachments: Vec<AttachmentRecord>,
}

/// Build the attachment map, skipping records without a name or URL.
#[must_use]
pub fn collect_attachments(records: &[AttachmentRecord]) -> BTreeMap<String, String> {
    records
        .iter()
        .filter_map(|record| match (&record.name, &record.url) {
            (Some(name), Some(url)) if !name.is_empty() && !url.is_empty() => {
                Some((name.clone(), url.clone()))
            }
            _ => None,
        })
        .collect()
}

/// Build the text field map from text custom fields that have a value.
#[must_use]
pub fn collect_text_fields(records: &[CustomFieldRecord]) -> BTreeMap<String, String> {
    records
        .iter()
        .filter(|record| record.field_type == TEXT_FIELD_TYPE)
        .filter_map(|record| {
            let name = record.name.as_ref().filter(|n| !n.is_empty())?;
            let text = record.value.get("text")?.as_str()?;
            Some((name.clone(), text.to_owned()))
        })
        .collect()
}

impl From<IssueRecord> for EntityContent {
    fn from(issue: IssueRecord) -> Self {
        Self {
            summary: issue.summary.unwrap_or_default(),
            content: issue.description.unwrap_or_default(),
            fields: collect_text_fields(&issue.custom_fields),
            attachments: collect_attachments(&issue.attachments),
        }
    }
}

impl From<ArticleRecord> for EntityContent {
    fn from(article: ArticleRecord) -> Self {
        Self {
            summary: article.summary.unwrap_or_default(),
            content: article.content.unwrap_or_default(),
            fields: BTreeMap::new(),
            attachments: collect_attachments(&article.attachments),
        }
    }
}
