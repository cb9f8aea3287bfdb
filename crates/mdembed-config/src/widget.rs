//! Per-widget configuration.

use mdembed_entity::EntityId;
use serde::Deserialize;

use crate::ConfigError;

/// One `[widgets.<name>]` table.
///
/// A widget embeds either a section of an issue or article (`entity_id`) or
/// the output of a workflow snippet (`snippet_workflow` + `snippet_rule`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WidgetConfig {
    /// Title override. Defaults to the entity summary or snippet title.
    pub title: Option<String>,
    /// Issue or article to embed.
    pub entity_id: Option<String>,
    /// Heading whose section is embedded. Empty embeds the whole content.
    pub section_title: String,
    /// Text custom field to read instead of the description.
    pub content_field: Option<String>,
    /// Workflow that owns the snippet rule.
    pub snippet_workflow: Option<String>,
    /// Snippet rule name.
    pub snippet_rule: Option<String>,
    /// Parameter passed to the snippet.
    pub snippet_param: String,
}

/// Where a widget's Markdown comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedSource {
    /// A section of an issue or article.
    Entity {
        /// Validated entity ID.
        entity_id: EntityId,
        /// Section heading, empty for the whole content.
        section_title: String,
        /// Text field to read instead of the description.
        content_field: Option<String>,
    },
    /// Output of a workflow snippet.
    Snippet {
        /// Owning workflow.
        workflow: String,
        /// Rule name.
        rule: String,
        /// Parameter, empty when none.
        param: String,
    },
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl WidgetConfig {
    /// Widget embedding `section_title` of `entity_id`.
    #[must_use]
    pub fn entity(entity_id: impl Into<String>, section_title: impl Into<String>) -> Self {
        Self {
            entity_id: Some(entity_id.into()),
            section_title: section_title.into(),
            ..Self::default()
        }
    }

    /// Widget embedding the output of `rule` in `workflow`.
    #[must_use]
    pub fn snippet(workflow: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            snippet_workflow: Some(workflow.into()),
            snippet_rule: Some(rule.into()),
            ..Self::default()
        }
    }

    /// Resolve which source this widget embeds.
    ///
    /// An entity ID takes precedence over snippet settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the entity ID is malformed, only
    /// one of the snippet workflow and rule is set, or no source is set.
    pub fn source(&self) -> Result<EmbedSource, ConfigError> {
        if let Some(id) = non_empty(self.entity_id.as_deref()) {
            let entity_id = id
                .parse::<EntityId>()
                .map_err(|e| ConfigError::Validation(format!("entity_id: {e}")))?;
            return Ok(EmbedSource::Entity {
                entity_id,
                section_title: self.section_title.trim().to_owned(),
                content_field: non_empty(self.content_field.as_deref()).map(str::to_owned),
            });
        }

        match (
            non_empty(self.snippet_workflow.as_deref()),
            non_empty(self.snippet_rule.as_deref()),
        ) {
            (Some(workflow), Some(rule)) => Ok(EmbedSource::Snippet {
                workflow: workflow.to_owned(),
                rule: rule.to_owned(),
                param: self.snippet_param.clone(),
            }),
            (None, None) => Err(ConfigError::Validation(
                "either entity_id or snippet_workflow and snippet_rule must be set".to_owned(),
            )),
            _ => Err(ConfigError::Validation(
                "snippet_workflow and snippet_rule must be set together".to_owned(),
            )),
        }
    }
}
