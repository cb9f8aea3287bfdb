//! Widget rendering pipeline.

use std::sync::Arc;

use mdembed_config::{Config, EmbedSource, WidgetConfig};
use mdembed_provider::{
    EntityContent, EntityProvider, SnippetInput, SnippetProvider, SnippetRequest,
    SnippetResponse, fetch_entity,
};
use mdembed_sections::{get_section_content, remove_markdown};
use mdembed_transform::{Attachments, ContentTransformer};

use crate::error::EmbedError;

/// Where and for whom a widget is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    /// Login of the viewing user.
    pub login: Option<String>,
    /// Issue or article the widget is placed on.
    pub entity_id: Option<String>,
    /// Refresh counter, bumped by the viewer to re-run snippets.
    pub refresh: u32,
    /// Snippet parameter entered by the user. Overrides the configured one.
    pub param: Option<String>,
}

/// Result of rendering a widget.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// Transformed Markdown ready for display.
    Content {
        /// Plain-text title.
        title: String,
        /// Markdown with images resolved and entity IDs linked.
        markdown: String,
    },
    /// The snippet needs a parameter; render again with
    /// [`RenderContext::param`] set.
    NeedsInput(SnippetInput),
}

impl Rendered {
    /// Whether there is nothing to display.
    ///
    /// A missing section or content field renders as empty content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Content { markdown, .. } if markdown.is_empty())
    }
}

/// Renders widgets from entity or snippet sources.
pub struct Embedder {
    entities: Arc<dyn EntityProvider>,
    snippets: Arc<dyn SnippetProvider>,
    transformer: ContentTransformer,
}

impl Embedder {
    /// Create an embedder with the default transformer.
    pub fn new(entities: Arc<dyn EntityProvider>, snippets: Arc<dyn SnippetProvider>) -> Self {
        Self {
            entities,
            snippets,
            transformer: ContentTransformer::new(),
        }
    }

    /// Create an embedder whose transformer follows `config.links`.
    pub fn from_config(
        config: &Config,
        entities: Arc<dyn EntityProvider>,
        snippets: Arc<dyn SnippetProvider>,
    ) -> Self {
        let transformer = ContentTransformer::new()
            .with_base_url(config.links.base_url.as_str())
            .with_case_insensitive_ids(config.links.case_insensitive_ids);
        Self::new(entities, snippets).with_transformer(transformer)
    }

    /// Replace the content transformer.
    #[must_use]
    pub fn with_transformer(mut self, transformer: ContentTransformer) -> Self {
        self.transformer = transformer;
        self
    }

    /// Transformer applied to all rendered content.
    #[must_use]
    pub fn transformer(&self) -> &ContentTransformer {
        &self.transformer
    }

    /// Render a widget.
    ///
    /// # Errors
    ///
    /// Returns `EmbedError::Config` if the widget has no valid source, or
    /// `EmbedError::Provider` if fetching content fails.
    pub fn render(
        &self,
        widget: &WidgetConfig,
        context: &RenderContext,
    ) -> Result<Rendered, EmbedError> {
        let title_override = widget
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty());

        match widget.source()? {
            EmbedSource::Entity {
                entity_id,
                section_title,
                content_field,
            } => {
                let entity = fetch_entity(self.entities.as_ref(), &entity_id)?.into_content();
                let markdown = self.render_entity(&entity, &section_title, content_field.as_deref());
                tracing::debug!(
                    id = %entity_id,
                    section = %section_title,
                    empty = markdown.is_empty(),
                    "Rendered entity widget"
                );
                Ok(Rendered::Content {
                    title: title_override.map_or_else(|| remove_markdown(&entity.summary), str::to_owned),
                    markdown,
                })
            }
            EmbedSource::Snippet {
                workflow,
                rule,
                param,
            } => {
                let request = SnippetRequest::new(workflow, rule)
                    .with_param(context.param.clone().unwrap_or(param))
                    .with_login(context.login.clone())
                    .with_entity_id(context.entity_id.clone())
                    .with_refresh(context.refresh);
                match self.snippets.snippet(&request)? {
                    SnippetResponse::Content(snippet) => {
                        tracing::debug!(
                            workflow = %request.workflow,
                            rule = %request.rule,
                            "Rendered snippet widget"
                        );
                        Ok(Rendered::Content {
                            title: title_override
                                .map_or_else(|| remove_markdown(&snippet.title), str::to_owned),
                            markdown: self
                                .transformer
                                .transform(snippet.content.trim(), &Attachments::new()),
                        })
                    }
                    SnippetResponse::Input(prompt) => {
                        tracing::debug!(rule = %request.rule, "Snippet requires input");
                        Ok(Rendered::NeedsInput(prompt.input))
                    }
                }
            }
        }
    }

    /// Select the source text, cut the section and transform it.
    fn render_entity(
        &self,
        entity: &EntityContent,
        section_title: &str,
        content_field: Option<&str>,
    ) -> String {
        let source = match content_field {
            Some(field) => entity.fields.get(field).map_or("", String::as_str),
            None => entity.content.as_str(),
        };
        let section = get_section_content(source, section_title);
        let section = section.trim();
        if section.is_empty() {
            return String::new();
        }
        self.transformer.transform(section, &entity.attachments)
    }
}
