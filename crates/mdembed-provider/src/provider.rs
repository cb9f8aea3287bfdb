//! Provider traits consumed by the embed pipeline.

use mdembed_entity::{EntityId, EntityKind};

use crate::entity::{Entity, EntityContent};
use crate::error::ProviderError;
use crate::snippet::{SnippetInfo, SnippetRequest, SnippetResponse, WorkflowRecord, snippet_catalog};

/// Source of issue and article content.
///
/// Implementations talk to the tracker (REST client, host API, cache, ...)
/// and return content with attachments already flattened into a name map.
pub trait EntityProvider: Send + Sync {
    /// Fetch an issue.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotFound`] if the issue is missing or not
    /// visible, or another variant if the request fails.
    fn issue(&self, id: &EntityId) -> Result<EntityContent, ProviderError>;

    /// Fetch an article.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotFound`] if the article is missing or not
    /// visible, or another variant if the request fails.
    fn article(&self, id: &EntityId) -> Result<EntityContent, ProviderError>;
}

/// Source of workflow snippets.
pub trait SnippetProvider: Send + Sync {
    /// List workflows with their rules.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the listing request fails.
    fn workflows(&self) -> Result<Vec<WorkflowRecord>, ProviderError>;

    /// Execute a snippet rule.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Snippet`] if the rule throws, or another
    /// variant if the request fails.
    fn snippet(&self, request: &SnippetRequest) -> Result<SnippetResponse, ProviderError>;

    /// Snippet rules available for embedding.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the workflow listing fails.
    fn catalog(&self) -> Result<Vec<SnippetInfo>, ProviderError> {
        Ok(snippet_catalog(&self.workflows()?))
    }
}

/// Fetch an issue or article depending on the shape of `id`.
///
/// # Errors
///
/// Propagates the provider's error.
pub fn fetch_entity(provider: &dyn EntityProvider, id: &EntityId) -> Result<Entity, ProviderError> {
    tracing::debug!(id = %id, kind = %id.kind(), "Fetching entity");
    match id.kind() {
        EntityKind::Issue => provider.issue(id).map(Entity::Issue),
        EntityKind::Article => provider.article(id).map(Entity::Article),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snippet::RuleRecord;
    use pretty_assertions::assert_eq;

    /// Answers every issue request with its ID as summary, has no articles.
    struct IssuesOnly;

    impl EntityProvider for IssuesOnly {
        fn issue(&self, id: &EntityId) -> Result<EntityContent, ProviderError> {
            Ok(EntityContent {
                summary: id.to_string(),
                ..Default::default()
            })
        }

        fn article(&self, id: &EntityId) -> Result<EntityContent, ProviderError> {
            Err(ProviderError::NotFound(id.to_string()))
        }
    }

    impl SnippetProvider for IssuesOnly {
        fn workflows(&self) -> Result<Vec<WorkflowRecord>, ProviderError> {
            Ok(vec![WorkflowRecord {
                name: "team".to_owned(),
                rules: vec![RuleRecord {
                    name: "standup".to_owned(),
                    title: Some("snippet:Standup".to_owned()),
                    rule_type: "StatelessActionRule".to_owned(),
                }],
            }])
        }

        fn snippet(&self, request: &SnippetRequest) -> Result<SnippetResponse, ProviderError> {
            Err(ProviderError::request(request.rule.clone(), "offline"))
        }
    }

    #[test]
    fn test_fetch_entity_issue() {
        let entity = fetch_entity(&IssuesOnly, &"DEMO-1".parse().unwrap()).unwrap();

        assert_eq!(entity.content().summary, "DEMO-1");
        assert!(matches!(entity, Entity::Issue(_)));
    }

    #[test]
    fn test_fetch_entity_article_dispatch() {
        let result = fetch_entity(&IssuesOnly, &"DEMO-A-1".parse().unwrap());

        assert!(matches!(result, Err(ProviderError::NotFound(id)) if id == "DEMO-A-1"));
    }

    #[test]
    fn test_catalog_from_workflows() {
        let catalog = IssuesOnly.catalog().unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].title, "Standup");
        assert_eq!(catalog[0].rule, "standup");
    }
}
