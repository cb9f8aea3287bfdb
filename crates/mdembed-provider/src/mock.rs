//! In-memory provider for testing.
//!
//! Provides [`MockProvider`] for exercising the embed pipeline without a
//! tracker.

use std::collections::HashMap;
use std::sync::RwLock;

use mdembed_entity::EntityId;

use crate::entity::EntityContent;
use crate::error::ProviderError;
use crate::provider::{EntityProvider, SnippetProvider};
use crate::snippet::{SnippetRequest, SnippetResponse, WorkflowRecord};

/// Mock entity and snippet provider.
///
/// Entities are keyed by ID, snippets by `(workflow, rule)`. Every snippet
/// request is recorded so tests can assert on what was sent.
///
/// # Example
///
/// ```ignore
/// use mdembed_provider::{EntityContent, MockProvider, fetch_entity};
///
/// let provider = MockProvider::new().with_issue("DEMO-1", EntityContent::default());
/// let entity = fetch_entity(&provider, &"DEMO-1".parse()?)?;
/// ```
#[derive(Debug, Default)]
pub struct MockProvider {
    issues: RwLock<HashMap<String, EntityContent>>,
    articles: RwLock<HashMap<String, EntityContent>>,
    snippets: RwLock<HashMap<(String, String), SnippetResponse>>,
    workflows: RwLock<Vec<WorkflowRecord>>,
    requests: RwLock<Vec<SnippetRequest>>,
}

impl MockProvider {
    /// Create an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an issue.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_issue(self, id: impl Into<String>, content: EntityContent) -> Self {
        self.issues.write().unwrap().insert(id.into(), content);
        self
    }

    /// Add an article.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_article(self, id: impl Into<String>, content: EntityContent) -> Self {
        self.articles.write().unwrap().insert(id.into(), content);
        self
    }

    /// Set the response for a snippet rule.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_snippet(
        self,
        workflow: impl Into<String>,
        rule: impl Into<String>,
        response: SnippetResponse,
    ) -> Self {
        self.snippets
            .write()
            .unwrap()
            .insert((workflow.into(), rule.into()), response);
        self
    }

    /// Add a workflow to the listing.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_workflow(self, workflow: WorkflowRecord) -> Self {
        self.workflows.write().unwrap().push(workflow);
        self
    }

    /// Snippet requests received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<SnippetRequest> {
        self.requests.read().unwrap().clone()
    }
}

impl EntityProvider for MockProvider {
    fn issue(&self, id: &EntityId) -> Result<EntityContent, ProviderError> {
        self.issues
            .read()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(id.to_string()))
    }

    fn article(&self, id: &EntityId) -> Result<EntityContent, ProviderError> {
        self.articles
            .read()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(id.to_string()))
    }
}

impl SnippetProvider for MockProvider {
    fn workflows(&self) -> Result<Vec<WorkflowRecord>, ProviderError> {
        Ok(self.workflows.read().unwrap().clone())
    }

    fn snippet(&self, request: &SnippetRequest) -> Result<SnippetResponse, ProviderError> {
        self.requests.write().unwrap().push(request.clone());
        self.snippets
            .read()
            .unwrap()
            .get(&(request.workflow.clone(), request.rule.clone()))
            .cloned()
            .ok_or_else(|| {
                ProviderError::request(
                    format!("{}/{}", request.workflow, request.rule),
                    "no such snippet",
                )
            })
    }
}
