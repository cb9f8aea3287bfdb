//! Provider abstractions for embedded tracker content.
//!
//! The embed pipeline never talks to the tracker directly. It asks an
//! [`EntityProvider`] for issue and article content and a [`SnippetProvider`]
//! for workflow snippets. This crate defines those traits, the content types
//! they return, and the wire records of the tracker API so that HTTP-backed
//! implementations share one deserialization path.
//!
//! - [`Entity`] / [`EntityContent`] for issues and articles
//! - [`SnippetResponse`] for snippet output or a parameter prompt
//! - [`snippet_catalog`] to list embeddable snippet rules
//! - [`MockProvider`] for testing (behind the `mock` feature flag)

mod entity;
mod error;
#[cfg(feature = "mock")]
mod mock;
mod provider;
mod snippet;

pub use entity::{
    ArticleRecord, AttachmentRecord, CustomFieldRecord, Entity, EntityContent, IssueRecord,
    collect_attachments, collect_text_fields,
};
pub use error::ProviderError;
#[cfg(feature = "mock")]
pub use mock::MockProvider;
pub use provider::{EntityProvider, SnippetProvider, fetch_entity};
pub use snippet::{
    InputKind, RuleRecord, SnippetContent, SnippetErrorRecord, SnippetInfo, SnippetInput,
    SnippetInputRequest, SnippetRequest, SnippetResponse, WorkflowRecord, snippet_catalog,
};
