//! Embed pipeline for tracker Markdown widgets.
//!
//! [`Embedder`] ties the other crates together: it resolves a widget's
//! source from configuration, fetches content through the providers, cuts
//! out the configured section and runs the content transformer.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use mdembed_config::Config;
//! use mdembed_widget::{Embedder, RenderContext, Rendered};
//!
//! let config = Config::load(None)?;
//! let embedder = Embedder::from_config(&config, entities, snippets);
//! match embedder.render(config.widget("release-notes")?, &RenderContext::default())? {
//!     Rendered::Content { title, markdown } => show(&title, &markdown),
//!     Rendered::NeedsInput(input) => prompt(&input.description),
//! }
//! ```

mod embedder;
mod error;

pub use embedder::{Embedder, RenderContext, Rendered};
pub use error::EmbedError;
