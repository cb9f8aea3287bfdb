//! Rewrites tracker Markdown into portable, link-resolved Markdown/HTML.
//!
//! Two passes, always in this order:
//!
//! 1. [`process_image_attributes`] turns `![alt](name.png){width=..}` into
//!    `<img>` tags with attachment URLs resolved.
//! 2. [`convert_issue_ids_to_links`] turns bare `PROJECT-123` IDs into
//!    `[PROJECT-123](/issue/PROJECT-123)` links.
//!
//! Code spans and code blocks are located with `pulldown-cmark` and never
//! rewritten. Each pass degrades to returning its input unchanged when it
//! fails, so a broken rewrite shows raw Markdown instead of blocking the
//! render.
//!
//! # Example
//!
//! ```
//! use mdembed_transform::{Attachments, transform_content};
//!
//! let attachments = Attachments::from([("photo.png".to_owned(), "/files/1".to_owned())]);
//! let html = transform_content("![x](photo.png) fixes DEMO-1", &attachments);
//! assert_eq!(
//!     html,
//!     r#"<img src="/files/1" alt="x" style="" loading="lazy" /> fixes [DEMO-1](/issue/DEMO-1)"#
//! );
//! ```

mod error;
mod images;
mod links;
mod protected;
mod transformer;

pub use error::TransformError;
pub use images::{Attachments, process_image_attributes};
pub use links::convert_issue_ids_to_links;
pub use transformer::{ContentTransformer, transform_content};
