//! Heading-delimited sections and plain-text extraction for Markdown.
//!
//! [`parse_sections`] splits a document into a flat list of [`Section`]s, one
//! per ATX heading. [`get_section_content`] returns the body of a named
//! section, including its deeper subsections. [`remove_markdown`] reduces
//! Markdown to plain text for titles and summaries.
//!
//! Everything here is a pure function of its input: sections are recomputed
//! on every call and never cached.
//!
//! # Example
//!
//! ```
//! use mdembed_sections::{get_section_content, parse_sections};
//!
//! let doc = "# Install\nrun it\n## Linux\napt\n# Usage\ncall it";
//! assert_eq!(parse_sections(doc).len(), 3);
//! assert_eq!(get_section_content(doc, "Install"), "run it\n## Linux\napt");
//! ```

mod fence;
mod plain;
mod section;

pub use plain::remove_markdown;
pub use section::{Section, find_section, get_section_content, parse_sections};
