//! Entity ID validation and classification.
//!
//! Tracker entities are addressed by short IDs:
//! - issues: `PROJECT-123`
//! - articles: `PROJECT-A-123` (a literal `A` segment before the number)
//!
//! Classification is structural: it trusts the shape of the ID and never asks
//! a backend whether the entity exists.
//!
//! # Example
//!
//! ```
//! use mdembed_entity::{EntityKind, entity_type_by_id, entity_url, is_valid_entity_id};
//!
//! assert!(is_valid_entity_id("DEMO-5"));
//! assert_eq!(entity_type_by_id("DEMO-A-5"), EntityKind::Article);
//! assert_eq!(entity_url("DEMO-5", ""), "/issue/DEMO-5");
//! ```

mod id;

pub use id::{EntityId, EntityIdError, EntityKind, entity_type_by_id, entity_url, is_valid_entity_id};
