//! Transformation errors.
//!
//! These never cross the public transform functions: a failing pass logs the
//! error and returns its input unchanged.

/// Error raised inside a rewrite pass.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TransformError {
    /// An attachment matched an image but carries no URL.
    #[error("attachment '{0}' has no URL")]
    EmptyAttachmentUrl(String),
}
