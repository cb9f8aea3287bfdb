use mdembed_config::ConfigError;
use mdembed_provider::ProviderError;

/// Error returned when a widget cannot be rendered.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EmbedError {
    /// The widget configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The provider failed to deliver content.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
