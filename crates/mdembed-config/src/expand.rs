//! Environment references in `mdembed.toml` values.
//!
//! Lets one config file point entity links at different tracker instances,
//! e.g. `base_url = "${TRACKER_URL:-https://tracker.example.com}"`.

use std::env::VarError;

use crate::ConfigError;

/// Substitute `${VAR}` and `${VAR:-fallback}` in the value of `field`.
///
/// Values without `${` are returned as is, so a tracker URL containing a
/// literal `$` needs no escaping.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| std::env::var(var).map(Some))
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| {
            let reason = match e.cause {
                VarError::NotPresent => "is not set",
                VarError::NotUnicode(_) => "is not valid UTF-8",
            };
            ConfigError::EnvVar {
                field: field.to_owned(),
                message: format!("{} {reason}", e.var_name),
            }
        })
}
