//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be > 0".into(),
            ));
        }
        if self.server.max_upload_mb == 0 {
            return Err(ConfigError::ValidationError(
                "server.max_upload_mb must be > 0".into(),
            ));
        }
        if self.http.request_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "http.request_timeout_ms must be > 0".into(),
            ));
        }
        if self.vision.provider != "gemini" {
            return Err(ConfigError::ValidationError(format!(
                "vision.provider '{}' is not supported (expected \"gemini\")",
                self.vision.provider
            )));
        }
        let gemini = &self.vision.gemini;
        if gemini.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "vision.gemini.endpoint must not be empty".into(),
            ));
        }
        if !(0.0..=2.0).contains(&gemini.temperature) {
            return Err(ConfigError::ValidationError(
                "vision.gemini.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&gemini.top_p) {
            return Err(ConfigError::ValidationError(
                "vision.gemini.top_p must be between 0.0 and 1.0".into(),
            ));
        }
        if self.species.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "species.endpoint must not be empty".into(),
            ));
        }
        if self.translation.enabled && self.translation.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "translation.endpoint must not be empty when translation is enabled".into(),
            ));
        }
        Ok(())
    }
}
