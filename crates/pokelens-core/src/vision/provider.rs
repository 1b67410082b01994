//! Vision model trait and conversation types.
//!
//! Defines the interface a vision-language provider implements, plus the
//! factory that creates the configured provider at startup.

use crate::config::{Config, VisionConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::types::ImageSubmission;
use async_trait::async_trait;
use std::time::Duration;

/// A file stored on the provider's side, referenced by later turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Provider resource name (e.g., "files/abc123")
    pub name: String,
    /// URI to reference in conversation parts
    pub uri: String,
    /// MIME type the provider recorded
    pub media_type: String,
}

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// One piece of a conversation turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    File(UploadedFile),
}

/// A single turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl ChatTurn {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn user_file(file: UploadedFile) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::File(file)],
        }
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::Text(text.into())],
        }
    }

    /// Concatenated text parts of this turn.
    #[cfg(test)]
    pub(crate) fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                Part::File(_) => None,
            })
            .collect()
    }
}

/// The reply to one conversation turn.
#[derive(Debug, Clone)]
pub struct VisionResponse {
    /// Reply text, untrimmed
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all vision providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the pipeline holds an `Arc<dyn VisionModel>`).
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Provider name for logging (e.g., "gemini").
    fn name(&self) -> &str;

    /// Store the image with the provider so conversation turns can reference it.
    async fn upload_file(&self, image: &ImageSubmission) -> PipelineResult<UploadedFile>;

    /// Produce the next model turn for a full conversation history.
    ///
    /// Providers keep no state between calls; the whole history is sent
    /// every time.
    async fn generate(&self, contents: &[ChatTurn]) -> PipelineResult<VisionResponse>;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Factory that creates the configured vision provider.
pub struct VisionModelFactory;

impl VisionModelFactory {
    /// Create the provider named in `config.vision.provider`.
    ///
    /// Fails with `MissingCredential` when the API key does not resolve,
    /// which callers treat as a fatal startup condition.
    pub fn create(config: &Config) -> PipelineResult<Box<dyn VisionModel>> {
        Self::create_with_timeout(&config.vision, config.request_timeout())
    }

    pub fn create_with_timeout(
        vision: &VisionConfig,
        timeout: Duration,
    ) -> PipelineResult<Box<dyn VisionModel>> {
        match vision.provider.as_str() {
            "gemini" => {
                let cfg = vision.gemini.clone();
                let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| {
                    PipelineError::MissingCredential(
                        "Gemini API key not set. Set GEMINI_API_KEY env var.".to_string(),
                    )
                })?;
                Ok(Box::new(super::gemini::GeminiProvider::new(
                    &api_key, cfg, timeout,
                )?))
            }
            other => Err(PipelineError::Vision {
                message: format!("Unknown vision provider: {other}"),
                status_code: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }

    #[test]
    fn test_factory_rejects_missing_key() {
        let mut config = Config::default();
        config.vision.gemini.api_key = "${POKELENS_TEST_UNSET_KEY_987}".to_string();
        let err = VisionModelFactory::create(&config).err().unwrap();
        assert!(matches!(err, PipelineError::MissingCredential(_)));
    }

    #[test]
    fn test_factory_rejects_unknown_provider() {
        let mut config = Config::default();
        config.vision.provider = "anthropic".to_string();
        config.vision.gemini.api_key = "literal-key".to_string();
        let err = VisionModelFactory::create(&config).err().unwrap();
        assert!(err.to_string().contains("anthropic"));
    }

    #[test]
    fn test_factory_builds_gemini_with_literal_key() {
        let mut config = Config::default();
        config.vision.gemini.api_key = "literal-key".to_string();
        let model = VisionModelFactory::create(&config).unwrap();
        assert_eq!(model.name(), "gemini");
    }

    #[test]
    fn test_chat_turn_text_skips_files() {
        let turn = ChatTurn {
            role: Role::User,
            parts: vec![
                Part::File(UploadedFile {
                    name: "files/a".into(),
                    uri: "https://example/files/a".into(),
                    media_type: "image/png".into(),
                }),
                Part::Text("hello".into()),
            ],
        };
        assert_eq!(turn.text(), "hello");
        assert_eq!(turn.role.as_str(), "user");
    }
}
