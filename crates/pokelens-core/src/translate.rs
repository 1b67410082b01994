//! Best-effort message translation.
//!
//! Translation never fails a request: [`localize`] returns the original text
//! whenever the translator errors or comes back empty.

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::types::DEFAULT_LANG;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translator name for logging.
    fn name(&self) -> &str;

    /// Translate `text` from `source` to `dest` language codes.
    async fn translate(&self, text: &str, source: &str, dest: &str) -> PipelineResult<String>;
}

/// Google Translate's public `translate_a/single` endpoint.
pub struct GoogleTranslator {
    endpoint: String,
    client: reqwest::Client,
}

impl GoogleTranslator {
    pub fn new(endpoint: &str, timeout: Duration) -> PipelineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::Translation {
                message: format!("Failed to build translation HTTP client: {e}"),
            })?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }
}

/// Join the translated segments of a `translate_a/single` reply.
///
/// The reply is a nested array whose first element lists
/// `[translated, original, ...]` segments.
fn parse_segments(body: &serde_json::Value) -> Option<String> {
    let segments = body.get(0)?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(|s| s.as_str()))
        .collect();
    Some(text)
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate(&self, text: &str, source: &str, dest: &str) -> PipelineResult<String> {
        let url = format!("{}/translate_a/single", self.endpoint);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", dest),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| PipelineError::Translation {
                message: format!("Translate request failed: {e}"),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PipelineError::Translation {
                message: format!("Translate HTTP {status}"),
            });
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| PipelineError::Translation {
            message: format!("Failed to parse translate response: {e}"),
        })?;

        parse_segments(&body).ok_or_else(|| PipelineError::Translation {
            message: "Translate response has no segments".to_string(),
        })
    }
}

/// Returns text unchanged. Used when translation is disabled.
pub struct PassthroughTranslator;

#[async_trait]
impl Translator for PassthroughTranslator {
    fn name(&self) -> &str {
        "passthrough"
    }

    async fn translate(&self, text: &str, _source: &str, _dest: &str) -> PipelineResult<String> {
        Ok(text.to_string())
    }
}

/// Build the translator selected by `config.translation`.
pub fn translator_from_config(config: &Config) -> PipelineResult<Arc<dyn Translator>> {
    if config.translation.enabled {
        Ok(Arc::new(GoogleTranslator::new(
            &config.translation.endpoint,
            config.request_timeout(),
        )?))
    } else {
        Ok(Arc::new(PassthroughTranslator))
    }
}

/// Translate an English message into `dest`, or return it untranslated.
pub async fn localize(translator: &dyn Translator, text: &str, dest: &str) -> String {
    if dest == DEFAULT_LANG {
        return text.to_string();
    }
    match translator.translate(text, DEFAULT_LANG, dest).await {
        Ok(translated) if !translated.trim().is_empty() => translated,
        Ok(_) => {
            tracing::debug!("{} returned an empty translation for '{dest}'", translator.name());
            text.to_string()
        }
        Err(e) => {
            tracing::warn!("Translation to '{dest}' failed, using English: {e}");
            text.to_string()
        }
    }
}
