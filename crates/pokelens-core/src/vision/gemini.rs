//! Gemini vision provider using the Generative Language REST API.
//!
//! Images go through the resumable Files API first; conversation turns then
//! reference the stored file by URI in `generateContent` calls.

use super::provider::{ChatTurn, Part, UploadedFile, VisionModel, VisionResponse};
use crate::config::GeminiConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::types::ImageSubmission;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const API_VERSION: &str = "v1beta";

/// Gemini provider. Holds one pooled HTTP client for the process lifetime.
pub struct GeminiProvider {
    api_key: String,
    config: GeminiConfig,
    endpoint: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: &str, config: GeminiConfig, timeout: Duration) -> PipelineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::Vision {
                message: format!("Failed to build Gemini HTTP client: {e}"),
                status_code: None,
            })?;

        Ok(Self {
            api_key: api_key.to_string(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            config,
            client,
        })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/{API_VERSION}/models/{}:generateContent",
            self.endpoint, self.config.model
        )
    }

    fn upload_url(&self) -> String {
        format!("{}/upload/{API_VERSION}/files", self.endpoint)
    }
}

// --- Request types ---

#[derive(Serialize)]
struct StartUploadRequest<'a> {
    file: FileMetadata<'a>,
}

#[derive(Serialize)]
struct FileMetadata<'a> {
    display_name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<ContentPart>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum ContentPart {
    Text(String),
    FileData(FileData),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileData {
    mime_type: String,
    file_uri: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
    response_mime_type: String,
}

impl From<&ChatTurn> for Content {
    fn from(turn: &ChatTurn) -> Self {
        let parts = turn
            .parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => ContentPart::Text(text.clone()),
                Part::File(file) => ContentPart::FileData(FileData {
                    mime_type: file.media_type.clone(),
                    file_uri: file.uri.clone(),
                }),
            })
            .collect();
        Self {
            role: Some(turn.role.as_str().to_string()),
            parts,
        }
    }
}

// --- Response types ---

#[derive(Deserialize)]
struct UploadResponse {
    file: StoredFile,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredFile {
    name: String,
    uri: String,
    mime_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u32>,
}

async fn error_for_status(
    resp: reqwest::Response,
    what: &str,
) -> PipelineResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    Err(PipelineError::Vision {
        message: format!("Gemini {what} HTTP {status}: {text}"),
        status_code: Some(status.as_u16()),
    })
}

#[async_trait]
impl VisionModel for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn upload_file(&self, image: &ImageSubmission) -> PipelineResult<UploadedFile> {
        let start = self
            .client
            .post(self.upload_url())
            .header("x-goog-api-key", &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", image.bytes.len())
            .header("X-Goog-Upload-Header-Content-Type", &image.media_type)
            .json(&StartUploadRequest {
                file: FileMetadata {
                    display_name: image.display_name(),
                },
            })
            .send()
            .await
            .map_err(|e| PipelineError::Vision {
                message: format!("Gemini upload start failed: {e}"),
                status_code: None,
            })?;
        let start = error_for_status(start, "upload start").await?;

        let session_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .ok_or_else(|| PipelineError::Vision {
                message: "Gemini upload start returned no x-goog-upload-url header".to_string(),
                status_code: None,
            })?;

        let finish = self
            .client
            .post(&session_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(image.bytes.clone())
            .send()
            .await
            .map_err(|e| PipelineError::Vision {
                message: format!("Gemini upload failed: {e}"),
                status_code: None,
            })?;
        let finish = error_for_status(finish, "upload").await?;

        let uploaded: UploadResponse = finish.json().await.map_err(|e| PipelineError::Vision {
            message: format!("Failed to parse Gemini upload response: {e}"),
            status_code: None,
        })?;

        tracing::debug!(
            "Uploaded file '{}' as: {}",
            image.display_name(),
            uploaded.file.uri
        );

        Ok(UploadedFile {
            name: uploaded.file.name,
            uri: uploaded.file.uri,
            media_type: uploaded
                .file
                .mime_type
                .unwrap_or_else(|| image.media_type.clone()),
        })
    }

    async fn generate(&self, contents: &[ChatTurn]) -> PipelineResult<VisionResponse> {
        let start = Instant::now();

        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![ContentPart::Text(self.config.system_instruction.clone())],
            },
            contents: contents.iter().map(Content::from).collect(),
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
                top_k: self.config.top_k,
                max_output_tokens: self.config.max_output_tokens,
                response_mime_type: self.config.response_mime_type.clone(),
            },
        };

        let resp = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::Vision {
                message: format!("Gemini request failed: {e}"),
                status_code: None,
            })?;
        let resp = error_for_status(resp, "generateContent").await?;

        let generated: GenerateResponse = resp.json().await.map_err(|e| PipelineError::Vision {
            message: format!("Failed to parse Gemini response: {e}"),
            status_code: None,
        })?;

        let text = generated
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .ok_or_else(|| PipelineError::Vision {
                message: "Gemini returned no candidates (prompt may have been blocked)"
                    .to_string(),
                status_code: None,
            })?;

        Ok(VisionResponse {
            text,
            model: generated
                .model_version
                .unwrap_or_else(|| self.config.model.clone()),
            tokens_used: generated.usage_metadata.and_then(|u| u.total_token_count),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
